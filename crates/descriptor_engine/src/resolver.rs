//! Placeholder resolution against a layered set of sources.
//!
//! A `${NAME}` occurrence is resolved, first match wins, against:
//!
//! 1. the variable store built from `<variable>` declarations,
//! 2. the external parameters supplied alongside the descriptor path,
//! 3. a named property of the process,
//! 4. an environment entry.
//!
//! A miss is not an error here: the literal `${NAME}` text is handed back
//! as a sentinel so the substitution engine can fall back to the variable's
//! default, or the finalizer can publish it for later consumers.

use std::collections::HashMap;
use std::sync::OnceLock;

use regex::Regex;
use tracing::debug;

use crate::errors::{DescriptorError, DescriptorResult};
use crate::variables::VariableStore;

#[cfg(test)]
#[path = "resolver_tests.rs"]
mod tests;

pub(crate) const PLACEHOLDER_PREFIX: &str = "${";
const PLACEHOLDER_SUFFIX: char = '}';

/// Nested resolution gives up beyond this depth and reports a cycle
/// instead of recursing indefinitely.
const MAX_RESOLVE_DEPTH: usize = 16;

/// Returns the compiled placeholder pattern. The character class excludes
/// the marker characters, so the innermost placeholder of a computed
/// variable name is always matched first.
pub(crate) fn placeholder_regex() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\$\{([^${}]+?)\}").expect("placeholder pattern is valid"))
}

/// Named properties and environment entries consulted during resolution.
///
/// The production implementation is [`ProcessEnv`]; tests substitute a
/// deterministic fake. Properties are also the finalization target for
/// defaults of variables that stay unresolved.
pub trait EnvSource {
    /// Looks up a named property of the process.
    fn property(&self, name: &str) -> Option<String>;

    /// Looks up an environment entry.
    fn env_var(&self, name: &str) -> Option<String>;

    /// Installs a named property so later, independent resolution observes
    /// a consistent value.
    fn set_property(&mut self, name: &str, value: &str);
}

/// [`EnvSource`] backed by the real process environment and an owned
/// property table.
#[derive(Debug, Default)]
pub struct ProcessEnv {
    properties: HashMap<String, String>,
}

impl ProcessEnv {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read access to the installed properties, mainly for the host to
    /// forward them to the booted component.
    pub fn properties(&self) -> &HashMap<String, String> {
        &self.properties
    }
}

impl EnvSource for ProcessEnv {
    fn property(&self, name: &str) -> Option<String> {
        self.properties.get(name).cloned()
    }

    fn env_var(&self, name: &str) -> Option<String> {
        std::env::var(name).ok()
    }

    fn set_property(&mut self, name: &str, value: &str) {
        self.properties.insert(name.to_string(), value.to_string());
    }
}

/// Resolves every placeholder occurrence in `value`, left to right.
///
/// Occurrences that no source can satisfy are kept verbatim. A `${` with
/// no closing marker ends the scan and the remainder is appended
/// unchanged.
pub fn resolve_value(
    value: &str,
    store: &VariableStore,
    params: &HashMap<String, String>,
    env: &dyn EnvSource,
) -> DescriptorResult<String> {
    resolve_value_at(value, store, params, env, 0)
}

fn resolve_value_at(
    value: &str,
    store: &VariableStore,
    params: &HashMap<String, String>,
    env: &dyn EnvSource,
    depth: usize,
) -> DescriptorResult<String> {
    if depth > MAX_RESOLVE_DEPTH {
        return Err(DescriptorError::CyclicReference {
            context: value.to_string(),
        });
    }

    let mut resolved = String::with_capacity(value.len());
    let mut rest = value;
    while let Some(start) = rest.find(PLACEHOLDER_PREFIX) {
        resolved.push_str(&rest[..start]);
        let tail = &rest[start..];
        match tail.find(PLACEHOLDER_SUFFIX) {
            None => {
                // No closing marker; keep the tail as-is.
                resolved.push_str(tail);
                return Ok(resolved);
            }
            Some(end) => {
                let token = &tail[..=end];
                resolved.push_str(&resolve_token(token, store, params, env, depth)?);
                rest = &tail[end + 1..];
            }
        }
    }
    resolved.push_str(rest);
    Ok(resolved)
}

/// Resolves a single `${NAME}` token against the source chain.
///
/// `${}` resolves to itself literally, never to a lookup. Anything that is
/// not a complete placeholder token is returned unchanged.
fn resolve_token(
    token: &str,
    store: &VariableStore,
    params: &HashMap<String, String>,
    env: &dyn EnvSource,
    depth: usize,
) -> DescriptorResult<String> {
    if !token.starts_with(PLACEHOLDER_PREFIX) || !token.ends_with(PLACEHOLDER_SUFFIX) {
        return Ok(token.to_string());
    }
    let name = &token[PLACEHOLDER_PREFIX.len()..token.len() - 1];
    if name.is_empty() {
        return Ok(token.to_string());
    }

    if let Some(variable) = store.get(name) {
        debug!("Variable {} resolved through a declared variable: {}", name, variable.value());
        return resolve_inner(variable.value(), store, params, env, depth);
    }
    if let Some(value) = params.get(name) {
        debug!("Variable {} resolved through an invocation parameter: {}", name, value);
        return resolve_inner(value, store, params, env, depth);
    }
    if let Some(value) = env.property(name) {
        debug!("Variable {} resolved through a named property: {}", name, value);
        return resolve_inner(&value, store, params, env, depth);
    }
    if let Some(value) = env.env_var(name) {
        debug!("Variable {} resolved through an environment entry: {}", name, value);
        return resolve_inner(&value, store, params, env, depth);
    }

    // Unresolved: hand the literal token back as a sentinel.
    Ok(token.to_string())
}

fn resolve_inner(
    resolved: &str,
    store: &VariableStore,
    params: &HashMap<String, String>,
    env: &dyn EnvSource,
    depth: usize,
) -> DescriptorResult<String> {
    if resolved.contains(PLACEHOLDER_PREFIX) {
        resolve_value_at(resolved, store, params, env, depth + 1)
    } else {
        Ok(resolved.to_string())
    }
}
