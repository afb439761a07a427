//! Document-wide placeholder substitution to a fixed point.
//!
//! Two passes run over the descriptor: one over every attribute value of
//! the root's descendants, then one over every text node outside
//! `<variable>` declarations. Each pass repeats until a full sweep finds
//! no placeholder, rebuilding the variable store between sweeps because a
//! substitution may have rewritten a variable's own name or value
//! elsewhere in the document.
//!
//! Variable declarations are excluded from the text pass; their defining
//! text is consumed by the store rebuild instead, which prevents a
//! declaration from being resolved twice.

use std::collections::HashMap;

use tracing::debug;

use crate::document::{Element, Node};
use crate::errors::{DescriptorError, DescriptorResult};
use crate::resolver::{placeholder_regex, EnvSource, PLACEHOLDER_PREFIX};
use crate::variables::{VariableStore, VARIABLE_ELEMENT};

#[cfg(test)]
#[path = "substitution_tests.rs"]
mod tests;

/// A pass that is still finding placeholders after this many sweeps is
/// chasing a cycle between variable definitions.
const MAX_SWEEPS: usize = 64;

/// Rewrites every attribute value and every text node of the document,
/// returning the variable store as rebuilt after the final sweep.
///
/// The returned store is what the finalizer inspects for variables whose
/// values stayed unresolved.
pub fn substitute_document(
    root: &mut Element,
    params: &HashMap<String, String>,
    env: &dyn EnvSource,
) -> DescriptorResult<VariableStore> {
    let store = VariableStore::rebuild(root, params, env)?;
    debug!("Seeded variable store with {} declaration(s)", store.len());

    let store = fixpoint(root, store, params, env, attribute_sweep, "attribute content")?;
    fixpoint(root, store, params, env, text_sweep, "element content")
}

fn fixpoint(
    root: &mut Element,
    mut store: VariableStore,
    params: &HashMap<String, String>,
    env: &dyn EnvSource,
    sweep: fn(&mut Element, &VariableStore) -> DescriptorResult<bool>,
    context: &str,
) -> DescriptorResult<VariableStore> {
    for _ in 0..MAX_SWEEPS {
        let matched = sweep(root, &store)?;
        store = VariableStore::rebuild(root, params, env)?;
        if !matched {
            return Ok(store);
        }
    }
    Err(DescriptorError::CyclicReference {
        context: context.to_string(),
    })
}

/// One sweep over the attributes of every descendant element of the root.
fn attribute_sweep(root: &mut Element, store: &VariableStore) -> DescriptorResult<bool> {
    let mut matched = false;
    for node in root.children.iter_mut() {
        if let Node::Element(child) = node {
            matched |= sweep_element_attributes(child, store)?;
        }
    }
    Ok(matched)
}

fn sweep_element_attributes(element: &mut Element, store: &VariableStore) -> DescriptorResult<bool> {
    let mut matched = false;
    let element_name = element.name.clone();
    for (attr_name, value) in element.attributes.iter_mut() {
        let location = format!("Attribute \"{element_name}[@{attr_name}]\"");
        matched |= substitute_occurrences(value, &location, store)?;
    }
    for node in element.children.iter_mut() {
        if let Node::Element(child) = node {
            matched |= sweep_element_attributes(child, store)?;
        }
    }
    Ok(matched)
}

/// One sweep over the text nodes of every descendant element of the root,
/// skipping `<variable>` declarations.
fn text_sweep(root: &mut Element, store: &VariableStore) -> DescriptorResult<bool> {
    let mut matched = false;
    for node in root.children.iter_mut() {
        if let Node::Element(child) = node {
            matched |= sweep_element_text(child, store)?;
        }
    }
    Ok(matched)
}

fn sweep_element_text(element: &mut Element, store: &VariableStore) -> DescriptorResult<bool> {
    if element.name == VARIABLE_ELEMENT {
        return Ok(false);
    }
    let mut matched = false;
    let element_name = element.name.clone();
    for node in element.children.iter_mut() {
        match node {
            Node::Text(text) => {
                let location = format!("Element \"{element_name}\"");
                matched |= substitute_occurrences(text, &location, store)?;
            }
            Node::Element(child) => {
                matched |= sweep_element_text(child, store)?;
            }
        }
    }
    Ok(matched)
}

/// Replaces every placeholder occurrence in `value` with its variable's
/// current value, left to right, non-overlapping. Returns whether any
/// occurrence was found.
///
/// A variable whose own value is still unresolved substitutes its default
/// instead; without a default this is a fatal resolution error naming the
/// offending location and placeholder.
fn substitute_occurrences(
    value: &mut String,
    location: &str,
    store: &VariableStore,
) -> DescriptorResult<bool> {
    let regex = placeholder_regex();
    if !value.contains(PLACEHOLDER_PREFIX) {
        return Ok(false);
    }

    let current = value.clone();
    let mut rewritten = String::with_capacity(current.len());
    let mut matched = false;
    let mut last = 0;
    for occurrence in regex.find_iter(&current) {
        let placeholder = occurrence.as_str();
        let name = &placeholder[PLACEHOLDER_PREFIX.len()..placeholder.len() - 1];
        matched = true;

        let Some(variable) = store.get(name) else {
            return Err(DescriptorError::UnresolvedReference {
                location: location.to_string(),
                placeholder: placeholder.to_string(),
                reason: "no declaration, parameter, property or environment entry provides it"
                    .to_string(),
            });
        };

        let substitute = if variable.value().trim().starts_with(PLACEHOLDER_PREFIX) {
            // The variable itself stayed unresolved; fall back to its default.
            match variable.default() {
                Some(default) => {
                    debug!(
                        "Taking the default value for the unresolved variable {}: {}",
                        placeholder, default
                    );
                    default.to_string()
                }
                None => {
                    return Err(DescriptorError::UnresolvedReference {
                        location: location.to_string(),
                        placeholder: placeholder.to_string(),
                        reason: "it is unresolved and does not have any default value".to_string(),
                    });
                }
            }
        } else {
            variable.value().to_string()
        };

        rewritten.push_str(&current[last..occurrence.start()]);
        rewritten.push_str(&substitute);
        last = occurrence.end();
    }

    if matched {
        rewritten.push_str(&current[last..]);
        *value = rewritten;
    }
    Ok(matched)
}
