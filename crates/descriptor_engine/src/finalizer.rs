//! Publication of defaults for variables that stayed unresolved.
//!
//! Runs once, after both substitution passes have stabilized. Consumers
//! outside this engine may resolve the same names later through the
//! property namespace; installing the defaults here keeps those later
//! resolutions consistent with what the engine fell back to.

use tracing::debug;

use crate::resolver::{placeholder_regex, EnvSource};
use crate::variables::VariableStore;

#[cfg(test)]
#[path = "finalizer_tests.rs"]
mod tests;

/// Installs the default of every variable whose value still contains a
/// placeholder, as a named property under the referenced name.
///
/// A referenced name already satisfied by a property or environment entry
/// is left alone. Only the first unresolved reference per variable is
/// finalized; a variable without a default is skipped.
pub fn finalize_unresolved(store: &VariableStore, env: &mut dyn EnvSource) {
    let regex = placeholder_regex();
    for (name, variable) in store.entries() {
        for captures in regex.captures_iter(variable.value()) {
            let referenced = &captures[1];
            if env.env_var(referenced).is_some() || env.property(referenced).is_some() {
                continue;
            }
            match variable.default() {
                Some(default) => {
                    debug!(
                        "Variable {} references the unresolved name {}; installing its default as a property: {}",
                        name, referenced, default
                    );
                    env.set_property(referenced, default);
                }
                None => {
                    debug!(
                        "Variable {} references the unresolved name {} but has no default; skipping it",
                        name, referenced
                    );
                }
            }
            // Only the first unresolved reference per variable.
            break;
        }
    }
}
