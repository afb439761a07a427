//! Variable declarations and the per-pass variable store.
//!
//! `<variable name="..." default="...">value</variable>` elements directly
//! under the descriptor root declare named values. The store built from
//! them is fully replaced, never merged, every time the declarations are
//! rescanned: substitution elsewhere in the document can rewrite a
//! variable's own name or value and thereby define new derivable names.

use std::collections::HashMap;

use crate::document::{Element, Node};
use crate::errors::{DescriptorError, DescriptorResult};
use crate::resolver::{resolve_value, EnvSource};

#[cfg(test)]
#[path = "variables_tests.rs"]
mod tests;

/// Element name of a variable declaration.
pub const VARIABLE_ELEMENT: &str = "variable";

const NAME_ATTRIBUTE: &str = "name";
const DEFAULT_ATTRIBUTE: &str = "default";

/// A declared variable value with its optional default.
///
/// The value may itself still contain unresolved placeholders; the default
/// is what the substitution engine falls back to in that case. Immutable
/// for the duration of one resolution pass.
#[derive(Debug, Clone, PartialEq)]
pub struct VariableValue {
    value: String,
    default: Option<String>,
}

impl VariableValue {
    pub fn new(value: impl Into<String>, default: Option<String>) -> Self {
        VariableValue {
            value: value.into(),
            default,
        }
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn default(&self) -> Option<&str> {
        self.default.as_deref()
    }

    pub fn has_default(&self) -> bool {
        self.default.is_some()
    }
}

/// Mapping from variable name to its declared value for the current pass.
#[derive(Debug, Default)]
pub struct VariableStore {
    entries: HashMap<String, VariableValue>,
}

impl VariableStore {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&VariableValue> {
        self.entries.get(name)
    }

    pub fn entries(&self) -> impl Iterator<Item = (&String, &VariableValue)> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[cfg(test)]
    pub(crate) fn insert(&mut self, name: impl Into<String>, value: VariableValue) {
        self.entries.insert(name.into(), value);
    }

    /// Builds a fresh store from the `<variable>` declarations directly
    /// under the root element.
    ///
    /// Each declaration's value and default are resolved against the store
    /// built so far (declaration order matters) plus the parameter,
    /// property and environment layers. A resolved default is written back
    /// into the element's `default` attribute so later rescans observe it.
    ///
    /// Fails with [`DescriptorError::MissingRequiredField`] when any
    /// declaration lacks the mandatory `name` attribute.
    pub fn rebuild(
        root: &mut Element,
        params: &HashMap<String, String>,
        env: &dyn EnvSource,
    ) -> DescriptorResult<Self> {
        let mut store = VariableStore::empty();
        for node in root.children.iter_mut() {
            let Node::Element(declaration) = node else {
                continue;
            };
            if declaration.name != VARIABLE_ELEMENT {
                continue;
            }

            let Some(name) = declaration.attr(NAME_ATTRIBUTE).map(str::to_string) else {
                return Err(DescriptorError::MissingRequiredField {
                    reason: format!(
                        "\"{NAME_ATTRIBUTE}\" attribute is mandatory on the {VARIABLE_ELEMENT} element"
                    ),
                });
            };

            let value = resolve_value(&declaration.text(), &store, params, env)?;

            let default = match declaration.attr(DEFAULT_ATTRIBUTE).map(str::to_string) {
                Some(raw_default) => {
                    let resolved = resolve_value(&raw_default, &store, params, env)?;
                    declaration.set_attr(DEFAULT_ATTRIBUTE, resolved.clone());
                    Some(resolved)
                }
                None => None,
            };

            store.entries.insert(name, VariableValue::new(value, default));
        }
        Ok(store)
    }
}
