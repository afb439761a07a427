//! Classification of the configuration subtree into a typed shape.
//!
//! The `configuration` element of a resolved descriptor materializes as
//! exactly one of five shapes. Consumers pattern-match the closed enum
//! instead of type-testing an untyped container at every use site.

use std::collections::HashMap;

use serde::Serialize;
use tracing::debug;

use crate::document::{Element, Node};
use crate::errors::{DescriptorError, DescriptorResult};

#[cfg(test)]
#[path = "classifier_tests.rs"]
mod tests;

const ITEM_ELEMENT: &str = "item";
const CUSTOM_ELEMENT: &str = "custom";
const KEY_ATTRIBUTE: &str = "key";

/// The materialized configuration handed to the booted component.
///
/// `OrderedList` and `Mapping` are mutually exclusive outcomes for the
/// same subtree, as are `Scalar` and `Custom`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ConfigurationShape {
    /// No configuration subtree was present.
    Absent,
    /// A single trimmed text value.
    Scalar(String),
    /// The text of each keyless `<item>` entry, in document order.
    OrderedList(Vec<String>),
    /// Key marker to entry text, for uniformly keyed `<item>` entries.
    Mapping(HashMap<String, String>),
    /// Opaque value produced by the component's own unmarshaller from the
    /// `<custom>` element.
    Custom(serde_json::Value),
}

/// Capability supplied by the component being configured: turns the raw
/// `<custom>` element into the component's own configuration value.
pub trait Unmarshaller {
    fn unmarshal(&self, node: &Element) -> Result<serde_json::Value, String>;
}

/// Classifies the configuration subtree, if any, into its shape.
///
/// An absent subtree is a valid `Absent` outcome, not an error. Mixed
/// keyed/keyless items, or a `<custom>` element next to non-blank text,
/// fail with [`DescriptorError::AmbiguousShape`]; a blank scalar fails
/// with [`DescriptorError::MissingRequiredField`].
pub fn classify(
    subtree: Option<&Element>,
    unmarshaller: &dyn Unmarshaller,
) -> DescriptorResult<ConfigurationShape> {
    let Some(configuration) = subtree else {
        return Ok(ConfigurationShape::Absent);
    };

    let items: Vec<&Element> = configuration.children_named(ITEM_ELEMENT).collect();
    if !items.is_empty() {
        return classify_items(&items);
    }

    // Scan children in order; a custom element and non-blank text are
    // mutually exclusive.
    let mut text_found = false;
    let mut custom: Option<&Element> = None;
    for node in &configuration.children {
        match node {
            Node::Text(text) if !text.trim().is_empty() => text_found = true,
            Node::Element(element) if element.name == CUSTOM_ELEMENT => {
                custom = Some(element);
                break;
            }
            _ => {}
        }
    }
    if text_found && custom.is_some() {
        return Err(DescriptorError::AmbiguousShape {
            reason: format!(
                "a {CUSTOM_ELEMENT} element cannot co-exist with a text value under the configuration element"
            ),
        });
    }

    if let Some(custom) = custom {
        debug!("handing the custom configuration element to the component unmarshaller");
        let value = unmarshaller
            .unmarshal(custom)
            .map_err(|reason| DescriptorError::Unmarshal { reason })?;
        return Ok(ConfigurationShape::Custom(value));
    }

    let text = configuration.text();
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(DescriptorError::MissingRequiredField {
            reason: "the configuration element does not have a proper string (or any other elements)"
                .to_string(),
        });
    }
    Ok(ConfigurationShape::Scalar(trimmed.to_string()))
}

/// Either every entry carries a key marker (mapping) or none does
/// (ordered list); a mixture is a structure error, not a best-effort
/// merge.
fn classify_items(items: &[&Element]) -> DescriptorResult<ConfigurationShape> {
    let mut keyed = false;
    let mut keyless = false;
    for item in items {
        if item.attr(KEY_ATTRIBUTE).is_some() {
            keyed = true;
        } else {
            keyless = true;
        }
    }
    if keyed && keyless {
        return Err(DescriptorError::AmbiguousShape {
            reason: format!("configuration {ITEM_ELEMENT} entries have improper attributes"),
        });
    }

    if keyless {
        let entries = items.iter().map(|item| item.text()).collect();
        return Ok(ConfigurationShape::OrderedList(entries));
    }

    let mut mapping = HashMap::new();
    for item in items {
        let key = item.attr(KEY_ATTRIBUTE).unwrap_or_default().to_string();
        mapping.insert(key, item.text());
    }
    Ok(ConfigurationShape::Mapping(mapping))
}
