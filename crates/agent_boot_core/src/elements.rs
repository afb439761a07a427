//! Extraction of the boot elements from a resolved descriptor.

use std::path::Path;

use descriptor_engine::{DescriptorError, Element};
use regex::Regex;
use tracing::warn;

use crate::errors::BootResult;

#[cfg(test)]
#[path = "elements_tests.rs"]
mod tests;

const DELEGATE_ELEMENT: &str = "delegate";
const CLASSPATH_ELEMENT: &str = "classpath";
const ENTRY_ELEMENT: &str = "entry";
const FILTER_ELEMENT: &str = "filter";
const INCLUDE_ELEMENT: &str = "include";
const EXCLUDE_ELEMENT: &str = "exclude";
const CONFIGURATION_ELEMENT: &str = "configuration";

/// When no include filter is declared, everything is a candidate.
const MATCH_EVERYTHING: &str = ".+";

/// Everything the host needs from a fully substituted descriptor.
///
/// `BootElements` is immutable once constructed.
#[derive(Debug)]
pub struct BootElements {
    delegate_name: String,
    classpath: Vec<String>,
    include_filters: Vec<Regex>,
    exclude_filters: Vec<Regex>,
    configuration: Option<Element>,
}

impl BootElements {
    /// Collects the delegate name, classpath entries, filters and the
    /// configuration subtree from the document root.
    ///
    /// The delegate name is mandatory. Classpath entries that do not
    /// exist on disk are logged and dropped rather than failing the boot.
    /// The include filter list falls back to a single match-everything
    /// pattern when the descriptor declares none.
    pub fn from_document(root: &Element) -> BootResult<Self> {
        let delegate_name = root
            .child(DELEGATE_ELEMENT)
            .map(|delegate| delegate.text().trim().to_string())
            .unwrap_or_default();
        if delegate_name.is_empty() {
            return Err(DescriptorError::MissingRequiredField {
                reason: format!("the {DELEGATE_ELEMENT} element is mandatory and must not be blank"),
            }
            .into());
        }

        let mut classpath = Vec::new();
        if let Some(classpath_element) = root.child(CLASSPATH_ELEMENT) {
            for entry in classpath_element.children_named(ENTRY_ELEMENT) {
                let entry = entry.text();
                if entry.trim().is_empty() {
                    continue;
                }
                // Stay lenient: a stale entry should not abort the boot.
                if !Path::new(&entry).exists() {
                    warn!("Classpath entry is invalid: {} - dropping it", entry);
                    continue;
                }
                classpath.push(entry);
            }
        }

        let filter = root.child(FILTER_ELEMENT);
        let mut include_filters = compile_filters(filter, INCLUDE_ELEMENT)?;
        if include_filters.is_empty() {
            include_filters.push(
                Regex::new(MATCH_EVERYTHING).map_err(|e| DescriptorError::Parse {
                    reason: e.to_string(),
                })?,
            );
        }
        let exclude_filters = compile_filters(filter, EXCLUDE_ELEMENT)?;

        let configuration = root.child(CONFIGURATION_ELEMENT).cloned();

        Ok(BootElements {
            delegate_name,
            classpath,
            include_filters,
            exclude_filters,
            configuration,
        })
    }

    pub fn delegate_name(&self) -> &str {
        &self.delegate_name
    }

    pub fn classpath(&self) -> &[String] {
        &self.classpath
    }

    pub fn include_filters(&self) -> &[Regex] {
        &self.include_filters
    }

    pub fn exclude_filters(&self) -> &[Regex] {
        &self.exclude_filters
    }

    pub fn configuration(&self) -> Option<&Element> {
        self.configuration.as_ref()
    }
}

fn compile_filters(filter: Option<&Element>, kind: &str) -> BootResult<Vec<Regex>> {
    let mut compiled = Vec::new();
    let Some(filter) = filter else {
        return Ok(compiled);
    };
    for pattern in filter.children_named(kind) {
        let pattern = pattern.text();
        if pattern.trim().is_empty() {
            continue;
        }
        let regex = Regex::new(&pattern).map_err(|e| DescriptorError::Parse {
            reason: format!("invalid {kind} filter pattern \"{pattern}\": {e}"),
        })?;
        compiled.push(regex);
    }
    Ok(compiled)
}
