//! Descriptor loading from disk.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use descriptor_engine::{parse_document, DescriptorError, Element};
use tracing::debug;

use crate::errors::BootResult;
use crate::params::DESCRIPTOR_PATH_KEY;

#[cfg(test)]
#[path = "loader_tests.rs"]
mod tests;

/// Reads and parses the descriptor file named by the invocation
/// parameters.
///
/// A missing path or a nonexistent file is a
/// [`DescriptorError::MissingInput`]; an unreadable or malformed file is a
/// [`DescriptorError::Parse`].
pub fn load_descriptor(params: &HashMap<String, String>) -> BootResult<Element> {
    let Some(path) = params.get(DESCRIPTOR_PATH_KEY) else {
        return Err(DescriptorError::MissingInput {
            reason: "the component descriptor file is not defined".to_string(),
        }
        .into());
    };

    if !Path::new(path).exists() {
        return Err(DescriptorError::MissingInput {
            reason: format!("the component descriptor file \"{path}\" does not exist"),
        }
        .into());
    }

    let contents = fs::read_to_string(path).map_err(|e| DescriptorError::Parse {
        reason: format!("IO error with the component descriptor file \"{path}\": {e}"),
    })?;

    debug!("Loaded component descriptor from {}", path);
    Ok(parse_document(&contents)?)
}
