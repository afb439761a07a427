//! Descriptor engine error types.
//!
//! Domain-specific errors for descriptor parsing, placeholder resolution,
//! and configuration shape classification. All of these are fatal for the
//! bootstrap: the engine never retries and never applies a configuration
//! partially.

use thiserror::Error;

#[cfg(test)]
#[path = "errors_tests.rs"]
mod tests;

/// Errors raised while resolving a descriptor or materializing its
/// configuration subtree.
///
/// Every variant carries enough context (element or attribute name,
/// placeholder text) for a caller to report the failure precisely.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DescriptorError {
    /// The descriptor path was not supplied, or the file does not exist.
    #[error("Descriptor input missing: {reason}")]
    MissingInput { reason: String },

    /// The descriptor could not be read or is not well-formed XML.
    #[error("Failed to parse descriptor: {reason}")]
    Parse { reason: String },

    /// A placeholder has no matching variable, parameter, property or
    /// environment entry, and no default to fall back to.
    #[error("{location} has an unrecognised variable {placeholder}: {reason}")]
    UnresolvedReference {
        /// Element name, or `element[@attribute]` for attribute content.
        location: String,
        /// The offending placeholder, including the `${` and `}` markers.
        placeholder: String,
        reason: String,
    },

    /// Placeholder resolution did not reach a fixed point within the
    /// engine's bounds; variable definitions reference each other cyclically.
    #[error("Variable resolution did not reach a fixed point while resolving {context}")]
    CyclicReference { context: String },

    /// The configuration subtree mixes mutually exclusive structures
    /// (keyed and keyless items, or a custom element next to text).
    #[error("Configuration structure is ambiguous: {reason}")]
    AmbiguousShape { reason: String },

    /// A mandatory field is absent or blank.
    #[error("Required descriptor field missing: {reason}")]
    MissingRequiredField { reason: String },

    /// The external unmarshaller rejected the custom configuration element.
    #[error("Custom configuration could not be unmarshalled: {reason}")]
    Unmarshal { reason: String },
}

/// Result type alias for descriptor engine operations.
pub type DescriptorResult<T> = Result<T, DescriptorError>;
