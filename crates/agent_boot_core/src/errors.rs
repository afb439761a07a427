//! Bootstrap error types.

use descriptor_engine::DescriptorError;
use thiserror::Error;

#[cfg(test)]
#[path = "errors_tests.rs"]
mod tests;

/// Errors surfaced while booting a component from its descriptor.
///
/// Resolution and classification failures pass through from the
/// descriptor engine unchanged; the only failure this crate adds is the
/// component's own entry point reporting an error.
#[derive(Error, Debug)]
pub enum BootError {
    #[error(transparent)]
    Descriptor(#[from] DescriptorError),

    /// The component delegate's boot entry point failed.
    #[error("Component delegate failed to boot: {reason}")]
    Delegate { reason: String },
}

/// Result type alias for bootstrap operations.
pub type BootResult<T> = Result<T, BootError>;
