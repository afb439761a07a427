//! CLI error types.

use agent_boot_core::BootError;
use thiserror::Error;

#[cfg(test)]
#[path = "errors_tests.rs"]
mod tests;

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Boot(#[from] BootError),

    #[error("Failed to render the resolved configuration: {0}")]
    Render(#[from] serde_json::Error),
}
