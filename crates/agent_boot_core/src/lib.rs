//! Bootstrap orchestration for descriptor-configured components.
//!
//! This crate wraps the `descriptor_engine` core with everything a host
//! process needs to boot a pluggable component:
//!
//! - Parsing the invocation string (`descriptor-path;key=value;...`)
//! - Loading the descriptor document from disk
//! - Running placeholder substitution and finalization
//! - Extracting the delegate name, classpath entries and include/exclude
//!   filters from the resolved document
//! - Handing the materialized configuration to the component through the
//!   [`ComponentDelegate`] seam

pub mod delegate;
pub mod elements;
pub mod errors;
pub mod loader;
pub mod params;

#[cfg(test)]
#[path = "lib_tests.rs"]
mod tests;

pub use delegate::{bootstrap, ComponentDelegate, VERSION_PROPERTY};
pub use elements::BootElements;
pub use errors::{BootError, BootResult};
pub use loader::load_descriptor;
pub use params::{parse_invocation, DESCRIPTOR_PATH_KEY};
