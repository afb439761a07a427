//! Descriptor resolution engine for component bootstrap.
//!
//! This crate implements the variable-resolution and configuration-materialization
//! core used to boot a pluggable runtime component from an XML descriptor:
//!
//! - Parsing the descriptor into a small owned element tree
//! - Resolving `${NAME}` placeholders against a layered set of sources
//!   (declared variables, invocation parameters, named properties,
//!   environment entries) with default-value fallback
//! - Rewriting the whole document to a fixed point, rescanning variable
//!   declarations between sweeps because substitution can redefine them
//! - Publishing defaults of still-unresolved variables as named properties
//! - Classifying the `configuration` subtree into one of five typed shapes
//!
//! Locating the descriptor, loading the component and invoking its entry
//! point are handled by the `agent_boot_core` crate; this crate only sees a
//! parsed document and an injected environment source.

pub mod classifier;
pub mod document;
pub mod errors;
pub mod finalizer;
pub mod resolver;
pub mod substitution;
pub mod variables;

pub use classifier::{classify, ConfigurationShape, Unmarshaller};
pub use document::{parse_document, Element, Node};
pub use errors::{DescriptorError, DescriptorResult};
pub use finalizer::finalize_unresolved;
pub use resolver::{EnvSource, ProcessEnv};
pub use substitution::substitute_document;
pub use variables::{VariableStore, VariableValue};
