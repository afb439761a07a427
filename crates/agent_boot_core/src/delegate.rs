//! The component delegate seam and the boot orchestrator.

use descriptor_engine::{
    classify, finalize_unresolved, substitute_document, ConfigurationShape, Element, EnvSource,
    Unmarshaller,
};
use regex::Regex;
use tracing::{debug, info};

use crate::elements::BootElements;
use crate::errors::{BootError, BootResult};
use crate::loader::load_descriptor;
use crate::params::parse_invocation;

#[cfg(test)]
#[path = "delegate_tests.rs"]
mod tests;

/// Property under which the bootstrap publishes its own version for the
/// booted component to observe.
pub const VERSION_PROPERTY: &str = "component.boot.version";

/// The capabilities a pluggable component exposes to the bootstrap.
///
/// `unmarshal` is only called when the descriptor carries a `<custom>`
/// configuration element; `boot` receives the compiled filters and the
/// materialized configuration shape exactly once.
pub trait ComponentDelegate {
    /// Turns the raw `<custom>` element into the component's own
    /// configuration value.
    fn unmarshal(&self, node: &Element) -> Result<serde_json::Value, String>;

    /// The component's entry point.
    fn boot(
        &self,
        include_filters: &[Regex],
        exclude_filters: &[Regex],
        configuration: ConfigurationShape,
    ) -> Result<(), String>;
}

struct DelegateUnmarshaller<'a>(&'a dyn ComponentDelegate);

impl Unmarshaller for DelegateUnmarshaller<'_> {
    fn unmarshal(&self, node: &Element) -> Result<serde_json::Value, String> {
        self.0.unmarshal(node)
    }
}

/// Boots a component from its invocation string.
///
/// Fails fast: any descriptor, resolution or classification problem
/// aborts the boot before the delegate is touched.
pub fn bootstrap(
    invocation: &str,
    env: &mut dyn EnvSource,
    delegate: &dyn ComponentDelegate,
) -> BootResult<()> {
    let params = parse_invocation(invocation);
    let mut root = load_descriptor(&params)?;

    let store = substitute_document(&mut root, &params, &*env)?;
    finalize_unresolved(&store, env);

    let elements = BootElements::from_document(&root)?;
    debug!(
        "Descriptor resolved: delegate {}, {} classpath entr(ies)",
        elements.delegate_name(),
        elements.classpath().len()
    );

    let configuration = classify(elements.configuration(), &DelegateUnmarshaller(delegate))?;

    env.set_property(VERSION_PROPERTY, env!("CARGO_PKG_VERSION"));

    info!(
        "Component loaded successfully. Calling the boot entry point of {}",
        elements.delegate_name()
    );
    delegate
        .boot(
            elements.include_filters(),
            elements.exclude_filters(),
            configuration,
        )
        .map_err(|reason| BootError::Delegate { reason })?;
    info!("Component boot finished");
    Ok(())
}
