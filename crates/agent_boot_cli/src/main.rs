//! agent-boot CLI: resolve and inspect component descriptors.
//!
//! Runs the full resolution pipeline against the real process
//! environment, which makes it possible to validate a descriptor without
//! booting a host process around it.

use clap::{Args, Parser, Subcommand};
use tracing::error;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use agent_boot_core::{load_descriptor, parse_invocation, BootElements};
use descriptor_engine::{
    classify, finalize_unresolved, substitute_document, Element, ProcessEnv, Unmarshaller,
};

mod errors;
use errors::Error;

#[cfg(test)]
#[path = "main_tests.rs"]
mod tests;

/// Resolve component descriptors and inspect the configuration they
/// materialize.
#[derive(Parser)]
#[command(name = "agent-boot")]
#[command(about = "Resolve and inspect component boot descriptors", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve a descriptor and print the materialized configuration
    Resolve(DescriptorArgs),

    /// Check that a descriptor resolves without errors
    Check(DescriptorArgs),

    /// Show the CLI version
    Version,
}

#[derive(Args)]
struct DescriptorArgs {
    /// Descriptor path, optionally followed by `;key=value` parameters
    invocation: String,
}

/// Renders the `<custom>` element as generic JSON; the CLI has no
/// component to delegate unmarshalling to.
struct RawUnmarshaller;

impl Unmarshaller for RawUnmarshaller {
    fn unmarshal(&self, node: &Element) -> Result<serde_json::Value, String> {
        Ok(node.to_json())
    }
}

/// Runs the resolution pipeline and renders the outcome as JSON.
fn resolve_outcome(invocation: &str) -> Result<serde_json::Value, Error> {
    let params = parse_invocation(invocation);
    let mut root = load_descriptor(&params)?;

    let mut env = ProcessEnv::new();
    let store = substitute_document(&mut root, &params, &env).map_err(agent_boot_core::BootError::from)?;
    finalize_unresolved(&store, &mut env);

    let elements = BootElements::from_document(&root)?;
    let configuration =
        classify(elements.configuration(), &RawUnmarshaller).map_err(agent_boot_core::BootError::from)?;

    let includes: Vec<&str> = elements
        .include_filters()
        .iter()
        .map(|filter| filter.as_str())
        .collect();
    let excludes: Vec<&str> = elements
        .exclude_filters()
        .iter()
        .map(|filter| filter.as_str())
        .collect();

    Ok(serde_json::json!({
        "delegate": elements.delegate_name(),
        "classpath": elements.classpath(),
        "include": includes,
        "exclude": excludes,
        "configuration": configuration,
        "properties": env.properties(),
    }))
}

fn run(cli: Cli) -> Result<(), Error> {
    match cli.command {
        Commands::Resolve(args) => {
            let outcome = resolve_outcome(&args.invocation)?;
            println!("{}", serde_json::to_string_pretty(&outcome)?);
            Ok(())
        }
        Commands::Check(args) => {
            let outcome = resolve_outcome(&args.invocation)?;
            println!(
                "OK: delegate {}, {} classpath entr(ies)",
                outcome["delegate"].as_str().unwrap_or_default(),
                outcome["classpath"].as_array().map(Vec::len).unwrap_or_default()
            );
            Ok(())
        }
        Commands::Version => {
            println!("agent-boot {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

fn main() {
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    if let Err(error) = run(cli) {
        error!("{error}");
        eprintln!("{error}");
        std::process::exit(1);
    }
}
