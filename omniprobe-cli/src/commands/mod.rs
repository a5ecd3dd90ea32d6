//! Command handlers and the shared startup steps they need

pub mod list;
pub mod run;

use std::io::Write;

use tracing::debug;

use omniprobe_core::config::ProbeConfig;
use omniprobe_harness::{ScenarioLoader, ScenarioRegistry};

use crate::cli::Cli;
use crate::error::CliError;
use crate::output::OutputWriter;

/// Load the effective configuration: defaults < file < environment < flags.
pub async fn load_config(cli: &Cli) -> Result<ProbeConfig, CliError> {
    let mut config = ProbeConfig::load_or_default(cli.config.as_deref()).await?;
    cli.apply_overrides(&mut config);
    config.validate()?;
    Ok(config)
}

/// Built-in catalog followed by the scenarios from `[scenarios] files`.
pub async fn build_registry(config: &ProbeConfig) -> Result<ScenarioRegistry, CliError> {
    let mut registry = ScenarioRegistry::builtin();
    if !config.scenarios.files.is_empty() {
        let extra = ScenarioLoader::load_files(&config.scenarios.files).await?;
        debug!(count = extra.len(), "registering scenarios from files");
        registry.extend(extra)?;
    }
    Ok(registry)
}

/// Dispatch to listing or running. Returns the process exit code.
pub async fn execute(
    cli: &Cli,
    config: &ProbeConfig,
    out: &mut dyn Write,
) -> Result<i32, CliError> {
    let writer = OutputWriter::new(cli.output);
    let registry = build_registry(config).await?;

    if cli.list {
        list::execute(&registry, &writer, out)?;
        return Ok(0);
    }

    run::execute(config, &registry, &cli.selection(), &writer, out).await
}
