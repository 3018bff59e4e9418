//! # Cavern Runner
//!
//! Loads a scenario, runs exploration then escape, and prints the mission
//! summary as JSON.

use std::path::PathBuf;

use anyhow::Context;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod config;
mod engine;

use config::Scenario;
use engine::Engine;

/// Environment variable consulted when no path is given on the command line.
const SCENARIO_ENV: &str = "CAVERN_SCENARIO";

fn scenario_path() -> anyhow::Result<PathBuf> {
    std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .or_else(|| std::env::var_os(SCENARIO_ENV).map(PathBuf::from))
        .with_context(|| format!("usage: cavern-runner <scenario.json> (or set {SCENARIO_ENV})"))
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let path = scenario_path()?;
    info!("🚀 Loading scenario {}", path.display());
    let scenario = Scenario::load(&path)?;

    let mut engine = Engine::new(scenario);
    let summary = engine.run();

    println!("{}", serde_json::to_string_pretty(&summary)?);

    if let Some(error) = summary.error {
        anyhow::bail!("mission failed: {error}");
    }
    Ok(())
}
