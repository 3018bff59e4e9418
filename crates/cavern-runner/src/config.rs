//! Scenario files.

use std::path::Path;

use anyhow::Context;
use cavern_core::{Cavern, NodeId, Result, Weight};
use cavern_planner::{ExplorerConfig, RouterConfig};
use serde::{Deserialize, Serialize};

/// Everything needed to run both missions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scenario {
    /// The cave graph.
    pub cavern: Cavern,

    /// Where exploration starts.
    pub start: NodeId,

    /// Where the orb lies; the escape starts here.
    pub target: NodeId,

    /// The exit.
    pub exit: NodeId,

    /// Time available for the escape.
    pub time_budget: Weight,

    #[serde(default)]
    pub explorer: ExplorerConfig,

    #[serde(default)]
    pub router: RouterConfig,
}

impl Scenario {
    /// Parse a scenario from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read and parse a scenario file.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("reading scenario {}", path.display()))?;
        Self::from_json(&json).with_context(|| format!("parsing scenario {}", path.display()))
    }
}
