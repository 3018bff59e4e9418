//! Mission engine: runs exploration, then escape, against in-memory hosts.

use cavern_core::{EscapeReport, EscapeState, ExplorationReport, MissionStatus, Result};
use cavern_planner::{EscapeRouter, Explorer};
use cavern_sim::{EscapeSim, ExplorationSim};
use chrono::Utc;
use serde::Serialize;
use tracing::{error, info};

use crate::config::Scenario;

/// What a finished mission produced.
#[derive(Debug, Clone, Serialize)]
pub struct MissionSummary {
    pub status: MissionStatus,
    pub exploration: Option<ExplorationReport>,
    pub escape: Option<EscapeReport>,
    /// Error message (if failed).
    pub error: Option<String>,
}

/// Drives one scenario through both phases in order.
pub struct Engine {
    scenario: Scenario,
    status: MissionStatus,
}

impl Engine {
    /// Create a new engine.
    pub fn new(scenario: Scenario) -> Self {
        Self {
            scenario,
            status: MissionStatus::Exploring,
        }
    }

    pub fn status(&self) -> MissionStatus {
        self.status
    }

    /// Run both phases to a terminal state.
    pub fn run(&mut self) -> MissionSummary {
        let mut summary = MissionSummary {
            status: self.status,
            exploration: None,
            escape: None,
            error: None,
        };

        if let Err(e) = self.run_phases(&mut summary) {
            match e.node() {
                Some(node) => error!(
                    "❌ Mission failed during {:?} at {}: {}",
                    self.status, node, e
                ),
                None => error!("❌ Mission failed during {:?}: {}", self.status, e),
            }
            self.status = MissionStatus::Failed;
            summary.error = Some(e.to_string());
        }

        summary.status = self.status;
        summary
    }

    fn run_phases(&mut self, summary: &mut MissionSummary) -> Result<()> {
        let scenario = &self.scenario;

        self.status = MissionStatus::Exploring;
        info!("🔦 Exploring from {} for the orb", scenario.start);
        let mut exploration =
            ExplorationSim::new(scenario.cavern.clone(), scenario.start, scenario.target)?;
        let explorer = Explorer::with_config(scenario.explorer.clone());
        let report = explorer.explore(&mut exploration)?;
        info!(
            "✅ Orb found at {} after {} moves",
            report.target, report.moves
        );
        let orb = report.target;
        summary.exploration = Some(report);

        self.status = MissionStatus::Escaping;
        info!(
            "🏃 Escaping from {} to {} with {} time",
            orb, scenario.exit, scenario.time_budget
        );
        let mut escape = EscapeSim::new(
            exploration.into_cavern(),
            orb,
            scenario.exit,
            scenario.time_budget,
        )?;
        let router = EscapeRouter::with_config(scenario.router.clone());
        let started_at = Utc::now();
        let report = match router.escape(&mut escape) {
            Ok(report) => report,
            Err(e) => {
                let remaining = escape.time_remaining();
                summary.escape = Some(EscapeReport::failed(
                    escape.history().to_vec(),
                    scenario.time_budget - remaining,
                    escape.gold_collected(),
                    remaining,
                    e.to_string(),
                    started_at,
                ));
                return Err(e);
            }
        };
        info!(
            "✅ Escaped with {} gold and {} time to spare",
            report.gold_collected, report.time_remaining
        );
        summary.escape = Some(report);

        self.status = MissionStatus::Complete;
        Ok(())
    }
}
