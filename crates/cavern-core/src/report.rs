//! Mission reports.
//!
//! Each phase hands a report back to the host once it reaches a terminal
//! condition.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::{NodeId, Weight};

/// Outcome of a mission phase.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    /// The agent ended exactly where it had to.
    Success,
    /// The phase failed.
    Failure {
        /// The reason for failure.
        reason: String,
    },
}

impl Outcome {
    /// Check if the outcome is successful.
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success)
    }

    /// Check if the outcome is a failure.
    pub fn is_failure(&self) -> bool {
        matches!(self, Outcome::Failure { .. })
    }
}

/// Summary of a finished exploration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExplorationReport {
    /// Identifier of the exploration session.
    pub id: Uuid,

    /// Node the orb was found on.
    pub target: NodeId,

    /// Moves made, backtracking included.
    pub moves: usize,

    /// Number of times the explorer retreated to a fork.
    pub backtracks: usize,

    /// Distinct nodes stood on.
    pub nodes_visited: usize,

    /// Outcome of the phase.
    pub outcome: Outcome,

    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl ExplorationReport {
    /// Wall-clock time spent, in milliseconds.
    pub fn elapsed_ms(&self) -> i64 {
        (self.finished_at - self.started_at).num_milliseconds()
    }
}

/// Summary of a finished escape.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EscapeReport {
    /// Unique identifier for this report.
    pub id: Uuid,

    /// Every node stood on, start and exit included.
    pub route: Vec<NodeId>,

    /// Total edge weight walked.
    pub cost: Weight,

    /// Gold actually picked up.
    pub gold_collected: Weight,

    /// Gold nodes the router deliberately detoured to.
    pub detours: usize,

    /// Budget left on arrival.
    pub time_remaining: Weight,

    /// Outcome of the phase.
    pub outcome: Outcome,

    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl EscapeReport {
    /// Report for an escape that stopped before reaching the exit.
    pub fn failed(
        route: Vec<NodeId>,
        cost: Weight,
        gold_collected: Weight,
        time_remaining: Weight,
        reason: impl Into<String>,
        started_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            route,
            cost,
            gold_collected,
            detours: 0,
            time_remaining,
            outcome: Outcome::Failure {
                reason: reason.into(),
            },
            started_at,
            finished_at: Utc::now(),
        }
    }

    /// Number of moves made.
    pub fn moves(&self) -> usize {
        self.route.len().saturating_sub(1)
    }

    /// Wall-clock time spent, in milliseconds.
    pub fn elapsed_ms(&self) -> i64 {
        (self.finished_at - self.started_at).num_milliseconds()
    }
}
