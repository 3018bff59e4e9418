//! Blind exploration: depth-first search guided by distance to the orb.
//!
//! The explorer only ever sees the current node and its open neighbours.
//! It keeps its bookkeeping in an [`ExplorationSession`] owned by the
//! caller, so one [`Explorer`] can drive any number of missions.

use std::collections::HashSet;

use cavern_core::{CavernError, ExplorationReport, ExplorationState, NodeId, Outcome, Result};
use chrono::Utc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::planner::ExplorerConfig;

/// Bookkeeping for one exploration.
#[derive(Debug, Clone)]
pub struct ExplorationSession {
    id: Uuid,
    /// Nodes stood on so far.
    visited: HashSet<NodeId>,
    /// Nodes where more than one unvisited neighbour was left.
    forks: Vec<NodeId>,
    /// Nodes left behind by forward moves, most recent on top.
    path: Vec<NodeId>,
    moves: usize,
    backtracks: usize,
}

impl ExplorationSession {
    /// Start an empty session.
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            visited: HashSet::new(),
            forks: Vec::new(),
            path: Vec::new(),
            moves: 0,
            backtracks: 0,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn visited(&self) -> &HashSet<NodeId> {
        &self.visited
    }

    pub fn forks(&self) -> &[NodeId] {
        &self.forks
    }

    pub fn path(&self) -> &[NodeId] {
        &self.path
    }

    /// Moves made, backtracking included.
    pub fn moves(&self) -> usize {
        self.moves
    }

    pub fn backtracks(&self) -> usize {
        self.backtracks
    }

    fn mark_visited(&mut self, node: NodeId) {
        if self.visited.insert(node) {
            debug!(session = %self.id, node = %node, "Marked visited");
        }
    }
}

impl Default for ExplorationSession {
    fn default() -> Self {
        Self::new()
    }
}

/// What a single exploration step did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// Standing on the orb; nothing was done.
    Arrived,
    /// Moved one node forward.
    Advanced {
        from: NodeId,
        to: NodeId,
        /// Whether `from` was recorded as a fork.
        fork: bool,
    },
    /// Walked back to the most recent fork.
    Backtracked { fork: NodeId, replayed: usize },
}

/// Depth-first explorer.
#[derive(Debug, Clone, Default)]
pub struct Explorer {
    config: ExplorerConfig,
}

impl Explorer {
    /// Create a new explorer with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new explorer with custom configuration.
    pub fn with_config(config: ExplorerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ExplorerConfig {
        &self.config
    }

    /// Explore until standing on the orb.
    pub fn explore<S: ExplorationState>(&self, state: &mut S) -> Result<ExplorationReport> {
        let started_at = Utc::now();
        let mut session = ExplorationSession::new();

        info!(
            session = %session.id(),
            start = %state.current_location(),
            "Starting exploration"
        );

        loop {
            match self.step(&mut session, state)? {
                StepOutcome::Arrived => break,
                StepOutcome::Advanced { .. } | StepOutcome::Backtracked { .. } => {}
            }
        }

        let target = state.current_location();
        session.mark_visited(target);

        info!(
            session = %session.id(),
            target = %target,
            moves = session.moves(),
            backtracks = session.backtracks(),
            "Orb found"
        );

        Ok(ExplorationReport {
            id: session.id(),
            target,
            moves: session.moves(),
            backtracks: session.backtracks(),
            nodes_visited: session.visited().len(),
            outcome: Outcome::Success,
            started_at,
            finished_at: Utc::now(),
        })
    }

    /// Make one decision: a single forward move or one full retreat to
    /// the last fork.
    pub fn step<S: ExplorationState>(
        &self,
        session: &mut ExplorationSession,
        state: &mut S,
    ) -> Result<StepOutcome> {
        if state.distance_to_target() == 0 {
            return Ok(StepOutcome::Arrived);
        }

        let current = state.current_location();

        let mut neighbours = state.neighbours();
        neighbours.sort();
        let unvisited: Vec<NodeId> = neighbours
            .iter()
            .map(|n| n.id)
            .filter(|id| !session.visited.contains(id))
            .collect();

        session.mark_visited(current);

        match unvisited.as_slice() {
            [] => self.backtrack(session, state, current),
            [only] => {
                session.path.push(current);
                self.advance(session, state, current, *only, false)
            }
            [nearest, ..] => {
                session.forks.push(current);
                session.path.push(current);
                self.advance(session, state, current, *nearest, true)
            }
        }
    }

    fn advance<S: ExplorationState>(
        &self,
        session: &mut ExplorationSession,
        state: &mut S,
        from: NodeId,
        to: NodeId,
        fork: bool,
    ) -> Result<StepOutcome> {
        self.check_move_limit(session)?;
        state.move_to(to)?;
        session.moves += 1;
        debug!(from = %from, to = %to, fork, "Advanced");
        Ok(StepOutcome::Advanced { from, to, fork })
    }

    fn backtrack<S: ExplorationState>(
        &self,
        session: &mut ExplorationSession,
        state: &mut S,
        at: NodeId,
    ) -> Result<StepOutcome> {
        let underflow = |session: &ExplorationSession| CavernError::BacktrackUnderflow {
            at,
            visited: session.visited.len(),
        };

        let Some(fork) = session.forks.pop() else {
            warn!(at = %at, "Dead end with no fork left to return to");
            return Err(underflow(session));
        };

        let mut replayed = 0;
        loop {
            let Some(there) = session.path.pop() else {
                warn!(at = %at, fork = %fork, "Path exhausted before reaching fork");
                return Err(underflow(session));
            };
            self.check_move_limit(session)?;
            state.move_to(there)?;
            session.moves += 1;
            replayed += 1;
            if there == fork {
                break;
            }
        }

        session.backtracks += 1;
        debug!(from = %at, fork = %fork, replayed, "Backtracked");
        Ok(StepOutcome::Backtracked { fork, replayed })
    }

    fn check_move_limit(&self, session: &ExplorationSession) -> Result<()> {
        if session.moves >= self.config.max_moves {
            warn!(limit = self.config.max_moves, "Exploration move limit reached");
            return Err(CavernError::StepLimitExceeded {
                limit: self.config.max_moves,
            });
        }
        Ok(())
    }
}
