//! Error types for cavern missions.

use thiserror::Error;

use crate::types::{NodeId, Weight};

/// Main error type for cavern operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CavernError {
    /// Requested move target is not adjacent to the current node.
    #[error("Invalid move from {from} to {to}: not a neighbour")]
    InvalidMove { from: NodeId, to: NodeId },

    /// Tried to pick up gold where there is none.
    #[error("Nothing to collect at {node}")]
    NothingToCollect { node: NodeId },

    /// Fork or path stack exhausted before the target was found.
    #[error("Backtracking underflow at {at} after visiting {visited} nodes")]
    BacktrackUnderflow { at: NodeId, visited: usize },

    /// A route would cost more than the remaining budget.
    #[error("Budget exceeded: route needs {required}, remaining {remaining}")]
    BudgetExceeded { required: Weight, remaining: Weight },

    /// No path exists between the start and the exit.
    #[error("No path from {start} to exit {exit}")]
    UnreachableExit { start: NodeId, exit: NodeId },

    /// Node is not part of the cavern.
    #[error("Unknown node: {0}")]
    UnknownNode(NodeId),

    /// Cavern description failed validation.
    #[error("Invalid cavern: {0}")]
    InvalidCavern(String),

    /// Exploration made more moves than allowed.
    #[error("Exploration exceeded move limit of {limit}")]
    StepLimitExceeded { limit: usize },

    /// Route search expanded more states than allowed.
    #[error("Search exceeded maximum states explored: {limit}")]
    SearchLimitExceeded { limit: usize },

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl CavernError {
    /// Returns true if the mission can carry on after this error.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, CavernError::NothingToCollect { .. })
    }

    /// Returns the node the error is about, if any.
    pub fn node(&self) -> Option<NodeId> {
        match self {
            CavernError::InvalidMove { to, .. } => Some(*to),
            CavernError::NothingToCollect { node } => Some(*node),
            CavernError::BacktrackUnderflow { at, .. } => Some(*at),
            CavernError::UnreachableExit { exit, .. } => Some(*exit),
            CavernError::UnknownNode(id) => Some(*id),
            _ => None,
        }
    }
}

/// Convenience Result type for cavern operations.
pub type Result<T> = std::result::Result<T, CavernError>;

impl From<serde_json::Error> for CavernError {
    fn from(err: serde_json::Error) -> Self {
        CavernError::Serialization(err.to_string())
    }
}
