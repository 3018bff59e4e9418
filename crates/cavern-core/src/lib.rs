//! # Cavern Core
//!
//! Core primitives and types shared by the cavern planners and their hosts.
//!
//! This crate provides the fundamental building blocks:
//! - [`Cavern`] - The weighted, undirected cave graph
//! - [`ExplorationState`] / [`EscapeState`] - What a host exposes to the planners
//! - [`ExplorationReport`] / [`EscapeReport`] - Outcome of each mission
//! - [`CavernError`] - Error taxonomy

pub mod cavern;
pub mod error;
pub mod report;
pub mod state;
pub mod types;

// Re-exports for convenience
pub use cavern::{Cavern, CavernBuilder, Edge, Node};
pub use error::{CavernError, Result};
pub use report::{EscapeReport, ExplorationReport, Outcome};
pub use state::{EscapeState, ExplorationState};
pub use types::*;

/// Prelude module for common imports
pub mod prelude {
    pub use crate::cavern::{Cavern, CavernBuilder, Edge, Node};
    pub use crate::error::{CavernError, Result};
    pub use crate::report::{EscapeReport, ExplorationReport, Outcome};
    pub use crate::state::{EscapeState, ExplorationState};
    pub use crate::types::{MissionStatus, NeighbourStatus, NodeId, Tile, Weight};
}
