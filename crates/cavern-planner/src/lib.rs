//! # Cavern Planner
//!
//! The two mission planners: a depth-first [`Explorer`] that finds the orb
//! with one-hop sensing, and an A*-based [`EscapeRouter`] that reaches the
//! exit within budget while collecting gold.

pub mod astar;
pub mod escape;
pub mod explorer;
pub mod planner;

pub use astar::{shortest_route, Heuristic, Route, ShortestPathTree};
pub use escape::{EscapePlan, EscapeRouter};
pub use explorer::{ExplorationSession, Explorer, StepOutcome};
pub use planner::{DetourPolicy, ExplorerConfig, HeuristicKind, Router, RouterConfig};
