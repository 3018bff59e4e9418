//! # Cavern Sim
//!
//! In-memory hosts for both missions. They own the cavern and the agent's
//! position and enforce the rules the planners are held to: moves only along
//! edges, gold only where it lies, time never overspent.

pub mod escape;
pub mod exploration;

pub use escape::EscapeSim;
pub use exploration::ExplorationSim;
