//! What a host simulation exposes to the planners.
//!
//! Both traits are synchronous. The host owns the cavern and the agent's
//! position; the planners only read through these methods and mutate
//! through `move_to` / `pick_up_gold`.

use crate::cavern::Cavern;
use crate::error::Result;
use crate::types::{NeighbourStatus, NodeId, Weight};

/// Local view available while searching for the orb.
pub trait ExplorationState {
    /// Node the agent is standing on.
    fn current_location(&self) -> NodeId;

    /// Wall-ignoring distance to the orb; zero exactly when standing on it.
    fn distance_to_target(&self) -> Weight;

    /// Open neighbours of the current node.
    fn neighbours(&self) -> Vec<NeighbourStatus>;

    /// Step to an adjacent node.
    ///
    /// Fails with [`CavernError::InvalidMove`](crate::CavernError::InvalidMove)
    /// if `id` is not a neighbour.
    fn move_to(&mut self, id: NodeId) -> Result<()>;
}

/// Full view available while escaping.
pub trait EscapeState {
    /// Node the agent is standing on.
    fn current_node(&self) -> NodeId;

    /// The exit node.
    fn exit(&self) -> NodeId;

    /// The whole cavern, with gold as it currently lies.
    fn cavern(&self) -> &Cavern;

    /// Budget left before the ceiling collapses.
    fn time_remaining(&self) -> Weight;

    /// Step to an adjacent node, charging the edge weight.
    fn move_to(&mut self, id: NodeId) -> Result<()>;

    /// Pick up the gold on the current node and return the amount.
    ///
    /// Fails with [`CavernError::NothingToCollect`](crate::CavernError::NothingToCollect)
    /// if there is none.
    fn pick_up_gold(&mut self) -> Result<Weight>;
}
