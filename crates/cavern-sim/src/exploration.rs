//! Host for the orb hunt.

use cavern_core::{Cavern, CavernError, ExplorationState, NeighbourStatus, NodeId, Result, Weight};
use tracing::trace;

/// Exploration host backed by a full cavern the agent cannot see.
#[derive(Debug, Clone)]
pub struct ExplorationSim {
    cavern: Cavern,
    position: NodeId,
    target: NodeId,
    /// Every node stood on, in order.
    history: Vec<NodeId>,
}

impl ExplorationSim {
    /// Place the agent on `start` with the orb on `target`.
    pub fn new(cavern: Cavern, start: NodeId, target: NodeId) -> Result<Self> {
        cavern.node(start)?;
        cavern.node(target)?;
        Ok(Self {
            cavern,
            position: start,
            target,
            history: vec![start],
        })
    }

    pub fn cavern(&self) -> &Cavern {
        &self.cavern
    }

    pub fn target(&self) -> NodeId {
        self.target
    }

    /// Every node stood on, start included.
    pub fn history(&self) -> &[NodeId] {
        &self.history
    }

    /// Number of moves made.
    pub fn steps(&self) -> usize {
        self.history.len() - 1
    }

    /// Hand the cavern back, e.g. to start the escape.
    pub fn into_cavern(self) -> Cavern {
        self.cavern
    }

    fn distance_from(&self, id: NodeId) -> Weight {
        match (self.cavern.node(id), self.cavern.node(self.target)) {
            (Ok(node), Ok(target)) => node.tile.manhattan_distance(&target.tile),
            _ => Weight::MAX,
        }
    }
}

impl ExplorationState for ExplorationSim {
    fn current_location(&self) -> NodeId {
        self.position
    }

    fn distance_to_target(&self) -> Weight {
        if self.position == self.target {
            0
        } else {
            // Distinct tiles can coincide; never report zero off target.
            self.distance_from(self.position).max(1)
        }
    }

    fn neighbours(&self) -> Vec<NeighbourStatus> {
        self.cavern
            .node(self.position)
            .map(|node| {
                node.edges
                    .iter()
                    .map(|e| NeighbourStatus::new(e.destination, self.distance_from(e.destination)))
                    .collect()
            })
            .unwrap_or_default()
    }

    fn move_to(&mut self, id: NodeId) -> Result<()> {
        if self.cavern.edge_weight(self.position, id).is_none() {
            return Err(CavernError::InvalidMove {
                from: self.position,
                to: id,
            });
        }
        trace!(from = %self.position, to = %id, "Explorer moved");
        self.position = id;
        self.history.push(id);
        Ok(())
    }
}
