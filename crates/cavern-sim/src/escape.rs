//! Host for the escape.

use cavern_core::{Cavern, CavernError, EscapeState, NodeId, Result, Weight};
use tracing::trace;

/// Escape host: full map, a ticking budget and gold to pick up.
#[derive(Debug, Clone)]
pub struct EscapeSim {
    cavern: Cavern,
    position: NodeId,
    exit: NodeId,
    time_remaining: Weight,
    gold_collected: Weight,
    history: Vec<NodeId>,
}

impl EscapeSim {
    /// Place the agent on `start` with `time` units before collapse.
    pub fn new(cavern: Cavern, start: NodeId, exit: NodeId, time: Weight) -> Result<Self> {
        cavern.node(start)?;
        cavern.node(exit)?;
        Ok(Self {
            cavern,
            position: start,
            exit,
            time_remaining: time,
            gold_collected: 0,
            history: vec![start],
        })
    }

    pub fn gold_collected(&self) -> Weight {
        self.gold_collected
    }

    /// Every node stood on, start included.
    pub fn history(&self) -> &[NodeId] {
        &self.history
    }

    /// True when standing on the exit.
    pub fn escaped(&self) -> bool {
        self.position == self.exit
    }
}

impl EscapeState for EscapeSim {
    fn current_node(&self) -> NodeId {
        self.position
    }

    fn exit(&self) -> NodeId {
        self.exit
    }

    fn cavern(&self) -> &Cavern {
        &self.cavern
    }

    fn time_remaining(&self) -> Weight {
        self.time_remaining
    }

    fn move_to(&mut self, id: NodeId) -> Result<()> {
        let weight = self
            .cavern
            .edge_weight(self.position, id)
            .ok_or(CavernError::InvalidMove {
                from: self.position,
                to: id,
            })?;
        if weight > self.time_remaining {
            return Err(CavernError::BudgetExceeded {
                required: weight,
                remaining: self.time_remaining,
            });
        }
        trace!(from = %self.position, to = %id, weight, "Escaper moved");
        self.time_remaining -= weight;
        self.position = id;
        self.history.push(id);
        Ok(())
    }

    fn pick_up_gold(&mut self) -> Result<Weight> {
        let amount = self.cavern.take_gold(self.position)?;
        self.gold_collected = self.gold_collected.saturating_add(amount);
        Ok(amount)
    }
}
