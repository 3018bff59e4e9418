//! Common types used across the cavern crates.

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Cost unit for edges, budgets and exploration distances.
pub type Weight = u64;

/// Stable identifier of a cavern node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub u64);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl From<u64> for NodeId {
    fn from(id: u64) -> Self {
        NodeId(id)
    }
}

/// Grid position of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Tile {
    pub row: i64,
    pub column: i64,
}

impl Tile {
    /// Create a tile at the given row and column.
    pub fn new(row: i64, column: i64) -> Self {
        Self { row, column }
    }

    /// Straight-line distance to another tile.
    pub fn euclidean_distance(&self, other: &Tile) -> f64 {
        let dr = (self.row - other.row) as f64;
        let dc = (self.column - other.column) as f64;
        (dr * dr + dc * dc).sqrt()
    }

    /// Taxicab distance to another tile, ignoring walls.
    pub fn manhattan_distance(&self, other: &Tile) -> Weight {
        self.row.abs_diff(other.row) + self.column.abs_diff(other.column)
    }
}

/// One neighbour as seen while exploring: its id and its
/// wall-ignoring distance to the target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NeighbourStatus {
    pub id: NodeId,
    pub distance: Weight,
}

impl NeighbourStatus {
    pub fn new(id: NodeId, distance: Weight) -> Self {
        Self { id, distance }
    }
}

// Nearest first; equal distances fall back to the id so sorting is deterministic.
impl Ord for NeighbourStatus {
    fn cmp(&self, other: &Self) -> Ordering {
        self.distance
            .cmp(&other.distance)
            .then_with(|| self.id.cmp(&other.id))
    }
}

impl PartialOrd for NeighbourStatus {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Status of a mission run by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissionStatus {
    /// Looking for the orb with local sensing only.
    Exploring,
    /// Heading for the exit with the full map.
    Escaping,
    /// Both phases finished successfully.
    Complete,
    /// A phase failed and the mission cannot recover.
    Failed,
}

impl MissionStatus {
    /// Returns true if this is a terminal state.
    pub fn is_terminal(&self) -> bool {
        matches!(self, MissionStatus::Complete | MissionStatus::Failed)
    }

    /// Returns true if a phase is currently running.
    pub fn is_active(&self) -> bool {
        matches!(self, MissionStatus::Exploring | MissionStatus::Escaping)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mission_status_terminal() {
        assert!(MissionStatus::Complete.is_terminal());
        assert!(MissionStatus::Failed.is_terminal());
        assert!(!MissionStatus::Escaping.is_terminal());
    }

    #[test]
    fn test_mission_status_active() {
        assert!(MissionStatus::Exploring.is_active());
        assert!(MissionStatus::Escaping.is_active());
        assert!(!MissionStatus::Complete.is_active());
    }

    #[test]
    fn test_tile_distances() {
        let a = Tile::new(0, 0);
        let b = Tile::new(3, 4);
        assert_eq!(a.manhattan_distance(&b), 7);
        assert!((a.euclidean_distance(&b) - 5.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_neighbour_ordering_breaks_ties_by_id() {
        let mut neighbours = vec![
            NeighbourStatus::new(NodeId(7), 2),
            NeighbourStatus::new(NodeId(3), 2),
            NeighbourStatus::new(NodeId(9), 1),
        ];
        neighbours.sort();
        let ids: Vec<_> = neighbours.iter().map(|n| n.id).collect();
        assert_eq!(ids, vec![NodeId(9), NodeId(3), NodeId(7)]);
    }
}
