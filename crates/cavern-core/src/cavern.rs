//! The cavern graph and its builder.
//!
//! A [`Cavern`] is an undirected, weighted graph of nodes placed on grid
//! tiles. Hosts own it; the planners only ever read it.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{CavernError, Result};
use crate::types::{NodeId, Tile, Weight};

/// One direction of an undirected edge, stored on its source node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge {
    /// The node this edge leads to.
    pub destination: NodeId,

    /// Cost of traversing the edge.
    pub weight: Weight,
}

/// A cavern node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    /// Stable identifier.
    pub id: NodeId,

    /// Position on the grid.
    pub tile: Tile,

    /// Gold lying on this node, zero once picked up.
    pub gold: Weight,

    /// Outgoing edges, sorted by destination.
    pub edges: Vec<Edge>,
}

impl Node {
    /// Weight of the edge to `other`, if they are adjacent.
    pub fn edge_to(&self, other: NodeId) -> Option<Weight> {
        self.edges
            .iter()
            .find(|e| e.destination == other)
            .map(|e| e.weight)
    }

    /// Returns true if this node still holds gold.
    pub fn has_gold(&self) -> bool {
        self.gold > 0
    }
}

/// The full cave graph.
///
/// Serializes as flat `nodes` and `edges` lists; deserializing goes through
/// [`CavernBuilder`] so a parsed cavern is always valid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cavern {
    nodes: BTreeMap<NodeId, Node>,
}

impl Cavern {
    /// Create a new CavernBuilder.
    pub fn builder() -> CavernBuilder {
        CavernBuilder::new()
    }

    /// Look up a node.
    pub fn node(&self, id: NodeId) -> Result<&Node> {
        self.nodes.get(&id).ok_or(CavernError::UnknownNode(id))
    }

    /// Returns true if the node exists.
    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    /// All nodes, in id order.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    /// Neighbours of a node with the edge weights to reach them.
    pub fn neighbours(&self, id: NodeId) -> Result<impl Iterator<Item = &Edge>> {
        Ok(self.node(id)?.edges.iter())
    }

    /// Weight of the edge between two nodes, if they are adjacent.
    pub fn edge_weight(&self, from: NodeId, to: NodeId) -> Option<Weight> {
        self.nodes.get(&from)?.edge_to(to)
    }

    /// Total gold still lying in the cavern.
    pub fn total_gold(&self) -> Weight {
        self.nodes
            .values()
            .fold(0, |total: Weight, n| total.saturating_add(n.gold))
    }

    /// Number of nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns true if the cavern has no nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Returns true if no edge is shorter than the straight line between
    /// its endpoints, which makes Euclidean distance a lower bound on
    /// route cost.
    pub fn is_euclidean_admissible(&self) -> bool {
        self.nodes.values().all(|node| {
            node.edges.iter().all(|edge| {
                self.nodes.get(&edge.destination).map_or(false, |other| {
                    edge.weight as f64 >= node.tile.euclidean_distance(&other.tile)
                })
            })
        })
    }

    /// Remove and return the gold on a node. Host side only.
    pub fn take_gold(&mut self, id: NodeId) -> Result<Weight> {
        let node = self
            .nodes
            .get_mut(&id)
            .ok_or(CavernError::UnknownNode(id))?;
        if node.gold == 0 {
            return Err(CavernError::NothingToCollect { node: id });
        }
        Ok(std::mem::take(&mut node.gold))
    }
}

/// Builder for creating Caverns with a fluent API.
#[derive(Debug, Default)]
pub struct CavernBuilder {
    nodes: Vec<NodeData>,
    edges: Vec<EdgeData>,
    gold: Vec<(NodeId, Weight)>,
}

impl CavernBuilder {
    /// Create a new CavernBuilder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node at the given tile.
    pub fn node(mut self, id: u64, tile: Tile) -> Self {
        self.nodes.push(NodeData {
            id: NodeId(id),
            tile,
            gold: 0,
        });
        self
    }

    /// Place gold on a node.
    pub fn gold(mut self, id: u64, amount: Weight) -> Self {
        self.gold.push((NodeId(id), amount));
        self
    }

    /// Connect two nodes with an undirected edge.
    pub fn edge(mut self, from: u64, to: u64, weight: Weight) -> Self {
        self.edges.push(EdgeData {
            from: NodeId(from),
            to: NodeId(to),
            weight,
        });
        self
    }

    /// Build the Cavern, validating every node and edge.
    pub fn build(self) -> Result<Cavern> {
        let mut nodes = BTreeMap::new();
        for data in self.nodes {
            let node = Node {
                id: data.id,
                tile: data.tile,
                gold: data.gold,
                edges: Vec::new(),
            };
            if nodes.insert(data.id, node).is_some() {
                return Err(CavernError::InvalidCavern(format!(
                    "duplicate node {}",
                    data.id
                )));
            }
        }

        for (id, amount) in self.gold {
            let node = nodes.get_mut(&id).ok_or_else(|| {
                CavernError::InvalidCavern(format!("gold placed on unknown node {}", id))
            })?;
            node.gold = node.gold.saturating_add(amount);
        }

        for edge in self.edges {
            if edge.from == edge.to {
                return Err(CavernError::InvalidCavern(format!(
                    "self loop on {}",
                    edge.from
                )));
            }
            for id in [edge.from, edge.to] {
                if !nodes.contains_key(&id) {
                    return Err(CavernError::InvalidCavern(format!(
                        "edge {} - {} references unknown node {}",
                        edge.from, edge.to, id
                    )));
                }
            }
            for (a, b) in [(edge.from, edge.to), (edge.to, edge.from)] {
                if let Some(node) = nodes.get_mut(&a) {
                    if node.edge_to(b).is_some() {
                        return Err(CavernError::InvalidCavern(format!(
                            "duplicate edge {} - {}",
                            edge.from, edge.to
                        )));
                    }
                    node.edges.push(Edge {
                        destination: b,
                        weight: edge.weight,
                    });
                }
            }
        }

        for node in nodes.values_mut() {
            node.edges.sort_by_key(|e| e.destination);
        }

        Ok(Cavern { nodes })
    }
}

/// Flat, serializable form of a cavern.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct CavernData {
    nodes: Vec<NodeData>,
    #[serde(default)]
    edges: Vec<EdgeData>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct NodeData {
    id: NodeId,
    tile: Tile,
    #[serde(default)]
    gold: Weight,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct EdgeData {
    from: NodeId,
    to: NodeId,
    weight: Weight,
}

impl CavernData {
    fn into_cavern(self) -> Result<Cavern> {
        CavernBuilder {
            nodes: self.nodes,
            edges: self.edges,
            gold: Vec::new(),
        }
        .build()
    }

    fn from_cavern(cavern: &Cavern) -> Self {
        let mut edges = Vec::new();
        let nodes = cavern
            .nodes
            .values()
            .map(|node| {
                edges.extend(
                    node.edges
                        .iter()
                        .filter(|e| node.id < e.destination)
                        .map(|e| EdgeData {
                            from: node.id,
                            to: e.destination,
                            weight: e.weight,
                        }),
                );
                NodeData {
                    id: node.id,
                    tile: node.tile,
                    gold: node.gold,
                }
            })
            .collect();
        CavernData { nodes, edges }
    }
}

impl Serialize for Cavern {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        CavernData::from_cavern(self).serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Cavern {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        CavernData::deserialize(deserializer)?
            .into_cavern()
            .map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle() -> Cavern {
        Cavern::builder()
            .node(1, Tile::new(0, 0))
            .node(2, Tile::new(0, 1))
            .node(3, Tile::new(1, 1))
            .gold(2, 10)
            .edge(1, 2, 1)
            .edge(2, 3, 1)
            .edge(1, 3, 5)
            .build()
            .unwrap()
    }

    #[test]
    fn test_edges_are_undirected() {
        let cavern = triangle();
        assert_eq!(cavern.edge_weight(NodeId(1), NodeId(2)), Some(1));
        assert_eq!(cavern.edge_weight(NodeId(2), NodeId(1)), Some(1));
        assert_eq!(cavern.edge_weight(NodeId(3), NodeId(1)), Some(5));
        assert_eq!(cavern.neighbours(NodeId(2)).unwrap().count(), 2);
    }

    #[test]
    fn test_builder_rejects_unknown_endpoint() {
        let result = Cavern::builder()
            .node(1, Tile::new(0, 0))
            .edge(1, 2, 1)
            .build();
        assert!(matches!(result, Err(CavernError::InvalidCavern(_))));
    }

    #[test]
    fn test_builder_rejects_self_loop_and_duplicates() {
        let looped = Cavern::builder()
            .node(1, Tile::new(0, 0))
            .edge(1, 1, 1)
            .build();
        assert!(looped.is_err());

        let duplicate = Cavern::builder()
            .node(1, Tile::new(0, 0))
            .node(1, Tile::new(0, 1))
            .build();
        assert!(duplicate.is_err());
    }

    #[test]
    fn test_take_gold_once() {
        let mut cavern = triangle();
        assert_eq!(cavern.total_gold(), 10);
        assert_eq!(cavern.take_gold(NodeId(2)), Ok(10));
        assert_eq!(
            cavern.take_gold(NodeId(2)),
            Err(CavernError::NothingToCollect { node: NodeId(2) })
        );
        assert_eq!(cavern.total_gold(), 0);
    }

    #[test]
    fn test_euclidean_admissibility() {
        assert!(triangle().is_euclidean_admissible());

        let shortcut = Cavern::builder()
            .node(1, Tile::new(0, 0))
            .node(2, Tile::new(0, 5))
            .edge(1, 2, 1)
            .build()
            .unwrap();
        assert!(!shortcut.is_euclidean_admissible());
    }

    #[test]
    fn test_json_round_trip_validates() {
        let cavern = triangle();
        let json = serde_json::to_string(&cavern).unwrap();
        let parsed: Cavern = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, cavern);

        let broken = r#"{"nodes":[{"id":1,"tile":{"row":0,"column":0}}],"edges":[{"from":1,"to":4,"weight":1}]}"#;
        assert!(serde_json::from_str::<Cavern>(broken).is_err());
    }
}
