//! A* route search over the cavern graph.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap, HashSet};

use cavern_core::{Cavern, CavernError, NodeId, Result, Tile, Weight};
use tracing::{debug, warn};

use crate::planner::HeuristicKind;

/// Lower bound on the remaining cost to a goal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Heuristic {
    /// Straight-line distance between tiles.
    Euclidean,
    /// Always zero, which turns A* into uniform-cost search.
    Zero,
}

impl Heuristic {
    /// Pick the heuristic for a cavern.
    ///
    /// `Auto` only trusts Euclidean distance when every edge is at least as
    /// long as the straight line between its endpoints.
    pub fn resolve(kind: HeuristicKind, cavern: &Cavern) -> Self {
        match kind {
            HeuristicKind::Euclidean => Heuristic::Euclidean,
            HeuristicKind::Zero => Heuristic::Zero,
            HeuristicKind::Auto if cavern.is_euclidean_admissible() => Heuristic::Euclidean,
            HeuristicKind::Auto => Heuristic::Zero,
        }
    }

    /// Estimate the cost from one tile to another.
    pub fn estimate(&self, from: &Tile, to: &Tile) -> f64 {
        match self {
            Heuristic::Euclidean => from.euclidean_distance(to),
            Heuristic::Zero => 0.0,
        }
    }
}

/// A path through the cavern and what it costs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    /// Every node on the path, both ends included.
    pub nodes: Vec<NodeId>,
    /// Sum of the edge weights.
    pub cost: Weight,
}

impl Route {
    /// Number of edges walked.
    pub fn moves(&self) -> usize {
        self.nodes.len().saturating_sub(1)
    }
}

/// Entry in the search frontier.
#[derive(Debug, Clone)]
struct SearchNode {
    /// Node this entry is about.
    node: NodeId,
    /// g(n): Actual cost from start.
    g_cost: Weight,
    /// f(n) = g(n) + h(n).
    f_cost: f64,
}

impl SearchNode {
    fn new(node: NodeId, g_cost: Weight, h_cost: f64) -> Self {
        Self {
            node,
            g_cost,
            f_cost: g_cost as f64 + h_cost,
        }
    }
}

impl PartialEq for SearchNode {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for SearchNode {}

impl Ord for SearchNode {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse ordering for min-heap (lower f_cost = higher priority),
        // then deeper entries first, then lower ids.
        other
            .f_cost
            .total_cmp(&self.f_cost)
            .then_with(|| self.g_cost.cmp(&other.g_cost))
            .then_with(|| other.node.cmp(&self.node))
    }
}

impl PartialOrd for SearchNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

fn reconstruct(came_from: &HashMap<NodeId, NodeId>, goal: NodeId) -> Vec<NodeId> {
    let mut path = vec![goal];
    let mut node = goal;
    while let Some(&parent) = came_from.get(&node) {
        path.push(parent);
        node = parent;
    }
    path.reverse();
    path
}

/// Find the cheapest route from `start` to `goal`.
///
/// Returns [`CavernError::UnreachableExit`] if the frontier runs dry and
/// [`CavernError::SearchLimitExceeded`] once more than `max_states` nodes
/// have been settled.
pub fn shortest_route(
    cavern: &Cavern,
    start: NodeId,
    goal: NodeId,
    heuristic: Heuristic,
    max_states: usize,
) -> Result<Route> {
    let start_tile = cavern.node(start)?.tile;
    let goal_tile = cavern.node(goal)?.tile;

    if start == goal {
        return Ok(Route {
            nodes: vec![start],
            cost: 0,
        });
    }

    let mut open_set: BinaryHeap<SearchNode> = BinaryHeap::new();
    let mut closed_set: HashSet<NodeId> = HashSet::new();
    let mut g_scores: HashMap<NodeId, Weight> = HashMap::new();
    let mut came_from: HashMap<NodeId, NodeId> = HashMap::new();

    g_scores.insert(start, 0);
    open_set.push(SearchNode::new(
        start,
        0,
        heuristic.estimate(&start_tile, &goal_tile),
    ));

    while let Some(current) = open_set.pop() {
        if current.node == goal {
            let nodes = reconstruct(&came_from, goal);
            debug!(
                start = %start,
                goal = %goal,
                cost = current.g_cost,
                moves = nodes.len() - 1,
                explored = closed_set.len(),
                "Route found"
            );
            return Ok(Route {
                nodes,
                cost: current.g_cost,
            });
        }

        // Stale heap entries are skipped
        if !closed_set.insert(current.node) {
            continue;
        }

        if closed_set.len() > max_states {
            warn!(limit = max_states, "Route search exceeded max states explored");
            return Err(CavernError::SearchLimitExceeded { limit: max_states });
        }

        for edge in cavern.neighbours(current.node)? {
            if closed_set.contains(&edge.destination) {
                continue;
            }

            // Costs beyond u64 are unreachable in practice
            let Some(tentative_g) = current.g_cost.checked_add(edge.weight) else {
                continue;
            };
            let known = g_scores.get(&edge.destination).copied();
            if known.is_some_and(|g| tentative_g >= g) {
                continue;
            }

            came_from.insert(edge.destination, current.node);
            g_scores.insert(edge.destination, tentative_g);

            let tile = cavern.node(edge.destination)?.tile;
            open_set.push(SearchNode::new(
                edge.destination,
                tentative_g,
                heuristic.estimate(&tile, &goal_tile),
            ));
        }
    }

    Err(CavernError::UnreachableExit { start, exit: goal })
}

/// Cheapest distances from one source to every reachable node.
#[derive(Debug, Clone)]
pub struct ShortestPathTree {
    source: NodeId,
    distances: HashMap<NodeId, Weight>,
    came_from: HashMap<NodeId, NodeId>,
}

impl ShortestPathTree {
    /// Expand the whole cavern from `source` in cost order.
    pub fn build(cavern: &Cavern, source: NodeId) -> Result<Self> {
        cavern.node(source)?;

        let mut open_set: BinaryHeap<SearchNode> = BinaryHeap::new();
        let mut distances: HashMap<NodeId, Weight> = HashMap::new();
        let mut settled: HashSet<NodeId> = HashSet::new();
        let mut came_from: HashMap<NodeId, NodeId> = HashMap::new();

        distances.insert(source, 0);
        open_set.push(SearchNode::new(source, 0, 0.0));

        while let Some(current) = open_set.pop() {
            if !settled.insert(current.node) {
                continue;
            }

            for edge in cavern.neighbours(current.node)? {
                if settled.contains(&edge.destination) {
                    continue;
                }
                let Some(tentative) = current.g_cost.checked_add(edge.weight) else {
                    continue;
                };
                if distances
                    .get(&edge.destination)
                    .is_some_and(|&d| tentative >= d)
                {
                    continue;
                }
                distances.insert(edge.destination, tentative);
                came_from.insert(edge.destination, current.node);
                open_set.push(SearchNode::new(edge.destination, tentative, 0.0));
            }
        }

        Ok(Self {
            source,
            distances,
            came_from,
        })
    }

    /// The node the tree was grown from.
    pub fn source(&self) -> NodeId {
        self.source
    }

    /// Cheapest cost from the source, if reachable.
    pub fn distance(&self, node: NodeId) -> Option<Weight> {
        self.distances.get(&node).copied()
    }

    /// Cheapest route from the source, if reachable.
    pub fn route_to(&self, node: NodeId) -> Option<Route> {
        let cost = self.distance(node)?;
        Some(Route {
            nodes: reconstruct(&self.came_from, node),
            cost,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 3x3 grid with unit edges, ids row * 3 + column + 1.
    fn grid() -> Cavern {
        let mut builder = Cavern::builder();
        for row in 0..3 {
            for column in 0..3 {
                builder = builder.node((row * 3 + column + 1) as u64, Tile::new(row, column));
            }
        }
        for row in 0..3u64 {
            for column in 0..3u64 {
                let id = row * 3 + column + 1;
                if column < 2 {
                    builder = builder.edge(id, id + 1, 1);
                }
                if row < 2 {
                    builder = builder.edge(id, id + 3, 1);
                }
            }
        }
        builder.build().unwrap()
    }

    #[test]
    fn test_astar_on_grid() {
        let cavern = grid();
        let route =
            shortest_route(&cavern, NodeId(1), NodeId(9), Heuristic::Euclidean, 100).unwrap();
        assert_eq!(route.cost, 4);
        assert_eq!(route.moves(), 4);
        assert_eq!(route.nodes.first(), Some(&NodeId(1)));
        assert_eq!(route.nodes.last(), Some(&NodeId(9)));
    }

    #[test]
    fn test_prefers_cheaper_longer_path() {
        let cavern = Cavern::builder()
            .node(1, Tile::new(0, 0))
            .node(2, Tile::new(0, 1))
            .node(3, Tile::new(0, 2))
            .node(4, Tile::new(1, 1))
            .edge(1, 3, 10)
            .edge(1, 2, 2)
            .edge(2, 3, 2)
            .edge(1, 4, 2)
            .build()
            .unwrap();
        let route = shortest_route(&cavern, NodeId(1), NodeId(3), Heuristic::Zero, 100).unwrap();
        assert_eq!(route.nodes, vec![NodeId(1), NodeId(2), NodeId(3)]);
        assert_eq!(route.cost, 4);
    }

    #[test]
    fn test_unreachable_goal() {
        let cavern = Cavern::builder()
            .node(1, Tile::new(0, 0))
            .node(2, Tile::new(0, 1))
            .node(3, Tile::new(5, 5))
            .edge(1, 2, 1)
            .build()
            .unwrap();
        let result = shortest_route(&cavern, NodeId(1), NodeId(3), Heuristic::Zero, 100);
        assert_eq!(
            result,
            Err(CavernError::UnreachableExit {
                start: NodeId(1),
                exit: NodeId(3)
            })
        );
    }

    #[test]
    fn test_search_limit() {
        let cavern = grid();
        let result = shortest_route(&cavern, NodeId(1), NodeId(9), Heuristic::Zero, 2);
        assert_eq!(result, Err(CavernError::SearchLimitExceeded { limit: 2 }));
    }

    #[test]
    fn test_same_start_and_goal() {
        let route = shortest_route(&grid(), NodeId(5), NodeId(5), Heuristic::Zero, 1).unwrap();
        assert_eq!(route.nodes, vec![NodeId(5)]);
        assert_eq!(route.cost, 0);
    }

    #[test]
    fn test_auto_heuristic_falls_back_to_zero() {
        let shortcut = Cavern::builder()
            .node(1, Tile::new(0, 0))
            .node(2, Tile::new(0, 9))
            .edge(1, 2, 1)
            .build()
            .unwrap();
        assert_eq!(
            Heuristic::resolve(HeuristicKind::Auto, &shortcut),
            Heuristic::Zero
        );
        assert_eq!(
            Heuristic::resolve(HeuristicKind::Auto, &grid()),
            Heuristic::Euclidean
        );
    }

    #[test]
    fn test_shortest_path_tree() {
        let cavern = grid();
        let tree = ShortestPathTree::build(&cavern, NodeId(1)).unwrap();
        assert_eq!(tree.source(), NodeId(1));
        assert_eq!(tree.distance(NodeId(1)), Some(0));
        assert_eq!(tree.distance(NodeId(5)), Some(2));
        assert_eq!(tree.distance(NodeId(9)), Some(4));

        let route = tree.route_to(NodeId(6)).unwrap();
        assert_eq!(route.cost, 3);
        assert_eq!(route.nodes.len(), 4);
        assert_eq!(route.nodes[0], NodeId(1));
    }

    #[test]
    fn test_max_weight_edge_is_skipped_not_summed() {
        let cavern = Cavern::builder()
            .node(1, Tile::new(0, 0))
            .node(2, Tile::new(0, 1))
            .node(3, Tile::new(1, 1))
            .edge(1, 2, Weight::MAX)
            .edge(2, 3, 1)
            .edge(1, 3, 5)
            .build()
            .unwrap();

        let route = shortest_route(&cavern, NodeId(1), NodeId(2), Heuristic::Zero, 100).unwrap();
        assert_eq!(route.nodes, vec![NodeId(1), NodeId(3), NodeId(2)]);
        assert_eq!(route.cost, 6);

        let tree = ShortestPathTree::build(&cavern, NodeId(3)).unwrap();
        assert_eq!(tree.distance(NodeId(1)), Some(5));
        assert_eq!(tree.distance(NodeId(2)), Some(1));
    }
}
