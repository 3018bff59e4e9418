//! Planner configuration and the router trait.

use cavern_core::{Cavern, NodeId, Result, Weight};
use serde::{Deserialize, Serialize};

use crate::escape::EscapePlan;

/// Configuration for the explorer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExplorerConfig {
    /// Maximum number of moves before exploration gives up.
    pub max_moves: usize,
}

impl Default for ExplorerConfig {
    fn default() -> Self {
        Self {
            max_moves: 1_000_000,
        }
    }
}

/// Which lower bound the route search uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum HeuristicKind {
    /// Euclidean when the cavern allows it, zero otherwise.
    #[default]
    Auto,
    /// Straight-line distance between tiles.
    Euclidean,
    /// No estimate; plain uniform-cost search.
    Zero,
}

/// How the router trades budget for gold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum DetourPolicy {
    /// Walk the shortest route and pick up whatever lies on it.
    ShortestPathOnly,
    /// Visit gold nodes while the exit stays within budget.
    #[default]
    Greedy,
}

/// Configuration for the escape router.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RouterConfig {
    /// Heuristic for the exit search.
    pub heuristic: HeuristicKind,

    /// Detour policy.
    pub detour: DetourPolicy,

    /// Budget held back from every detour decision.
    pub safety_margin: Weight,

    /// Maximum number of detours in one plan.
    pub max_detours: usize,

    /// Maximum number of states to expand in one search.
    pub max_states_explored: usize,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            heuristic: HeuristicKind::Auto,
            detour: DetourPolicy::Greedy,
            safety_margin: 0,
            max_detours: 256,
            max_states_explored: 1_000_000,
        }
    }
}

/// Trait for escape routers.
pub trait Router {
    /// Plan a route from `start` to `exit` that never spends more than `budget`.
    fn plan(&self, cavern: &Cavern, start: NodeId, exit: NodeId, budget: Weight)
        -> Result<EscapePlan>;

    /// Check that a route walks real edges, ends at `exit` and fits in `budget`.
    fn validate_route(
        &self,
        cavern: &Cavern,
        route: &[NodeId],
        exit: NodeId,
        budget: Weight,
    ) -> Result<Weight>;

    /// Get the router configuration.
    fn config(&self) -> &RouterConfig;

    /// Update the router configuration.
    fn set_config(&mut self, config: RouterConfig);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_router_config_partial_json() {
        let config: RouterConfig =
            serde_json::from_str(r#"{"detour": "shortest_path_only", "safety_margin": 3}"#)
                .unwrap();
        assert_eq!(config.detour, DetourPolicy::ShortestPathOnly);
        assert_eq!(config.safety_margin, 3);
        assert_eq!(config.heuristic, HeuristicKind::Auto);
        assert_eq!(config.max_detours, 256);
    }

    #[test]
    fn test_explorer_config_default() {
        let config: ExplorerConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config.max_moves, 1_000_000);
    }
}
