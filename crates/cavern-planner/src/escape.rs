//! Escape routing: reach the exit within budget, picking up gold on the way.

use std::collections::HashSet;

use cavern_core::{
    Cavern, CavernError, EscapeReport, EscapeState, NodeId, Outcome, Result, Weight,
};
use chrono::Utc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::astar::{shortest_route, Heuristic, Route, ShortestPathTree};
use crate::planner::{DetourPolicy, Router, RouterConfig};

/// A complete route to the exit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EscapePlan {
    /// The full walk, start and exit included.
    pub route: Route,

    /// Gold lying on the route when it was planned.
    pub expected_gold: Weight,

    /// Gold nodes the route goes out of its way for, in visiting order.
    pub detours: Vec<NodeId>,
}

/// Gold node considered for a detour.
#[derive(Debug, Clone, Copy)]
struct Candidate {
    id: NodeId,
    there: Weight,
    score: f64,
}

/// Router that always reaches the exit and spends spare budget on gold.
#[derive(Debug, Clone, Default)]
pub struct EscapeRouter {
    config: RouterConfig,
}

impl EscapeRouter {
    /// Create a new router with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new router with custom configuration.
    pub fn with_config(config: RouterConfig) -> Self {
        Self { config }
    }

    /// Plan against the state's cavern, then walk the plan.
    ///
    /// Gold is picked up on every node stood on, the start included. The
    /// remaining budget is re-checked before each move.
    pub fn escape<S: EscapeState>(&self, state: &mut S) -> Result<EscapeReport> {
        let started_at = Utc::now();
        let start = state.current_node();
        let exit = state.exit();
        let budget = state.time_remaining();

        info!(start = %start, exit = %exit, budget, "Starting escape");

        let plan = self.plan(state.cavern(), start, exit, budget)?;
        self.validate_route(state.cavern(), &plan.route.nodes, exit, budget)?;

        let mut gold = 0;
        Self::collect(state, &mut gold)?;

        for pair in plan.route.nodes.windows(2) {
            let (from, to) = (pair[0], pair[1]);
            let weight = state
                .cavern()
                .edge_weight(from, to)
                .ok_or(CavernError::InvalidMove { from, to })?;
            let remaining = state.time_remaining();
            if weight > remaining {
                warn!(from = %from, to = %to, weight, remaining, "Move would exhaust budget");
                return Err(CavernError::BudgetExceeded {
                    required: weight,
                    remaining,
                });
            }
            state.move_to(to)?;
            Self::collect(state, &mut gold)?;
        }

        let time_remaining = state.time_remaining();
        info!(
            exit = %exit,
            cost = plan.route.cost,
            gold,
            time_remaining,
            "Escaped"
        );

        Ok(EscapeReport {
            id: Uuid::new_v4(),
            route: plan.route.nodes,
            cost: plan.route.cost,
            gold_collected: gold,
            detours: plan.detours.len(),
            time_remaining,
            outcome: Outcome::Success,
            started_at,
            finished_at: Utc::now(),
        })
    }

    fn collect<S: EscapeState>(state: &mut S, gold: &mut Weight) -> Result<()> {
        match state.pick_up_gold() {
            Ok(amount) => {
                *gold = gold.saturating_add(amount);
                debug!(node = %state.current_node(), amount, "Picked up gold");
                Ok(())
            }
            Err(err) if err.is_recoverable() => Ok(()),
            Err(err) => Err(err),
        }
    }

    fn heuristic(&self, cavern: &Cavern) -> Heuristic {
        Heuristic::resolve(self.config.heuristic, cavern)
    }

    /// Cheapest route to the exit, rejected if it does not fit the budget.
    fn direct_route(
        &self,
        cavern: &Cavern,
        start: NodeId,
        exit: NodeId,
        budget: Weight,
    ) -> Result<Route> {
        let route = shortest_route(
            cavern,
            start,
            exit,
            self.heuristic(cavern),
            self.config.max_states_explored,
        )?;
        if route.cost > budget {
            return Err(CavernError::BudgetExceeded {
                required: route.cost,
                remaining: budget,
            });
        }
        Ok(route)
    }

    fn gold_on(cavern: &Cavern, nodes: &[NodeId], seen: &mut HashSet<NodeId>) -> Result<Weight> {
        let mut gold: Weight = 0;
        for &id in nodes {
            if seen.insert(id) {
                gold = gold.saturating_add(cavern.node(id)?.gold);
            }
        }
        Ok(gold)
    }

    fn plan_greedy(
        &self,
        cavern: &Cavern,
        start: NodeId,
        exit: NodeId,
        budget: Weight,
    ) -> Result<EscapePlan> {
        // Fails early when even the direct route does not fit.
        let direct = self.direct_route(cavern, start, exit, budget)?;
        let direct_gold = Self::gold_on(cavern, &direct.nodes, &mut HashSet::new())?;
        let to_exit = ShortestPathTree::build(cavern, exit)?;

        let mut seen = HashSet::new();
        let mut expected_gold = Self::gold_on(cavern, &[start], &mut seen)?;
        let mut nodes = vec![start];
        let mut spent: Weight = 0;
        let mut current = start;
        let mut detours = Vec::new();

        while detours.len() < self.config.max_detours {
            let remaining = budget - spent;
            let from_here = ShortestPathTree::build(cavern, current)?;

            let best = cavern
                .nodes()
                .filter(|node| node.has_gold() && !seen.contains(&node.id))
                .filter_map(|node| {
                    let there = from_here.distance(node.id)?;
                    let back = to_exit.distance(node.id)?;
                    let needed = there
                        .checked_add(back)?
                        .checked_add(self.config.safety_margin)?;
                    (needed <= remaining).then(|| Candidate {
                        id: node.id,
                        there,
                        score: node.gold as f64 / there.max(1) as f64,
                    })
                })
                .max_by(|a, b| {
                    a.score
                        .total_cmp(&b.score)
                        .then_with(|| b.there.cmp(&a.there))
                        .then_with(|| b.id.cmp(&a.id))
                });

            let Some(best) = best else {
                break;
            };

            let leg = from_here
                .route_to(best.id)
                .ok_or(CavernError::UnknownNode(best.id))?;
            expected_gold += Self::gold_on(cavern, &leg.nodes[1..], &mut seen)?;
            nodes.extend_from_slice(&leg.nodes[1..]);
            spent += leg.cost;
            current = best.id;
            detours.push(best.id);

            debug!(
                node = %best.id,
                cost = leg.cost,
                spent,
                score = best.score,
                "Detour accepted"
            );
        }

        let last = shortest_route(
            cavern,
            current,
            exit,
            self.heuristic(cavern),
            self.config.max_states_explored,
        )?;
        expected_gold += Self::gold_on(cavern, &last.nodes[1..], &mut seen)?;
        nodes.extend_from_slice(&last.nodes[1..]);
        spent += last.cost;

        if spent > budget {
            return Err(CavernError::BudgetExceeded {
                required: spent,
                remaining: budget,
            });
        }

        // Detours may pull the walk away from gold on the direct route.
        if direct_gold >= expected_gold {
            debug!(
                direct_gold,
                detour_gold = expected_gold,
                "Direct route collects at least as much, dropping detours"
            );
            return Ok(EscapePlan {
                route: direct,
                expected_gold: direct_gold,
                detours: Vec::new(),
            });
        }

        Ok(EscapePlan {
            route: Route { nodes, cost: spent },
            expected_gold,
            detours,
        })
    }
}

impl Router for EscapeRouter {
    fn plan(
        &self,
        cavern: &Cavern,
        start: NodeId,
        exit: NodeId,
        budget: Weight,
    ) -> Result<EscapePlan> {
        let plan = match self.config.detour {
            DetourPolicy::ShortestPathOnly => {
                let route = self.direct_route(cavern, start, exit, budget)?;
                let expected_gold = Self::gold_on(cavern, &route.nodes, &mut HashSet::new())?;
                EscapePlan {
                    route,
                    expected_gold,
                    detours: Vec::new(),
                }
            }
            DetourPolicy::Greedy => self.plan_greedy(cavern, start, exit, budget)?,
        };

        info!(
            policy = ?self.config.detour,
            moves = plan.route.moves(),
            cost = plan.route.cost,
            budget,
            expected_gold = plan.expected_gold,
            detours = plan.detours.len(),
            "Escape planned"
        );
        Ok(plan)
    }

    fn validate_route(
        &self,
        cavern: &Cavern,
        route: &[NodeId],
        exit: NodeId,
        budget: Weight,
    ) -> Result<Weight> {
        let (Some(&first), Some(&last)) = (route.first(), route.last()) else {
            return Err(CavernError::UnreachableExit { start: exit, exit });
        };
        cavern.node(first)?;
        if last != exit {
            return Err(CavernError::UnreachableExit { start: first, exit });
        }

        let mut cost: Weight = 0;
        for pair in route.windows(2) {
            let (from, to) = (pair[0], pair[1]);
            let weight = cavern
                .edge_weight(from, to)
                .ok_or(CavernError::InvalidMove { from, to })?;
            cost = cost
                .checked_add(weight)
                .ok_or(CavernError::BudgetExceeded {
                    required: Weight::MAX,
                    remaining: budget,
                })?;
        }

        if cost > budget {
            return Err(CavernError::BudgetExceeded {
                required: cost,
                remaining: budget,
            });
        }
        Ok(cost)
    }

    fn config(&self) -> &RouterConfig {
        &self.config
    }

    fn set_config(&mut self, config: RouterConfig) {
        self.config = config;
    }
}
