//! Bounded A* pathfinding over the hex grid

use crate::environment::GameEnvironment;
use crate::hex::{Hex, HEX_DIRECTIONS};
use crate::terrain::HexType;
use crate::unit::Unit;
use rustc_hash::FxHashMap;
use std::cmp::Reverse;
use std::collections::BinaryHeap;

/// Hard cap on distinct nodes generated per search.
///
/// The pathfinder runs in the innermost loop of playouts, so completeness is
/// traded for a bounded worst case: hitting the cap reports "no path".
pub const MAX_GENERATED_NODES: usize = 128;

/// Early-out predicate for a search: `(candidate, target, acting unit,
/// environment)`. The default accepts only the exact target hex.
pub type StopCondition = fn(Hex, Hex, Option<&Unit>, &GameEnvironment) -> bool;

/// A single node of a found path, carrying the static terrain cost of its hex
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PathNode {
    pub hex: Hex,
    pub cost: u32,
}

/// A* search over one environment
pub struct Pathfinder<'a> {
    env: &'a GameEnvironment,
}

fn exact_match(hex: Hex, target: Hex, _unit: Option<&Unit>, _env: &GameEnvironment) -> bool {
    hex == target
}

impl<'a> Pathfinder<'a> {
    pub fn new(env: &'a GameEnvironment) -> Self {
        Self { env }
    }

    /// Find a path from `start` to `end` (or to the first hex satisfying
    /// `condition`).
    ///
    /// The result runs from the satisfying hex back to `start` inclusive, so
    /// a single-node path means "already there" while an empty vec means no
    /// path was found within the node budget. Absence of a path is an
    /// ordinary return value, never an error.
    pub fn find_path(&self, start: Hex, end: Hex, condition: Option<StopCondition>) -> Vec<PathNode> {
        if start.distance(end) == 0 {
            return vec![PathNode { hex: end, cost: 0 }];
        }
        self.a_star(start, end, condition.unwrap_or(exact_match))
    }

    fn a_star(&self, start: Hex, end: Hex, condition: StopCondition) -> Vec<PathNode> {
        let unit = self.env.state.unit_at(start);

        let mut frontier: BinaryHeap<Reverse<(u32, Hex)>> = BinaryHeap::new();
        frontier.push(Reverse((0, start)));

        let mut came_from: FxHashMap<Hex, Hex> = FxHashMap::default();
        came_from.insert(start, start);
        let mut cost_so_far: FxHashMap<Hex, u32> = FxHashMap::default();
        cost_so_far.insert(start, 0);

        let mut found = false;
        let mut finish = end;

        while let Some(Reverse((priority, current))) = frontier.pop() {
            // Superseded queue entry from a later cost improvement
            if priority > cost_so_far[&current] + current.distance(end) as u32 {
                continue;
            }

            if condition(current, end, unit, self.env) {
                found = true;
                finish = current;
                break;
            }

            if cost_so_far.len() >= MAX_GENERATED_NODES {
                tracing::trace!(?start, ?end, "pathfinding node budget exhausted");
                break;
            }

            for dir in &HEX_DIRECTIONS {
                let next = current + *dir;
                if !self.env.is_valid(next) {
                    continue;
                }
                let hex_type = self.env.hex_type_at(next);
                if hex_type == HexType::Impassable {
                    continue;
                }
                let new_cost = cost_so_far[&current] + hex_type.traversal_cost();
                let improved = cost_so_far
                    .get(&next)
                    .map_or(true, |&known| new_cost < known);
                if improved {
                    cost_so_far.insert(next, new_cost);
                    came_from.insert(next, current);
                    frontier.push(Reverse((new_cost + next.distance(end) as u32, next)));
                }
            }
        }

        if !found {
            return Vec::new();
        }

        let mut path = Vec::new();
        let mut current = finish;
        while current != start {
            path.push(PathNode {
                hex: current,
                cost: self.env.static_cost(current),
            });
            current = came_from[&current];
        }
        // The start node is always included so callers can tell "no movement
        // possible" (one node) apart from "no path" (empty)
        path.push(PathNode {
            hex: current,
            cost: self.env.static_cost(current),
        });

        path
    }
}
