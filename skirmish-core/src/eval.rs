//! Game state evaluation

use crate::state::{GameState, Player};

/// Heuristic evaluation of a state; higher is better for `player`
pub trait Evaluator {
    fn evaluate(&self, state: &GameState, player: Player) -> f64;
}

/// Materialist evaluator: the attack-value differential between the two
/// sides, from `player`'s viewpoint
#[derive(Clone, Copy, Debug, Default)]
pub struct MaterialEvaluator;

impl Evaluator for MaterialEvaluator {
    fn evaluate(&self, state: &GameState, player: Player) -> f64 {
        let mut result = 0.0;
        for unit in state.units_of(player).values() {
            result += f64::from(unit.combat_value());
        }
        for unit in state.units_of(player.opponent()).values() {
            result -= f64::from(unit.combat_value());
        }
        result
    }
}
