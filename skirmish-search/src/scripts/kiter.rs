//! Hit-and-run policies

use super::{engage, Approach};
use crate::script::Script;
use skirmish_core::{Action, ActionError, GameEnvironment, Hex};

/// Kiting policy: attack the best-value enemy in sensor range, then retreat
/// away from the closest enemy with whatever engine energy remains
pub struct Kiter;

impl Script for Kiter {
    fn make_action(
        &self,
        env: &mut GameEnvironment,
        enemies: &[Hex],
        unit: Hex,
    ) -> Result<Action, ActionError> {
        engage(env, enemies, unit, Approach::RingPosition, true)
    }

    fn short_name(&self) -> &'static str {
        "K"
    }
}

/// [`Kiter`] variant that paths straight at the closest enemy, stopping once
/// it comes into sensor range
pub struct DirectKiter;

impl Script for DirectKiter {
    fn make_action(
        &self,
        env: &mut GameEnvironment,
        enemies: &[Hex],
        unit: Hex,
    ) -> Result<Action, ActionError> {
        engage(env, enemies, unit, Approach::Direct, true)
    }

    fn short_name(&self) -> &'static str {
        "k"
    }
}
