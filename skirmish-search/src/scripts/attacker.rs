//! Attack-value targeting policies

use super::{engage, Approach};
use crate::script::Script;
use skirmish_core::{Action, ActionError, GameEnvironment, Hex};

/// No-overkill attack-value policy: focus the highest-value enemy in sensor
/// range, approaching via a weapons-range position when nothing is in range
pub struct Attacker;

impl Script for Attacker {
    fn make_action(
        &self,
        env: &mut GameEnvironment,
        enemies: &[Hex],
        unit: Hex,
    ) -> Result<Action, ActionError> {
        engage(env, enemies, unit, Approach::RingPosition, false)
    }

    fn short_name(&self) -> &'static str {
        "A"
    }
}

/// [`Attacker`] variant that paths straight at the closest enemy, stopping
/// once it comes into sensor range
pub struct DirectAttacker;

impl Script for DirectAttacker {
    fn make_action(
        &self,
        env: &mut GameEnvironment,
        enemies: &[Hex],
        unit: Hex,
    ) -> Result<Action, ActionError> {
        engage(env, enemies, unit, Approach::Direct, false)
    }

    fn short_name(&self) -> &'static str {
        "a"
    }
}
