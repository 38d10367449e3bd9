//! Reference unit-control policies.
//!
//! All four share one engagement skeleton: attack the best-value enemy in
//! sensor range, otherwise approach the closest enemy and attack again if
//! something came into range. Kiting variants retreat after every attack;
//! "direct" variants approach by pathing straight at the enemy with a
//! sensor-range stop condition instead of pre-computing a ring position.

mod attacker;
mod kiter;

pub use attacker::{Attacker, DirectAttacker};
pub use kiter::{DirectKiter, Kiter};

use crate::micro;
use skirmish_core::{
    reverse_direction, Action, ActionError, GameEnvironment, Hex, Unit, HEX_DIRECTIONS,
};

/// How a policy closes the distance when nothing is in range
#[derive(Clone, Copy)]
enum Approach {
    /// Move to a pre-computed hex on the weapons-range ring
    RingPosition,
    /// Path straight at the enemy, stopping once it is in sensor range
    Direct,
}

fn snapshot(env: &GameEnvironment, at: Hex) -> Result<Unit, ActionError> {
    env.state.unit_at(at).cloned().ok_or_else(|| {
        tracing::error!(?at, "script invoked for a missing unit");
        ActionError::UnitNotFound { at }
    })
}

fn refetch(env: &GameEnvironment, key: u32, origin: Hex) -> Result<Unit, ActionError> {
    env.state
        .unit_by_key(key)
        .cloned()
        .ok_or(ActionError::UnitNotFound { at: origin })
}

/// Shared engagement skeleton for the reference policies
fn engage(
    env: &mut GameEnvironment,
    enemies: &[Hex],
    unit_pos: Hex,
    approach: Approach,
    kite: bool,
) -> Result<Action, ActionError> {
    let unit = snapshot(env, unit_pos)?;
    let key = unit.global_key;
    let values = micro::enemy_values(env, enemies);
    let mut actions = Vec::new();

    if let Some(target) = micro::best_value_in_range(&unit, &values) {
        let attack = Action::attack(&unit, target);
        attack.execute(env)?;
        actions.push(attack);
        if kite {
            run_away(env, key, enemies, &mut actions)?;
        }
    } else {
        // Nothing in range: close the distance, then try again
        let Some(closest_enemy) = micro::closest(unit.position, enemies) else {
            return Ok(Action::composite(unit.position, actions));
        };
        let move_action = match approach {
            Approach::RingPosition => {
                match micro::pos_near_pref_weapons_range(closest_enemy, &unit, env) {
                    Some(dest) => Action::move_to(&unit, dest),
                    None => {
                        tracing::debug!(near = ?closest_enemy, "no approach position found");
                        return Ok(Action::composite(unit.position, actions));
                    }
                }
            }
            Approach::Direct => {
                Action::move_with(&unit, closest_enemy, micro::within_sensor_range)
            }
        };
        move_action.execute(env)?;
        actions.push(move_action);

        let unit = refetch(env, key, unit_pos)?;
        if let Some(target) = micro::best_value_in_range(&unit, &values) {
            let attack = Action::attack(&unit, target);
            attack.execute(env)?;
            actions.push(attack);
            if kite {
                run_away(env, key, enemies, &mut actions)?;
            }
        }
    }

    let source = env
        .state
        .unit_by_key(key)
        .map(|u| u.position)
        .unwrap_or(unit_pos);
    Ok(Action::composite(source, actions))
}

/// Retreat directly away from the closest enemy, as far as engine energy
/// allows
fn run_away(
    env: &mut GameEnvironment,
    key: u32,
    enemies: &[Hex],
    actions: &mut Vec<Action>,
) -> Result<(), ActionError> {
    let Some(unit) = env.state.unit_by_key(key).cloned() else {
        return Ok(());
    };
    if !unit.can_move() {
        return Ok(());
    }
    let Some(closest_enemy) = micro::closest(unit.position, enemies) else {
        return Ok(());
    };

    let away = HEX_DIRECTIONS[reverse_direction(unit.position.direction_to(closest_enemy))];
    let retreat = unit.position + away * (unit.avail_engines_energy as i16);
    if let Some(dest) = micro::pos_near(retreat, &unit, env, 1) {
        let move_action = Action::move_to(&unit, dest);
        move_action.execute(env)?;
        actions.push(move_action);
    }
    Ok(())
}
