//! Unit actions and their execution semantics

use crate::environment::GameEnvironment;
use crate::hex::{reverse_direction, Hex};
use crate::pathfinding::{Pathfinder, StopCondition};
use crate::unit::{round1, round2, Unit};
use thiserror::Error;

/// Fatal simulation contract violations.
///
/// These indicate a stale or misapplied action (for example an action from a
/// speculative branch replayed against a diverged state) and abort the
/// current simulation run. Expected absences — no path, no target in range —
/// are ordinary return values elsewhere, never errors.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum ActionError {
    #[error("no unit at {at:?}; stale action replayed against a diverged state")]
    UnitNotFound { at: Hex },
    #[error("unit {unit} reached a playout without an assigned script")]
    ScriptNotAssigned { unit: u32 },
}

/// A single deterministic state mutation.
///
/// Actions are immutable intents: they capture the acting unit's position at
/// construction and re-resolve the unit from the live state on execution.
#[derive(Clone, Debug)]
pub enum Action {
    Move(MoveAction),
    Attack(AttackAction),
    Composite(CompositeAction),
}

impl Action {
    /// Attack from `unit` against whatever occupies `target`
    pub fn attack(unit: &Unit, target: Hex) -> Action {
        Action::Attack(AttackAction {
            source: unit.position,
            target,
        })
    }

    /// Move `unit` toward `target` along the cheapest path
    pub fn move_to(unit: &Unit, target: Hex) -> Action {
        Action::Move(MoveAction {
            source: unit.position,
            target,
            condition: None,
        })
    }

    /// Move `unit` toward `target`, stopping at the first hex satisfying
    /// `condition`
    pub fn move_with(unit: &Unit, target: Hex, condition: StopCondition) -> Action {
        Action::Move(MoveAction {
            source: unit.position,
            target,
            condition: Some(condition),
        })
    }

    /// Bundle an ordered sequence of sub-actions
    pub fn composite(source: Hex, actions: Vec<Action>) -> Action {
        Action::Composite(CompositeAction { source, actions })
    }

    /// Position of the acting unit when the action was created
    pub fn source(&self) -> Hex {
        match self {
            Action::Move(a) => a.source,
            Action::Attack(a) => a.source,
            Action::Composite(a) => a.source,
        }
    }

    /// Execute this action against `env`. The only state-mutating entry point.
    pub fn execute(&self, env: &mut GameEnvironment) -> Result<(), ActionError> {
        match self {
            Action::Move(a) => a.execute(env),
            Action::Attack(a) => a.execute(env),
            Action::Composite(a) => a.execute(env),
        }
    }
}

/// Attack whatever stands at `target` with the unit at `source`
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AttackAction {
    pub source: Hex,
    pub target: Hex,
}

impl AttackAction {
    pub fn execute(&self, env: &mut GameEnvironment) -> Result<(), ActionError> {
        let state = &mut env.state;

        let (target_pos, target_dir) = match state.unit_at(self.target) {
            Some(target) => (target.position, target.direction),
            None => {
                tracing::error!(at = ?self.target, "attack target not found");
                return Err(ActionError::UnitNotFound { at: self.target });
            }
        };

        let (weapon_damage, weapon_shield_damage, mut avail, attacker_dir) = {
            let attacker = match state.unit_at_mut(self.source) {
                Some(attacker) => attacker,
                None => {
                    tracing::error!(source = ?self.source, "attacker not found at source");
                    return Err(ActionError::UnitNotFound { at: self.source });
                }
            };
            let dir = attacker.position.direction_to(target_pos);
            attacker.direction = dir;
            (
                attacker.weapon_damage,
                attacker.weapon_shield_damage,
                attacker.avail_weapons_energy,
                dir,
            )
        };

        // Shield arc hit: relative facing between the reversed attack
        // direction and the target's own facing
        let arc = (reverse_direction(attacker_dir) + 6 - target_dir) % 6;

        let mut killed = false;
        {
            // Still present: looked up above
            let target = state
                .unit_at_mut(target_pos)
                .ok_or(ActionError::UnitNotFound { at: target_pos })?;

            // One shot of 1.0 weapon energy at a time; each shot is resolved
            // independently so the loop can stop the instant the target dies
            while avail > 0.0 {
                avail = round1(avail - 1.0).max(0.0);

                if target.shields[arc] > 0.0 {
                    target.shields[arc] = round2(target.shields[arc] - weapon_shield_damage);
                    if target.shields[arc] < 0.0 {
                        // Overflow spills into the hull
                        target.hull = round1(target.hull + target.shields[arc]);
                        target.shields[arc] = 0.0;
                    }
                } else {
                    target.hull = round1(target.hull - weapon_damage);
                }

                if target.hull <= 0.0 {
                    target.hull = 0.0;
                    killed = true;
                    break;
                }
            }
            tracing::debug!(at = ?target_pos, hull = target.hull, "attack resolved");
        }

        if killed {
            state.kill_unit_at(target_pos);
        }
        if let Some(attacker) = state.unit_at_mut(self.source) {
            attacker.avail_weapons_energy = avail;
        }
        Ok(())
    }
}

/// Move the unit at `source` as far toward `target` as its engine energy
/// allows
#[derive(Clone, Copy, Debug)]
pub struct MoveAction {
    pub source: Hex,
    pub target: Hex,
    pub condition: Option<StopCondition>,
}

impl MoveAction {
    pub fn execute(&self, env: &mut GameEnvironment) -> Result<(), ActionError> {
        let unit = match env.state.unit_at(self.source) {
            Some(unit) => unit,
            None => {
                tracing::error!(source = ?self.source, "no unit at move source");
                return Err(ActionError::UnitNotFound { at: self.source });
            }
        };
        if !unit.can_move() {
            return Ok(());
        }
        let available = unit.avail_engines_energy;

        let path = Pathfinder::new(env).find_path(self.source, self.target, self.condition);
        if path.is_empty() {
            tracing::debug!(from = ?self.source, to = ?self.target, "no path found");
            return Ok(());
        }
        if path.len() == 1 {
            // Already at the destination
            return Ok(());
        }

        // Consume the path from its tail (the start node) toward the head
        // (the destination), stopping at the furthest affordable node. The
        // start hex's own cost is paid first.
        let mut remaining = available;
        let mut index = path.len() as isize - 1;
        while index >= 0 {
            let cost = path[index as usize].cost as f32;
            if remaining - cost >= 0.0 {
                remaining -= cost;
                index -= 1;
            } else {
                break;
            }
        }

        if index == path.len() as isize - 1 {
            // Could not afford even the first step
            return Ok(());
        }
        let index = if index < 0 { 0 } else { index as usize };

        let destination = path[index].hex;
        env.state.move_unit(self.source, destination);
        let direction = path[index + 1].hex.direction_to(path[index].hex);
        if let Some(unit) = env.state.unit_at_mut(destination) {
            unit.direction = direction;
            unit.avail_engines_energy = remaining;
        }
        Ok(())
    }
}

/// An ordered sequence of sub-actions executed as one unit decision
#[derive(Clone, Debug)]
pub struct CompositeAction {
    pub source: Hex,
    pub actions: Vec<Action>,
}

impl CompositeAction {
    pub fn execute(&self, env: &mut GameEnvironment) -> Result<(), ActionError> {
        for action in &self.actions {
            action.execute(env)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{GameState, Player};
    use crate::terrain::{HexType, TerrainMap};
    use crate::unit::SHIELD_ARCS;
    use std::sync::Arc;

    fn gunship(key: u32, position: Hex) -> Unit {
        Unit {
            global_key: key,
            position,
            hull: 10.0,
            hull_max: 10.0,
            weapon_damage: 2.0,
            weapon_shield_damage: 1.5,
            total_weapons_energy: 2.0,
            avail_weapons_energy: 2.0,
            total_sensors_energy: 5.0,
            sensors_energy: 5.0,
            total_engines_energy: 3.0,
            avail_engines_energy: 3.0,
            ..Unit::default()
        }
    }

    fn duel_env(attacker: Unit, defender: Unit) -> GameEnvironment {
        let state = GameState::from_units(vec![attacker], vec![defender], Player::Red);
        GameEnvironment::new(6, state, Arc::new(TerrainMap::default()))
    }

    #[test]
    fn test_attack_shield_overflow_into_hull() {
        let attacker = gunship(1, Hex::ORIGIN);
        let mut defender = gunship(2, Hex::new(0, 2));
        // North-facing defender attacked from the north: arc index
        // (reverse(3) - 0 + 6) % 6 == 0
        defender.direction = 0;
        defender.shields = {
            let mut shields = [0.0; SHIELD_ARCS];
            shields[0] = 1.0;
            shields
        };
        let mut env = duel_env(attacker, defender);

        let action = Action::attack(env.state.unit_at(Hex::ORIGIN).unwrap(), Hex::new(0, 2));
        action.execute(&mut env).unwrap();

        let defender = env.state.unit_at(Hex::new(0, 2)).unwrap();
        // Shot 1: arc 1.0 - 1.5 = -0.5 overflows into hull; shot 2 hits hull
        assert_eq!(defender.shields[0], 0.0);
        assert_eq!(defender.hull, 7.5);
        let attacker = env.state.unit_at(Hex::ORIGIN).unwrap();
        assert_eq!(attacker.avail_weapons_energy, 0.0);
        // Attacker turned to face the target (south)
        assert_eq!(attacker.direction, 3);
    }

    #[test]
    fn test_attack_kills_and_stops_spending() {
        let mut attacker = gunship(1, Hex::ORIGIN);
        attacker.avail_weapons_energy = 5.0;
        attacker.weapon_damage = 4.0;
        let mut defender = gunship(2, Hex::new(0, 2));
        defender.hull = 7.0;
        let mut env = duel_env(attacker, defender);

        let action = Action::attack(env.state.unit_at(Hex::ORIGIN).unwrap(), Hex::new(0, 2));
        action.execute(&mut env).unwrap();

        // Dead after two shots; the third unit of energy stays unspent
        assert!(env.state.unit_at(Hex::new(0, 2)).is_none());
        assert!(!env.state.dynamic_map.contains_key(&Hex::new(0, 2)));
        assert_eq!(
            env.state.unit_at(Hex::ORIGIN).unwrap().avail_weapons_energy,
            3.0
        );
    }

    #[test]
    fn test_attack_missing_target_is_fatal() {
        let attacker = gunship(1, Hex::ORIGIN);
        let defender = gunship(2, Hex::new(0, 2));
        let mut env = duel_env(attacker, defender);

        let action = Action::attack(env.state.unit_at(Hex::ORIGIN).unwrap(), Hex::new(3, 3));
        assert_eq!(
            action.execute(&mut env),
            Err(ActionError::UnitNotFound { at: Hex::new(3, 3) })
        );
    }

    #[test]
    fn test_move_partial_path() {
        let mut mover = gunship(1, Hex::ORIGIN);
        mover.avail_engines_energy = 2.0;
        let defender = gunship(2, Hex::new(5, -5));
        let mut env = duel_env(mover, defender);

        let action = Action::move_to(env.state.unit_at(Hex::ORIGIN).unwrap(), Hex::new(0, 4));
        action.execute(&mut env).unwrap();

        // Two energy pays for the start hex and one step
        let unit = env.state.unit_at(Hex::new(0, 2)).unwrap();
        assert_eq!(unit.global_key, 1);
        assert_eq!(unit.avail_engines_energy, 0.0);
        assert_eq!(unit.direction, 3); // facing south, the way it walked
    }

    #[test]
    fn test_move_without_energy_is_noop() {
        let mut mover = gunship(1, Hex::ORIGIN);
        mover.avail_engines_energy = 0.0;
        mover.direction = 2;
        let defender = gunship(2, Hex::new(5, -5));
        let mut env = duel_env(mover, defender);

        let action = Action::move_to(env.state.unit_at(Hex::ORIGIN).unwrap(), Hex::new(0, 3));
        action.execute(&mut env).unwrap();

        let unit = env.state.unit_at(Hex::ORIGIN).unwrap();
        assert_eq!(unit.position, Hex::ORIGIN);
        assert_eq!(unit.direction, 2);
    }

    #[test]
    fn test_move_cannot_afford_first_step() {
        // Start hex costs 2 but the unit only has 1.5 energy
        let mut mover = gunship(1, Hex::ORIGIN);
        mover.avail_engines_energy = 1.5;
        let mut terrain = TerrainMap::default();
        terrain.insert(Hex::ORIGIN, HexType::DoubleCost);
        let state = GameState::from_units(vec![mover], vec![gunship(2, Hex::new(5, -5))], Player::Red);
        let mut env = GameEnvironment::new(6, state, Arc::new(terrain));

        let action = Action::move_to(env.state.unit_at(Hex::ORIGIN).unwrap(), Hex::new(0, 3));
        action.execute(&mut env).unwrap();

        let unit = env.state.unit_at(Hex::ORIGIN).unwrap();
        assert_eq!(unit.position, Hex::ORIGIN);
        assert_eq!(unit.avail_engines_energy, 1.5);
        assert_eq!(unit.direction, 0);
    }

    #[test]
    fn test_move_to_unreachable_target_is_noop() {
        let mover = gunship(1, Hex::ORIGIN);
        let blocker = gunship(2, Hex::new(0, 3));
        let mut env = duel_env(mover, blocker);

        // Target hex is occupied, hence dynamically impassable: no path
        let action = Action::move_to(env.state.unit_at(Hex::ORIGIN).unwrap(), Hex::new(0, 3));
        action.execute(&mut env).unwrap();
        assert!(env.state.unit_at(Hex::ORIGIN).is_some());
    }

    #[test]
    fn test_move_stale_source_is_fatal() {
        let mover = gunship(1, Hex::ORIGIN);
        let defender = gunship(2, Hex::new(5, -5));
        let mut env = duel_env(mover, defender);

        let action = Action::move_to(env.state.unit_at(Hex::ORIGIN).unwrap(), Hex::new(0, 3));
        env.state.move_unit(Hex::ORIGIN, Hex::new(1, 1));

        assert_eq!(
            action.execute(&mut env),
            Err(ActionError::UnitNotFound { at: Hex::ORIGIN })
        );
    }

    #[test]
    fn test_composite_executes_in_order() {
        let mut mover = gunship(1, Hex::ORIGIN);
        mover.avail_engines_energy = 3.0;
        let mut defender = gunship(2, Hex::new(0, 3));
        defender.hull = 1.0;
        let mut env = duel_env(mover, defender);

        let unit = env.state.unit_at(Hex::ORIGIN).unwrap().clone();
        let composite = Action::composite(
            unit.position,
            vec![
                Action::move_to(&unit, Hex::new(0, 1)),
                Action::Attack(AttackAction {
                    source: Hex::new(0, 1),
                    target: Hex::new(0, 3),
                }),
            ],
        );
        composite.execute(&mut env).unwrap();

        assert!(env.state.unit_at(Hex::new(0, 1)).is_some());
        assert!(env.state.unit_at(Hex::new(0, 3)).is_none());
    }
}
