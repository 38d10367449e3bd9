//! Actors that decide and apply actions for one side of a combat

use crate::script::{Portfolio, Script};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use skirmish_core::{Action, ActionError, GameEnvironment, ScriptId};

/// An actor in a combat simulation.
///
/// `make_actions` both decides and applies its side's actions for the turn;
/// the returned list is advisory (for logs and inspection), the state
/// mutation has already happened.
pub trait Player {
    fn make_actions(&mut self, env: &mut GameEnvironment) -> Result<Vec<Action>, ActionError>;
}

/// Replays each active unit's assigned portfolio policy.
///
/// The workhorse of search playouts: both sides of a speculative rollout are
/// script executors resolving the per-unit [`ScriptId`] assignments made by
/// the search.
pub struct ScriptExecutor<'a> {
    portfolio: &'a Portfolio,
}

impl<'a> ScriptExecutor<'a> {
    pub fn new(portfolio: &'a Portfolio) -> Self {
        Self { portfolio }
    }
}

impl Player for ScriptExecutor<'_> {
    fn make_actions(&mut self, env: &mut GameEnvironment) -> Result<Vec<Action>, ActionError> {
        let mut actions = Vec::new();
        let active = env.state.active_player;
        for position in env.state.sorted_positions(active) {
            let enemies = env.state.sorted_positions(active.opponent());
            if enemies.is_empty() {
                return Ok(actions);
            }
            let Some(unit) = env.state.active_unit_at(position) else {
                continue;
            };
            let script = unit.script.ok_or(ActionError::ScriptNotAssigned {
                unit: unit.global_key,
            })?;
            actions.push(self.portfolio.get(script).make_action(env, &enemies, position)?);
        }
        Ok(actions)
    }
}

/// Runs one fixed policy for every unit
pub struct ScriptedPlayer<S: Script> {
    script: S,
}

impl<S: Script> ScriptedPlayer<S> {
    pub fn new(script: S) -> Self {
        Self { script }
    }
}

impl<S: Script> Player for ScriptedPlayer<S> {
    fn make_actions(&mut self, env: &mut GameEnvironment) -> Result<Vec<Action>, ActionError> {
        let mut actions = Vec::new();
        let active = env.state.active_player;
        for position in env.state.sorted_positions(active) {
            let enemies = env.state.sorted_positions(active.opponent());
            if enemies.is_empty() {
                tracing::debug!("no enemy units left");
                return Ok(actions);
            }
            actions.push(self.script.make_action(env, &enemies, position)?);
        }
        Ok(actions)
    }
}

/// Picks a uniformly random portfolio policy per unit per turn.
///
/// Takes an explicit seed so runs are reproducible under test.
pub struct RandomScriptPlayer {
    portfolio: Portfolio,
    rng: ChaCha8Rng,
}

impl RandomScriptPlayer {
    pub fn new(portfolio: Portfolio, seed: u64) -> Self {
        Self {
            portfolio,
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }
}

impl Player for RandomScriptPlayer {
    fn make_actions(&mut self, env: &mut GameEnvironment) -> Result<Vec<Action>, ActionError> {
        let mut actions = Vec::new();
        let active = env.state.active_player;
        for position in env.state.sorted_positions(active) {
            let enemies = env.state.sorted_positions(active.opponent());
            if enemies.is_empty() {
                return Ok(actions);
            }
            let script = ScriptId(self.rng.gen_range(0..self.portfolio.len()));
            actions.push(self.portfolio.get(script).make_action(env, &enemies, position)?);
        }
        Ok(actions)
    }
}
