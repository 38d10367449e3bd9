//! Playout driver: the turn loop that runs a combat to completion

use crate::players::Player as Actor;
use skirmish_core::{ActionError, CombatResult, GameEnvironment, GameState, Player};

/// Playout parameters
#[derive(Clone, Copy, Debug)]
pub struct PlayoutConfig {
    /// Maximum number of rounds before the playout is cut off
    pub round_limit: u32,
    /// Sample the hull differential every other round for trend analysis
    pub gather_values: bool,
    /// Report sampled values relative to the initial differential
    pub relative: bool,
    /// Pad the sample series with the final differential up to
    /// `round_limit / 2` entries
    pub pad_values: bool,
}

impl Default for PlayoutConfig {
    fn default() -> Self {
        Self {
            round_limit: u32::MAX,
            gather_values: false,
            relative: false,
            pad_values: false,
        }
    }
}

impl PlayoutConfig {
    pub fn with_round_limit(round_limit: u32) -> Self {
        Self {
            round_limit,
            ..Self::default()
        }
    }
}

/// Result and statistics of one playout
#[derive(Clone, Debug)]
pub struct PlayoutResult {
    /// Rounds actually played
    pub rounds: u32,
    /// Terminal classification; [`CombatResult::Ongoing`] when the round
    /// limit was hit with both sides still alive
    pub outcome: CombatResult,
    /// Sampled hull differentials, empty unless gathering was requested
    pub values: Vec<f64>,
}

/// Total hull of Red minus total hull of Blue
pub fn hull_differential(state: &GameState) -> f64 {
    let red: f64 = state
        .units_of(Player::Red)
        .values()
        .map(|u| f64::from(u.hull))
        .sum();
    let blue: f64 = state
        .units_of(Player::Blue)
        .values()
        .map(|u| f64::from(u.hull))
        .sum();
    red - blue
}

/// Run a combat to termination.
///
/// Alternates the active player's `make_actions` with a turn advance until
/// either side runs out of units or the round limit is reached. The
/// environment is mutated in place. Fatal contract violations from action
/// execution abort the playout.
pub fn playout(
    env: &mut GameEnvironment,
    players: [&mut dyn Actor; 2],
    config: &PlayoutConfig,
) -> Result<PlayoutResult, ActionError> {
    let [red, blue] = players;
    let initial = hull_differential(&env.state);
    let mut values = Vec::new();
    let mut round = 0u32;

    while round < config.round_limit
        && !env.state.active_units().is_empty()
        && !env.state.other_units().is_empty()
    {
        round += 1;
        match env.state.active_player {
            Player::Red => red.make_actions(env)?,
            Player::Blue => blue.make_actions(env)?,
        };
        env.state.next_turn();

        if config.gather_values && round % 2 == 1 {
            let hull = hull_differential(&env.state);
            values.push(if config.relative { hull - initial } else { hull });
        }
    }

    if config.gather_values && config.pad_values {
        let hull = hull_differential(&env.state);
        let target_len = (config.round_limit / 2) as usize;
        while values.len() < target_len {
            values.push(if config.relative { hull - initial } else { hull });
        }
    }

    Ok(PlayoutResult {
        rounds: round,
        outcome: env.state.result(),
        values,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::players::ScriptedPlayer;
    use crate::scripts::test_support::{battle, raider};
    use crate::scripts::{Attacker, Kiter};

    #[test]
    fn test_playout_finds_a_winner() {
        // Two-on-one: Red has overwhelming force
        let mut env = battle(
            vec![raider(1, 0, 0), raider(2, 1, 0)],
            vec![raider(3, 0, 3)],
        );
        let mut red = ScriptedPlayer::new(Attacker);
        let mut blue = ScriptedPlayer::new(Attacker);

        let result = playout(
            &mut env,
            [&mut red, &mut blue],
            &PlayoutConfig::with_round_limit(50),
        )
        .unwrap();

        assert_eq!(result.outcome, CombatResult::Winner(Player::Red));
        assert!(result.rounds <= 50);
        assert!(env.state.units_of(Player::Blue).is_empty());
    }

    #[test]
    fn test_round_limit_reports_ongoing() {
        // Out of sensor range and immobile: nobody can ever hit anyone
        let mut pacifist = raider(1, 0, 0);
        pacifist.total_engines_energy = 0.0;
        pacifist.avail_engines_energy = 0.0;
        let mut hermit = raider(2, 0, 7);
        hermit.total_engines_energy = 0.0;
        hermit.avail_engines_energy = 0.0;

        let mut env = battle(vec![pacifist], vec![hermit]);
        let mut red = ScriptedPlayer::new(Attacker);
        let mut blue = ScriptedPlayer::new(Attacker);

        let result = playout(
            &mut env,
            [&mut red, &mut blue],
            &PlayoutConfig::with_round_limit(6),
        )
        .unwrap();

        assert_eq!(result.rounds, 6);
        assert_eq!(result.outcome, CombatResult::Ongoing);
    }

    #[test]
    fn test_both_sides_empty_is_a_draw() {
        let mut env = battle(vec![], vec![]);
        let mut red = ScriptedPlayer::new(Attacker);
        let mut blue = ScriptedPlayer::new(Attacker);

        let result = playout(
            &mut env,
            [&mut red, &mut blue],
            &PlayoutConfig::with_round_limit(10),
        )
        .unwrap();

        assert_eq!(result.rounds, 0);
        assert_eq!(result.outcome, CombatResult::Draw);
    }

    #[test]
    fn test_gathered_values_track_hull_loss() {
        let mut env = battle(vec![raider(1, 0, 0), raider(2, 1, 0)], vec![raider(3, 0, 3)]);
        let mut red = ScriptedPlayer::new(Attacker);
        let mut blue = ScriptedPlayer::new(Kiter);

        let config = PlayoutConfig {
            round_limit: 10,
            gather_values: true,
            relative: true,
            pad_values: true,
        };
        let result = playout(&mut env, [&mut red, &mut blue], &config).unwrap();

        assert_eq!(result.values.len(), 5);
        // Red outnumbers Blue two to one: the differential can only improve
        assert!(result.values.iter().all(|&v| v >= 0.0));
    }

    #[test]
    fn test_playout_mutates_in_place() {
        let mut env = battle(vec![raider(1, 0, 0)], vec![raider(2, 0, 2)]);
        let mut red = ScriptedPlayer::new(Attacker);
        let mut blue = ScriptedPlayer::new(Attacker);

        playout(
            &mut env,
            [&mut red, &mut blue],
            &PlayoutConfig::with_round_limit(2),
        )
        .unwrap();

        // Both sides traded fire for two rounds
        let total_hull: f32 = env
            .state
            .units_of(Player::Red)
            .values()
            .chain(env.state.units_of(Player::Blue).values())
            .map(|u| u.hull)
            .sum();
        assert!(total_hull < 20.0);
    }
}
