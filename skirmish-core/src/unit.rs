//! Combat units and their per-turn resource bookkeeping

use crate::hex::Hex;
use serde::{Deserialize, Serialize};

/// Number of 60-degree shield arcs around a unit
pub const SHIELD_ARCS: usize = 6;

/// Handle into a portfolio of control policies.
///
/// Units reference their controlling policy by index rather than by owned
/// object, so deep-cloning a state is a flat copy and clones can never alias
/// policy state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ScriptId(pub usize);

/// A single combat unit.
///
/// Fields are public: units are scenario data, constructed directly by the
/// embedding program. A unit with `total_engines_energy` of zero is a static
/// emplacement.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Unit {
    /// Process-unique identity, stable across deep clones
    pub global_key: u32,
    /// Current position; owned exclusively by this unit while alive
    pub position: Hex,
    /// Facing, an index into the hex direction table (0-5)
    pub direction: usize,

    pub total_energy: f32,
    pub hull: f32,
    pub hull_max: f32,
    pub resource_penalty_active: bool,
    pub resource_penalty_modifier: f32,

    /// Current charge of each shield arc
    pub shields: [f32; SHIELD_ARCS],
    /// Per-arc maximum as a percentage of total shield energy
    pub shield_arc_pct: [f32; SHIELD_ARCS],
    pub shields_energy_pct: f32,
    pub shields_recharge_rate: f32,

    pub weapon_damage: f32,
    pub weapon_shield_damage: f32,
    pub total_weapons_energy: f32,
    pub avail_weapons_energy: f32,

    pub total_sensors_energy: f32,
    pub sensors_energy: f32,

    pub total_engines_energy: f32,
    pub avail_engines_energy: f32,

    /// Controlling policy, swapped freely by the search per trial
    #[serde(skip)]
    pub script: Option<ScriptId>,
}

impl Default for Unit {
    fn default() -> Self {
        Self {
            global_key: 0,
            position: Hex::ORIGIN,
            direction: 0,
            total_energy: 0.0,
            hull: 0.0,
            hull_max: 0.0,
            resource_penalty_active: false,
            resource_penalty_modifier: 1.0,
            shields: [0.0; SHIELD_ARCS],
            shield_arc_pct: [0.0; SHIELD_ARCS],
            shields_energy_pct: 0.0,
            shields_recharge_rate: 0.0,
            weapon_damage: 0.0,
            weapon_shield_damage: 0.0,
            total_weapons_energy: 0.0,
            avail_weapons_energy: 0.0,
            total_sensors_energy: 0.0,
            sensors_energy: 0.0,
            total_engines_energy: 0.0,
            avail_engines_energy: 0.0,
            script: None,
        }
    }
}

impl Unit {
    /// Total shield energy pool derived from the unit's energy budget
    pub fn total_shields_energy(&self) -> f32 {
        round1(self.shields_energy_pct / 100.0 * self.total_energy)
    }

    pub fn can_move(&self) -> bool {
        self.avail_engines_energy > 0.0
    }

    pub fn can_attack(&self) -> bool {
        self.avail_weapons_energy > 0.0
    }

    /// Turn-boundary recharge.
    ///
    /// Each shield arc regains a recharge-rate fraction of the total shield
    /// pool, capped at the arc maximum. All recharged pools except engines
    /// are then scaled by the resource-penalty modifier.
    pub fn recharge(&mut self) {
        let total_shields = self.total_shields_energy();
        let gain = total_shields * (self.shields_recharge_rate / 100.0);

        let mut recharged = [0.0f32; SHIELD_ARCS];
        for i in 0..SHIELD_ARCS {
            let arc_max = total_shields * (self.shield_arc_pct[i] / 100.0);
            recharged[i] = (self.shields[i] + gain).min(arc_max);
        }

        let modifier = if self.resource_penalty_active {
            self.resource_penalty_modifier
        } else {
            1.0
        };
        for i in 0..SHIELD_ARCS {
            self.shields[i] = round2(recharged[i] * modifier);
        }
        self.avail_weapons_energy = round1(self.total_weapons_energy * modifier);
        self.sensors_energy = round1(self.total_sensors_energy * modifier);
        self.avail_engines_energy = self.total_engines_energy;
    }

    /// Attack value of this unit: attack power divided by its remaining
    /// HP pool (hull plus average shield charge)
    pub fn combat_value(&self) -> f32 {
        let shield_avg = self.shields.iter().sum::<f32>() / SHIELD_ARCS as f32;
        (self.weapon_damage * self.total_weapons_energy
            + self.weapon_shield_damage * self.total_weapons_energy)
            / (self.hull + shield_avg)
    }
}

/// Round to one decimal place
pub(crate) fn round1(v: f32) -> f32 {
    (v * 10.0).round() / 10.0
}

/// Round to two decimal places
pub(crate) fn round2(v: f32) -> f32 {
    (v * 100.0).round() / 100.0
}
