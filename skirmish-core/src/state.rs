//! Dynamic game state: per-player unit placement and turn bookkeeping

use crate::hex::Hex;
use crate::terrain::{HexType, TerrainMap};
use crate::unit::Unit;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

/// One of the two opposing sides
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Player {
    Red = 0,
    Blue = 1,
}

impl Player {
    pub fn opponent(self) -> Self {
        match self {
            Player::Red => Player::Blue,
            Player::Blue => Player::Red,
        }
    }

    pub fn index(self) -> usize {
        self as usize
    }
}

/// Terminal classification of a state
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CombatResult {
    Ongoing,
    Draw,
    Winner(Player),
}

/// Units of one player, keyed by position
pub type UnitMap = FxHashMap<Hex, Unit>;

/// Dynamic game state (clone to mutate speculatively)
#[derive(Clone, Debug)]
pub struct GameState {
    units: [UnitMap; 2],
    pub active_player: Player,
    /// Terrain as the pathfinder sees it: static terrain plus unit-occupied
    /// hexes marked impassable
    pub(crate) dynamic_map: TerrainMap,
}

impl GameState {
    /// Create a state from per-player unit maps.
    ///
    /// Every occupied hex is marked impassable in the dynamic overlay;
    /// [`GameEnvironment::new`](crate::environment::GameEnvironment::new)
    /// layers the static terrain on top.
    pub fn new(units: [UnitMap; 2], active_player: Player) -> Self {
        let mut dynamic_map = TerrainMap::default();
        for map in &units {
            for &hex in map.keys() {
                dynamic_map.insert(hex, HexType::Impassable);
            }
        }
        Self {
            units,
            active_player,
            dynamic_map,
        }
    }

    /// Create a state from unit lists, keyed by each unit's position
    pub fn from_units(red: Vec<Unit>, blue: Vec<Unit>, active_player: Player) -> Self {
        let mut maps = [UnitMap::default(), UnitMap::default()];
        for (map, units) in maps.iter_mut().zip([red, blue]) {
            for unit in units {
                map.insert(unit.position, unit);
            }
        }
        Self::new(maps, active_player)
    }

    pub fn units_of(&self, player: Player) -> &UnitMap {
        &self.units[player.index()]
    }

    pub fn units_of_mut(&mut self, player: Player) -> &mut UnitMap {
        &mut self.units[player.index()]
    }

    /// Units of the currently active player
    pub fn active_units(&self) -> &UnitMap {
        self.units_of(self.active_player)
    }

    /// Units of the currently inactive player
    pub fn other_units(&self) -> &UnitMap {
        self.units_of(self.active_player.opponent())
    }

    /// Unit at `position`, searching the active player's units first
    pub fn unit_at(&self, position: Hex) -> Option<&Unit> {
        self.units_of(self.active_player)
            .get(&position)
            .or_else(|| self.units_of(self.active_player.opponent()).get(&position))
    }

    pub fn unit_at_mut(&mut self, position: Hex) -> Option<&mut Unit> {
        let active = self.active_player.index();
        if self.units[active].contains_key(&position) {
            return self.units[active].get_mut(&position);
        }
        self.units[1 - active].get_mut(&position)
    }

    /// Unit of the active player at `position`
    pub fn active_unit_at(&self, position: Hex) -> Option<&Unit> {
        self.active_units().get(&position)
    }

    /// Unit with the given identity, regardless of side
    pub fn unit_by_key(&self, key: u32) -> Option<&Unit> {
        self.units
            .iter()
            .flat_map(|map| map.values())
            .find(|unit| unit.global_key == key)
    }

    /// Positions of `player`'s units in ascending unit-key order
    pub fn sorted_positions(&self, player: Player) -> Vec<Hex> {
        let mut keyed: Vec<(u32, Hex)> = self
            .units_of(player)
            .values()
            .map(|unit| (unit.global_key, unit.position))
            .collect();
        keyed.sort_unstable_by_key(|&(key, _)| key);
        keyed.into_iter().map(|(_, hex)| hex).collect()
    }

    /// Destroy the unit at `position` and clear its overlay entry
    pub fn kill_unit_at(&mut self, position: Hex) {
        for map in &mut self.units {
            if map.remove(&position).is_some() {
                break;
            }
        }
        self.dynamic_map.remove(&position);
    }

    /// Instantly relocate the unit at `from` to `to`, updating the overlay
    pub fn move_unit(&mut self, from: Hex, to: Hex) {
        for map in &mut self.units {
            if let Some(mut unit) = map.remove(&from) {
                unit.position = to;
                map.insert(to, unit);
            }
        }
        self.dynamic_map.remove(&from);
        self.dynamic_map.insert(to, HexType::Impassable);
    }

    /// Advance one turn: flip the active player, then recharge every unit of
    /// the new active player
    pub fn next_turn(&mut self) {
        self.active_player = self.active_player.opponent();
        for unit in self.units[self.active_player.index()].values_mut() {
            unit.recharge();
        }
    }

    /// Terminal classification: a draw when both sides are empty, a winner
    /// when exactly one is, ongoing otherwise
    pub fn result(&self) -> CombatResult {
        match (self.units[0].is_empty(), self.units[1].is_empty()) {
            (true, true) => CombatResult::Draw,
            (true, false) => CombatResult::Winner(Player::Blue),
            (false, true) => CombatResult::Winner(Player::Red),
            (false, false) => CombatResult::Ongoing,
        }
    }

    /// Fully independent copy of this state.
    ///
    /// The dynamic overlay is rebuilt from unit occupancy; environment
    /// construction re-applies the static terrain, mirroring how the state
    /// was first built.
    pub fn deep_clone(&self) -> Self {
        Self::new(self.units.clone(), self.active_player)
    }
}
