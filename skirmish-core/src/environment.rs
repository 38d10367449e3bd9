//! Game environment: static terrain paired with one mutable state

use crate::hex::Hex;
use crate::state::GameState;
use crate::terrain::{HexType, TerrainMap};
use std::sync::Arc;

/// The full environment a combat takes place in.
///
/// The radius and static terrain are immutable and shared between clones;
/// only the [`GameState`] is mutable. [`clone_state`](Self::clone_state)
/// is what makes speculative search safe: the clone can be mutated and
/// discarded without touching the original.
#[derive(Clone, Debug)]
pub struct GameEnvironment {
    pub radius: i16,
    pub terrain: Arc<TerrainMap>,
    pub state: GameState,
}

impl GameEnvironment {
    pub fn new(radius: i16, mut state: GameState, terrain: Arc<TerrainMap>) -> Self {
        // Static terrain overwrites unit-occupancy marks on collision
        for (&hex, &ty) in terrain.iter() {
            state.dynamic_map.insert(hex, ty);
        }
        Self {
            radius,
            terrain,
            state,
        }
    }

    /// Whether `hex` lies within this environment's radius
    pub fn is_valid(&self, hex: Hex) -> bool {
        let radius = i32::from(self.radius);
        let q = i32::from(hex.q);
        let r = i32::from(hex.r);
        let s = -q - r;
        q >= -radius && q <= radius && r >= -radius && r <= radius && s >= -radius && s <= radius
    }

    /// Terrain at `position` as the pathfinder sees it (units included)
    pub fn hex_type_at(&self, position: Hex) -> HexType {
        self.state
            .dynamic_map
            .get(&position)
            .copied()
            .unwrap_or(HexType::Empty)
    }

    pub fn is_passable(&self, hex: Hex) -> bool {
        self.hex_type_at(hex) != HexType::Impassable
    }

    /// Movement cost at `hex` considering static terrain only
    pub fn static_cost(&self, hex: Hex) -> u32 {
        self.terrain
            .get(&hex)
            .copied()
            .unwrap_or(HexType::Empty)
            .traversal_cost()
    }

    /// New environment sharing this one's terrain with a deep-cloned state
    pub fn clone_state(&self) -> GameEnvironment {
        GameEnvironment::new(self.radius, self.state.deep_clone(), Arc::clone(&self.terrain))
    }
}
