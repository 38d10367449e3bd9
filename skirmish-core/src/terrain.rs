//! Static terrain classification

use crate::hex::Hex;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

/// Terrain class of a single hex
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HexType {
    Empty,
    Impassable,
    DoubleCost,
}

impl HexType {
    /// Cost of moving through a hex of this type
    pub fn traversal_cost(self) -> u32 {
        match self {
            HexType::Empty => 1,
            HexType::Impassable => u32::MAX,
            HexType::DoubleCost => 2,
        }
    }
}

/// Sparse terrain map; hexes without an entry read as [`HexType::Empty`]
pub type TerrainMap = FxHashMap<Hex, HexType>;
