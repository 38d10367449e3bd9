//! Skirmish Core - deterministic hex-grid combat simulation
//!
//! This crate provides the world model and execution semantics for the
//! simulator:
//! - Hex grid geometry (axial coordinates)
//! - Static terrain and the dynamic occupancy overlay
//! - Units with hull/shield pools and per-turn energy budgets
//! - Game state with deep cloning for speculative rollouts
//! - Actions (move, attack, composite) and their execution
//! - Bounded A* pathfinding with custom stop conditions
//! - Game state evaluation

pub mod action;
pub mod environment;
pub mod eval;
pub mod hex;
pub mod pathfinding;
pub mod state;
pub mod terrain;
pub mod unit;

// Re-exports for convenient access
pub use action::{Action, ActionError, AttackAction, CompositeAction, MoveAction};
pub use environment::GameEnvironment;
pub use eval::{Evaluator, MaterialEvaluator};
pub use hex::{reverse_direction, Hex, HEX_DIRECTIONS};
pub use pathfinding::{PathNode, Pathfinder, StopCondition, MAX_GENERATED_NODES};
pub use state::{CombatResult, GameState, Player, UnitMap};
pub use terrain::{HexType, TerrainMap};
pub use unit::{ScriptId, Unit, SHIELD_ARCS};
