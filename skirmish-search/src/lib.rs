//! Skirmish Search - policies, playouts and portfolio-greedy search
//!
//! This crate layers decision-making on top of `skirmish-core`:
//! - The `Script` policy contract and the portfolio table
//! - Reference micro policies (attack-value focus fire and kiting)
//! - Players that decide and apply actions for one side
//! - The playout driver running a combat to termination
//! - Portfolio greedy search with a memoized playout evaluator

pub mod micro;
pub mod pgs;
pub mod players;
pub mod playout;
pub mod script;
pub mod scripts;

// Re-exports for convenient access
pub use pgs::{PgsConfig, PortfolioGreedyPlayer, PortfolioGreedySearch, SearchStats};
pub use players::{Player, RandomScriptPlayer, ScriptExecutor, ScriptedPlayer};
pub use playout::{hull_differential, playout, PlayoutConfig, PlayoutResult};
pub use script::{Portfolio, Script};
pub use scripts::{Attacker, DirectAttacker, DirectKiter, Kiter};
