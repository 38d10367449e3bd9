//! The policy contract and the portfolio table

use skirmish_core::{Action, ActionError, GameEnvironment, Hex, ScriptId};

/// A unit-control policy.
///
/// Given the environment, the enemy positions at invocation time, and the
/// controlled unit's position, produce one action. Policies follow
/// decide-and-apply-immediately semantics: moves and attacks are executed
/// against `env` during decision-making, and the returned action (usually a
/// composite) reports what was done.
pub trait Script {
    fn make_action(
        &self,
        env: &mut GameEnvironment,
        enemies: &[Hex],
        unit: Hex,
    ) -> Result<Action, ActionError>;

    /// One- or two-letter tag for assignment logs
    fn short_name(&self) -> &'static str;
}

/// Immutable, ordered set of candidate policies.
///
/// Units and the search refer to entries by [`ScriptId`]; the table itself
/// is never mutated, so handles stay valid across any number of deep clones.
pub struct Portfolio {
    scripts: Vec<Box<dyn Script>>,
}

impl Portfolio {
    pub fn new(scripts: Vec<Box<dyn Script>>) -> Self {
        assert!(!scripts.is_empty(), "portfolio must not be empty");
        Self { scripts }
    }

    /// The four reference policies
    pub fn standard() -> Self {
        use crate::scripts::{Attacker, DirectAttacker, DirectKiter, Kiter};
        Self::new(vec![
            Box::new(Attacker),
            Box::new(Kiter),
            Box::new(DirectAttacker),
            Box::new(DirectKiter),
        ])
    }

    pub fn get(&self, id: ScriptId) -> &dyn Script {
        self.scripts[id.0].as_ref()
    }

    pub fn ids(&self) -> impl Iterator<Item = ScriptId> {
        (0..self.scripts.len()).map(ScriptId)
    }

    pub fn len(&self) -> usize {
        self.scripts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scripts.is_empty()
    }
}

impl std::fmt::Debug for Portfolio {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<&str> = self.scripts.iter().map(|s| s.short_name()).collect();
        f.debug_struct("Portfolio").field("scripts", &names).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_portfolio() {
        let portfolio = Portfolio::standard();
        assert_eq!(portfolio.len(), 4);
        let ids: Vec<ScriptId> = portfolio.ids().collect();
        assert_eq!(ids[0], ScriptId(0));
        assert_eq!(portfolio.get(ScriptId(1)).short_name(), "K");
    }

    #[test]
    #[should_panic(expected = "portfolio must not be empty")]
    fn test_empty_portfolio_rejected() {
        Portfolio::new(vec![]);
    }
}
