//! Portfolio recommendation engine.
//!
//! Three pure calculators (`allocation`, `instruments`, `projection`)
//! composed by [`recommend`], plus the onboarding wizard state machine that
//! decides when the composition runs. Nothing in here performs I/O; the
//! persistence adapter and any external collaborators live in sibling
//! crates.

pub mod allocation;
pub mod instruments;
pub mod intake;
pub mod onboarding;
pub mod projection;

use models::{FinancialSituation, InvestmentPreference, Recommendation};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum EngineError {
    #[error("onboarding is already complete; reset the portfolio to start over")]
    OnboardingComplete,
}

/// Runs the full pipeline once: bucket allocation, instrument selection,
/// and the future-value projection. Pure, so calling it again with the same
/// profile yields an identical result.
pub fn recommend(
    situation: &FinancialSituation,
    pref: &InvestmentPreference,
) -> Recommendation {
    let allocation = allocation::compute(situation, pref);
    let investments = instruments::select(&allocation, pref);
    let projected_value = projection::project(situation, pref);
    Recommendation {
        allocation,
        investments,
        projected_value,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recommend_is_idempotent() {
        let situation = FinancialSituation::default();
        let pref = InvestmentPreference::default();
        let first = recommend(&situation, &pref);
        let second = recommend(&situation, &pref);
        assert_eq!(first, second);
    }
}
