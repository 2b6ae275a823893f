//! Onboarding wizard state machine.
//!
//! Four linear steps, then `Completed`. The recommendation pipeline runs
//! exactly once, at the transition past the last step; stepping backward
//! never recomputes. Once completed the profile is frozen until an explicit
//! reset — only the selected-investments toggle map stays editable.

use crate::{recommend, EngineError};
use models::{FinancialSituation, InvestmentPreference, PortfolioData, Recommendation};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OnboardingStep {
    FinancialSituation,
    PersonalSituation,
    InvestmentGoals,
    Preferences,
    Completed,
}

impl OnboardingStep {
    fn next(self) -> Self {
        match self {
            Self::FinancialSituation => Self::PersonalSituation,
            Self::PersonalSituation => Self::InvestmentGoals,
            Self::InvestmentGoals => Self::Preferences,
            Self::Preferences | Self::Completed => Self::Completed,
        }
    }

    fn prev(self) -> Option<Self> {
        match self {
            Self::FinancialSituation | Self::Completed => None,
            Self::PersonalSituation => Some(Self::FinancialSituation),
            Self::InvestmentGoals => Some(Self::PersonalSituation),
            Self::Preferences => Some(Self::InvestmentGoals),
        }
    }
}

/// Result of advancing the wizard by one step.
#[derive(Debug, Clone, PartialEq)]
pub enum Advance {
    Moved(OnboardingStep),
    Completed(Recommendation),
}

/// Owns the draft aggregate while the user walks the wizard, and the frozen
/// aggregate afterwards. There is exactly one of these per session.
#[derive(Debug)]
pub struct OnboardingSession {
    data: PortfolioData,
    step: OnboardingStep,
    recommendation: Option<Recommendation>,
}

impl OnboardingSession {
    pub fn new() -> Self {
        Self::resume(PortfolioData::default())
    }

    /// Picks up a previously persisted aggregate; a completed one resumes
    /// directly in the frozen state.
    pub fn resume(data: PortfolioData) -> Self {
        let step = if data.completed_onboarding {
            OnboardingStep::Completed
        } else {
            OnboardingStep::FinancialSituation
        };
        Self {
            data,
            step,
            recommendation: None,
        }
    }

    pub fn step(&self) -> OnboardingStep {
        self.step
    }

    pub fn data(&self) -> &PortfolioData {
        &self.data
    }

    fn guard_editable(&self) -> Result<(), EngineError> {
        if self.data.completed_onboarding {
            return Err(EngineError::OnboardingComplete);
        }
        Ok(())
    }

    pub fn recommendation(&self) -> Option<&Recommendation> {
        self.recommendation.as_ref()
    }

    pub fn set_situation(&mut self, situation: FinancialSituation) -> Result<(), EngineError> {
        self.guard_editable()?;
        self.data.financial_situation = situation;
        Ok(())
    }

    pub fn set_preference(&mut self, pref: InvestmentPreference) -> Result<(), EngineError> {
        self.guard_editable()?;
        self.data.investment_pref = pref;
        Ok(())
    }

    /// Moves one step forward. The final advance runs the recommendation
    /// pipeline once and freezes the profile.
    pub fn advance(&mut self) -> Result<Advance, EngineError> {
        match self.step {
            OnboardingStep::Completed => Err(EngineError::OnboardingComplete),
            OnboardingStep::Preferences => {
                let recommendation =
                    recommend(&self.data.financial_situation, &self.data.investment_pref);
                self.data.completed_onboarding = true;
                self.step = OnboardingStep::Completed;
                self.recommendation = Some(recommendation.clone());
                Ok(Advance::Completed(recommendation))
            }
            step => {
                self.step = step.next();
                Ok(Advance::Moved(self.step))
            }
        }
    }

    /// Moves one step back, if there is one. Never recomputes.
    pub fn back(&mut self) -> bool {
        match self.step.prev() {
            Some(step) => {
                self.step = step;
                true
            }
            None => false,
        }
    }

    /// Flips one selection flag. Allowed even after completion; returns the
    /// new state of the flag.
    pub fn toggle_selection(&mut self, id: &str) -> bool {
        let entry = self
            .data
            .selected_investments
            .entry(id.to_string())
            .or_insert(false);
        *entry = !*entry;
        *entry
    }

    /// Back to defaults and step one; the recommendation output is gone.
    /// Callers are expected to have confirmed this with the user.
    pub fn reset(&mut self) {
        self.data = PortfolioData::default();
        self.step = OnboardingStep::FinancialSituation;
        self.recommendation = None;
    }
}

impl Default for OnboardingSession {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use models::RiskTolerance;

    fn complete(session: &mut OnboardingSession) -> Recommendation {
        loop {
            match session.advance().expect("advance during onboarding") {
                Advance::Moved(_) => continue,
                Advance::Completed(recommendation) => return recommendation,
            }
        }
    }

    #[test]
    fn steps_are_linear_and_end_in_completed() {
        let mut session = OnboardingSession::new();
        assert_eq!(session.step(), OnboardingStep::FinancialSituation);
        assert_eq!(
            session.advance().unwrap(),
            Advance::Moved(OnboardingStep::PersonalSituation)
        );
        assert_eq!(
            session.advance().unwrap(),
            Advance::Moved(OnboardingStep::InvestmentGoals)
        );
        assert_eq!(
            session.advance().unwrap(),
            Advance::Moved(OnboardingStep::Preferences)
        );
        assert!(matches!(
            session.advance().unwrap(),
            Advance::Completed(_)
        ));
        assert_eq!(session.step(), OnboardingStep::Completed);
        assert!(session.data().completed_onboarding);
    }

    #[test]
    fn recommendation_exists_only_after_completion() {
        let mut session = OnboardingSession::new();
        assert!(session.recommendation().is_none());
        session.advance().unwrap();
        assert!(session.recommendation().is_none());
        complete(&mut session);
        assert!(session.recommendation().is_some());
    }

    #[test]
    fn advancing_past_completed_is_rejected() {
        let mut session = OnboardingSession::new();
        complete(&mut session);
        assert_eq!(session.advance(), Err(EngineError::OnboardingComplete));
    }

    #[test]
    fn back_never_recomputes_and_stops_at_step_one() {
        let mut session = OnboardingSession::new();
        session.advance().unwrap();
        session.advance().unwrap();
        assert!(session.back());
        assert_eq!(session.step(), OnboardingStep::PersonalSituation);
        assert!(session.recommendation().is_none());
        assert!(session.back());
        assert!(!session.back());
        assert_eq!(session.step(), OnboardingStep::FinancialSituation);
    }

    #[test]
    fn completing_twice_with_same_inputs_is_idempotent() {
        let mut first = OnboardingSession::new();
        let mut second = OnboardingSession::new();
        assert_eq!(complete(&mut first), complete(&mut second));
    }

    #[test]
    fn completed_profile_rejects_edits_but_allows_toggles() {
        let mut session = OnboardingSession::new();
        complete(&mut session);

        let mut pref = session.data().investment_pref.clone();
        pref.risk_tolerance = RiskTolerance::High;
        assert_eq!(
            session.set_preference(pref),
            Err(EngineError::OnboardingComplete)
        );
        assert_eq!(
            session.set_situation(FinancialSituation::default()),
            Err(EngineError::OnboardingComplete)
        );

        assert!(session.toggle_selection("vti"));
        assert!(!session.toggle_selection("vti"));
    }

    #[test]
    fn reset_returns_to_defaults_and_clears_output() {
        let mut session = OnboardingSession::new();
        let mut pref = InvestmentPreference::default();
        pref.risk_tolerance = RiskTolerance::High;
        session.set_preference(pref).unwrap();
        complete(&mut session);
        session.toggle_selection("vti");

        session.reset();
        assert_eq!(session.step(), OnboardingStep::FinancialSituation);
        assert_eq!(session.data(), &PortfolioData::default());
        assert!(session.recommendation().is_none());
    }

    #[test]
    fn resuming_a_completed_aggregate_is_frozen() {
        let mut data = PortfolioData::default();
        data.completed_onboarding = true;
        let mut session = OnboardingSession::resume(data);
        assert_eq!(session.step(), OnboardingStep::Completed);
        assert_eq!(session.advance(), Err(EngineError::OnboardingComplete));
    }

    #[test]
    fn edits_are_allowed_while_the_wizard_is_in_progress() {
        let mut session = OnboardingSession::new();
        session.advance().unwrap();
        assert!(session
            .set_situation(FinancialSituation::default())
            .is_ok());
    }
}
