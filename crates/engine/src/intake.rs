//! Wizard intake: raw answers off the wire into the canonical profile.
//!
//! Enum-like answers arrive as plain strings and parse leniently — anything
//! unrecognized maps to the conservative variant with a warning, matching
//! how the allocation rules treat an unknown risk tolerance. Numeric
//! answers are validated here so the calculators downstream never see an
//! out-of-range value.

use models::{
    AssetComfort, CashFlow, DebtType, Dependents, EmergencyFund, Employment,
    FinancialSituation, InvestmentGoal, InvestmentPreference, Involvement, RiskTolerance,
    TaxNeeds,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    #[error("time horizon must be between 1 and 50 years, got {0}")]
    TimeHorizonOutOfRange(u32),
    #[error("initial amount must be at least 100, got {0}")]
    InitialAmountTooSmall(f64),
    #[error("monthly contribution cannot be negative, got {0}")]
    NegativeMonthlyContribution(f64),
    #[error("debt amount cannot be negative, got {0}")]
    NegativeDebtAmount(f64),
}

/// Raw wizard answers. Field names match the onboarding form document.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct IntakeForm {
    pub emergency_fund: String,
    pub debt_type: String,
    pub debt_amount: Option<f64>,
    pub cash_flow: String,
    pub employment: String,
    pub dependents: String,
    pub risk_tolerance: String,
    pub investment_goal: String,
    pub time_horizon: u32,
    pub initial_amount: f64,
    pub monthly_contribution: f64,
    pub asset_comfort: AssetComfort,
    pub involvement: String,
    pub tax_needs: String,
    pub ethical: bool,
}

impl Default for IntakeForm {
    fn default() -> Self {
        Self {
            emergency_fund: "none".to_string(),
            debt_type: "none".to_string(),
            debt_amount: None,
            cash_flow: "neutral".to_string(),
            employment: "stable".to_string(),
            dependents: "none".to_string(),
            risk_tolerance: "medium".to_string(),
            investment_goal: "wealth".to_string(),
            time_horizon: 10,
            initial_amount: 10_000.0,
            monthly_contribution: 500.0,
            asset_comfort: AssetComfort::default(),
            involvement: "guided".to_string(),
            tax_needs: "none".to_string(),
            ethical: false,
        }
    }
}

/// Validates the numeric answers and maps the form onto the canonical
/// profile records.
pub fn normalize(
    form: &IntakeForm,
) -> Result<(FinancialSituation, InvestmentPreference), ValidationError> {
    if !(1..=50).contains(&form.time_horizon) {
        return Err(ValidationError::TimeHorizonOutOfRange(form.time_horizon));
    }
    if form.initial_amount < 100.0 {
        return Err(ValidationError::InitialAmountTooSmall(form.initial_amount));
    }
    if form.monthly_contribution < 0.0 {
        return Err(ValidationError::NegativeMonthlyContribution(
            form.monthly_contribution,
        ));
    }
    if let Some(debt) = form.debt_amount {
        if debt < 0.0 {
            return Err(ValidationError::NegativeDebtAmount(debt));
        }
    }

    let debt_type = parse_debt_type(&form.debt_type);
    let situation = FinancialSituation {
        emergency_fund: parse_emergency_fund(&form.emergency_fund),
        debt_type,
        // The amount only means something alongside high-interest debt.
        debt_amount: if debt_type == DebtType::High {
            form.debt_amount
        } else {
            None
        },
        cash_flow: parse_cash_flow(&form.cash_flow),
        employment: parse_employment(&form.employment),
        dependents: parse_dependents(&form.dependents),
    };

    let pref = InvestmentPreference {
        risk_tolerance: parse_risk_tolerance(&form.risk_tolerance),
        investment_goal: parse_investment_goal(&form.investment_goal),
        time_horizon: form.time_horizon,
        initial_amount: form.initial_amount,
        monthly_contribution: form.monthly_contribution,
        asset_comfort: form.asset_comfort.clone(),
        involvement: parse_involvement(&form.involvement),
        tax_needs: parse_tax_needs(&form.tax_needs),
        ethical: form.ethical,
    };

    Ok((situation, pref))
}

fn parse_risk_tolerance(s: &str) -> RiskTolerance {
    match s.trim().to_ascii_lowercase().as_str() {
        "low" => RiskTolerance::Low,
        "medium" => RiskTolerance::Medium,
        "high" => RiskTolerance::High,
        other => {
            warn!(value = other, "unrecognized risk tolerance, using low");
            RiskTolerance::Low
        }
    }
}

fn parse_emergency_fund(s: &str) -> EmergencyFund {
    match s.trim().to_ascii_lowercase().as_str() {
        "none" => EmergencyFund::None,
        "partial" => EmergencyFund::Partial,
        "full" => EmergencyFund::Full,
        other => {
            warn!(value = other, "unrecognized emergency fund status, using none");
            EmergencyFund::None
        }
    }
}

fn parse_debt_type(s: &str) -> DebtType {
    match s.trim().to_ascii_lowercase().as_str() {
        "none" => DebtType::None,
        "low" => DebtType::Low,
        "high" => DebtType::High,
        "other" => DebtType::Other,
        other => {
            warn!(value = other, "unrecognized debt type, using other");
            DebtType::Other
        }
    }
}

fn parse_cash_flow(s: &str) -> CashFlow {
    match s.trim().to_ascii_lowercase().as_str() {
        "positive" => CashFlow::Positive,
        "neutral" => CashFlow::Neutral,
        "negative" => CashFlow::Negative,
        other => {
            warn!(value = other, "unrecognized cash flow, using neutral");
            CashFlow::Neutral
        }
    }
}

fn parse_employment(s: &str) -> Employment {
    match s.trim().to_ascii_lowercase().as_str() {
        "stable" => Employment::Stable,
        "variable" => Employment::Variable,
        "retired" => Employment::Retired,
        "other" => Employment::Other,
        other => {
            warn!(value = other, "unrecognized employment, using other");
            Employment::Other
        }
    }
}

fn parse_dependents(s: &str) -> Dependents {
    match s.trim().to_ascii_lowercase().as_str() {
        "single" => Dependents::Single,
        "partnered" => Dependents::Partnered,
        "children" => Dependents::Children,
        "elderly" => Dependents::Elderly,
        "none" => Dependents::None,
        other => {
            warn!(value = other, "unrecognized dependents, using none");
            Dependents::None
        }
    }
}

fn parse_investment_goal(s: &str) -> InvestmentGoal {
    match s.trim().to_ascii_lowercase().as_str() {
        "retirement" => InvestmentGoal::Retirement,
        "wealth" => InvestmentGoal::Wealth,
        "income" => InvestmentGoal::Income,
        "savings" => InvestmentGoal::Savings,
        "other" => InvestmentGoal::Other,
        other => {
            warn!(value = other, "unrecognized investment goal, using other");
            InvestmentGoal::Other
        }
    }
}

fn parse_involvement(s: &str) -> Involvement {
    match s.trim().to_ascii_lowercase().as_str() {
        "automated" => Involvement::Automated,
        "guided" => Involvement::Guided,
        "self-directed" | "selfdirected" => Involvement::SelfDirected,
        other => {
            warn!(value = other, "unrecognized involvement, using guided");
            Involvement::Guided
        }
    }
}

fn parse_tax_needs(s: &str) -> TaxNeeds {
    match s.trim().to_ascii_lowercase().as_str() {
        "high" => TaxNeeds::High,
        "maximized" => TaxNeeds::Maximized,
        "none" => TaxNeeds::None,
        other => {
            warn!(value = other, "unrecognized tax needs, using none");
            TaxNeeds::None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_form_normalizes_to_default_profile() {
        let (situation, pref) = normalize(&IntakeForm::default()).unwrap();
        assert_eq!(situation, FinancialSituation::default());
        assert_eq!(pref, InvestmentPreference::default());
    }

    #[test]
    fn unrecognized_risk_tolerance_falls_back_to_low() {
        let form = IntakeForm {
            risk_tolerance: "yolo".to_string(),
            ..IntakeForm::default()
        };
        let (_, pref) = normalize(&form).unwrap();
        assert_eq!(pref.risk_tolerance, RiskTolerance::Low);
    }

    #[test]
    fn parsing_is_case_and_whitespace_insensitive() {
        let form = IntakeForm {
            risk_tolerance: " High ".to_string(),
            involvement: "Self-Directed".to_string(),
            ..IntakeForm::default()
        };
        let (_, pref) = normalize(&form).unwrap();
        assert_eq!(pref.risk_tolerance, RiskTolerance::High);
        assert_eq!(pref.involvement, Involvement::SelfDirected);
    }

    #[test]
    fn horizon_outside_range_is_rejected() {
        for horizon in [0, 51] {
            let form = IntakeForm {
                time_horizon: horizon,
                ..IntakeForm::default()
            };
            assert_eq!(
                normalize(&form),
                Err(ValidationError::TimeHorizonOutOfRange(horizon))
            );
        }
        for horizon in [1, 50] {
            let form = IntakeForm {
                time_horizon: horizon,
                ..IntakeForm::default()
            };
            assert!(normalize(&form).is_ok());
        }
    }

    #[test]
    fn small_initial_amount_is_rejected() {
        let form = IntakeForm {
            initial_amount: 99.0,
            ..IntakeForm::default()
        };
        assert_eq!(
            normalize(&form),
            Err(ValidationError::InitialAmountTooSmall(99.0))
        );
    }

    #[test]
    fn negative_contribution_is_rejected() {
        let form = IntakeForm {
            monthly_contribution: -1.0,
            ..IntakeForm::default()
        };
        assert_eq!(
            normalize(&form),
            Err(ValidationError::NegativeMonthlyContribution(-1.0))
        );
    }

    #[test]
    fn debt_amount_kept_only_for_high_interest_debt() {
        let form = IntakeForm {
            debt_type: "low".to_string(),
            debt_amount: Some(5_000.0),
            ..IntakeForm::default()
        };
        let (situation, _) = normalize(&form).unwrap();
        assert_eq!(situation.debt_amount, None);

        let form = IntakeForm {
            debt_type: "high".to_string(),
            debt_amount: Some(5_000.0),
            ..IntakeForm::default()
        };
        let (situation, _) = normalize(&form).unwrap();
        assert_eq!(situation.debt_amount, Some(5_000.0));
    }

    #[test]
    fn form_deserializes_from_partial_document() {
        let form: IntakeForm = serde_json::from_str(
            r#"{
                "riskTolerance": "high",
                "timeHorizon": 20,
                "assetComfort": {
                    "stocks": true,
                    "bonds": true,
                    "realEstate": true,
                    "crypto": true,
                    "metals": false
                }
            }"#,
        )
        .unwrap();
        assert_eq!(form.risk_tolerance, "high");
        assert_eq!(form.time_horizon, 20);
        assert!(form.asset_comfort.crypto);
        // Unanswered questions keep their defaults.
        assert_eq!(form.emergency_fund, "none");
        assert_eq!(form.initial_amount, 10_000.0);
    }
}
