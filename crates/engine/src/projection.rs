//! Compounding future-value estimate.

use models::{DebtType, EmergencyFund, Employment, FinancialSituation, InvestmentPreference, RiskTolerance};

/// Estimates the portfolio value after `time_horizon` years of annual
/// compounding plus contributions. The effective rate is risk-keyed and
/// situation-adjusted; it is deliberately not floored, so a pathological
/// combination may decay the balance.
pub fn project(situation: &FinancialSituation, pref: &InvestmentPreference) -> i64 {
    let mut rate = match pref.risk_tolerance {
        RiskTolerance::Low => 0.04,
        RiskTolerance::Medium => 0.06,
        RiskTolerance::High => 0.08,
    };

    if situation.emergency_fund == EmergencyFund::Full {
        rate += 0.005;
    }
    if situation.debt_type == DebtType::High {
        rate -= 0.01;
    }
    if situation.employment == Employment::Variable {
        rate -= 0.005;
    }

    let mut total = pref.initial_amount;
    for _ in 0..pref.time_horizon {
        total = total * (1.0 + rate) + pref.monthly_contribution * 12.0;
    }

    total.round() as i64
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn situation() -> FinancialSituation {
        FinancialSituation {
            emergency_fund: EmergencyFund::Full,
            debt_type: DebtType::None,
            employment: Employment::Stable,
            ..FinancialSituation::default()
        }
    }

    fn pref(risk: RiskTolerance, horizon: u32, initial: f64, monthly: f64) -> InvestmentPreference {
        InvestmentPreference {
            risk_tolerance: risk,
            time_horizon: horizon,
            initial_amount: initial,
            monthly_contribution: monthly,
            ..InvestmentPreference::default()
        }
    }

    #[test]
    fn one_year_at_adjusted_medium_rate() {
        // 0.06 base + 0.005 for the full emergency fund, one compounding
        // step: 10000 * 1.065 + 6000 = 16650.
        let value = project(
            &situation(),
            &pref(RiskTolerance::Medium, 1, 10_000.0, 500.0),
        );
        assert_eq!(value, 16_650);
    }

    #[test]
    fn zero_horizon_returns_initial_amount() {
        let value = project(
            &situation(),
            &pref(RiskTolerance::High, 0, 10_000.0, 500.0),
        );
        assert_eq!(value, 10_000);
    }

    #[test]
    fn fifty_year_horizon_stays_finite() {
        let value = project(
            &situation(),
            &pref(RiskTolerance::High, 50, 10_000.0, 500.0),
        );
        assert!(value > 0);
        assert!(value < 100_000_000);
    }

    #[test]
    fn rate_adjustments_stack_without_flooring() {
        // Low base 0.04, high debt -0.01, variable employment -0.005, no
        // emergency-fund bonus: effective rate 0.025.
        let bad = FinancialSituation {
            emergency_fund: EmergencyFund::None,
            debt_type: DebtType::High,
            employment: Employment::Variable,
            ..FinancialSituation::default()
        };
        let value = project(&bad, &pref(RiskTolerance::Low, 10, 10_000.0, 0.0));
        assert_eq!(value, (10_000.0f64 * 1.025f64.powi(10)).round() as i64);
    }

    #[test]
    fn project_is_idempotent() {
        let p = pref(RiskTolerance::Medium, 20, 25_000.0, 250.0);
        assert_eq!(project(&situation(), &p), project(&situation(), &p));
    }

    proptest! {
        #[test]
        fn non_negative_inputs_give_finite_non_negative_values(
            horizon in 0u32..=50,
            initial in 100.0f64..=1_000_000.0,
            monthly in 0.0f64..=10_000.0,
        ) {
            let value = project(&situation(), &pref(RiskTolerance::High, horizon, initial, monthly));
            prop_assert!(value >= 0);
            prop_assert!(value < i64::MAX / 2);
        }
    }
}
