//! Five-bucket allocation calculator.
//!
//! An explicit three-phase pipeline: `adjust` (signed arithmetic over the
//! risk-keyed base split), `clamp` (floor negatives at zero), `normalize`
//! (rescale so the buckets sum to exactly 100). Each phase is a separate
//! pure function so the intermediate states stay testable.

use models::{
    AssetAllocation, DebtType, Dependents, EmergencyFund, FinancialSituation,
    InvestmentPreference, RiskTolerance,
};

/// Working allocation with signed buckets; the adjustment phase may push a
/// bucket below zero before the clamp runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawAllocation {
    pub stocks: i32,
    pub bonds: i32,
    pub real_estate: i32,
    pub crypto: i32,
    pub cash: i32,
}

fn base(risk: RiskTolerance) -> RawAllocation {
    // Low doubles as the conservative branch that intake maps unrecognized
    // wire values onto.
    match risk {
        RiskTolerance::High => RawAllocation {
            stocks: 60,
            bonds: 10,
            real_estate: 15,
            crypto: 10,
            cash: 5,
        },
        RiskTolerance::Medium => RawAllocation {
            stocks: 50,
            bonds: 20,
            real_estate: 10,
            crypto: 5,
            cash: 15,
        },
        RiskTolerance::Low => RawAllocation {
            stocks: 30,
            bonds: 40,
            real_estate: 5,
            crypto: 0,
            cash: 25,
        },
    }
}

/// Phase 1: base split plus the situation adjustments, applied in fixed
/// order: time horizon, emergency fund, debt, dependents.
pub fn adjust(situation: &FinancialSituation, pref: &InvestmentPreference) -> RawAllocation {
    let mut a = base(pref.risk_tolerance);

    if pref.time_horizon < 5 {
        a.stocks -= 10;
        a.bonds += 5;
        a.cash += 5;
    } else if pref.time_horizon > 15 {
        a.stocks += 10;
        a.bonds -= 5;
        a.cash -= 5;
    }

    if situation.emergency_fund == EmergencyFund::None {
        a.cash += 10;
        a.stocks -= 5;
        a.bonds -= 5;
    }

    if situation.debt_type == DebtType::High {
        a.stocks -= 10;
        a.bonds += 5;
        a.cash += 5;
    }

    if matches!(
        situation.dependents,
        Dependents::Children | Dependents::Elderly
    ) {
        a.stocks -= 5;
        a.bonds += 5;
    }

    a
}

/// Phase 2: negative buckets floor at zero. A documented floor, not an
/// error.
pub fn clamp(raw: RawAllocation) -> RawAllocation {
    RawAllocation {
        stocks: raw.stocks.max(0),
        bonds: raw.bonds.max(0),
        real_estate: raw.real_estate.max(0),
        crypto: raw.crypto.max(0),
        cash: raw.cash.max(0),
    }
}

/// Phase 3: rescale so the buckets sum to exactly 100. Expects a clamped
/// (non-negative) input. An all-zero input becomes 100% cash rather than a
/// division by zero.
pub fn normalize(raw: RawAllocation) -> AssetAllocation {
    let buckets = [raw.stocks, raw.bonds, raw.real_estate, raw.crypto, raw.cash];
    debug_assert!(buckets.iter().all(|b| *b >= 0), "normalize expects clamped input");

    let sum: i32 = buckets.iter().sum();
    if sum == 0 {
        return AssetAllocation {
            stocks: 0,
            bonds: 0,
            real_estate: 0,
            crypto: 0,
            cash: 100,
        };
    }
    if sum == 100 {
        return AssetAllocation {
            stocks: raw.stocks as u32,
            bonds: raw.bonds as u32,
            real_estate: raw.real_estate as u32,
            crypto: raw.crypto as u32,
            cash: raw.cash as u32,
        };
    }

    // Nearest-integer rounding alone can land the total at 99-101, so the
    // residue is settled on the largest fractional remainders (ties broken
    // by bucket order) to keep the sum invariant exact.
    let mut out = [0u32; 5];
    let mut remainders: [(usize, f64); 5] = [(0, 0.0); 5];
    for (i, bucket) in buckets.iter().enumerate() {
        let exact = *bucket as f64 * 100.0 / sum as f64;
        out[i] = exact.floor() as u32;
        remainders[i] = (i, exact - exact.floor());
    }
    let residue = 100 - out.iter().sum::<u32>();
    remainders.sort_by(|a, b| {
        b.1.partial_cmp(&a.1)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(a.0.cmp(&b.0))
    });
    for &(index, _) in remainders.iter().take(residue as usize) {
        out[index] += 1;
    }

    AssetAllocation {
        stocks: out[0],
        bonds: out[1],
        real_estate: out[2],
        crypto: out[3],
        cash: out[4],
    }
}

/// Maps a profile to its normalized five-bucket split. Pure and total:
/// every valid profile produces buckets summing to exactly 100.
pub fn compute(situation: &FinancialSituation, pref: &InvestmentPreference) -> AssetAllocation {
    normalize(clamp(adjust(situation, pref)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use models::{CashFlow, Employment};

    const FUNDS: [EmergencyFund; 3] = [
        EmergencyFund::None,
        EmergencyFund::Partial,
        EmergencyFund::Full,
    ];
    const DEBTS: [DebtType; 4] = [
        DebtType::None,
        DebtType::Low,
        DebtType::High,
        DebtType::Other,
    ];
    const DEPENDENTS: [Dependents; 5] = [
        Dependents::Single,
        Dependents::Partnered,
        Dependents::Children,
        Dependents::Elderly,
        Dependents::None,
    ];
    const RISKS: [RiskTolerance; 3] = [
        RiskTolerance::Low,
        RiskTolerance::Medium,
        RiskTolerance::High,
    ];
    const HORIZONS: [u32; 9] = [1, 3, 4, 5, 10, 15, 16, 30, 50];

    fn situation_with(fund: EmergencyFund, debt: DebtType, deps: Dependents) -> FinancialSituation {
        FinancialSituation {
            emergency_fund: fund,
            debt_type: debt,
            debt_amount: None,
            cash_flow: CashFlow::Neutral,
            employment: Employment::Stable,
            dependents: deps,
        }
    }

    fn pref_with(risk: RiskTolerance, horizon: u32) -> InvestmentPreference {
        InvestmentPreference {
            risk_tolerance: risk,
            time_horizon: horizon,
            ..InvestmentPreference::default()
        }
    }

    #[test]
    fn aggressive_long_horizon_scenario() {
        let situation = situation_with(EmergencyFund::Full, DebtType::None, Dependents::None);
        let pref = pref_with(RiskTolerance::High, 20);

        let allocation = compute(&situation, &pref);
        assert_eq!(
            allocation,
            AssetAllocation {
                stocks: 70,
                bonds: 5,
                real_estate: 15,
                crypto: 10,
                cash: 0,
            }
        );
    }

    #[test]
    fn conservative_stacked_adjustments_scenario() {
        // Every subtraction lands on the stocks bucket until it bottoms
        // out at zero; the total still comes back as 100.
        let situation = situation_with(EmergencyFund::None, DebtType::High, Dependents::Children);
        let pref = pref_with(RiskTolerance::Low, 3);

        let allocation = compute(&situation, &pref);
        assert_eq!(
            allocation,
            AssetAllocation {
                stocks: 0,
                bonds: 50,
                real_estate: 5,
                crypto: 0,
                cash: 45,
            }
        );
    }

    #[test]
    fn horizon_band_boundaries_are_untouched() {
        let situation = situation_with(EmergencyFund::Partial, DebtType::None, Dependents::Single);
        let at_five = compute(&situation, &pref_with(RiskTolerance::Medium, 5));
        let at_fifteen = compute(&situation, &pref_with(RiskTolerance::Medium, 15));
        assert_eq!(at_five, at_fifteen);
        assert_eq!(at_five.stocks, 50);
    }

    #[test]
    fn every_profile_sums_to_exactly_one_hundred() {
        for fund in FUNDS {
            for debt in DEBTS {
                for deps in DEPENDENTS {
                    for risk in RISKS {
                        for horizon in HORIZONS {
                            let situation = situation_with(fund, debt, deps);
                            let pref = pref_with(risk, horizon);
                            let allocation = compute(&situation, &pref);
                            assert_eq!(
                                allocation.sum(),
                                100,
                                "sum invariant broken for {situation:?} {pref:?}"
                            );
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn compute_is_idempotent() {
        let situation = situation_with(EmergencyFund::None, DebtType::High, Dependents::Elderly);
        let pref = pref_with(RiskTolerance::Medium, 4);
        assert_eq!(compute(&situation, &pref), compute(&situation, &pref));
    }

    #[test]
    fn stocks_bucket_never_shrinks_as_risk_grows() {
        for fund in FUNDS {
            for debt in DEBTS {
                for deps in DEPENDENTS {
                    for horizon in HORIZONS {
                        let situation = situation_with(fund, debt, deps);
                        let low = compute(&situation, &pref_with(RiskTolerance::Low, horizon));
                        let medium =
                            compute(&situation, &pref_with(RiskTolerance::Medium, horizon));
                        let high = compute(&situation, &pref_with(RiskTolerance::High, horizon));
                        assert!(low.stocks <= medium.stocks);
                        assert!(medium.stocks <= high.stocks);
                    }
                }
            }
        }
    }

    #[test]
    fn normalize_settles_rounding_residue() {
        // 3/3/1 scaled to 100 rounds to 43/43/14 via largest remainder.
        let allocation = normalize(RawAllocation {
            stocks: 3,
            bonds: 3,
            real_estate: 1,
            crypto: 0,
            cash: 0,
        });
        assert_eq!(allocation.sum(), 100);
        assert_eq!(allocation.stocks, 43);
        assert_eq!(allocation.bonds, 43);
        assert_eq!(allocation.real_estate, 14);
    }

    #[test]
    fn normalize_all_zero_falls_back_to_cash() {
        let allocation = normalize(RawAllocation {
            stocks: 0,
            bonds: 0,
            real_estate: 0,
            crypto: 0,
            cash: 0,
        });
        assert_eq!(allocation.cash, 100);
        assert_eq!(allocation.sum(), 100);
    }

    #[test]
    fn clamp_floors_negatives_only() {
        let clamped = clamp(RawAllocation {
            stocks: -7,
            bonds: 45,
            real_estate: 5,
            crypto: -1,
            cash: 45,
        });
        assert_eq!(clamped.stocks, 0);
        assert_eq!(clamped.crypto, 0);
        assert_eq!(clamped.bonds, 45);
        assert_eq!(clamped.cash, 45);
    }
}
