//! Expands a bucket split into concrete instruments.
//!
//! Emission order is a contract: stocks, bonds, real estate, crypto, cash.
//! Every rule reads only its own bucket and comfort flag; the final rescale
//! pass is the single place where overshoot (the additive ESG sleeve) is
//! corrected.

use models::{
    AssetAllocation, InstrumentKind, InvestmentOption, InvestmentPreference, RiskLevel,
};

fn option(
    id: &str,
    name: &str,
    kind: InstrumentKind,
    risk_level: RiskLevel,
    expected_return: f64,
    description: &str,
    allocation_percentage: f64,
    ethical: bool,
) -> InvestmentOption {
    InvestmentOption {
        id: id.to_string(),
        name: name.to_string(),
        kind,
        risk_level,
        expected_return,
        description: description.to_string(),
        allocation_percentage,
        ethical,
    }
}

/// Picks instruments for a bucket split, honoring the user's asset-class
/// comfort flags and ethical preference. Pure and total; an uncomfortable
/// or empty asset class simply contributes nothing.
pub fn select(allocation: &AssetAllocation, pref: &InvestmentPreference) -> Vec<InvestmentOption> {
    let mut picks = Vec::new();
    let comfort = &pref.asset_comfort;

    if comfort.stocks {
        picks.push(option(
            "vti",
            "VTI (Total Stock Market)",
            InstrumentKind::Etf,
            RiskLevel::Medium,
            7.5,
            "Diversified exposure to the entire US stock market",
            allocation.stocks as f64 * 0.6,
            false,
        ));
        picks.push(option(
            "vxus",
            "VXUS (International Stocks)",
            InstrumentKind::Etf,
            RiskLevel::Medium,
            6.5,
            "International stock market exposure",
            allocation.stocks as f64 * 0.4,
            false,
        ));
        if pref.ethical {
            // Additive on purpose: the ESG sleeve overshoots the stocks
            // bucket and the final rescale brings the total back to 100.
            picks.push(option(
                "esgv",
                "ESGV (ESG US Stock ETF)",
                InstrumentKind::Etf,
                RiskLevel::Medium,
                7.0,
                "ESG-focused US stock market exposure",
                allocation.stocks as f64 * 0.3,
                true,
            ));
        }
    }

    if comfort.bonds {
        picks.push(option(
            "bnd",
            "BND (Total Bond Market)",
            InstrumentKind::Bond,
            RiskLevel::Low,
            3.5,
            "Diversified exposure to US bonds",
            allocation.bonds as f64 * 0.7,
            false,
        ));
        picks.push(option(
            "tips",
            "TIP (Treasury Inflation-Protected)",
            InstrumentKind::Bond,
            RiskLevel::Low,
            2.5,
            "Protection against inflation",
            allocation.bonds as f64 * 0.3,
            false,
        ));
    }

    if comfort.real_estate {
        picks.push(option(
            "vnq",
            "VNQ (Real Estate ETF)",
            InstrumentKind::Reit,
            RiskLevel::Medium,
            5.5,
            "Diversified real estate investment trust",
            allocation.real_estate as f64,
            false,
        ));
    }

    if comfort.crypto && allocation.crypto > 0 {
        picks.push(option(
            "btc",
            "Bitcoin",
            InstrumentKind::Crypto,
            RiskLevel::High,
            10.0,
            "Digital cryptocurrency with high volatility",
            allocation.crypto as f64 * 0.6,
            false,
        ));
        picks.push(option(
            "eth",
            "Ethereum",
            InstrumentKind::Crypto,
            RiskLevel::High,
            8.0,
            "Blockchain platform with smart contracts",
            allocation.crypto as f64 * 0.4,
            false,
        ));
    }

    // Cash equivalent is always present, comfort flags notwithstanding.
    picks.push(option(
        "money-market",
        "Money Market Fund",
        InstrumentKind::Bond,
        RiskLevel::Low,
        1.5,
        "Low-risk cash equivalent",
        allocation.cash as f64,
        false,
    ));

    rescale(picks)
}

/// Final pass: rescale every entry so the weights sum to 100, rounded to
/// one decimal. A degenerate all-zero emission is returned as-is instead
/// of dividing by zero.
fn rescale(mut picks: Vec<InvestmentOption>) -> Vec<InvestmentOption> {
    let total: f64 = picks.iter().map(|p| p.allocation_percentage).sum();
    if total > 0.0 && (total - 100.0).abs() > 1e-9 {
        let factor = 100.0 / total;
        for pick in &mut picks {
            pick.allocation_percentage = (pick.allocation_percentage * factor * 10.0).round() / 10.0;
        }
    }
    picks
}
