use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

// Profile models
//
// Field names follow the persisted JSON layout of the original app, so a
// saved aggregate round-trips without a migration step.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmergencyFund {
    None,
    Partial,
    Full,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DebtType {
    None,
    Low,
    High,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CashFlow {
    Positive,
    Neutral,
    Negative,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Employment {
    Stable,
    Variable,
    Retired,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dependents {
    Single,
    Partnered,
    Children,
    Elderly,
    None,
}

/// Snapshot of the user's financial health, collected in wizard steps 1-2.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinancialSituation {
    pub emergency_fund: EmergencyFund,
    pub debt_type: DebtType,
    /// Only meaningful when `debt_type` is high.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub debt_amount: Option<f64>,
    pub cash_flow: CashFlow,
    pub employment: Employment,
    pub dependents: Dependents,
}

impl Default for FinancialSituation {
    fn default() -> Self {
        Self {
            emergency_fund: EmergencyFund::None,
            debt_type: DebtType::None,
            debt_amount: None,
            cash_flow: CashFlow::Neutral,
            employment: Employment::Stable,
            dependents: Dependents::None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskTolerance {
    Low,
    Medium,
    High,
}

impl fmt::Display for RiskTolerance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Low => write!(f, "low"),
            Self::Medium => write!(f, "medium"),
            Self::High => write!(f, "high"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvestmentGoal {
    Retirement,
    Wealth,
    Income,
    Savings,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Involvement {
    Automated,
    Guided,
    SelfDirected,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaxNeeds {
    High,
    Maximized,
    None,
}

/// Asset classes the user is comfortable holding. The metals flag is carried
/// through the wizard but no instrument rule consumes it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetComfort {
    pub stocks: bool,
    pub bonds: bool,
    pub real_estate: bool,
    pub crypto: bool,
    pub metals: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub other: Option<String>,
}

impl Default for AssetComfort {
    fn default() -> Self {
        Self {
            stocks: true,
            bonds: true,
            real_estate: true,
            crypto: false,
            metals: false,
            other: None,
        }
    }
}

/// Goals and constraints, collected in wizard steps 3-4.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvestmentPreference {
    pub risk_tolerance: RiskTolerance,
    pub investment_goal: InvestmentGoal,
    /// Years, valid range 1-50.
    pub time_horizon: u32,
    pub initial_amount: f64,
    pub monthly_contribution: f64,
    pub asset_comfort: AssetComfort,
    pub involvement: Involvement,
    pub tax_needs: TaxNeeds,
    pub ethical: bool,
}

impl Default for InvestmentPreference {
    fn default() -> Self {
        Self {
            risk_tolerance: RiskTolerance::Medium,
            investment_goal: InvestmentGoal::Wealth,
            time_horizon: 10,
            initial_amount: 10_000.0,
            monthly_contribution: 500.0,
            asset_comfort: AssetComfort::default(),
            involvement: Involvement::Guided,
            tax_needs: TaxNeeds::None,
            ethical: false,
        }
    }
}

// Recommendation output models

/// Five-bucket percentage split. Invariant: the buckets sum to exactly 100
/// after normalization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetAllocation {
    pub stocks: u32,
    pub bonds: u32,
    pub real_estate: u32,
    pub crypto: u32,
    pub cash: u32,
}

impl AssetAllocation {
    pub fn sum(&self) -> u32 {
        self.stocks + self.bonds + self.real_estate + self.crypto + self.cash
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InstrumentKind {
    Stock,
    Etf,
    Crypto,
    Bond,
    Reit,
    Metal,
}

impl fmt::Display for InstrumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Stock => write!(f, "stock"),
            Self::Etf => write!(f, "etf"),
            Self::Crypto => write!(f, "crypto"),
            Self::Bond => write!(f, "bond"),
            Self::Reit => write!(f, "reit"),
            Self::Metal => write!(f, "metal"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Low => write!(f, "low"),
            Self::Medium => write!(f, "medium"),
            Self::High => write!(f, "high"),
        }
    }
}

/// One recommended instrument with its share of the portfolio.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvestmentOption {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: InstrumentKind,
    pub risk_level: RiskLevel,
    /// Static reference annual return, percent.
    pub expected_return: f64,
    pub description: String,
    pub allocation_percentage: f64,
    pub ethical: bool,
}

/// Combined output of one "Create Portfolio" action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    pub allocation: AssetAllocation,
    pub investments: Vec<InvestmentOption>,
    pub projected_value: i64,
}

// Persisted aggregate

/// The session-owned aggregate. One writer, one storage key, every write a
/// full overwrite.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioData {
    pub financial_situation: FinancialSituation,
    pub investment_pref: InvestmentPreference,
    #[serde(default)]
    pub selected_investments: BTreeMap<String, bool>,
    #[serde(default)]
    pub completed_onboarding: bool,
}
