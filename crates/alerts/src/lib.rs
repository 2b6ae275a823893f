use anyhow::{anyhow, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Alert engine for watching market quotes.
/// Each alert kind is a tagged variant, so a price level and a news pattern
/// never share an untyped target field.

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AlertCondition {
    /// Last price rises above the level
    PriceAbove { level: f64 },

    /// Last price falls below the level
    PriceBelow { level: f64 },

    /// Daily volume rises above the threshold
    VolumeAbove { threshold: f64 },

    /// Absolute percent change meets or exceeds the magnitude
    PercentChange { magnitude: f64 },

    /// A headline mentioning the asset matches the regex
    NewsMentions { pattern: String },
}

/// What an alert is evaluated against: one asset's current quote plus the
/// headlines mentioning it. Mirrors the feed's shape without depending on
/// the feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteView {
    pub symbol: String,
    pub price: f64,
    pub change: f64,
    pub volume: f64,
    #[serde(default)]
    pub headlines: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Alert {
    pub id: String,
    pub asset: String,
    #[serde(flatten)]
    pub condition: AlertCondition,
    pub enabled: bool,
    pub created_at: NaiveDate,
    #[serde(default)]
    pub triggered: bool,
}

/// Record of one firing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TriggeredAlert {
    pub alert_id: String,
    pub asset: String,
    pub detail: String,
    pub triggered_at: NaiveDate,
}

impl Alert {
    /// Evaluates the alert against a quote. Disabled and already-triggered
    /// alerts never match; an alert for a different symbol never matches.
    pub fn matches(&self, quote: &QuoteView) -> Result<bool> {
        if !self.enabled || self.triggered {
            return Ok(false);
        }
        if !self.asset.eq_ignore_ascii_case(&quote.symbol) {
            return Ok(false);
        }

        match &self.condition {
            AlertCondition::PriceAbove { level } => Ok(quote.price > *level),
            AlertCondition::PriceBelow { level } => Ok(quote.price < *level),
            AlertCondition::VolumeAbove { threshold } => Ok(quote.volume > *threshold),
            AlertCondition::PercentChange { magnitude } => {
                Ok(quote.change.abs() >= magnitude.abs())
            }
            AlertCondition::NewsMentions { pattern } => {
                let regex = regex::Regex::new(pattern)
                    .map_err(|e| anyhow!("Invalid news pattern: {}", e))?;
                Ok(quote.headlines.iter().any(|h| regex.is_match(h)))
            }
        }
    }

    fn detail(&self, quote: &QuoteView) -> String {
        match &self.condition {
            AlertCondition::PriceAbove { level } => {
                format!("price {:.2} rose above {:.2}", quote.price, level)
            }
            AlertCondition::PriceBelow { level } => {
                format!("price {:.2} fell below {:.2}", quote.price, level)
            }
            AlertCondition::VolumeAbove { threshold } => {
                format!("volume {:.0} exceeded {:.0}", quote.volume, threshold)
            }
            AlertCondition::PercentChange { magnitude } => {
                format!("moved {:.2}%, watching for {:.2}%", quote.change, magnitude)
            }
            AlertCondition::NewsMentions { pattern } => {
                format!("headline matched '{}'", pattern)
            }
        }
    }
}

/// Holds the session's alerts and evaluates them against quotes. Fired
/// alerts are one-shot: they flip to triggered and stop matching.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertBook {
    pub alerts: Vec<Alert>,
}

impl AlertBook {
    pub fn new(alerts: Vec<Alert>) -> Self {
        Self { alerts }
    }

    pub fn add(&mut self, alert: Alert) {
        self.alerts.push(alert);
    }

    pub fn remove(&mut self, alert_id: &str) -> bool {
        let before = self.alerts.len();
        self.alerts.retain(|a| a.id != alert_id);
        self.alerts.len() != before
    }

    /// Evaluates every live alert against every quote, marking the ones
    /// that fire and returning their trigger records.
    pub fn evaluate(
        &mut self,
        quotes: &[QuoteView],
        as_of: NaiveDate,
    ) -> Result<Vec<TriggeredAlert>> {
        let mut fired = Vec::new();
        for alert in &mut self.alerts {
            for quote in quotes {
                if alert.matches(quote)? {
                    alert.triggered = true;
                    fired.push(TriggeredAlert {
                        alert_id: alert.id.clone(),
                        asset: alert.asset.clone(),
                        detail: alert.detail(quote),
                        triggered_at: as_of,
                    });
                    break;
                }
            }
        }
        Ok(fired)
    }

    /// Live alerts still waiting on their condition.
    pub fn active(&self) -> impl Iterator<Item = &Alert> {
        self.alerts.iter().filter(|a| a.enabled && !a.triggered)
    }

    /// Alerts that have already fired.
    pub fn history(&self) -> impl Iterator<Item = &Alert> {
        self.alerts.iter().filter(|a| a.triggered)
    }
}
