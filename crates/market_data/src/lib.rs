//! Mock market-data feed.
//!
//! Stands in for a real data vendor: every snapshot is generated from a
//! seedable RNG with Gaussian sampling around per-sector reference levels,
//! plus fixed news and indicator tables. Consumers only ever read the
//! `{symbol, price|yield, change}` shape; nothing here feeds the
//! recommendation math.

use chrono::{Days, NaiveDate};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

const HISTORY_DAYS: usize = 30;

const SECTORS: [&str; 6] = [
    "Technology",
    "Financial",
    "Healthcare",
    "Energy",
    "Utilities",
    "Consumer Defensive",
];

const INDICES: [(&str, &str, f64); 8] = [
    ("S&P 500", "SPX", 5824.15),
    ("NASDAQ Composite", "IXIC", 18456.78),
    ("Dow Jones Industrial", "DJI", 41234.56),
    ("Russell 2000", "RUT", 2345.67),
    ("FTSE 100", "FTSE", 8456.78),
    ("DAX", "DAX", 18765.43),
    ("Nikkei 225", "N225", 41234.56),
    ("MSCI World", "URTH", 145.67),
];

const CRYPTOS: [(&str, &str); 8] = [
    ("Bitcoin", "BTC"),
    ("Ethereum", "ETH"),
    ("Solana", "SOL"),
    ("Cardano", "ADA"),
    ("Polkadot", "DOT"),
    ("Chainlink", "LINK"),
    ("Litecoin", "LTC"),
    ("Stellar", "XLM"),
];

const BOND_REGIONS: [(&str, &str); 4] = [("US", "US"), ("UK", "UK"), ("Germany", "DE"), ("Global", "GL")];
const BOND_DURATIONS: [&str; 6] = ["1 Year", "2 Year", "5 Year", "10 Year", "20 Year", "30 Year"];
const CREDIT_RATINGS: [&str; 5] = ["AAA", "AA+", "AA", "A+", "A"];

const HEADLINES: [&str; 10] = [
    "Fed Maintains Rates at 3.75-4.00% as Inflation Cools Further",
    "AI Boom Continues as Tech Giants Report Record Earnings",
    "Global Clean Energy Investments Reach $1.5 Trillion in 2024",
    "Bitcoin ETF Trading Volumes Hit Record Highs",
    "Commercial Real Estate Market Shows Signs of Recovery",
    "Quantum Computing Breakthrough Announced by Tech Leaders",
    "EV Adoption Reaches 40% of New Car Sales in Key Markets",
    "Space Economy Projected to Reach $1 Trillion by 2030",
    "Global GDP Growth Revised Upward to 3.2% for 2025",
    "Carbon Credit Markets See Increased Institutional Participation",
];

const NEWS_SOURCES: [&str; 5] = ["Bloomberg", "CNBC", "Reuters", "WSJ", "Financial Times"];

const INDICATORS: [(&str, f64, f64); 8] = [
    ("GDP Growth", 2.5, 0.7),
    ("Unemployment Rate", 3.6, 0.3),
    ("CPI", 2.8, 0.4),
    ("Retail Sales", 3.0, 2.0),
    ("Industrial Production", 3.0, 2.0),
    ("Consumer Confidence", 3.0, 2.0),
    ("Manufacturing PMI", 3.0, 2.0),
    ("Wage Growth", 3.0, 2.0),
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricePoint {
    pub date: NaiveDate,
    pub price: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketIndex {
    pub name: String,
    pub symbol: String,
    pub price: f64,
    pub change: f64,
    pub volume: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockQuote {
    pub name: String,
    pub symbol: String,
    pub price: f64,
    pub change: f64,
    pub volume: f64,
    pub market_cap: f64,
    pub pe_ratio: f64,
    pub dividend_yield: f64,
    pub sector: String,
    pub beta: f64,
    pub history: Vec<PricePoint>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BondQuote {
    pub name: String,
    pub symbol: String,
    #[serde(rename = "yield")]
    pub yield_pct: f64,
    pub change: f64,
    pub duration: String,
    pub credit_rating: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CryptoQuote {
    pub name: String,
    pub symbol: String,
    pub price: f64,
    pub change: f64,
    pub volume: f64,
    pub market_cap: f64,
    pub history: Vec<PricePoint>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsItem {
    pub id: String,
    pub title: String,
    pub source: String,
    pub sentiment_score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EconomicIndicator {
    pub name: String,
    pub value: f64,
    pub previous: f64,
    pub change: f64,
    pub unit: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketSnapshot {
    pub as_of: NaiveDate,
    pub indices: Vec<MarketIndex>,
    pub stocks: Vec<StockQuote>,
    pub bonds: Vec<BondQuote>,
    pub cryptos: Vec<CryptoQuote>,
    pub news: Vec<NewsItem>,
    pub indicators: Vec<EconomicIndicator>,
}

pub struct MarketFeed {
    rng: StdRng,
}

impl MarketFeed {
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Deterministic feed: the same seed produces the same snapshot.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn snapshot(&mut self) -> MarketSnapshot {
        let as_of = reference_date();
        MarketSnapshot {
            as_of,
            indices: self.indices(),
            stocks: self.stocks(as_of),
            bonds: self.bonds(),
            cryptos: self.cryptos(as_of),
            news: self.news(),
            indicators: self.indicators(),
        }
    }

    fn indices(&mut self) -> Vec<MarketIndex> {
        INDICES
            .iter()
            .map(|(name, symbol, level)| MarketIndex {
                name: name.to_string(),
                symbol: symbol.to_string(),
                price: self.gaussian(*level, level * 0.01),
                change: self.in_range(-1.5, 1.5),
                volume: self.gaussian(2500.0, 900.0).abs(),
            })
            .collect()
    }

    fn stocks(&mut self, as_of: NaiveDate) -> Vec<StockQuote> {
        let mut quotes = Vec::new();
        for sector in SECTORS {
            let tech = sector == "Technology";
            let sector_beta = self.in_range(0.8, 1.4);
            let sector_pe = if tech {
                self.in_range(28.0, 50.0)
            } else if sector == "Utilities" {
                self.in_range(14.0, 20.0)
            } else {
                self.in_range(18.0, 28.0)
            };

            for i in 1..=3 {
                let price = self
                    .gaussian(if tech { 250.0 } else { 80.0 }, if tech { 100.0 } else { 40.0 })
                    .abs()
                    .max(1.0);
                let market_cap = self
                    .gaussian(if tech { 250.0 } else { 80.0 }, if tech { 150.0 } else { 50.0 })
                    .abs();
                let dividend_yield = if sector == "Utilities" {
                    self.in_range(3.5, 5.5)
                } else if sector == "Consumer Defensive" {
                    self.in_range(2.5, 4.5)
                } else {
                    self.in_range(0.5, 2.5)
                };

                quotes.push(StockQuote {
                    name: format!("{sector} Company {i}"),
                    symbol: format!("{}{}", sector[..3].to_ascii_uppercase(), i),
                    price,
                    change: self.in_range(-3.0, 3.0),
                    volume: self.gaussian(2.5, 1.2).abs() * 1_000_000.0,
                    market_cap,
                    pe_ratio: self.gaussian(sector_pe, sector_pe * 0.3).abs(),
                    dividend_yield,
                    sector: sector.to_string(),
                    beta: self.gaussian(sector_beta, 0.2),
                    history: self.history(price, 0.015, as_of),
                });
            }
        }
        quotes
    }

    fn bonds(&mut self) -> Vec<BondQuote> {
        let mut quotes = Vec::new();
        for (i, (region, code)) in BOND_REGIONS.iter().enumerate() {
            for duration in BOND_DURATIONS.iter().take(3) {
                quotes.push(BondQuote {
                    name: format!("{region} {duration} Bond"),
                    symbol: format!("{}{}", code, duration.replace(' ', "")),
                    yield_pct: self.gaussian(3.8, 1.2),
                    change: self.in_range(-0.1, 0.1),
                    duration: duration.to_string(),
                    credit_rating: CREDIT_RATINGS[i % CREDIT_RATINGS.len()].to_string(),
                });
            }
        }
        quotes
    }

    fn cryptos(&mut self, as_of: NaiveDate) -> Vec<CryptoQuote> {
        CRYPTOS
            .iter()
            .map(|(name, symbol)| {
                let price = match *symbol {
                    "BTC" => self.gaussian(85_000.0, 25_000.0).abs(),
                    "ETH" => self.gaussian(6_500.0, 2_000.0).abs(),
                    _ => self.gaussian(150.0, 80.0).abs(),
                }
                .max(0.01);
                CryptoQuote {
                    name: name.to_string(),
                    symbol: symbol.to_string(),
                    price,
                    change: self.in_range(-5.0, 5.0),
                    volume: self.gaussian(300.0, 150.0).abs(),
                    market_cap: price * self.gaussian(1_500_000.0, 800_000.0).abs(),
                    history: self.history(price, 0.03, as_of),
                }
            })
            .collect()
    }

    fn news(&mut self) -> Vec<NewsItem> {
        HEADLINES
            .iter()
            .enumerate()
            .map(|(i, title)| NewsItem {
                id: format!("news{}", i + 1),
                title: title.to_string(),
                source: NEWS_SOURCES[i % NEWS_SOURCES.len()].to_string(),
                sentiment_score: self.in_range(-1.0, 1.0),
            })
            .collect()
    }

    fn indicators(&mut self) -> Vec<EconomicIndicator> {
        INDICATORS
            .iter()
            .enumerate()
            .map(|(i, (name, mean, std_dev))| {
                let value = self.gaussian(*mean, *std_dev);
                EconomicIndicator {
                    name: name.to_string(),
                    value,
                    previous: value + self.in_range(-0.3, 0.3),
                    change: self.in_range(-0.5, 0.5),
                    unit: if i % 3 == 0 { "%" } else { "B" }.to_string(),
                }
            })
            .collect()
    }

    fn history(&mut self, base: f64, volatility: f64, end: NaiveDate) -> Vec<PricePoint> {
        (0..HISTORY_DAYS)
            .map(|i| PricePoint {
                date: end - Days::new((HISTORY_DAYS - i - 1) as u64),
                price: self.gaussian(base, base * volatility).abs(),
            })
            .collect()
    }

    fn in_range(&mut self, min: f64, max: f64) -> f64 {
        let value: f64 = self.rng.gen_range(min..max);
        (value * 100.0).round() / 100.0
    }

    /// Box-Muller sample around `mean`, rounded to two decimals.
    fn gaussian(&mut self, mean: f64, std_dev: f64) -> f64 {
        let mut u: f64 = 0.0;
        let mut v: f64 = 0.0;
        while u == 0.0 {
            u = self.rng.gen();
        }
        while v == 0.0 {
            v = self.rng.gen();
        }
        let sample =
            mean + std_dev * (-2.0 * u.ln()).sqrt() * (2.0 * std::f64::consts::PI * v).cos();
        (sample * 100.0).round() / 100.0
    }
}

impl Default for MarketFeed {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixed snapshot date; history counts back from here.
fn reference_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 3, 30).expect("static reference date")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_gives_identical_snapshots() {
        let a = MarketFeed::seeded(42).snapshot();
        let b = MarketFeed::seeded(42).snapshot();
        assert_eq!(a, b);
    }

    #[test]
    fn different_seeds_diverge() {
        let a = MarketFeed::seeded(1).snapshot();
        let b = MarketFeed::seeded(2).snapshot();
        assert_ne!(a, b);
    }

    #[test]
    fn snapshot_is_fully_populated() {
        let snap = MarketFeed::seeded(7).snapshot();
        assert_eq!(snap.indices.len(), INDICES.len());
        assert_eq!(snap.stocks.len(), SECTORS.len() * 3);
        assert_eq!(snap.bonds.len(), BOND_REGIONS.len() * 3);
        assert_eq!(snap.cryptos.len(), CRYPTOS.len());
        assert_eq!(snap.news.len(), HEADLINES.len());
        assert_eq!(snap.indicators.len(), INDICATORS.len());
    }

    #[test]
    fn histories_span_thirty_days_ending_at_snapshot_date() {
        let snap = MarketFeed::seeded(7).snapshot();
        for stock in &snap.stocks {
            assert_eq!(stock.history.len(), HISTORY_DAYS);
            assert_eq!(stock.history.last().unwrap().date, snap.as_of);
            assert!(stock.history.iter().all(|p| p.price >= 0.0));
        }
    }

    #[test]
    fn quotes_stay_in_sane_ranges() {
        let snap = MarketFeed::seeded(99).snapshot();
        assert!(snap.stocks.iter().all(|s| s.price >= 1.0));
        assert!(snap.news.iter().all(|n| (-1.0..=1.0).contains(&n.sentiment_score)));
        assert!(snap
            .stocks
            .iter()
            .all(|s| (-3.0..=3.0).contains(&s.change)));
    }

    #[test]
    fn bond_yield_serializes_under_the_wire_name() {
        let snap = MarketFeed::seeded(3).snapshot();
        let json = serde_json::to_value(&snap.bonds[0]).unwrap();
        assert!(json.get("yield").is_some());
        assert!(json.get("yieldPct").is_none());
        assert!(json.get("creditRating").is_some());
    }
}
