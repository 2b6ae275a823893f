use std::cmp::Ordering;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use chrono::Local;
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use alerts::{AlertBook, QuoteView};
use engine::intake::{self, IntakeForm};
use engine::onboarding::{Advance, OnboardingSession};
use market_data::{MarketFeed, MarketSnapshot};
use models::{PortfolioData, Recommendation};
use store::SnapshotStore;

#[derive(Parser, Debug)]
#[command(
    name = "portfolio-advisor",
    about = "Rule-based portfolio recommendations from a guided onboarding wizard."
)]
struct Args {
    /// Directory holding the persisted portfolio snapshot
    #[arg(long, default_value = "data")]
    data_dir: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the onboarding wizard from an answers document and persist the result
    Wizard {
        /// Path to the answers JSON (see --template for the shape)
        #[arg(short, long, required_unless_present = "template")]
        profile: Option<PathBuf>,
        /// Print a template answers document and exit
        #[arg(long)]
        template: bool,
    },
    /// Print the saved portfolio and its recommendation
    Show,
    /// Flip one recommended instrument in or out of the selection
    Toggle { instrument_id: String },
    /// Wipe the saved portfolio and start over
    Reset {
        /// Confirm: resetting cannot be undone
        #[arg(long)]
        yes: bool,
    },
    /// Print a mock market snapshot and evaluate alerts against it
    Markets {
        /// Seed for a reproducible snapshot
        #[arg(long)]
        seed: Option<u64>,
        /// Alert book JSON to evaluate and write back
        #[arg(long)]
        alerts: Option<PathBuf>,
    },
    /// Summarize the saved portfolio with the analysis provider
    Analyze,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let store = SnapshotStore::new(&args.data_dir);

    match args.command {
        Command::Wizard { profile, template } => run_wizard(&store, profile.as_deref(), template),
        Command::Show => show(&store),
        Command::Toggle { instrument_id } => toggle(&store, &instrument_id),
        Command::Reset { yes } => reset(&store, yes),
        Command::Markets { seed, alerts } => markets(seed, alerts.as_deref()),
        Command::Analyze => analyze(&store).await,
    }
}

fn run_wizard(store: &SnapshotStore, profile: Option<&Path>, template: bool) -> Result<()> {
    if template {
        println!("{}", serde_json::to_string_pretty(&IntakeForm::default())?);
        return Ok(());
    }
    let Some(profile) = profile else {
        bail!("--profile is required (or use --template to see the answer shape)");
    };

    let existing = store.load()?;
    if existing.completed_onboarding {
        bail!("onboarding is already complete; run `portfolio-advisor reset --yes` to start over");
    }

    let raw = fs::read_to_string(profile)
        .with_context(|| format!("Reading answers file: {}", profile.display()))?;
    let form: IntakeForm = serde_json::from_str(&raw)
        .with_context(|| format!("Parsing answers JSON in {}", profile.display()))?;
    let (situation, pref) = intake::normalize(&form)?;

    let mut session = OnboardingSession::resume(existing);
    session.set_situation(situation)?;
    session.set_preference(pref)?;

    let recommendation = loop {
        match session.advance()? {
            Advance::Moved(step) => info!(?step, "wizard step complete"),
            Advance::Completed(recommendation) => break recommendation,
        }
    };

    store.save(session.data())?;
    print_recommendation(session.data(), &recommendation);
    Ok(())
}

fn show(store: &SnapshotStore) -> Result<()> {
    let data = store.load()?;
    if !data.completed_onboarding {
        println!("No portfolio yet. Run `portfolio-advisor wizard --profile <answers.json>`.");
        return Ok(());
    }
    // Recomputing is cheap and pure; the saved profile is the source of
    // truth, not a cached recommendation.
    let recommendation = engine::recommend(&data.financial_situation, &data.investment_pref);
    print_recommendation(&data, &recommendation);
    Ok(())
}

fn toggle(store: &SnapshotStore, instrument_id: &str) -> Result<()> {
    let data = store.load()?;
    if !data.completed_onboarding {
        bail!("no portfolio yet; complete the wizard first");
    }
    let mut session = OnboardingSession::resume(data);
    let selected = session.toggle_selection(instrument_id);
    store.save(session.data())?;
    println!(
        "{instrument_id} is now {}",
        if selected { "selected" } else { "unselected" }
    );
    Ok(())
}

fn reset(store: &SnapshotStore, yes: bool) -> Result<()> {
    if !yes {
        println!("This wipes the saved portfolio and cannot be undone.");
        println!("Re-run with --yes to confirm.");
        return Ok(());
    }
    store.clear()?;
    println!("Portfolio reset to defaults.");
    Ok(())
}

fn markets(seed: Option<u64>, alerts_path: Option<&Path>) -> Result<()> {
    let mut feed = match seed {
        Some(seed) => MarketFeed::seeded(seed),
        None => MarketFeed::new(),
    };
    let snapshot = feed.snapshot();

    println!("Market snapshot as of {}", snapshot.as_of);
    println!();
    println!("Indices:");
    for index in &snapshot.indices {
        println!(
            "  {:<24} {:>10.2} {:>+6.2}%",
            index.name, index.price, index.change
        );
    }

    println!();
    println!("Top movers:");
    let mut movers: Vec<_> = snapshot.stocks.iter().collect();
    movers.sort_by(|a, b| {
        b.change
            .abs()
            .partial_cmp(&a.change.abs())
            .unwrap_or(Ordering::Equal)
    });
    for stock in movers.iter().take(5) {
        println!(
            "  {:<8} {:>10.2} {:>+6.2}%  {}",
            stock.symbol, stock.price, stock.change, stock.sector
        );
    }

    if let Some(path) = alerts_path {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("Reading alert book: {}", path.display()))?;
        let mut book: AlertBook = serde_json::from_str(&raw)
            .with_context(|| format!("Parsing alert book JSON in {}", path.display()))?;

        let fired = book.evaluate(&quote_views(&snapshot), snapshot.as_of)?;
        println!();
        if fired.is_empty() {
            println!("No alerts fired.");
        } else {
            for trigger in &fired {
                println!("ALERT {} ({}): {}", trigger.alert_id, trigger.asset, trigger.detail);
            }
        }
        // Scoped read-then-write: the whole book goes back, triggers included.
        fs::write(path, serde_json::to_string_pretty(&book)?)
            .with_context(|| format!("Writing alert book: {}", path.display()))?;
    }

    Ok(())
}

async fn analyze(store: &SnapshotStore) -> Result<()> {
    let data = store.load()?;
    if !data.completed_onboarding {
        bail!("no portfolio yet; complete the wizard first");
    }
    let recommendation = engine::recommend(&data.financial_situation, &data.investment_pref);
    let provider = ai_client::provider_from_env();
    let text = provider
        .generate(&analysis_prompt(&data, &recommendation))
        .await;
    println!("{text}");
    Ok(())
}

fn quote_views(snapshot: &MarketSnapshot) -> Vec<QuoteView> {
    let headlines: Vec<String> = snapshot.news.iter().map(|n| n.title.clone()).collect();
    let mut views = Vec::new();
    for index in &snapshot.indices {
        views.push(QuoteView {
            symbol: index.symbol.clone(),
            price: index.price,
            change: index.change,
            volume: index.volume,
            headlines: headlines.clone(),
        });
    }
    for stock in &snapshot.stocks {
        views.push(QuoteView {
            symbol: stock.symbol.clone(),
            price: stock.price,
            change: stock.change,
            volume: stock.volume,
            headlines: headlines.clone(),
        });
    }
    for crypto in &snapshot.cryptos {
        views.push(QuoteView {
            symbol: crypto.symbol.clone(),
            price: crypto.price,
            change: crypto.change,
            volume: crypto.volume,
            headlines: headlines.clone(),
        });
    }
    views
}

fn analysis_prompt(data: &PortfolioData, recommendation: &Recommendation) -> String {
    let pref = &data.investment_pref;
    let allocation = &recommendation.allocation;
    let instruments: Vec<String> = recommendation
        .investments
        .iter()
        .map(|inv| format!("{} at {:.1}%", inv.name, inv.allocation_percentage))
        .collect();
    format!(
        "Analyze this portfolio plan. Risk tolerance: {}. Goal: {:?}. Time horizon: {} years. \
         Allocation: {}% stocks, {}% bonds, {}% real estate, {}% crypto, {}% cash. \
         Instruments: {}. Projected value after {} years: ${}.",
        pref.risk_tolerance,
        pref.investment_goal,
        pref.time_horizon,
        allocation.stocks,
        allocation.bonds,
        allocation.real_estate,
        allocation.crypto,
        allocation.cash,
        instruments.join(", "),
        pref.time_horizon,
        recommendation.projected_value,
    )
}

fn print_recommendation(data: &PortfolioData, recommendation: &Recommendation) {
    let pref = &data.investment_pref;
    let allocation = &recommendation.allocation;

    println!();
    println!("Your Personalized Portfolio");
    println!("Generated at {}", Local::now().to_rfc3339());
    println!(
        "Based on your {} risk tolerance and {:?} goals",
        pref.risk_tolerance, pref.investment_goal
    );

    println!();
    println!("Allocation:");
    let buckets = [
        ("stocks", allocation.stocks),
        ("bonds", allocation.bonds),
        ("real estate", allocation.real_estate),
        ("crypto", allocation.crypto),
        ("cash", allocation.cash),
    ];
    for (label, pct) in buckets {
        if pct > 0 {
            println!("  {label:<12} {pct:>3}%");
        }
    }

    println!();
    println!("Recommended investments:");
    for inv in &recommendation.investments {
        let selected = data
            .selected_investments
            .get(&inv.id)
            .copied()
            .unwrap_or(false);
        let marker = if selected { "[x]" } else { "[ ]" };
        println!(
            "  {} {:<36} {:<6} {:>6.1}%  {} risk",
            marker, inv.name, inv.kind, inv.allocation_percentage, inv.risk_level
        );
    }

    println!();
    println!(
        "Projected value in {} years: ${}",
        pref.time_horizon, recommendation.projected_value
    );
}
