//! `ocs` CLI entry point.
//!
//! Thin by design: load config, build concrete adapters, hand them to
//! `ocs_orchestrator::run_day`, print the outcome. All decision logic lives
//! in the component crates.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};

use ocs_broker::HttpBrokerAdapter;
use ocs_clock::SystemClock;
use ocs_config::OcsConfig;
use ocs_gate::OrderGateway;
use ocs_marketdata::HttpMarketDataAdapter;
use ocs_monitor::HttpOptionQuoteSource;
use ocs_orchestrator::{run_day, DayInputs, TracingNotifier, TracingTradeSink};

#[derive(Parser)]
#[command(name = "ocs")]
#[command(about = "0DTE index-option credit-spread trading agent", long_about = None)]
struct Cli {
    /// Force dry-run mode regardless of the DRY_RUN environment variable.
    /// Never demotes a dry run to live trading — only ever forces the
    /// safer direction.
    #[arg(long)]
    dry_run: bool,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run one trading day end to end.
    Run {
        /// Trade date, in YYYY-MM-DD. Defaults to today in the exchange time zone.
        #[arg(long)]
        date: Option<String>,
    },
    /// Load configuration and print the redacted summary, without trading.
    CheckConfig,
}

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    init_tracing();

    let cli = Cli::parse();
    let mut config = OcsConfig::from_env().context("failed to load configuration")?;
    if cli.dry_run {
        config.dry_run = true;
    }

    match cli.cmd {
        Commands::CheckConfig => {
            println!("{}", config.redacted_summary());
        }
        Commands::Run { date } => {
            let trade_date = match date {
                Some(raw) => NaiveDate::parse_from_str(&raw, "%Y-%m-%d")
                    .with_context(|| format!("invalid --date {raw:?}, expected YYYY-MM-DD"))?,
                None => {
                    let now_local =
                        chrono::TimeZone::from_utc_datetime(&ocs_clock::EXCHANGE_TZ, &chrono::Utc::now().naive_utc());
                    now_local.date_naive()
                }
            };

            tracing::info!(config = %config.redacted_summary(), %trade_date, "starting trading day");

            let clock = SystemClock;
            let market = HttpMarketDataAdapter::new(
                config.market_data.base_url.clone(),
                config.market_data.api_key_or_token.clone(),
            );
            let quotes = HttpOptionQuoteSource::new(
                config.market_data.base_url.clone(),
                config.market_data.api_key_or_token.clone(),
                config.option_root.clone(),
                config.option_root_width,
                trade_date,
            );
            let broker = HttpBrokerAdapter::new(
                config.broker.base_url.clone(),
                config.broker.api_key_or_token.clone(),
                config.broker_account_id.clone(),
                config.option_root.clone(),
                config.option_root_width,
            );
            let gate = OrderGateway::new(broker);
            let sink = TracingTradeSink;
            let notifier = TracingNotifier;

            let inputs = DayInputs {
                clock: &clock,
                market: &market,
                quotes: &quotes,
                gate: &gate,
                sink: &sink,
                notifier: &notifier,
                config: &config,
            };

            let record = run_day(&inputs, trade_date).await;
            println!("{}", ocs_orchestrator::render_eod_report(&record));
        }
    }

    Ok(())
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .init();
}
