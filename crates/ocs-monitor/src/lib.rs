//! Quote-Monitor Loop (C10).
//!
//! Polls an [`OptionQuoteSource`] at a fixed interval, applying the pure
//! credit evaluator to each reading, until either the net credit clears the
//! configured threshold or the entry-window deadline passes. Single-threaded
//! and cooperative: the caller's `Clock` governs every suspension, so a test
//! can drive an entire monitor session (deadline included) without real
//! wall-clock delay.
//!
//! `SPX_entry`/strikes are frozen before this loop starts — the loop never
//! recomputes them even if the underlying moves while it polls.

mod http;

use std::time::Duration;

use async_trait::async_trait;
use chrono::{NaiveTime, TimeZone};

use ocs_clock::{Clock, EXCHANGE_TZ};
use ocs_crediteval::{evaluate_credit, meets_credit_threshold};
use ocs_fixedpoint::Points;
use ocs_schemas::{QuoteSnapshot, SpreadCredit, SpreadStrikes};

pub use http::HttpOptionQuoteSource;

/// Default poll cadence: one reading every ten seconds.
pub const POLL_INTERVAL: Duration = Duration::from_secs(10);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuoteSourceError {
    Transport(String),
    Api(String),
    Decode(String),
    Config(String),
}

impl std::fmt::Display for QuoteSourceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            QuoteSourceError::Transport(msg) => write!(f, "quote source transport error: {msg}"),
            QuoteSourceError::Api(msg) => write!(f, "quote source api error: {msg}"),
            QuoteSourceError::Decode(msg) => write!(f, "quote source decode error: {msg}"),
            QuoteSourceError::Config(msg) => write!(f, "quote source config error: {msg}"),
        }
    }
}

impl std::error::Error for QuoteSourceError {}

/// Fetches a paired bid/ask snapshot for a spread's short and long legs in
/// one round-trip, so the two quotes are never observed at different
/// instants. Implementations talk to the options-quote vendor; this loop
/// only ever sees the two `QuoteSnapshot`s.
#[async_trait]
pub trait OptionQuoteSource: Send + Sync {
    async fn get_paired_quote(
        &self,
        strikes: SpreadStrikes,
    ) -> Result<(QuoteSnapshot, QuoteSnapshot), QuoteSourceError>;
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MonitorOutcome {
    /// Threshold cleared; this is the credit the limit price should use.
    Filled(SpreadCredit),
    /// Deadline reached with no reading ever clearing the threshold.
    NoFill,
}

#[derive(Debug, Clone, Copy)]
pub struct MonitorConfig {
    pub min_net_credit: Points,
    pub deadline: NaiveTime,
    pub poll_interval: Duration,
}

/// Run the quote-monitor loop for one frozen set of strikes.
///
/// On each tick: an unavailable reading (quote-source error, or either leg
/// unquotable) is tolerated and retried at the next tick; a reading below
/// threshold is likewise retried. The loop exits the instant a reading
/// clears the threshold, or the instant the deadline is reached, whichever
/// comes first — no re-quote occurs between the decision and the caller
/// using the returned credit as a limit price.
pub async fn run_quote_monitor(
    clock: &dyn Clock,
    quotes: &dyn OptionQuoteSource,
    strikes: SpreadStrikes,
    config: &MonitorConfig,
) -> MonitorOutcome {
    loop {
        let now_local = EXCHANGE_TZ.from_utc_datetime(&clock.now_utc().naive_utc());
        if now_local.time() >= config.deadline {
            return MonitorOutcome::NoFill;
        }

        match quotes.get_paired_quote(strikes).await {
            Ok((short, long)) => {
                if let Some(credit) = evaluate_credit(&short, &long) {
                    if meets_credit_threshold(&credit, config.min_net_credit) {
                        return MonitorOutcome::Filled(credit);
                    }
                    tracing::debug!(net = %credit.net, "quote monitor: below threshold, retrying");
                } else {
                    tracing::debug!("quote monitor: leg unquotable, retrying");
                }
            }
            Err(err) => {
                tracing::debug!(%err, "quote monitor: quote source unavailable, retrying");
            }
        }

        let chrono_interval = chrono::Duration::from_std(config.poll_interval).unwrap_or_default();
        let next_tick = now_local.time() + chrono_interval;
        clock.wait_until(next_tick).await;
    }
}
