//! External collaborator ports the orchestrator writes through after each
//! phase. Concrete CSV/S3/SMTP implementations live outside this crate —
//! these traits exist so `run_day` is fully exercisable in tests without
//! one, and a `tracing`-backed default is provided so the orchestrator is
//! never silently mute about what it did.

use async_trait::async_trait;
use ocs_schemas::TradeRecord;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PortError {
    Sink(String),
    Notifier(String),
}

impl std::fmt::Display for PortError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PortError::Sink(msg) => write!(f, "trade sink error: {msg}"),
            PortError::Notifier(msg) => write!(f, "notifier error: {msg}"),
        }
    }
}

impl std::error::Error for PortError {}

/// Persists the day's trade record and end-of-day report. Called after
/// each phase transition (pre-trigger, post-fill, post-settlement) with
/// the record as it stands at that instant — the core never reads a
/// persisted record back within the same day.
#[async_trait]
pub trait TradeSink: Send + Sync {
    async fn append_trade(&self, record: &TradeRecord) -> Result<(), PortError>;
    async fn persist_report(&self, path: &str, payload: &str) -> Result<(), PortError>;
}

/// Delivers the end-of-day report text to its configured recipients.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send_eod(&self, report_text: &str, recipients: &[String]) -> Result<(), PortError>;
}

/// Default `TradeSink`: logs the record at `info` level rather than
/// writing anywhere. Exercises the full orchestrator path with no file or
/// database dependency.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingTradeSink;

#[async_trait]
impl TradeSink for TracingTradeSink {
    async fn append_trade(&self, record: &TradeRecord) -> Result<(), PortError> {
        tracing::info!(trade_date = %record.trade_date, phase = ?record.phase, "trade record");
        Ok(())
    }

    async fn persist_report(&self, path: &str, payload: &str) -> Result<(), PortError> {
        tracing::info!(path, payload, "end-of-day report");
        Ok(())
    }
}

/// Default `Notifier`: logs the report rather than sending mail.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

#[async_trait]
impl Notifier for TracingNotifier {
    async fn send_eod(&self, report_text: &str, recipients: &[String]) -> Result<(), PortError> {
        tracing::info!(recipients = ?recipients, "{report_text}");
        Ok(())
    }
}
