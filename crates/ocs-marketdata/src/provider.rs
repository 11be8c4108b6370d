//! Market Data Adapter contract.
//!
//! Kept deliberately small: the orchestrator needs exactly two things from
//! the market a day — the 30-minute opening-range bar (and, for Step B, the
//! bars that follow it) and the index close at expiration. Everything about
//! how those are fetched (REST vendor, auth, retries) lives behind this
//! trait so the selector/orchestrator logic is adapter-agnostic and
//! testable without a network.

use async_trait::async_trait;
use chrono::NaiveDate;
use ocs_schemas::Candle;

/// A request for a run of 30-minute candles on a given trade date.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchCandlesRequest {
    pub symbol: String,
    pub trade_date: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MarketDataError {
    /// Network/transport failure reaching the vendor.
    Transport(String),
    /// Vendor responded but reported an application-level error.
    Api(String),
    /// Vendor response could not be decoded into the expected shape.
    Decode(String),
    /// Adapter is missing required configuration (symbol root, API key).
    Config(String),
}

impl std::fmt::Display for MarketDataError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MarketDataError::Transport(msg) => write!(f, "market data transport error: {msg}"),
            MarketDataError::Api(msg) => write!(f, "market data api error: {msg}"),
            MarketDataError::Decode(msg) => write!(f, "market data decode error: {msg}"),
            MarketDataError::Config(msg) => write!(f, "market data config error: {msg}"),
        }
    }
}

impl std::error::Error for MarketDataError {}

/// Market Data Adapter (C2).
///
/// Object-safe so it can be boxed behind `Arc<dyn MarketDataAdapter>` in the
/// orchestrator; `Send + Sync` so it can cross an async task boundary.
#[async_trait]
pub trait MarketDataAdapter: Send + Sync {
    /// All 30-minute candles available for `trade_date`, in ascending
    /// `bar_start` order. Callers (the opening-range capture and Step B
    /// breakout poll) are responsible for filtering to the exact
    /// `bar_start` they need — the adapter makes no assumption about which
    /// bar a caller wants.
    async fn get_30min_candles(
        &self,
        req: FetchCandlesRequest,
    ) -> Result<Vec<Candle>, MarketDataError>;

    /// The index's official closing print for `trade_date`, used at
    /// expiration for cash settlement. `None` if the close has not been
    /// published yet (e.g. called before 16:00).
    async fn get_index_close(
        &self,
        symbol: &str,
        trade_date: NaiveDate,
    ) -> Result<Option<ocs_fixedpoint::Points>, MarketDataError>;
}
