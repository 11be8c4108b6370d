//! Broker Adapter contract (C3).
//!
//! This is the single boundary through which the order gate talks to a
//! brokerage. It stays broker-agnostic: callers pass strikes/expiration/
//! quantity, not a vendor order payload, so `ocs-gate` never needs to know
//! which concrete adapter it is driving.

use async_trait::async_trait;
use chrono::NaiveDate;
use ocs_fixedpoint::Points;
use ocs_schemas::Setup;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BrokerError {
    Transport(String),
    Api(String),
    Decode(String),
    Config(String),
}

impl std::fmt::Display for BrokerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BrokerError::Transport(msg) => write!(f, "broker transport error: {msg}"),
            BrokerError::Api(msg) => write!(f, "broker api error: {msg}"),
            BrokerError::Decode(msg) => write!(f, "broker decode error: {msg}"),
            BrokerError::Config(msg) => write!(f, "broker config error: {msg}"),
        }
    }
}

impl std::error::Error for BrokerError {}

/// A ten-point-wide vertical credit spread order to submit as a single
/// multi-leg ticket: sell the short strike, buy the long strike, both
/// expiring same-day.
#[derive(Debug, Clone, PartialEq)]
pub struct CreditSpreadOrder {
    pub client_order_id: String,
    pub underlying: String,
    pub setup: Setup,
    pub expiration: NaiveDate,
    pub short_strike: Points,
    pub long_strike: Points,
    pub limit_net_credit: Points,
    pub quantity: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BrokerOrderStatus {
    Working,
    Filled,
    Rejected,
    Cancelled,
    Unknown,
}

/// Result of looking an order up by client order id after an ambiguous
/// submission response.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderLookup {
    pub broker_order_id: String,
    pub status: BrokerOrderStatus,
}

/// Broker Adapter (C3).
#[async_trait]
pub trait BrokerAdapter: Send + Sync {
    /// Current account equity, used as the position-sizer's risk base.
    async fn get_account_equity(&self) -> Result<Points, BrokerError>;

    /// Submit a new credit-spread order. The response may be ambiguous
    /// (empty body + `Location` header); callers that need a confirmed
    /// order id/status should follow up with `get_today_orders`.
    async fn submit_credit_spread(
        &self,
        order: &CreditSpreadOrder,
    ) -> Result<SubmitResult, BrokerError>;

    /// All orders placed today, used to resolve an ambiguous submission by
    /// matching on `client_order_id`.
    async fn get_today_orders(&self) -> Result<Vec<OrderLookup>, BrokerError>;
}

/// Raw submission result before the order gate resolves it into a
/// `SubmissionOutcome`.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitResult {
    /// Response body contained a concrete order id and status.
    Confirmed {
        broker_order_id: String,
        status: BrokerOrderStatus,
    },
    /// Body was empty; order id recovered from the `Location` header.
    LocationOnly { broker_order_id: String },
    /// Neither body nor header yielded an order id.
    Unconfirmed,
}
