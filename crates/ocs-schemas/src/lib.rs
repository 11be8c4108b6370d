//! Shared wire/record types for the 0DTE credit-spread agent.
//!
//! Mirrors the role of a schemas crate in a multi-crate trading workspace:
//! plain data, `serde`-derivable, no business logic. Every other crate in
//! the workspace depends on this one; it depends on nothing but
//! `ocs-fixedpoint`, `serde` and `chrono`.

use chrono::{DateTime, NaiveDate, Utc};
use ocs_fixedpoint::Points;
use serde::{Deserialize, Serialize};

/// Which side of the opening range a setup trades against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Setup {
    /// Step A: bullish opening range, sells a PUT credit spread.
    Put,
    /// Step B: bearish opening-range-low breakout, sells a CALL credit spread.
    Call,
}

impl std::fmt::Display for Setup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Setup::Put => write!(f, "PUT"),
            Setup::Call => write!(f, "CALL"),
        }
    }
}

/// One 30-minute OHLC bar, already parsed into fixed-point points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    /// Bar open time (exchange-local), used for exact bar-start matching.
    pub bar_start: DateTime<Utc>,
    pub open: Points,
    pub high: Points,
    pub low: Points,
    pub close: Points,
}

/// The captured 09:30-10:00 opening range, published once per day.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OpeningRange {
    pub bar_start: DateTime<Utc>,
    pub orh: Points,
    pub orl: Points,
    pub orc: Points,
    pub oro: Points,
}

impl OpeningRange {
    /// Step A: the opening range closed above its open (bullish OR).
    pub fn is_bullish(&self) -> bool {
        self.orc > self.oro
    }

    /// Step A's mirror condition, used to decide whether Step B may still
    /// run: the opening range closed below its open (bearish OR).
    pub fn is_bearish(&self) -> bool {
        self.orc < self.oro
    }
}

/// A single top-of-book quote for one option leg.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QuoteSnapshot {
    pub bid: Points,
    pub ask: Points,
}

impl QuoteSnapshot {
    /// Mid price, or `None` if the quote is unquotable (bid or ask is zero).
    pub fn mid(&self) -> Option<Points> {
        if self.bid.raw() == 0 || self.ask.raw() == 0 {
            None
        } else {
            Some(Points::new((self.bid.raw() + self.ask.raw()) / 2))
        }
    }
}

/// The evaluated credit for a short/long leg pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpreadCredit {
    pub gross: Points,
    pub net: Points,
}

/// Output of the position sizer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PositionSizing {
    pub daily_risk_budget: Points,
    pub max_loss_per_spread: Points,
    pub qty: i64,
}

/// The strikes for a ten-point-wide vertical credit spread.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpreadStrikes {
    pub setup: Setup,
    pub short_strike: Points,
    pub long_strike: Points,
}

/// Outcome of submitting an order to the broker when the submission response
/// is ambiguous (Schwab-style empty body + `Location` header, or an
/// unconfirmable state).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SubmissionOutcome {
    /// Broker returned (or a follow-up lookup confirmed) a concrete order id
    /// and status.
    Confirmed {
        broker_order_id: String,
        status: String,
    },
    /// Broker order id was recovered from a `Location` header on a 201/204
    /// response with no body; status not yet confirmed by a follow-up call.
    AcceptedViaLocation { broker_order_id: String },
    /// Neither the response body, the `Location` header, nor a follow-up
    /// order lookup could establish an order id. The order may or may not
    /// have been accepted by the broker.
    AcceptedUnconfirmed,
    /// `dry_run` was active; no network call was made.
    DryRun { synthetic_order_id: String },
}

/// The three phases of a trading day, as recorded in the trade record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DayPhase {
    /// No setup triggered, or a fatal precondition failed before entry.
    NoTrade { reason: String },
    /// A setup was selected and strikes/sizing computed, but no fill was
    /// obtained before the entry deadline.
    NoFill {
        setup: Setup,
        strikes: SpreadStrikes,
    },
    /// An order was submitted and (at minimum) accepted by the gate.
    Entered {
        setup: Setup,
        strikes: SpreadStrikes,
        credit: SpreadCredit,
        sizing: PositionSizing,
        submission: SubmissionOutcome,
    },
    /// Entered earlier in the day; now settled at expiration.
    Settled {
        setup: Setup,
        strikes: SpreadStrikes,
        credit: SpreadCredit,
        sizing: PositionSizing,
        submission: SubmissionOutcome,
        spx_close: Points,
        settlement_value: Points,
        pnl_per_spread: Points,
        total_pnl: Points,
    },
    /// Entered, but the index close was unavailable at expiration so
    /// settlement fields could not be computed. Non-fatal: the record is
    /// written without settlement fields rather than discarded, and flagged
    /// for operator reconciliation.
    SettlementSkipped {
        setup: Setup,
        strikes: SpreadStrikes,
        credit: SpreadCredit,
        sizing: PositionSizing,
        submission: SubmissionOutcome,
        reason: String,
    },
}

/// The full record of one trading day, persisted after each phase
/// transition via the `TradeSink` port.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeRecord {
    pub trade_date: NaiveDate,
    pub phase: DayPhase,
    pub opening_range: Option<OpeningRange>,
    pub recorded_at: DateTime<Utc>,
}

impl TradeRecord {
    pub fn no_trade(trade_date: NaiveDate, reason: impl Into<String>, recorded_at: DateTime<Utc>) -> Self {
        Self {
            trade_date,
            phase: DayPhase::NoTrade { reason: reason.into() },
            opening_range: None,
            recorded_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pts(v: f64) -> Points {
        Points::from_f64(v)
    }

    #[test]
    fn quote_mid_is_average_of_bid_ask() {
        let q = QuoteSnapshot { bid: pts(4.50), ask: pts(4.70) };
        assert_eq!(q.mid(), Some(pts(4.60)));
    }

    #[test]
    fn quote_mid_is_none_when_bid_is_zero() {
        let q = QuoteSnapshot { bid: Points::ZERO, ask: pts(4.70) };
        assert_eq!(q.mid(), None);
    }

    #[test]
    fn quote_mid_is_none_when_ask_is_zero() {
        let q = QuoteSnapshot { bid: pts(4.50), ask: Points::ZERO };
        assert_eq!(q.mid(), None);
    }

    #[test]
    fn opening_range_bullish_and_bearish_are_exclusive() {
        let bullish = OpeningRange {
            bar_start: Utc::now(),
            orh: pts(5450.0),
            orl: pts(5400.0),
            orc: pts(5440.0),
            oro: pts(5410.0),
        };
        assert!(bullish.is_bullish());
        assert!(!bullish.is_bearish());

        let bearish = OpeningRange {
            bar_start: Utc::now(),
            orh: pts(5450.0),
            orl: pts(5400.0),
            orc: pts(5405.0),
            oro: pts(5440.0),
        };
        assert!(bearish.is_bearish());
        assert!(!bearish.is_bullish());
    }

    #[test]
    fn opening_range_neutral_when_close_equals_open() {
        let neutral = OpeningRange {
            bar_start: Utc::now(),
            orh: pts(5450.0),
            orl: pts(5400.0),
            orc: pts(5420.0),
            oro: pts(5420.0),
        };
        assert!(!neutral.is_bullish());
        assert!(!neutral.is_bearish());
    }
}
