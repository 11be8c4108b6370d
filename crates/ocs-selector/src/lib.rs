//! Opening-Range Capture (C8) and Setup Selector (C9).
//!
//! # The candles[0] defect
//!
//! The strategy this was built from took the *first* candle a data-provider
//! call returned and assumed it was the bar it asked for — true only when
//! the adapter happens to return exactly one bar starting at session open.
//! A provider that returns the whole day's bars (or bars from a prior
//! session) silently hands back the wrong candle. Every lookup here filters
//! the adapter's response by the exact `bar_start` it expects instead of
//! indexing the first element.

use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone, Utc};
use ocs_fixedpoint::Points;
use ocs_marketdata::{FetchCandlesRequest, MarketDataAdapter, MarketDataError};
use ocs_schemas::{Candle, OpeningRange};

pub fn or_bar_start() -> NaiveTime {
    NaiveTime::from_hms_opt(9, 30, 0).expect("valid static time")
}

/// One Step-B candidate window: the bar spans `bar_start` for 30 minutes
/// and cannot be read until it closes, which is `poll_time` — 30 minutes
/// later. The four windows' bars start at 10:00, 10:30, 11:00, 11:30 and
/// are examined at 10:30, 11:00, 11:30, 12:00 respectively.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepBWindow {
    pub bar_start: NaiveTime,
    pub poll_time: NaiveTime,
}

pub fn step_b_windows() -> [StepBWindow; 4] {
    [
        StepBWindow {
            bar_start: NaiveTime::from_hms_opt(10, 0, 0).expect("valid static time"),
            poll_time: NaiveTime::from_hms_opt(10, 30, 0).expect("valid static time"),
        },
        StepBWindow {
            bar_start: NaiveTime::from_hms_opt(10, 30, 0).expect("valid static time"),
            poll_time: NaiveTime::from_hms_opt(11, 0, 0).expect("valid static time"),
        },
        StepBWindow {
            bar_start: NaiveTime::from_hms_opt(11, 0, 0).expect("valid static time"),
            poll_time: NaiveTime::from_hms_opt(11, 30, 0).expect("valid static time"),
        },
        StepBWindow {
            bar_start: NaiveTime::from_hms_opt(11, 30, 0).expect("valid static time"),
            poll_time: NaiveTime::from_hms_opt(12, 0, 0).expect("valid static time"),
        },
    ]
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectorError {
    /// The opening-range bar was not present in the adapter's response.
    OpeningRangeMissing,
    MarketData(MarketDataError),
}

impl std::fmt::Display for SelectorError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SelectorError::OpeningRangeMissing => {
                write!(f, "opening range bar not present for trade date")
            }
            SelectorError::MarketData(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for SelectorError {}

fn find_bar_at(candles: &[Candle], exchange_tz: chrono_tz::Tz, trade_date: NaiveDate, time: NaiveTime) -> Option<Candle> {
    let target_local = exchange_tz.from_local_datetime(&trade_date.and_time(time)).single()?;
    let target_utc: DateTime<Utc> = target_local.with_timezone(&Utc);
    candles.iter().find(|c| c.bar_start == target_utc).copied()
}

/// Fetch and publish the opening range for `trade_date`. Fatal precondition
/// failure (`NO_TRADE`) if the 09:30 bar is absent — there is no sensible
/// fallback for a missing opening range.
pub async fn capture_opening_range(
    market: &dyn MarketDataAdapter,
    symbol: &str,
    trade_date: NaiveDate,
    exchange_tz: chrono_tz::Tz,
) -> Result<OpeningRange, SelectorError> {
    let candles = market
        .get_30min_candles(FetchCandlesRequest {
            symbol: symbol.to_string(),
            trade_date,
        })
        .await
        .map_err(SelectorError::MarketData)?;

    let bar = find_bar_at(&candles, exchange_tz, trade_date, or_bar_start())
        .ok_or(SelectorError::OpeningRangeMissing)?;

    Ok(OpeningRange {
        bar_start: bar.bar_start,
        orh: bar.high,
        orl: bar.low,
        orc: bar.close,
        oro: bar.open,
    })
}

/// Step A: if the opening range is bullish, trade a PUT credit spread
/// immediately at 10:00, using the opening range's close as the entry
/// reference price.
pub fn evaluate_step_a(opening_range: &OpeningRange) -> Option<Points> {
    if opening_range.is_bullish() {
        Some(opening_range.orc)
    } else {
        None
    }
}

/// Step B, one window: only meaningful once Step A has already been ruled
/// out (the opening range was not bullish). Fetches the day's candles and
/// checks the bar starting at `window.bar_start` — the bar that closes at
/// `window.poll_time` — for a close strictly below the opening-range low.
///
/// The caller is responsible for waiting until `window.poll_time` before
/// calling this: the bar cannot have closed, and so cannot be meaningfully
/// read, any earlier. Returns `Ok(None)` if the bar is missing (logged,
/// not fatal — the caller proceeds to the next window) or did not break
/// out; this is not the day's final `NO_TRADE` outcome, only this window's.
pub async fn evaluate_step_b_window(
    market: &dyn MarketDataAdapter,
    symbol: &str,
    trade_date: NaiveDate,
    exchange_tz: chrono_tz::Tz,
    opening_range: &OpeningRange,
    window: StepBWindow,
) -> Result<Option<(Points, DateTime<Utc>)>, SelectorError> {
    if opening_range.is_bullish() {
        // Step A precludes Step B unconditionally.
        return Ok(None);
    }

    let candles = market
        .get_30min_candles(FetchCandlesRequest {
            symbol: symbol.to_string(),
            trade_date,
        })
        .await
        .map_err(SelectorError::MarketData)?;

    match find_bar_at(&candles, exchange_tz, trade_date, window.bar_start) {
        Some(bar) if bar.close < opening_range.orl => Ok(Some((bar.close, bar.bar_start))),
        Some(_) => Ok(None),
        None => {
            tracing::warn!(bar_start = %window.bar_start, "step b: window bar missing, proceeding to next window");
            Ok(None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone as _;
    use ocs_marketdata::InMemoryMarketDataAdapter;

    const NY: chrono_tz::Tz = chrono_tz::America::New_York;

    fn bar_at(trade_date: NaiveDate, time: NaiveTime, open: f64, high: f64, low: f64, close: f64) -> Candle {
        let local = NY.from_local_datetime(&trade_date.and_time(time)).unwrap();
        Candle {
            bar_start: local.with_timezone(&Utc),
            open: Points::from_f64(open),
            high: Points::from_f64(high),
            low: Points::from_f64(low),
            close: Points::from_f64(close),
        }
    }

    #[tokio::test]
    async fn capture_opening_range_filters_by_exact_bar_start_not_first_element() {
        let date = NaiveDate::from_ymd_opt(2026, 3, 10).unwrap();
        let adapter = InMemoryMarketDataAdapter::new();
        // Deliberately seed a decoy bar (e.g. from a prior session or a
        // different interval) ahead of the real 09:30 bar, to prove we do
        // not naively take index 0.
        let decoy = bar_at(
            date,
            NaiveTime::from_hms_opt(4, 0, 0).unwrap(),
            5000.0,
            5010.0,
            4990.0,
            5005.0,
        );
        let real_or_bar = bar_at(date, or_bar_start(), 5400.0, 5420.0, 5390.0, 5410.0);
        adapter.seed_candles("SPX", date, vec![decoy, real_or_bar]);

        let or = capture_opening_range(&adapter, "SPX", date, NY).await.unwrap();
        assert_eq!(or.oro, Points::from_f64(5400.0));
        assert_eq!(or.orc, Points::from_f64(5410.0));
    }

    #[tokio::test]
    async fn capture_opening_range_missing_bar_is_fatal() {
        let date = NaiveDate::from_ymd_opt(2026, 3, 10).unwrap();
        let adapter = InMemoryMarketDataAdapter::new();
        adapter.seed_candles("SPX", date, vec![]);
        let result = capture_opening_range(&adapter, "SPX", date, NY).await;
        assert_eq!(result.unwrap_err(), SelectorError::OpeningRangeMissing);
    }

    #[tokio::test]
    async fn step_a_triggers_on_bullish_opening_range() {
        let or = OpeningRange {
            bar_start: Utc::now(),
            orh: Points::from_f64(5450.0),
            orl: Points::from_f64(5390.0),
            orc: Points::from_f64(5420.0),
            oro: Points::from_f64(5400.0),
        };
        assert_eq!(evaluate_step_a(&or), Some(Points::from_f64(5420.0)));
    }

    #[tokio::test]
    async fn step_a_does_not_trigger_on_bearish_or_neutral_range() {
        let bearish = OpeningRange {
            bar_start: Utc::now(),
            orh: Points::from_f64(5450.0),
            orl: Points::from_f64(5390.0),
            orc: Points::from_f64(5395.0),
            oro: Points::from_f64(5420.0),
        };
        assert_eq!(evaluate_step_a(&bearish), None);
    }

    #[tokio::test]
    async fn step_b_precluded_when_step_a_eligible() {
        let date = NaiveDate::from_ymd_opt(2026, 3, 10).unwrap();
        let adapter = InMemoryMarketDataAdapter::new();
        let bullish = OpeningRange {
            bar_start: Utc::now(),
            orh: Points::from_f64(5450.0),
            orl: Points::from_f64(5390.0),
            orc: Points::from_f64(5420.0),
            oro: Points::from_f64(5400.0),
        };
        let result = evaluate_step_b_window(&adapter, "SPX", date, NY, &bullish, step_b_windows()[0])
            .await
            .unwrap();
        assert_eq!(result, None);
    }

    #[tokio::test]
    async fn step_b_examines_the_10_00_bar_in_its_window_not_a_later_one() {
        // The first Step-B window's bar starts at 10:00 and is examined at
        // 10:30 — the bar a naive "poll instants as bar starts" reading
        // would instead look for a nonexistent 12:00-12:30 bar.
        let date = NaiveDate::from_ymd_opt(2026, 3, 10).unwrap();
        let adapter = InMemoryMarketDataAdapter::new();
        let bearish = OpeningRange {
            bar_start: Utc::now(),
            orh: Points::from_f64(5450.0),
            orl: Points::from_f64(5435.0),
            orc: Points::from_f64(5436.0),
            oro: Points::from_f64(5440.0),
        };
        let bar_1000 = bar_at(
            date,
            NaiveTime::from_hms_opt(10, 0, 0).unwrap(),
            5436.0,
            5437.0,
            5428.0,
            5430.0, // breaks strictly below ORL 5435
        );
        adapter.seed_candles("SPX", date, vec![bar_1000]);

        let windows = step_b_windows();
        assert_eq!(windows[0].bar_start, NaiveTime::from_hms_opt(10, 0, 0).unwrap());
        assert_eq!(windows[0].poll_time, NaiveTime::from_hms_opt(10, 30, 0).unwrap());

        let result = evaluate_step_b_window(&adapter, "SPX", date, NY, &bearish, windows[0])
            .await
            .unwrap();
        assert_eq!(result.unwrap().0, Points::from_f64(5430.0));
    }

    #[tokio::test]
    async fn step_b_window_triggers_on_breakout_below_orl() {
        let date = NaiveDate::from_ymd_opt(2026, 3, 10).unwrap();
        let adapter = InMemoryMarketDataAdapter::new();
        let bearish = OpeningRange {
            bar_start: Utc::now(),
            orh: Points::from_f64(5450.0),
            orl: Points::from_f64(5390.0),
            orc: Points::from_f64(5395.0),
            oro: Points::from_f64(5420.0),
        };
        // The 10:30-bar_start window (examined at 11:00) breaks below ORL.
        let bar_1030 = bar_at(
            date,
            NaiveTime::from_hms_opt(10, 30, 0).unwrap(),
            5398.0,
            5399.0,
            5380.0,
            5385.0,
        );
        adapter.seed_candles("SPX", date, vec![bar_1030]);

        let windows = step_b_windows();
        let result = evaluate_step_b_window(&adapter, "SPX", date, NY, &bearish, windows[1])
            .await
            .unwrap();
        assert_eq!(result.unwrap().0, Points::from_f64(5385.0));
    }

    #[tokio::test]
    async fn step_b_touching_orl_exactly_does_not_trigger() {
        let date = NaiveDate::from_ymd_opt(2026, 3, 10).unwrap();
        let adapter = InMemoryMarketDataAdapter::new();
        let bearish = OpeningRange {
            bar_start: Utc::now(),
            orh: Points::from_f64(5450.0),
            orl: Points::from_f64(5390.0),
            orc: Points::from_f64(5395.0),
            oro: Points::from_f64(5420.0),
        };
        let bar_1000 = bar_at(
            date,
            NaiveTime::from_hms_opt(10, 0, 0).unwrap(),
            5400.0,
            5410.0,
            5390.0,
            5390.0, // exactly equal to ORL, strict < required
        );
        adapter.seed_candles("SPX", date, vec![bar_1000]);

        let result = evaluate_step_b_window(&adapter, "SPX", date, NY, &bearish, step_b_windows()[0])
            .await
            .unwrap();
        assert_eq!(result, None);
    }

    #[tokio::test]
    async fn step_b_missing_window_bar_is_logged_and_not_fatal() {
        let date = NaiveDate::from_ymd_opt(2026, 3, 10).unwrap();
        let adapter = InMemoryMarketDataAdapter::new();
        let bearish = OpeningRange {
            bar_start: Utc::now(),
            orh: Points::from_f64(5450.0),
            orl: Points::from_f64(5390.0),
            orc: Points::from_f64(5395.0),
            oro: Points::from_f64(5420.0),
        };
        adapter.seed_candles("SPX", date, vec![]);
        let result = evaluate_step_b_window(&adapter, "SPX", date, NY, &bearish, step_b_windows()[0])
            .await
            .unwrap();
        assert_eq!(result, None);
    }
}
