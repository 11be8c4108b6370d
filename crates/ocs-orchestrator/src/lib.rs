//! Day Orchestrator (C13): wires every other component crate into one
//! sequenced run of a trading day.

mod day;
mod ports;
mod report;

pub use day::{run_day, DayInputs};
pub use ports::{Notifier, PortError, TracingNotifier, TracingTradeSink, TradeSink};
pub use report::render_eod_report;

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::{NaiveDate, TimeZone};
    use ocs_broker::{BrokerAdapter, BrokerError, CreditSpreadOrder, OrderLookup, SubmitResult};
    use ocs_clock::fake::FakeClock;
    use ocs_clock::EXCHANGE_TZ;
    use ocs_config::OcsConfig;
    use ocs_fixedpoint::Points;
    use ocs_gate::OrderGateway;
    use ocs_marketdata::InMemoryMarketDataAdapter;
    use ocs_monitor::{OptionQuoteSource, QuoteSourceError};
    use ocs_schemas::{Candle, DayPhase, QuoteSnapshot, SpreadStrikes, TradeRecord};

    fn trade_date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 10).unwrap()
    }

    fn at(hh: u32, mm: u32) -> chrono::DateTime<chrono::Utc> {
        EXCHANGE_TZ
            .with_ymd_and_hms(2026, 3, 10, hh, mm, 0)
            .unwrap()
            .with_timezone(&chrono::Utc)
    }

    fn bar(hh: u32, mm: u32, open: f64, high: f64, low: f64, close: f64) -> Candle {
        Candle {
            bar_start: at(hh, mm),
            open: Points::from_f64(open),
            high: Points::from_f64(high),
            low: Points::from_f64(low),
            close: Points::from_f64(close),
        }
    }

    fn config() -> OcsConfig {
        let mut map = std::collections::HashMap::new();
        map.insert("REPORT_RECIPIENT", "desk@example.com");
        map.insert("BROKER_BASE_URL", "https://broker.example");
        map.insert("BROKER_BEARER_TOKEN", "tok");
        map.insert("BROKER_ACCOUNT_ID", "acct-1");
        map.insert("MARKET_DATA_BASE_URL", "https://vendor.example");
        map.insert("MARKET_DATA_API_KEY", "key");
        OcsConfig::load(ocs_config::map_source(map)).unwrap()
    }

    /// Quote source that always reports a fill-worthy reading.
    struct AlwaysFillsQuotes;

    #[async_trait]
    impl OptionQuoteSource for AlwaysFillsQuotes {
        async fn get_paired_quote(
            &self,
            _strikes: SpreadStrikes,
        ) -> Result<(QuoteSnapshot, QuoteSnapshot), QuoteSourceError> {
            Ok((
                QuoteSnapshot { bid: Points::from_f64(8.30), ask: Points::from_f64(8.30) },
                QuoteSnapshot { bid: Points::from_f64(3.60), ask: Points::from_f64(3.60) },
            ))
        }
    }

    /// Quote source that never fills before the entry deadline.
    struct NeverFillsQuotes;

    #[async_trait]
    impl OptionQuoteSource for NeverFillsQuotes {
        async fn get_paired_quote(
            &self,
            _strikes: SpreadStrikes,
        ) -> Result<(QuoteSnapshot, QuoteSnapshot), QuoteSourceError> {
            Ok((
                QuoteSnapshot { bid: Points::from_f64(8.00), ask: Points::from_f64(8.00) },
                QuoteSnapshot { bid: Points::from_f64(3.55), ask: Points::from_f64(3.55) },
            ))
        }
    }

    struct AlwaysOkBroker {
        equity: Points,
    }

    #[async_trait]
    impl BrokerAdapter for AlwaysOkBroker {
        async fn get_account_equity(&self) -> Result<Points, BrokerError> {
            Ok(self.equity)
        }

        async fn submit_credit_spread(
            &self,
            order: &CreditSpreadOrder,
        ) -> Result<SubmitResult, BrokerError> {
            Ok(SubmitResult::Confirmed {
                broker_order_id: order.client_order_id.clone(),
                status: ocs_broker::BrokerOrderStatus::Working,
            })
        }

        async fn get_today_orders(&self) -> Result<Vec<OrderLookup>, BrokerError> {
            Ok(vec![])
        }
    }

    fn no_sink_notifier() -> (TracingTradeSink, TracingNotifier) {
        (TracingTradeSink, TracingNotifier)
    }

    #[tokio::test]
    async fn bullish_opening_range_enters_and_settles_put_spread() {
        let market = InMemoryMarketDataAdapter::new();
        market.seed_candles(
            "SPX",
            trade_date(),
            vec![bar(9, 30, 5400.0, 5420.0, 5390.0, 5410.0)],
        );
        market.seed_close("SPX", trade_date(), Points::from_f64(5450.0));

        let clock = FakeClock::new(at(9, 30));
        let quotes = AlwaysFillsQuotes;
        let gate = OrderGateway::new(AlwaysOkBroker { equity: Points::from_f64(100_000.0) });
        let (sink, notifier) = no_sink_notifier();
        let cfg = config();

        let inputs = DayInputs {
            clock: &clock,
            market: &market,
            quotes: &quotes,
            gate: &gate,
            sink: &sink,
            notifier: &notifier,
            config: &cfg,
        };

        let record: TradeRecord = run_day(&inputs, trade_date()).await;
        match record.phase {
            DayPhase::Settled { setup, sizing, total_pnl, .. } => {
                assert_eq!(setup, ocs_schemas::Setup::Put);
                // entry 5410 -> short strike 5410; close 5450 expires the put spread
                // worthless, so P/L is the full net credit collected times quantity.
                assert_eq!(sizing.qty, 5);
                assert_eq!(total_pnl, Points::from_f64(2300.0));
            }
            other => panic!("expected Settled, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn opening_range_missing_bar_is_fatal_no_trade() {
        let market = InMemoryMarketDataAdapter::new();
        market.seed_candles("SPX", trade_date(), vec![]);

        let clock = FakeClock::new(at(9, 30));
        let quotes = NeverFillsQuotes;
        let gate = OrderGateway::new(AlwaysOkBroker { equity: Points::from_f64(100_000.0) });
        let (sink, notifier) = no_sink_notifier();
        let cfg = config();

        let inputs = DayInputs {
            clock: &clock,
            market: &market,
            quotes: &quotes,
            gate: &gate,
            sink: &sink,
            notifier: &notifier,
            config: &cfg,
        };

        let record = run_day(&inputs, trade_date()).await;
        assert!(matches!(record.phase, DayPhase::NoTrade { .. }));
    }

    #[tokio::test]
    async fn neutral_opening_range_with_no_breakout_is_no_trade() {
        let market = InMemoryMarketDataAdapter::new();
        market.seed_candles(
            "SPX",
            trade_date(),
            vec![bar(9, 30, 5400.0, 5420.0, 5390.0, 5400.0)],
        );

        let clock = FakeClock::new(at(9, 30));
        let quotes = NeverFillsQuotes;
        let gate = OrderGateway::new(AlwaysOkBroker { equity: Points::from_f64(100_000.0) });
        let (sink, notifier) = no_sink_notifier();
        let cfg = config();

        let inputs = DayInputs {
            clock: &clock,
            market: &market,
            quotes: &quotes,
            gate: &gate,
            sink: &sink,
            notifier: &notifier,
            config: &cfg,
        };

        let record = run_day(&inputs, trade_date()).await;
        assert!(matches!(record.phase, DayPhase::NoTrade { .. }));
    }

    #[tokio::test]
    async fn bearish_breakout_enters_call_spread() {
        let market = InMemoryMarketDataAdapter::new();
        market.seed_candles(
            "SPX",
            trade_date(),
            vec![
                bar(9, 30, 5420.0, 5425.0, 5390.0, 5395.0),
                bar(10, 30, 5395.0, 5400.0, 5392.0, 5394.0),
                bar(11, 0, 5394.0, 5395.0, 5380.0, 5385.0),
            ],
        );
        market.seed_close("SPX", trade_date(), Points::from_f64(5370.0));

        let clock = FakeClock::new(at(9, 30));
        let quotes = AlwaysFillsQuotes;
        let gate = OrderGateway::new(AlwaysOkBroker { equity: Points::from_f64(100_000.0) });
        let (sink, notifier) = no_sink_notifier();
        let cfg = config();

        let inputs = DayInputs {
            clock: &clock,
            market: &market,
            quotes: &quotes,
            gate: &gate,
            sink: &sink,
            notifier: &notifier,
            config: &cfg,
        };

        let record = run_day(&inputs, trade_date()).await;
        match record.phase {
            DayPhase::Settled { setup, .. } => assert_eq!(setup, ocs_schemas::Setup::Call),
            other => panic!("expected Settled call spread, got {other:?}"),
        }
    }

    /// The 10:00-10:30 bar is the first Step-B window and must be examined
    /// on its own, not skipped in favor of a later one: with no candle at
    /// 10:30/11:00/11:30 at all, a breakout here is the day's only signal.
    #[tokio::test]
    async fn bearish_breakout_in_the_10_00_window_enters_call_spread() {
        let market = InMemoryMarketDataAdapter::new();
        market.seed_candles(
            "SPX",
            trade_date(),
            vec![
                bar(9, 30, 5440.0, 5445.0, 5435.0, 5438.0),
                bar(10, 0, 5434.0, 5436.0, 5428.0, 5430.0),
            ],
        );
        market.seed_close("SPX", trade_date(), Points::from_f64(5420.0));

        let clock = FakeClock::new(at(9, 30));
        let quotes = AlwaysFillsQuotes;
        let gate = OrderGateway::new(AlwaysOkBroker { equity: Points::from_f64(100_000.0) });
        let (sink, notifier) = no_sink_notifier();
        let cfg = config();

        let inputs = DayInputs {
            clock: &clock,
            market: &market,
            quotes: &quotes,
            gate: &gate,
            sink: &sink,
            notifier: &notifier,
            config: &cfg,
        };

        let record = run_day(&inputs, trade_date()).await;
        match record.phase {
            DayPhase::Settled { setup, strikes, .. } => {
                assert_eq!(setup, ocs_schemas::Setup::Call);
                // entry = 5430 (the 10:00 bar's close) -> short strike 5430
                assert_eq!(strikes.short_strike, Points::from_f64(5430.0));
            }
            other => panic!("expected Settled call spread from the 10:00 window, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn no_fill_before_deadline_ends_day_as_no_fill() {
        let market = InMemoryMarketDataAdapter::new();
        market.seed_candles(
            "SPX",
            trade_date(),
            vec![bar(9, 30, 5400.0, 5420.0, 5390.0, 5410.0)],
        );

        let clock = FakeClock::new(at(9, 30));
        let quotes = NeverFillsQuotes;
        let gate = OrderGateway::new(AlwaysOkBroker { equity: Points::from_f64(100_000.0) });
        let (sink, notifier) = no_sink_notifier();
        let cfg = config();

        let inputs = DayInputs {
            clock: &clock,
            market: &market,
            quotes: &quotes,
            gate: &gate,
            sink: &sink,
            notifier: &notifier,
            config: &cfg,
        };

        let record = run_day(&inputs, trade_date()).await;
        assert!(matches!(record.phase, DayPhase::NoFill { .. }));
    }

    #[tokio::test]
    async fn missing_index_close_at_expiration_is_settlement_skipped() {
        let market = InMemoryMarketDataAdapter::new();
        market.seed_candles(
            "SPX",
            trade_date(),
            vec![bar(9, 30, 5400.0, 5420.0, 5390.0, 5410.0)],
        );

        let clock = FakeClock::new(at(9, 30));
        let quotes = AlwaysFillsQuotes;
        let gate = OrderGateway::new(AlwaysOkBroker { equity: Points::from_f64(100_000.0) });
        let (sink, notifier) = no_sink_notifier();
        let cfg = config();

        let inputs = DayInputs {
            clock: &clock,
            market: &market,
            quotes: &quotes,
            gate: &gate,
            sink: &sink,
            notifier: &notifier,
            config: &cfg,
        };

        let record = run_day(&inputs, trade_date()).await;
        assert!(matches!(record.phase, DayPhase::SettlementSkipped { .. }));
    }
}
