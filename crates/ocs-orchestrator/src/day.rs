//! Day Orchestrator (C13): drives C1→C8→C9→C10→C11→C7 in strict sequence.
//!
//! A thin orchestration layer that holds no business logic of its own —
//! every decision here is a call into a component crate; this module only
//! sequences them and turns their outcomes into `TradeRecord` phases.
//!
//! Exactly one `TradeRecord` is produced per call. No exceptions escape:
//! every fallible step is classified into either a terminal `TradeRecord`
//! phase or a logged, tolerated retry.

use chrono::{NaiveDate, NaiveTime};

use ocs_broker::BrokerAdapter;
use ocs_clock::{Clock, EXCHANGE_TZ};
use ocs_config::OcsConfig;
use ocs_gate::{derive_client_order_id, OrderGateway, SafetyConfig};
use ocs_marketdata::MarketDataAdapter;
use ocs_monitor::{run_quote_monitor, MonitorConfig, MonitorOutcome, OptionQuoteSource};
use ocs_schemas::{DayPhase, Setup, TradeRecord};
use ocs_selector::{capture_opening_range, evaluate_step_a, evaluate_step_b_window, step_b_windows};
use ocs_sizer::{size_position, SizerConfig};

use crate::ports::{Notifier, TradeSink};
use crate::report::render_eod_report;

fn or_capture_time() -> NaiveTime {
    NaiveTime::from_hms_opt(10, 0, 0).expect("valid static time")
}

fn entry_deadline() -> NaiveTime {
    NaiveTime::from_hms_opt(12, 0, 0).expect("valid static time")
}

fn market_close_time() -> NaiveTime {
    NaiveTime::from_hms_opt(16, 0, 0).expect("valid static time")
}

/// Everything `run_day` needs, gathered so call sites don't thread ten
/// separate parameters through. Borrowed, not owned: the orchestrator does
/// not outlive a single trading day's call.
pub struct DayInputs<'a, B: BrokerAdapter> {
    pub clock: &'a dyn Clock,
    pub market: &'a dyn MarketDataAdapter,
    pub quotes: &'a dyn OptionQuoteSource,
    pub gate: &'a OrderGateway<B>,
    pub sink: &'a dyn TradeSink,
    pub notifier: &'a dyn Notifier,
    pub config: &'a OcsConfig,
}

async fn emit<B: BrokerAdapter>(record: &TradeRecord, inputs: &DayInputs<'_, B>) {
    if let Err(err) = inputs.sink.append_trade(record).await {
        tracing::error!(%err, "failed to persist trade record phase");
    }
}

/// Step B's per-window scan: wait for each window's bar to close, then
/// examine it, in order, through the 12:00 deadline. Each window's
/// evaluation strictly follows that window's close instant — there is no
/// way to observe a bar before the clock has reached its poll time, which
/// is what makes this safe against a live adapter that simply does not
/// have a bar yet. Stops at the first breakout; a market-data failure
/// aborts the scan (and the day) immediately rather than being retried.
async fn scan_step_b_windows<B: BrokerAdapter>(
    inputs: &DayInputs<'_, B>,
    trade_date: NaiveDate,
    opening_range: &ocs_schemas::OpeningRange,
) -> Result<Option<(Setup, ocs_fixedpoint::Points)>, ocs_selector::SelectorError> {
    for window in step_b_windows() {
        inputs.clock.wait_until(window.poll_time).await;

        if let Some((entry, _trigger_bar_start)) = evaluate_step_b_window(
            inputs.market,
            &inputs.config.underlying_symbol,
            trade_date,
            EXCHANGE_TZ,
            opening_range,
            window,
        )
        .await?
        {
            return Ok(Some((Setup::Call, entry)));
        }
    }
    Ok(None)
}

/// Run one trading day to completion and return its sealed `TradeRecord`.
pub async fn run_day<B: BrokerAdapter>(inputs: &DayInputs<'_, B>, trade_date: NaiveDate) -> TradeRecord {
    inputs.clock.wait_until(or_capture_time()).await;

    let opening_range = match capture_opening_range(
        inputs.market,
        &inputs.config.underlying_symbol,
        trade_date,
        EXCHANGE_TZ,
    )
    .await
    {
        Ok(or) => or,
        Err(err) => {
            tracing::error!(%err, "opening range capture failed, fatal");
            return finish_no_trade(inputs, trade_date, format!("opening range unavailable: {err}")).await;
        }
    };

    let setup_entry = if let Some(entry) = evaluate_step_a(&opening_range) {
        Some((Setup::Put, entry))
    } else {
        match scan_step_b_windows(inputs, trade_date, &opening_range).await {
            Ok(found) => found,
            Err(err) => {
                tracing::error!(%err, "bearish breakout scan failed, fatal");
                return finish_no_trade_with_or(
                    inputs,
                    trade_date,
                    format!("bearish breakout scan failed: {err}"),
                    opening_range,
                )
                .await;
            }
        }
    };

    let Some((setup, entry_price)) = setup_entry else {
        return finish_no_trade_with_or(
            inputs,
            trade_date,
            "opening range neutral or no bearish breakout by 12:00".to_string(),
            opening_range,
        )
        .await;
    };

    let strikes = match setup {
        Setup::Put => ocs_strikemath::put_spread_strikes(entry_price),
        Setup::Call => ocs_strikemath::call_spread_strikes(entry_price),
    };

    let monitor_config = MonitorConfig {
        min_net_credit: OcsConfig::min_net_credit(),
        deadline: entry_deadline(),
        poll_interval: OcsConfig::poll_interval(),
    };

    let credit = match run_quote_monitor(inputs.clock, inputs.quotes, strikes, &monitor_config).await {
        MonitorOutcome::Filled(credit) => credit,
        MonitorOutcome::NoFill => {
            let record = TradeRecord {
                trade_date,
                phase: DayPhase::NoFill { setup, strikes },
                opening_range: Some(opening_range),
                recorded_at: inputs.clock.now_utc(),
            };
            emit(&record, inputs).await;
            return finalize(inputs, record).await;
        }
    };

    let equity = match inputs.gate.broker().get_account_equity().await {
        Ok(equity) => equity,
        Err(err) => {
            tracing::error!(%err, "account equity unavailable at sizing time, fatal");
            return finish_no_trade_with_or(
                inputs,
                trade_date,
                format!("account equity unavailable: {err}"),
                opening_range,
            )
            .await;
        }
    };

    let sizing = size_position(
        equity,
        inputs.config.daily_risk_pct,
        credit.net,
        SizerConfig {
            min_contracts: inputs.config.min_contracts,
            max_contracts: inputs.config.max_contracts,
        },
    );

    let client_order_id =
        derive_client_order_id(trade_date, setup, strikes.short_strike, strikes.long_strike);
    let order = ocs_broker::CreditSpreadOrder {
        client_order_id,
        underlying: inputs.config.underlying_symbol.clone(),
        setup,
        expiration: trade_date,
        short_strike: strikes.short_strike,
        long_strike: strikes.long_strike,
        limit_net_credit: credit.gross,
        quantity: sizing.qty,
    };
    let safety = SafetyConfig {
        dry_run: inputs.config.dry_run,
        enable_live_trading: inputs.config.enable_live_trading,
    };

    let submission = match inputs.gate.submit(&order, &safety).await {
        Ok(submission) => submission,
        Err(err) => {
            tracing::error!(%err, "order submission failed, fatal");
            return finish_no_trade_with_or(
                inputs,
                trade_date,
                format!("order submission failed: {err}"),
                opening_range,
            )
            .await;
        }
    };

    let entered_record = TradeRecord {
        trade_date,
        phase: DayPhase::Entered { setup, strikes, credit, sizing, submission: submission.clone() },
        opening_range: Some(opening_range),
        recorded_at: inputs.clock.now_utc(),
    };
    emit(&entered_record, inputs).await;

    inputs.clock.wait_until(market_close_time()).await;

    let settled_record = match inputs
        .market
        .get_index_close(&inputs.config.underlying_symbol, trade_date)
        .await
    {
        Ok(Some(spx_close)) => {
            let result = ocs_settlement::settle(setup, strikes.short_strike, spx_close, credit.net, sizing.qty);
            TradeRecord {
                trade_date,
                phase: DayPhase::Settled {
                    setup,
                    strikes,
                    credit,
                    sizing,
                    submission,
                    spx_close,
                    settlement_value: result.settlement_value,
                    pnl_per_spread: result.pnl_per_spread,
                    total_pnl: result.total_pnl,
                },
                opening_range: Some(opening_range),
                recorded_at: inputs.clock.now_utc(),
            }
        }
        Ok(None) => {
            TradeRecord {
                trade_date,
                phase: DayPhase::SettlementSkipped {
                    setup,
                    strikes,
                    credit,
                    sizing,
                    submission,
                    reason: "index close not yet published".to_string(),
                },
                opening_range: Some(opening_range),
                recorded_at: inputs.clock.now_utc(),
            }
        }
        Err(err) => {
            tracing::error!(%err, "index close unavailable at settlement, non-fatal");
            TradeRecord {
                trade_date,
                phase: DayPhase::SettlementSkipped {
                    setup,
                    strikes,
                    credit,
                    sizing,
                    submission,
                    reason: format!("index close unavailable: {err}"),
                },
                opening_range: Some(opening_range),
                recorded_at: inputs.clock.now_utc(),
            }
        }
    };

    emit(&settled_record, inputs).await;
    finalize(inputs, settled_record).await
}

async fn finish_no_trade<B: BrokerAdapter>(
    inputs: &DayInputs<'_, B>,
    trade_date: NaiveDate,
    reason: String,
) -> TradeRecord {
    let record = TradeRecord::no_trade(trade_date, reason, inputs.clock.now_utc());
    emit(&record, inputs).await;
    finalize(inputs, record).await
}

async fn finish_no_trade_with_or<B: BrokerAdapter>(
    inputs: &DayInputs<'_, B>,
    trade_date: NaiveDate,
    reason: String,
    opening_range: ocs_schemas::OpeningRange,
) -> TradeRecord {
    let record = TradeRecord {
        trade_date,
        phase: DayPhase::NoTrade { reason },
        opening_range: Some(opening_range),
        recorded_at: inputs.clock.now_utc(),
    };
    emit(&record, inputs).await;
    finalize(inputs, record).await
}

async fn finalize<B: BrokerAdapter>(inputs: &DayInputs<'_, B>, record: TradeRecord) -> TradeRecord {
    let report_text = render_eod_report(&record);
    if let Err(err) = inputs
        .notifier
        .send_eod(&report_text, std::slice::from_ref(&inputs.config.report_recipient))
        .await
    {
        tracing::error!(%err, "failed to deliver end-of-day report");
    }
    if let Err(err) = inputs.sink.persist_report("eod_report.txt", &report_text).await {
        tracing::error!(%err, "failed to persist end-of-day report");
    }
    record
}
