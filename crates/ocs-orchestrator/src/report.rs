//! Plain-text end-of-day report rendering. The wire/file format of the
//! report is out of scope (SMTP transport is an external collaborator) —
//! this just produces the `report_text` the `Notifier` port is handed.

use ocs_schemas::{DayPhase, TradeRecord};

pub fn render_eod_report(record: &TradeRecord) -> String {
    let mut lines = vec![format!("0DTE credit-spread report — {}", record.trade_date)];

    match &record.phase {
        DayPhase::NoTrade { reason } => {
            lines.push(format!("Outcome: NO_TRADE ({reason})"));
        }
        DayPhase::NoFill { setup, strikes } => {
            lines.push(format!(
                "Outcome: NO_FILL — {setup} spread {}/{} never cleared threshold before deadline",
                strikes.short_strike, strikes.long_strike
            ));
        }
        DayPhase::Entered { setup, strikes, credit, sizing, submission } => {
            lines.push(format!(
                "Outcome: ENTERED — {setup} spread {}/{} x{} @ net {} (gross {})",
                strikes.short_strike, strikes.long_strike, sizing.qty, credit.net, credit.gross
            ));
            lines.push(format!("Submission: {submission:?}"));
        }
        DayPhase::Settled {
            setup,
            strikes,
            credit,
            sizing,
            submission,
            spx_close,
            settlement_value,
            pnl_per_spread,
            total_pnl,
        } => {
            lines.push(format!(
                "Outcome: SETTLED — {setup} spread {}/{} x{} @ net {}",
                strikes.short_strike, strikes.long_strike, sizing.qty, credit.net
            ));
            lines.push(format!("Submission: {submission:?}"));
            lines.push(format!(
                "Close {spx_close}, settlement value {settlement_value}, P/L per spread {pnl_per_spread}, total P/L {total_pnl}"
            ));
        }
        DayPhase::SettlementSkipped { setup, strikes, credit, sizing, submission, reason } => {
            lines.push(format!(
                "Outcome: SETTLEMENT_SKIPPED — {setup} spread {}/{} x{} @ net {} ({reason})",
                strikes.short_strike, strikes.long_strike, sizing.qty, credit.net
            ));
            lines.push(format!("Submission: {submission:?}"));
        }
    }

    if let Some(or) = &record.opening_range {
        lines.push(format!(
            "Opening range: O={} H={} L={} C={}",
            or.oro, or.orh, or.orl, or.orc
        ));
    }

    lines.join("\n")
}
