//! Credit Evaluator (C5): turn a pair of leg quotes into a gross/net credit
//! and decide whether it clears the minimum threshold.

use ocs_fixedpoint::Points;
use ocs_schemas::{QuoteSnapshot, SpreadCredit};

/// Fixed per the original strategy's slippage allowance: the net credit the
/// gate compares against `MIN_NET_CREDIT` is the gross credit minus this
/// buffer, not the raw mid-to-mid spread.
pub const SLIPPAGE_BUFFER: Points = Points::new(10); // 0.10

/// Evaluate the credit for selling `short` and buying `long`.
///
/// Returns `None` if either leg is unquotable (bid or ask is zero) — the
/// caller (the quote-monitor loop) treats that as "not ready, retry".
pub fn evaluate_credit(short: &QuoteSnapshot, long: &QuoteSnapshot) -> Option<SpreadCredit> {
    let short_mid = short.mid()?;
    let long_mid = long.mid()?;
    let gross = short_mid - long_mid;
    let net = gross - SLIPPAGE_BUFFER;
    Some(SpreadCredit { gross, net })
}

/// Does this credit clear the configured minimum net credit?
pub fn meets_credit_threshold(credit: &SpreadCredit, min_net_credit: Points) -> bool {
    credit.net >= min_net_credit
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quote(bid: f64, ask: f64) -> QuoteSnapshot {
        QuoteSnapshot {
            bid: Points::from_f64(bid),
            ask: Points::from_f64(ask),
        }
    }

    #[test]
    fn evaluate_credit_computes_gross_and_net() {
        let short = quote(11.00, 11.10); // mid 11.05
        let long = quote(6.30, 6.40); // mid 6.35
        let credit = evaluate_credit(&short, &long).unwrap();
        assert_eq!(credit.gross, Points::from_f64(4.70));
        assert_eq!(credit.net, Points::from_f64(4.60));
    }

    #[test]
    fn evaluate_credit_none_when_short_leg_unquotable() {
        let short = quote(0.0, 0.0);
        let long = quote(6.30, 6.40);
        assert_eq!(evaluate_credit(&short, &long), None);
    }

    #[test]
    fn evaluate_credit_none_when_long_leg_unquotable() {
        let short = quote(11.00, 11.10);
        let long = quote(0.0, 0.0);
        assert_eq!(evaluate_credit(&short, &long), None);
    }

    #[test]
    fn meets_threshold_at_exact_boundary() {
        let credit = SpreadCredit {
            gross: Points::from_f64(4.70),
            net: Points::from_f64(4.60),
        };
        assert!(meets_credit_threshold(&credit, Points::from_f64(4.60)));
    }

    #[test]
    fn fails_threshold_one_cent_below_boundary() {
        let credit = SpreadCredit {
            gross: Points::from_f64(4.69),
            net: Points::from_f64(4.59),
        };
        assert!(!meets_credit_threshold(&credit, Points::from_f64(4.60)));
    }
}
