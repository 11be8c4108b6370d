//! P/L Reconciler (C7): cash-settlement P/L at expiration.
//!
//! Named "settlement" rather than "reconcile" to avoid colliding with a
//! broker/local-position reconciliation concern elsewhere in the workspace —
//! this module only computes expiration P/L from the index close, it does
//! not reconcile broker state against a local ledger.

use ocs_fixedpoint::Points;
use ocs_schemas::Setup;

/// Options multiplier: P/L per spread is this many dollars per point of
/// settlement/credit difference.
const CONTRACT_MULTIPLIER: i64 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SettlementResult {
    pub settlement_value: Points,
    pub pnl_per_spread: Points,
    pub total_pnl: Points,
}

/// Settle a credit spread against the index close at expiration.
///
/// `c_net_fill` is the net credit the position was actually entered at (see
/// the "C_net_fill" design decision in DESIGN.md: this is the gate's gating
/// credit, not a broker-execution-leg re-derivation).
pub fn settle(
    setup: Setup,
    short_strike: Points,
    spx_close: Points,
    c_net_fill: Points,
    qty: i64,
) -> SettlementResult {
    let spread_width = Points::new(1000); // 10.00
    let intrinsic = match setup {
        Setup::Put => short_strike - spx_close,
        Setup::Call => spx_close - short_strike,
    };
    let settlement_value = intrinsic.clamp(Points::ZERO, spread_width);

    let pnl_per_spread = (c_net_fill - settlement_value)
        .checked_mul_qty(CONTRACT_MULTIPLIER)
        .unwrap_or(Points::MIN);

    let total_pnl = pnl_per_spread.checked_mul_qty(qty).unwrap_or(Points::MIN);

    SettlementResult {
        settlement_value,
        pnl_per_spread,
        total_pnl,
    }
}
