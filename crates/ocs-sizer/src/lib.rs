//! Position Sizer (C6): turn account equity and a spread's net credit into
//! a contract quantity, capped by the configured risk budget and
//! min/max-contract bounds.

use ocs_fixedpoint::Points;
use ocs_schemas::PositionSizing;

/// Options multiplier: one point of spread width/credit is worth this many
/// dollars per contract.
const CONTRACT_MULTIPLIER: i64 = 100;

pub const SPREAD_WIDTH: Points = Points::new(1000); // 10.00 points

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SizerConfig {
    pub min_contracts: i64,
    pub max_contracts: i64,
}

/// Size a position from account equity, the configured daily risk
/// percentage, and the spread's net credit.
///
/// `daily_risk_pct` is a plain fraction (0.03 == 3%), not a `Points` value —
/// it is a configuration ratio, not a priced quantity.
pub fn size_position(
    equity: Points,
    daily_risk_pct: f64,
    net_credit: Points,
    config: SizerConfig,
) -> PositionSizing {
    let daily_risk_budget = Points::from_f64(equity.to_f64() * daily_risk_pct);

    let max_loss_per_spread = (SPREAD_WIDTH - net_credit)
        .checked_mul_qty(CONTRACT_MULTIPLIER)
        .unwrap_or(Points::MAX);

    let qty = if max_loss_per_spread.raw() <= 0 {
        config.min_contracts
    } else {
        let raw_qty = daily_risk_budget.raw() / max_loss_per_spread.raw();
        raw_qty.clamp(config.min_contracts, config.max_contracts)
    };

    PositionSizing {
        daily_risk_budget,
        max_loss_per_spread,
        qty,
    }
}
