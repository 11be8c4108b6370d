//! Strike Math (C4): derive short/long strikes for a ten-point-wide vertical
//! credit spread from an entry price.
//!
//! Pure and total — no IO, no fallible paths. The short strike is the entry
//! price rounded to the nearest multiple of 5; the long strike is ten points
//! further out of the money.

use ocs_fixedpoint::{round_to_multiple, Points};
use ocs_schemas::{Setup, SpreadStrikes};

/// Spread width is fixed at ten points by design — this is a ten-wide
/// credit spread bot, not a configurable-width one.
pub const SPREAD_WIDTH: Points = Points::new(1000);

const STRIKE_STEP: Points = Points::new(500);

/// PUT credit spread: short strike at-the-money (rounded), long strike ten
/// points below (further out of the money for a PUT seller).
pub fn put_spread_strikes(entry_price: Points) -> SpreadStrikes {
    let short_strike = round_to_multiple(entry_price, STRIKE_STEP);
    SpreadStrikes {
        setup: Setup::Put,
        short_strike,
        long_strike: short_strike - SPREAD_WIDTH,
    }
}

/// CALL credit spread: short strike at-the-money (rounded), long strike ten
/// points above.
pub fn call_spread_strikes(entry_price: Points) -> SpreadStrikes {
    let short_strike = round_to_multiple(entry_price, STRIKE_STEP);
    SpreadStrikes {
        setup: Setup::Call,
        short_strike,
        long_strike: short_strike + SPREAD_WIDTH,
    }
}
