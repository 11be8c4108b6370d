//! Fixed-point price/dollar type.
//!
//! # Motivation
//!
//! Every decimal quantity that matters to this crate's correctness — option
//! mid prices, net credit, strike offsets, P/L — is compared against a fixed
//! threshold somewhere in the pipeline (`C_net >= MIN_NET_CREDIT`,
//! `SPX < ORL`, `round_to_5`). Doing those comparisons in `f64` means the
//! bug shows up exactly at the boundary, which is exactly where it matters
//! most. `Points` wraps an `i64` at a 1e-2 scale (cents, or "hundredths of a
//! point") so boundary comparisons are plain integer comparisons.
//!
//! # Scale
//!
//! 1.00 (one index point, or one dollar) = `Points::new(100)`. All option
//! prices, credits, strikes and per-spread P/L in this workspace share this
//! scale. Share/contract counts remain plain `i64` and are never implicitly
//! convertible to `Points`.
//!
//! # Arithmetic
//!
//! `Add`, `Sub`, `Neg`, `AddAssign`, `SubAssign` are implemented for
//! `Points op Points`; they panic on overflow in debug builds and wrap in
//! release, matching Rust's integer semantics. `saturating_add`/
//! `saturating_sub` are the safe alternatives. `checked_mul_qty` multiplies a
//! per-spread amount by an integer quantity with overflow detection.

use std::ops::{Add, AddAssign, Neg, Sub, SubAssign};

/// A fixed-point amount at 1e-2 scale (cents / hundredths of an index point).
///
/// There is intentionally no `From<i64>` — callers must be deliberate about
/// when a raw integer represents a priced amount. Use [`Points::new`] for
/// values already at the 1e-2 scale, and [`Points::from_f64`] when crossing
/// a boundary that only gives you a float (broker/market-data JSON).
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Points(i64);

impl Points {
    pub const ZERO: Points = Points(0);
    pub const MAX: Points = Points(i64::MAX);
    pub const MIN: Points = Points(i64::MIN);

    /// Construct from a raw `i64` already at 1e-2 scale.
    #[inline]
    pub const fn new(raw: i64) -> Self {
        Points(raw)
    }

    /// Construct from a float, rounding to the nearest cent.
    ///
    /// Used only at adapter boundaries (parsing broker/market-data JSON);
    /// core logic never produces a `Points` this way.
    #[inline]
    pub fn from_f64(value: f64) -> Self {
        Points((value * 100.0).round() as i64)
    }

    /// Convert back to a float, for display or wire serialization.
    #[inline]
    pub fn to_f64(self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Extract the underlying raw `i64` (hundredths).
    #[inline]
    pub const fn raw(self) -> i64 {
        self.0
    }

    #[inline]
    pub fn saturating_add(self, rhs: Points) -> Points {
        Points(self.0.saturating_add(rhs.0))
    }

    #[inline]
    pub fn saturating_sub(self, rhs: Points) -> Points {
        Points(self.0.saturating_sub(rhs.0))
    }

    #[inline]
    pub fn abs(self) -> Points {
        Points(self.0.saturating_abs())
    }

    #[inline]
    pub fn signum(self) -> i64 {
        self.0.signum()
    }

    #[inline]
    pub fn is_non_negative(self) -> bool {
        self.0 >= 0
    }

    #[inline]
    pub fn is_negative(self) -> bool {
        self.0 < 0
    }

    /// Clamp this value into `[lo, hi]`.
    #[inline]
    pub fn clamp(self, lo: Points, hi: Points) -> Points {
        if self.0 < lo.0 {
            lo
        } else if self.0 > hi.0 {
            hi
        } else {
            self
        }
    }

    /// Multiply a per-spread amount by an integer quantity (contracts ×
    /// 100 shares/contract happens in the caller; this is just amount × qty).
    ///
    /// Returns `None` on overflow; callers must handle it explicitly rather
    /// than silently wrapping a P/L total.
    #[inline]
    pub fn checked_mul_qty(self, qty: i64) -> Option<Points> {
        self.0.checked_mul(qty).map(Points)
    }
}

impl Add for Points {
    type Output = Points;
    #[inline]
    fn add(self, rhs: Points) -> Points {
        Points(self.0 + rhs.0)
    }
}

impl Sub for Points {
    type Output = Points;
    #[inline]
    fn sub(self, rhs: Points) -> Points {
        Points(self.0 - rhs.0)
    }
}

impl Neg for Points {
    type Output = Points;
    #[inline]
    fn neg(self) -> Points {
        Points(-self.0)
    }
}

impl AddAssign for Points {
    #[inline]
    fn add_assign(&mut self, rhs: Points) {
        self.0 += rhs.0;
    }
}

impl SubAssign for Points {
    #[inline]
    fn sub_assign(&mut self, rhs: Points) {
        self.0 -= rhs.0;
    }
}

impl std::fmt::Display for Points {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let whole = self.0 / 100;
        let frac = (self.0 % 100).abs();
        if self.0 < 0 && whole == 0 {
            write!(f, "-{whole}.{frac:02}")
        } else {
            write!(f, "{whole}.{frac:02}")
        }
    }
}

/// Round a raw index value to the nearest multiple of `step` (in points),
/// using the half-up convention `step * floor((x + step/2) / step)`.
///
/// This is the strike-rounding rule: `round_to_multiple(x, Points::new(500))`
/// reproduces `round_to_5` from the original strategy at 1e-2 scale (500
/// hundredths = 5.00 points).
pub fn round_to_multiple(x: Points, step: Points) -> Points {
    debug_assert!(step.raw() > 0, "round_to_multiple step must be positive");
    let half = step.raw() / 2;
    let shifted = x.raw() + half;
    let steps = shifted.div_euclid(step.raw());
    Points::new(steps * step.raw())
}
