//! Minor-unit money arithmetic.
//!
//! All monetary values in Bramble are `i64` amounts in the smallest currency
//! unit (e.g., cents for USD). Promotion arguments, however, arrive as decimal
//! strings in major units ("10" means 10.00), so conversion helpers live here.

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

/// Convert a major-unit decimal amount to minor units.
///
/// `10` becomes `1000`, `10.5` becomes `1050`. Fractional minor units are
/// truncated toward zero. Returns `None` when the scaled amount does not fit
/// in an `i64`.
#[must_use]
pub fn to_minor_units(amount: Decimal) -> Option<i64> {
    (amount * Decimal::ONE_HUNDRED).trunc().to_i64()
}

/// `floor(base * pct / 100)` over minor units.
///
/// `pct` is a percentage in major units (`20` means 20%). Returns `None` when
/// the result does not fit in an `i64`.
#[must_use]
pub fn floor_percentage(base: i64, pct: Decimal) -> Option<i64> {
    (Decimal::from(base) * pct / Decimal::ONE_HUNDRED)
        .floor()
        .to_i64()
}
