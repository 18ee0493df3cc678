//! Money and rounding helpers shared by every calculator.
//!
//! Intermediate figures are carried at full `Decimal` precision. Each
//! calculator calls [`round_currency`] once per published field, at the end
//! of its computation, so chained percentage allocations never accumulate
//! rounding drift.

use rust_decimal::{Decimal, RoundingStrategy};

/// One hundred, the denominator for whole-number percentages.
pub const HUNDRED: Decimal = Decimal::ONE_HUNDRED;

/// Allocates `percent` (a whole-number percentage, e.g. `10` for 10%) of
/// `amount`. The result is not rounded.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use taxprep_core::calculations::common::allocate;
///
/// assert_eq!(allocate(dec!(12000.00), dec!(10)), dec!(1200.0000));
/// assert_eq!(allocate(dec!(100.00), dec!(33.333)), dec!(33.33300));
/// ```
pub fn allocate(
    amount: Decimal,
    percent: Decimal,
) -> Decimal {
    amount * (percent / HUNDRED)
}

/// Rounds a monetary value to exactly two decimal places, half-up.
///
/// Values at exactly 0.005 are rounded away from zero.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use taxprep_core::calculations::common::round_currency;
///
/// assert_eq!(round_currency(dec!(123.454)), dec!(123.45));
/// assert_eq!(round_currency(dec!(123.455)), dec!(123.46));
/// assert_eq!(round_currency(dec!(-123.455)), dec!(-123.46));
/// ```
pub fn round_currency(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Returns `value`, or zero if it is negative.
pub fn non_negative(value: Decimal) -> Decimal {
    value.max(Decimal::ZERO)
}
