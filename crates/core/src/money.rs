//! Money
//!
//! Amounts are carried as unrounded [`Decimal`]s while lines are accumulated. They are only
//! rounded here, at display time, to the currency's minor-unit exponent.

use rust_decimal::{Decimal, RoundingStrategy, prelude::ToPrimitive};
use rusty_money::{Money, iso::Currency};

/// Round an amount to the currency's minor units for display.
#[must_use]
pub fn round_for_display(amount: Decimal, currency: &Currency) -> Decimal {
    amount.round_dp_with_strategy(currency.exponent, RoundingStrategy::MidpointAwayFromZero)
}

/// Convert an amount into whole minor units (pence/cents), rounding half away from zero.
///
/// Returns `None` if the amount does not fit in an `i64` once scaled.
#[must_use]
pub fn to_minor_units(amount: Decimal, currency: &Currency) -> Option<i64> {
    let scale = Decimal::from(10_i64.checked_pow(currency.exponent)?);

    round_for_display(amount, currency)
        .checked_mul(scale)?
        .to_i64()
}

/// Format an amount with the currency symbol, e.g. `$54.00`.
#[must_use]
pub fn format_money(amount: Decimal, currency: &'static Currency) -> String {
    match to_minor_units(amount, currency) {
        Some(minor) => Money::from_minor(minor, currency).to_string(),
        None => format!(
            "{} {}",
            round_for_display(amount, currency),
            currency.iso_alpha_code
        ),
    }
}
