//! Currency conversion and regional markup
//!
//! These functions never fail. A missing rate converts with a 1.0
//! multiplier and an invalid amount is treated as zero, so a storefront
//! always has something to display.

use tracing::debug;

use super::currency::CurrencyCode;
use super::rates::RateTable;

/// Default surcharge for buyers outside the merchant's home region.
pub const DEFAULT_MARKUP_FACTOR: f64 = 1.10;

/// Maps negative, NaN and infinite amounts to 0.
pub fn normalize_amount(amount: f64) -> f64 {
    if amount.is_finite() && amount >= 0.0 {
        amount
    } else {
        debug!(amount, "Invalid amount, using 0");
        0.0
    }
}

/// Converts `amount` from one currency to another through the table's base.
pub fn convert(amount: f64, from: &CurrencyCode, to: &CurrencyCode, rates: &RateTable) -> f64 {
    let amount = normalize_amount(amount);
    if from == to {
        return amount;
    }

    let from_rate = rates.rate_or_default(from);
    let to_rate = rates.rate_or_default(to);

    let base_amount = amount / from_rate;
    base_amount * to_rate
}

/// Applies `factor` to non-domestic buyers. A factor of 1.0 disables the markup.
pub fn apply_regional_markup(amount: f64, is_domestic: bool, factor: f64) -> f64 {
    let amount = normalize_amount(amount);
    if is_domestic {
        return amount;
    }
    if !factor.is_finite() || factor <= 0.0 {
        debug!(factor, "Invalid markup factor, skipping markup");
        return amount;
    }
    amount * factor
}
