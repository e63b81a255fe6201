//! Pricing
//!
//! Exact money arithmetic in minor units shared by offers and the checkout.

use rusty_money::{Money, MoneyError, iso::Currency};
use thiserror::Error;

/// Errors that can occur while pricing quantities of a product.
#[derive(Debug, Error, PartialEq)]
pub enum PricingError {
    /// Multiplying a unit price by a quantity left the `i64` minor unit range.
    #[error("{units} units at {unit_price} overflows the representable amount")]
    Overflow {
        /// Number of units being charged
        units: u64,
        /// Unit price being charged
        unit_price: String,
    },

    /// Wrapped money arithmetic or currency mismatch error.
    #[error(transparent)]
    Money(#[from] MoneyError),
}

/// Charge `units` units at `unit_price`.
///
/// # Errors
///
/// Returns [`PricingError::Overflow`] if the result does not fit in minor units.
pub fn charge<'a>(
    unit_price: Money<'a, Currency>,
    units: u64,
) -> Result<Money<'a, Currency>, PricingError> {
    let minor = i64::try_from(units)
        .ok()
        .and_then(|units| unit_price.to_minor_units().checked_mul(units))
        .ok_or_else(|| PricingError::Overflow {
            units,
            unit_price: unit_price.to_string(),
        })?;

    Ok(Money::from_minor(minor, unit_price.currency()))
}

/// Sum a sequence of prices, starting from zero in `currency`.
///
/// # Errors
///
/// Returns [`PricingError::Money`] if any price is in a different currency.
pub fn total_price<'a>(
    prices: impl IntoIterator<Item = Money<'a, Currency>>,
    currency: &'a Currency,
) -> Result<Money<'a, Currency>, PricingError> {
    let total = prices
        .into_iter()
        .try_fold(Money::from_minor(0, currency), |acc, price| acc.add(price))?;

    Ok(total)
}

/// Whether `candidate` is strictly cheaper than `current`.
pub(crate) fn is_cheaper(candidate: &Money<'_, Currency>, current: &Money<'_, Currency>) -> bool {
    candidate.to_minor_units() < current.to_minor_units()
}
