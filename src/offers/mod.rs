//! Offers
//!
//! An offer binds to exactly one product and prices a purchased quantity of it. The checkout
//! compares every offer bound to a product with the plain unit price and charges the cheapest.

use std::{fmt, sync::Arc};

use rusty_money::{Money, iso::Currency};
use thiserror::Error;

use crate::{pricing::PricingError, products::ProductId};

pub mod types;

/// Errors raised while constructing an offer.
#[derive(Debug, Error, PartialEq)]
pub enum OfferError {
    /// A buy-and-get-free offer must charge for at least one unit per pack.
    #[error("Offer on {0} must require buying at least one unit")]
    ZeroBuy(String),

    /// A buy-and-get-free offer must give at least one unit away per pack.
    #[error("Offer on {0} must give away at least one unit")]
    ZeroGetFree(String),

    /// A bulk offer must start at one unit or more.
    #[error("Offer on {0} must have a threshold of at least one unit")]
    ZeroThreshold(String),

    /// A special price is below zero (product code, price).
    #[error("Offer on {0} has a negative special price: {1}")]
    NegativePrice(String, String),

    /// A special price is in a different currency (product code, offer currency, product currency).
    #[error("Offer on {0} is priced in {1}, but the product is priced in {2}")]
    CurrencyMismatch(String, &'static str, &'static str),
}

/// A pricing rule that overrides the unit price of one product based on quantity.
pub trait Offer<'a>: fmt::Debug + fmt::Display {
    /// The product this offer applies to.
    fn product(&self) -> ProductId;

    /// Price charged for `quantity` units of the product under this offer.
    ///
    /// Must be a pure function of `quantity`.
    ///
    /// # Errors
    ///
    /// Returns a [`PricingError`] if the price cannot be represented.
    fn price_for(&self, quantity: u64) -> Result<Money<'a, Currency>, PricingError>;
}

/// Offer object shared between checkouts.
pub type PricingRule<'a> = Arc<dyn Offer<'a> + 'a>;

/// Wrap any offer implementation into a shared pricing rule.
pub fn offer<'a, O>(offer: O) -> PricingRule<'a>
where
    O: Offer<'a> + 'a,
{
    Arc::new(offer)
}
