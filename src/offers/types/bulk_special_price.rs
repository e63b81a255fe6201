//! Bulk Special Price
//!
//! Buying at least a threshold quantity reprices every unit of the purchase.

use std::fmt;

use rusty_money::{Money, iso::Currency};

use crate::{
    offers::{Offer, OfferError},
    pricing::{PricingError, charge},
    products::{Product, ProductId},
};

/// Bulk special price offer on one product.
#[derive(Debug, Clone, Copy)]
pub struct BulkSpecialPriceOffer<'a> {
    product: ProductId,
    unit_price: Money<'a, Currency>,
    buy_or_more: u32,
    at: Money<'a, Currency>,
}

impl<'a> BulkSpecialPriceOffer<'a> {
    /// Create a new bulk offer: `buy_or_more` units or more are all charged `at` each.
    ///
    /// # Errors
    ///
    /// - [`OfferError::ZeroThreshold`]: `buy_or_more` is zero.
    /// - [`OfferError::NegativePrice`]: `at` is below zero.
    /// - [`OfferError::CurrencyMismatch`]: `at` is not in the product currency.
    pub fn new(
        product: &Product<'a>,
        buy_or_more: u32,
        at: Money<'a, Currency>,
    ) -> Result<Self, OfferError> {
        if buy_or_more == 0 {
            return Err(OfferError::ZeroThreshold(product.code().to_string()));
        }

        if at.currency() != product.price().currency() {
            return Err(OfferError::CurrencyMismatch(
                product.code().to_string(),
                at.currency().iso_alpha_code,
                product.price().currency().iso_alpha_code,
            ));
        }

        if at.to_minor_units() < 0 {
            return Err(OfferError::NegativePrice(
                product.code().to_string(),
                at.to_string(),
            ));
        }

        Ok(Self {
            product: product.id(),
            unit_price: product.price(),
            buy_or_more,
            at,
        })
    }

    /// Minimum quantity for the special price
    pub fn buy_or_more(&self) -> u32 {
        self.buy_or_more
    }

    /// Special unit price
    pub fn at(&self) -> Money<'a, Currency> {
        self.at
    }
}

impl<'a> Offer<'a> for BulkSpecialPriceOffer<'a> {
    fn product(&self) -> ProductId {
        self.product
    }

    fn price_for(&self, quantity: u64) -> Result<Money<'a, Currency>, PricingError> {
        let unit_price = if quantity >= u64::from(self.buy_or_more) {
            self.at
        } else {
            self.unit_price
        };

        charge(unit_price, quantity)
    }
}

impl fmt::Display for BulkSpecialPriceOffer<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} or more at {} each", self.buy_or_more, self.at)
    }
}
