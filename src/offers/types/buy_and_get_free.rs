//! Buy and Get Free
//!
//! "Buy N get M free" offers. Units are grouped into packs of `buy + get_free`; each full
//! pack is charged as a single unit and the remainder is charged at the unit price.

use std::fmt;

use rusty_money::{Money, iso::Currency};

use crate::{
    offers::{Offer, OfferError},
    pricing::{PricingError, charge},
    products::{Product, ProductId},
};

/// Buy-and-get-free offer on one product.
#[derive(Debug, Clone, Copy)]
pub struct BuyAndGetFreeOffer<'a> {
    product: ProductId,
    unit_price: Money<'a, Currency>,
    buy: u32,
    get_free: u32,
}

impl<'a> BuyAndGetFreeOffer<'a> {
    /// Create a new buy-and-get-free offer for `product`.
    ///
    /// # Errors
    ///
    /// - [`OfferError::ZeroBuy`]: `buy` is zero.
    /// - [`OfferError::ZeroGetFree`]: `get_free` is zero.
    pub fn new(product: &Product<'a>, buy: u32, get_free: u32) -> Result<Self, OfferError> {
        if buy == 0 {
            return Err(OfferError::ZeroBuy(product.code().to_string()));
        }

        if get_free == 0 {
            return Err(OfferError::ZeroGetFree(product.code().to_string()));
        }

        Ok(Self {
            product: product.id(),
            unit_price: product.price(),
            buy,
            get_free,
        })
    }

    /// Buy one, get one free.
    pub fn buy_one_get_one_free(product: &Product<'a>) -> Self {
        Self {
            product: product.id(),
            unit_price: product.price(),
            buy: 1,
            get_free: 1,
        }
    }

    /// Units paid for per pack
    pub fn buy(&self) -> u32 {
        self.buy
    }

    /// Units given away per pack
    pub fn get_free(&self) -> u32 {
        self.get_free
    }

    fn charged_units(&self, quantity: u64) -> u64 {
        let pack = u64::from(self.buy) + u64::from(self.get_free);

        // NOTE: one unit per full pack, whatever `buy` is.
        quantity / pack + quantity % pack
    }
}

impl<'a> Offer<'a> for BuyAndGetFreeOffer<'a> {
    fn product(&self) -> ProductId {
        self.product
    }

    fn price_for(&self, quantity: u64) -> Result<Money<'a, Currency>, PricingError> {
        charge(self.unit_price, self.charged_units(quantity))
    }
}

impl fmt::Display for BuyAndGetFreeOffer<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Buy {} get {} free", self.buy, self.get_free)
    }
}
