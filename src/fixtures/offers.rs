//! Offer Fixtures

use rusty_money::Money;
use serde::Deserialize;

use crate::{
    fixtures::{FixtureError, products::parse_price},
    offers::{
        PricingRule, offer,
        types::{BulkSpecialPriceOffer, BuyAndGetFreeOffer},
    },
    products::Product,
};

/// Wrapper for offers in YAML
#[derive(Debug, Deserialize)]
pub struct OffersFixture {
    /// Offers in effect
    pub offers: Vec<OfferFixture>,
}

/// Offer fixture from YAML
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OfferFixture {
    /// Buy N get M free
    BuyAndGetFree {
        /// Product code
        product: String,

        /// Units paid per pack
        #[serde(default = "one")]
        buy: u32,

        /// Units free per pack
        #[serde(default = "one")]
        get_free: u32,
    },

    /// Special unit price at or above a quantity threshold
    BulkSpecialPrice {
        /// Product code
        product: String,

        /// Minimum quantity
        buy_or_more: u32,

        /// Special unit price (e.g., "4.50 GBP")
        at: String,
    },
}

fn one() -> u32 {
    1
}

impl OfferFixture {
    /// Code of the product the offer is bound to
    pub fn product_code(&self) -> &str {
        match self {
            OfferFixture::BuyAndGetFree { product, .. }
            | OfferFixture::BulkSpecialPrice { product, .. } => product,
        }
    }

    /// Build the pricing rule for `product`.
    ///
    /// # Errors
    ///
    /// Returns an error if the special price cannot be parsed or the offer is invalid.
    pub fn try_into_rule(
        self,
        product: &Product<'static>,
    ) -> Result<PricingRule<'static>, FixtureError> {
        match self {
            OfferFixture::BuyAndGetFree { buy, get_free, .. } => {
                Ok(offer(BuyAndGetFreeOffer::new(product, buy, get_free)?))
            }
            OfferFixture::BulkSpecialPrice {
                buy_or_more, at, ..
            } => {
                let (minor_units, currency) = parse_price(&at)?;
                let at = Money::from_minor(minor_units, currency);

                Ok(offer(BulkSpecialPriceOffer::new(product, buy_or_more, at)?))
            }
        }
    }
}
