//! Checkout prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    catalog::{Catalog, CatalogError},
    checkout::{BasketLine, Checkout, CheckoutError},
    offers::{
        Offer, OfferError, PricingRule, offer,
        types::{BulkSpecialPriceOffer, BuyAndGetFreeOffer},
    },
    pricing::PricingError,
    products::{CatalogId, Product, ProductError, ProductId, ProductKey},
    receipt::{Receipt, ReceiptError, ReceiptLine},
};
