//! Offer Types

mod bulk_special_price;
mod buy_and_get_free;

pub use bulk_special_price::BulkSpecialPriceOffer;
pub use buy_and_get_free::BuyAndGetFreeOffer;
