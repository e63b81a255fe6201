//! Checkout
//!
//! Prices a shopping basket against a catalog of products and a set of quantity offers,
//! charging each product at the cheapest of its list price and every offer bound to it.
//!
//! ```
//! use checkout::prelude::*;
//! use rusty_money::{Money, iso::GBP};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut catalog = Catalog::new(GBP);
//! let tea = catalog.add("FR1", "Fruit tea", Money::from_minor(311, GBP))?;
//! let tea = catalog.get(tea).ok_or("missing product")?;
//!
//! let mut checkout = catalog.checkout(vec![offer(BuyAndGetFreeOffer::buy_one_get_one_free(tea))]);
//! checkout.scan(tea);
//! checkout.scan(tea);
//!
//! assert_eq!(checkout.total_price()?, Money::from_minor(311, GBP));
//! # Ok(())
//! # }
//! ```

pub mod catalog;
pub mod checkout;
pub mod config;
pub mod fixtures;
pub mod logging;
pub mod offers;
pub mod prelude;
pub mod pricing;
pub mod products;
pub mod receipt;
