//! Catalog

use rusty_money::{Money, iso::Currency};
use slotmap::SlotMap;
use thiserror::Error;

use crate::{
    checkout::Checkout,
    offers::PricingRule,
    products::{CatalogId, Product, ProductError, ProductId, ProductKey},
};

/// Errors related to catalog construction.
#[derive(Debug, Error, PartialEq)]
pub enum CatalogError {
    /// The product itself is invalid.
    #[error(transparent)]
    Product(#[from] ProductError),

    /// A product is priced in a different currency
    /// (product code, product currency, catalog currency).
    #[error("Product {0} has currency {1}, but catalog has currency {2}")]
    CurrencyMismatch(String, &'static str, &'static str),
}

/// Catalog of products available for scanning.
///
/// The catalog allocates each product's [`ProductKey`]. Keys are only meaningful within the
/// catalog that issued them; [`ProductId`] pairs them with the catalog identity.
#[derive(Debug)]
pub struct Catalog<'a> {
    id: CatalogId,
    products: SlotMap<ProductKey, Product<'a>>,
    currency: &'a Currency,
}

impl<'a> Catalog<'a> {
    /// Create an empty catalog priced in `currency`.
    pub fn new(currency: &'a Currency) -> Self {
        Catalog {
            id: CatalogId::next(),
            products: SlotMap::with_key(),
            currency,
        }
    }

    /// Add a product to the catalog and return its key.
    ///
    /// Codes are not required to be unique; every call creates a distinct product.
    ///
    /// # Errors
    ///
    /// - [`CatalogError::CurrencyMismatch`]: the price is not in the catalog currency.
    /// - [`CatalogError::Product`]: the product is invalid, e.g. it has a negative price.
    pub fn add(
        &mut self,
        code: impl Into<String>,
        name: impl Into<String>,
        price: Money<'a, Currency>,
    ) -> Result<ProductKey, CatalogError> {
        let code = code.into();

        if price.currency() != self.currency {
            return Err(CatalogError::CurrencyMismatch(
                code,
                price.currency().iso_alpha_code,
                self.currency.iso_alpha_code,
            ));
        }

        let catalog = self.id;

        let key = self.products.try_insert_with_key(|key| {
            Product::new(ProductId::new(catalog, key), code, name, price)
        })?;

        Ok(key)
    }

    /// Identity of this catalog.
    pub fn id(&self) -> CatalogId {
        self.id
    }

    /// Get a product by key.
    pub fn get(&self, key: ProductKey) -> Option<&Product<'a>> {
        self.products.get(key)
    }

    /// Find the first product added with the given code.
    pub fn find_by_code(&self, code: &str) -> Option<&Product<'a>> {
        self.iter().find(|product| product.code() == code)
    }

    /// Iterate over the products in the order they were added.
    pub fn iter(&self) -> impl Iterator<Item = &Product<'a>> {
        self.products.values()
    }

    /// Number of products in the catalog.
    pub fn len(&self) -> usize {
        self.products.len()
    }

    /// Check if the catalog is empty.
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// Get the currency of the catalog.
    pub fn currency(&self) -> &'a Currency {
        self.currency
    }

    /// Start a checkout priced in the catalog currency.
    pub fn checkout(&self, pricing_rules: impl Into<Vec<PricingRule<'a>>>) -> Checkout<'a> {
        Checkout::new(pricing_rules, self.currency)
    }
}
