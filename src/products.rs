//! Products

use std::sync::atomic::{AtomicU64, Ordering};

use rusty_money::{Money, iso::Currency};
use slotmap::new_key_type;
use thiserror::Error;

new_key_type! {
    /// Product Key
    ///
    /// Slot of a catalog entry. Two products with the same code, name and price are still
    /// different products if they were added to the catalog separately.
    pub struct ProductKey;
}

static NEXT_CATALOG_ID: AtomicU64 = AtomicU64::new(1);

/// Identity of a catalog, unique within the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CatalogId(u64);

impl CatalogId {
    /// Allocate a fresh catalog identity.
    pub(crate) fn next() -> Self {
        CatalogId(NEXT_CATALOG_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// Product Identity
///
/// Slot keys are only unique within the catalog that issued them, so a product is identified by
/// both its catalog and its key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ProductId {
    catalog: CatalogId,
    key: ProductKey,
}

impl ProductId {
    pub(crate) fn new(catalog: CatalogId, key: ProductKey) -> Self {
        ProductId { catalog, key }
    }

    /// Catalog that issued the product
    pub fn catalog(&self) -> CatalogId {
        self.catalog
    }

    /// Key within the issuing catalog
    pub fn key(&self) -> ProductKey {
        self.key
    }
}

/// Errors raised while constructing a product.
#[derive(Debug, Error, PartialEq)]
pub enum ProductError {
    /// The unit price is below zero (product code, price).
    #[error("Product {0} has a negative price: {1}")]
    NegativePrice(String, String),
}

/// Product
#[derive(Debug, Clone)]
pub struct Product<'a> {
    id: ProductId,
    code: String,
    name: String,
    price: Money<'a, Currency>,
}

impl<'a> Product<'a> {
    /// Create a product under an already allocated identity.
    ///
    /// # Errors
    ///
    /// Returns [`ProductError::NegativePrice`] if `price` is below zero.
    pub(crate) fn new(
        id: ProductId,
        code: impl Into<String>,
        name: impl Into<String>,
        price: Money<'a, Currency>,
    ) -> Result<Self, ProductError> {
        let code = code.into();

        if price.to_minor_units() < 0 {
            return Err(ProductError::NegativePrice(code, price.to_string()));
        }

        Ok(Product {
            id,
            code,
            name: name.into(),
            price,
        })
    }

    /// Identity of the product across catalogs
    pub fn id(&self) -> ProductId {
        self.id
    }

    /// Key within the issuing catalog
    pub fn key(&self) -> ProductKey {
        self.id.key
    }

    /// Product code, e.g. `FR1`
    pub fn code(&self) -> &str {
        &self.code
    }

    /// Display name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Unit price
    pub fn price(&self) -> Money<'a, Currency> {
        self.price
    }
}
