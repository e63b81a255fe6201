//! Fixtures
//!
//! YAML fixture sets describing a catalog, the offers in effect and some named baskets. A set
//! named `supermarket` is read from `products/supermarket.yml`, `offers/supermarket.yml` and
//! `baskets/supermarket.yml` under the base path.

use std::{fs, path::PathBuf};

use rustc_hash::FxHashMap;
use rusty_money::Money;
use thiserror::Error;
use tracing::info;

use crate::{
    catalog::{Catalog, CatalogError},
    checkout::Checkout,
    fixtures::{
        baskets::BasketsFixture,
        offers::OffersFixture,
        products::{ProductsFixture, parse_price},
    },
    offers::{OfferError, PricingRule},
    products::{Product, ProductKey},
};

pub mod baskets;
pub mod offers;
pub mod products;

/// Fixture Parsing Errors
#[derive(Debug, Error)]
pub enum FixtureError {
    /// IO error reading fixture files
    #[error("Failed to read fixture file: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_norway::Error),

    /// Invalid price format
    #[error("Invalid price format: {0}")]
    InvalidPrice(String),

    /// Unknown currency code
    #[error("Unknown currency code: {0}")]
    UnknownCurrency(String),

    /// Product not found
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    /// The same product code appears twice in one fixture set
    #[error("Duplicate product code: {0}")]
    DuplicateProduct(String),

    /// Basket not found
    #[error("Basket not found: {0}")]
    BasketNotFound(String),

    /// No products loaded yet
    #[error("No products loaded yet; catalog currency unknown")]
    NoProducts,

    /// Product rejected by the catalog
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// Offer rejected on construction
    #[error(transparent)]
    Offer(#[from] OfferError),
}

/// Fixture
#[derive(Debug)]
pub struct Fixture {
    /// Base path for fixture files
    base_path: PathBuf,

    /// Catalog, created with the currency of the first product loaded
    catalog: Option<Catalog<'static>>,

    /// Product code -> catalog key
    product_keys: FxHashMap<String, ProductKey>,

    /// Pre-built offers
    offers: Vec<PricingRule<'static>>,

    /// Basket name -> product codes
    baskets: FxHashMap<String, Vec<String>>,
}

impl Fixture {
    /// Create a new empty fixture with default base path
    pub fn new() -> Self {
        Self::with_base_path("./fixtures")
    }

    /// Create a new empty fixture with custom base path
    pub fn with_base_path(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
            catalog: None,
            product_keys: FxHashMap::default(),
            offers: Vec::new(),
            baskets: FxHashMap::default(),
        }
    }

    /// Load products from a YAML fixture file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, a price is invalid, a code is
    /// repeated, or the catalog rejects a product.
    pub fn load_products(&mut self, name: &str) -> Result<&mut Self, FixtureError> {
        let file_path = self.base_path.join("products").join(format!("{name}.yml"));
        let contents = fs::read_to_string(&file_path)?;
        let fixture: ProductsFixture = serde_norway::from_str(&contents)?;

        for product_fixture in fixture.products {
            if self.product_keys.contains_key(&product_fixture.code) {
                return Err(FixtureError::DuplicateProduct(product_fixture.code));
            }

            let (minor_units, currency) = parse_price(&product_fixture.price)?;
            let catalog = self.catalog.get_or_insert_with(|| Catalog::new(currency));

            let key = catalog.add(
                product_fixture.code.clone(),
                product_fixture.name,
                Money::from_minor(minor_units, currency),
            )?;

            self.product_keys.insert(product_fixture.code, key);
        }

        info!(set = name, products = self.product_keys.len(), "loaded products");

        Ok(self)
    }

    /// Load offers from a YAML fixture file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, an offer refers to an unknown
    /// product, or an offer is invalid.
    pub fn load_offers(&mut self, name: &str) -> Result<&mut Self, FixtureError> {
        let file_path = self.base_path.join("offers").join(format!("{name}.yml"));
        let contents = fs::read_to_string(&file_path)?;
        let fixture: OffersFixture = serde_norway::from_str(&contents)?;

        for offer_fixture in fixture.offers {
            let product = self.product(offer_fixture.product_code())?;
            let rule = offer_fixture.try_into_rule(product)?;

            self.offers.push(rule);
        }

        info!(set = name, offers = self.offers.len(), "loaded offers");

        Ok(self)
    }

    /// Load named baskets from a YAML fixture file, if the set has one
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load_baskets(&mut self, name: &str) -> Result<&mut Self, FixtureError> {
        let file_path = self.base_path.join("baskets").join(format!("{name}.yml"));

        if !file_path.exists() {
            return Ok(self);
        }

        let contents = fs::read_to_string(&file_path)?;
        let fixture: BasketsFixture = serde_norway::from_str(&contents)?;

        for basket in fixture.baskets {
            self.baskets.insert(basket.name, basket.items);
        }

        info!(set = name, baskets = self.baskets.len(), "loaded baskets");

        Ok(self)
    }

    /// Load a complete fixture set from the default base path
    ///
    /// # Errors
    ///
    /// Returns an error if any of the fixture files cannot be loaded.
    pub fn from_set(name: &str) -> Result<Self, FixtureError> {
        Self::from_set_at("./fixtures", name)
    }

    /// Load a complete fixture set (products, offers and baskets with the same name)
    ///
    /// # Errors
    ///
    /// Returns an error if any of the fixture files cannot be loaded.
    pub fn from_set_at(base_path: impl Into<PathBuf>, name: &str) -> Result<Self, FixtureError> {
        let mut fixture = Self::with_base_path(base_path);

        fixture
            .load_products(name)?
            .load_offers(name)?
            .load_baskets(name)?;

        Ok(fixture)
    }

    /// Get the catalog
    ///
    /// # Errors
    ///
    /// Returns an error if no products have been loaded yet.
    pub fn catalog(&self) -> Result<&Catalog<'static>, FixtureError> {
        self.catalog.as_ref().ok_or(FixtureError::NoProducts)
    }

    /// Get a product by its code
    ///
    /// # Errors
    ///
    /// Returns an error if the product is not found.
    pub fn product(&self, code: &str) -> Result<&Product<'static>, FixtureError> {
        let key = self.product_key(code)?;

        self.catalog()?
            .get(key)
            .ok_or_else(|| FixtureError::ProductNotFound(code.to_string()))
    }

    /// Get a product key by its code
    ///
    /// # Errors
    ///
    /// Returns an error if the product is not found.
    pub fn product_key(&self, code: &str) -> Result<ProductKey, FixtureError> {
        self.product_keys
            .get(code)
            .copied()
            .ok_or_else(|| FixtureError::ProductNotFound(code.to_string()))
    }

    /// Get all offers
    pub fn offers(&self) -> &[PricingRule<'static>] {
        &self.offers
    }

    /// Names of the loaded baskets, sorted
    pub fn basket_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.baskets.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Resolve a named basket into products in scan order
    ///
    /// # Errors
    ///
    /// Returns an error if the basket or one of its products is not found.
    pub fn basket(&self, name: &str) -> Result<Vec<&Product<'static>>, FixtureError> {
        let codes = self
            .baskets
            .get(name)
            .ok_or_else(|| FixtureError::BasketNotFound(name.to_string()))?;

        self.products(codes)
    }

    /// Resolve product codes into products in scan order
    ///
    /// # Errors
    ///
    /// Returns an error if one of the products is not found.
    pub fn products<S: AsRef<str>>(
        &self,
        codes: &[S],
    ) -> Result<Vec<&Product<'static>>, FixtureError> {
        codes.iter().map(|code| self.product(code.as_ref())).collect()
    }

    /// Start a checkout over the fixture catalog, with or without the fixture offers
    ///
    /// # Errors
    ///
    /// Returns an error if no products have been loaded yet.
    pub fn checkout(&self, with_offers: bool) -> Result<Checkout<'static>, FixtureError> {
        let pricing_rules = if with_offers {
            self.offers.clone()
        } else {
            Vec::new()
        };

        Ok(self.catalog()?.checkout(pricing_rules))
    }
}

impl Default for Fixture {
    fn default() -> Self {
        Self::new()
    }
}
