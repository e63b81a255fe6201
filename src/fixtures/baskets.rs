//! Basket Fixtures

use serde::Deserialize;

/// Wrapper for named baskets in YAML
#[derive(Debug, Deserialize)]
pub struct BasketsFixture {
    /// Named baskets
    pub baskets: Vec<BasketFixture>,
}

/// A named list of product codes in scan order
#[derive(Debug, Deserialize)]
pub struct BasketFixture {
    /// Basket name
    pub name: String,

    /// Product codes, one per scan
    #[serde(default)]
    pub items: Vec<String>,
}
