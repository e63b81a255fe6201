//! Checkout CLI
//!
//! Loads a fixture set, scans a basket and prints the receipt.
//!
//! Use `-f` to load a fixture set by name
//! Use `-b` to pick a named basket from the set, or `-i` to list product codes directly
//! Use `--no-offers` to price the basket at list prices

use std::io;

use anyhow::{Result, bail};
use tracing::info;

use checkout::{config::CheckoutConfig, fixtures::Fixture, logging};

fn main() -> Result<()> {
    let config = CheckoutConfig::load()?;

    logging::init_subscriber(&config.logging)?;

    let fixture = Fixture::from_set_at(&config.fixtures_path, &config.fixture)?;

    let products = if config.items.is_empty() {
        let Some(basket) = config.basket.as_deref() else {
            bail!(
                "nothing to scan; pass --items or one of --basket {}",
                fixture.basket_names().join(", ")
            );
        };

        fixture.basket(basket)?
    } else {
        fixture.products(&config.items)?
    };

    let mut checkout = fixture.checkout(!config.no_offers)?;
    checkout.scan_all(products);

    let receipt = checkout.receipt()?;

    info!(total = %receipt.total(), items = checkout.item_count(), "priced basket");

    receipt.write_to(io::stdout().lock())?;

    Ok(())
}
