//! Checkout

use rustc_hash::FxHashMap;
use rusty_money::{Money, iso::Currency};
use smallvec::SmallVec;
use thiserror::Error;
use tracing::{debug, trace};

use crate::{
    offers::PricingRule,
    pricing::{PricingError, charge, is_cheaper, total_price},
    products::{Product, ProductId},
    receipt::{Receipt, ReceiptLine},
};

/// Errors that can occur while pricing a checkout.
#[derive(Debug, Error, PartialEq)]
pub enum CheckoutError {
    /// A basket line or offer could not be priced.
    #[error(transparent)]
    Pricing(#[from] PricingError),
}

/// Scanned quantity of one product.
#[derive(Debug, Clone)]
pub struct BasketLine<'a> {
    product: ProductId,
    code: String,
    name: String,
    unit_price: Money<'a, Currency>,
    quantity: u64,
}

impl<'a> BasketLine<'a> {
    /// Identity of the scanned product
    pub fn product(&self) -> ProductId {
        self.product
    }

    /// Code of the scanned product
    pub fn code(&self) -> &str {
        &self.code
    }

    /// Name of the scanned product
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Unit price of the product when it was scanned
    pub fn unit_price(&self) -> Money<'a, Currency> {
        self.unit_price
    }

    /// Number of times the product was scanned
    pub fn quantity(&self) -> u64 {
        self.quantity
    }
}

/// Best price found for a basket line.
#[derive(Debug)]
struct Deal<'a, 'r> {
    full_price: Money<'a, Currency>,
    charged: Money<'a, Currency>,
    offer: Option<&'r PricingRule<'a>>,
}

/// A single basket session priced against a fixed set of offers.
///
/// Products from any catalog may be scanned; lines are kept per product identity, in the order
/// each product was first scanned.
#[derive(Debug)]
pub struct Checkout<'a> {
    pricing_rules: Vec<PricingRule<'a>>,
    basket: SmallVec<[BasketLine<'a>; 10]>,
    lines_by_product: FxHashMap<ProductId, usize>,
    currency: &'a Currency,
}

impl<'a> Checkout<'a> {
    /// Create an empty checkout with the offers in effect for this session.
    pub fn new(pricing_rules: impl Into<Vec<PricingRule<'a>>>, currency: &'a Currency) -> Self {
        Checkout {
            pricing_rules: pricing_rules.into(),
            basket: SmallVec::new(),
            lines_by_product: FxHashMap::default(),
            currency,
        }
    }

    /// Scan one unit of `product`.
    pub fn scan(&mut self, product: &Product<'a>) {
        let existing = self
            .lines_by_product
            .get(&product.id())
            .and_then(|&idx| self.basket.get_mut(idx));

        let quantity = if let Some(line) = existing {
            line.quantity += 1;
            line.quantity
        } else {
            self.lines_by_product.insert(product.id(), self.basket.len());
            self.basket.push(BasketLine {
                product: product.id(),
                code: product.code().to_string(),
                name: product.name().to_string(),
                unit_price: product.price(),
                quantity: 1,
            });
            1
        };

        debug!(code = product.code(), quantity, "scanned");
    }

    /// Scan each product in order.
    pub fn scan_all<'p>(&mut self, products: impl IntoIterator<Item = &'p Product<'a>>)
    where
        'a: 'p,
    {
        for product in products {
            self.scan(product);
        }
    }

    /// Total price of the basket, charging the cheapest deal for every product.
    ///
    /// # Errors
    ///
    /// Returns a [`CheckoutError`] if a line cannot be priced or the basket mixes currencies.
    pub fn total_price(&self) -> Result<Money<'a, Currency>, CheckoutError> {
        let charged = self
            .basket
            .iter()
            .map(|line| self.best_deal(line).map(|deal| deal.charged))
            .collect::<Result<SmallVec<[Money<'a, Currency>; 10]>, _>>()?;

        Ok(total_price(charged, self.currency)?)
    }

    /// Build a receipt breaking the total down per product.
    ///
    /// # Errors
    ///
    /// Returns a [`CheckoutError`] if a line cannot be priced or the basket mixes currencies.
    pub fn receipt(&self) -> Result<Receipt<'a>, CheckoutError> {
        let mut lines: SmallVec<[ReceiptLine<'a>; 10]> = SmallVec::new();

        for line in &self.basket {
            let deal = self.best_deal(line)?;

            lines.push(ReceiptLine {
                product: line.product,
                code: line.code.clone(),
                name: line.name.clone(),
                quantity: line.quantity,
                unit_price: line.unit_price,
                full_price: deal.full_price,
                charged: deal.charged,
                offer: deal.offer.map(ToString::to_string),
            });
        }

        let subtotal = total_price(lines.iter().map(|line| line.full_price), self.currency)?;
        let total = total_price(lines.iter().map(|line| line.charged), self.currency)?;

        Ok(Receipt::new(lines, subtotal, total, self.currency))
    }

    /// Scanned quantity of `product`, zero if it was never scanned.
    pub fn quantity(&self, product: &Product<'_>) -> u64 {
        self.line(product).map_or(0, BasketLine::quantity)
    }

    /// Basket line for `product`, if it was scanned.
    pub fn line(&self, product: &Product<'_>) -> Option<&BasketLine<'a>> {
        self.lines_by_product
            .get(&product.id())
            .and_then(|&idx| self.basket.get(idx))
    }

    /// Iterate over the basket lines in first-scan order.
    pub fn lines(&self) -> impl Iterator<Item = &BasketLine<'a>> {
        self.basket.iter()
    }

    /// Number of distinct products scanned.
    pub fn len(&self) -> usize {
        self.basket.len()
    }

    /// Total number of units scanned.
    pub fn item_count(&self) -> u64 {
        self.basket.iter().map(BasketLine::quantity).sum()
    }

    /// Check if nothing has been scanned.
    pub fn is_empty(&self) -> bool {
        self.basket.is_empty()
    }

    /// Offers in effect for this checkout.
    pub fn pricing_rules(&self) -> &[PricingRule<'a>] {
        &self.pricing_rules
    }

    /// Get the currency of the checkout.
    pub fn currency(&self) -> &'a Currency {
        self.currency
    }

    fn best_deal(&self, line: &BasketLine<'a>) -> Result<Deal<'a, '_>, PricingError> {
        let full_price = charge(line.unit_price, line.quantity)?;

        let mut deal = Deal {
            full_price,
            charged: full_price,
            offer: None,
        };

        for rule in self
            .pricing_rules
            .iter()
            .filter(|rule| rule.product() == line.product)
        {
            let price = rule.price_for(line.quantity)?;

            trace!(offer = %rule, %price, "offer candidate");

            if is_cheaper(&price, &deal.charged) {
                deal.charged = price;
                deal.offer = Some(rule);
            }
        }

        debug!(
            code = line.code.as_str(),
            quantity = line.quantity,
            charged = %deal.charged,
            offer = ?deal.offer.map(ToString::to_string),
            "best deal"
        );

        Ok(deal)
    }
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::GBP;
    use testresult::TestResult;

    use crate::{
        catalog::Catalog,
        offers::{
            offer,
            types::{BulkSpecialPriceOffer, BuyAndGetFreeOffer},
        },
        products::ProductKey,
    };

    use super::*;

    fn test_catalog() -> TestResult<(Catalog<'static>, [ProductKey; 3])> {
        let mut catalog = Catalog::new(GBP);

        let tea = catalog.add("FR1", "Fruit tea", Money::from_minor(311, GBP))?;
        let strawberries = catalog.add("SR1", "Strawberries", Money::from_minor(500, GBP))?;
        let coffee = catalog.add("CF1", "Coffee", Money::from_minor(1123, GBP))?;

        Ok((catalog, [tea, strawberries, coffee]))
    }

    #[test]
    fn new_checkout_is_empty() -> TestResult {
        let checkout = Checkout::new([], GBP);

        assert!(checkout.is_empty());
        assert_eq!(checkout.len(), 0);
        assert_eq!(checkout.item_count(), 0);
        assert_eq!(checkout.total_price()?, Money::from_minor(0, GBP));

        Ok(())
    }

    #[test]
    fn scan_accumulates_quantities() -> TestResult {
        let (catalog, [tea, strawberries, coffee]) = test_catalog()?;
        let tea = catalog.get(tea).ok_or("missing product")?;
        let strawberries = catalog.get(strawberries).ok_or("missing product")?;
        let coffee = catalog.get(coffee).ok_or("missing product")?;

        let mut checkout = catalog.checkout([]);
        checkout.scan_all([tea, strawberries, tea]);

        assert_eq!(checkout.quantity(tea), 2);
        assert_eq!(checkout.quantity(strawberries), 1);
        assert_eq!(checkout.quantity(coffee), 0);
        assert_eq!(checkout.len(), 2);
        assert_eq!(checkout.item_count(), 3);

        Ok(())
    }

    #[test]
    fn identical_products_are_separate_lines() -> TestResult {
        let mut catalog = Catalog::new(GBP);
        let first = catalog.add("FR1", "Fruit tea", Money::from_minor(311, GBP))?;
        let second = catalog.add("FR1", "Fruit tea", Money::from_minor(311, GBP))?;
        let first = catalog.get(first).ok_or("missing product")?;
        let second = catalog.get(second).ok_or("missing product")?;

        // The offer is bound to the first entry only.
        let rules = vec![offer(BuyAndGetFreeOffer::buy_one_get_one_free(first))];

        let mut checkout = catalog.checkout(rules);
        checkout.scan_all([first, second, first, second]);

        assert_eq!(checkout.len(), 2);
        assert_eq!(checkout.quantity(first), 2);
        assert_eq!(checkout.quantity(second), 2);
        assert_eq!(checkout.total_price()?, Money::from_minor(311 + 622, GBP));

        Ok(())
    }

    #[test]
    fn cheapest_of_several_offers_wins() -> TestResult {
        let (catalog, [_, strawberries, _]) = test_catalog()?;
        let strawberries = catalog.get(strawberries).ok_or("missing product")?;

        let rules = vec![
            offer(BulkSpecialPriceOffer::new(
                strawberries,
                3,
                Money::from_minor(450, GBP),
            )?),
            offer(BuyAndGetFreeOffer::buy_one_get_one_free(strawberries)),
            offer(BulkSpecialPriceOffer::new(
                strawberries,
                2,
                Money::from_minor(480, GBP),
            )?),
        ];

        let mut checkout = catalog.checkout(rules);
        checkout.scan_all([strawberries; 4]);

        // bulk@3: 1800, bogof: 1000, bulk@2: 1920
        assert_eq!(checkout.total_price()?, Money::from_minor(1000, GBP));

        Ok(())
    }

    #[test]
    fn baseline_wins_when_offers_are_dearer() -> TestResult {
        let (catalog, [tea, _, _]) = test_catalog()?;
        let tea = catalog.get(tea).ok_or("missing product")?;

        // A "special" price above list price must never be charged.
        let rules = vec![offer(BulkSpecialPriceOffer::new(
            tea,
            1,
            Money::from_minor(400, GBP),
        )?)];

        let mut checkout = catalog.checkout(rules);
        checkout.scan(tea);

        assert_eq!(checkout.total_price()?, Money::from_minor(311, GBP));

        Ok(())
    }

    #[test]
    fn offers_for_unscanned_products_are_ignored() -> TestResult {
        let (catalog, [tea, _, coffee]) = test_catalog()?;
        let tea = catalog.get(tea).ok_or("missing product")?;
        let coffee = catalog.get(coffee).ok_or("missing product")?;

        let rules = vec![offer(BuyAndGetFreeOffer::buy_one_get_one_free(tea))];

        let mut checkout = catalog.checkout(rules);
        checkout.scan(coffee);

        assert_eq!(checkout.total_price()?, Money::from_minor(1123, GBP));

        Ok(())
    }

    #[test]
    fn total_price_can_be_read_repeatedly() -> TestResult {
        let (catalog, [tea, _, _]) = test_catalog()?;
        let tea = catalog.get(tea).ok_or("missing product")?;

        let rules = vec![offer(BuyAndGetFreeOffer::buy_one_get_one_free(tea))];

        let mut checkout = catalog.checkout(rules);
        checkout.scan(tea);

        assert_eq!(checkout.total_price()?, Money::from_minor(311, GBP));
        assert_eq!(checkout.total_price()?, Money::from_minor(311, GBP));

        checkout.scan(tea);
        assert_eq!(checkout.total_price()?, Money::from_minor(311, GBP));

        checkout.scan(tea);
        assert_eq!(checkout.total_price()?, Money::from_minor(622, GBP));

        Ok(())
    }

    #[test]
    fn receipt_breaks_down_lines() -> TestResult {
        let (catalog, [tea, strawberries, coffee]) = test_catalog()?;
        let tea = catalog.get(tea).ok_or("missing product")?;
        let strawberries = catalog.get(strawberries).ok_or("missing product")?;
        let coffee = catalog.get(coffee).ok_or("missing product")?;

        let rules = vec![
            offer(BuyAndGetFreeOffer::buy_one_get_one_free(tea)),
            offer(BulkSpecialPriceOffer::new(
                strawberries,
                3,
                Money::from_minor(450, GBP),
            )?),
        ];

        let mut checkout = catalog.checkout(rules);
        checkout.scan_all([tea, strawberries, tea, coffee]);

        let receipt = checkout.receipt()?;

        assert_eq!(receipt.subtotal(), Money::from_minor(2245, GBP));
        assert_eq!(receipt.total(), Money::from_minor(1934, GBP));
        assert_eq!(receipt.total(), checkout.total_price()?);
        assert_eq!(receipt.lines().len(), 3);

        let tea_line = receipt
            .lines()
            .iter()
            .find(|line| line.product == tea.id())
            .ok_or("missing tea line")?;

        assert_eq!(tea_line.quantity, 2);
        assert_eq!(tea_line.charged, Money::from_minor(311, GBP));
        assert_eq!(tea_line.offer.as_deref(), Some("Buy 1 get 1 free"));

        let strawberry_line = receipt
            .lines()
            .iter()
            .find(|line| line.product == strawberries.id())
            .ok_or("missing strawberry line")?;

        assert_eq!(strawberry_line.offer, None);
        assert_eq!(strawberry_line.charged, strawberry_line.full_price);

        Ok(())
    }

    #[test]
    fn lines_expose_scanned_state() -> TestResult {
        let (catalog, [tea, _, coffee]) = test_catalog()?;
        let tea = catalog.get(tea).ok_or("missing product")?;
        let coffee = catalog.get(coffee).ok_or("missing product")?;

        let mut checkout = catalog.checkout([]);
        checkout.scan_all([coffee, tea, coffee]);

        let lines: Vec<(ProductId, u64, &str, &str)> = checkout
            .lines()
            .map(|line| (line.product(), line.quantity(), line.code(), line.name()))
            .collect();

        assert_eq!(
            lines,
            vec![
                (coffee.id(), 2, "CF1", "Coffee"),
                (tea.id(), 1, "FR1", "Fruit tea"),
            ]
        );
        assert_eq!(
            checkout.line(coffee).map(BasketLine::unit_price),
            Some(Money::from_minor(1123, GBP))
        );

        Ok(())
    }

    #[test]
    fn products_from_different_catalogs_are_separate_lines() -> TestResult {
        let mut shop = Catalog::new(GBP);
        let mut cafe = Catalog::new(GBP);

        let tea = shop.add("FR1", "Fruit tea", Money::from_minor(311, GBP))?;
        let coffee = cafe.add("CF1", "Coffee", Money::from_minor(1123, GBP))?;

        let tea = shop.get(tea).ok_or("missing product")?;
        let coffee = cafe.get(coffee).ok_or("missing product")?;

        // Both catalogs hand out the same first slot key.
        assert_eq!(tea.key(), coffee.key());

        let rules = vec![offer(BuyAndGetFreeOffer::buy_one_get_one_free(tea))];

        let mut checkout = Checkout::new(rules, GBP);
        checkout.scan_all([tea, coffee]);

        assert_eq!(checkout.len(), 2);
        assert_eq!(checkout.quantity(tea), 1);
        assert_eq!(checkout.quantity(coffee), 1);
        assert_eq!(checkout.line(coffee).map(BasketLine::code), Some("CF1"));
        assert_eq!(checkout.total_price()?, Money::from_minor(311 + 1123, GBP));

        Ok(())
    }

    #[test]
    fn offers_only_price_their_own_catalog_product() -> TestResult {
        let mut shop = Catalog::new(GBP);
        let mut cafe = Catalog::new(GBP);

        let tea = shop.add("FR1", "Fruit tea", Money::from_minor(311, GBP))?;
        let coffee = cafe.add("CF1", "Coffee", Money::from_minor(1123, GBP))?;

        let tea = shop.get(tea).ok_or("missing product")?;
        let coffee = cafe.get(coffee).ok_or("missing product")?;

        let rules = vec![offer(BulkSpecialPriceOffer::new(
            tea,
            1,
            Money::from_minor(100, GBP),
        )?)];

        let mut checkout = Checkout::new(rules, GBP);
        checkout.scan_all([coffee, coffee]);

        assert_eq!(checkout.total_price()?, Money::from_minor(2246, GBP));

        Ok(())
    }

    #[test]
    fn quantity_keeps_counting_past_u32() -> TestResult {
        let (catalog, [tea, _, _]) = test_catalog()?;
        let tea = catalog.get(tea).ok_or("missing product")?;

        let mut checkout = catalog.checkout([]);
        checkout.scan(tea);

        let line = checkout.basket.first_mut().ok_or("missing line")?;
        line.quantity = u64::from(u32::MAX);

        checkout.scan(tea);

        assert_eq!(checkout.quantity(tea), u64::from(u32::MAX) + 1);
        assert_eq!(checkout.item_count(), u64::from(u32::MAX) + 1);

        Ok(())
    }

    #[test]
    fn unrepresentable_totals_are_reported() -> TestResult {
        let (catalog, [_, _, coffee]) = test_catalog()?;
        let coffee = catalog.get(coffee).ok_or("missing product")?;

        let mut checkout = catalog.checkout([]);
        checkout.scan(coffee);

        let line = checkout.basket.first_mut().ok_or("missing line")?;
        line.quantity = u64::MAX;

        assert!(matches!(
            checkout.total_price(),
            Err(CheckoutError::Pricing(PricingError::Overflow { .. }))
        ));

        Ok(())
    }
}
