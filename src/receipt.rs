//! Receipt

use std::io;

use rusty_money::{Money, MoneyError, iso::Currency};
use smallvec::SmallVec;
use tabled::{
    builder::Builder,
    settings::{
        Alignment, Color, Style,
        object::{Columns, Rows},
    },
};
use thiserror::Error;

use crate::products::ProductId;

/// Errors that can occur when rendering a receipt.
#[derive(Debug, Error)]
pub enum ReceiptError {
    /// Wrapper for money errors.
    #[error(transparent)]
    Money(#[from] MoneyError),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// Pricing of one product on a receipt.
#[derive(Debug, Clone)]
pub struct ReceiptLine<'a> {
    /// Product that was scanned
    pub product: ProductId,

    /// Product code
    pub code: String,

    /// Product name
    pub name: String,

    /// Number of units scanned
    pub quantity: u64,

    /// List price of a single unit
    pub unit_price: Money<'a, Currency>,

    /// Quantity charged at the list price
    pub full_price: Money<'a, Currency>,

    /// Amount actually charged
    pub charged: Money<'a, Currency>,

    /// Description of the offer that produced `charged`, if one beat the list price
    pub offer: Option<String>,
}

impl<'a> ReceiptLine<'a> {
    /// Amount saved on this line.
    ///
    /// # Errors
    ///
    /// Returns a [`MoneyError`] if the prices are in different currencies.
    pub fn savings(&self) -> Result<Money<'a, Currency>, MoneyError> {
        self.full_price.sub(self.charged)
    }
}

/// Final receipt for a checkout.
#[derive(Debug, Clone)]
pub struct Receipt<'a> {
    lines: SmallVec<[ReceiptLine<'a>; 10]>,

    /// Total cost before any offers
    subtotal: Money<'a, Currency>,

    /// Total amount paid after offers
    total: Money<'a, Currency>,

    currency: &'a Currency,
}

impl<'a> Receipt<'a> {
    /// Create a new receipt with the given details.
    pub fn new(
        lines: SmallVec<[ReceiptLine<'a>; 10]>,
        subtotal: Money<'a, Currency>,
        total: Money<'a, Currency>,
        currency: &'a Currency,
    ) -> Self {
        Self {
            lines,
            subtotal,
            total,
            currency,
        }
    }

    /// Lines in first-scan order, one per scanned product
    pub fn lines(&self) -> &[ReceiptLine<'a>] {
        &self.lines
    }

    /// Total cost before any offers
    pub fn subtotal(&self) -> Money<'a, Currency> {
        self.subtotal
    }

    /// Total amount paid
    pub fn total(&self) -> Money<'a, Currency> {
        self.total
    }

    /// Get the currency of the receipt.
    pub fn currency(&self) -> &'a Currency {
        self.currency
    }

    /// Calculate the savings made by applying offers.
    ///
    /// # Errors
    ///
    /// Returns a [`MoneyError`] if the subtraction operation fails.
    pub fn savings(&self) -> Result<Money<'a, Currency>, MoneyError> {
        self.subtotal.sub(self.total)
    }

    /// Render the receipt as a table followed by the totals.
    ///
    /// # Errors
    ///
    /// Returns an error if the savings cannot be computed or writing fails.
    pub fn write_to(&self, mut out: impl io::Write) -> Result<(), ReceiptError> {
        let mut builder = Builder::default();
        let mut discounted_rows: SmallVec<[usize; 10]> = SmallVec::new();

        builder.push_record([
            "Item",
            "Code",
            "Qty",
            "Unit Price",
            "Full Price",
            "Charged",
            "Offer",
        ]);

        for (idx, line) in self.lines.iter().enumerate() {
            if line.offer.is_some() {
                discounted_rows.push(idx + 1);
            }

            builder.push_record([
                line.name.clone(),
                line.code.clone(),
                line.quantity.to_string(),
                line.unit_price.to_string(),
                line.full_price.to_string(),
                line.charged.to_string(),
                line.offer.clone().unwrap_or_default(),
            ]);
        }

        let mut table = builder.build();

        table.with(Style::modern_rounded());
        table.modify(Rows::first(), Color::BOLD);
        table.modify(Columns::new(2..6), Alignment::right());

        for row in discounted_rows {
            table.modify((row, 5), Color::FG_GREEN);
        }

        writeln!(out, "\n{table}")?;

        let width = [self.subtotal, self.total, self.savings()?]
            .iter()
            .map(|money| money.to_string().len())
            .max()
            .unwrap_or_default();

        writeln!(out, " Subtotal:  {:>width$}", self.subtotal.to_string())?;
        writeln!(out, "    Total:  {:>width$}", self.total.to_string())?;
        writeln!(out, "  Savings:  {:>width$}", self.savings()?.to_string())?;

        Ok(())
    }
}
