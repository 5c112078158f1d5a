//! Orders

use std::io;

use chrono::{DateTime, Utc};
use rusty_money::{Money, iso::Currency};
use tabled::{
    builder::Builder,
    settings::{Alignment, Color, Style, object::{Columns, Rows}},
};
use thiserror::Error;
use tracing::info;

use crate::{
    cart::{Cart, CartLine},
    products::{Catalog, ProductKey},
};

/// Errors that can occur when rendering an order summary.
#[derive(Debug, Error)]
pub enum OrderError {
    /// An order line references a product the catalog no longer carries.
    #[error("product {0:?} not found in catalog")]
    MissingProduct(ProductKey),

    /// IO error
    #[error("IO error")]
    Io,
}

/// An immutable snapshot of cart contents taken at checkout time.
#[derive(Debug, Clone)]
pub struct Order<'a> {
    lines: Vec<CartLine<'a>>,
    total_minor: i64,
    currency: &'static Currency,
    placed_at: DateTime<Utc>,
}

impl<'a> Order<'a> {
    /// The (product, quantity) lines as they stood at submission time.
    #[must_use]
    pub fn lines(&self) -> &[CartLine<'a>] {
        &self.lines
    }

    /// The order total at submission time.
    #[must_use]
    pub fn total(&self) -> Money<'static, Currency> {
        Money::from_minor(self.total_minor, self.currency)
    }

    /// When the order was placed.
    #[must_use]
    pub fn placed_at(&self) -> DateTime<Utc> {
        self.placed_at
    }

    /// Currency used for all monetary values.
    #[must_use]
    pub fn currency(&self) -> &'static Currency {
        self.currency
    }

    /// Render the order as a summary table.
    ///
    /// # Errors
    ///
    /// Returns [`OrderError::MissingProduct`] if a line's product is no
    /// longer in the catalog, or [`OrderError::Io`] if writing fails.
    pub fn write_to(
        &self,
        mut out: impl io::Write,
        catalog: &Catalog<'_>,
    ) -> Result<(), OrderError> {
        let mut builder = Builder::default();
        builder.push_record(["Item", "Qty", "Unit Price", "Line Total"]);

        for line in &self.lines {
            let product = catalog
                .find(line.product())
                .ok_or(OrderError::MissingProduct(line.product()))?;

            builder.push_record([
                product.name.clone(),
                line.quantity().to_string(),
                format!("{}", line.unit_price()),
                format!("{}", Money::from_minor(line.total_minor(), self.currency)),
            ]);
        }

        let mut table = builder.build();
        table.with(Style::modern_rounded());
        table.modify(Rows::first(), Color::BOLD);
        table.modify(Columns::new(1..4), Alignment::right());

        writeln!(out, "{table}").map_err(|_err| OrderError::Io)?;
        writeln!(
            out,
            " Total: {}    Placed: {}",
            self.total(),
            self.placed_at.format("%Y-%m-%d %H:%M:%S UTC")
        )
        .map_err(|_err| OrderError::Io)
    }
}

/// Order Ledger
///
/// Append-only record of completed orders, oldest first.
#[derive(Debug, Default)]
pub struct OrderLedger<'a> {
    orders: Vec<Order<'a>>,
}

impl<'a> OrderLedger<'a> {
    /// Create an empty ledger.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot the cart's lines and total into a new order.
    ///
    /// The lines are copied, so later cart mutations cannot retroactively
    /// alter the order.
    pub fn add_order(&mut self, cart: &Cart<'a>, placed_at: DateTime<Utc>) {
        let order = Order {
            lines: cart.items().to_vec(),
            total_minor: cart.total().to_minor_units(),
            currency: cart.currency(),
            placed_at,
        };

        info!(
            lines = order.lines.len(),
            total_minor = order.total_minor,
            "order recorded"
        );

        self.orders.push(order);
    }

    /// All completed orders, oldest first.
    #[must_use]
    pub fn orders(&self) -> &[Order<'a>] {
        &self.orders
    }

    /// Get the number of orders in the ledger.
    #[must_use]
    pub fn len(&self) -> usize {
        self.orders.len()
    }

    /// Check if the ledger is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }
}
