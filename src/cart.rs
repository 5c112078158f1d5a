//! Cart

use rustc_hash::FxHashMap;
use rusty_money::{Money, iso::Currency};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::products::{Catalog, ProductKey};

/// Errors related to cart mutation or rehydration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CartError {
    /// A mutation was attempted with a quantity of zero.
    #[error("quantity must be at least 1")]
    ZeroQuantity,

    /// The resulting line quantity would exceed the configured maximum.
    #[error("quantity {requested} for product {product:?} exceeds the limit of {max}")]
    QuantityLimitExceeded {
        /// Product whose line was being mutated.
        product: ProductKey,
        /// Quantity the mutation would have produced.
        requested: u32,
        /// Configured per-line maximum.
        max: u32,
    },

    /// No cart line exists for the given product.
    #[error("no cart line for product {0:?}")]
    ItemNotFound(ProductKey),

    /// A snapshot referenced a product the catalog no longer knows.
    #[error("product {0:?} not found in catalog")]
    UnknownProduct(ProductKey),

    /// A line's currency differs from the cart currency (line currency, cart currency).
    #[error("line has currency {0}, but cart has currency {1}")]
    CurrencyMismatch(&'static str, &'static str),
}

/// Cart configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CartConfig {
    /// Maximum quantity a single line may hold.
    pub max_quantity_per_line: u32,
}

impl Default for CartConfig {
    fn default() -> Self {
        Self {
            max_quantity_per_line: 99,
        }
    }
}

/// One product/quantity pairing in the cart.
#[derive(Debug, Clone, PartialEq)]
pub struct CartLine<'a> {
    product: ProductKey,
    unit_price: Money<'a, Currency>,
    quantity: u32,
}

impl<'a> CartLine<'a> {
    /// Creates a new cart line.
    #[must_use]
    pub fn new(product: ProductKey, unit_price: Money<'a, Currency>, quantity: u32) -> Self {
        Self {
            product,
            unit_price,
            quantity,
        }
    }

    /// Returns the product of the line.
    pub fn product(&self) -> ProductKey {
        self.product
    }

    /// Returns the unit price of the line.
    pub fn unit_price(&self) -> &Money<'a, Currency> {
        &self.unit_price
    }

    /// Returns the quantity of the line.
    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    /// Unit price times quantity, in minor units.
    #[must_use]
    pub fn total_minor(&self) -> i64 {
        self.unit_price.to_minor_units() * i64::from(self.quantity)
    }
}

/// Result of a successful [`Cart::add_item`].
///
/// `previous_quantity` is `Some` when the add merged into an existing line,
/// so callers can record the mutation as a quantity update rather than a
/// fresh add and keep it reversible.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AddOutcome {
    /// Line quantity before the add, if the line already existed.
    pub previous_quantity: Option<u32>,

    /// Line quantity after the add.
    pub quantity: u32,
}

/// Result of a successful [`Cart::update_quantity`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuantityChange {
    /// Quantity before the update.
    pub old_quantity: u32,

    /// Quantity after the update.
    pub new_quantity: u32,
}

/// The persisted shape of one cart line.
///
/// The cart serialises to and rehydrates from this shape; it performs no
/// storage I/O itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineSnapshot {
    /// Product the line references.
    pub product: ProductKey,

    /// Line quantity.
    pub quantity: u32,
}

/// Cart
///
/// An ordered sequence of lines (insertion order is display order) with at
/// most one line per product. The line count and running total are always
/// recomputed from the sequence, never tracked independently; a rejected
/// mutation leaves all of them untouched.
#[derive(Debug)]
pub struct Cart<'a> {
    lines: Vec<CartLine<'a>>,
    index: FxHashMap<ProductKey, usize>,
    total_minor: i64,
    currency: &'static Currency,
    config: CartConfig,
}

impl<'a> Cart<'a> {
    /// Create an empty cart with the default configuration.
    #[must_use]
    pub fn new(currency: &'static Currency) -> Self {
        Self::with_config(currency, CartConfig::default())
    }

    /// Create an empty cart with the given configuration.
    #[must_use]
    pub fn with_config(currency: &'static Currency, config: CartConfig) -> Self {
        Cart {
            lines: Vec::new(),
            index: FxHashMap::default(),
            total_minor: 0,
            currency,
            config,
        }
    }

    /// Rebuild a cart from persisted line snapshots, rehydrating prices from
    /// the catalog.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::UnknownProduct`] if a snapshot references a
    /// product the catalog no longer carries, or any error `add_item` can
    /// produce for the snapshot quantities.
    pub fn restore(
        catalog: &Catalog<'a>,
        snapshots: &[LineSnapshot],
        currency: &'static Currency,
        config: CartConfig,
    ) -> Result<Self, CartError> {
        let mut cart = Cart::with_config(currency, config);

        for snapshot in snapshots {
            let product = catalog
                .find(snapshot.product)
                .ok_or(CartError::UnknownProduct(snapshot.product))?;

            cart.add_item(snapshot.product, product.price, snapshot.quantity)?;
        }

        Ok(cart)
    }

    /// Add a quantity of a product to the cart.
    ///
    /// If a line for the product already exists the quantities merge; no
    /// duplicate line is ever created. Otherwise a new line is appended at
    /// the end of the sequence.
    ///
    /// # Errors
    ///
    /// - [`CartError::ZeroQuantity`]: `quantity` was zero.
    /// - [`CartError::QuantityLimitExceeded`]: the resulting quantity would
    ///   exceed the configured maximum; the line is left unmodified.
    /// - [`CartError::CurrencyMismatch`]: the unit price is in a different
    ///   currency than the cart.
    pub fn add_item(
        &mut self,
        product: ProductKey,
        unit_price: Money<'a, Currency>,
        quantity: u32,
    ) -> Result<AddOutcome, CartError> {
        if quantity == 0 {
            return Err(CartError::ZeroQuantity);
        }

        let price_currency = unit_price.currency();
        if price_currency != self.currency {
            return Err(CartError::CurrencyMismatch(
                price_currency.iso_alpha_code,
                self.currency.iso_alpha_code,
            ));
        }

        let max = self.config.max_quantity_per_line;

        let outcome = if let Some(line) = self.index.get(&product).and_then(|&i| self.lines.get_mut(i)) {
            let merged = line.quantity.saturating_add(quantity);
            if merged > max {
                return Err(CartError::QuantityLimitExceeded {
                    product,
                    requested: merged,
                    max,
                });
            }

            let previous = line.quantity;
            line.quantity = merged;

            AddOutcome {
                previous_quantity: Some(previous),
                quantity: merged,
            }
        } else {
            if quantity > max {
                return Err(CartError::QuantityLimitExceeded {
                    product,
                    requested: quantity,
                    max,
                });
            }

            self.lines.push(CartLine::new(product, unit_price, quantity));
            self.index.insert(product, self.lines.len() - 1);

            AddOutcome {
                previous_quantity: None,
                quantity,
            }
        };

        self.recompute_total();
        debug!(?product, quantity = outcome.quantity, "added to cart");

        Ok(outcome)
    }

    /// Remove the line for a product, returning it if one existed.
    ///
    /// The relative order of the remaining lines is preserved.
    pub fn remove_item(&mut self, product: ProductKey) -> Option<CartLine<'a>> {
        let idx = self.index.remove(&product)?;
        let line = self.lines.remove(idx);

        // Lines after the removed one shifted down by one.
        for (i, remaining) in self.lines.iter().enumerate().skip(idx) {
            self.index.insert(remaining.product, i);
        }

        self.recompute_total();
        debug!(?product, "removed cart line");

        Some(line)
    }

    /// Set the quantity of an existing line, returning the old and new
    /// quantities.
    ///
    /// # Errors
    ///
    /// - [`CartError::ZeroQuantity`]: `new_quantity` was zero.
    /// - [`CartError::QuantityLimitExceeded`]: `new_quantity` exceeds the
    ///   configured maximum; the line is left unmodified.
    /// - [`CartError::ItemNotFound`]: no line exists for the product.
    pub fn update_quantity(
        &mut self,
        product: ProductKey,
        new_quantity: u32,
    ) -> Result<QuantityChange, CartError> {
        if new_quantity == 0 {
            return Err(CartError::ZeroQuantity);
        }

        let max = self.config.max_quantity_per_line;
        if new_quantity > max {
            return Err(CartError::QuantityLimitExceeded {
                product,
                requested: new_quantity,
                max,
            });
        }

        let line = self
            .index
            .get(&product)
            .and_then(|&i| self.lines.get_mut(i))
            .ok_or(CartError::ItemNotFound(product))?;

        let old_quantity = line.quantity;
        line.quantity = new_quantity;

        self.recompute_total();
        debug!(?product, old_quantity, new_quantity, "updated cart quantity");

        Ok(QuantityChange {
            old_quantity,
            new_quantity,
        })
    }

    /// The current ordered line sequence, as a read-only view.
    #[must_use]
    pub fn items(&self) -> &[CartLine<'a>] {
        &self.lines
    }

    /// Look up the line for a product.
    #[must_use]
    pub fn get(&self, product: ProductKey) -> Option<&CartLine<'a>> {
        self.index.get(&product).and_then(|&i| self.lines.get(i))
    }

    /// Empty the cart. Produces no history record.
    pub fn clear(&mut self) {
        self.lines.clear();
        self.index.clear();
        self.total_minor = 0;
        debug!("cleared cart");
    }

    /// The persisted shape of the current line sequence.
    #[must_use]
    pub fn snapshot(&self) -> Vec<LineSnapshot> {
        self.lines
            .iter()
            .map(|line| LineSnapshot {
                product: line.product,
                quantity: line.quantity,
            })
            .collect()
    }

    /// Sum of unit price times quantity over all lines.
    #[must_use]
    pub fn total(&self) -> Money<'static, Currency> {
        Money::from_minor(self.total_minor, self.currency)
    }

    /// Get the number of lines in the cart.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Check if the cart is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Get the currency of the cart.
    #[must_use]
    pub fn currency(&self) -> &'static Currency {
        self.currency
    }

    /// Get the cart configuration.
    #[must_use]
    pub fn config(&self) -> CartConfig {
        self.config
    }

    fn recompute_total(&mut self) {
        self.total_minor = self.lines.iter().map(CartLine::total_minor).sum();
    }
}

#[cfg(test)]
mod tests {
    use rusty_money::{
        Money,
        iso::{PHP, USD},
    };
    use slotmap::{KeyData, SlotMap};
    use testresult::TestResult;

    use crate::products::Product;

    use super::*;

    fn keys(n: usize) -> Vec<ProductKey> {
        let mut map: SlotMap<ProductKey, ()> = SlotMap::with_key();
        (0..n).map(|_| map.insert(())).collect()
    }

    #[test]
    fn add_appends_line_and_recomputes_total() -> TestResult {
        let [a, b]: [ProductKey; 2] = keys(2).try_into().map_err(|_| "key setup")?;
        let mut cart = Cart::new(PHP);

        cart.add_item(a, Money::from_minor(100, PHP), 2)?;
        cart.add_item(b, Money::from_minor(250, PHP), 1)?;

        assert_eq!(cart.len(), 2);
        assert_eq!(cart.total(), Money::from_minor(450, PHP));
        assert_eq!(cart.items().first().map(CartLine::product), Some(a));
        assert_eq!(cart.items().last().map(CartLine::product), Some(b));

        Ok(())
    }

    #[test]
    fn add_merges_into_existing_line() -> TestResult {
        let [a]: [ProductKey; 1] = keys(1).try_into().map_err(|_| "key setup")?;
        let mut cart = Cart::new(PHP);

        cart.add_item(a, Money::from_minor(100, PHP), 2)?;
        let outcome = cart.add_item(a, Money::from_minor(100, PHP), 3)?;

        assert_eq!(outcome.previous_quantity, Some(2));
        assert_eq!(outcome.quantity, 5);
        assert_eq!(cart.len(), 1);
        assert_eq!(cart.total(), Money::from_minor(500, PHP));

        Ok(())
    }

    #[test]
    fn add_rejects_zero_quantity() {
        let mut cart = Cart::new(PHP);

        let result = cart.add_item(ProductKey::default(), Money::from_minor(100, PHP), 0);

        assert_eq!(result, Err(CartError::ZeroQuantity));
        assert!(cart.is_empty());
    }

    #[test]
    fn add_over_limit_leaves_cart_unchanged() -> TestResult {
        let [a]: [ProductKey; 1] = keys(1).try_into().map_err(|_| "key setup")?;
        let mut cart = Cart::new(PHP);
        cart.add_item(a, Money::from_minor(100, PHP), 98)?;

        let result = cart.add_item(a, Money::from_minor(100, PHP), 2);

        assert_eq!(
            result,
            Err(CartError::QuantityLimitExceeded {
                product: a,
                requested: 100,
                max: 99,
            })
        );
        assert_eq!(cart.len(), 1);
        assert_eq!(cart.get(a).map(CartLine::quantity), Some(98));
        assert_eq!(cart.total(), Money::from_minor(9800, PHP));

        Ok(())
    }

    #[test]
    fn fresh_add_over_limit_fails() {
        let mut cart = Cart::new(PHP);

        let result = cart.add_item(ProductKey::default(), Money::from_minor(100, PHP), 100);

        assert!(matches!(
            result,
            Err(CartError::QuantityLimitExceeded { requested: 100, .. })
        ));
        assert!(cart.is_empty());
        assert_eq!(cart.total(), Money::from_minor(0, PHP));
    }

    #[test]
    fn add_rejects_currency_mismatch() {
        let mut cart = Cart::new(PHP);

        let result = cart.add_item(ProductKey::default(), Money::from_minor(100, USD), 1);

        assert_eq!(
            result,
            Err(CartError::CurrencyMismatch(
                USD.iso_alpha_code,
                PHP.iso_alpha_code
            ))
        );
    }

    #[test]
    fn quantity_limit_is_configurable() -> TestResult {
        let [a]: [ProductKey; 1] = keys(1).try_into().map_err(|_| "key setup")?;
        let mut cart = Cart::with_config(
            PHP,
            CartConfig {
                max_quantity_per_line: 3,
            },
        );

        cart.add_item(a, Money::from_minor(100, PHP), 3)?;
        let result = cart.add_item(a, Money::from_minor(100, PHP), 1);

        assert!(matches!(
            result,
            Err(CartError::QuantityLimitExceeded { max: 3, .. })
        ));

        Ok(())
    }

    #[test]
    fn update_returns_old_and_new_quantities() -> TestResult {
        let [a]: [ProductKey; 1] = keys(1).try_into().map_err(|_| "key setup")?;
        let mut cart = Cart::new(PHP);
        cart.add_item(a, Money::from_minor(100, PHP), 2)?;

        let change = cart.update_quantity(a, 7)?;

        assert_eq!(change.old_quantity, 2);
        assert_eq!(change.new_quantity, 7);
        assert_eq!(cart.total(), Money::from_minor(700, PHP));

        Ok(())
    }

    #[test]
    fn update_over_limit_leaves_line_unchanged() -> TestResult {
        let [a]: [ProductKey; 1] = keys(1).try_into().map_err(|_| "key setup")?;
        let mut cart = Cart::new(PHP);
        cart.add_item(a, Money::from_minor(100, PHP), 2)?;

        let result = cart.update_quantity(a, 100);

        assert!(matches!(
            result,
            Err(CartError::QuantityLimitExceeded { requested: 100, .. })
        ));
        assert_eq!(cart.get(a).map(CartLine::quantity), Some(2));
        assert_eq!(cart.total(), Money::from_minor(200, PHP));

        Ok(())
    }

    #[test]
    fn update_unknown_product_errors() {
        let mut cart = Cart::new(PHP);
        let ghost = ProductKey::from(KeyData::from_ffi(1));

        assert_eq!(
            cart.update_quantity(ghost, 1),
            Err(CartError::ItemNotFound(ghost))
        );
    }

    #[test]
    fn remove_preserves_remaining_order() -> TestResult {
        let [a, b, c]: [ProductKey; 3] = keys(3).try_into().map_err(|_| "key setup")?;
        let mut cart = Cart::new(PHP);
        cart.add_item(a, Money::from_minor(100, PHP), 1)?;
        cart.add_item(b, Money::from_minor(200, PHP), 1)?;
        cart.add_item(c, Money::from_minor(300, PHP), 1)?;

        let removed = cart.remove_item(b).ok_or("expected removed line")?;

        assert_eq!(removed.product(), b);
        assert_eq!(removed.quantity(), 1);

        let order: Vec<ProductKey> = cart.items().iter().map(CartLine::product).collect();
        assert_eq!(order, vec![a, c]);
        assert_eq!(cart.total(), Money::from_minor(400, PHP));

        // Index still resolves the shifted line.
        assert_eq!(cart.get(c).map(CartLine::quantity), Some(1));

        Ok(())
    }

    #[test]
    fn remove_missing_product_returns_none() {
        let mut cart = Cart::new(PHP);

        assert!(cart.remove_item(ProductKey::default()).is_none());
    }

    #[test]
    fn clear_resets_lines_and_total() -> TestResult {
        let [a]: [ProductKey; 1] = keys(1).try_into().map_err(|_| "key setup")?;
        let mut cart = Cart::new(PHP);
        cart.add_item(a, Money::from_minor(100, PHP), 5)?;

        cart.clear();

        assert!(cart.is_empty());
        assert_eq!(cart.len(), 0);
        assert_eq!(cart.total(), Money::from_minor(0, PHP));
        assert!(cart.get(a).is_none());

        Ok(())
    }

    #[test]
    fn snapshot_and_restore_round_trip_through_catalog() -> TestResult {
        let mut catalog = Catalog::new();
        let a = catalog.insert(Product::new("Rosette", "fresh", Money::from_minor(3490, PHP)));
        let b = catalog.insert(Product::new("Eterna", "synthetic", Money::from_minor(349, PHP)));

        let mut cart = Cart::new(PHP);
        cart.add_item(a, Money::from_minor(3490, PHP), 2)?;
        cart.add_item(b, Money::from_minor(349, PHP), 1)?;

        let snapshots = cart.snapshot();
        let restored = Cart::restore(&catalog, &snapshots, PHP, CartConfig::default())?;

        assert_eq!(restored.len(), 2);
        assert_eq!(restored.total(), cart.total());
        assert_eq!(restored.get(a).map(CartLine::quantity), Some(2));

        Ok(())
    }

    #[test]
    fn restore_fails_on_unknown_product() {
        let catalog = Catalog::new();
        let ghost = ProductKey::from(KeyData::from_ffi(7));

        let snapshots = [LineSnapshot {
            product: ghost,
            quantity: 1,
        }];

        let result = Cart::restore(&catalog, &snapshots, PHP, CartConfig::default());

        assert_eq!(result.unwrap_err(), CartError::UnknownProduct(ghost));
    }
}
