//! Session
//!
//! One storefront session owns the cart, action history, wishlist and order
//! ledger, and orchestrates every mutation so history records stay in step
//! with cart state. Nothing here is global; independent sessions coexist
//! freely (tests construct several).
//!
//! All operations are synchronous and run to completion; the session assumes
//! single-threaded dispatch and never interleaves partially applied
//! mutations.

use crate::{
    cart::{AddOutcome, Cart, CartConfig, CartError, CartLine, QuantityChange},
    checkout::{Checkout, CheckoutError, CheckoutForm, CheckoutState},
    history::{ActionHistory, ActionRecord},
    orders::OrderLedger,
    products::{Catalog, ProductKey},
    wishlist::Wishlist,
};

use rusty_money::iso::Currency;
use tracing::debug;

/// Session
#[derive(Debug)]
pub struct Session<'a> {
    catalog: &'a Catalog<'a>,
    cart: Cart<'a>,
    history: ActionHistory<'a>,
    wishlist: Wishlist,
    ledger: OrderLedger<'a>,
    checkout: Checkout,
}

impl<'a> Session<'a> {
    /// Create a session over the given catalog with a default cart
    /// configuration.
    #[must_use]
    pub fn new(catalog: &'a Catalog<'a>, currency: &'static Currency) -> Self {
        Self::with_config(catalog, currency, CartConfig::default())
    }

    /// Create a session with an explicit cart configuration.
    #[must_use]
    pub fn with_config(
        catalog: &'a Catalog<'a>,
        currency: &'static Currency,
        config: CartConfig,
    ) -> Self {
        Session {
            catalog,
            cart: Cart::with_config(currency, config),
            history: ActionHistory::new(),
            wishlist: Wishlist::new(),
            ledger: OrderLedger::new(),
            checkout: Checkout::new(),
        }
    }

    /// Add a quantity of a catalog product to the cart, recording the
    /// mutation for undo.
    ///
    /// Returns `Ok(None)` when the product is not in the catalog (a lookup
    /// miss, not an error). A fresh line is recorded as an add; a merge into
    /// an existing line is recorded as a quantity update so that undoing it
    /// restores the pre-merge quantity rather than dropping the line.
    ///
    /// # Errors
    ///
    /// Any error from [`Cart::add_item`]; nothing is recorded on failure.
    pub fn add_to_cart(
        &mut self,
        product: ProductKey,
        quantity: u32,
    ) -> Result<Option<AddOutcome>, CartError> {
        let Some(entry) = self.catalog.find(product) else {
            debug!(?product, "add ignored; product not in catalog");
            return Ok(None);
        };

        let outcome = self.cart.add_item(product, entry.price, quantity)?;

        match outcome.previous_quantity {
            Some(old_quantity) => self.history.push(ActionRecord::Updated {
                product,
                old_quantity,
                new_quantity: outcome.quantity,
            }),
            None => self.history.push(ActionRecord::Added { product, quantity }),
        }

        Ok(Some(outcome))
    }

    /// Remove a product's line from the cart, recording the full line
    /// snapshot for undo. Returns `None` when no line exists.
    pub fn remove_from_cart(&mut self, product: ProductKey) -> Option<CartLine<'a>> {
        let line = self.cart.remove_item(product)?;

        self.history.push(ActionRecord::Removed { line: line.clone() });

        Some(line)
    }

    /// Set the quantity of an existing line.
    ///
    /// Setting a line to its current quantity is a no-op and records nothing.
    ///
    /// # Errors
    ///
    /// Any error from [`Cart::update_quantity`]; nothing is recorded on
    /// failure.
    pub fn change_quantity(
        &mut self,
        product: ProductKey,
        new_quantity: u32,
    ) -> Result<QuantityChange, CartError> {
        let change = self.cart.update_quantity(product, new_quantity)?;

        if change.old_quantity != change.new_quantity {
            self.history.push(ActionRecord::Updated {
                product,
                old_quantity: change.old_quantity,
                new_quantity: change.new_quantity,
            });
        }

        Ok(change)
    }

    /// Revert the most recent recorded mutation.
    ///
    /// Pops exactly one record and applies its inverse: an add is removed, a
    /// removal is re-added at the end of the sequence (the original position
    /// is not restored), and a quantity update is set back to its old value.
    /// Returns the consumed record, or `None` when the history is empty.
    ///
    /// # Errors
    ///
    /// If applying the inverse fails the record is pushed back, so the
    /// history and cart are both left as they were.
    pub fn undo(&mut self) -> Result<Option<ActionRecord<'a>>, CartError> {
        let Some(record) = self.history.pop() else {
            return Ok(None);
        };

        let result = match &record {
            ActionRecord::Added { product, .. } => {
                self.cart.remove_item(*product);
                Ok(())
            }
            ActionRecord::Removed { line } => self
                .cart
                .add_item(line.product(), *line.unit_price(), line.quantity())
                .map(|_| ()),
            ActionRecord::Updated {
                product,
                old_quantity,
                ..
            } => self
                .cart
                .update_quantity(*product, *old_quantity)
                .map(|_| ()),
        };

        match result {
            Ok(()) => {
                debug!("undid last action");
                Ok(Some(record))
            }
            Err(err) => {
                self.history.push(record);
                Err(err)
            }
        }
    }

    /// Toggle a product's wishlist membership, returning the resulting state.
    pub fn toggle_wishlist(&mut self, product: ProductKey) -> bool {
        self.wishlist.toggle(product)
    }

    /// Move a wishlisted product into the cart with quantity one.
    ///
    /// The product leaves the wishlist only if the add succeeds. Returns
    /// `Ok(None)` when the product is not in the catalog.
    ///
    /// # Errors
    ///
    /// Any error from [`Cart::add_item`].
    pub fn move_to_cart(&mut self, product: ProductKey) -> Result<Option<AddOutcome>, CartError> {
        let outcome = self.add_to_cart(product, 1)?;

        if outcome.is_some() {
            self.wishlist.remove(product);
        }

        Ok(outcome)
    }

    /// Open checkout for review.
    ///
    /// # Errors
    ///
    /// [`CheckoutError::EmptyCart`] when the cart has no lines.
    pub fn begin_checkout(&mut self) -> Result<(), CheckoutError> {
        self.checkout.begin(&self.cart)
    }

    /// Submit the checkout form, placing the order on success.
    ///
    /// # Errors
    ///
    /// Any error from [`Checkout::submit`].
    pub fn place_order(&mut self, form: &CheckoutForm) -> Result<(), CheckoutError> {
        self.checkout
            .submit(form, &mut self.cart, &mut self.history, &mut self.ledger)
    }

    /// The session's catalog.
    #[must_use]
    pub fn catalog(&self) -> &'a Catalog<'a> {
        self.catalog
    }

    /// The session's cart.
    #[must_use]
    pub fn cart(&self) -> &Cart<'a> {
        &self.cart
    }

    /// The session's action history.
    #[must_use]
    pub fn history(&self) -> &ActionHistory<'a> {
        &self.history
    }

    /// The session's wishlist.
    #[must_use]
    pub fn wishlist(&self) -> &Wishlist {
        &self.wishlist
    }

    /// The session's order ledger.
    #[must_use]
    pub fn ledger(&self) -> &OrderLedger<'a> {
        &self.ledger
    }

    /// The current checkout state.
    #[must_use]
    pub fn checkout_state(&self) -> CheckoutState {
        self.checkout.state()
    }
}
