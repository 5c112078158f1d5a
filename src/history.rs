//! Action History
//!
//! A LIFO stack of reversible cart mutation records. The stack only stores
//! records; the undo protocol that consumes them lives in
//! [`crate::session::Session::undo`].

use crate::{cart::CartLine, products::ProductKey};

/// A record of one successful cart mutation, carrying enough information to
/// reverse it.
#[derive(Debug, Clone, PartialEq)]
pub enum ActionRecord<'a> {
    /// A fresh line was appended to the cart.
    ///
    /// Adds that merged into an existing line are recorded as [`Updated`]
    /// with the pre-merge quantity, so undoing them restores the delta
    /// instead of dropping the whole line.
    ///
    /// [`Updated`]: ActionRecord::Updated
    Added {
        /// Product the line references.
        product: ProductKey,
        /// Quantity the line was created with.
        quantity: u32,
    },

    /// A line was removed. Carries the full line snapshot, since the cart no
    /// longer holds it.
    Removed {
        /// The removed line.
        line: CartLine<'a>,
    },

    /// A line's quantity changed.
    Updated {
        /// Product the line references.
        product: ProductKey,
        /// Quantity before the change.
        old_quantity: u32,
        /// Quantity after the change.
        new_quantity: u32,
    },
}

/// Action History
///
/// Strict LIFO over the records of a session's cart mutations. Unbounded.
#[derive(Debug, Default)]
pub struct ActionHistory<'a> {
    records: Vec<ActionRecord<'a>>,
}

impl<'a> ActionHistory<'a> {
    /// Create an empty history.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Push a record onto the top of the stack.
    pub fn push(&mut self, record: ActionRecord<'a>) {
        self.records.push(record);
    }

    /// Remove and return the top record, or `None` if the stack is empty.
    ///
    /// Each popped record is gone from the history; undoing it must happen
    /// exactly once.
    pub fn pop(&mut self) -> Option<ActionRecord<'a>> {
        self.records.pop()
    }

    /// Check if the stack is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Get the number of records on the stack.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Drop all records.
    ///
    /// Called after checkout, when the records reference a cart state that no
    /// longer exists.
    pub fn clear(&mut self) {
        self.records.clear();
    }
}
