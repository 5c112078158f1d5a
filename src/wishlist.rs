//! Wishlist

use rustc_hash::FxHashSet;

use crate::products::ProductKey;

/// Wishlist
///
/// A set of product keys. Membership is unique, iteration order is not
/// guaranteed, and entries never expire.
#[derive(Debug, Default)]
pub struct Wishlist {
    members: FxHashSet<ProductKey>,
}

impl Wishlist {
    /// Create an empty wishlist.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add the product if absent, remove it if present. Returns the resulting
    /// membership state.
    pub fn toggle(&mut self, product: ProductKey) -> bool {
        if self.members.remove(&product) {
            false
        } else {
            self.members.insert(product);
            true
        }
    }

    /// Add the product. Returns true if it was not already present.
    pub fn add(&mut self, product: ProductKey) -> bool {
        self.members.insert(product)
    }

    /// Remove the product. Returns true if it was present.
    pub fn remove(&mut self, product: ProductKey) -> bool {
        self.members.remove(&product)
    }

    /// Check whether the product is on the wishlist.
    #[must_use]
    pub fn contains(&self, product: ProductKey) -> bool {
        self.members.contains(&product)
    }

    /// Iterate over the wishlist members, in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = ProductKey> + '_ {
        self.members.iter().copied()
    }

    /// Get the number of products on the wishlist.
    #[must_use]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Check if the wishlist is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}
