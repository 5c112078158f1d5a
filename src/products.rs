//! Products

use rusty_money::{Money, iso::Currency};
use slotmap::{SecondaryMap, SlotMap, new_key_type};
use smallvec::SmallVec;

new_key_type! {
    /// Product Key
    pub struct ProductKey;
}

/// Product
///
/// Owned by the catalog and referenced by cart lines. The cart never
/// mutates a product.
#[derive(Debug, Clone)]
pub struct Product<'a> {
    /// Display name
    pub name: String,

    /// Category tag
    pub category: String,

    /// Unit price
    pub price: Money<'a, Currency>,

    /// Primary image reference
    pub image: String,

    /// Additional image references
    pub additional_images: SmallVec<[String; 3]>,

    /// Description
    pub description: String,

    /// Aggregate rating
    pub rating: f32,

    /// Customer reviews
    pub reviews: Vec<String>,
}

impl<'a> Product<'a> {
    /// Creates a product with the given name, category and price and no
    /// imagery, description, rating or reviews.
    pub fn new(
        name: impl Into<String>,
        category: impl Into<String>,
        price: Money<'a, Currency>,
    ) -> Self {
        Self {
            name: name.into(),
            category: category.into(),
            price,
            image: String::new(),
            additional_images: SmallVec::new(),
            description: String::new(),
            rating: 0.0,
            reviews: Vec::new(),
        }
    }
}

/// Stock level annotation for a product.
///
/// Used only to annotate rendering. Stock never gates cart mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StockInfo {
    /// Units on hand
    pub quantity: u32,

    /// Reorder threshold
    pub min_threshold: u32,
}

impl StockInfo {
    /// Returns true when the stock level is at or below the reorder threshold.
    #[must_use]
    pub fn is_low(&self) -> bool {
        self.quantity <= self.min_threshold
    }
}

/// Catalog
///
/// The external product/stock source the cart engine queries by key.
/// Lookups for absent keys return `None` rather than an error.
#[derive(Debug, Default)]
pub struct Catalog<'a> {
    products: SlotMap<ProductKey, Product<'a>>,
    stock: SecondaryMap<ProductKey, StockInfo>,
}

impl<'a> Catalog<'a> {
    /// Create an empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self {
            products: SlotMap::with_key(),
            stock: SecondaryMap::new(),
        }
    }

    /// Insert a product, returning its key.
    pub fn insert(&mut self, product: Product<'a>) -> ProductKey {
        self.products.insert(product)
    }

    /// Insert a product together with its stock level.
    pub fn insert_with_stock(&mut self, product: Product<'a>, stock: StockInfo) -> ProductKey {
        let key = self.products.insert(product);
        self.stock.insert(key, stock);
        key
    }

    /// Look up a product by key.
    #[must_use]
    pub fn find(&self, key: ProductKey) -> Option<&Product<'a>> {
        self.products.get(key)
    }

    /// Look up the stock level for a product, if one was recorded.
    #[must_use]
    pub fn stock_info(&self, key: ProductKey) -> Option<StockInfo> {
        self.stock.get(key).copied()
    }

    /// Iterate over all products in the catalog.
    pub fn iter(&self) -> impl Iterator<Item = (ProductKey, &Product<'a>)> {
        self.products.iter()
    }

    /// Get the number of products in the catalog.
    #[must_use]
    pub fn len(&self) -> usize {
        self.products.len()
    }

    /// Check if the catalog is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}
