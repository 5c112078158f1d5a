//! Fixtures
//!
//! The Fiora Atelier demo catalog used by the examples and integration
//! tests. Prices are in Philippine pesos, expressed in centavos.

use rusty_money::{Money, iso::PHP};
use smallvec::smallvec;

use crate::products::{Catalog, Product, ProductKey, StockInfo};

struct Entry {
    name: &'static str,
    category: &'static str,
    price_minor: i64,
    rating: f32,
    stock: StockInfo,
}

const FLOWERS: [Entry; 13] = [
    Entry {
        name: "Candy Pink",
        category: "best-sellers",
        price_minor: 999_900,
        rating: 4.8,
        stock: StockInfo {
            quantity: 12,
            min_threshold: 5,
        },
    },
    Entry {
        name: "Bright but Light",
        category: "fresh",
        price_minor: 285_000,
        rating: 4.5,
        stock: StockInfo {
            quantity: 20,
            min_threshold: 5,
        },
    },
    Entry {
        name: "Berry Cheesecake",
        category: "best-sellers",
        price_minor: 688_000,
        rating: 4.9,
        stock: StockInfo {
            quantity: 8,
            min_threshold: 5,
        },
    },
    Entry {
        name: "Dream Land",
        category: "best-sellers",
        price_minor: 399_000,
        rating: 4.6,
        stock: StockInfo {
            quantity: 15,
            min_threshold: 5,
        },
    },
    Entry {
        name: "Pinkish Belle",
        category: "fresh",
        price_minor: 539_000,
        rating: 4.4,
        stock: StockInfo {
            quantity: 10,
            min_threshold: 5,
        },
    },
    Entry {
        name: "Blooms Blush",
        category: "fresh",
        price_minor: 1_599_900,
        rating: 5.0,
        stock: StockInfo {
            quantity: 3,
            min_threshold: 5,
        },
    },
    Entry {
        name: "Blissful Roses",
        category: "fresh",
        price_minor: 667_000,
        rating: 4.7,
        stock: StockInfo {
            quantity: 18,
            min_threshold: 5,
        },
    },
    Entry {
        name: "Rosette",
        category: "fresh",
        price_minor: 349_000,
        rating: 4.3,
        stock: StockInfo {
            quantity: 25,
            min_threshold: 5,
        },
    },
    Entry {
        name: "Eterna",
        category: "synthetic",
        price_minor: 34_900,
        rating: 4.1,
        stock: StockInfo {
            quantity: 40,
            min_threshold: 10,
        },
    },
    Entry {
        name: "Silken",
        category: "synthetic",
        price_minor: 29_900,
        rating: 4.0,
        stock: StockInfo {
            quantity: 35,
            min_threshold: 10,
        },
    },
    Entry {
        name: "Velvessa",
        category: "synthetic",
        price_minor: 34_900,
        rating: 4.2,
        stock: StockInfo {
            quantity: 30,
            min_threshold: 10,
        },
    },
    Entry {
        name: "Spring Tulips",
        category: "seasonal",
        price_minor: 199_900,
        rating: 4.6,
        stock: StockInfo {
            quantity: 6,
            min_threshold: 5,
        },
    },
    Entry {
        name: "Summer Sunflowers",
        category: "seasonal",
        price_minor: 249_900,
        rating: 4.5,
        stock: StockInfo {
            quantity: 4,
            min_threshold: 5,
        },
    },
];

/// Build the demo flower catalog.
#[must_use]
pub fn flower_catalog() -> Catalog<'static> {
    let mut catalog = Catalog::new();

    for entry in &FLOWERS {
        let slug = entry.name.to_lowercase().replace(' ', "-");

        let mut product = Product::new(
            entry.name,
            entry.category,
            Money::from_minor(entry.price_minor, PHP),
        );
        product.image = format!("images/{slug}.webp");
        product.additional_images = smallvec![
            format!("images/{slug}-alt-1.webp"),
            format!("images/{slug}-alt-2.webp"),
        ];
        product.description = format!("{} arrangement from the {} line.", entry.name, entry.category);
        product.rating = entry.rating;

        catalog.insert_with_stock(product, entry.stock);
    }

    catalog
}

/// Look up a fixture product's key by display name.
#[must_use]
pub fn key_by_name(catalog: &Catalog<'_>, name: &str) -> Option<ProductKey> {
    catalog
        .iter()
        .find(|(_, product)| product.name == name)
        .map(|(key, _)| key)
}
