//! Utils

use clap::Parser;

/// Arguments for the storefront examples
#[derive(Debug, Parser)]
pub struct ExampleStorefrontArgs {
    /// Sort the catalog view by: price-asc, price-desc, name or category
    #[clap(short, long, default_value = "price-asc")]
    pub sort: String,

    /// Quantity to add for each demo cart line
    #[clap(short, long, default_value_t = 1)]
    pub quantity: u32,
}
