//! Storefront Example
//!
//! This example walks a full storefront session: browse a sorted catalog,
//! build a cart, undo a mistake, wishlist a product, then check out and
//! print the order summary.
//!
//! Use `-s` to pick the catalog sort: price-asc, price-desc, name or category
//! Use `-q` to set the quantity added for each demo cart line

use std::io;

use anyhow::Result;

use chrono::{Datelike, Utc};
use clap::Parser;
use fiora::{
    fixtures::{flower_catalog, key_by_name},
    prelude::*,
    utils::ExampleStorefrontArgs,
};

/// Storefront Example
#[expect(clippy::print_stdout, reason = "Example code")]
pub fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let args = ExampleStorefrontArgs::parse();

    let catalog = flower_catalog();

    let mut view: Vec<Product<'_>> = catalog.iter().map(|(_, product)| product.clone()).collect();
    match args.sort.as_str() {
        "price-desc" => quicksort(&mut view, &|a, b| by_price_descending(a, b)),
        "name" => view = merge_sort(&view, &|a: &Product<'_>, b| by_name(a, b)),
        "category" => view = merge_sort(&view, &|a: &Product<'_>, b| by_category(a, b)),
        _ => quicksort(&mut view, &|a, b| by_price_ascending(a, b)),
    }

    println!("Catalog ({} sort):", args.sort);
    for product in &view {
        println!("  {:<20} {:<14} {}", product.name, product.category, product.price);
    }

    let mut session = Session::new(&catalog, rusty_money::iso::PHP);

    let rosette = key_by_name(&catalog, "Rosette").ok_or_else(|| anyhow::anyhow!("no Rosette"))?;
    let tulips =
        key_by_name(&catalog, "Spring Tulips").ok_or_else(|| anyhow::anyhow!("no Spring Tulips"))?;
    let eterna = key_by_name(&catalog, "Eterna").ok_or_else(|| anyhow::anyhow!("no Eterna"))?;

    session.add_to_cart(rosette, args.quantity)?;
    session.add_to_cart(tulips, args.quantity)?;
    session.add_to_cart(eterna, args.quantity)?;

    // Second thoughts about the synthetic one.
    session.undo()?;

    session.toggle_wishlist(eterna);
    println!(
        "\nCart: {} lines, total {}. Wishlist: {} item(s).",
        session.cart().len(),
        session.cart().total(),
        session.wishlist().len()
    );

    session.begin_checkout()?;

    let now = Utc::now();
    let form = CheckoutForm {
        customer: CustomerDetails {
            first_name: "Maria".into(),
            last_name: "Santos".into(),
            email: "maria.santos@example.ph".into(),
            phone: "+63 917 555 0101".into(),
        },
        shipping: ShippingDetails {
            address: "12 Sampaguita St".into(),
            city: "Quezon City".into(),
            zip: "1100".into(),
            country: "Philippines".into(),
        },
        card: Some(CardDetails {
            number: "4111111111111111".into(),
            cvv: "123".into(),
            expiry_month: 12,
            expiry_year: now.year() + 2,
        }),
    };

    session.place_order(&form)?;

    println!("\nOrder placed. Checkout state: {:?}\n", session.checkout_state());

    let stdout = io::stdout();
    let mut handle = stdout.lock();

    for order in session.ledger().orders() {
        order.write_to(&mut handle, &catalog)?;
    }

    Ok(())
}
