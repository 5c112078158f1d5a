//! Fiora
//!
//! Fiora is the cart, wishlist and ordering engine behind the Fiora Atelier storefront.

pub mod cart;
pub mod checkout;
pub mod fixtures;
pub mod history;
pub mod orders;
pub mod prelude;
pub mod products;
pub mod session;
pub mod sorting;
pub mod utils;
pub mod wishlist;
