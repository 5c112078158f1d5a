//! Fiora prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    cart::{AddOutcome, Cart, CartConfig, CartError, CartLine, LineSnapshot, QuantityChange},
    checkout::{
        CardDetails, Checkout, CheckoutError, CheckoutForm, CheckoutState, CustomerDetails,
        FieldError, ShippingDetails,
    },
    history::{ActionHistory, ActionRecord},
    orders::{Order, OrderError, OrderLedger},
    products::{Catalog, Product, ProductKey, StockInfo},
    session::Session,
    sorting::{
        by_category, by_name, by_price_ascending, by_price_descending, merge_sort, quicksort,
    },
    wishlist::Wishlist,
};
