//! Quire
//!
//! Client-side line-item engines for a bookshop front end: the customer cart with staged
//! discount codes, the seller bill draft, catalog filtering and display-time money formatting.
//! The remote API stays the pricing and stock authority; everything here is a local estimate
//! reconciled against server-declared stock.

pub mod bill;
pub mod cart;
pub mod catalog;
pub mod discounts;
pub mod money;
pub mod orders;
pub mod prelude;

pub mod serde_helpers;
