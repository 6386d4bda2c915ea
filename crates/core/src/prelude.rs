//! Quire prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    bill::{BillDraft, BillError, BillLine, BillSubmission, CustomerId},
    cart::{Cart, CartError, CartLine, CartTotals, LineTotals, OrderLine},
    catalog::{CatalogError, CatalogFilter, CatalogItem, ItemId, StockStatus},
    discounts::{DISCOUNT_CODES, DiscountCode},
    money::format_money,
    orders::{BilledCustomer, Order, OrderItem, OrderStatus, PurchaseReport},
};
