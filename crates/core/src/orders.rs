//! Orders
//!
//! Bills as the API returns them to customers and sellers, and the purchase report derived
//! from a customer's order history.

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{catalog::CatalogItem, serde_helpers::null_as_default};

/// Bill status as reported by the server.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum OrderStatus {
    /// Awaiting payment.
    #[default]
    Pending,

    /// Paid by the customer.
    Paid,

    /// Fulfilled.
    Completed,

    /// Cancelled.
    Cancelled,

    /// Any status this client does not know about.
    Other(String),
}

impl From<String> for OrderStatus {
    fn from(value: String) -> Self {
        match value.to_uppercase().as_str() {
            "PENDING" => Self::Pending,
            "PAID" => Self::Paid,
            "COMPLETED" => Self::Completed,
            "CANCELLED" => Self::Cancelled,
            _ => Self::Other(value),
        }
    }
}

impl From<OrderStatus> for String {
    fn from(status: OrderStatus) -> Self {
        status.to_string()
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending => f.write_str("PENDING"),
            Self::Paid => f.write_str("PAID"),
            Self::Completed => f.write_str("COMPLETED"),
            Self::Cancelled => f.write_str("CANCELLED"),
            Self::Other(other) => f.write_str(other),
        }
    }
}

/// A line on a stored bill.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    /// Line identifier.
    #[serde(default)]
    pub id: Option<u64>,

    /// Item, when the server includes it.
    #[serde(default)]
    pub item: Option<CatalogItem>,

    /// Units billed.
    #[serde(default, deserialize_with = "null_as_default")]
    pub quantity: u32,

    /// Price per unit charged by the server.
    #[serde(default, deserialize_with = "null_as_default")]
    pub unit_price: Decimal,

    /// Line total charged by the server.
    #[serde(default, deserialize_with = "null_as_default")]
    pub total_price: Decimal,
}

/// Customer attached to a bill in the seller's bill list.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BilledCustomer {
    /// Customer identifier.
    pub id: u64,

    /// Display name.
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
}

/// A bill, as listed in a customer's order history or the seller's bill list.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    /// Bill identifier.
    pub id: u64,

    /// Bill number, e.g. `BILL1712345678901`.
    #[serde(default, deserialize_with = "null_as_default")]
    pub bill_number: String,

    /// Server-local timestamp of the bill, unparsed.
    #[serde(default)]
    pub bill_date: Option<String>,

    /// Customer billed. Customer-facing order lists omit it.
    #[serde(default)]
    pub customer: Option<BilledCustomer>,

    /// Amount charged.
    #[serde(default, deserialize_with = "null_as_default")]
    pub total_amount: Decimal,

    /// Status.
    #[serde(default, deserialize_with = "null_as_default")]
    pub status: OrderStatus,

    /// Billed lines.
    #[serde(default, deserialize_with = "null_as_default")]
    pub bill_items: Vec<OrderItem>,
}

/// Summary of a customer's purchase history.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PurchaseReport {
    /// Number of orders.
    pub total_orders: usize,

    /// Sum of order totals.
    pub total_spent: Decimal,

    /// Orders with status `COMPLETED`.
    pub completed: usize,

    /// Orders with status `PENDING`.
    pub pending: usize,
}

impl PurchaseReport {
    /// Summarise a list of orders.
    #[must_use]
    pub fn from_orders(orders: &[Order]) -> Self {
        Self {
            total_orders: orders.len(),
            total_spent: orders.iter().map(|order| order.total_amount).sum(),
            completed: orders
                .iter()
                .filter(|order| order.status == OrderStatus::Completed)
                .count(),
            pending: orders
                .iter()
                .filter(|order| order.status == OrderStatus::Pending)
                .count(),
        }
    }
}
