//! Catalog
//!
//! Items as the API lists them, plus the storefront's search and stock filters.

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::serde_helpers::null_as_default;

/// Server-assigned item identifier.
pub type ItemId = u64;

/// Stock level at or below which an item counts as low stock.
pub const LOW_STOCK_LEVEL: i64 = 5;

/// A catalog item with the stock the server declared when it was fetched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogItem {
    /// Item identifier.
    pub id: ItemId,

    /// Display name.
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,

    /// Unit price.
    #[serde(default, deserialize_with = "null_as_default")]
    pub price: Decimal,

    /// Units in stock at fetch time.
    #[serde(default, deserialize_with = "null_as_default")]
    pub stock_quantity: i64,

    /// Category label, empty when uncategorised.
    #[serde(default, deserialize_with = "null_as_default")]
    pub category: String,

    /// Shop item code.
    #[serde(default, deserialize_with = "null_as_default")]
    pub item_code: String,

    /// Free text description.
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,

    /// Author, when the catalog provides one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,

    /// Publisher, when the catalog provides one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub publisher: Option<String>,

    /// Year of publication, when the catalog provides one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub publication_year: Option<i32>,
}

impl CatalogItem {
    /// Stock classification for this item.
    #[must_use]
    pub fn stock_status(&self) -> StockStatus {
        StockStatus::from_quantity(self.stock_quantity)
    }
}

/// Stock classification shown next to catalog items.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StockStatus {
    /// More than [`LOW_STOCK_LEVEL`] units.
    InStock,

    /// Between one and [`LOW_STOCK_LEVEL`] units.
    Low,

    /// Nothing left.
    OutOfStock,
}

impl StockStatus {
    /// Classify a stock quantity.
    #[must_use]
    pub fn from_quantity(quantity: i64) -> Self {
        if quantity <= 0 {
            Self::OutOfStock
        } else if quantity <= LOW_STOCK_LEVEL {
            Self::Low
        } else {
            Self::InStock
        }
    }
}

impl fmt::Display for StockStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InStock => f.write_str("In Stock"),
            Self::Low => f.write_str("Low Stock"),
            Self::OutOfStock => f.write_str("Out of Stock"),
        }
    }
}

/// Errors from catalog lookups and filter parsing.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CatalogError {
    /// The item is not in the freshly fetched catalog.
    #[error("item {0} is not in the catalog")]
    UnknownItem(ItemId),

    /// Stock filter name was not recognised.
    #[error("unknown stock filter {0:?} (expected in-stock, low-stock or out-of-stock)")]
    UnknownStockFilter(String),
}

/// Find an item by id in a fetched catalog.
///
/// # Errors
///
/// Returns [`CatalogError::UnknownItem`] if no item has that id.
pub fn find_item(items: &[CatalogItem], id: ItemId) -> Result<&CatalogItem, CatalogError> {
    items
        .iter()
        .find(|item| item.id == id)
        .ok_or(CatalogError::UnknownItem(id))
}

/// Distinct, non-empty categories in first-seen order.
#[must_use]
pub fn categories(items: &[CatalogItem]) -> Vec<&str> {
    let mut seen: Vec<&str> = Vec::new();

    for item in items {
        let category = item.category.as_str();

        if !category.is_empty() && !seen.contains(&category) {
            seen.push(category);
        }
    }

    seen
}

/// Storefront catalog filter: free text search, category and stock level.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogFilter {
    /// Case-insensitive text matched against name, author and item code.
    pub search: Option<String>,

    /// Exact category match.
    pub category: Option<String>,

    /// Stock level.
    pub stock: Option<StockStatus>,
}

impl CatalogFilter {
    /// Parse a stock filter name as used by the storefront (`in-stock`, `low-stock`, `out-of-stock`).
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::UnknownStockFilter`] for any other name.
    pub fn parse_stock(name: &str) -> Result<StockStatus, CatalogError> {
        match name.trim().to_lowercase().as_str() {
            "in-stock" => Ok(StockStatus::InStock),
            "low-stock" => Ok(StockStatus::Low),
            "out-of-stock" => Ok(StockStatus::OutOfStock),
            other => Err(CatalogError::UnknownStockFilter(other.to_string())),
        }
    }

    /// Whether an item passes every configured criterion.
    #[must_use]
    pub fn matches(&self, item: &CatalogItem) -> bool {
        self.matches_search(item) && self.matches_category(item) && self.matches_stock(item)
    }

    /// Items passing the filter, in catalog order.
    #[must_use]
    pub fn apply<'a>(&self, items: &'a [CatalogItem]) -> Vec<&'a CatalogItem> {
        items.iter().filter(|item| self.matches(item)).collect()
    }

    fn matches_search(&self, item: &CatalogItem) -> bool {
        let Some(term) = self.search.as_deref().map(str::to_lowercase) else {
            return true;
        };

        if term.is_empty() {
            return true;
        }

        let contains = |field: &str| field.to_lowercase().contains(&term);

        contains(&item.name)
            || item.author.as_deref().is_some_and(contains)
            || contains(&item.item_code)
    }

    fn matches_category(&self, item: &CatalogItem) -> bool {
        self.category
            .as_deref()
            .is_none_or(|category| category.is_empty() || item.category == category)
    }

    fn matches_stock(&self, item: &CatalogItem) -> bool {
        self.stock.is_none_or(|stock| item.stock_status() == stock)
    }
}
