//! Dashboard statistics.

use quire::{catalog::CatalogItem, orders::Order};

use crate::api::models::CustomerRecord;

/// Items with fewer units than this count as low stock on the dashboard.
pub const DASHBOARD_LOW_STOCK: i64 = 10;

/// Headline counts shown on the console dashboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DashboardStats {
    /// Number of customers.
    pub customers: usize,

    /// Number of catalog items.
    pub items: usize,

    /// Number of bills.
    pub bills: usize,

    /// Items with fewer than [`DASHBOARD_LOW_STOCK`] units.
    pub low_stock: usize,
}

impl DashboardStats {
    /// Count the fetched lists.
    #[must_use]
    pub fn from_lists(customers: &[CustomerRecord], items: &[CatalogItem], bills: &[Order]) -> Self {
        Self {
            customers: customers.len(),
            items: items.len(),
            bills: bills.len(),
            low_stock: items
                .iter()
                .filter(|item| item.stock_quantity < DASHBOARD_LOW_STOCK)
                .count(),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use testresult::TestResult;

    use super::*;

    #[test]
    fn low_stock_is_strictly_below_ten() -> TestResult {
        let items: Vec<CatalogItem> = serde_json::from_value(json!([
            {"id": 1, "stockQuantity": 9},
            {"id": 2, "stockQuantity": 10},
            {"id": 3, "stockQuantity": 0}
        ]))?;

        let stats = DashboardStats::from_lists(&[], &items, &[]);

        assert_eq!(stats.items, 3);
        assert_eq!(stats.low_stock, 2);

        Ok(())
    }
}
