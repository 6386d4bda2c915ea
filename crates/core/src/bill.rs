//! Bill draft
//!
//! Seller-side line accumulation before a bill is submitted. Lines merge by item, stock is
//! checked against the snapshot taken when the item was selected and there is no discount
//! concept.

use rust_decimal::Decimal;
use serde::Serialize;
use thiserror::Error;

use crate::{
    cart::OrderLine,
    catalog::{CatalogItem, ItemId},
};

/// Customer identifier used when submitting a bill.
pub type CustomerId = u64;

/// Errors related to building or submitting a bill draft.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BillError {
    /// Quantities must be at least one.
    #[error("quantity must be at least 1")]
    InvalidQuantity,

    /// The requested quantity plus what is already drafted exceeds stock.
    #[error("quantity exceeds available stock ({requested} requested, {in_draft} drafted, {available} available)")]
    StockExceeded {
        /// Quantity asked for.
        requested: u32,

        /// Quantity already on the draft for the same item.
        in_draft: u32,

        /// Stock in the snapshot.
        available: i64,
    },

    /// Nothing to submit.
    #[error("add items to the bill first")]
    EmptyBill,
}

/// One drafted bill line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BillLine {
    /// Item identifier.
    pub item_id: ItemId,

    /// Item name at selection time.
    pub name: String,

    /// Unit price at selection time.
    pub unit_price: Decimal,

    /// Units drafted.
    pub quantity: u32,

    /// `unit_price * quantity`, kept in step with `quantity`.
    pub line_total: Decimal,
}

/// Payload for `POST /bills`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BillSubmission {
    /// Customer being billed.
    pub customer_id: CustomerId,

    /// Items and quantities. Prices are left to the server.
    pub items: Vec<OrderLine>,
}

/// Seller bill draft.
#[derive(Debug, Default, Clone)]
pub struct BillDraft {
    lines: Vec<BillLine>,
}

impl BillDraft {
    /// Create an empty draft.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add units of an item from the latest stock snapshot, returning the line's new quantity.
    ///
    /// # Errors
    ///
    /// - [`BillError::InvalidQuantity`] if `quantity` is zero.
    /// - [`BillError::StockExceeded`] if the drafted total would exceed the snapshot's stock;
    ///   the draft is left unchanged.
    pub fn add_line(&mut self, item: &CatalogItem, quantity: u32) -> Result<u32, BillError> {
        if quantity == 0 {
            return Err(BillError::InvalidQuantity);
        }

        let existing = self.lines.iter_mut().find(|line| line.item_id == item.id);
        let in_draft = existing.as_ref().map_or(0, |line| line.quantity);
        let combined = in_draft.saturating_add(quantity);

        if i64::from(combined) > item.stock_quantity {
            return Err(BillError::StockExceeded {
                requested: quantity,
                in_draft,
                available: item.stock_quantity,
            });
        }

        match existing {
            Some(line) => {
                line.quantity = combined;
                line.line_total = line.unit_price * Decimal::from(combined);
            }
            None => self.lines.push(BillLine {
                item_id: item.id,
                name: item.name.clone(),
                unit_price: item.price,
                quantity: combined,
                line_total: item.price * Decimal::from(combined),
            }),
        }

        Ok(combined)
    }

    /// Remove the line for an item, returning it if present.
    pub fn remove_line(&mut self, item_id: ItemId) -> Option<BillLine> {
        let idx = self.lines.iter().position(|line| line.item_id == item_id)?;

        Some(self.lines.remove(idx))
    }

    /// Discard every drafted line.
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Sum of line totals.
    #[must_use]
    pub fn total(&self) -> Decimal {
        self.lines.iter().map(|line| line.line_total).sum()
    }

    /// Build the submission payload for a customer.
    ///
    /// # Errors
    ///
    /// Returns [`BillError::EmptyBill`] if nothing has been drafted.
    pub fn submission(&self, customer_id: CustomerId) -> Result<BillSubmission, BillError> {
        if self.is_empty() {
            return Err(BillError::EmptyBill);
        }

        Ok(BillSubmission {
            customer_id,
            items: self
                .lines
                .iter()
                .map(|line| OrderLine {
                    item_id: line.item_id,
                    quantity: line.quantity,
                })
                .collect(),
        })
    }

    /// Drafted lines in insertion order.
    pub fn lines(&self) -> &[BillLine] {
        &self.lines
    }

    /// Number of distinct lines.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Whether nothing has been drafted.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use testresult::TestResult;

    use crate::catalog::fixtures::book;

    use super::*;

    #[test]
    fn add_line_merges_and_recomputes_line_total() -> TestResult {
        let mut draft = BillDraft::new();
        let atlas = book(2, "World Atlas", 2500, 10);

        draft.add_line(&atlas, 1)?;
        draft.add_line(&atlas, 2)?;

        let line = draft.lines().first().ok_or("missing line")?;

        assert_eq!(draft.len(), 1);
        assert_eq!(line.quantity, 3);
        assert_eq!(line.line_total, Decimal::from_str("75.00")?);

        Ok(())
    }

    #[test]
    fn add_line_checks_combined_quantity_against_snapshot() -> TestResult {
        let mut draft = BillDraft::new();
        let atlas = book(2, "World Atlas", 2500, 3);

        draft.add_line(&atlas, 2)?;

        assert_eq!(
            draft.add_line(&atlas, 2).err(),
            Some(BillError::StockExceeded {
                requested: 2,
                in_draft: 2,
                available: 3,
            })
        );
        assert_eq!(draft.total(), Decimal::from_str("50.00")?);

        Ok(())
    }

    #[test]
    fn zero_quantity_is_rejected() {
        let mut draft = BillDraft::new();

        assert_eq!(
            draft.add_line(&book(1, "Dune", 1299, 5), 0).err(),
            Some(BillError::InvalidQuantity)
        );
    }

    #[test]
    fn remove_line_targets_the_item_not_a_position() -> TestResult {
        let mut draft = BillDraft::new();

        draft.add_line(&book(1, "Dune", 1299, 5), 1)?;
        draft.add_line(&book(2, "Emma", 799, 5), 1)?;
        draft.add_line(&book(3, "Ulysses", 1500, 5), 1)?;

        draft.remove_line(2);

        let ids: Vec<ItemId> = draft.lines().iter().map(|line| line.item_id).collect();

        assert_eq!(ids, vec![1, 3]);
        assert!(draft.remove_line(2).is_none());

        Ok(())
    }

    #[test]
    fn submission_requires_lines() {
        let draft = BillDraft::new();

        assert_eq!(draft.submission(7).err(), Some(BillError::EmptyBill));
    }

    #[test]
    fn submission_lists_items_without_prices() -> TestResult {
        let mut draft = BillDraft::new();

        draft.add_line(&book(1, "Dune", 1299, 5), 2)?;

        let submission = draft.submission(7)?;

        assert_eq!(submission.customer_id, 7);
        assert_eq!(
            submission.items,
            vec![OrderLine {
                item_id: 1,
                quantity: 2,
            }]
        );

        Ok(())
    }

    #[test]
    fn clear_empties_the_draft() -> TestResult {
        let mut draft = BillDraft::new();

        draft.add_line(&book(1, "Dune", 1299, 5), 2)?;
        draft.clear();

        assert!(draft.is_empty());
        assert_eq!(draft.total(), Decimal::ZERO);

        Ok(())
    }
}
