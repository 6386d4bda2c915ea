//! Cart
//!
//! The storefront cart: one line per item, merged on repeated adds, with stock checked against
//! the catalog snapshot supplied at add time. A discount code is *staged* and bound to the next
//! line that is added, never applied retroactively.

use rust_decimal::Decimal;
use serde::Serialize;
use thiserror::Error;

use crate::{
    catalog::{CatalogItem, ItemId},
    discounts::{self, DiscountCode},
};

/// Errors related to cart mutation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CartError {
    /// Quantities must be at least one.
    #[error("quantity must be at least 1")]
    InvalidQuantity,

    /// The requested quantity plus what is already in the cart exceeds stock.
    #[error(
        "cannot add {requested}: {in_cart} already in cart and only {available} available"
    )]
    StockExceeded {
        /// Quantity asked for.
        requested: u32,

        /// Quantity already held in the cart for the same item.
        in_cart: u32,

        /// Stock the server declared.
        available: i64,
    },

    /// No code was entered.
    #[error("please enter a discount code")]
    MissingDiscountCode,

    /// The code is not in the discount table.
    #[error("invalid discount code {0:?}")]
    InvalidDiscountCode(String),
}

/// Price breakdown for a quantity of one item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineTotals {
    /// Unit price times quantity.
    pub subtotal: Decimal,

    /// Amount taken off by the discount, zero without one.
    pub discount: Decimal,

    /// Subtotal less discount.
    pub total: Decimal,
}

impl LineTotals {
    /// Compute totals for a unit price and quantity with an optional discount.
    #[must_use]
    pub fn compute(unit_price: Decimal, quantity: u32, discount: Option<&DiscountCode>) -> Self {
        let subtotal = unit_price * Decimal::from(quantity);
        let discount = discount.map_or(Decimal::ZERO, |code| code.amount_off(subtotal));

        Self {
            subtotal,
            discount,
            total: subtotal - discount,
        }
    }
}

/// Aggregate totals for a whole cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CartTotals {
    /// Number of units across all lines.
    pub units: u32,

    /// Sum of line subtotals.
    pub subtotal: Decimal,

    /// Sum of line discounts.
    pub discount: Decimal,

    /// Estimated amount due. The server reprices on checkout.
    pub total: Decimal,
}

/// A single cart line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartLine {
    item_id: ItemId,
    name: String,
    unit_price: Decimal,
    quantity: u32,
    known_stock: i64,
    discount: Option<&'static DiscountCode>,
}

impl CartLine {
    /// Item identifier.
    pub fn item_id(&self) -> ItemId {
        self.item_id
    }

    /// Item name captured when the line was created.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Unit price captured when the line was created.
    pub fn unit_price(&self) -> Decimal {
        self.unit_price
    }

    /// Units of the item in the cart.
    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    /// Stock seen the last time this line was validated.
    pub fn known_stock(&self) -> i64 {
        self.known_stock
    }

    /// Discount bound to this line, if any.
    pub fn discount(&self) -> Option<&'static DiscountCode> {
        self.discount
    }

    /// Totals for this line using its bound discount.
    #[must_use]
    pub fn totals(&self) -> LineTotals {
        LineTotals::compute(self.unit_price, self.quantity, self.discount)
    }
}

/// An `{itemId, quantity}` pair as submitted to the order and bill endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderLine {
    /// Item identifier.
    pub item_id: ItemId,

    /// Units ordered.
    pub quantity: u32,
}

/// Customer cart.
#[derive(Debug, Default, Clone)]
pub struct Cart {
    lines: Vec<CartLine>,
    staged: Option<&'static DiscountCode>,
}

impl Cart {
    /// Create an empty cart.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `quantity` units of a freshly fetched catalog item, returning the line's new quantity.
    ///
    /// Merges into an existing line for the same item. Any staged discount is bound to the
    /// line and then cleared.
    ///
    /// # Errors
    ///
    /// - [`CartError::InvalidQuantity`] if `quantity` is zero.
    /// - [`CartError::StockExceeded`] if the combined quantity exceeds `item.stock_quantity`;
    ///   the cart is left unchanged.
    pub fn add_line(&mut self, item: &CatalogItem, quantity: u32) -> Result<u32, CartError> {
        if quantity == 0 {
            return Err(CartError::InvalidQuantity);
        }

        let position = self.position(item.id);
        let in_cart = position
            .and_then(|idx| self.lines.get(idx))
            .map_or(0, CartLine::quantity);

        let combined = in_cart.saturating_add(quantity);

        if i64::from(combined) > item.stock_quantity {
            return Err(CartError::StockExceeded {
                requested: quantity,
                in_cart,
                available: item.stock_quantity,
            });
        }

        let staged = self.staged.take();

        if let Some(line) = position.and_then(|idx| self.lines.get_mut(idx)) {
            line.quantity = combined;
            line.known_stock = item.stock_quantity;

            if staged.is_some() {
                line.discount = staged;
            }
        } else {
            self.lines.push(CartLine {
                item_id: item.id,
                name: item.name.clone(),
                unit_price: item.price,
                quantity: combined,
                known_stock: item.stock_quantity,
                discount: staged,
            });
        }

        Ok(combined)
    }

    /// Overwrite the quantity of a line. Zero removes it.
    ///
    /// The new quantity is checked against the line's last-known stock. Unknown items are
    /// ignored.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::StockExceeded`] if `quantity` exceeds the last-known stock; the line
    /// is left unchanged.
    pub fn update_quantity(&mut self, item_id: ItemId, quantity: u32) -> Result<(), CartError> {
        if quantity == 0 {
            self.remove_line(item_id);

            return Ok(());
        }

        let Some(line) = self.lines.iter_mut().find(|line| line.item_id == item_id) else {
            return Ok(());
        };

        if i64::from(quantity) > line.known_stock {
            return Err(CartError::StockExceeded {
                requested: quantity,
                in_cart: line.quantity,
                available: line.known_stock,
            });
        }

        line.quantity = quantity;

        Ok(())
    }

    /// Remove the line for an item, returning it if it was present.
    pub fn remove_line(&mut self, item_id: ItemId) -> Option<CartLine> {
        let idx = self.position(item_id)?;

        Some(self.lines.remove(idx))
    }

    /// Empty the cart and drop any staged discount.
    pub fn clear(&mut self) {
        self.lines.clear();
        self.staged = None;
    }

    /// Stage a discount code for the next line added.
    ///
    /// # Errors
    ///
    /// - [`CartError::MissingDiscountCode`] if the input is blank.
    /// - [`CartError::InvalidDiscountCode`] if the code is unknown; any previously staged
    ///   discount is kept.
    pub fn apply_discount(&mut self, code: &str) -> Result<&'static DiscountCode, CartError> {
        let normalised = discounts::normalise(code);

        if normalised.is_empty() {
            return Err(CartError::MissingDiscountCode);
        }

        let discount =
            discounts::lookup(&normalised).ok_or(CartError::InvalidDiscountCode(normalised))?;

        self.staged = Some(discount);

        Ok(discount)
    }

    /// Drop the staged discount without adding anything.
    pub fn cancel_staged_discount(&mut self) -> Option<&'static DiscountCode> {
        self.staged.take()
    }

    /// Currently staged discount.
    pub fn staged_discount(&self) -> Option<&'static DiscountCode> {
        self.staged
    }

    /// Preview totals for adding `quantity` units at `unit_price` with the staged discount.
    #[must_use]
    pub fn compute_totals(&self, unit_price: Decimal, quantity: u32) -> LineTotals {
        LineTotals::compute(unit_price, quantity, self.staged)
    }

    /// Totals across all lines, using each line's bound discount.
    #[must_use]
    pub fn totals(&self) -> CartTotals {
        self.lines.iter().fold(
            CartTotals {
                units: 0,
                subtotal: Decimal::ZERO,
                discount: Decimal::ZERO,
                total: Decimal::ZERO,
            },
            |acc, line| {
                let line_totals = line.totals();

                CartTotals {
                    units: acc.units.saturating_add(line.quantity),
                    subtotal: acc.subtotal + line_totals.subtotal,
                    discount: acc.discount + line_totals.discount,
                    total: acc.total + line_totals.total,
                }
            },
        )
    }

    /// Lines as submitted on checkout. Prices are never sent.
    #[must_use]
    pub fn order_lines(&self) -> Vec<OrderLine> {
        self.lines
            .iter()
            .map(|line| OrderLine {
                item_id: line.item_id,
                quantity: line.quantity,
            })
            .collect()
    }

    /// Line for an item.
    pub fn line(&self, item_id: ItemId) -> Option<&CartLine> {
        self.lines.iter().find(|line| line.item_id == item_id)
    }

    /// Cart lines in insertion order.
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Number of distinct lines.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Whether the cart has no lines.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    fn position(&self, item_id: ItemId) -> Option<usize> {
        self.lines.iter().position(|line| line.item_id == item_id)
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use testresult::TestResult;

    use crate::catalog::fixtures::book;

    use super::*;

    #[test]
    fn add_line_appends_new_items_in_order() -> TestResult {
        let mut cart = Cart::new();

        cart.add_line(&book(1, "Dune", 1299, 10), 1)?;
        cart.add_line(&book(2, "Emma", 799, 10), 2)?;

        let ids: Vec<ItemId> = cart.lines().iter().map(CartLine::item_id).collect();

        assert_eq!(ids, vec![1, 2]);
        assert_eq!(cart.totals().units, 3);

        Ok(())
    }

    #[test]
    fn add_line_merges_repeated_items() -> TestResult {
        let mut cart = Cart::new();
        let dune = book(1, "Dune", 1299, 10);

        cart.add_line(&dune, 2)?;
        cart.add_line(&dune, 3)?;

        assert_eq!(cart.len(), 1);
        assert_eq!(cart.line(1).map(CartLine::quantity), Some(5));

        Ok(())
    }

    #[test]
    fn add_line_rejects_zero_quantity() {
        let mut cart = Cart::new();

        let result = cart.add_line(&book(1, "Dune", 1299, 10), 0);

        assert_eq!(result.err(), Some(CartError::InvalidQuantity));
        assert!(cart.is_empty());
    }

    #[test]
    fn add_line_over_stock_leaves_cart_unchanged() -> TestResult {
        let mut cart = Cart::new();
        let dune = book(1, "Dune", 1299, 4);

        cart.add_line(&dune, 3)?;

        let result = cart.add_line(&dune, 2);

        assert_eq!(
            result.err(),
            Some(CartError::StockExceeded {
                requested: 2,
                in_cart: 3,
                available: 4,
            })
        );
        assert_eq!(cart.line(1).map(CartLine::quantity), Some(3));

        Ok(())
    }

    #[test]
    fn add_line_keeps_first_unit_price_but_refreshes_stock() -> TestResult {
        let mut cart = Cart::new();
        let dune = book(1, "Dune", 1299, 4);
        let mut repriced = dune.clone();
        repriced.price = Decimal::new(1500, 2);
        repriced.stock_quantity = 9;

        cart.add_line(&dune, 1)?;
        cart.add_line(&repriced, 1)?;

        let line = cart.line(1).ok_or("missing line")?;

        assert_eq!(line.unit_price(), Decimal::new(1299, 2));
        assert_eq!(line.known_stock(), 9);

        Ok(())
    }

    #[test]
    fn staged_discount_binds_to_next_line_only() -> TestResult {
        let mut cart = Cart::new();

        cart.add_line(&book(1, "Dune", 2000, 10), 1)?;
        cart.apply_discount("student10")?;
        cart.add_line(&book(2, "Emma", 2000, 10), 1)?;
        cart.add_line(&book(3, "Ulysses", 2000, 10), 1)?;

        let codes: Vec<Option<&str>> = cart
            .lines()
            .iter()
            .map(|line| line.discount().map(|d| d.code))
            .collect();

        assert_eq!(codes, vec![None, Some("STUDENT10"), None]);
        assert!(cart.staged_discount().is_none());

        Ok(())
    }

    #[test]
    fn merge_rebinds_discount_when_one_is_staged() -> TestResult {
        let mut cart = Cart::new();
        let dune = book(1, "Dune", 2000, 10);

        cart.apply_discount("WELCOME5")?;
        cart.add_line(&dune, 1)?;
        cart.add_line(&dune, 1)?;

        assert_eq!(
            cart.line(1).and_then(CartLine::discount).map(|d| d.code),
            Some("WELCOME5")
        );

        cart.apply_discount("BULK15")?;
        cart.add_line(&dune, 1)?;

        assert_eq!(
            cart.line(1).and_then(CartLine::discount).map(|d| d.code),
            Some("BULK15")
        );

        Ok(())
    }

    #[test]
    fn failed_add_keeps_staged_discount() -> TestResult {
        let mut cart = Cart::new();

        cart.apply_discount("NEWUSER20")?;

        let result = cart.add_line(&book(1, "Dune", 2000, 1), 2);

        assert!(result.is_err());
        assert_eq!(cart.staged_discount().map(|d| d.code), Some("NEWUSER20"));

        Ok(())
    }

    #[test]
    fn compute_totals_with_staged_ten_percent() -> TestResult {
        let mut cart = Cart::new();

        cart.apply_discount("STUDENT10")?;

        let totals = cart.compute_totals(Decimal::from_str("20.00")?, 3);

        assert_eq!(totals.subtotal, Decimal::from_str("60.00")?);
        assert_eq!(totals.discount, Decimal::from_str("6.00")?);
        assert_eq!(totals.total, Decimal::from_str("54.00")?);

        Ok(())
    }

    #[test]
    fn compute_totals_without_discount() -> TestResult {
        let cart = Cart::new();

        let totals = cart.compute_totals(Decimal::from_str("12.50")?, 2);

        assert_eq!(totals.discount, Decimal::ZERO);
        assert_eq!(totals.total, Decimal::from_str("25.00")?);

        Ok(())
    }

    #[test]
    fn unknown_code_keeps_previous_staged_discount() -> TestResult {
        let mut cart = Cart::new();

        cart.apply_discount("BULK15")?;

        let result = cart.apply_discount("FAKE10");

        assert_eq!(
            result.err(),
            Some(CartError::InvalidDiscountCode("FAKE10".to_string()))
        );
        assert_eq!(cart.staged_discount().map(|d| d.code), Some("BULK15"));

        Ok(())
    }

    #[test]
    fn blank_code_is_rejected() {
        let mut cart = Cart::new();

        assert_eq!(
            cart.apply_discount("   ").err(),
            Some(CartError::MissingDiscountCode)
        );
    }

    #[test]
    fn update_quantity_zero_removes_line() -> TestResult {
        let mut cart = Cart::new();

        cart.add_line(&book(1, "Dune", 1299, 10), 2)?;
        cart.update_quantity(1, 0)?;

        assert!(cart.is_empty());

        Ok(())
    }

    #[test]
    fn update_quantity_revalidates_against_known_stock() -> TestResult {
        let mut cart = Cart::new();

        cart.add_line(&book(1, "Dune", 1299, 5), 2)?;

        assert_eq!(
            cart.update_quantity(1, 6).err(),
            Some(CartError::StockExceeded {
                requested: 6,
                in_cart: 2,
                available: 5,
            })
        );

        cart.update_quantity(1, 5)?;

        assert_eq!(cart.line(1).map(CartLine::quantity), Some(5));

        Ok(())
    }

    #[test]
    fn update_quantity_for_unknown_item_is_a_no_op() -> TestResult {
        let mut cart = Cart::new();

        cart.update_quantity(42, 3)?;

        assert!(cart.is_empty());

        Ok(())
    }

    #[test]
    fn remove_line_is_identity_based() -> TestResult {
        let mut cart = Cart::new();

        cart.add_line(&book(1, "Dune", 1299, 10), 1)?;
        cart.add_line(&book(2, "Emma", 799, 10), 1)?;

        assert_eq!(cart.remove_line(1).map(|l| l.item_id()), Some(1));
        assert!(cart.remove_line(1).is_none());
        assert_eq!(cart.len(), 1);

        Ok(())
    }

    #[test]
    fn clear_drops_lines_and_staged_discount() -> TestResult {
        let mut cart = Cart::new();

        cart.add_line(&book(1, "Dune", 1299, 10), 1)?;
        cart.apply_discount("WELCOME5")?;
        cart.clear();

        assert!(cart.is_empty());
        assert!(cart.staged_discount().is_none());

        Ok(())
    }

    #[test]
    fn totals_include_bound_discounts() -> TestResult {
        let mut cart = Cart::new();

        cart.apply_discount("STUDENT10")?;
        cart.add_line(&book(1, "Dune", 2000, 10), 3)?;
        cart.add_line(&book(2, "Emma", 1000, 10), 1)?;

        let totals = cart.totals();

        assert_eq!(totals.units, 4);
        assert_eq!(totals.subtotal, Decimal::from_str("70.00")?);
        assert_eq!(totals.discount, Decimal::from_str("6.00")?);
        assert_eq!(totals.total, Decimal::from_str("64.00")?);

        Ok(())
    }

    #[test]
    fn order_lines_carry_ids_and_quantities_only() -> TestResult {
        let mut cart = Cart::new();

        cart.add_line(&book(4, "Dune", 1299, 10), 2)?;

        assert_eq!(
            cart.order_lines(),
            vec![OrderLine {
                item_id: 4,
                quantity: 2,
            }]
        );

        Ok(())
    }
}
