//! Cart behaviour through the public API.

use std::str::FromStr;

use proptest::prelude::*;
use rust_decimal::Decimal;
use testresult::TestResult;

use quire::prelude::*;

fn item(id: ItemId, price: &str, stock: i64) -> Result<CatalogItem, rust_decimal::Error> {
    Ok(CatalogItem {
        id,
        name: format!("Book {id}"),
        price: Decimal::from_str(price)?,
        stock_quantity: stock,
        category: "Fiction".to_string(),
        item_code: format!("ITEM{id}"),
        description: String::new(),
        author: None,
        publisher: None,
        publication_year: None,
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn repeated_adds_sum_into_a_single_line(
        quantities in prop::collection::vec(1_u32..20, 1..16)
    ) {
        let book = item(1, "9.99", quantities.iter().map(|&q| i64::from(q)).sum())?;
        let mut cart = Cart::new();
        let mut expected = 0_u32;

        for quantity in quantities {
            expected += quantity;

            prop_assert_eq!(cart.add_line(&book, quantity)?, expected);
            prop_assert_eq!(cart.len(), 1);
            prop_assert_eq!(cart.line(1).map(CartLine::quantity), Some(expected));
        }
    }

    #[test]
    fn rejected_adds_leave_the_cart_unchanged(
        stock in 0_i64..60,
        quantities in prop::collection::vec(0_u32..25, 1..16)
    ) {
        let book = item(1, "9.99", stock)?;
        let mut cart = Cart::new();
        let mut held = 0_u32;

        for quantity in quantities {
            let before = cart.clone();
            let fits = quantity > 0 && i64::from(held + quantity) <= stock;

            match cart.add_line(&book, quantity) {
                Ok(combined) => {
                    prop_assert!(fits);

                    held += quantity;

                    prop_assert_eq!(combined, held);
                }
                Err(error) => {
                    prop_assert!(!fits);
                    let expected_error = matches!(
                        error,
                        CartError::InvalidQuantity | CartError::StockExceeded { .. }
                    );
                    prop_assert!(expected_error);
                    prop_assert_eq!(cart.lines(), before.lines());
                }
            }

            prop_assert!(cart.len() <= 1);
            prop_assert_eq!(cart.line(1).map_or(0, CartLine::quantity), held);
        }
    }
}

#[test]
fn fresher_snapshot_allows_more_units() -> TestResult {
    let mut cart = Cart::new();

    cart.add_line(&item(1, "9.99", 2)?, 2)?;

    assert!(cart.add_line(&item(1, "9.99", 2)?, 1).is_err());

    cart.add_line(&item(1, "9.99", 3)?, 1)?;

    assert_eq!(cart.line(1).map(CartLine::quantity), Some(3));

    Ok(())
}

#[test]
fn discount_preview_matches_bound_line_totals() -> TestResult {
    let book = item(1, "20.00", 10)?;
    let mut cart = Cart::new();

    cart.apply_discount(" Student10 ")?;

    let preview = cart.compute_totals(book.price, 3);

    cart.add_line(&book, 3)?;

    let bound = cart.line(1).map(CartLine::totals).ok_or("missing line")?;

    assert_eq!(preview, bound);
    assert_eq!(
        format_money(bound.total, rusty_money::iso::USD),
        format_money(Decimal::from_str("54")?, rusty_money::iso::USD)
    );

    Ok(())
}
