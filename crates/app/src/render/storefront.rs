//! Storefront renderers.

use std::io;

use rusty_money::iso::Currency;
use tabled::builder::Builder;

use quire::{
    cart::{Cart, LineTotals},
    catalog::CatalogItem,
    discounts::{DISCOUNT_CODES, DiscountCode},
    money::format_money,
    orders::{Order, PurchaseReport},
};

use crate::{
    api::models::{OrderReceipt, RegistrationReceipt},
    render::{RenderError, format_date, write_empty, write_summary, write_table},
    session::Session,
};

/// Write catalog items as a table.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn catalog<'a>(
    mut out: impl io::Write,
    items: impl IntoIterator<Item = &'a CatalogItem>,
    currency: &'static Currency,
) -> Result<(), RenderError> {
    let items: Vec<&CatalogItem> = items.into_iter().collect();

    if items.is_empty() {
        return write_empty(&mut out, "No books found.");
    }

    let mut builder = Builder::default();

    builder.push_record(["ID", "Code", "Title", "Author", "Category", "Price", "Stock", "Status"]);

    for item in items {
        builder.push_record([
            item.id.to_string(),
            item.item_code.clone(),
            item.name.clone(),
            item.author.clone().unwrap_or_default(),
            item.category.clone(),
            format_money(item.price, currency),
            item.stock_quantity.to_string(),
            item.stock_status().to_string(),
        ]);
    }

    write_table(&mut out, builder, 5..7)
}

/// Write the cart lines, totals and any staged discount.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn cart(
    mut out: impl io::Write,
    cart: &Cart,
    currency: &'static Currency,
) -> Result<(), RenderError> {
    if cart.is_empty() {
        write_empty(&mut out, "Your cart is empty.")?;
    } else {
        let mut builder = Builder::default();

        builder.push_record(["ID", "Title", "Unit Price", "Qty", "Subtotal", "Discount", "Total"]);

        for line in cart.lines() {
            let totals = line.totals();

            builder.push_record([
                line.item_id().to_string(),
                line.name().to_string(),
                format_money(line.unit_price(), currency),
                line.quantity().to_string(),
                format_money(totals.subtotal, currency),
                line.discount()
                    .map(|code| format!("{} ({})", format_money(totals.discount, currency), code.code))
                    .unwrap_or_default(),
                format_money(totals.total, currency),
            ]);
        }

        write_table(&mut out, builder, 2..7)?;

        let totals = cart.totals();

        write_summary(
            &mut out,
            &[
                ("Items:", totals.units.to_string()),
                ("Subtotal:", format_money(totals.subtotal, currency)),
                ("Discount:", format_money(totals.discount, currency)),
                ("Estimated total:", format_money(totals.total, currency)),
            ],
        )?;
    }

    if let Some(code) = cart.staged_discount() {
        writeln!(
            out,
            "Discount {} ({}) will apply to the next item you add.",
            code.code, code.description
        )?;
    }

    Ok(())
}

/// Write the price preview shown before adding an item.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn line_preview(
    mut out: impl io::Write,
    totals: &LineTotals,
    staged: Option<&DiscountCode>,
    currency: &'static Currency,
) -> Result<(), RenderError> {
    let discount_label = staged.map_or_else(
        || "Discount:".to_string(),
        |code| format!("Discount ({}%):", code.percentage),
    );

    write_summary(
        &mut out,
        &[
            ("Subtotal:", format_money(totals.subtotal, currency)),
            (discount_label.as_str(), format_money(totals.discount, currency)),
            ("Total:", format_money(totals.total, currency)),
        ],
    )
}

/// Write the accepted discount codes.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn discount_codes(mut out: impl io::Write) -> Result<(), RenderError> {
    let mut builder = Builder::default();

    builder.push_record(["Code", "Discount", "Description"]);

    for code in &DISCOUNT_CODES {
        builder.push_record([
            code.code.to_string(),
            format!("{}%", code.percentage),
            code.description.to_string(),
        ]);
    }

    write_table(&mut out, builder, 1..2)
}

/// Write an order history.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn orders(
    mut out: impl io::Write,
    orders: &[Order],
    currency: &'static Currency,
) -> Result<(), RenderError> {
    if orders.is_empty() {
        return write_empty(&mut out, "No orders found.");
    }

    let mut builder = Builder::default();

    builder.push_record(["ID", "Bill Number", "Date", "Items", "Total", "Status"]);

    for order in orders {
        builder.push_record([
            order.id.to_string(),
            order.bill_number.clone(),
            format_date(order.bill_date.as_deref()),
            order.bill_items.len().to_string(),
            format_money(order.total_amount, currency),
            order.status.to_string(),
        ]);
    }

    write_table(&mut out, builder, 3..5)
}

/// Write one order with its lines.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn order_detail(
    mut out: impl io::Write,
    order: &Order,
    currency: &'static Currency,
) -> Result<(), RenderError> {
    writeln!(
        out,
        "Bill {} ({}) on {}",
        order.bill_number,
        order.status,
        format_date(order.bill_date.as_deref())
    )?;

    let mut builder = Builder::default();

    builder.push_record(["Item", "Qty", "Unit Price", "Total"]);

    for line in &order.bill_items {
        builder.push_record([
            line.item
                .as_ref()
                .map_or_else(|| "N/A".to_string(), |item| item.name.clone()),
            line.quantity.to_string(),
            format_money(line.unit_price, currency),
            format_money(line.total_price, currency),
        ]);
    }

    write_table(&mut out, builder, 1..4)?;

    write_summary(&mut out, &[("Total:", format_money(order.total_amount, currency))])
}

/// Write the purchase report.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn report(
    mut out: impl io::Write,
    report: &PurchaseReport,
    currency: &'static Currency,
) -> Result<(), RenderError> {
    write_summary(
        &mut out,
        &[
            ("Total orders:", report.total_orders.to_string()),
            ("Total spent:", format_money(report.total_spent, currency)),
            ("Completed:", report.completed.to_string()),
            ("Pending:", report.pending.to_string()),
        ],
    )
}

/// Write the signed-in customer's profile.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn profile(mut out: impl io::Write, session: &Session) -> Result<(), RenderError> {
    let Some(customer) = &session.customer else {
        return write_empty(&mut out, "No customer profile.");
    };

    write_summary(
        &mut out,
        &[
            ("Username:", session.user.username.clone()),
            ("Account number:", customer.account_number.clone()),
            ("Name:", customer.name.clone()),
            ("Email:", customer.email.clone()),
            ("Telephone:", customer.telephone.clone()),
            ("Address:", customer.address.clone()),
        ],
    )
}

/// Write the result of a successful checkout.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn order_receipt(
    mut out: impl io::Write,
    receipt: &OrderReceipt,
    currency: &'static Currency,
) -> Result<(), RenderError> {
    write!(out, "Order placed successfully! Bill Number: {}", receipt.bill_number)?;

    if let Some(total) = receipt.total_amount {
        write!(out, ", charged {}", format_money(total, currency))?;
    }

    writeln!(out)?;

    Ok(())
}

/// Write the result of a successful registration.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn registration(mut out: impl io::Write, receipt: &RegistrationReceipt) -> Result<(), RenderError> {
    writeln!(
        out,
        "Registration successful! Account {} created. You can now log in.",
        receipt.account_number
    )?;

    Ok(())
}
