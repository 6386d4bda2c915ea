//! Console renderers.

use std::io;

use rusty_money::iso::Currency;
use tabled::builder::Builder;

use quire::{bill::BillDraft, catalog::CatalogItem, money::format_money, orders::Order};

use crate::{
    api::models::{CustomerRecord, UserRecord},
    console::{DashboardStats, dashboard::DASHBOARD_LOW_STOCK},
    render::{RenderError, format_date, storefront, write_empty, write_summary, write_table},
    router::ConsoleSection,
    session::Session,
};

/// Write the dashboard counts.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn dashboard(mut out: impl io::Write, stats: &DashboardStats) -> Result<(), RenderError> {
    let low_stock_label = format!("Low stock (<{DASHBOARD_LOW_STOCK}):");

    write_summary(
        &mut out,
        &[
            ("Customers:", stats.customers.to_string()),
            ("Items:", stats.items.to_string()),
            ("Bills:", stats.bills.to_string()),
            (low_stock_label.as_str(), stats.low_stock.to_string()),
        ],
    )
}

/// Write the signed-in user and the sections they may open.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn menu(mut out: impl io::Write, session: &Session) -> Result<(), RenderError> {
    let sections: Vec<&str> = ConsoleSection::menu_for(&session.user)
        .into_iter()
        .map(ConsoleSection::name)
        .collect();

    writeln!(
        out,
        "{} ({}): {}",
        session.user.username,
        session.user.role.as_deref().unwrap_or("N/A"),
        sections.join(", ")
    )?;

    Ok(())
}

/// Write console users.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn users(mut out: impl io::Write, users: &[UserRecord]) -> Result<(), RenderError> {
    if users.is_empty() {
        return write_empty(&mut out, "No users found.");
    }

    let mut builder = Builder::default();

    builder.push_record(["ID", "Username", "Role", "Enabled"]);

    for user in users {
        builder.push_record([
            user.id.to_string(),
            user.username.clone(),
            user.role.clone().unwrap_or_else(|| "N/A".to_string()),
            match user.enabled {
                Some(true) => "yes",
                Some(false) => "no",
                None => "N/A",
            }
            .to_string(),
        ]);
    }

    write_table(&mut out, builder, 0..1)
}

/// Write customer records.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn customers(mut out: impl io::Write, customers: &[CustomerRecord]) -> Result<(), RenderError> {
    if customers.is_empty() {
        return write_empty(&mut out, "No customers found.");
    }

    let mut builder = Builder::default();

    builder.push_record(["ID", "Account", "Name", "Email", "Telephone", "Address"]);

    for customer in customers {
        builder.push_record([
            customer.id.to_string(),
            customer.account_number.clone(),
            customer.name.clone(),
            customer.email.clone(),
            customer.telephone.clone(),
            customer.address.clone(),
        ]);
    }

    write_table(&mut out, builder, 0..1)
}

/// Write catalog items with their stock level as the console sees it.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn items(
    mut out: impl io::Write,
    items: &[CatalogItem],
    currency: &'static Currency,
) -> Result<(), RenderError> {
    if items.is_empty() {
        return write_empty(&mut out, "No items found.");
    }

    let mut builder = Builder::default();

    builder.push_record(["ID", "Code", "Name", "Category", "Price", "Stock", ""]);

    for item in items {
        builder.push_record([
            item.id.to_string(),
            item.item_code.clone(),
            item.name.clone(),
            item.category.clone(),
            format_money(item.price, currency),
            item.stock_quantity.to_string(),
            if item.stock_quantity < DASHBOARD_LOW_STOCK {
                "low".to_string()
            } else {
                String::new()
            },
        ]);
    }

    write_table(&mut out, builder, 4..6)
}

/// Write the bill list.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn bills(
    mut out: impl io::Write,
    bills: &[Order],
    currency: &'static Currency,
) -> Result<(), RenderError> {
    if bills.is_empty() {
        return write_empty(&mut out, "No bills found.");
    }

    let mut builder = Builder::default();

    builder.push_record(["ID", "Bill Number", "Customer", "Total", "Status", "Date"]);

    for bill in bills {
        builder.push_record([
            bill.id.to_string(),
            if bill.bill_number.is_empty() {
                bill.id.to_string()
            } else {
                bill.bill_number.clone()
            },
            bill.customer
                .as_ref()
                .map_or_else(|| "N/A".to_string(), |customer| customer.name.clone()),
            format_money(bill.total_amount, currency),
            bill.status.to_string(),
            format_date(bill.bill_date.as_deref()),
        ]);
    }

    write_table(&mut out, builder, 3..4)
}

/// Write a stored bill with its customer and lines.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn bill_detail(
    mut out: impl io::Write,
    bill: &Order,
    currency: &'static Currency,
) -> Result<(), RenderError> {
    if let Some(customer) = &bill.customer {
        writeln!(out, "Customer: {} (#{})", customer.name, customer.id)?;
    }

    storefront::order_detail(out, bill, currency)
}

/// Write the bill draft and its customer.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn bill_draft(
    mut out: impl io::Write,
    draft: &BillDraft,
    customer: Option<&CustomerRecord>,
    currency: &'static Currency,
) -> Result<(), RenderError> {
    match customer {
        Some(customer) => writeln!(out, "Billing {} ({})", customer.name, customer.account_number)?,
        None => writeln!(out, "No customer selected.")?,
    }

    if draft.is_empty() {
        return write_empty(&mut out, "No items on the bill.");
    }

    let mut builder = Builder::default();

    builder.push_record(["ID", "Item", "Unit Price", "Qty", "Total"]);

    for line in draft.lines() {
        builder.push_record([
            line.item_id.to_string(),
            line.name.clone(),
            format_money(line.unit_price, currency),
            line.quantity.to_string(),
            format_money(line.line_total, currency),
        ]);
    }

    write_table(&mut out, builder, 2..5)?;

    write_summary(&mut out, &[("Total:", format_money(draft.total(), currency))])
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::USD;
    use serde_json::json;
    use testresult::TestResult;

    use crate::api::models::UserProfile;

    use super::*;

    #[test]
    fn bills_show_customer_names_or_na() -> TestResult {
        let bills: Vec<Order> = serde_json::from_value(json!([
            {"id": 1, "billNumber": "BILL1", "customer": {"id": 7, "name": "Ada"}, "totalAmount": 12.5, "status": "PAID"},
            {"id": 2, "totalAmount": 3, "status": "PENDING"}
        ]))?;

        let mut out = Vec::new();

        super::bills(&mut out, &bills, USD)?;

        let output = String::from_utf8(out)?;

        assert!(output.contains("Ada"));
        assert!(output.contains("N/A"));
        assert!(output.contains("$12.50"));

        Ok(())
    }

    #[test]
    fn draft_lists_lines_and_total() -> TestResult {
        let item: CatalogItem = serde_json::from_value(json!({
            "id": 1, "name": "Dune", "price": 12.5, "stockQuantity": 4
        }))?;
        let mut draft = BillDraft::new();

        draft.add_line(&item, 2)?;

        let mut out = Vec::new();

        bill_draft(&mut out, &draft, None, USD)?;

        let output = String::from_utf8(out)?;

        assert!(output.contains("No customer selected."));
        assert!(output.contains("$25.00"));

        Ok(())
    }

    #[test]
    fn menu_hides_admin_sections_from_staff() -> TestResult {
        let session = Session {
            user: UserProfile {
                id: 2,
                username: "clerk".to_string(),
                role: Some("STAFF".to_string()),
            },
            customer: None,
        };

        let mut out = Vec::new();

        menu(&mut out, &session)?;

        let output = String::from_utf8(out)?;

        assert!(output.contains("clerk (STAFF)"));
        assert!(!output.contains("users"));

        Ok(())
    }
}
