//! API Models

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use quire::{
    bill::BillSubmission, catalog::CatalogItem, orders::OrderStatus,
    serde_helpers::null_as_default,
};

/// A new storefront order has the same shape as a seller bill.
pub type OrderRequest = BillSubmission;

/// Username and password for either login endpoint.
#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct Credentials {
    /// Account username.
    pub username: String,

    /// Account password.
    pub password: String,
}

impl Credentials {
    /// Create a credential pair.
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// The signed-in account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    /// User identifier.
    pub id: u64,

    /// Login name.
    #[serde(default, deserialize_with = "null_as_default")]
    pub username: String,

    /// Role name, e.g. `ADMIN`.
    #[serde(default)]
    pub role: Option<String>,
}

impl UserProfile {
    /// Whether the account has the `ADMIN` role.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.role
            .as_deref()
            .is_some_and(|role| role.eq_ignore_ascii_case("ADMIN"))
    }
}

/// A customer, as held in the storefront session and listed in the console.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerProfile {
    /// Customer identifier.
    pub id: u64,

    /// Account number, e.g. `ACC123456789`.
    #[serde(default, deserialize_with = "null_as_default")]
    pub account_number: String,

    /// Full name.
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,

    /// Email address, empty when unknown.
    #[serde(default, deserialize_with = "null_as_default")]
    pub email: String,

    /// Telephone number.
    #[serde(default, deserialize_with = "null_as_default")]
    pub telephone: String,

    /// Postal address, empty when unknown.
    #[serde(default, deserialize_with = "null_as_default")]
    pub address: String,
}

/// Console customer listings use the same record as the storefront session.
pub type CustomerRecord = CustomerProfile;

/// Response of `POST /public/customer/login`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CustomerLogin {
    /// The signed-in user.
    pub user: UserProfile,

    /// The customer profile linked to the user.
    pub customer: CustomerProfile,
}

/// Body of `POST /public/customer/register`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Registration {
    /// Full name.
    pub name: String,

    /// Optional email, sent as `null` when absent.
    pub email: Option<String>,

    /// Ten character telephone number.
    pub telephone: String,

    /// Optional address, sent as `null` when absent.
    pub address: Option<String>,

    /// Login name.
    pub username: String,

    /// Login password.
    pub password: String,

    /// Client-generated account number hint.
    pub account_number: String,
}

/// Response of `POST /public/customer/register`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationReceipt {
    /// Identifier of the new customer.
    pub customer_id: u64,

    /// Account number assigned by the server.
    #[serde(default, deserialize_with = "null_as_default")]
    pub account_number: String,
}

/// Body of `PUT /public/customer/profile/{id}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ProfileUpdate {
    /// Full name.
    pub name: String,

    /// Email address.
    pub email: String,

    /// Telephone number.
    pub telephone: String,

    /// Postal address.
    pub address: String,
}

impl ProfileUpdate {
    /// Start from the current profile so unchanged fields are resent as they are.
    #[must_use]
    pub fn from_profile(profile: &CustomerProfile) -> Self {
        Self {
            name: profile.name.clone(),
            email: profile.email.clone(),
            telephone: profile.telephone.clone(),
            address: profile.address.clone(),
        }
    }
}

/// Response of `PUT /public/customer/profile/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub(crate) struct ProfileUpdated {
    #[serde(default)]
    pub customer: Option<CustomerProfile>,
}

/// Response of `POST /public/customer/order`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderReceipt {
    /// Bill number assigned by the server.
    #[serde(default, deserialize_with = "null_as_default")]
    pub bill_number: String,

    /// Amount the server charged.
    #[serde(default)]
    pub total_amount: Option<Decimal>,

    /// Status of the new bill.
    #[serde(default)]
    pub status: Option<OrderStatus>,
}

/// A console user account.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    /// User identifier.
    pub id: u64,

    /// Login name.
    #[serde(default, deserialize_with = "null_as_default")]
    pub username: String,

    /// Role name.
    #[serde(default)]
    pub role: Option<String>,

    /// Whether the account may sign in.
    #[serde(default)]
    pub enabled: Option<bool>,
}

/// Body for creating or updating a console user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserForm {
    /// Login name.
    pub username: String,

    /// New password. Left out of the request when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,

    /// Role name.
    pub role: String,

    /// Whether the account may sign in.
    pub enabled: bool,
}

/// Body for creating or updating a customer from the console.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerForm {
    /// Full name.
    pub name: String,

    /// Email address.
    pub email: String,

    /// Telephone number.
    pub telephone: String,

    /// Postal address.
    pub address: String,

    /// Account number. Only sent on update; the server assigns one on create.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account_number: Option<String>,
}

impl From<&CustomerRecord> for CustomerForm {
    fn from(customer: &CustomerRecord) -> Self {
        Self {
            name: customer.name.clone(),
            email: customer.email.clone(),
            telephone: customer.telephone.clone(),
            address: customer.address.clone(),
            account_number: Some(customer.account_number.clone()),
        }
    }
}

/// Body for creating or updating a catalog item from the console.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemForm {
    /// Display name.
    pub name: String,

    /// Description.
    pub description: String,

    /// Category.
    pub category: String,

    /// Unit price.
    pub price: Decimal,

    /// Units in stock.
    pub stock_quantity: i64,

    /// Item code. Only sent on update; the server assigns one on create.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item_code: Option<String>,
}

impl From<&CatalogItem> for ItemForm {
    fn from(item: &CatalogItem) -> Self {
        Self {
            name: item.name.clone(),
            description: item.description.clone(),
            category: item.category.clone(),
            price: item.price,
            stock_quantity: item.stock_quantity,
            item_code: Some(item.item_code.clone()),
        }
    }
}
