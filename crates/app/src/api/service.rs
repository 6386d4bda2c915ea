//! Bookshop API service.

use std::{fmt, sync::Arc};

use async_trait::async_trait;
use mockall::automock;
use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;

use quire::{
    bill::{BillSubmission, CustomerId},
    catalog::{CatalogItem, ItemId},
    orders::{Order, OrderStatus},
};

use crate::{
    api::{
        errors::ApiError,
        models::{
            Credentials, CustomerForm, CustomerLogin, CustomerProfile, CustomerRecord, ItemForm,
            OrderReceipt, OrderRequest, ProfileUpdate, ProfileUpdated, Registration,
            RegistrationReceipt, UserForm, UserProfile, UserRecord,
        },
    },
    gateway::{Gateway, Method},
};

/// [`BookshopApi`] over any [`Gateway`].
#[derive(Clone)]
pub struct ApiClient {
    gateway: Arc<dyn Gateway>,
}

impl fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiClient").finish_non_exhaustive()
    }
}

impl ApiClient {
    /// Create a client sending requests through `gateway`.
    #[must_use]
    pub fn new(gateway: Arc<dyn Gateway>) -> Self {
        Self { gateway }
    }

    async fn fetch<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> Result<T, ApiError> {
        let payload = self.gateway.send(method, path, body).await?;

        Ok(payload.into_json()?)
    }

    async fn execute(&self, method: Method, path: &str, body: Option<Value>) -> Result<(), ApiError> {
        self.gateway.send(method, path, body).await?;

        Ok(())
    }
}

fn to_body<T: Serialize>(value: &T) -> Result<Option<Value>, ApiError> {
    serde_json::to_value(value)
        .map(Some)
        .map_err(ApiError::Encode)
}

#[async_trait]
impl BookshopApi for ApiClient {
    async fn customer_login(&self, credentials: &Credentials) -> Result<CustomerLogin, ApiError> {
        self.fetch(Method::Post, "/public/customer/login", to_body(credentials)?)
            .await
    }

    async fn register_customer(
        &self,
        registration: &Registration,
    ) -> Result<RegistrationReceipt, ApiError> {
        self.fetch(
            Method::Post,
            "/public/customer/register",
            to_body(registration)?,
        )
        .await
    }

    async fn books(&self) -> Result<Vec<CatalogItem>, ApiError> {
        self.fetch(Method::Get, "/public/customer/books", None).await
    }

    async fn customer_orders(&self, customer: CustomerId) -> Result<Vec<Order>, ApiError> {
        self.fetch(
            Method::Get,
            &format!("/public/customer/orders/{customer}"),
            None,
        )
        .await
    }

    async fn place_order(&self, order: &OrderRequest) -> Result<OrderReceipt, ApiError> {
        self.fetch(Method::Post, "/public/customer/order", to_body(order)?)
            .await
    }

    async fn update_profile(
        &self,
        customer: CustomerId,
        profile: &ProfileUpdate,
    ) -> Result<Option<CustomerProfile>, ApiError> {
        let updated: ProfileUpdated = self
            .fetch(
                Method::Put,
                &format!("/public/customer/profile/{customer}"),
                to_body(profile)?,
            )
            .await?;

        Ok(updated.customer)
    }

    async fn logout(&self) -> Result<(), ApiError> {
        self.execute(Method::Post, "/auth/logout", None).await
    }

    async fn staff_login(&self, credentials: &Credentials) -> Result<UserProfile, ApiError> {
        self.fetch(Method::Post, "/auth/login", to_body(credentials)?)
            .await
    }

    async fn items(&self) -> Result<Vec<CatalogItem>, ApiError> {
        self.fetch(Method::Get, "/items", None).await
    }

    async fn item(&self, id: ItemId) -> Result<CatalogItem, ApiError> {
        self.fetch(Method::Get, &format!("/items/{id}"), None).await
    }

    async fn create_item(&self, item: &ItemForm) -> Result<(), ApiError> {
        let item = ItemForm {
            item_code: None,
            ..item.clone()
        };

        self.execute(Method::Post, "/items", to_body(&item)?).await
    }

    async fn update_item(&self, id: ItemId, item: &ItemForm) -> Result<(), ApiError> {
        self.execute(Method::Put, &format!("/items/{id}"), to_body(item)?)
            .await
    }

    async fn delete_item(&self, id: ItemId) -> Result<(), ApiError> {
        self.execute(Method::Delete, &format!("/items/{id}"), None)
            .await
    }

    async fn customers(&self) -> Result<Vec<CustomerRecord>, ApiError> {
        self.fetch(Method::Get, "/customer/all", None).await
    }

    async fn customer(&self, id: CustomerId) -> Result<CustomerRecord, ApiError> {
        self.fetch(Method::Get, &format!("/customer/{id}"), None)
            .await
    }

    async fn create_customer(&self, customer: &CustomerForm) -> Result<(), ApiError> {
        let customer = CustomerForm {
            account_number: None,
            ..customer.clone()
        };

        self.execute(Method::Post, "/customer", to_body(&customer)?)
            .await
    }

    async fn update_customer(&self, id: CustomerId, customer: &CustomerForm) -> Result<(), ApiError> {
        self.execute(Method::Put, &format!("/customer/{id}"), to_body(customer)?)
            .await
    }

    async fn delete_customer(&self, id: CustomerId) -> Result<(), ApiError> {
        self.execute(Method::Delete, &format!("/customer/{id}"), None)
            .await
    }

    async fn users(&self) -> Result<Vec<UserRecord>, ApiError> {
        self.fetch(Method::Get, "/admin/users", None).await
    }

    async fn create_user(&self, user: &UserForm) -> Result<(), ApiError> {
        self.execute(Method::Post, "/admin/users", to_body(user)?)
            .await
    }

    async fn update_user(&self, id: u64, user: &UserForm) -> Result<(), ApiError> {
        let user = UserForm {
            password: user.password.clone().filter(|password| !password.is_empty()),
            ..user.clone()
        };

        self.execute(Method::Put, &format!("/admin/users/{id}"), to_body(&user)?)
            .await
    }

    async fn delete_user(&self, id: u64) -> Result<(), ApiError> {
        self.execute(Method::Delete, &format!("/admin/users/{id}"), None)
            .await
    }

    async fn bills(&self) -> Result<Vec<Order>, ApiError> {
        self.fetch(Method::Get, "/bills", None).await
    }

    async fn bill(&self, id: u64) -> Result<Order, ApiError> {
        self.fetch(Method::Get, &format!("/bills/{id}"), None).await
    }

    async fn create_bill(&self, bill: &BillSubmission) -> Result<Order, ApiError> {
        self.fetch(Method::Post, "/bills", to_body(bill)?).await
    }

    async fn update_bill_status(&self, id: u64, status: &OrderStatus) -> Result<Order, ApiError> {
        self.fetch(
            Method::Put,
            &format!("/bills/{id}/status?status={status}"),
            None,
        )
        .await
    }
}

/// Typed access to the bookshop API used by both front ends.
#[automock]
#[async_trait]
pub trait BookshopApi: Send + Sync {
    /// Sign a customer in, returning the user and linked customer profile.
    async fn customer_login(&self, credentials: &Credentials) -> Result<CustomerLogin, ApiError>;

    /// Register a new customer account.
    async fn register_customer(
        &self,
        registration: &Registration,
    ) -> Result<RegistrationReceipt, ApiError>;

    /// Storefront catalog with current stock.
    async fn books(&self) -> Result<Vec<CatalogItem>, ApiError>;

    /// A customer's bills.
    async fn customer_orders(&self, customer: CustomerId) -> Result<Vec<Order>, ApiError>;

    /// Place a storefront order. Prices are decided by the server.
    async fn place_order(&self, order: &OrderRequest) -> Result<OrderReceipt, ApiError>;

    /// Update a customer's own profile, returning the stored profile when the server echoes it.
    async fn update_profile(
        &self,
        customer: CustomerId,
        profile: &ProfileUpdate,
    ) -> Result<Option<CustomerProfile>, ApiError>;

    /// End the server session.
    async fn logout(&self) -> Result<(), ApiError>;

    /// Sign a seller or admin in.
    async fn staff_login(&self, credentials: &Credentials) -> Result<UserProfile, ApiError>;

    /// Every catalog item.
    async fn items(&self) -> Result<Vec<CatalogItem>, ApiError>;

    /// One catalog item.
    async fn item(&self, id: ItemId) -> Result<CatalogItem, ApiError>;

    /// Add a catalog item.
    async fn create_item(&self, item: &ItemForm) -> Result<(), ApiError>;

    /// Replace a catalog item.
    async fn update_item(&self, id: ItemId, item: &ItemForm) -> Result<(), ApiError>;

    /// Delete a catalog item.
    async fn delete_item(&self, id: ItemId) -> Result<(), ApiError>;

    /// Every customer.
    async fn customers(&self) -> Result<Vec<CustomerRecord>, ApiError>;

    /// One customer.
    async fn customer(&self, id: CustomerId) -> Result<CustomerRecord, ApiError>;

    /// Add a customer.
    async fn create_customer(&self, customer: &CustomerForm) -> Result<(), ApiError>;

    /// Replace a customer.
    async fn update_customer(&self, id: CustomerId, customer: &CustomerForm)
    -> Result<(), ApiError>;

    /// Delete a customer.
    async fn delete_customer(&self, id: CustomerId) -> Result<(), ApiError>;

    /// Every console user.
    async fn users(&self) -> Result<Vec<UserRecord>, ApiError>;

    /// Add a console user.
    async fn create_user(&self, user: &UserForm) -> Result<(), ApiError>;

    /// Replace a console user. An empty password leaves the stored one unchanged.
    async fn update_user(&self, id: u64, user: &UserForm) -> Result<(), ApiError>;

    /// Delete a console user.
    async fn delete_user(&self, id: u64) -> Result<(), ApiError>;

    /// Every bill.
    async fn bills(&self) -> Result<Vec<Order>, ApiError>;

    /// One bill with its lines.
    async fn bill(&self, id: u64) -> Result<Order, ApiError>;

    /// Create a bill from a seller draft.
    async fn create_bill(&self, bill: &BillSubmission) -> Result<Order, ApiError>;

    /// Move a bill to another status.
    async fn update_bill_status(&self, id: u64, status: &OrderStatus) -> Result<Order, ApiError>;
}
