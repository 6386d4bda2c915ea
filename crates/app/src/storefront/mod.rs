//! Storefront
//!
//! The customer front end's state and commands: session, catalog snapshot, cart and order
//! history. Stock is re-read from the server on every add so the cart never validates against
//! a stale catalog.

use std::{fmt, sync::Arc};

use jiff::Timestamp;
use tracing::info;

use quire::{
    cart::{Cart, CartLine, LineTotals},
    catalog::{self, CatalogFilter, CatalogItem, ItemId},
    discounts::DiscountCode,
    orders::{Order, PurchaseReport},
};

use crate::{
    api::{
        BookshopApi,
        models::{
            Credentials, CustomerProfile, OrderReceipt, OrderRequest, ProfileUpdate,
            RegistrationReceipt,
        },
    },
    prompt::Prompt,
    router::StorefrontSection,
    session::{Session, SessionManager},
};

pub mod errors;
pub mod registration;

pub use errors::StorefrontError;
pub use registration::{RegistrationError, RegistrationForm};

/// Customer storefront state.
pub struct Storefront {
    api: Arc<dyn BookshopApi>,
    session: SessionManager,
    cart: Cart,
    catalog: Vec<CatalogItem>,
    orders: Vec<Order>,
}

impl fmt::Debug for Storefront {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Storefront")
            .field("session", &self.session)
            .field("cart", &self.cart)
            .field("catalog", &self.catalog.len())
            .field("orders", &self.orders.len())
            .finish_non_exhaustive()
    }
}

impl Storefront {
    /// Create a storefront with an empty cart.
    pub fn new(api: Arc<dyn BookshopApi>, session: SessionManager) -> Self {
        Self {
            api,
            session,
            cart: Cart::new(),
            catalog: Vec::new(),
            orders: Vec::new(),
        }
    }

    /// The signed-in session.
    pub fn session(&self) -> Option<&Session> {
        self.session.current()
    }

    /// The cart.
    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    /// Catalog as last fetched.
    pub fn catalog(&self) -> &[CatalogItem] {
        &self.catalog
    }

    /// Orders as last fetched.
    pub fn orders(&self) -> &[Order] {
        &self.orders
    }

    /// Restore a persisted session.
    pub fn restore(&mut self) -> Option<&Session> {
        self.session.restore()
    }

    /// Sign in.
    ///
    /// # Errors
    ///
    /// Returns an error if the credentials are rejected or the session cannot be stored.
    pub async fn login(&mut self, credentials: &Credentials) -> Result<&Session, StorefrontError> {
        Ok(self.session.login(credentials).await?)
    }

    /// Sign out, dropping the cart and cached orders.
    pub async fn logout(&mut self) {
        self.session.logout().await;
        self.cart.clear();
        self.orders.clear();
    }

    /// Register a new customer account.
    ///
    /// # Errors
    ///
    /// Returns an error if the form is invalid or the server rejects it.
    pub async fn register(
        &self,
        form: RegistrationForm,
    ) -> Result<RegistrationReceipt, StorefrontError> {
        let hint = registration::account_number_hint(
            Timestamp::now().as_millisecond(),
            &mut rand::thread_rng(),
        );

        let registration = form.validate(hint)?;
        let receipt = self.api.register_customer(&registration).await?;

        info!(account = %receipt.account_number, "customer registered");

        Ok(receipt)
    }

    /// Load whatever `section` shows.
    ///
    /// # Errors
    ///
    /// Returns an error if the section needs a session that is missing, or loading fails.
    pub async fn enter(&mut self, section: StorefrontSection) -> Result<(), StorefrontError> {
        match section {
            StorefrontSection::Items => {
                self.refresh_catalog().await?;
            }
            StorefrontSection::Orders | StorefrontSection::Report => {
                self.refresh_orders().await?;
            }
            StorefrontSection::Profile => {
                self.customer()?;
            }
            StorefrontSection::Cart => {}
        }

        Ok(())
    }

    /// Fetch the catalog.
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog cannot be fetched.
    pub async fn refresh_catalog(&mut self) -> Result<&[CatalogItem], StorefrontError> {
        self.catalog = self.api.books().await?;

        Ok(&self.catalog)
    }

    /// Catalog items passing `filter`.
    pub fn filter(&self, filter: &CatalogFilter) -> Vec<&CatalogItem> {
        filter.apply(&self.catalog)
    }

    /// Price preview for `quantity` units of an item, using the staged discount.
    ///
    /// # Errors
    ///
    /// Returns [`StorefrontError::Catalog`] if the item is not in the fetched catalog.
    pub fn preview(&self, item_id: ItemId, quantity: u32) -> Result<LineTotals, StorefrontError> {
        let item = catalog::find_item(&self.catalog, item_id)?;

        Ok(self.cart.compute_totals(item.price, quantity))
    }

    /// Stage a discount code for the next add.
    ///
    /// # Errors
    ///
    /// Returns [`StorefrontError::Cart`] for an empty or unknown code.
    pub fn apply_discount(&mut self, code: &str) -> Result<&'static DiscountCode, StorefrontError> {
        Ok(self.cart.apply_discount(code)?)
    }

    /// Drop a staged discount code.
    pub fn cancel_discount(&mut self) -> Option<&'static DiscountCode> {
        self.cart.cancel_staged_discount()
    }

    /// Add units of an item to the cart against freshly fetched stock.
    ///
    /// Returns the line's new quantity.
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog cannot be fetched, the item is unknown or the quantity
    /// is invalid or exceeds stock. The cart is unchanged on error.
    pub async fn add_to_cart(
        &mut self,
        item_id: ItemId,
        quantity: u32,
    ) -> Result<u32, StorefrontError> {
        self.refresh_catalog().await?;

        let item = catalog::find_item(&self.catalog, item_id)?;

        Ok(self.cart.add_line(item, quantity)?)
    }

    /// Set a cart line's quantity. Zero removes the line.
    ///
    /// # Errors
    ///
    /// Returns [`StorefrontError::Cart`] if the quantity exceeds the line's known stock.
    pub fn update_quantity(&mut self, item_id: ItemId, quantity: u32) -> Result<(), StorefrontError> {
        Ok(self.cart.update_quantity(item_id, quantity)?)
    }

    /// Remove an item from the cart.
    pub fn remove_from_cart(&mut self, item_id: ItemId) -> Option<CartLine> {
        self.cart.remove_line(item_id)
    }

    /// Empty the cart after the user confirms. Returns whether it was cleared.
    ///
    /// # Errors
    ///
    /// Returns [`StorefrontError::Prompt`] if the confirmation cannot be read.
    pub async fn clear_cart(&mut self, prompt: &mut dyn Prompt) -> Result<bool, StorefrontError> {
        if self.cart.is_empty() {
            return Ok(false);
        }

        if !prompt
            .confirm("Are you sure you want to clear your cart?")
            .await?
        {
            return Ok(false);
        }

        self.cart.clear();

        Ok(true)
    }

    /// Place an order for the cart contents.
    ///
    /// # Errors
    ///
    /// - [`StorefrontError::EmptyCart`] when the cart is empty; nothing is sent.
    /// - [`StorefrontError::NotAuthenticated`] without a signed-in customer.
    /// - [`StorefrontError::Api`] when the server rejects the order; the cart is kept.
    pub async fn checkout(&mut self) -> Result<OrderReceipt, StorefrontError> {
        if self.cart.is_empty() {
            return Err(StorefrontError::EmptyCart);
        }

        let order = OrderRequest {
            customer_id: self.customer()?.id,
            items: self.cart.order_lines(),
        };

        let receipt = self.api.place_order(&order).await?;

        info!(bill = %receipt.bill_number, lines = order.items.len(), "order placed");

        self.cart.clear();

        Ok(receipt)
    }

    /// Update the signed-in customer's profile.
    ///
    /// # Errors
    ///
    /// Returns an error without a session, or if the update or persistence fails.
    pub async fn update_profile(
        &mut self,
        update: &ProfileUpdate,
    ) -> Result<&CustomerProfile, StorefrontError> {
        let id = self.customer()?.id;

        if let Some(customer) = self.api.update_profile(id, update).await? {
            self.session.update_customer(customer)?;
        }

        self.customer()
    }

    /// Fetch the signed-in customer's orders.
    ///
    /// # Errors
    ///
    /// Returns an error without a session or if the orders cannot be fetched.
    pub async fn refresh_orders(&mut self) -> Result<&[Order], StorefrontError> {
        let id = self.customer()?.id;

        self.orders = self.api.customer_orders(id).await?;

        Ok(&self.orders)
    }

    /// Fetch one order with its lines.
    ///
    /// # Errors
    ///
    /// Returns an error without a session or if the order cannot be fetched.
    pub async fn order_detail(&self, id: u64) -> Result<Order, StorefrontError> {
        self.customer()?;

        Ok(self.api.bill(id).await?)
    }

    /// Purchase report over freshly fetched orders.
    ///
    /// # Errors
    ///
    /// Returns an error without a session or if the orders cannot be fetched.
    pub async fn report(&mut self) -> Result<PurchaseReport, StorefrontError> {
        Ok(PurchaseReport::from_orders(self.refresh_orders().await?))
    }

    fn customer(&self) -> Result<&CustomerProfile, StorefrontError> {
        self.session
            .customer()
            .ok_or(StorefrontError::NotAuthenticated)
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use rust_decimal::Decimal;
    use serde_json::json;
    use testresult::TestResult;

    use quire::cart::CartError;

    use crate::{
        api::{
            ApiError, MockBookshopApi,
            models::{CustomerLogin, UserProfile},
        },
        config::Frontend,
        gateway::GatewayError,
        prompt::MockPrompt,
        store::MemoryStore,
    };

    use super::*;

    fn books() -> TestResult<Vec<CatalogItem>> {
        Ok(serde_json::from_value(json!([
            {"id": 1, "name": "Dune", "price": 20.00, "stockQuantity": 3, "category": "Fiction"},
            {"id": 2, "name": "Emma", "price": 7.99, "stockQuantity": 0, "category": "Classics"}
        ]))?)
    }

    fn expect_books(api: &mut MockBookshopApi, times: usize) -> TestResult {
        let books = books()?;

        api.expect_books()
            .times(times)
            .returning(move || Ok(books.clone()));

        Ok(())
    }

    fn customer() -> CustomerProfile {
        CustomerProfile {
            id: 7,
            account_number: "ACC1".to_string(),
            name: "Ada".to_string(),
            email: String::new(),
            telephone: "0771234567".to_string(),
            address: String::new(),
        }
    }

    fn storefront(api: MockBookshopApi) -> Storefront {
        let api: Arc<dyn BookshopApi> = Arc::new(api);
        let session =
            SessionManager::new(Frontend::Storefront, api.clone(), Box::new(MemoryStore::new()));

        Storefront::new(api, session)
    }

    fn expect_login(api: &mut MockBookshopApi) {
        api.expect_customer_login().once().return_once(|_| {
            Ok(CustomerLogin {
                user: UserProfile {
                    id: 1,
                    username: "ada".to_string(),
                    role: None,
                },
                customer: customer(),
            })
        });
    }

    async fn signed_in(mut api: MockBookshopApi) -> TestResult<Storefront> {
        expect_login(&mut api);

        let mut storefront = storefront(api);

        storefront
            .login(&Credentials::new("ada", "secret1"))
            .await?;

        Ok(storefront)
    }

    #[tokio::test]
    async fn checkout_of_an_empty_cart_makes_no_request() -> TestResult {
        let mut api = MockBookshopApi::new();

        api.expect_place_order().never();

        let mut storefront = signed_in(api).await?;

        assert!(matches!(
            storefront.checkout().await,
            Err(StorefrontError::EmptyCart)
        ));

        Ok(())
    }

    #[tokio::test]
    async fn checkout_requires_a_customer() -> TestResult {
        let mut api = MockBookshopApi::new();

        expect_books(&mut api, 1)?;
        api.expect_place_order().never();

        let mut storefront = storefront(api);

        storefront.add_to_cart(1, 1).await?;

        assert!(matches!(
            storefront.checkout().await,
            Err(StorefrontError::NotAuthenticated)
        ));
        assert_eq!(storefront.cart().len(), 1);

        Ok(())
    }

    #[tokio::test]
    async fn successful_checkout_sends_lines_and_clears_the_cart() -> TestResult {
        let mut api = MockBookshopApi::new();

        expect_books(&mut api, 2)?;
        api.expect_place_order()
            .once()
            .withf(|order| {
                order.customer_id == 7
                    && order.items.len() == 1
                    && order.items.first().map(|line| line.quantity) == Some(3)
            })
            .return_once(|_| {
                Ok(OrderReceipt {
                    bill_number: "BILL1".to_string(),
                    total_amount: Some(Decimal::from(54)),
                    status: None,
                })
            });

        let mut storefront = signed_in(api).await?;

        storefront.add_to_cart(1, 1).await?;
        storefront.add_to_cart(1, 2).await?;

        let receipt = storefront.checkout().await?;

        assert_eq!(receipt.bill_number, "BILL1");
        assert!(storefront.cart().is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn failed_checkout_keeps_the_cart() -> TestResult {
        let mut api = MockBookshopApi::new();

        expect_books(&mut api, 1)?;
        api.expect_place_order().once().return_once(|_| {
            Err(ApiError::Gateway(GatewayError::RequestFailed {
                status: 400,
                body: r#"{"error":"Order creation failed: Insufficient stock"}"#.to_string(),
            }))
        });

        let mut storefront = signed_in(api).await?;

        storefront.add_to_cart(1, 2).await?;

        assert!(storefront.checkout().await.is_err());
        assert_eq!(storefront.cart().len(), 1);

        Ok(())
    }

    #[tokio::test]
    async fn adds_validate_against_fresh_stock() -> TestResult {
        let mut api = MockBookshopApi::new();
        let mut restocked = books()?;

        if let Some(dune) = restocked.first_mut() {
            dune.stock_quantity = 10;
        }

        expect_books(&mut api, 1)?;
        api.expect_books().once().return_once(move || Ok(restocked));

        let mut storefront = storefront(api);

        storefront.add_to_cart(1, 3).await?;

        assert_eq!(storefront.add_to_cart(1, 4).await?, 7);

        Ok(())
    }

    #[tokio::test]
    async fn out_of_stock_items_cannot_be_added() -> TestResult {
        let mut api = MockBookshopApi::new();

        expect_books(&mut api, 1)?;

        let mut storefront = storefront(api);

        assert!(matches!(
            storefront.add_to_cart(2, 1).await,
            Err(StorefrontError::Cart(CartError::StockExceeded { available: 0, .. }))
        ));
        assert!(storefront.cart().is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn staged_discount_binds_to_the_next_add_only() -> TestResult {
        let mut api = MockBookshopApi::new();

        expect_books(&mut api, 2)?;

        let mut storefront = storefront(api);

        storefront.refresh_catalog().await?;
        storefront.apply_discount("student10")?;

        let preview = storefront.preview(1, 3)?;

        assert_eq!(preview.discount, Decimal::from_str("6.00")?);

        storefront.add_to_cart(1, 3).await?;

        assert!(storefront.cart().staged_discount().is_none());
        assert_eq!(
            storefront.cart().line(1).map(CartLine::totals),
            Some(preview)
        );

        Ok(())
    }

    #[tokio::test]
    async fn clearing_the_cart_needs_confirmation() -> TestResult {
        let mut api = MockBookshopApi::new();

        expect_books(&mut api, 1)?;

        let mut storefront = storefront(api);

        storefront.add_to_cart(1, 1).await?;

        let mut declined = MockPrompt::new();

        declined.expect_confirm().once().return_once(|_| Ok(false));

        assert!(!storefront.clear_cart(&mut declined).await?);
        assert_eq!(storefront.cart().len(), 1);

        let mut confirmed = MockPrompt::new();

        confirmed.expect_confirm().once().return_once(|_| Ok(true));

        assert!(storefront.clear_cart(&mut confirmed).await?);
        assert!(storefront.cart().is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn profile_updates_replace_the_session_customer() -> TestResult {
        let mut api = MockBookshopApi::new();

        api.expect_update_profile()
            .once()
            .withf(|id, update| *id == 7 && update.name == "Ada King")
            .return_once(|_, _| {
                Ok(Some(CustomerProfile {
                    name: "Ada King".to_string(),
                    ..customer()
                }))
            });

        let mut storefront = signed_in(api).await?;
        let mut update = ProfileUpdate::from_profile(&customer());

        update.name = "Ada King".to_string();

        let updated = storefront.update_profile(&update).await?;

        assert_eq!(updated.name, "Ada King");

        Ok(())
    }

    #[tokio::test]
    async fn report_summarises_fetched_orders() -> TestResult {
        let mut api = MockBookshopApi::new();
        let orders: Vec<Order> = serde_json::from_value(json!([
            {"id": 1, "totalAmount": 54.0, "status": "COMPLETED"},
            {"id": 2, "totalAmount": 12.5, "status": "PENDING"}
        ]))?;

        api.expect_customer_orders()
            .once()
            .withf(|id| *id == 7)
            .return_once(move |_| Ok(orders));

        let mut storefront = signed_in(api).await?;
        let report = storefront.report().await?;

        assert_eq!(report.total_orders, 2);
        assert_eq!(report.total_spent, Decimal::from_str("66.5")?);

        Ok(())
    }

    #[tokio::test]
    async fn orders_need_a_session() {
        let mut api = MockBookshopApi::new();

        api.expect_customer_orders().never();

        let mut storefront = storefront(api);

        assert!(matches!(
            storefront.enter(StorefrontSection::Orders).await,
            Err(StorefrontError::NotAuthenticated)
        ));
    }

    #[tokio::test]
    async fn debug_output_shows_the_session_and_cart() -> TestResult {
        let storefront = signed_in(MockBookshopApi::new()).await?;
        let debug = format!("{storefront:?}");

        assert!(debug.starts_with("Storefront"));
        assert!(debug.contains("username: \"ada\""));
        assert!(debug.contains("cart: Cart"));

        Ok(())
    }

    #[tokio::test]
    async fn logout_empties_the_cart() -> TestResult {
        let mut api = MockBookshopApi::new();

        expect_books(&mut api, 1)?;
        api.expect_logout().once().return_once(|| Ok(()));

        let mut storefront = signed_in(api).await?;

        storefront.add_to_cart(1, 1).await?;
        storefront.logout().await;

        assert!(storefront.cart().is_empty());
        assert!(storefront.session().is_none());

        Ok(())
    }

    #[tokio::test]
    async fn invalid_registrations_are_not_sent() {
        let mut api = MockBookshopApi::new();

        api.expect_register_customer().never();

        let storefront = storefront(api);
        let result = storefront
            .register(RegistrationForm {
                name: "A".to_string(),
                ..RegistrationForm::default()
            })
            .await;

        assert!(matches!(
            result,
            Err(StorefrontError::Registration(RegistrationError::NameTooShort))
        ));
    }
}
