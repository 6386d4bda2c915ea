//! Console
//!
//! The seller front end's state and commands: session, the fetched customer, item, user and
//! bill lists, and the bill draft. The draft validates against the item list fetched when the
//! billing section was last entered.

use std::{fmt, sync::Arc};

use tracing::info;

use quire::{
    bill::{BillDraft, BillLine, CustomerId},
    catalog::{self, CatalogItem, ItemId},
    orders::{Order, OrderStatus},
};

use crate::{
    api::{
        BookshopApi,
        models::{Credentials, CustomerForm, CustomerRecord, ItemForm, UserForm, UserRecord},
    },
    prompt::Prompt,
    router::ConsoleSection,
    session::{Session, SessionManager},
};

pub mod dashboard;
pub mod errors;

pub use dashboard::DashboardStats;
pub use errors::ConsoleError;

/// Seller console state.
pub struct Console {
    api: Arc<dyn BookshopApi>,
    session: SessionManager,
    draft: BillDraft,
    bill_customer: Option<CustomerId>,
    customers: Vec<CustomerRecord>,
    items: Vec<CatalogItem>,
    users: Vec<UserRecord>,
    bills: Vec<Order>,
}

impl fmt::Debug for Console {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Console")
            .field("session", &self.session)
            .field("draft", &self.draft)
            .field("bill_customer", &self.bill_customer)
            .field("customers", &self.customers.len())
            .field("items", &self.items.len())
            .field("users", &self.users.len())
            .field("bills", &self.bills.len())
            .finish_non_exhaustive()
    }
}

impl Console {
    /// Create a console with an empty bill draft.
    pub fn new(api: Arc<dyn BookshopApi>, session: SessionManager) -> Self {
        Self {
            api,
            session,
            draft: BillDraft::new(),
            bill_customer: None,
            customers: Vec::new(),
            items: Vec::new(),
            users: Vec::new(),
            bills: Vec::new(),
        }
    }

    /// The signed-in session.
    pub fn session(&self) -> Option<&Session> {
        self.session.current()
    }

    /// Bill draft.
    pub fn draft(&self) -> &BillDraft {
        &self.draft
    }

    /// Customer chosen for the bill draft.
    pub fn bill_customer(&self) -> Option<&CustomerRecord> {
        let id = self.bill_customer?;

        self.customers.iter().find(|customer| customer.id == id)
    }

    /// Customers as last fetched.
    pub fn customers(&self) -> &[CustomerRecord] {
        &self.customers
    }

    /// Items as last fetched.
    pub fn items(&self) -> &[CatalogItem] {
        &self.items
    }

    /// Users as last fetched.
    pub fn users(&self) -> &[UserRecord] {
        &self.users
    }

    /// Bills as last fetched.
    pub fn bills(&self) -> &[Order] {
        &self.bills
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
    pub async fn login(&mut self, credentials: &Credentials) -> Result<&Session, ConsoleError> {
        Ok(self.session.login(credentials).await?)
    }

    /// Sign out, discarding the bill draft.
    pub async fn logout(&mut self) {
        self.session.logout().await;
        self.draft.clear();
        self.bill_customer = None;
    }

    /// Load whatever `section` shows. Returns dashboard counts when entering the dashboard.
    ///
    /// # Errors
    ///
    /// - [`ConsoleError::NotAuthenticated`] when nobody is signed in.
    /// - [`ConsoleError::AdminOnly`] when a non-admin enters an admin section.
    /// - [`ConsoleError::Api`] when loading fails.
    pub async fn enter(
        &mut self,
        section: ConsoleSection,
    ) -> Result<Option<DashboardStats>, ConsoleError> {
        self.authorize(section)?;

        match section {
            ConsoleSection::Dashboard => return Ok(Some(self.dashboard().await?)),
            ConsoleSection::Users => {
                self.users = self.api.users().await?;
            }
            ConsoleSection::Customers => {
                self.customers = self.api.customers().await?;
            }
            ConsoleSection::Items => {
                self.items = self.api.items().await?;
            }
            ConsoleSection::Billing => {
                let (bills, customers, items) =
                    tokio::try_join!(self.api.bills(), self.api.customers(), self.api.items())?;

                self.bills = bills;
                self.customers = customers;
                self.items = items;
            }
        }

        Ok(None)
    }

    /// Fetch customers, items and bills and count them.
    ///
    /// # Errors
    ///
    /// Returns an error without a session or if any list cannot be fetched.
    pub async fn dashboard(&mut self) -> Result<DashboardStats, ConsoleError> {
        self.require_session()?;

        let (customers, items, bills) =
            tokio::try_join!(self.api.customers(), self.api.items(), self.api.bills())?;

        self.customers = customers;
        self.items = items;
        self.bills = bills;

        Ok(DashboardStats::from_lists(
            &self.customers,
            &self.items,
            &self.bills,
        ))
    }

    /// Create a user, or update one when `id` is given.
    ///
    /// # Errors
    ///
    /// Returns an error for non-admins or if the request fails.
    pub async fn save_user(&mut self, id: Option<u64>, user: &UserForm) -> Result<(), ConsoleError> {
        self.authorize(ConsoleSection::Users)?;

        match id {
            Some(id) => self.api.update_user(id, user).await?,
            None => self.api.create_user(user).await?,
        }

        self.users = self.api.users().await?;

        Ok(())
    }

    /// Delete a user after confirmation. Returns whether it was deleted.
    ///
    /// # Errors
    ///
    /// Returns an error for non-admins or if the request fails.
    pub async fn delete_user(
        &mut self,
        id: u64,
        prompt: &mut dyn Prompt,
    ) -> Result<bool, ConsoleError> {
        self.authorize(ConsoleSection::Users)?;

        if !prompt
            .confirm("Are you sure you want to delete this user?")
            .await?
        {
            return Ok(false);
        }

        self.api.delete_user(id).await?;
        self.users = self.api.users().await?;

        Ok(true)
    }

    /// The stored customer as a form, so an update resends the fields it does not change.
    ///
    /// # Errors
    ///
    /// Returns an error without a session or if the request fails.
    pub async fn customer_form(&self, id: CustomerId) -> Result<CustomerForm, ConsoleError> {
        self.require_session()?;

        let customer = self.api.customer(id).await?;

        Ok(CustomerForm::from(&customer))
    }

    /// Create a customer, or update one when `id` is given.
    ///
    /// # Errors
    ///
    /// Returns an error without a session or if the request fails.
    pub async fn save_customer(
        &mut self,
        id: Option<CustomerId>,
        customer: &CustomerForm,
    ) -> Result<(), ConsoleError> {
        self.require_session()?;

        match id {
            Some(id) => self.api.update_customer(id, customer).await?,
            None => self.api.create_customer(customer).await?,
        }

        self.customers = self.api.customers().await?;

        Ok(())
    }

    /// Delete a customer after confirmation. Returns whether it was deleted.
    ///
    /// # Errors
    ///
    /// Returns an error without a session or if the request fails.
    pub async fn delete_customer(
        &mut self,
        id: CustomerId,
        prompt: &mut dyn Prompt,
    ) -> Result<bool, ConsoleError> {
        self.require_session()?;

        if !prompt
            .confirm("Are you sure you want to delete this customer?")
            .await?
        {
            return Ok(false);
        }

        self.api.delete_customer(id).await?;
        self.customers = self.api.customers().await?;

        if self.bill_customer == Some(id) {
            self.bill_customer = None;
        }

        Ok(true)
    }

    /// The stored item as a form, so an update resends the fields it does not change.
    ///
    /// # Errors
    ///
    /// Returns an error without a session or if the request fails.
    pub async fn item_form(&self, id: ItemId) -> Result<ItemForm, ConsoleError> {
        self.require_session()?;

        let item = self.api.item(id).await?;

        Ok(ItemForm::from(&item))
    }

    /// Create an item, or update one when `id` is given.
    ///
    /// # Errors
    ///
    /// Returns an error without a session or if the request fails.
    pub async fn save_item(&mut self, id: Option<ItemId>, item: &ItemForm) -> Result<(), ConsoleError> {
        self.require_session()?;

        match id {
            Some(id) => self.api.update_item(id, item).await?,
            None => self.api.create_item(item).await?,
        }

        self.items = self.api.items().await?;

        Ok(())
    }

    /// Delete an item after confirmation. Returns whether it was deleted.
    ///
    /// # Errors
    ///
    /// Returns an error without a session or if the request fails.
    pub async fn delete_item(
        &mut self,
        id: ItemId,
        prompt: &mut dyn Prompt,
    ) -> Result<bool, ConsoleError> {
        self.require_session()?;

        if !prompt
            .confirm("Are you sure you want to delete this item?")
            .await?
        {
            return Ok(false);
        }

        self.api.delete_item(id).await?;
        self.items = self.api.items().await?;

        Ok(true)
    }

    /// Choose the customer the draft will be billed to.
    ///
    /// # Errors
    ///
    /// Returns [`ConsoleError::UnknownCustomer`] if the id is not in the fetched list.
    pub fn select_customer(&mut self, id: CustomerId) -> Result<&CustomerRecord, ConsoleError> {
        let customer = self
            .customers
            .iter()
            .find(|customer| customer.id == id)
            .ok_or(ConsoleError::UnknownCustomer(id))?;

        self.bill_customer = Some(id);

        Ok(customer)
    }

    /// Add units of an item to the bill draft, returning the line's new quantity.
    ///
    /// # Errors
    ///
    /// Returns an error if the item is not in the fetched list, or the quantity is invalid or
    /// exceeds its stock.
    pub fn add_to_bill(&mut self, item_id: ItemId, quantity: u32) -> Result<u32, ConsoleError> {
        let item = catalog::find_item(&self.items, item_id)?;

        Ok(self.draft.add_line(item, quantity)?)
    }

    /// Remove an item from the bill draft.
    pub fn remove_from_bill(&mut self, item_id: ItemId) -> Option<BillLine> {
        self.draft.remove_line(item_id)
    }

    /// Discard the bill draft and customer choice.
    pub fn cancel_bill(&mut self) {
        self.draft.clear();
        self.bill_customer = None;
    }

    /// Submit the bill draft.
    ///
    /// # Errors
    ///
    /// - [`ConsoleError::NoCustomerSelected`] when no customer was chosen.
    /// - [`ConsoleError::Bill`] when the draft is empty.
    /// - [`ConsoleError::Api`] when the server rejects it; the draft is kept.
    pub async fn create_bill(&mut self) -> Result<Order, ConsoleError> {
        self.require_session()?;

        let customer = self.bill_customer.ok_or(ConsoleError::NoCustomerSelected)?;
        let submission = self.draft.submission(customer)?;

        let bill = self.api.create_bill(&submission).await?;

        info!(bill = %bill.bill_number, customer, lines = submission.items.len(), "bill created");

        self.cancel_bill();
        self.bills.insert(0, bill.clone());

        Ok(bill)
    }

    /// Fetch one bill with its lines.
    ///
    /// # Errors
    ///
    /// Returns an error without a session or if the bill cannot be fetched.
    pub async fn bill(&self, id: u64) -> Result<Order, ConsoleError> {
        self.require_session()?;

        Ok(self.api.bill(id).await?)
    }

    /// Move a bill to another status.
    ///
    /// # Errors
    ///
    /// Returns [`ConsoleError::UnknownStatus`] for a status outside the known set, or an error
    /// without a session or if the server rejects the change.
    pub async fn set_bill_status(
        &mut self,
        id: u64,
        status: &OrderStatus,
    ) -> Result<Order, ConsoleError> {
        self.require_session()?;

        if let OrderStatus::Other(name) = status {
            return Err(ConsoleError::UnknownStatus(name.clone()));
        }

        let bill = self.api.update_bill_status(id, status).await?;

        if let Some(cached) = self.bills.iter_mut().find(|cached| cached.id == bill.id) {
            cached.clone_from(&bill);
        }

        Ok(bill)
    }

    fn require_session(&self) -> Result<&Session, ConsoleError> {
        self.session.current().ok_or(ConsoleError::NotAuthenticated)
    }

    fn authorize(&self, section: ConsoleSection) -> Result<(), ConsoleError> {
        let session = self.require_session()?;

        if section.visible_to(&session.user) {
            Ok(())
        } else {
            Err(ConsoleError::AdminOnly(section))
        }
    }
}
