//! Storefront shell.

use std::io;

use clap::{Args, Parser, Subcommand};
use rusty_money::iso::Currency;
use tokio::io::AsyncRead;

use quire::{
    catalog::{self, CatalogFilter, ItemId},
    money::format_money,
    orders::PurchaseReport,
};

use crate::{
    api::models::{Credentials, ProfileUpdate},
    render::storefront as render,
    router::StorefrontSection,
    shell::{Flow, ShellError, Terminal, password_or_prompt},
    storefront::{RegistrationForm, Storefront, StorefrontError},
};

/// One storefront command line.
#[derive(Debug, Parser)]
#[command(name = "storefront", no_binary_name = true, disable_version_flag = true)]
pub struct StorefrontLine {
    /// Command to run.
    #[command(subcommand)]
    pub command: StorefrontCommand,
}

/// Storefront commands.
#[derive(Debug, PartialEq, Eq, Subcommand)]
pub enum StorefrontCommand {
    /// Sign in as a customer
    Login {
        /// Login name
        username: String,

        /// Password; asked for when left out
        password: Option<String>,
    },

    /// Sign out and empty the cart
    Logout,

    /// Create a customer account
    Register(RegisterArgs),

    /// Open a section: profile, items, cart, orders or report
    Show {
        /// Section name
        section: StorefrontSection,
    },

    /// Search the catalog
    Books(BooksArgs),

    /// Add a book to the cart
    Add {
        /// Item id
        item: ItemId,

        /// Number of copies
        #[arg(default_value_t = 1)]
        quantity: u32,
    },

    /// Price copies of a book with the staged discount
    Preview {
        /// Item id
        item: ItemId,

        /// Number of copies
        #[arg(default_value_t = 1)]
        quantity: u32,
    },

    /// Stage a discount code for the next book you add
    Discount {
        /// Discount code
        code: String,
    },

    /// Drop the staged discount code
    CancelDiscount,

    /// Change the number of copies in the cart; 0 removes the book
    Update {
        /// Item id
        item: ItemId,

        /// New number of copies
        quantity: u32,
    },

    /// Remove a book from the cart
    Remove {
        /// Item id
        item: ItemId,
    },

    /// Empty the cart
    Clear,

    /// Place an order for the cart
    Checkout,

    /// Show one of your orders
    Order {
        /// Order id
        id: u64,
    },

    /// Show or update your profile
    Profile(ProfileArgs),

    /// List discount codes
    Codes,

    /// Leave the shell
    #[command(alias = "exit")]
    Quit,
}

/// Registration details.
#[derive(Debug, PartialEq, Eq, Args)]
pub struct RegisterArgs {
    /// Full name
    #[arg(long)]
    name: String,

    /// Email address
    #[arg(long, default_value = "")]
    email: String,

    /// Ten digit telephone number
    #[arg(long)]
    telephone: String,

    /// Postal address
    #[arg(long, default_value = "")]
    address: String,

    /// Login name
    #[arg(long)]
    username: String,

    /// Password; asked for when left out
    #[arg(long)]
    password: Option<String>,
}

/// Catalog search options.
#[derive(Debug, PartialEq, Eq, Args)]
pub struct BooksArgs {
    /// Match title, author or item code
    #[arg(long)]
    search: Option<String>,

    /// Only this category
    #[arg(long)]
    category: Option<String>,

    /// in-stock, low-stock or out-of-stock
    #[arg(long)]
    stock: Option<String>,
}

impl BooksArgs {
    fn filter(self) -> Result<CatalogFilter, StorefrontError> {
        Ok(CatalogFilter {
            search: self.search,
            category: self.category,
            stock: self
                .stock
                .as_deref()
                .map(CatalogFilter::parse_stock)
                .transpose()?,
        })
    }
}

/// Profile fields to change. With none given the profile is shown.
#[derive(Debug, PartialEq, Eq, Args)]
pub struct ProfileArgs {
    /// Full name
    #[arg(long)]
    name: Option<String>,

    /// Email address
    #[arg(long)]
    email: Option<String>,

    /// Telephone number
    #[arg(long)]
    telephone: Option<String>,

    /// Postal address
    #[arg(long)]
    address: Option<String>,
}

impl ProfileArgs {
    fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.email.is_none()
            && self.telephone.is_none()
            && self.address.is_none()
    }

    fn apply(self, update: &mut ProfileUpdate) {
        if let Some(name) = self.name {
            update.name = name;
        }

        if let Some(email) = self.email {
            update.email = email;
        }

        if let Some(telephone) = self.telephone {
            update.telephone = telephone;
        }

        if let Some(address) = self.address {
            update.address = address;
        }
    }
}

/// Run the storefront until `quit` or end of input.
///
/// # Errors
///
/// Returns an error only when the terminal itself fails; command errors are printed.
pub async fn run<R, W>(
    storefront: &mut Storefront,
    terminal: &mut Terminal<R, W>,
    currency: &'static Currency,
) -> Result<(), ShellError>
where
    R: AsyncRead + Unpin + Send,
    W: io::Write + Send,
{
    if let Some(session) = storefront.restore() {
        writeln!(terminal.out(), "Welcome back, {}!", session.user.username)?;
    }

    while let Some(StorefrontLine { command }) =
        terminal.next_command::<StorefrontLine>("storefront> ").await?
    {
        let outcome = execute(storefront, terminal, command, currency).await;

        if terminal.settle(outcome)? == Flow::Quit {
            break;
        }
    }

    Ok(())
}

async fn execute<R, W>(
    storefront: &mut Storefront,
    terminal: &mut Terminal<R, W>,
    command: StorefrontCommand,
    currency: &'static Currency,
) -> Result<Flow, ShellError>
where
    R: AsyncRead + Unpin + Send,
    W: io::Write + Send,
{
    match command {
        StorefrontCommand::Login { username, password } => {
            login(storefront, terminal, username, password).await?;
        }
        StorefrontCommand::Logout => {
            storefront.logout().await;

            writeln!(terminal.out(), "Signed out.")?;
        }
        StorefrontCommand::Register(args) => register(storefront, terminal, args).await?,
        StorefrontCommand::Show { section } => {
            show(storefront, terminal, section, currency).await?;
        }
        StorefrontCommand::Books(args) => books(storefront, terminal, args, currency).await?,
        StorefrontCommand::Add { item, quantity } => {
            add(storefront, terminal, item, quantity, currency).await?;
        }
        StorefrontCommand::Preview { item, quantity } => {
            if storefront.catalog().is_empty() {
                storefront.refresh_catalog().await?;
            }

            let totals = storefront.preview(item, quantity)?;

            render::line_preview(
                terminal.out(),
                &totals,
                storefront.cart().staged_discount(),
                currency,
            )?;
        }
        StorefrontCommand::Discount { code } => {
            let discount = storefront.apply_discount(&code)?;

            writeln!(
                terminal.out(),
                "Discount {} staged ({}). It applies to the next book you add.",
                discount.code, discount.description
            )?;
        }
        StorefrontCommand::CancelDiscount => match storefront.cancel_discount() {
            Some(discount) => writeln!(terminal.out(), "Discount {} removed.", discount.code)?,
            None => writeln!(terminal.out(), "No discount is staged.")?,
        },
        StorefrontCommand::Update { item, quantity } => {
            storefront.update_quantity(item, quantity)?;

            render::cart(terminal.out(), storefront.cart(), currency)?;
        }
        StorefrontCommand::Remove { item } => match storefront.remove_from_cart(item) {
            Some(line) => writeln!(terminal.out(), "Removed {} from the cart.", line.name())?,
            None => writeln!(terminal.out(), "Item {item} is not in your cart.")?,
        },
        StorefrontCommand::Clear => {
            if storefront.clear_cart(&mut *terminal).await? {
                writeln!(terminal.out(), "Cart cleared.")?;
            }
        }
        StorefrontCommand::Checkout => {
            let receipt = storefront.checkout().await?;

            render::order_receipt(terminal.out(), &receipt, currency)?;
        }
        StorefrontCommand::Order { id } => {
            let order = storefront.order_detail(id).await?;

            render::order_detail(terminal.out(), &order, currency)?;
        }
        StorefrontCommand::Profile(args) => profile(storefront, terminal, args, currency).await?,
        StorefrontCommand::Codes => render::discount_codes(terminal.out())?,
        StorefrontCommand::Quit => return Ok(Flow::Quit),
    }

    Ok(Flow::Continue)
}

async fn login<R, W>(
    storefront: &mut Storefront,
    terminal: &mut Terminal<R, W>,
    username: String,
    password: Option<String>,
) -> Result<(), ShellError>
where
    R: AsyncRead + Unpin + Send,
    W: io::Write + Send,
{
    let password = password_or_prompt(terminal, password).await?;
    let session = storefront
        .login(&Credentials::new(username, password))
        .await?;
    let name = session
        .customer
        .as_ref()
        .map_or(session.user.username.as_str(), |customer| {
            customer.name.as_str()
        });

    writeln!(terminal.out(), "Welcome, {name}!")?;

    Ok(())
}

async fn register<R, W>(
    storefront: &mut Storefront,
    terminal: &mut Terminal<R, W>,
    args: RegisterArgs,
) -> Result<(), ShellError>
where
    R: AsyncRead + Unpin + Send,
    W: io::Write + Send,
{
    let password = password_or_prompt(terminal, args.password).await?;
    let receipt = storefront
        .register(RegistrationForm {
            name: args.name,
            email: args.email,
            telephone: args.telephone,
            address: args.address,
            username: args.username,
            password,
        })
        .await?;

    render::registration(terminal.out(), &receipt)?;

    Ok(())
}

async fn books<R, W>(
    storefront: &mut Storefront,
    terminal: &mut Terminal<R, W>,
    args: BooksArgs,
    currency: &'static Currency,
) -> Result<(), ShellError>
where
    R: AsyncRead + Unpin + Send,
    W: io::Write + Send,
{
    let filter = args.filter()?;

    storefront.refresh_catalog().await?;

    let categories = catalog::categories(storefront.catalog());

    if !categories.is_empty() {
        writeln!(terminal.out(), "Categories: {}", categories.join(", "))?;
    }

    render::catalog(terminal.out(), storefront.filter(&filter), currency)?;

    Ok(())
}

async fn add<R, W>(
    storefront: &mut Storefront,
    terminal: &mut Terminal<R, W>,
    item: ItemId,
    quantity: u32,
    currency: &'static Currency,
) -> Result<(), ShellError>
where
    R: AsyncRead + Unpin + Send,
    W: io::Write + Send,
{
    let in_cart = storefront.add_to_cart(item, quantity).await?;
    let name = storefront
        .cart()
        .line(item)
        .map_or_else(|| item.to_string(), |line| line.name().to_string());

    writeln!(
        terminal.out(),
        "Added {quantity} x {name} ({in_cart} in cart, estimated total {}).",
        format_money(storefront.cart().totals().total, currency)
    )?;

    Ok(())
}

async fn profile<R, W>(
    storefront: &mut Storefront,
    terminal: &mut Terminal<R, W>,
    args: ProfileArgs,
    currency: &'static Currency,
) -> Result<(), ShellError>
where
    R: AsyncRead + Unpin + Send,
    W: io::Write + Send,
{
    if !args.is_empty() {
        let mut update = storefront
            .session()
            .and_then(|session| session.customer.as_ref())
            .map(ProfileUpdate::from_profile)
            .ok_or(StorefrontError::NotAuthenticated)?;

        args.apply(&mut update);
        storefront.update_profile(&update).await?;

        writeln!(terminal.out(), "Profile updated.")?;
    }

    show(storefront, terminal, StorefrontSection::Profile, currency).await
}

async fn show<R, W>(
    storefront: &mut Storefront,
    terminal: &mut Terminal<R, W>,
    section: StorefrontSection,
    currency: &'static Currency,
) -> Result<(), ShellError>
where
    R: AsyncRead + Unpin + Send,
    W: io::Write + Send,
{
    storefront.enter(section).await?;

    match section {
        StorefrontSection::Profile => {
            let session = storefront
                .session()
                .ok_or(StorefrontError::NotAuthenticated)?;

            render::profile(terminal.out(), session)?;
        }
        StorefrontSection::Items => render::catalog(terminal.out(), storefront.catalog(), currency)?,
        StorefrontSection::Cart => render::cart(terminal.out(), storefront.cart(), currency)?,
        StorefrontSection::Orders => render::orders(terminal.out(), storefront.orders(), currency)?,
        StorefrontSection::Report => render::report(
            terminal.out(),
            &PurchaseReport::from_orders(storefront.orders()),
            currency,
        )?,
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use serde_json::json;
    use testresult::TestResult;

    use quire::catalog::CatalogItem;
    use rusty_money::iso::USD;

    use crate::{
        api::{BookshopApi, MockBookshopApi},
        config::Frontend,
        session::SessionManager,
        store::MemoryStore,
    };

    use super::*;

    fn parse(line: &[&str]) -> Result<StorefrontCommand, clap::Error> {
        StorefrontLine::try_parse_from(line).map(|line| line.command)
    }

    async fn run_script(api: MockBookshopApi, script: &str) -> TestResult<String> {
        let api: Arc<dyn BookshopApi> = Arc::new(api);
        let session =
            SessionManager::new(Frontend::Storefront, api.clone(), Box::new(MemoryStore::new()));
        let mut storefront = Storefront::new(api, session);
        let mut terminal = Terminal::new(script.as_bytes(), Vec::new());

        run(&mut storefront, &mut terminal, USD).await?;

        Ok(String::from_utf8(terminal.into_out())?)
    }

    #[test]
    fn add_defaults_to_one_copy() -> TestResult {
        assert_eq!(
            parse(&["add", "3"])?,
            StorefrontCommand::Add {
                item: 3,
                quantity: 1
            }
        );

        Ok(())
    }

    #[test]
    fn sections_parse_case_insensitively() -> TestResult {
        assert_eq!(
            parse(&["show", "CART"])?,
            StorefrontCommand::Show {
                section: StorefrontSection::Cart
            }
        );
        assert!(parse(&["show", "basket"]).is_err());

        Ok(())
    }

    #[test]
    fn books_filters_are_optional_flags() -> TestResult {
        let command = parse(&["books", "--stock", "low-stock"])?;

        assert_eq!(
            command,
            StorefrontCommand::Books(BooksArgs {
                search: None,
                category: None,
                stock: Some("low-stock".to_string()),
            })
        );

        Ok(())
    }

    #[test]
    fn unknown_stock_filters_are_rejected() {
        let args = BooksArgs {
            search: None,
            category: None,
            stock: Some("plenty".to_string()),
        };

        assert!(matches!(args.filter(), Err(StorefrontError::Catalog(_))));
    }

    #[test]
    fn exit_is_an_alias_for_quit() -> TestResult {
        assert_eq!(parse(&["exit"])?, StorefrontCommand::Quit);

        Ok(())
    }

    #[tokio::test]
    async fn failed_commands_do_not_stop_the_shell() -> TestResult {
        let output = run_script(
            MockBookshopApi::new(),
            "checkout\nfrobnicate\ndiscount fake10\ndiscount student10\ncancel-discount\nquit\ncodes\n",
        )
        .await?;

        assert!(output.contains("error: your cart is empty"));
        assert!(output.contains("frobnicate"));
        assert!(output.contains("error: invalid discount code"));
        assert!(output.contains("Discount STUDENT10 staged"));
        assert!(output.contains("Discount STUDENT10 removed."));
        assert!(!output.contains("NEWUSER20"));

        Ok(())
    }

    #[tokio::test]
    async fn books_lists_the_fetched_catalog() -> TestResult {
        let books: Vec<CatalogItem> = serde_json::from_value(json!([
            {"id": 1, "name": "Dune", "price": 20.00, "stockQuantity": 3, "category": "Fiction"},
            {"id": 2, "name": "Emma", "price": 7.99, "stockQuantity": 0, "category": "Classics"}
        ]))?;

        let mut api = MockBookshopApi::new();

        api.expect_books().once().return_once(move || Ok(books));

        let output = run_script(api, "books --category Classics\n").await?;

        assert!(output.contains("Categories: Fiction, Classics"));
        assert!(output.contains("Emma"));
        assert!(output.contains("Out of Stock"));
        assert!(!output.contains("Dune"));

        Ok(())
    }
}
