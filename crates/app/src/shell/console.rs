//! Console shell.

use std::io;

use clap::{Args, Parser, Subcommand};
use rust_decimal::Decimal;
use rusty_money::iso::Currency;
use tokio::io::AsyncRead;

use quire::{bill::CustomerId, catalog::ItemId, money::format_money, orders::OrderStatus};

use crate::{
    api::models::{Credentials, CustomerForm, ItemForm, UserForm},
    console::Console,
    render::console as render,
    router::ConsoleSection,
    shell::{Flow, ShellError, Terminal, password_or_prompt},
};

/// One console command line.
#[derive(Debug, Parser)]
#[command(name = "console", no_binary_name = true, disable_version_flag = true)]
pub struct ConsoleLine {
    /// Command to run.
    #[command(subcommand)]
    pub command: ConsoleCommand,
}

/// Console commands.
#[derive(Debug, PartialEq, Eq, Subcommand)]
pub enum ConsoleCommand {
    /// Sign in as a seller or admin
    Login {
        /// Login name
        username: String,

        /// Password; asked for when left out
        password: Option<String>,
    },

    /// Sign out and discard the bill draft
    Logout,

    /// Open a section: dashboard, users, customers, items or billing
    Show {
        /// Section name
        section: ConsoleSection,
    },

    /// Manage console users (admin only)
    #[command(subcommand)]
    User(UserCommand),

    /// Manage customers
    #[command(subcommand)]
    Customer(CustomerCommand),

    /// Manage catalog items
    #[command(subcommand)]
    Item(ItemCommand),

    /// Build and manage bills
    #[command(subcommand)]
    Bill(BillCommand),

    /// Leave the shell
    #[command(alias = "exit")]
    Quit,
}

/// User commands.
#[derive(Debug, PartialEq, Eq, Subcommand)]
pub enum UserCommand {
    /// Create a user, or update one with --id
    Save(UserArgs),

    /// Delete a user
    Delete {
        /// User id
        id: u64,
    },
}

/// User fields.
#[derive(Debug, PartialEq, Eq, Args)]
pub struct UserArgs {
    /// Update this user instead of creating one
    #[arg(long)]
    id: Option<u64>,

    /// Login name
    #[arg(long)]
    username: String,

    /// Password; an empty password keeps the current one on update
    #[arg(long)]
    password: Option<String>,

    /// Role name
    #[arg(long, default_value = "STAFF")]
    role: String,

    /// Whether the account may sign in
    #[arg(long, default_value_t = true, action = clap::ArgAction::Set)]
    enabled: bool,
}

/// Customer commands.
#[derive(Debug, PartialEq, Eq, Subcommand)]
pub enum CustomerCommand {
    /// Create a customer, or update one with --id
    Save(CustomerArgs),

    /// Delete a customer
    Delete {
        /// Customer id
        id: CustomerId,
    },
}

/// Customer fields. On update, fields left out keep their stored values.
#[derive(Debug, PartialEq, Eq, Args)]
pub struct CustomerArgs {
    /// Update this customer instead of creating one
    #[arg(long)]
    id: Option<CustomerId>,

    /// Full name
    #[arg(long, required_unless_present = "id")]
    name: Option<String>,

    /// Email address
    #[arg(long)]
    email: Option<String>,

    /// Telephone number
    #[arg(long, required_unless_present = "id")]
    telephone: Option<String>,

    /// Postal address
    #[arg(long)]
    address: Option<String>,

    /// Account number, kept on update
    #[arg(long)]
    account_number: Option<String>,
}

impl CustomerArgs {
    fn apply(self, form: &mut CustomerForm) {
        if let Some(name) = self.name {
            form.name = name;
        }
        if let Some(email) = self.email {
            form.email = email;
        }
        if let Some(telephone) = self.telephone {
            form.telephone = telephone;
        }
        if let Some(address) = self.address {
            form.address = address;
        }
        if self.account_number.is_some() {
            form.account_number = self.account_number;
        }
    }
}

/// Item commands.
#[derive(Debug, PartialEq, Eq, Subcommand)]
pub enum ItemCommand {
    /// Create an item, or update one with --id
    Save(ItemArgs),

    /// Delete an item
    Delete {
        /// Item id
        id: ItemId,
    },
}

/// Item fields. On update, fields left out keep their stored values.
#[derive(Debug, PartialEq, Eq, Args)]
pub struct ItemArgs {
    /// Update this item instead of creating one
    #[arg(long)]
    id: Option<ItemId>,

    /// Display name
    #[arg(long, required_unless_present = "id")]
    name: Option<String>,

    /// Description
    #[arg(long)]
    description: Option<String>,

    /// Category
    #[arg(long)]
    category: Option<String>,

    /// Unit price
    #[arg(long, required_unless_present = "id")]
    price: Option<Decimal>,

    /// Units in stock
    #[arg(long)]
    stock: Option<i64>,

    /// Item code, kept on update
    #[arg(long)]
    item_code: Option<String>,
}

impl ItemArgs {
    fn apply(self, form: &mut ItemForm) {
        if let Some(name) = self.name {
            form.name = name;
        }
        if let Some(description) = self.description {
            form.description = description;
        }
        if let Some(category) = self.category {
            form.category = category;
        }
        if let Some(price) = self.price {
            form.price = price;
        }
        if let Some(stock) = self.stock {
            form.stock_quantity = stock;
        }
        if self.item_code.is_some() {
            form.item_code = self.item_code;
        }
    }
}

/// Bill commands.
#[derive(Debug, PartialEq, Eq, Subcommand)]
pub enum BillCommand {
    /// Choose the customer to bill
    Select {
        /// Customer id
        customer: CustomerId,
    },

    /// Add an item to the bill
    Add {
        /// Item id
        item: ItemId,

        /// Units
        #[arg(default_value_t = 1)]
        quantity: u32,
    },

    /// Remove an item from the bill
    Remove {
        /// Item id
        item: ItemId,
    },

    /// Show the bill being built
    Draft,

    /// Discard the bill being built
    Cancel,

    /// Submit the bill
    Create,

    /// Show a stored bill
    View {
        /// Bill id
        id: u64,
    },

    /// Change a bill's status, e.g. PAID or COMPLETED
    Status {
        /// Bill id
        id: u64,

        /// New status
        status: String,
    },
}

/// Run the console until `quit` or end of input.
///
/// # Errors
///
/// Returns an error only when the terminal itself fails; command errors are printed.
pub async fn run<R, W>(
    console: &mut Console,
    terminal: &mut Terminal<R, W>,
    currency: &'static Currency,
) -> Result<(), ShellError>
where
    R: AsyncRead + Unpin + Send,
    W: io::Write + Send,
{
    if let Some(session) = console.restore() {
        writeln!(terminal.out(), "Welcome back, {}!", session.user.username)?;
        render::menu(terminal.out(), session)?;
    }

    while let Some(ConsoleLine { command }) =
        terminal.next_command::<ConsoleLine>("console> ").await?
    {
        let outcome = execute(console, terminal, command, currency).await;

        if terminal.settle(outcome)? == Flow::Quit {
            break;
        }
    }

    Ok(())
}

async fn execute<R, W>(
    console: &mut Console,
    terminal: &mut Terminal<R, W>,
    command: ConsoleCommand,
    currency: &'static Currency,
) -> Result<Flow, ShellError>
where
    R: AsyncRead + Unpin + Send,
    W: io::Write + Send,
{
    match command {
        ConsoleCommand::Login { username, password } => {
            let password = password_or_prompt(terminal, password).await?;
            let session = console.login(&Credentials::new(username, password)).await?;

            render::menu(terminal.out(), session)?;
        }
        ConsoleCommand::Logout => {
            console.logout().await;

            writeln!(terminal.out(), "Signed out.")?;
        }
        ConsoleCommand::Show { section } => show(console, terminal, section, currency).await?,
        ConsoleCommand::User(command) => users(console, terminal, command).await?,
        ConsoleCommand::Customer(command) => customers(console, terminal, command).await?,
        ConsoleCommand::Item(command) => items(console, terminal, command, currency).await?,
        ConsoleCommand::Bill(command) => bills(console, terminal, command, currency).await?,
        ConsoleCommand::Quit => return Ok(Flow::Quit),
    }

    Ok(Flow::Continue)
}

async fn show<R, W>(
    console: &mut Console,
    terminal: &mut Terminal<R, W>,
    section: ConsoleSection,
    currency: &'static Currency,
) -> Result<(), ShellError>
where
    R: AsyncRead + Unpin + Send,
    W: io::Write + Send,
{
    let stats = console.enter(section).await?;

    match section {
        ConsoleSection::Dashboard => {
            if let Some(stats) = stats {
                render::dashboard(terminal.out(), &stats)?;
            }
        }
        ConsoleSection::Users => render::users(terminal.out(), console.users())?,
        ConsoleSection::Customers => render::customers(terminal.out(), console.customers())?,
        ConsoleSection::Items => render::items(terminal.out(), console.items(), currency)?,
        ConsoleSection::Billing => {
            render::bills(terminal.out(), console.bills(), currency)?;
            render::bill_draft(
                terminal.out(),
                console.draft(),
                console.bill_customer(),
                currency,
            )?;
        }
    }

    Ok(())
}

async fn users<R, W>(
    console: &mut Console,
    terminal: &mut Terminal<R, W>,
    command: UserCommand,
) -> Result<(), ShellError>
where
    R: AsyncRead + Unpin + Send,
    W: io::Write + Send,
{
    match command {
        UserCommand::Save(args) => {
            let form = UserForm {
                username: args.username,
                password: args.password,
                role: args.role,
                enabled: args.enabled,
            };

            console.save_user(args.id, &form).await?;
        }
        UserCommand::Delete { id } => {
            if !console.delete_user(id, &mut *terminal).await? {
                return Ok(());
            }
        }
    }

    render::users(terminal.out(), console.users())?;

    Ok(())
}

async fn customers<R, W>(
    console: &mut Console,
    terminal: &mut Terminal<R, W>,
    command: CustomerCommand,
) -> Result<(), ShellError>
where
    R: AsyncRead + Unpin + Send,
    W: io::Write + Send,
{
    match command {
        CustomerCommand::Save(args) => {
            let id = args.id;
            let mut form = match id {
                Some(id) => console.customer_form(id).await?,
                None => CustomerForm::default(),
            };

            args.apply(&mut form);
            console.save_customer(id, &form).await?;
        }
        CustomerCommand::Delete { id } => {
            if !console.delete_customer(id, &mut *terminal).await? {
                return Ok(());
            }
        }
    }

    render::customers(terminal.out(), console.customers())?;

    Ok(())
}

async fn items<R, W>(
    console: &mut Console,
    terminal: &mut Terminal<R, W>,
    command: ItemCommand,
    currency: &'static Currency,
) -> Result<(), ShellError>
where
    R: AsyncRead + Unpin + Send,
    W: io::Write + Send,
{
    match command {
        ItemCommand::Save(args) => {
            let id = args.id;
            let mut form = match id {
                Some(id) => console.item_form(id).await?,
                None => ItemForm::default(),
            };

            args.apply(&mut form);
            console.save_item(id, &form).await?;
        }
        ItemCommand::Delete { id } => {
            if !console.delete_item(id, &mut *terminal).await? {
                return Ok(());
            }
        }
    }

    render::items(terminal.out(), console.items(), currency)?;

    Ok(())
}

async fn bills<R, W>(
    console: &mut Console,
    terminal: &mut Terminal<R, W>,
    command: BillCommand,
    currency: &'static Currency,
) -> Result<(), ShellError>
where
    R: AsyncRead + Unpin + Send,
    W: io::Write + Send,
{
    match command {
        BillCommand::Select { customer } => {
            let customer = console.select_customer(customer)?;

            writeln!(terminal.out(), "Billing {}.", customer.name)?;
        }
        BillCommand::Add { item, quantity } => {
            console.add_to_bill(item, quantity)?;

            render::bill_draft(
                terminal.out(),
                console.draft(),
                console.bill_customer(),
                currency,
            )?;
        }
        BillCommand::Remove { item } => {
            if console.remove_from_bill(item).is_none() {
                writeln!(terminal.out(), "Item {item} is not on the bill.")?;
            }

            render::bill_draft(
                terminal.out(),
                console.draft(),
                console.bill_customer(),
                currency,
            )?;
        }
        BillCommand::Draft => render::bill_draft(
            terminal.out(),
            console.draft(),
            console.bill_customer(),
            currency,
        )?,
        BillCommand::Cancel => {
            console.cancel_bill();

            writeln!(terminal.out(), "Bill discarded.")?;
        }
        BillCommand::Create => {
            let bill = console.create_bill().await?;

            writeln!(
                terminal.out(),
                "Bill {} created for {}.",
                bill.bill_number,
                format_money(bill.total_amount, currency)
            )?;
        }
        BillCommand::View { id } => {
            let bill = console.bill(id).await?;

            render::bill_detail(terminal.out(), &bill, currency)?;
        }
        BillCommand::Status { id, status } => {
            let bill = console.set_bill_status(id, &OrderStatus::from(status)).await?;

            writeln!(terminal.out(), "Bill {} is now {}.", bill.bill_number, bill.status)?;
        }
    }

    Ok(())
}
