//! Console Errors

use std::io;

use thiserror::Error;

use quire::{
    bill::{BillError, CustomerId},
    catalog::CatalogError,
};

use crate::{api::ApiError, router::ConsoleSection, session::SessionError};

/// Errors raised by console commands.
#[derive(Debug, Error)]
pub enum ConsoleError {
    /// The command needs a signed-in user.
    #[error("please sign in first")]
    NotAuthenticated,

    /// The section or command is limited to administrators.
    #[error("the {0} section is only available to administrators")]
    AdminOnly(ConsoleSection),

    /// A bill was submitted without choosing a customer.
    #[error("please select a customer for the bill")]
    NoCustomerSelected,

    /// The customer is not in the fetched customer list.
    #[error("no customer with id {0}")]
    UnknownCustomer(CustomerId),

    /// A bill can only be moved to a status the server knows.
    #[error("unknown bill status {0:?}; use PENDING, PAID, COMPLETED or CANCELLED")]
    UnknownStatus(String),

    /// Bill draft validation failed.
    #[error(transparent)]
    Bill(#[from] BillError),

    /// The item is not in the fetched item list.
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// Login, logout or session persistence failed.
    #[error(transparent)]
    Session(#[from] SessionError),

    /// The API call failed.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// Reading a confirmation failed.
    #[error("failed to read confirmation")]
    Prompt(#[from] io::Error),
}
