//! Storefront Errors

use std::io;

use thiserror::Error;

use quire::{cart::CartError, catalog::CatalogError};

use crate::{api::ApiError, session::SessionError, storefront::registration::RegistrationError};

/// Errors raised by storefront commands.
#[derive(Debug, Error)]
pub enum StorefrontError {
    /// Checkout was attempted with nothing in the cart.
    #[error("your cart is empty")]
    EmptyCart,

    /// The command needs a signed-in customer.
    #[error("please sign in first")]
    NotAuthenticated,

    /// Cart validation failed.
    #[error(transparent)]
    Cart(#[from] CartError),

    /// The item is not in the catalog.
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// Registration details were rejected before sending.
    #[error(transparent)]
    Registration(#[from] RegistrationError),

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
