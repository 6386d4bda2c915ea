//! Typed bookshop API.

pub mod errors;
pub mod models;
pub mod service;

pub use errors::ApiError;
pub use service::{ApiClient, BookshopApi, MockBookshopApi};
