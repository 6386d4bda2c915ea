//! Quire bookshop client
//!
//! The storefront and console front ends for the bookshop HTTP API: transport, typed API,
//! session persistence, per-front-end controllers, renderers and the interactive shells.

pub mod api;
pub mod config;
pub mod console;
pub mod gateway;
pub mod observability;
pub mod prompt;
pub mod render;
pub mod router;
pub mod session;
pub mod shell;
pub mod store;
pub mod storefront;
