//! Application configuration module

use clap::{Parser, Subcommand};

use crate::config::{api::ApiConfig, observability::LoggingConfig};

pub mod api;
pub mod observability;

pub use api::ConfigError;

/// Which front end a shell runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Subcommand)]
pub enum Frontend {
    /// Customer storefront: browse books, fill a cart and place orders.
    Storefront,

    /// Seller console: manage users, customers and items, and raise bills.
    Console,
}

impl Frontend {
    /// Subdirectory of the state directory used by this front end.
    #[must_use]
    pub fn state_subdir(self) -> &'static str {
        match self {
            Frontend::Storefront => "storefront",
            Frontend::Console => "console",
        }
    }
}

/// Quire bookshop client configuration
#[derive(Debug, Parser)]
#[command(name = "quire", about = "Quire bookshop client", long_about = None)]
pub struct AppConfig {
    /// API and local state settings.
    #[command(flatten)]
    pub api: ApiConfig,

    /// Logging output settings.
    #[command(flatten)]
    pub logging: LoggingConfig,

    /// Front end to run.
    #[command(subcommand)]
    pub frontend: Frontend,
}

impl AppConfig {
    /// Load configuration from environment and CLI arguments
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be parsed
    pub fn load() -> Result<Self, clap::Error> {
        // Load .env file if present (ignore if missing)
        _ = dotenvy::dotenv();

        Self::try_parse()
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use testresult::TestResult;

    use super::*;

    #[test]
    fn flags_override_defaults() -> TestResult {
        let config = AppConfig::try_parse_from([
            "quire",
            "--api-base",
            "http://shop.test/api",
            "--state-dir",
            "/tmp/quire",
            "console",
        ])?;

        assert_eq!(config.api.api_base, "http://shop.test/api");
        assert_eq!(config.api.state_dir.as_path(), Path::new("/tmp/quire"));
        assert_eq!(config.frontend, Frontend::Console);

        Ok(())
    }

    #[test]
    fn a_front_end_is_required() {
        assert!(AppConfig::try_parse_from(["quire"]).is_err());
    }

    #[test]
    fn front_ends_use_separate_state() {
        assert_ne!(
            Frontend::Storefront.state_subdir(),
            Frontend::Console.state_subdir()
        );
    }
}
