//! API Config

use std::path::PathBuf;

use clap::Args;
use rusty_money::iso::{self, Currency};
use thiserror::Error;

use crate::config::Frontend;

/// Configuration errors detected after parsing.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The currency code is not an ISO 4217 code.
    #[error("unknown currency code {0:?}")]
    UnknownCurrency(String),
}

/// Bookshop API and local state settings.
#[derive(Debug, Args)]
pub struct ApiConfig {
    /// Base URL of the bookshop API
    #[arg(long, env = "QUIRE_API_BASE", default_value = "http://localhost:8080/api")]
    pub api_base: String,

    /// Directory holding the persisted session
    #[arg(long, env = "QUIRE_STATE_DIR", default_value = ".quire")]
    pub state_dir: PathBuf,

    /// ISO 4217 currency used to display prices
    #[arg(long, env = "QUIRE_CURRENCY", default_value = "USD")]
    pub currency: String,
}

impl ApiConfig {
    /// Resolve the display currency.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnknownCurrency`] for codes `rusty-money` does not know.
    pub fn currency(&self) -> Result<&'static Currency, ConfigError> {
        iso::find(&self.currency.trim().to_uppercase())
            .ok_or_else(|| ConfigError::UnknownCurrency(self.currency.clone()))
    }

    /// State directory for one front end.
    #[must_use]
    pub fn state_dir_for(&self, frontend: Frontend) -> PathBuf {
        self.state_dir.join(frontend.state_subdir())
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    fn config(currency: &str) -> ApiConfig {
        ApiConfig {
            api_base: "http://localhost:8080/api".to_string(),
            state_dir: PathBuf::from(".quire"),
            currency: currency.to_string(),
        }
    }

    #[test]
    fn currency_codes_are_case_insensitive() -> TestResult {
        assert_eq!(config("lkr").currency()?, iso::LKR);

        Ok(())
    }

    #[test]
    fn unknown_currency_is_rejected() {
        assert!(matches!(
            config("XYZ1").currency(),
            Err(ConfigError::UnknownCurrency(code)) if code == "XYZ1"
        ));
    }

    #[test]
    fn state_is_split_by_front_end() {
        assert_eq!(
            config("USD").state_dir_for(Frontend::Console),
            PathBuf::from(".quire/console")
        );
    }
}
