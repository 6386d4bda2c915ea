//! Customer registration
//!
//! Client-side checks run before `POST /public/customer/register`, and the account number hint
//! sent with the request.

use rand::Rng;
use thiserror::Error;

use crate::api::models::Registration;

/// Registration details rejected before sending.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistrationError {
    /// Name shorter than two characters.
    #[error("name must be at least 2 characters long")]
    NameTooShort,

    /// Telephone is not ten characters.
    #[error("please enter a valid 10-digit phone number")]
    InvalidTelephone,

    /// Username shorter than three characters.
    #[error("username must be at least 3 characters long")]
    UsernameTooShort,

    /// Password shorter than six characters.
    #[error("password must be at least 6 characters long")]
    PasswordTooShort,
}

/// Registration details as typed by the customer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegistrationForm {
    /// Full name.
    pub name: String,

    /// Optional email.
    pub email: String,

    /// Telephone number.
    pub telephone: String,

    /// Optional address.
    pub address: String,

    /// Login name.
    pub username: String,

    /// Login password.
    pub password: String,
}

impl RegistrationForm {
    /// Validate the form and build the request body.
    ///
    /// # Errors
    ///
    /// Returns the first failed check in field order: name, telephone, username, password.
    pub fn validate(self, account_number: String) -> Result<Registration, RegistrationError> {
        let name = self.name.trim();
        let telephone = self.telephone.trim();
        let username = self.username.trim();

        if name.chars().count() < 2 {
            return Err(RegistrationError::NameTooShort);
        }

        if telephone.chars().count() != 10 {
            return Err(RegistrationError::InvalidTelephone);
        }

        if username.chars().count() < 3 {
            return Err(RegistrationError::UsernameTooShort);
        }

        if self.password.chars().count() < 6 {
            return Err(RegistrationError::PasswordTooShort);
        }

        Ok(Registration {
            name: name.to_string(),
            email: non_empty(&self.email),
            telephone: telephone.to_string(),
            address: non_empty(&self.address),
            username: username.to_string(),
            password: self.password,
            account_number,
        })
    }
}

fn non_empty(value: &str) -> Option<String> {
    let value = value.trim();

    (!value.is_empty()).then(|| value.to_string())
}

/// Account number hint: `ACC`, the last six digits of the timestamp, then three random digits.
pub fn account_number_hint(epoch_millis: i64, rng: &mut impl Rng) -> String {
    let random: u16 = rng.gen_range(0..1000);

    format!("ACC{:06}{random:03}", epoch_millis.rem_euclid(1_000_000))
}
