//! View router
//!
//! Named sections of each front end. Entering a section tells the controller which data to
//! (re)load; section names are matched case-insensitively.

use std::{fmt, str::FromStr};

use thiserror::Error;

use crate::api::models::UserProfile;

/// Errors raised when parsing a section name.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RouterError {
    /// No section goes by that name.
    #[error("unknown section {0:?}")]
    UnknownSection(String),
}

/// Storefront sections.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorefrontSection {
    /// The signed-in customer's profile.
    Profile,

    /// Catalog of books.
    Items,

    /// Cart contents and totals.
    Cart,

    /// Order history.
    Orders,

    /// Purchase report derived from the order history.
    Report,
}

impl StorefrontSection {
    /// Every section in menu order.
    pub const ALL: [StorefrontSection; 5] = [
        StorefrontSection::Profile,
        StorefrontSection::Items,
        StorefrontSection::Cart,
        StorefrontSection::Orders,
        StorefrontSection::Report,
    ];

    /// Lower-case name used on the command line.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            StorefrontSection::Profile => "profile",
            StorefrontSection::Items => "items",
            StorefrontSection::Cart => "cart",
            StorefrontSection::Orders => "orders",
            StorefrontSection::Report => "report",
        }
    }
}

/// Console sections.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsoleSection {
    /// Headline counts.
    Dashboard,

    /// Console accounts. Admin only.
    Users,

    /// Customer records.
    Customers,

    /// Catalog items.
    Items,

    /// Bill list and the bill draft.
    Billing,
}

impl ConsoleSection {
    /// Every section in menu order.
    pub const ALL: [ConsoleSection; 5] = [
        ConsoleSection::Dashboard,
        ConsoleSection::Users,
        ConsoleSection::Customers,
        ConsoleSection::Items,
        ConsoleSection::Billing,
    ];

    /// Lower-case name used on the command line.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            ConsoleSection::Dashboard => "dashboard",
            ConsoleSection::Users => "users",
            ConsoleSection::Customers => "customers",
            ConsoleSection::Items => "items",
            ConsoleSection::Billing => "billing",
        }
    }

    /// Whether `user` may open this section.
    #[must_use]
    pub fn visible_to(self, user: &UserProfile) -> bool {
        match self {
            ConsoleSection::Users => user.is_admin(),
            _ => true,
        }
    }

    /// Sections `user` may open, in menu order.
    #[must_use]
    pub fn menu_for(user: &UserProfile) -> Vec<ConsoleSection> {
        Self::ALL
            .into_iter()
            .filter(|section| section.visible_to(user))
            .collect()
    }
}

fn parse_section<T: Copy>(
    input: &str,
    sections: &[T],
    name: impl Fn(T) -> &'static str,
) -> Result<T, RouterError> {
    let wanted = input.trim();

    sections
        .iter()
        .copied()
        .find(|section| name(*section).eq_ignore_ascii_case(wanted))
        .ok_or_else(|| RouterError::UnknownSection(wanted.to_string()))
}

impl FromStr for StorefrontSection {
    type Err = RouterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_section(s, &Self::ALL, Self::name)
    }
}

impl FromStr for ConsoleSection {
    type Err = RouterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_section(s, &Self::ALL, Self::name)
    }
}

impl fmt::Display for StorefrontSection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl fmt::Display for ConsoleSection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    fn user(role: &str) -> UserProfile {
        UserProfile {
            id: 1,
            username: "someone".to_string(),
            role: Some(role.to_string()),
        }
    }

    #[test]
    fn sections_parse_case_insensitively() -> TestResult {
        assert_eq!("Orders".parse::<StorefrontSection>()?, StorefrontSection::Orders);
        assert_eq!(" BILLING ".parse::<ConsoleSection>()?, ConsoleSection::Billing);

        Ok(())
    }

    #[test]
    fn unknown_sections_are_rejected() {
        assert_eq!(
            "wishlist".parse::<StorefrontSection>(),
            Err(RouterError::UnknownSection("wishlist".to_string()))
        );
    }

    #[test]
    fn users_section_is_admin_only() {
        assert!(ConsoleSection::Users.visible_to(&user("ADMIN")));
        assert!(!ConsoleSection::Users.visible_to(&user("STAFF")));
        assert!(!ConsoleSection::menu_for(&user("STAFF")).contains(&ConsoleSection::Users));
        assert_eq!(ConsoleSection::menu_for(&user("ADMIN")).len(), 5);
    }

    #[test]
    fn names_round_trip_through_display() -> TestResult {
        for section in StorefrontSection::ALL {
            assert_eq!(section.to_string().parse::<StorefrontSection>()?, section);
        }

        Ok(())
    }
}
