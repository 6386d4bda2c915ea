//! Discount codes
//!
//! A fixed, process-wide table of percentage codes. Codes are matched after trimming and
//! upper-casing the user's input.

use rust_decimal::Decimal;

/// A percentage discount code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiscountCode {
    /// Canonical (upper-case) code.
    pub code: &'static str,

    /// Whole percentage points taken off the line subtotal.
    pub percentage: u8,

    /// Human readable description.
    pub description: &'static str,
}

impl DiscountCode {
    /// Discount amount for a subtotal, without rounding.
    #[must_use]
    pub fn amount_off(&self, subtotal: Decimal) -> Decimal {
        subtotal * Decimal::from(self.percentage) / Decimal::ONE_HUNDRED
    }
}

/// Every code the storefront accepts.
pub const DISCOUNT_CODES: [DiscountCode; 4] = [
    DiscountCode {
        code: "STUDENT10",
        percentage: 10,
        description: "Student Discount 10%",
    },
    DiscountCode {
        code: "WELCOME5",
        percentage: 5,
        description: "Welcome Discount 5%",
    },
    DiscountCode {
        code: "BULK15",
        percentage: 15,
        description: "Bulk Purchase 15%",
    },
    DiscountCode {
        code: "NEWUSER20",
        percentage: 20,
        description: "New User Discount 20%",
    },
];

/// Normalise raw user input into the form codes are stored in.
#[must_use]
pub fn normalise(input: &str) -> String {
    input.trim().to_uppercase()
}

/// Look up a code, ignoring case and surrounding whitespace.
#[must_use]
pub fn lookup(input: &str) -> Option<&'static DiscountCode> {
    let code = normalise(input);

    DISCOUNT_CODES.iter().find(|discount| discount.code == code)
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use testresult::TestResult;

    use super::*;

    #[test]
    fn lookup_is_case_insensitive_and_trimmed() {
        let found = lookup("  student10 ");

        assert_eq!(found.map(|d| d.percentage), Some(10));
    }

    #[test]
    fn lookup_unknown_code_is_none() {
        assert!(lookup("FAKE10").is_none());
        assert!(lookup("").is_none());
    }

    #[test]
    fn amount_off_is_unrounded() -> TestResult {
        let welcome = lookup("WELCOME5").ok_or("missing WELCOME5")?;
        let subtotal = Decimal::from_str("19.99")?;

        assert_eq!(welcome.amount_off(subtotal), Decimal::from_str("0.9995")?);

        Ok(())
    }
}
