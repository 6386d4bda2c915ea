//! Confirmation prompts.

use std::io;

use async_trait::async_trait;
use mockall::automock;

/// Asks the user to confirm destructive actions.
#[automock]
#[async_trait]
pub trait Prompt: Send {
    /// Ask a yes/no question, defaulting to no.
    async fn confirm(&mut self, question: &str) -> io::Result<bool>;
}

/// Whether a typed answer means yes.
#[must_use]
pub fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_explicit_yes_confirms() {
        assert!(is_yes(" Y "));
        assert!(is_yes("yes"));
        assert!(!is_yes(""));
        assert!(!is_yes("nope"));
    }
}
