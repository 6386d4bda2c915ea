//! Command line splitting.

use thiserror::Error;

/// Errors raised while splitting a line into words.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TokenizeError {
    /// A quote was opened and never closed.
    #[error("unterminated {0} quote")]
    UnterminatedQuote(char),
}

/// Split a line on whitespace, keeping quoted text together.
///
/// Single quotes are literal. Inside double quotes and bare words a backslash escapes the next
/// character.
///
/// # Errors
///
/// Returns [`TokenizeError::UnterminatedQuote`] if a quote is left open.
pub fn tokenize(line: &str) -> Result<Vec<String>, TokenizeError> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_token = false;
    let mut chars = line.chars();

    while let Some(c) = chars.next() {
        match c {
            '\'' | '"' => {
                in_token = true;

                read_quoted(&mut chars, c, &mut current)?;
            }
            '\\' => {
                in_token = true;

                current.push(chars.next().unwrap_or('\\'));
            }
            c if c.is_whitespace() => {
                if in_token {
                    tokens.push(std::mem::take(&mut current));
                    in_token = false;
                }
            }
            c => {
                in_token = true;

                current.push(c);
            }
        }
    }

    if in_token {
        tokens.push(current);
    }

    Ok(tokens)
}

fn read_quoted(
    chars: &mut std::str::Chars<'_>,
    quote: char,
    current: &mut String,
) -> Result<(), TokenizeError> {
    while let Some(c) = chars.next() {
        match c {
            c if c == quote => return Ok(()),
            '\\' if quote == '"' => {
                let escaped = chars.next().ok_or(TokenizeError::UnterminatedQuote(quote))?;

                current.push(escaped);
            }
            c => current.push(c),
        }
    }

    Err(TokenizeError::UnterminatedQuote(quote))
}
