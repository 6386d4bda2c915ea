//! Interactive shells
//!
//! Line-oriented front ends over stdin/stdout. Every line is split with [`tokenize`] and parsed
//! with `clap`; a failed command prints its error and the shell reads the next line.

use std::{error::Error as StdError, fmt, io};

use async_trait::async_trait;
use thiserror::Error;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader, Lines};

use crate::{
    console::ConsoleError,
    prompt::{Prompt, is_yes},
    render::RenderError,
    storefront::StorefrontError,
};

pub mod console;
pub mod storefront;
mod tokenize;

pub use tokenize::{TokenizeError, tokenize};

/// Errors raised while running a command.
#[derive(Debug, Error)]
pub enum ShellError {
    /// A storefront command failed.
    #[error(transparent)]
    Storefront(#[from] StorefrontError),

    /// A console command failed.
    #[error(transparent)]
    Console(#[from] ConsoleError),

    /// Writing output failed.
    #[error(transparent)]
    Render(#[from] RenderError),

    /// Reading input or writing output failed.
    #[error("terminal I/O failed")]
    Io(#[from] io::Error),
}

impl ShellError {
    /// Whether the shell cannot carry on after this error.
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        matches!(self, ShellError::Render(_) | ShellError::Io(_))
    }
}

/// What the shell does after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

/// Line reader and output sink shared by the shells and their confirmation prompts.
pub struct Terminal<R, W> {
    lines: Lines<BufReader<R>>,
    out: W,
}

impl<R, W> fmt::Debug for Terminal<R, W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Terminal").finish_non_exhaustive()
    }
}

impl<R, W> Terminal<R, W>
where
    R: AsyncRead + Unpin + Send,
    W: io::Write + Send,
{
    /// Wrap an input stream and an output sink.
    pub fn new(input: R, out: W) -> Self {
        Self {
            lines: BufReader::new(input).lines(),
            out,
        }
    }

    /// Print `prompt` and read one line. `None` at end of input.
    ///
    /// # Errors
    ///
    /// Returns an error if the prompt cannot be written or the input cannot be read.
    pub async fn read_line(&mut self, prompt: &str) -> io::Result<Option<String>> {
        write!(self.out, "{prompt}")?;
        self.out.flush()?;

        self.lines.next_line().await
    }

    /// Output sink.
    pub fn out(&mut self) -> &mut W {
        &mut self.out
    }

    /// Consume the terminal, returning the output sink.
    pub fn into_out(self) -> W {
        self.out
    }

    /// Read the next command line and parse it as `C`.
    ///
    /// Blank lines are skipped. Lines that fail to split or parse are reported and skipped.
    async fn next_command<C: clap::Parser>(&mut self, prompt: &str) -> io::Result<Option<C>> {
        while let Some(line) = self.read_line(prompt).await? {
            let tokens = match tokenize(&line) {
                Ok(tokens) => tokens,
                Err(error) => {
                    writeln!(self.out, "error: {error}")?;

                    continue;
                }
            };

            if tokens.is_empty() {
                continue;
            }

            match C::try_parse_from(tokens) {
                Ok(command) => return Ok(Some(command)),
                Err(error) => write!(self.out, "{}", error.render())?,
            }
        }

        Ok(None)
    }

    /// Print a failed command's error with its causes.
    fn report(&mut self, error: &dyn StdError) -> io::Result<()> {
        write!(self.out, "error: {error}")?;

        let mut source = error.source();

        while let Some(cause) = source {
            write!(self.out, ": {cause}")?;
            source = cause.source();
        }

        writeln!(self.out)
    }

    /// Print a recoverable command error; fatal errors are passed on.
    fn settle(&mut self, outcome: Result<Flow, ShellError>) -> Result<Flow, ShellError> {
        match outcome {
            Ok(flow) => Ok(flow),
            Err(error) if error.is_fatal() => Err(error),
            Err(error) => {
                self.report(&error)?;

                Ok(Flow::Continue)
            }
        }
    }
}

#[async_trait]
impl<R, W> Prompt for Terminal<R, W>
where
    R: AsyncRead + Unpin + Send,
    W: io::Write + Send,
{
    async fn confirm(&mut self, question: &str) -> io::Result<bool> {
        let answer = self.read_line(&format!("{question} [y/N] ")).await?;

        Ok(answer.is_some_and(|answer| is_yes(&answer)))
    }
}

/// Read a password when it was not given on the command line.
async fn password_or_prompt<R, W>(
    terminal: &mut Terminal<R, W>,
    password: Option<String>,
) -> io::Result<String>
where
    R: AsyncRead + Unpin + Send,
    W: io::Write + Send,
{
    match password {
        Some(password) => Ok(password),
        None => Ok(terminal.read_line("Password: ").await?.unwrap_or_default()),
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::router::RouterError;

    use super::*;

    #[tokio::test]
    async fn confirm_defaults_to_no() -> TestResult {
        let mut terminal = Terminal::new(&b"yes\n\n"[..], Vec::new());

        assert!(terminal.confirm("Delete?").await?);
        assert!(!terminal.confirm("Delete?").await?);
        assert!(!terminal.confirm("Delete?").await?);

        let out = String::from_utf8(terminal.into_out())?;

        assert_eq!(out.matches("Delete? [y/N] ").count(), 3);

        Ok(())
    }

    #[test]
    fn reports_include_causes() -> TestResult {
        let mut terminal = Terminal::new(&b""[..], Vec::new());
        let error = io::Error::other(RouterError::UnknownSection("nope".to_string()));

        terminal.report(&ShellError::Io(error))?;

        assert_eq!(
            String::from_utf8(terminal.into_out())?,
            "error: terminal I/O failed: unknown section \"nope\"\n"
        );

        Ok(())
    }
}
