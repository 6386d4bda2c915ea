//! Terminal renderers
//!
//! Plain-text tables written to any [`io::Write`]. Renderers only read state; money is rounded
//! here and nowhere else.

use std::{io, ops::Range};

use jiff::civil::DateTime;
use tabled::{
    builder::Builder,
    settings::{
        Alignment, Color, Style,
        object::{Columns, Rows},
    },
};
use thiserror::Error;

pub mod console;
pub mod storefront;

/// Errors that can occur while rendering.
#[derive(Debug, Error)]
pub enum RenderError {
    /// Writing to the output failed.
    #[error("failed to write output")]
    Io(#[from] io::Error),
}

fn write_table(
    out: &mut impl io::Write,
    builder: Builder,
    right_aligned: Range<usize>,
) -> Result<(), RenderError> {
    let mut table = builder.build();

    table.with(Style::modern_rounded());
    table.modify(Rows::first(), Color::BOLD);
    table.modify(Columns::new(right_aligned), Alignment::right());

    writeln!(out, "{table}")?;

    Ok(())
}

fn write_summary(out: &mut impl io::Write, lines: &[(&str, String)]) -> Result<(), RenderError> {
    let label_width = lines.iter().map(|(label, _)| label.len()).max().unwrap_or(0);
    let value_width = lines
        .iter()
        .map(|(_, value)| value.chars().count())
        .max()
        .unwrap_or(0);

    for (label, value) in lines {
        writeln!(out, " {label:<label_width$}  {value:>value_width$}")?;
    }

    Ok(())
}

fn write_empty(out: &mut impl io::Write, message: &str) -> Result<(), RenderError> {
    writeln!(out, "{message}")?;

    Ok(())
}

/// Server timestamps come without an offset; show them to the minute.
fn format_date(raw: Option<&str>) -> String {
    let Some(raw) = raw else {
        return "N/A".to_string();
    };

    raw.parse::<DateTime>().map_or_else(
        |_| raw.to_string(),
        |date| date.strftime("%Y-%m-%d %H:%M").to_string(),
    )
}
