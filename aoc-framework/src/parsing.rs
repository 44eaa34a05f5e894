//! Helpers and errors for turning puzzle input text into data.
//!
//! Errors raised while parsing a line are wrapped in [`InvalidLine`] so the report points at the
//! one-based line number of the input file.

use std::iter::{Enumerate, Peekable};
use std::str::{FromStr, Lines};

use thiserror::Error;

use crate::DynamicError;

/// A string parsing error with context of the string that was being parsed.
#[derive(Error, Debug)]
#[error("failed to parse string: {string:?}")]
pub struct ParseContextError<E>
where
    E: std::error::Error,
{
    /// The string that was being parsed.
    string: String,
    source: E,
}

/// Parse a string slice into another type, keeping the string as error context.
///
/// # Errors
///
/// Returns a [`ParseContextError`] sourcing [`F::Err`][FromStr::Err] if the string does not parse.
pub fn parse_with_context<F>(string: &str) -> Result<F, ParseContextError<F::Err>>
where
    F: FromStr,
    F::Err: std::error::Error,
{
    string.parse::<F>().map_err(|source| ParseContextError {
        string: string.to_owned(),
        source,
    })
}

/// A line in an input string caused a parsing error.
#[derive(Error, Debug)]
#[error("failure parsing line {}", .line_index.saturating_add(1))]
pub struct InvalidLine {
    /// The line index, zero based. Displayed one based.
    line_index: usize,
    source: DynamicError,
}

impl InvalidLine {
    fn new(line_index: usize, source: impl Into<DynamicError>) -> Self {
        Self {
            line_index,
            source: source.into(),
        }
    }

    /// The zero based index of the line that failed.
    #[must_use]
    pub fn line_index(&self) -> usize {
        self.line_index
    }
}

/// Parse every line of the input with a closure receiving `(line_index, line)`.
///
/// Line errors are mapped to [`InvalidLine`]. Collect the iterator into a `Result` to stop at the
/// first failure.
pub fn parse_input_lines<T, E, F>(
    input: &str,
    parser: F,
) -> impl Iterator<Item = Result<T, InvalidLine>>
where
    E: Into<DynamicError>,
    F: FnMut(usize, &str) -> Result<T, E>,
{
    parse_lines_with_offset(input, 0, parser)
}

/// Like [`parse_input_lines`], adding `offset` to every reported line index.
///
/// Useful when `input` is a later slice of the original text.
pub fn parse_lines_with_offset<T, E, F>(
    input: &str,
    offset: usize,
    mut parser: F,
) -> impl Iterator<Item = Result<T, InvalidLine>>
where
    E: Into<DynamicError>,
    F: FnMut(usize, &str) -> Result<T, E>,
{
    input.lines().enumerate().map(move |(index, line)| {
        let line_index = index.saturating_add(offset);
        parser(line_index, line).map_err(|source| InvalidLine::new(line_index, source))
    })
}

/// A cursor over input lines for puzzles made of blocks separated by blank lines.
///
/// A *sequence* is a run of consecutive non-blank lines. Blank lines are never consumed by the
/// sequence methods, only by [`InputScanner::skip_empty`] and [`InputScanner::next_item`].
#[derive(Debug)]
pub struct InputScanner<'a> {
    lines: Peekable<Enumerate<Lines<'a>>>,
}

impl<'a> InputScanner<'a> {
    #[must_use]
    pub fn new(input: &'a str) -> Self {
        Self {
            lines: input.lines().enumerate().peekable(),
        }
    }

    /// Skip blank lines. Returns the index of the next non-blank line, or `None` at the end.
    pub fn skip_empty(&mut self) -> Option<usize> {
        while let Some((index, line)) = self.lines.peek() {
            if !line.trim().is_empty() {
                return Some(*index);
            }
            self.lines.next();
        }
        None
    }

    /// Parse the next line if it continues the current sequence.
    ///
    /// Returns `Ok(None)` without consuming anything when the next line is blank or the input is
    /// exhausted.
    ///
    /// # Errors
    ///
    /// The parser's error is returned as an [`InvalidLine`].
    pub fn next_in_sequence<T, E, F>(&mut self, parser: F) -> Result<Option<T>, InvalidLine>
    where
        E: Into<DynamicError>,
        F: FnOnce(usize, &str) -> Result<T, E>,
    {
        match self.lines.peek() {
            Some((_, line)) if !line.trim().is_empty() => {}
            _ => return Ok(None),
        }
        let Some((index, line)) = self.lines.next() else {
            return Ok(None);
        };
        parser(index, line)
            .map(Some)
            .map_err(|source| InvalidLine::new(index, source))
    }

    /// Skip blank lines, then parse the next line.
    ///
    /// # Errors
    ///
    /// The parser's error is returned as an [`InvalidLine`].
    pub fn next_item<T, E, F>(&mut self, parser: F) -> Result<Option<T>, InvalidLine>
    where
        E: Into<DynamicError>,
        F: FnOnce(usize, &str) -> Result<T, E>,
    {
        self.skip_empty();
        self.next_in_sequence(parser)
    }

    /// Parse lines until a blank line or the end of input.
    ///
    /// # Errors
    ///
    /// Stops at the first parser error, returned as an [`InvalidLine`].
    pub fn collect_sequence<T, E, F>(&mut self, mut parser: F) -> Result<Vec<T>, InvalidLine>
    where
        E: Into<DynamicError>,
        F: FnMut(usize, &str) -> Result<T, E>,
    {
        let mut items = Vec::new();
        while let Some(item) = self.next_in_sequence(&mut parser)? {
            items.push(item);
        }
        Ok(items)
    }
}

/// An error for a single row of a digit grid.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum DigitRowError {
    #[error("invalid digit character: {0:?}")]
    InvalidDigit(char),

    #[error("expected grid width to be {expected} across rows, but found row width {found}")]
    UnequalGridWidth { expected: usize, found: usize },
}

/// An error parsing a grid of decimal digits.
#[derive(Error, Debug)]
pub enum DigitGridError {
    #[error("digit grid has no cells")]
    Empty,

    #[error(transparent)]
    Line(#[from] InvalidLine),
}

/// Parse a rectangular block of single decimal digits into rows.
///
/// Trailing blank lines are ignored.
///
/// # Errors
///
/// A non-digit character or a row of a different width than the first row is reported for its
/// line. An input without any digits is [`DigitGridError::Empty`].
pub fn parse_digit_grid(input: &str) -> Result<Vec<Vec<u8>>, DigitGridError> {
    let mut expected_width = None;
    let rows = parse_input_lines(input.trim_end(), |_, line| {
        let row = line
            .chars()
            .map(|ch| {
                ch.to_digit(10)
                    .and_then(|digit| u8::try_from(digit).ok())
                    .ok_or(DigitRowError::InvalidDigit(ch))
            })
            .collect::<Result<Vec<_>, _>>()?;

        match expected_width {
            Some(width) if row.len() != width => {
                return Err(DigitRowError::UnequalGridWidth {
                    expected: width,
                    found: row.len(),
                });
            }
            Some(_) => {}
            None => expected_width = Some(row.len()),
        }

        Ok(row)
    })
    .collect::<Result<Vec<_>, _>>()?;

    if rows.first().is_none_or(Vec::is_empty) {
        return Err(DigitGridError::Empty);
    }
    Ok(rows)
}
