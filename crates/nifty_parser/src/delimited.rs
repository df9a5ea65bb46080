//! Delimited tuple data.
//!
//! One tuple per line, fields separated by a delimiter string. An empty field
//! is read as null.

use crate::{ParserError, Result};
use nifty_core::Tuple;
use std::path::Path;

/// Splits a single line into a tuple.
///
/// Fails with [`ParserError::EmptyDelimiter`] when `delimiter` is empty.
pub fn parse_delimited_line(line: &str, delimiter: &str) -> Result<Tuple> {
    if delimiter.is_empty() {
        return Err(ParserError::EmptyDelimiter);
    }
    let line = line.strip_suffix('\r').unwrap_or(line);

    Ok(line
        .split(delimiter)
        .map(|value| (!value.is_empty()).then(|| value.to_string()))
        .collect())
}

/// Splits `content` into tuples, skipping empty lines.
pub fn parse_delimited(content: &str, delimiter: &str) -> Result<Vec<Tuple>> {
    content
        .lines()
        .filter(|line| !line.is_empty() && *line != "\r")
        .map(|line| parse_delimited_line(line, delimiter))
        .collect()
}

/// Reads a delimited data file.
pub fn parse_data_file(path: &Path, delimiter: &str) -> Result<Vec<Tuple>> {
    if delimiter.is_empty() {
        return Err(ParserError::EmptyDelimiter);
    }
    let content = std::fs::read_to_string(path)?;
    parse_delimited(&content, delimiter)
}
