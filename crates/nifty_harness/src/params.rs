//! Script parameter substitution.
//!
//! Scripts reference parameters as `$name`. Values come from `key=value`
//! arguments, from argument files holding one `key=value` per line, and
//! from `%default`/`%declare` lines in the script itself. Arguments win
//! over argument files, which win over in-script declarations.

use crate::{HarnessError, Result};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use std::collections::HashMap;
use std::path::Path;

static PARAMETER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\$([A-Za-z_][A-Za-z0-9_]*)").expect("parameter regex"));

static DECLARATION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"^\s*%(?:default|declare)\s+([A-Za-z_][A-Za-z0-9_]*)\s+(.*?)\s*;?\s*$"#)
        .expect("declaration regex")
});

/// Substitutes `$name` parameters in `script`.
///
/// Positional field references such as `$0` are left alone.
///
/// # Errors
///
/// Fails with [`HarnessError::UndefinedParameter`] when a parameter has no
/// value, and with [`HarnessError::Io`] when an argument file can't be read.
pub fn substitute<P: AsRef<Path>>(script: &str, args: &[String], arg_files: &[P]) -> Result<String> {
    let mut params = HashMap::new();
    for file in arg_files {
        let content = std::fs::read_to_string(file)?;
        params.extend(content.lines().filter_map(parse_assignment));
    }
    params.extend(args.iter().filter_map(|arg| parse_assignment(arg)));

    let mut body = Vec::new();
    for line in script.lines() {
        match DECLARATION.captures(line) {
            Some(caps) => {
                params
                    .entry(caps[1].to_string())
                    .or_insert_with(|| unquote(&caps[2]).to_string());
            }
            None => body.push(line),
        }
    }

    let mut missing = None;
    let substituted = body
        .iter()
        .map(|line| {
            PARAMETER
                .replace_all(line, |caps: &Captures| match params.get(&caps[1]) {
                    Some(value) => value.clone(),
                    None => {
                        missing.get_or_insert_with(|| caps[1].to_string());
                        caps[0].to_string()
                    }
                })
                .into_owned()
        })
        .collect::<Vec<_>>()
        .join("\n");

    match missing {
        Some(name) => Err(HarnessError::UndefinedParameter(name)),
        None => Ok(substituted),
    }
}

fn parse_assignment(line: &str) -> Option<(String, String)> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return None;
    }

    let (key, value) = line.split_once('=')?;
    Some((key.trim().to_string(), unquote(value.trim()).to_string()))
}

fn unquote(value: &str) -> &str {
    for quote in ['\'', '"'] {
        if let Some(inner) = value
            .strip_prefix(quote)
            .and_then(|v| v.strip_suffix(quote))
        {
            return inner;
        }
    }
    value
}
