//! Parser for Nifty expectation files (YAML/TOML formats) and delimited data.
//!
//! Expectation files describe a dataset validator declaratively: the dataset
//! alias, the matching mode, the expected tuple width and the expected tuples.
//! Parsed [`Expectation`]s convert into a
//! [`DataSetValidatorBuilder`](nifty_validator::DataSetValidatorBuilder).
//!
//! # Example
//!
//! ```rust
//! use nifty_parser::parse_yaml;
//!
//! let yaml = r#"
//! dataset: result
//! mode: by_selector
//! size: 2
//! tuples:
//!   - select: "1234"
//!     fields:
//!       - type: string
//!         value: Garbage
//! "#;
//!
//! let expectation = parse_yaml(yaml).expect("Failed to parse expectation");
//! assert_eq!(expectation.dataset, "result");
//! assert_eq!(expectation.tuples.len(), 1);
//! ```

mod delimited;
mod expectation;

pub use delimited::*;
pub use expectation::*;

use nifty_core::NiftyError;
use std::path::Path;
use thiserror::Error;

/// Errors that can occur during expectation parsing.
#[derive(Debug, Error)]
pub enum ParserError {
    /// YAML parsing or deserialization failed
    #[error("Failed to parse YAML: {0}")]
    YamlError(#[from] serde_yaml_ng::Error),

    /// TOML parsing or deserialization failed
    #[error("Failed to parse TOML: {0}")]
    TomlError(String),

    /// File I/O error
    #[error("File I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Unsupported file format
    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(String),

    /// Invalid file extension
    #[error("Invalid or missing file extension")]
    InvalidExtension,

    /// Delimited data needs a non-empty field delimiter
    #[error("Field delimiter must not be empty")]
    EmptyDelimiter,

    /// The expectation parsed but describes an invalid validator
    #[error("Invalid expectation: {0}")]
    InvalidExpectation(#[from] NiftyError),
}

/// Result type alias for parser operations.
pub type Result<T> = std::result::Result<T, ParserError>;

/// Supported expectation file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpectationFormat {
    /// YAML format (.yml, .yaml)
    Yaml,
    /// TOML format (.toml)
    Toml,
}

/// Parse an expectation from a YAML string.
pub fn parse_yaml(content: &str) -> Result<Expectation> {
    let expectation: Expectation = serde_yaml_ng::from_str(content)?;
    Ok(expectation)
}

/// Parse an expectation from a TOML string.
///
/// # Example
///
/// ```rust
/// use nifty_parser::parse_toml;
///
/// let toml = r#"
/// dataset = "result"
/// mode = "single"
/// size = 2
///
/// [[tuples]]
/// fields = [{ type = "is_string" }, { type = "is_string" }]
/// "#;
///
/// let expectation = parse_toml(toml).unwrap();
/// assert_eq!(expectation.mode, "single");
/// ```
pub fn parse_toml(content: &str) -> Result<Expectation> {
    let expectation: Expectation =
        toml::from_str(content).map_err(|e| ParserError::TomlError(e.to_string()))?;
    Ok(expectation)
}

/// Detect the expectation format from a file path based on its extension.
///
/// # Errors
///
/// Returns `ParserError::InvalidExtension` if the file has no extension.
/// Returns `ParserError::UnsupportedFormat` if the extension is not recognized.
pub fn detect_format(path: &Path) -> Result<ExpectationFormat> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .ok_or(ParserError::InvalidExtension)?;

    match extension.to_lowercase().as_str() {
        "yaml" | "yml" => Ok(ExpectationFormat::Yaml),
        "toml" => Ok(ExpectationFormat::Toml),
        other => Err(ParserError::UnsupportedFormat(other.to_string())),
    }
}

/// Parse an expectation from a file with automatic format detection.
///
/// ```no_run
/// use nifty_parser::parse_file;
/// use std::path::Path;
///
/// let expectation = parse_file(Path::new("expectations/result.yml")).unwrap();
/// println!("Loaded expectation for: {}", expectation.dataset);
/// ```
pub fn parse_file(path: &Path) -> Result<Expectation> {
    let content = std::fs::read_to_string(path)?;
    let format = detect_format(path)?;

    match format {
        ExpectationFormat::Yaml => parse_yaml(&content),
        ExpectationFormat::Toml => parse_toml(&content),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nifty_core::{Tuple, ValidationMode};
    use pretty_assertions::assert_eq;
    use std::io::Write;

    const FLEET_YAML: &str = r#"
dataset: result
mode: by_selector
size: 2
description: Union of both fleets
tuples:
  - select: "1234"
    fields:
      - type: string
        value: Garbage
  - select: Starship
    fields:
      - type: one_of
        values: [Enterprise, Voyager]
  - select: Battlestar
    fields:
      - type: pattern
        regex: "^Gal"
"#;

    #[test]
    fn test_parse_valid_yaml_minimal() {
        let yaml = r#"
dataset: result
mode: single
"#;

        let expectation = parse_yaml(yaml).expect("Failed to parse valid YAML");

        assert_eq!(expectation.dataset, "result");
        assert_eq!(expectation.mode, "single");
        assert_eq!(expectation.size, None);
        assert_eq!(expectation.description, None);
        assert!(expectation.tuples.is_empty());
    }

    #[test]
    fn test_parse_valid_yaml_with_tuples() {
        let expectation = parse_yaml(FLEET_YAML).expect("Failed to parse YAML with tuples");

        assert_eq!(expectation.size, Some(2));
        assert_eq!(expectation.description.as_deref(), Some("Union of both fleets"));
        assert_eq!(expectation.tuples.len(), 3);
        assert_eq!(expectation.tuples[0].select.as_deref(), Some("1234"));
        assert_eq!(
            expectation.tuples[0].fields,
            vec![FieldSpec::String {
                value: "Garbage".to_string()
            }]
        );
        assert_eq!(
            expectation.tuples[1].fields,
            vec![FieldSpec::OneOf {
                values: vec!["Enterprise".to_string(), "Voyager".to_string()]
            }]
        );
    }

    #[test]
    fn test_yaml_expectation_validates_tuples() {
        let validator = parse_yaml(FLEET_YAML)
            .unwrap()
            .to_builder()
            .unwrap()
            .build()
            .unwrap();

        assert_eq!(validator.mode(), ValidationMode::BySelector);

        let report = validator.validate(vec![
            Tuple::from_values(["Battlestar", "Galactica"]),
            Tuple::from_values(["Starship", "Enterprise"]),
            Tuple::from_values(["1234", "Garbage"]),
        ]);
        assert!(report.is_valid());
    }

    #[test]
    fn test_parse_invalid_yaml() {
        let invalid_yaml = r#"
dataset: result
tuples:
  invalid_field: this should fail
  missing required fields
"#;

        let result = parse_yaml(invalid_yaml);
        assert!(result.is_err());
        assert!(matches!(result.unwrap_err(), ParserError::YamlError(_)));
    }

    #[test]
    fn test_parse_yaml_unknown_field_type() {
        let yaml = r#"
dataset: result
mode: single
tuples:
  - fields:
      - type: integer
"#;

        assert!(matches!(parse_yaml(yaml).unwrap_err(), ParserError::YamlError(_)));
    }

    #[test]
    fn test_parse_yaml_missing_required_fields() {
        let yaml = r#"
mode: single
"#;

        assert!(parse_yaml(yaml).is_err());
    }

    #[test]
    fn test_parse_valid_toml_with_tuples() {
        let toml = r#"
dataset = "result"
mode = "by_order"
size = 2

[[tuples]]
fields = [{ type = "string", value = "1234" }, { type = "any" }]

[[tuples]]
select = "Starship"

[[tuples.fields]]
type = "is_string"
"#;

        let expectation = parse_toml(toml).expect("Failed to parse TOML with tuples");

        assert_eq!(expectation.dataset, "result");
        assert_eq!(expectation.tuples.len(), 2);
        assert_eq!(
            expectation.tuples[0].fields,
            vec![
                FieldSpec::String {
                    value: "1234".to_string()
                },
                FieldSpec::Any
            ]
        );
        assert_eq!(expectation.tuples[1].fields, vec![FieldSpec::IsString]);
    }

    #[test]
    fn test_parse_invalid_toml() {
        let invalid_toml = r#"
dataset = "result"
[[[invalid syntax
"#;

        let result = parse_toml(invalid_toml);
        assert!(result.is_err());
        assert!(matches!(result.unwrap_err(), ParserError::TomlError(_)));
    }

    #[test]
    fn test_detect_format_yaml() {
        assert_eq!(
            detect_format(Path::new("result.yaml")).unwrap(),
            ExpectationFormat::Yaml
        );
        assert_eq!(
            detect_format(Path::new("result.YML")).unwrap(),
            ExpectationFormat::Yaml
        );
    }

    #[test]
    fn test_detect_format_toml() {
        assert_eq!(
            detect_format(Path::new("result.toml")).unwrap(),
            ExpectationFormat::Toml
        );
    }

    #[test]
    fn test_detect_format_unsupported() {
        let result = detect_format(Path::new("result.json"));
        assert!(matches!(
            result.unwrap_err(),
            ParserError::UnsupportedFormat(_)
        ));
    }

    #[test]
    fn test_detect_format_no_extension() {
        let result = detect_format(Path::new("result"));
        assert!(matches!(result.unwrap_err(), ParserError::InvalidExtension));
    }

    #[test]
    fn test_parse_file_yaml() {
        let mut file = tempfile::Builder::new().suffix(".yml").tempfile().unwrap();
        file.write_all(FLEET_YAML.as_bytes()).unwrap();

        let expectation = parse_file(file.path()).expect("Failed to parse expectation file");
        assert_eq!(expectation.dataset, "result");
        assert_eq!(expectation.tuples.len(), 3);
    }

    #[test]
    fn test_parse_missing_file() {
        let result = parse_file(Path::new("does/not/exist.yml"));
        assert!(matches!(result.unwrap_err(), ParserError::IoError(_)));
    }

    #[test]
    fn test_invalid_expectation_error_message() {
        let err = ParserError::from(NiftyError::UnknownMode("sideways".into()));
        assert_eq!(
            err.to_string(),
            "Invalid expectation: Unknown validation mode: 'sideways'"
        );
    }
}
