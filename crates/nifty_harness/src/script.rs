//! Script tests.
//!
//! A [`NiftyTest`] holds the text of a script, its parameters and the alias
//! overrides accumulated while staging inputs. Every operation that reaches
//! the engine takes the [`Session`] explicitly.

use crate::{params, AliasOverrides, HarnessError, Result, Session, Storage};
use nifty_core::{Tuple, ValidationMode};
use nifty_validator::{
    DataSetReport, DataSetValidatorBuilder, MappedDataset, TestDataSet, ValidateMappedDataSet,
    ValidatedDataSet,
};
use once_cell::sync::Lazy;
use regex::Regex;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

static DIAGNOSTICS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?:DUMP|ILLUSTRATE|EXPLAIN) .*;").expect("diagnostics regex"));

/// Delimiter used when staging a [`MappedDataset`].
const MAPPED_DELIMITER: &str = "|";

/// A script under test.
#[derive(Debug, Clone)]
pub struct NiftyTest {
    script: String,
    args: Vec<String>,
    arg_files: Vec<PathBuf>,
    overrides: AliasOverrides,
}

impl NiftyTest {
    /// Creates a new builder for `NiftyTest`.
    pub fn builder() -> NiftyTestBuilder {
        NiftyTestBuilder::default()
    }

    /// Creates and analyzes a test from script text.
    pub fn from_text(session: &mut Session, script: impl Into<String>) -> Result<Self> {
        Self::builder().text(script).build(session)
    }

    /// Creates and analyzes a test from script lines.
    pub fn from_lines<I, S>(session: &mut Session, lines: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::builder().lines(lines).build(session)
    }

    /// Creates and analyzes a test from a script file.
    pub fn from_file(session: &mut Session, path: impl AsRef<Path>) -> Result<Self> {
        Self::builder().file(path)?.build(session)
    }

    /// Returns the script text as given.
    pub fn script(&self) -> &str {
        &self.script
    }

    /// Returns the current alias overrides.
    pub fn overrides(&self) -> &AliasOverrides {
        &self.overrides
    }

    /// Registers the script without diagnostics statements.
    ///
    /// `DUMP`, `ILLUSTRATE` and `EXPLAIN` statements are stripped so that
    /// registering only analyzes the script.
    pub fn analyze(&mut self, session: &mut Session) -> Result<()> {
        let cleaned = DIAGNOSTICS.replace_all(&self.script, "");
        let substituted = params::substitute(&cleaned, &self.args, &self.arg_files)?;

        debug!("Analyzing script:\n{}", substituted);
        self.register(session, &substituted)
    }

    /// Registers the script with its current overrides.
    pub fn execute(&mut self, session: &mut Session) -> Result<()> {
        let substituted = params::substitute(&self.script, &self.args, &self.arg_files)?;

        info!("{}", substituted);
        self.register(session, &substituted)
    }

    fn register(&mut self, session: &mut Session, script: &str) -> Result<()> {
        let registration = session.engine()?.register_script(script, &self.overrides)?;
        self.overrides = self
            .overrides
            .with_last_store_alias(registration.last_store_alias);
        Ok(())
    }

    /// Replaces the statement defining `alias` with `query`.
    ///
    /// ```text
    /// B = FILTER A BY count > 5;
    /// overridden with ("B", "B = FILTER A BY name == 'Pig';") becomes
    /// B = FILTER A BY name == 'Pig';
    /// ```
    pub fn override_alias(&mut self, alias: impl Into<String>, query: impl Into<String>) {
        self.overrides = self.overrides.with_query(alias, query);
    }

    /// Drops the override of `alias`.
    pub fn unoverride(&mut self, alias: &str) {
        self.overrides = self.overrides.without_query(alias);
    }

    /// Replaces `alias` with `rows`, loaded through `storage` with the
    /// alias's own schema.
    pub fn input<S: AsRef<str>>(
        &mut self,
        session: &mut Session,
        alias: &str,
        rows: &[S],
        storage: &Storage,
    ) -> Result<()> {
        self.analyze(session)?;
        let schema = session.engine()?.dump_schema(alias)?;
        self.stage(session, alias, rows, storage, &schema)
    }

    /// Replaces `alias` with `rows`, loaded through `storage` as `schema`.
    pub fn input_with_schema<S: AsRef<str>>(
        &mut self,
        session: &mut Session,
        alias: &str,
        rows: &[S],
        storage: &Storage,
        schema: &str,
    ) -> Result<()> {
        self.analyze(session)?;
        self.stage(session, alias, rows, storage, schema)
    }

    /// Replaces `alias` with the rows of `data`.
    pub fn input_dataset(
        &mut self,
        session: &mut Session,
        alias: &str,
        data: &TestDataSet,
        storage: &Storage,
    ) -> Result<()> {
        self.input(session, alias, data.rows(), storage)
    }

    /// Replaces `alias` with the rows of `data`, pipe separated.
    pub fn input_mapped(
        &mut self,
        session: &mut Session,
        alias: &str,
        data: &MappedDataset,
    ) -> Result<()> {
        let rows = data.to_test_dataset(MAPPED_DELIMITER)?;
        self.input_dataset(session, alias, &rows, &Storage::Pipe)
    }

    fn stage<S: AsRef<str>>(
        &mut self,
        session: &mut Session,
        alias: &str,
        rows: &[S],
        storage: &Storage,
        schema: &str,
    ) -> Result<()> {
        let rows: Vec<String> = rows.iter().map(|r| r.as_ref().to_string()).collect();
        let destination = session.engine()?.stage(&rows)?;

        warn!(
            "Replaced {} with the given data (stored in file {})",
            alias, destination
        );
        self.override_alias(
            alias,
            format!("{alias} = LOAD '{destination}' USING {storage} AS {schema};"),
        );
        Ok(())
    }

    /// Returns the tuples of `alias`.
    pub fn alias<'s>(
        &self,
        session: &'s mut Session,
        alias: &str,
    ) -> Result<Box<dyn Iterator<Item = Tuple> + 's>> {
        session.engine()?.open_iterator(alias)
    }

    /// Returns the tuples of the alias stored last.
    pub fn last_stored_alias<'s>(
        &self,
        session: &'s mut Session,
    ) -> Result<Box<dyn Iterator<Item = Tuple> + 's>> {
        let alias = self
            .overrides
            .last_store_alias()
            .ok_or(HarnessError::NoStoredAlias)?;
        self.alias(session, alias)
    }

    /// Validates the alias named by `validator` against its expectations.
    pub fn validate(
        &self,
        session: &mut Session,
        validator: DataSetValidatorBuilder,
    ) -> Result<DataSetReport> {
        let validator = validator.build()?;
        let actual: Vec<Tuple> = self.alias(session, validator.name())?.collect();
        Ok(validator.validate(actual))
    }

    /// Validates `result` against a list of expected tuples.
    pub fn validate_dataset(
        &self,
        session: &mut Session,
        result: &str,
        expected: ValidatedDataSet,
        mode: ValidationMode,
        tuple_size: usize,
    ) -> Result<DataSetReport> {
        for tuple in expected.tuples() {
            debug!("{:?}", tuple);
        }
        self.validate(session, expected.into_builder(result, mode, tuple_size))
    }

    /// Validates `result` against column-keyed expectations.
    pub fn validate_mapped(
        &self,
        session: &mut Session,
        result: &str,
        expected: ValidateMappedDataSet,
        mode: ValidationMode,
        tuple_size: usize,
    ) -> Result<DataSetReport> {
        self.validate(session, expected.into_builder(result, mode, tuple_size))
    }
}

/// Builder for `NiftyTest`.
#[derive(Debug, Clone, Default)]
pub struct NiftyTestBuilder {
    script: Option<String>,
    args: Vec<String>,
    arg_files: Vec<PathBuf>,
    overrides: AliasOverrides,
}

impl NiftyTestBuilder {
    /// Sets the script text.
    pub fn text(mut self, script: impl Into<String>) -> Self {
        self.script = Some(script.into());
        self
    }

    /// Sets the script from lines, joined with newlines.
    pub fn lines<I, S>(self, lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let text = lines
            .into_iter()
            .map(|line| line.as_ref().to_string())
            .collect::<Vec<_>>()
            .join("\n");
        self.text(text)
    }

    /// Reads the script from `path`.
    pub fn file(self, path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Ok(self.text(text))
    }

    /// Adds a `key=value` parameter.
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Adds several `key=value` parameters.
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Adds a parameter file.
    pub fn arg_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.arg_files.push(path.into());
        self
    }

    /// Sets the initial alias overrides.
    pub fn overrides(mut self, overrides: AliasOverrides) -> Self {
        self.overrides = overrides;
        self
    }

    /// Builds the test and analyzes the script.
    pub fn build(self, session: &mut Session) -> Result<NiftyTest> {
        let mut test = NiftyTest {
            script: self
                .script
                .ok_or_else(|| HarnessError::Configuration("script is required".to_string()))?,
            args: self.args,
            arg_files: self.arg_files,
            overrides: self.overrides,
        };

        test.analyze(session)?;
        Ok(test)
    }
}
