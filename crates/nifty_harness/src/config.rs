//! Session configuration, storage functions and alias overrides.

use crate::HarnessError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Environment variable selecting the execution type.
pub const EXEC_TYPE_ENV: &str = "NIFTY_EXEC_TYPE";

/// Where the execution engine runs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExecType {
    /// In-process, local files
    #[default]
    Local,
    /// Remote cluster
    Cluster,
}

impl FromStr for ExecType {
    type Err = HarnessError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "local" => Ok(ExecType::Local),
            "cluster" | "mapreduce" => Ok(ExecType::Cluster),
            other => Err(HarnessError::Configuration(format!(
                "unknown execution type '{other}'"
            ))),
        }
    }
}

impl fmt::Display for ExecType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExecType::Local => write!(f, "local"),
            ExecType::Cluster => write!(f, "cluster"),
        }
    }
}

/// Configuration for acquiring a [`Session`](crate::Session).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Execution type
    pub exec_type: ExecType,
}

impl SessionConfig {
    /// Creates a new builder for `SessionConfig`.
    pub fn builder() -> SessionConfigBuilder {
        SessionConfigBuilder::default()
    }

    /// Reads the execution type from `NIFTY_EXEC_TYPE`, defaulting to local.
    pub fn from_env() -> Result<Self, HarnessError> {
        match std::env::var(EXEC_TYPE_ENV) {
            Ok(value) => Self::builder().exec_type_str(&value)?.build(),
            Err(_) => Self::builder().build(),
        }
    }
}

/// Builder for `SessionConfig`.
#[derive(Debug, Clone, Default)]
pub struct SessionConfigBuilder {
    exec_type: Option<ExecType>,
}

impl SessionConfigBuilder {
    /// Sets the execution type.
    pub fn exec_type(mut self, exec_type: ExecType) -> Self {
        self.exec_type = Some(exec_type);
        self
    }

    /// Sets the execution type from its name.
    pub fn exec_type_str(self, exec_type: &str) -> Result<Self, HarnessError> {
        Ok(self.exec_type(exec_type.parse()?))
    }

    /// Uses the cluster execution type.
    pub fn cluster(self) -> Self {
        self.exec_type(ExecType::Cluster)
    }

    /// Builds the `SessionConfig`.
    pub fn build(self) -> Result<SessionConfig, HarnessError> {
        Ok(SessionConfig {
            exec_type: self.exec_type.unwrap_or_default(),
        })
    }
}

/// Storage function used to load staged rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "function", rename_all = "lowercase")]
pub enum Storage {
    /// `PigStorage(';')`
    Csv,
    /// `PigStorage()`, tab separated
    Default,
    /// `PigStorage('|')`
    Pipe,
    /// `PigStorage('&')`
    Ampersand,
    /// `PigStorage('\t')`
    Tab,
    /// Any other load function, verbatim
    Custom(String),
}

impl Storage {
    /// Returns the load function text.
    pub fn as_str(&self) -> &str {
        match self {
            Storage::Csv => "PigStorage(';')",
            Storage::Default => "PigStorage()",
            Storage::Pipe => "PigStorage('|')",
            Storage::Ampersand => "PigStorage('&')",
            Storage::Tab => "PigStorage('\\t')",
            Storage::Custom(function) => function,
        }
    }
}

impl fmt::Display for Storage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Statement replacements applied when a script is registered.
///
/// `STORE` and `DUMP` statements are replaced by [`store`](Self::store) and
/// [`dump`](Self::dump), which default to empty (the statement is removed).
/// Per-alias queries replace the statement defining that alias, and keep
/// their insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AliasOverrides {
    store: String,
    dump: String,
    queries: Vec<(String, String)>,
    last_store_alias: Option<String>,
}

impl AliasOverrides {
    /// Creates a new builder for `AliasOverrides`.
    pub fn builder() -> AliasOverridesBuilder {
        AliasOverridesBuilder::default()
    }

    /// Replacement for `STORE` statements.
    pub fn store(&self) -> &str {
        &self.store
    }

    /// Replacement for `DUMP` statements.
    pub fn dump(&self) -> &str {
        &self.dump
    }

    /// Replacement query for `alias`, if any.
    pub fn query(&self, alias: &str) -> Option<&str> {
        self.queries
            .iter()
            .find(|(a, _)| a == alias)
            .map(|(_, q)| q.as_str())
    }

    /// Per-alias replacement queries in insertion order.
    pub fn queries(&self) -> impl Iterator<Item = (&str, &str)> {
        self.queries.iter().map(|(a, q)| (a.as_str(), q.as_str()))
    }

    /// Alias of the last `STORE` statement seen at registration.
    pub fn last_store_alias(&self) -> Option<&str> {
        self.last_store_alias.as_deref()
    }

    /// Returns a copy with `alias` replaced by `query`.
    pub fn with_query(&self, alias: impl Into<String>, query: impl Into<String>) -> Self {
        let (alias, query) = (alias.into(), query.into());
        let mut next = self.clone();
        match next.queries.iter_mut().find(|(a, _)| *a == alias) {
            Some(entry) => entry.1 = query,
            None => next.queries.push((alias, query)),
        }
        next
    }

    /// Returns a copy without a replacement for `alias`.
    pub fn without_query(&self, alias: &str) -> Self {
        let mut next = self.clone();
        next.queries.retain(|(a, _)| a != alias);
        next
    }

    /// Returns a copy recording the last stored alias.
    pub fn with_last_store_alias(&self, alias: Option<String>) -> Self {
        Self {
            last_store_alias: alias,
            ..self.clone()
        }
    }
}

/// Builder for `AliasOverrides`.
#[derive(Debug, Clone, Default)]
pub struct AliasOverridesBuilder {
    overrides: AliasOverrides,
}

impl AliasOverridesBuilder {
    /// Sets the `STORE` replacement.
    pub fn store(mut self, replacement: impl Into<String>) -> Self {
        self.overrides.store = replacement.into();
        self
    }

    /// Sets the `DUMP` replacement.
    pub fn dump(mut self, replacement: impl Into<String>) -> Self {
        self.overrides.dump = replacement.into();
        self
    }

    /// Replaces the statement defining `alias` with `query`.
    pub fn query(mut self, alias: impl Into<String>, query: impl Into<String>) -> Self {
        self.overrides = self.overrides.with_query(alias, query);
        self
    }

    /// Builds the `AliasOverrides`.
    pub fn build(self) -> AliasOverrides {
        self.overrides
    }
}
