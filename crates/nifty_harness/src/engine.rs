//! In-memory execution engine.
//!
//! Understands enough of the scripting language to run test scripts without
//! a cluster: `LOAD ... USING PigStorage(...)`, `UNION`, `LIMIT`, `STORE` and
//! `DUMP`. Aliases computed by anything else need their output registered up
//! front with [`MemoryEngine::with_output`].

use crate::{AliasOverrides, ExecType, ExecutionEngine, HarnessError, Registration, Result, SessionConfig};
use nifty_core::Tuple;
use nifty_parser::parse_delimited_line;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;
use tracing::debug;

static STORE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)^STORE\s+(\w+)\s+INTO\b").expect("store regex"));

static DUMP: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?is)^DUMP\s+\w+").expect("dump regex"));

static ASSIGNMENT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)^(\w+)\s*=\s*(.*)$").expect("assignment regex"));

static LOAD: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?is)^LOAD\s+'([^']*)'(?:\s+USING\s+(\w+)\s*\(\s*(?:'((?:[^'\\]|\\.)*)')?\s*\))?(?:\s+AS\s+(.+))?$",
    )
    .expect("load regex")
});

static UNION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)^UNION\s+(?:ONSCHEMA\s+)?(.+)$").expect("union regex"));

static LIMIT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)^LIMIT\s+(\w+)\s+(\d+)$").expect("limit regex"));

#[derive(Debug, Clone, PartialEq, Eq)]
struct Statement {
    alias: Option<String>,
    body: String,
}

impl Statement {
    fn parse(text: &str) -> Self {
        match ASSIGNMENT.captures(text) {
            Some(caps) => Statement {
                alias: Some(caps[1].to_string()),
                body: caps[2].trim().to_string(),
            },
            None => Statement {
                alias: None,
                body: text.to_string(),
            },
        }
    }
}

/// Execution engine keeping staged rows and alias outputs in memory.
#[derive(Debug, Default)]
pub struct MemoryEngine {
    exec_type: Option<ExecType>,
    outputs: HashMap<String, Vec<Tuple>>,
    schemas: HashMap<String, String>,
    staged: HashMap<String, Vec<String>>,
    next_staging: usize,
    statements: Option<Vec<Statement>>,
}

impl MemoryEngine {
    /// Creates an engine with no registered outputs.
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes `alias` yield `tuples`, whatever the script says.
    pub fn with_output<I>(mut self, alias: impl Into<String>, tuples: I) -> Self
    where
        I: IntoIterator<Item = Tuple>,
    {
        self.outputs
            .insert(alias.into(), tuples.into_iter().collect());
        self
    }

    /// Makes `alias` report `schema`, whatever the script says.
    pub fn with_schema(mut self, alias: impl Into<String>, schema: impl Into<String>) -> Self {
        self.schemas.insert(alias.into(), schema.into());
        self
    }

    /// Returns the execution type while started.
    pub fn exec_type(&self) -> Option<ExecType> {
        self.exec_type
    }

    /// Returns the registered script after overrides, one statement per line.
    pub fn registered_script(&self) -> Option<String> {
        self.statements.as_ref().map(|statements| {
            statements
                .iter()
                .map(|s| match &s.alias {
                    Some(alias) => format!("{alias} = {};", s.body),
                    None => format!("{};", s.body),
                })
                .collect::<Vec<_>>()
                .join("\n")
        })
    }

    /// Returns the rows staged at `location`.
    pub fn staged(&self, location: &str) -> Option<&[String]> {
        self.staged.get(location).map(Vec::as_slice)
    }

    fn statements(&self) -> Result<&[Statement]> {
        self.statements
            .as_deref()
            .ok_or_else(|| HarnessError::engine("no script registered"))
    }

    fn definition(&self, alias: &str, before: usize) -> Result<(usize, &Statement)> {
        self.statements()?[..before]
            .iter()
            .enumerate()
            .rev()
            .find(|(_, s)| s.alias.as_deref() == Some(alias))
            .ok_or_else(|| HarnessError::UnknownAlias(alias.to_string()))
    }

    fn schema_at(&self, alias: &str, before: usize) -> Result<String> {
        if let Some(schema) = self.schemas.get(alias) {
            return Ok(schema.clone());
        }

        let (index, statement) = self.definition(alias, before)?;
        let body = statement.body.as_str();

        if let Some(caps) = LOAD.captures(body) {
            return caps
                .get(4)
                .map(|schema| schema.as_str().trim().to_string())
                .ok_or_else(|| {
                    HarnessError::engine(format!("alias '{alias}' is loaded without a schema"))
                });
        }
        if let Some(caps) = UNION.captures(body) {
            let first = caps[1].split(',').next().unwrap_or_default().trim();
            return self.schema_at(first, index);
        }
        if let Some(caps) = LIMIT.captures(body) {
            return self.schema_at(&caps[1], index);
        }

        Err(HarnessError::engine(format!(
            "cannot derive the schema of alias '{alias}' from: {body}"
        )))
    }

    fn evaluate(&self, alias: &str, before: usize) -> Result<Vec<Tuple>> {
        if let Some(tuples) = self.outputs.get(alias) {
            return Ok(tuples.clone());
        }

        let (index, statement) = self.definition(alias, before)?;
        let body = statement.body.as_str();

        if let Some(caps) = LOAD.captures(body) {
            let location = &caps[1];
            let function = caps.get(2).map_or("PigStorage", |m| m.as_str());
            if function != "PigStorage" {
                return Err(HarnessError::engine(format!(
                    "unsupported load function '{function}'"
                )));
            }

            let delimiter = caps.get(3).map_or("\t".to_string(), |m| unescape(m.as_str()));
            let rows = self.staged.get(location).ok_or_else(|| {
                HarnessError::engine(format!("no data found at '{location}'"))
            })?;

            return rows
                .iter()
                .map(|row| {
                    parse_delimited_line(row, &delimiter)
                        .map_err(|e| HarnessError::engine(format!("cannot load '{location}': {e}")))
                })
                .collect();
        }

        if let Some(caps) = UNION.captures(body) {
            let mut tuples = Vec::new();
            for input in caps[1].split(',').map(str::trim) {
                tuples.extend(self.evaluate(input, index)?);
            }
            return Ok(tuples);
        }

        if let Some(caps) = LIMIT.captures(body) {
            let count: usize = caps[2]
                .parse()
                .map_err(|_| HarnessError::engine(format!("invalid limit '{}'", &caps[2])))?;
            let mut tuples = self.evaluate(&caps[1], index)?;
            tuples.truncate(count);
            return Ok(tuples);
        }

        Err(HarnessError::engine(format!(
            "unsupported statement for alias '{alias}': {body}"
        )))
    }
}

impl ExecutionEngine for MemoryEngine {
    fn start(&mut self, config: &SessionConfig) -> Result<()> {
        debug!("Starting in-memory engine ({})", config.exec_type);
        self.exec_type = Some(config.exec_type);
        Ok(())
    }

    fn stop(&mut self) {
        self.exec_type = None;
        self.staged.clear();
        self.statements = None;
    }

    fn register_script(&mut self, script: &str, overrides: &AliasOverrides) -> Result<Registration> {
        let mut statements = Vec::new();
        let mut last_store_alias = None;

        for text in split_statements(script) {
            if let Some(caps) = STORE.captures(&text) {
                last_store_alias = Some(caps[1].to_string());
                statements.extend(split_statements(overrides.store()).iter().map(|s| Statement::parse(s)));
                continue;
            }
            if DUMP.is_match(&text) {
                statements.extend(split_statements(overrides.dump()).iter().map(|s| Statement::parse(s)));
                continue;
            }

            let statement = Statement::parse(&text);
            match statement.alias.as_deref().and_then(|alias| overrides.query(alias)) {
                Some(query) => {
                    debug!("Overriding alias {:?} with: {}", statement.alias, query);
                    statements.extend(split_statements(query).iter().map(|s| Statement::parse(s)));
                }
                None => statements.push(statement),
            }
        }

        debug!("Registered {} statement(s)", statements.len());
        self.statements = Some(statements);

        Ok(Registration { last_store_alias })
    }

    fn dump_schema(&self, alias: &str) -> Result<String> {
        if let Some(schema) = self.schemas.get(alias) {
            return Ok(schema.clone());
        }
        self.schema_at(alias, self.statements()?.len())
    }

    fn stage(&mut self, rows: &[String]) -> Result<String> {
        let location = format!("memory://staging/{}", self.next_staging);
        self.next_staging += 1;
        self.staged.insert(location.clone(), rows.to_vec());
        Ok(location)
    }

    fn open_iterator(&mut self, alias: &str) -> Result<Box<dyn Iterator<Item = Tuple> + '_>> {
        let tuples = match self.outputs.get(alias) {
            Some(tuples) => tuples.clone(),
            None => self.evaluate(alias, self.statements()?.len())?,
        };

        debug!("Alias {} yields {} tuple(s)", alias, tuples.len());
        Ok(Box::new(tuples.into_iter()))
    }
}

/// Splits script text on `;`, ignoring quoted semicolons and `--` comments.
fn split_statements(script: &str) -> Vec<String> {
    let mut statements = Vec::new();
    let mut current = String::new();
    let mut chars = script.chars().peekable();
    let mut quoted = false;

    while let Some(c) = chars.next() {
        match c {
            '\\' if quoted => {
                current.push(c);
                if let Some(next) = chars.next() {
                    current.push(next);
                }
            }
            '\'' => {
                quoted = !quoted;
                current.push(c);
            }
            '-' if !quoted && chars.peek() == Some(&'-') => {
                for skipped in chars.by_ref() {
                    if skipped == '\n' {
                        current.push('\n');
                        break;
                    }
                }
            }
            ';' if !quoted => statements.push(std::mem::take(&mut current)),
            _ => current.push(c),
        }
    }
    statements.push(current);

    statements
        .into_iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

fn unescape(delimiter: &str) -> String {
    let mut out = String::new();
    let mut chars = delimiter.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('t') => out.push('\t'),
            Some('n') => out.push('\n'),
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const UNION_SCRIPT: &str = "\
-- two sets in, one out
setA = LOAD 'a.csv' USING PigStorage(';') AS (id:chararray, name:chararray);
setB = LOAD 'b.csv' USING PigStorage(';') AS (kind:chararray, name:chararray);
result = UNION setA, setB;
DUMP result;
STORE result INTO 'out';";

    fn started() -> MemoryEngine {
        let mut engine = MemoryEngine::new();
        engine.start(&SessionConfig::default()).unwrap();
        engine
    }

    fn collect(engine: &mut MemoryEngine, alias: &str) -> Vec<Tuple> {
        engine.open_iterator(alias).unwrap().collect()
    }

    #[test]
    fn test_split_statements() {
        let statements = split_statements("a = LOAD 'x;y' USING PigStorage(';'); -- note; here\nb = LIMIT a 1;");
        assert_eq!(
            statements,
            vec!["a = LOAD 'x;y' USING PigStorage(';')", "b = LIMIT a 1"]
        );
    }

    #[test]
    fn test_unescape() {
        assert_eq!(unescape(r"\t"), "\t");
        assert_eq!(unescape(r"\\"), "\\");
        assert_eq!(unescape("|"), "|");
    }

    #[test]
    fn test_register_removes_store_and_dump() {
        let mut engine = started();
        let registration = engine
            .register_script(UNION_SCRIPT, &AliasOverrides::default())
            .unwrap();

        assert_eq!(registration.last_store_alias.as_deref(), Some("result"));
        let script = engine.registered_script().unwrap();
        assert!(!script.contains("DUMP"), "{script}");
        assert!(!script.contains("STORE"), "{script}");
        assert!(script.ends_with("result = UNION setA, setB;"), "{script}");
    }

    #[test]
    fn test_overridden_loads_read_staged_rows() {
        let mut engine = started();
        let a = engine
            .stage(&["1234;Garbage".to_string(), "12345;Collector".to_string()])
            .unwrap();
        let b = engine.stage(&["Starship;Enterprise".to_string()]).unwrap();

        let overrides = AliasOverrides::builder()
            .query("setA", format!("setA = LOAD '{a}' USING PigStorage(';') AS (id, name);"))
            .query("setB", format!("setB = LOAD '{b}' USING PigStorage(';') AS (kind, name);"))
            .build();
        engine.register_script(UNION_SCRIPT, &overrides).unwrap();

        assert_eq!(
            collect(&mut engine, "result"),
            vec![
                Tuple::from_values(["1234", "Garbage"]),
                Tuple::from_values(["12345", "Collector"]),
                Tuple::from_values(["Starship", "Enterprise"]),
            ]
        );
    }

    #[test]
    fn test_schema_from_load_and_union() {
        let mut engine = started();
        engine
            .register_script(UNION_SCRIPT, &AliasOverrides::default())
            .unwrap();

        assert_eq!(
            engine.dump_schema("setB").unwrap(),
            "(kind:chararray, name:chararray)"
        );
        assert_eq!(
            engine.dump_schema("result").unwrap(),
            "(id:chararray, name:chararray)"
        );
        assert!(matches!(
            engine.dump_schema("missing").unwrap_err(),
            HarnessError::UnknownAlias(_)
        ));
    }

    #[test]
    fn test_default_storage_is_tab_separated() {
        let mut engine = started();
        let location = engine.stage(&["a\tb".to_string(), "c\t".to_string()]).unwrap();
        let script = format!("raw = LOAD '{location}' USING PigStorage();\ntop = LIMIT raw 1;");
        engine
            .register_script(&script, &AliasOverrides::default())
            .unwrap();

        assert_eq!(collect(&mut engine, "raw")[1], Tuple::new(vec![Some("c".into()), None]));
        assert_eq!(collect(&mut engine, "top"), vec![Tuple::from_values(["a", "b"])]);
    }

    #[test]
    fn test_redefined_alias_uses_previous_definition() {
        let mut engine = started();
        let location = engine
            .stage(&["1".to_string(), "2".to_string(), "3".to_string()])
            .unwrap();
        let script = format!("n = LOAD '{location}' USING PigStorage(',');\nn = LIMIT n 2;");
        engine
            .register_script(&script, &AliasOverrides::default())
            .unwrap();

        assert_eq!(collect(&mut engine, "n").len(), 2);
    }

    #[test]
    fn test_registered_outputs_take_precedence() {
        let mut engine = MemoryEngine::new()
            .with_output("result", vec![Tuple::from_values(["x"])])
            .with_schema("result", "(x:chararray)");
        engine.start(&SessionConfig::default()).unwrap();

        assert_eq!(collect(&mut engine, "result"), vec![Tuple::from_values(["x"])]);
        assert_eq!(engine.dump_schema("result").unwrap(), "(x:chararray)");
    }

    #[test]
    fn test_missing_data_and_unsupported_statements() {
        let mut engine = started();
        engine
            .register_script(
                "a = LOAD 'nowhere' USING PigStorage(';');\nb = FILTER a BY $0 == 'x';",
                &AliasOverrides::default(),
            )
            .unwrap();

        assert!(matches!(
            engine.open_iterator("a").err(),
            Some(HarnessError::Engine(message)) if message.contains("nowhere")
        ));
        assert!(matches!(
            engine.open_iterator("b").err(),
            Some(HarnessError::Engine(message)) if message.contains("FILTER")
        ));
        assert!(matches!(
            engine.open_iterator("c").err(),
            Some(HarnessError::UnknownAlias(_))
        ));
    }

    #[test]
    fn test_empty_storage_delimiter_fails() {
        let mut engine = started();
        let location = engine.stage(&["1234;Garbage".to_string()]).unwrap();
        let script = format!("raw = LOAD '{location}' USING PigStorage('');");
        engine
            .register_script(&script, &AliasOverrides::default())
            .unwrap();

        assert!(matches!(
            engine.open_iterator("raw").err(),
            Some(HarnessError::Engine(message)) if message.contains("delimiter")
        ));
    }

    #[test]
    fn test_stop_forgets_state() {
        let mut engine = started();
        assert_eq!(engine.exec_type(), Some(ExecType::Local));

        let location = engine.stage(&["row".to_string()]).unwrap();
        engine.stop();

        assert_eq!(engine.exec_type(), None);
        assert_eq!(engine.staged(&location), None);
        assert!(engine.registered_script().is_none());
    }
}
