//! SQL statements and index-aligned transaction batches.

use crate::error::SqlMapperError;
use crate::params::Parameter;

/// How the driver should interpret the statement text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CommandKind {
    #[default]
    Text,
    StoredProcedure,
}

/// SQL text plus its execution mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Statement {
    pub sql: String,
    pub kind: CommandKind,
}

impl Statement {
    pub fn text(sql: impl Into<String>) -> Self {
        Self {
            sql: sql.into(),
            kind: CommandKind::Text,
        }
    }

    pub fn stored_procedure(name: impl Into<String>) -> Self {
        Self {
            sql: name.into(),
            kind: CommandKind::StoredProcedure,
        }
    }

    #[must_use]
    pub fn is_stored_procedure(&self) -> bool {
        self.kind == CommandKind::StoredProcedure
    }
}

impl From<&str> for Statement {
    fn from(sql: &str) -> Self {
        Statement::text(sql)
    }
}

impl From<String> for Statement {
    fn from(sql: String) -> Self {
        Statement::text(sql)
    }
}

impl From<&String> for Statement {
    fn from(sql: &String) -> Self {
        Statement::text(sql.as_str())
    }
}

/// Statements paired index-for-index with their parameter lists.
///
/// An empty parameter list means the statement takes no parameters.
#[derive(Debug, Clone, Default)]
pub struct TransactionBatch {
    entries: Vec<(String, Vec<Parameter>)>,
}

impl TransactionBatch {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Pair two lists by index.
    ///
    /// # Errors
    /// Returns `SqlMapperError::ConfigError` if the lists differ in length.
    pub fn from_parts<S: AsRef<str>>(
        statements: &[S],
        parameter_sets: &[Vec<Parameter>],
    ) -> Result<Self, SqlMapperError> {
        if statements.len() != parameter_sets.len() {
            return Err(SqlMapperError::ConfigError(format!(
                "statement list has {} entries but parameter set list has {}",
                statements.len(),
                parameter_sets.len()
            )));
        }
        let entries = statements
            .iter()
            .zip(parameter_sets)
            .map(|(sql, params)| (sql.as_ref().to_owned(), params.clone()))
            .collect();
        Ok(Self { entries })
    }

    #[must_use]
    pub fn push(mut self, sql: impl Into<String>, params: Vec<Parameter>) -> Self {
        self.entries.push((sql.into(), params));
        self
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Parameter])> {
        self.entries
            .iter()
            .map(|(sql, params)| (sql.as_str(), params.as_slice()))
    }
}
