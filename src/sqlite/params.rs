use rusqlite::Statement;
use rusqlite::types::Value;

use crate::error::SqlMapperError;
use crate::params::Parameter;
use crate::types::RowValues;

const NAME_PREFIXES: [char; 3] = [':', '@', '$'];

/// Convert a single `RowValues` to a rusqlite `Value`.
#[must_use]
pub fn row_value_to_sqlite_value(value: &RowValues) -> Value {
    match value {
        RowValues::Int(i) => Value::Integer(*i),
        RowValues::Float(f) => Value::Real(*f),
        RowValues::Text(s) => Value::Text(s.clone()),
        RowValues::Bool(b) => Value::Integer(i64::from(*b)),
        RowValues::Timestamp(dt) => Value::Text(dt.format("%F %T%.f").to_string()),
        RowValues::Null => Value::Null,
        RowValues::JSON(jval) => Value::Text(jval.to_string()),
        RowValues::Blob(bytes) => Value::Blob(bytes.clone()),
    }
}

/// How to treat a named parameter the statement does not mention.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum MissingName {
    Reject,
    Skip,
}

/// Binds one call's parameters onto the statement(s) it prepares.
///
/// Named parameters bind by name with any of the `:`, `@` or `$` markers.
/// Unnamed ones fill the anonymous (`?`) and numbered (`?NNN`) placeholders in
/// order; the cursor carries over from one statement to the next, so the
/// statements of a batch consume the unnamed parameters in sequence.
pub(crate) struct ParamBinder<'p> {
    named: Vec<&'p Parameter>,
    unnamed: Vec<&'p Parameter>,
    cursor: usize,
    missing: MissingName,
}

impl<'p> ParamBinder<'p> {
    /// # Errors
    /// Returns `SqlMapperError::ParameterError` for a parameter that is not an input.
    pub(crate) fn new(
        params: &'p [Parameter],
        missing: MissingName,
    ) -> Result<Self, SqlMapperError> {
        let mut named = Vec::new();
        let mut unnamed = Vec::new();
        for param in params {
            if !param.direction().is_input() {
                return Err(SqlMapperError::ParameterError(format!(
                    "parameter '{}': SQLite does not support {:?} parameters",
                    param.name(),
                    param.direction()
                )));
            }
            if param.name().is_empty() {
                unnamed.push(param);
            } else {
                named.push(param);
            }
        }
        Ok(Self {
            named,
            unnamed,
            cursor: 0,
            missing,
        })
    }

    /// Bind onto one prepared statement.
    ///
    /// # Errors
    /// Returns `SqlMapperError::ParameterError` if a value cannot be converted, or if a
    /// named parameter has no placeholder while unknown names are rejected.
    pub(crate) fn bind(&mut self, stmt: &mut Statement<'_>) -> Result<(), SqlMapperError> {
        for param in &self.named {
            match named_index(stmt, param.bare_name())? {
                Some(idx) => {
                    let value = row_value_to_sqlite_value(&param.bind_value()?);
                    stmt.raw_bind_parameter(idx, value)?;
                }
                None if self.missing == MissingName::Skip => {}
                None => {
                    return Err(SqlMapperError::ParameterError(format!(
                        "statement has no parameter named '{}'",
                        param.name()
                    )));
                }
            }
        }
        for idx in 1..=stmt.parameter_count() {
            if !is_positional_slot(stmt, idx) {
                continue;
            }
            let Some(param) = self.unnamed.get(self.cursor) else {
                break;
            };
            self.cursor += 1;
            let value = row_value_to_sqlite_value(&param.bind_value()?);
            stmt.raw_bind_parameter(idx, value)?;
        }
        Ok(())
    }

    /// Check that every unnamed parameter found a placeholder.
    ///
    /// # Errors
    /// Returns `SqlMapperError::ParameterError` when unnamed parameters are left over.
    pub(crate) fn finish(self) -> Result<(), SqlMapperError> {
        let unused = self.unnamed.len() - self.cursor;
        if unused > 0 {
            return Err(SqlMapperError::ParameterError(format!(
                "{unused} of {} positional parameters had no placeholder to bind to",
                self.unnamed.len()
            )));
        }
        Ok(())
    }
}

/// Bind `params` onto a single statement, rejecting names and positions it lacks.
///
/// # Errors
/// Returns `SqlMapperError::ParameterError` on any parameter that cannot be bound.
pub(crate) fn bind_parameters(
    stmt: &mut Statement<'_>,
    params: &[Parameter],
) -> Result<(), SqlMapperError> {
    let mut binder = ParamBinder::new(params, MissingName::Reject)?;
    binder.bind(stmt)?;
    binder.finish()
}

fn is_positional_slot(stmt: &Statement<'_>, idx: usize) -> bool {
    stmt.parameter_name(idx).is_none_or(|name| name.starts_with('?'))
}

fn named_index(stmt: &Statement<'_>, bare: &str) -> Result<Option<usize>, SqlMapperError> {
    for prefix in NAME_PREFIXES {
        if let Some(idx) = stmt.parameter_index(&format!("{prefix}{bare}"))? {
            return Ok(Some(idx));
        }
    }
    Ok(None)
}
