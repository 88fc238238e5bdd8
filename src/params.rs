//! Statement parameters: name, value, direction and driver type tag.

use crate::error::SqlMapperError;
use crate::types::{DbType, RowValues};

/// Direction of a statement parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParamDirection {
    #[default]
    Input,
    Output,
    InputOutput,
    ReturnValue,
}

impl ParamDirection {
    /// Whether the driver has to send a value for this parameter.
    #[must_use]
    pub fn is_input(self) -> bool {
        matches!(self, Self::Input | Self::InputOutput)
    }
}

/// A named parameter bound to a statement.
///
/// ```rust
/// use row_mapper::prelude::*;
///
/// let id = Parameter::new("id", 7);
/// assert_eq!(id.db_type(), Some(DbType::Int));
///
/// let stamp = Parameter::new("at", "2024-01-02 03:04:05").with_type(DbType::Timestamp);
/// assert!(matches!(stamp.bind_value(), Ok(RowValues::Timestamp(_))));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    name: String,
    value: RowValues,
    direction: ParamDirection,
    db_type: Option<DbType>,
}

impl Parameter {
    /// Input parameter whose type tag follows the value.
    pub fn new(name: impl Into<String>, value: impl Into<RowValues>) -> Self {
        let value = value.into();
        let db_type = value.db_type();
        Self {
            name: name.into(),
            value,
            direction: ParamDirection::Input,
            db_type,
        }
    }

    /// Parameter without a name; drivers bind it by position.
    pub fn positional(value: impl Into<RowValues>) -> Self {
        Self::new(String::new(), value)
    }

    #[must_use]
    pub fn with_type(mut self, db_type: DbType) -> Self {
        self.db_type = Some(db_type);
        self
    }

    #[must_use]
    pub fn with_direction(mut self, direction: ParamDirection) -> Self {
        self.direction = direction;
        self
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn value(&self) -> &RowValues {
        &self.value
    }

    #[must_use]
    pub fn direction(&self) -> ParamDirection {
        self.direction
    }

    #[must_use]
    pub fn db_type(&self) -> Option<DbType> {
        self.db_type
    }

    /// The name without a leading `:`, `@` or `$` marker.
    #[must_use]
    pub fn bare_name(&self) -> &str {
        self.name.trim_start_matches([':', '@', '$'])
    }

    /// Value converted to the parameter's type tag, ready for a driver to bind.
    ///
    /// # Errors
    /// Returns `SqlMapperError::ParameterError` if the value cannot be represented
    /// as the tagged type.
    pub fn bind_value(&self) -> Result<RowValues, SqlMapperError> {
        match self.db_type {
            None => Ok(self.value.clone()),
            Some(tag) => coerce(&self.value, tag).ok_or_else(|| {
                SqlMapperError::ParameterError(format!(
                    "parameter '{}': {} value cannot be bound as {tag:?}",
                    self.name,
                    self.value.type_name()
                ))
            }),
        }
    }
}

#[allow(clippy::cast_precision_loss)]
fn coerce(value: &RowValues, tag: DbType) -> Option<RowValues> {
    if value.is_null() || value.db_type() == Some(tag) {
        return Some(value.clone());
    }
    match (tag, value) {
        (DbType::Int, RowValues::Bool(b)) => Some(RowValues::Int(i64::from(*b))),
        (DbType::Float, RowValues::Int(i)) => Some(RowValues::Float(*i as f64)),
        (DbType::Bool, other) => other.as_bool().copied().map(RowValues::Bool),
        (DbType::Timestamp, other) => other.as_timestamp().map(RowValues::Timestamp),
        (DbType::Json, RowValues::Text(s)) => serde_json::from_str(s).ok().map(RowValues::JSON),
        (DbType::Text, RowValues::Int(i)) => Some(RowValues::Text(i.to_string())),
        (DbType::Text, RowValues::Float(f)) => Some(RowValues::Text(f.to_string())),
        (DbType::Text, RowValues::Bool(b)) => Some(RowValues::Text(b.to_string())),
        (DbType::Text, RowValues::JSON(j)) => Some(RowValues::Text(j.to_string())),
        (DbType::Text, RowValues::Timestamp(dt)) => {
            Some(RowValues::Text(dt.format("%F %T%.f").to_string()))
        }
        (DbType::Blob, RowValues::Text(s)) => Some(RowValues::Blob(s.as_bytes().to_vec())),
        _ => None,
    }
}
