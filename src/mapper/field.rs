use std::collections::HashSet;
use std::fmt;

use chrono::NaiveDateTime;
use serde_json::Value as JsonValue;

use crate::error::SqlMapperError;
use crate::types::RowValues;

/// A type rows can be mapped into.
///
/// The type must be default-constructible and publish a table of assignable
/// fields keyed by column name. Implement it with [`mappable!`](crate::mappable)
/// rather than by hand.
pub trait Mappable: Default + Sized {
    /// Every field a column can be bound to.
    fn fields() -> Vec<FieldDescriptor<Self>>;
}

type AssignFn<T> = fn(&mut T, &RowValues) -> Result<(), String>;

/// A named, assignable field of a [`Mappable`] type.
pub struct FieldDescriptor<T> {
    name: &'static str,
    type_name: &'static str,
    assign: AssignFn<T>,
}

impl<T> FieldDescriptor<T> {
    pub fn new(name: &'static str, type_name: &'static str, assign: AssignFn<T>) -> Self {
        Self {
            name,
            type_name,
            assign,
        }
    }

    /// Column name this field binds to.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Declared type of the field.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Store `value` into the field of `target`.
    ///
    /// # Errors
    /// Returns the conversion failure text when `value` does not fit the field's type.
    pub fn assign(&self, target: &mut T, value: &RowValues) -> Result<(), String> {
        (self.assign)(target, value)
    }
}

impl<T> Clone for FieldDescriptor<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for FieldDescriptor<T> {}

impl<T> fmt::Debug for FieldDescriptor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldDescriptor")
            .field("name", &self.name)
            .field("type_name", &self.type_name)
            .finish()
    }
}

/// Field table of one target type, looked up by exact column name.
#[derive(Debug)]
pub struct FieldResolver<T> {
    fields: Vec<FieldDescriptor<T>>,
}

impl<T: Mappable> FieldResolver<T> {
    /// Load and validate the field table of `T`.
    ///
    /// # Errors
    /// Returns `SqlMapperError::ConfigError` if two fields claim the same column name.
    pub fn for_type() -> Result<Self, SqlMapperError> {
        let fields = T::fields();
        let mut seen = HashSet::with_capacity(fields.len());
        for field in &fields {
            if !seen.insert(field.name) {
                return Err(SqlMapperError::ConfigError(format!(
                    "type {} binds column '{}' more than once",
                    std::any::type_name::<T>(),
                    field.name
                )));
            }
        }
        Ok(Self { fields })
    }

    /// Field bound to `column_name`, matched case-sensitively.
    #[must_use]
    pub fn resolve(&self, column_name: &str) -> Option<&FieldDescriptor<T>> {
        self.fields.iter().find(|field| field.name == column_name)
    }
}

/// One-off lookup of the field of `T` bound to `column_name`.
///
/// `None` means the column has no counterpart on `T` and is skipped.
#[must_use]
pub fn resolve<T: Mappable>(column_name: &str) -> Option<FieldDescriptor<T>> {
    T::fields()
        .into_iter()
        .find(|field| field.name == column_name)
}

/// Conversion from a non-null row value into a field type.
///
/// Conversions are strict: a value is accepted only when its runtime type is the
/// field's type or an unambiguous encoding of it.
pub trait FromRowValue: Sized {
    /// # Errors
    /// Returns a description of the mismatch when `value` cannot be stored as `Self`.
    fn from_row_value(value: &RowValues) -> Result<Self, String>;
}

fn mismatch(expected: &str, value: &RowValues) -> String {
    format!("expected {expected}, found {}", value.type_name())
}

impl FromRowValue for RowValues {
    fn from_row_value(value: &RowValues) -> Result<Self, String> {
        Ok(value.clone())
    }
}

impl FromRowValue for i64 {
    fn from_row_value(value: &RowValues) -> Result<Self, String> {
        value.as_int().copied().ok_or_else(|| mismatch("Int", value))
    }
}

macro_rules! narrow_int {
    ($($t:ty),*) => {
        $(
            impl FromRowValue for $t {
                fn from_row_value(value: &RowValues) -> Result<Self, String> {
                    let wide = i64::from_row_value(value)?;
                    <$t>::try_from(wide).map_err(|e| {
                        format!("{wide} does not fit in {}: {e}", stringify!($t))
                    })
                }
            }
        )*
    };
}

narrow_int!(i32, i16, i8, u64, u32, u16, u8, usize);

impl FromRowValue for f64 {
    fn from_row_value(value: &RowValues) -> Result<Self, String> {
        value.as_float().ok_or_else(|| mismatch("Float", value))
    }
}

impl FromRowValue for f32 {
    #[allow(clippy::cast_possible_truncation)]
    fn from_row_value(value: &RowValues) -> Result<Self, String> {
        value
            .as_float()
            .map(|f| f as f32)
            .ok_or_else(|| mismatch("Float", value))
    }
}

impl FromRowValue for bool {
    fn from_row_value(value: &RowValues) -> Result<Self, String> {
        value
            .as_bool()
            .copied()
            .ok_or_else(|| mismatch("Bool", value))
    }
}

impl FromRowValue for String {
    fn from_row_value(value: &RowValues) -> Result<Self, String> {
        value
            .as_text()
            .map(str::to_owned)
            .ok_or_else(|| mismatch("Text", value))
    }
}

impl FromRowValue for NaiveDateTime {
    fn from_row_value(value: &RowValues) -> Result<Self, String> {
        value
            .as_timestamp()
            .ok_or_else(|| mismatch("Timestamp", value))
    }
}

impl FromRowValue for JsonValue {
    fn from_row_value(value: &RowValues) -> Result<Self, String> {
        match value {
            RowValues::JSON(json) => Ok(json.clone()),
            RowValues::Text(text) => serde_json::from_str(text).map_err(|e| e.to_string()),
            other => Err(mismatch("JSON", other)),
        }
    }
}

impl FromRowValue for Vec<u8> {
    fn from_row_value(value: &RowValues) -> Result<Self, String> {
        value
            .as_blob()
            .map(<[u8]>::to_vec)
            .ok_or_else(|| mismatch("Blob", value))
    }
}

impl<T: FromRowValue> FromRowValue for Option<T> {
    fn from_row_value(value: &RowValues) -> Result<Self, String> {
        if value.is_null() {
            return Ok(None);
        }
        T::from_row_value(value).map(Some)
    }
}
