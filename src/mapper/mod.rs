//! Row-to-struct mapping.
//!
//! Columns are matched to fields by exact, case-sensitive name through the
//! target type's field table ([`Mappable`]). Columns without a field are ignored;
//! fields without a column keep the value `Default` gave them; `NULL` values never
//! overwrite a field. The first value that cannot be stored into its field aborts
//! the row with [`SqlMapperError::MappingError`].
//!
//! ```rust
//! use row_mapper::prelude::*;
//! use row_mapper::mappable;
//!
//! #[derive(Debug, Default, PartialEq)]
//! struct Item {
//!     id: i64,
//!     name: String,
//! }
//! mappable!(Item { id: i64 = "Id", name: String = "Name" });
//!
//! let mut rs = ResultSet::with_columns(vec!["Id".into(), "Name".into()]);
//! rs.add_row_values(vec![RowValues::Int(1), RowValues::Text("A".into())]);
//!
//! let items: Vec<Item> = map_result_set(&rs)?.expect("result set has columns");
//! assert_eq!(items, vec![Item { id: 1, name: "A".into() }]);
//! # Ok::<(), SqlMapperError>(())
//! ```

mod field;
mod macros;

use std::collections::HashSet;

pub use field::{FieldDescriptor, FieldResolver, FromRowValue, Mappable, resolve};

use crate::error::SqlMapperError;
use crate::results::{CustomDbRow, ResultSet};

/// Columns of one result shape paired with the fields of `T` they feed.
///
/// Built per mapping call. Callers mapping many result sets of the same shape can
/// build it once and pass it to [`map_row`].
#[derive(Debug)]
pub struct Bindings<T> {
    fields: Vec<FieldDescriptor<T>>,
}

impl<T: Mappable> Bindings<T> {
    /// Resolve every column against the fields of `T`.
    ///
    /// # Errors
    /// Returns `SqlMapperError::ConfigError` if the field table of `T` is invalid.
    pub fn for_columns(columns: &[String]) -> Result<Self, SqlMapperError> {
        let resolver = FieldResolver::<T>::for_type()?;
        let mut seen = HashSet::with_capacity(columns.len());
        let fields = columns
            .iter()
            .filter(|column| seen.insert(column.as_str()))
            .filter_map(|column| resolver.resolve(column).copied())
            .collect();
        Ok(Self { fields })
    }

    /// Column names that found a field, in column order.
    pub fn columns(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fields.iter().map(FieldDescriptor::name)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Build one `T` from `row` using precomputed bindings.
///
/// # Errors
/// Returns `SqlMapperError::MappingError` on the first value whose type does not
/// fit its field.
pub fn map_row<T: Mappable>(
    row: &CustomDbRow,
    bindings: &Bindings<T>,
) -> Result<T, SqlMapperError> {
    let mut target = T::default();
    for field in &bindings.fields {
        let Some(value) = row.get(field.name()) else {
            continue;
        };
        if value.is_null() {
            continue;
        }
        field
            .assign(&mut target, value)
            .map_err(|message| SqlMapperError::MappingError {
                target_type: field.type_name(),
                source_type: value.type_name(),
                message,
            })?;
    }
    Ok(target)
}

/// Map every row of `result_set`, in order.
///
/// Returns `Ok(None)` when the result set has no columns: a missing schema is
/// invalid input, not an empty answer. Columns but no rows gives `Ok(Some(vec![]))`.
///
/// # Errors
/// Returns `SqlMapperError::MappingError` if any row fails to map.
pub fn map_result_set<T: Mappable>(
    result_set: &ResultSet,
) -> Result<Option<Vec<T>>, SqlMapperError> {
    let Some(columns) = result_set
        .get_column_names()
        .filter(|columns| !columns.is_empty())
    else {
        return Ok(None);
    };
    map_with(columns, &result_set.results).map(Some)
}

/// Map a lone row.
///
/// Returns `Ok(None)` when the row carries no column metadata.
///
/// # Errors
/// Returns `SqlMapperError::MappingError` if the row fails to map.
pub fn map_single_row<T: Mappable>(row: &CustomDbRow) -> Result<Option<T>, SqlMapperError> {
    if !row.has_columns() {
        return Ok(None);
    }
    let mut mapped = map_with(&row.column_names, std::slice::from_ref(row))?;
    Ok(mapped.pop())
}

fn map_with<T: Mappable>(
    columns: &[String],
    rows: &[CustomDbRow],
) -> Result<Vec<T>, SqlMapperError> {
    let bindings = Bindings::<T>::for_columns(columns)?;
    tracing::trace!(
        target_type = std::any::type_name::<T>(),
        columns = columns.len(),
        bound = bindings.len(),
        rows = rows.len(),
        "mapping rows"
    );
    rows.iter().map(|row| map_row(row, &bindings)).collect()
}
