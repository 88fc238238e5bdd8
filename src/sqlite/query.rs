use std::sync::Arc;

use rusqlite::Statement;
use rusqlite::types::Value;

use crate::error::SqlMapperError;
use crate::results::ResultSet;
use crate::types::RowValues;

/// Extract a `RowValues` from a `SQLite` row.
///
/// # Errors
///
/// Returns `SqlMapperError` if the value cannot be read.
pub fn sqlite_extract_value(
    row: &rusqlite::Row,
    idx: usize,
) -> Result<RowValues, SqlMapperError> {
    let value: Value = row.get(idx)?;
    match value {
        Value::Null => Ok(RowValues::Null),
        Value::Integer(i) => Ok(RowValues::Int(i)),
        Value::Real(f) => Ok(RowValues::Float(f)),
        Value::Text(s) => Ok(RowValues::Text(s)),
        Value::Blob(b) => Ok(RowValues::Blob(b)),
    }
}

/// Run a statement whose parameters are already bound and materialize every row.
///
/// The returned `ResultSet` owns its data and outlives the statement.
///
/// # Errors
/// Returns `SqlMapperError` if stepping the statement or reading a value fails.
pub fn build_result_set(stmt: &mut Statement<'_>) -> Result<ResultSet, SqlMapperError> {
    let column_names: Vec<String> = stmt
        .column_names()
        .iter()
        .map(std::string::ToString::to_string)
        .collect();
    let col_count = column_names.len();

    let mut result_set = ResultSet::with_capacity(10);
    result_set.set_column_names(Arc::new(column_names));

    let mut rows_iter = stmt.raw_query();
    while let Some(row) = rows_iter.next()? {
        let mut row_values = Vec::with_capacity(col_count);
        for i in 0..col_count {
            row_values.push(sqlite_extract_value(row, i)?);
        }
        result_set.add_row_values(row_values);
    }

    Ok(result_set)
}

/// First column of the first row, `Null` when the statement yields no row.
///
/// # Errors
/// Returns `SqlMapperError` if stepping the statement or reading the value fails.
pub fn first_value(stmt: &mut Statement<'_>) -> Result<RowValues, SqlMapperError> {
    let has_columns = stmt.column_count() > 0;
    let mut rows_iter = stmt.raw_query();
    match rows_iter.next()? {
        Some(row) if has_columns => sqlite_extract_value(row, 0),
        _ => Ok(RowValues::Null),
    }
}
