//! Materialized query output: rows, result sets and multi-result containers.

mod data_set;
mod result_set;
mod row;

pub use data_set::DataSet;
pub use result_set::ResultSet;
pub use row::CustomDbRow;
