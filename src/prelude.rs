//! Convenient imports for common functionality.
//!
//! This module re-exports the most commonly used types and functions
//! to make it easier to get started with the library.

pub use crate::driver::{Connector, DriverConnection};
pub use crate::error::{SqlMapperError, TransactionFailure};
pub use crate::executor::SqlExecutor;
pub use crate::mapper::{
    Bindings, FieldDescriptor, FieldResolver, FromRowValue, Mappable, map_result_set, map_row,
    map_single_row, resolve,
};
pub use crate::params::{ParamDirection, Parameter};
pub use crate::results::{CustomDbRow, DataSet, ResultSet};
pub use crate::statement::{CommandKind, Statement, TransactionBatch};
pub use crate::transaction::TransactionRunner;
pub use crate::types::{DbType, RowValues};

#[cfg(feature = "sqlite")]
pub use crate::sqlite::{SqliteConnection, SqliteConnector, SqliteOptions, SqliteOptionsBuilder};
