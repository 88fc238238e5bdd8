//! Map SQL result sets onto plain structs, and run statements with scoped
//! connections and all-or-nothing transactions.
//!
//! - [`mapper`] turns a [`ResultSet`] or a single row into instances of any
//!   `Default` type declared with [`mappable!`].
//! - [`SqlExecutor`] runs one statement per call (scalar, non-query, reader,
//!   multi-result reader) on a connection it opens and releases itself.
//! - [`TransactionRunner`] runs a batch of statements in one transaction and
//!   reports the rollback outcome when a statement fails.
//!
//! The database driver sits behind the [`Connector`] and [`DriverConnection`]
//! traits. `SQLite` (via `rusqlite`) is bundled behind the `sqlite` feature.
//!
//! ```rust,no_run
//! use row_mapper::prelude::*;
//! use row_mapper::mappable;
//!
//! #[derive(Debug, Default)]
//! struct User {
//!     id: i64,
//!     name: String,
//! }
//! mappable!(User { id: i64, name: String });
//!
//! let mut db = SqlExecutor::new("app.db")?;
//! db.add_parameter(Parameter::new(":min_id", 10));
//! let users: Vec<User> = db
//!     .query_as("SELECT id, name FROM users WHERE id >= :min_id")?
//!     .unwrap_or_default();
//!
//! let counts = db.execute_transaction(
//!     &["INSERT INTO users (id, name) VALUES (:id, :name)", "DELETE FROM users WHERE id = 1"],
//!     &[vec![Parameter::new("id", 99), Parameter::new("name", "zoe")], vec![]],
//! )?;
//! # let _ = (users, counts);
//! # Ok::<(), SqlMapperError>(())
//! ```

pub mod driver;
pub mod error;
pub mod executor;
pub mod helpers;
pub mod mapper;
pub mod params;
pub mod prelude;
pub mod results;
pub mod statement;
pub mod transaction;
pub mod types;

#[cfg(feature = "sqlite")]
pub mod sqlite;

pub use driver::{Connector, DriverConnection};
pub use error::{SqlMapperError, TransactionFailure};
pub use executor::SqlExecutor;
pub use results::{CustomDbRow, DataSet, ResultSet};
pub use transaction::TransactionRunner;
pub use types::RowValues;
