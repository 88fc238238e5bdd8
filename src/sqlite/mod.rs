// SQLite driver - the bundled implementation of the driver traits.
//
// - config: connection options and the connector
// - connection: the open connection and its execution primitives
// - params: parameter binding onto rusqlite statements
// - query: row extraction and result-set materialization

pub mod config;
pub mod connection;
pub mod params;
pub mod query;

pub use config::{SqliteConnector, SqliteOptions, SqliteOptionsBuilder};
pub use connection::SqliteConnection;
pub use params::row_value_to_sqlite_value;
pub use query::build_result_set;
