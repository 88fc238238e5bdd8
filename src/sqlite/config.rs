use std::time::Duration;

use rusqlite::Connection;
use serde::Deserialize;

use crate::driver::Connector;
use crate::error::SqlMapperError;

use super::connection::SqliteConnection;

/// Options for opening `SQLite` connections.
///
/// Deserializable so it can live in an application config file:
/// ```rust
/// use row_mapper::sqlite::SqliteOptions;
///
/// let opts: SqliteOptions =
///     serde_json::from_str(r#"{ "db_path": "app.db", "wal": true }"#).unwrap();
/// assert!(opts.wal);
/// assert_eq!(opts.busy_timeout_ms, None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SqliteOptions {
    pub db_path: String,
    #[serde(default)]
    pub busy_timeout_ms: Option<u64>,
    #[serde(default)]
    pub wal: bool,
    #[serde(default)]
    pub foreign_keys: bool,
}

impl SqliteOptions {
    #[must_use]
    pub fn new(db_path: String) -> Self {
        Self {
            db_path,
            busy_timeout_ms: None,
            wal: false,
            foreign_keys: false,
        }
    }

    /// Split into the connection string and a connector applying the remaining options.
    #[must_use]
    pub fn into_parts(self) -> (String, SqliteConnector) {
        let connector = SqliteConnector {
            busy_timeout: self.busy_timeout_ms.map(Duration::from_millis),
            wal: self.wal,
            foreign_keys: self.foreign_keys,
        };
        (self.db_path, connector)
    }
}

/// Fluent builder for `SQLite` options.
#[derive(Debug, Clone)]
pub struct SqliteOptionsBuilder {
    opts: SqliteOptions,
}

impl SqliteOptionsBuilder {
    #[must_use]
    pub fn new(db_path: String) -> Self {
        Self {
            opts: SqliteOptions::new(db_path),
        }
    }

    #[must_use]
    pub fn busy_timeout(mut self, timeout: Duration) -> Self {
        self.opts.busy_timeout_ms = Some(u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX));
        self
    }

    #[must_use]
    pub fn wal(mut self, wal: bool) -> Self {
        self.opts.wal = wal;
        self
    }

    #[must_use]
    pub fn foreign_keys(mut self, foreign_keys: bool) -> Self {
        self.opts.foreign_keys = foreign_keys;
        self
    }

    #[must_use]
    pub fn finish(self) -> SqliteOptions {
        self.opts
    }
}

/// Opens `rusqlite` connections; the connection string is the database path,
/// `:memory:`, or a `file:` URI.
#[derive(Debug, Clone, Default)]
pub struct SqliteConnector {
    busy_timeout: Option<Duration>,
    wal: bool,
    foreign_keys: bool,
}

impl SqliteConnector {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn apply_pragmas(&self, conn: &Connection) -> Result<(), SqlMapperError> {
        if let Some(timeout) = self.busy_timeout {
            conn.busy_timeout(timeout)?;
        }
        if self.wal {
            conn.execute_batch("PRAGMA journal_mode = WAL;")?;
        }
        if self.foreign_keys {
            conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        }
        Ok(())
    }
}

impl Connector for SqliteConnector {
    type Connection = SqliteConnection;

    fn connect(&self, connection_string: &str) -> Result<SqliteConnection, SqlMapperError> {
        let conn = Connection::open(connection_string)?;
        self.apply_pragmas(&conn)?;
        Ok(SqliteConnection::new(conn))
    }
}
