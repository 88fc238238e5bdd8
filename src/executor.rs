//! One-shot statement execution with a scoped connection per call.
//!
//! Every call opens its own connection, prepares one statement, binds the
//! parameters, runs it and releases both before returning, on success and on
//! error alike. Driver errors are returned exactly as the driver produced them.
//!
//! Parameters can be supplied two ways:
//!
//! - explicitly, as a slice passed to [`SqlExecutor::scalar`],
//!   [`SqlExecutor::non_query`], [`SqlExecutor::reader`] or
//!   [`SqlExecutor::reader_data_set`];
//! - through the executor's queue ([`SqlExecutor::add_parameter`]) followed by one
//!   of the `execute_*` methods. The queue is drained by every `execute_*` call,
//!   whether it succeeds or fails.

use tracing::debug;

use crate::driver::{Connector, DriverConnection};
use crate::error::SqlMapperError;
use crate::mapper::{Mappable, map_result_set};
use crate::params::Parameter;
use crate::results::{DataSet, ResultSet};
use crate::statement::{Statement, TransactionBatch};
use crate::transaction::TransactionRunner;
use crate::types::RowValues;

#[cfg(feature = "sqlite")]
use crate::sqlite::{SqliteConnector, SqliteOptions};

/// Runs statements against the database named by a connection string.
#[derive(Debug)]
pub struct SqlExecutor<C: Connector> {
    connection_string: String,
    connector: C,
    parameters: Vec<Parameter>,
}

#[cfg(feature = "sqlite")]
impl SqlExecutor<SqliteConnector> {
    /// Executor over a `SQLite` database path with default connection options.
    ///
    /// # Errors
    /// Returns `SqlMapperError::ConfigError` if `connection_string` is blank.
    pub fn new(connection_string: impl Into<String>) -> Result<Self, SqlMapperError> {
        Self::with_connector(connection_string, SqliteConnector::new())
    }

    /// Executor over a `SQLite` database described by `options`.
    ///
    /// # Errors
    /// Returns `SqlMapperError::ConfigError` if the database path is blank.
    pub fn sqlite(options: SqliteOptions) -> Result<Self, SqlMapperError> {
        let (connection_string, connector) = options.into_parts();
        Self::with_connector(connection_string, connector)
    }
}

impl<C: Connector> SqlExecutor<C> {
    /// Executor using a caller-supplied driver.
    ///
    /// # Errors
    /// Returns `SqlMapperError::ConfigError` if `connection_string` is blank. No
    /// connection is attempted.
    pub fn with_connector(
        connection_string: impl Into<String>,
        connector: C,
    ) -> Result<Self, SqlMapperError> {
        let connection_string = connection_string.into();
        if connection_string.trim().is_empty() {
            return Err(SqlMapperError::ConfigError(
                "Invalid connection string".into(),
            ));
        }
        Ok(Self {
            connection_string,
            connector,
            parameters: Vec::new(),
        })
    }

    #[must_use]
    pub fn connection_string(&self) -> &str {
        &self.connection_string
    }

    #[must_use]
    pub fn connector(&self) -> &C {
        &self.connector
    }

    /// Queue a parameter for the next `execute_*` call.
    pub fn add_parameter(&mut self, parameter: Parameter) -> &mut Self {
        self.parameters.push(parameter);
        self
    }

    pub fn add_parameters<I>(&mut self, parameters: I) -> &mut Self
    where
        I: IntoIterator<Item = Parameter>,
    {
        self.parameters.extend(parameters);
        self
    }

    /// Parameters currently queued.
    #[must_use]
    pub fn parameters(&self) -> &[Parameter] {
        &self.parameters
    }

    pub fn clear_parameters(&mut self) {
        self.parameters.clear();
    }

    /// Run a statement and return the first column of the first row.
    ///
    /// # Errors
    /// Returns the driver's error unchanged.
    pub fn scalar(
        &self,
        statement: impl Into<Statement>,
        params: &[Parameter],
    ) -> Result<RowValues, SqlMapperError> {
        self.run("scalar", &statement.into(), params, |conn, stmt, params| {
            conn.scalar(stmt, params)
        })
    }

    /// Run a statement and return the number of affected rows.
    ///
    /// # Errors
    /// Returns the driver's error unchanged.
    pub fn non_query(
        &self,
        statement: impl Into<Statement>,
        params: &[Parameter],
    ) -> Result<usize, SqlMapperError> {
        self.run("non_query", &statement.into(), params, |conn, stmt, params| {
            conn.non_query(stmt, params)
        })
    }

    /// Run a query and materialize all of its rows.
    ///
    /// # Errors
    /// Returns the driver's error unchanged.
    pub fn reader(
        &self,
        statement: impl Into<Statement>,
        params: &[Parameter],
    ) -> Result<ResultSet, SqlMapperError> {
        self.run("reader", &statement.into(), params, |conn, stmt, params| {
            conn.reader(stmt, params)
        })
    }

    /// Run every statement in the text, collecting one result set per query.
    ///
    /// # Errors
    /// Returns the driver's error unchanged.
    pub fn reader_data_set(
        &self,
        statement: impl Into<Statement>,
        params: &[Parameter],
    ) -> Result<DataSet, SqlMapperError> {
        self.run(
            "reader_data_set",
            &statement.into(),
            params,
            |conn, stmt, params| conn.reader_data_set(stmt, params),
        )
    }

    /// [`scalar`](Self::scalar) with the queued parameters.
    ///
    /// # Errors
    /// Returns the driver's error unchanged. The queue is empty afterwards either way.
    pub fn execute_scalar(
        &mut self,
        statement: impl Into<Statement>,
    ) -> Result<RowValues, SqlMapperError> {
        let params = self.take_parameters();
        self.scalar(statement, &params)
    }

    /// [`non_query`](Self::non_query) with the queued parameters.
    ///
    /// # Errors
    /// Returns the driver's error unchanged. The queue is empty afterwards either way.
    pub fn execute_non_query(
        &mut self,
        statement: impl Into<Statement>,
    ) -> Result<usize, SqlMapperError> {
        let params = self.take_parameters();
        self.non_query(statement, &params)
    }

    /// [`reader`](Self::reader) with the queued parameters.
    ///
    /// # Errors
    /// Returns the driver's error unchanged. The queue is empty afterwards either way.
    pub fn execute_reader(
        &mut self,
        statement: impl Into<Statement>,
    ) -> Result<ResultSet, SqlMapperError> {
        let params = self.take_parameters();
        self.reader(statement, &params)
    }

    /// [`reader_data_set`](Self::reader_data_set) with the queued parameters.
    ///
    /// # Errors
    /// Returns the driver's error unchanged. The queue is empty afterwards either way.
    pub fn execute_reader_data_set(
        &mut self,
        statement: impl Into<Statement>,
    ) -> Result<DataSet, SqlMapperError> {
        let params = self.take_parameters();
        self.reader_data_set(statement, &params)
    }

    /// Run a query with the queued parameters and map its rows onto `T`.
    ///
    /// `Ok(None)` when the query produced no columns.
    ///
    /// # Errors
    /// Returns the driver's error, or `SqlMapperError::MappingError` if a row does not fit `T`.
    pub fn query_as<T: Mappable>(
        &mut self,
        statement: impl Into<Statement>,
    ) -> Result<Option<Vec<T>>, SqlMapperError> {
        let result_set = self.execute_reader(statement)?;
        map_result_set(&result_set)
    }

    /// Like [`query_as`](Self::query_as) but keeps only the first row.
    ///
    /// # Errors
    /// Returns the driver's error, or `SqlMapperError::MappingError` if a row does not fit `T`.
    pub fn query_one_as<T: Mappable>(
        &mut self,
        statement: impl Into<Statement>,
    ) -> Result<Option<T>, SqlMapperError> {
        Ok(self
            .query_as(statement)?
            .and_then(|rows| rows.into_iter().next()))
    }

    /// Transaction runner bound to this executor's database.
    #[must_use]
    pub fn transaction(&self) -> TransactionRunner<'_, C> {
        TransactionRunner::new(&self.connector, &self.connection_string)
    }

    /// Run index-aligned statements and parameter sets in one transaction.
    ///
    /// # Errors
    /// See [`TransactionRunner::run`].
    pub fn execute_transaction<S: AsRef<str>>(
        &self,
        statements: &[S],
        parameter_sets: &[Vec<Parameter>],
    ) -> Result<Vec<usize>, SqlMapperError> {
        self.transaction().run(statements, parameter_sets)
    }

    /// Run a prepared batch in one transaction.
    ///
    /// # Errors
    /// See [`TransactionRunner::run_batch`].
    pub fn execute_batch_transaction(
        &self,
        batch: &TransactionBatch,
    ) -> Result<Vec<usize>, SqlMapperError> {
        self.transaction().run_batch(batch)
    }

    fn take_parameters(&mut self) -> Vec<Parameter> {
        std::mem::take(&mut self.parameters)
    }

    fn run<R, F>(
        &self,
        mode: &'static str,
        statement: &Statement,
        params: &[Parameter],
        op: F,
    ) -> Result<R, SqlMapperError>
    where
        F: FnOnce(&mut C::Connection, &Statement, &[Parameter]) -> Result<R, SqlMapperError>,
    {
        debug!(
            mode,
            sql = %statement.sql,
            kind = ?statement.kind,
            params = params.len(),
            "executing statement"
        );
        let mut conn = self.connector.connect(&self.connection_string)?;
        let result = op(&mut conn, statement, params);
        if let Err(err) = &result {
            debug!(mode, error = %err, "statement failed");
        }
        result
    }
}
