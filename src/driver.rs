//! Seam between the executor and a concrete database driver.
//!
//! A [`Connector`] opens connections from a connection string; the connection it
//! returns is closed when dropped. Statements are prepared and released inside
//! each [`DriverConnection`] call, so nothing outlives the call that created it.

use crate::error::SqlMapperError;
use crate::params::Parameter;
use crate::results::{DataSet, ResultSet};
use crate::statement::Statement;
use crate::types::RowValues;

/// Opens driver connections.
pub trait Connector {
    type Connection: DriverConnection;

    /// Open a connection described by `connection_string`.
    ///
    /// # Errors
    /// Returns the driver's error unchanged if the connection cannot be opened.
    fn connect(&self, connection_string: &str) -> Result<Self::Connection, SqlMapperError>;
}

/// Execution primitives offered by an open driver connection.
pub trait DriverConnection {
    /// First column of the first row, `RowValues::Null` when there is no row.
    ///
    /// # Errors
    /// Returns the driver's error unchanged.
    fn scalar(
        &mut self,
        statement: &Statement,
        params: &[Parameter],
    ) -> Result<RowValues, SqlMapperError>;

    /// Run a statement that returns no rows, yielding the affected-row count.
    ///
    /// # Errors
    /// Returns the driver's error unchanged.
    fn non_query(
        &mut self,
        statement: &Statement,
        params: &[Parameter],
    ) -> Result<usize, SqlMapperError>;

    /// Fully materialize the rows produced by a statement.
    ///
    /// # Errors
    /// Returns the driver's error unchanged.
    fn reader(
        &mut self,
        statement: &Statement,
        params: &[Parameter],
    ) -> Result<ResultSet, SqlMapperError>;

    /// Materialize one result set per statement contained in the text.
    ///
    /// # Errors
    /// Returns the driver's error unchanged.
    fn reader_data_set(
        &mut self,
        statement: &Statement,
        params: &[Parameter],
    ) -> Result<DataSet, SqlMapperError>;

    /// # Errors
    /// Returns the driver's error unchanged.
    fn begin(&mut self) -> Result<(), SqlMapperError>;

    /// # Errors
    /// Returns the driver's error unchanged.
    fn commit(&mut self) -> Result<(), SqlMapperError>;

    /// # Errors
    /// Returns the driver's error unchanged.
    fn rollback(&mut self) -> Result<(), SqlMapperError>;
}
