use std::fmt;

use rusqlite::fallible_iterator::FallibleIterator;
use rusqlite::{Batch, Connection};

use crate::driver::DriverConnection;
use crate::error::SqlMapperError;
use crate::params::Parameter;
use crate::results::{DataSet, ResultSet};
use crate::statement::Statement;
use crate::types::RowValues;

use super::params::{MissingName, ParamBinder, bind_parameters};
use super::query::{build_result_set, first_value};

/// Open `SQLite` connection; closed when dropped.
pub struct SqliteConnection {
    conn: Connection,
    in_transaction: bool,
}

impl SqliteConnection {
    pub(crate) fn new(conn: Connection) -> Self {
        Self {
            conn,
            in_transaction: false,
        }
    }

    /// Borrow the underlying `rusqlite` connection.
    #[must_use]
    pub fn raw(&self) -> &Connection {
        &self.conn
    }

    fn prepare(&self, statement: &Statement) -> Result<rusqlite::Statement<'_>, SqlMapperError> {
        ensure_text(statement)?;
        Ok(self.conn.prepare(&statement.sql)?)
    }
}

fn ensure_text(statement: &Statement) -> Result<(), SqlMapperError> {
    if statement.is_stored_procedure() {
        return Err(SqlMapperError::Unimplemented(format!(
            "SQLite has no stored procedures (called '{}')",
            statement.sql
        )));
    }
    Ok(())
}

impl fmt::Debug for SqliteConnection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SqliteConnection")
            .field("path", &self.conn.path())
            .field("in_transaction", &self.in_transaction)
            .finish()
    }
}

impl DriverConnection for SqliteConnection {
    fn scalar(
        &mut self,
        statement: &Statement,
        params: &[Parameter],
    ) -> Result<RowValues, SqlMapperError> {
        let mut stmt = self.prepare(statement)?;
        bind_parameters(&mut stmt, params)?;
        first_value(&mut stmt)
    }

    fn non_query(
        &mut self,
        statement: &Statement,
        params: &[Parameter],
    ) -> Result<usize, SqlMapperError> {
        let mut stmt = self.prepare(statement)?;
        bind_parameters(&mut stmt, params)?;
        let before = self.conn.total_changes();
        if stmt.column_count() == 0 {
            stmt.raw_execute()?;
        } else {
            // Row-returning statements run to completion; their rows are discarded.
            let mut rows = stmt.raw_query();
            while rows.next()?.is_some() {}
        }
        let changed = self.conn.total_changes().saturating_sub(before);
        Ok(usize::try_from(changed).unwrap_or(usize::MAX))
    }

    fn reader(
        &mut self,
        statement: &Statement,
        params: &[Parameter],
    ) -> Result<ResultSet, SqlMapperError> {
        let mut stmt = self.prepare(statement)?;
        bind_parameters(&mut stmt, params)?;
        build_result_set(&mut stmt)
    }

    fn reader_data_set(
        &mut self,
        statement: &Statement,
        params: &[Parameter],
    ) -> Result<DataSet, SqlMapperError> {
        ensure_text(statement)?;
        let mut data_set = DataSet::new();
        let mut binder = ParamBinder::new(params, MissingName::Skip)?;
        let mut batch = Batch::new(&self.conn, &statement.sql);
        while let Some(mut stmt) = batch.next()? {
            binder.bind(&mut stmt)?;
            if stmt.column_count() == 0 {
                stmt.raw_execute()?;
            } else {
                data_set.push(build_result_set(&mut stmt)?);
            }
        }
        binder.finish()?;
        Ok(data_set)
    }

    fn begin(&mut self) -> Result<(), SqlMapperError> {
        if self.in_transaction {
            return Err(SqlMapperError::ExecutionError(
                "SQLite transaction already in progress".into(),
            ));
        }
        self.conn.execute_batch("BEGIN")?;
        self.in_transaction = true;
        Ok(())
    }

    fn commit(&mut self) -> Result<(), SqlMapperError> {
        if !self.in_transaction {
            return Err(SqlMapperError::ExecutionError(
                "SQLite transaction not active".into(),
            ));
        }
        self.conn.execute_batch("COMMIT")?;
        self.in_transaction = false;
        Ok(())
    }

    fn rollback(&mut self) -> Result<(), SqlMapperError> {
        if !self.in_transaction {
            return Err(SqlMapperError::ExecutionError(
                "SQLite transaction not active".into(),
            ));
        }
        // A failed ROLLBACK is not retried on this handle.
        self.in_transaction = false;
        self.conn.execute_batch("ROLLBACK")?;
        Ok(())
    }
}
