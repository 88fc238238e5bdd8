//! All-or-nothing execution of a statement batch.

use tracing::{debug, error, warn};

use crate::driver::{Connector, DriverConnection};
use crate::error::{SqlMapperError, TransactionFailure};
use crate::params::Parameter;
use crate::statement::{Statement, TransactionBatch};

/// Runs statement batches inside a single transaction on a fresh connection.
#[derive(Debug)]
pub struct TransactionRunner<'a, C: Connector> {
    connector: &'a C,
    connection_string: &'a str,
}

impl<'a, C: Connector> TransactionRunner<'a, C> {
    pub(crate) fn new(connector: &'a C, connection_string: &'a str) -> Self {
        Self {
            connector,
            connection_string,
        }
    }

    /// Run `statements[i]` with `parameter_sets[i]`, in order, in one transaction.
    ///
    /// Returns the affected-row count of each statement.
    ///
    /// # Errors
    /// - `SqlMapperError::ConfigError` if the two lists differ in length; nothing is
    ///   opened in that case.
    /// - The driver's error unchanged if the connection or transaction cannot be opened.
    /// - `SqlMapperError::TransactionError` if a statement or the commit fails. The
    ///   transaction is rolled back; if the rollback fails as well, both failures
    ///   are reported.
    pub fn run<S: AsRef<str>>(
        &self,
        statements: &[S],
        parameter_sets: &[Vec<Parameter>],
    ) -> Result<Vec<usize>, SqlMapperError> {
        let batch = TransactionBatch::from_parts(statements, parameter_sets)?;
        self.run_batch(&batch)
    }

    /// Run a prepared batch in one transaction.
    ///
    /// # Errors
    /// Same as [`run`](Self::run), minus the length check.
    pub fn run_batch(&self, batch: &TransactionBatch) -> Result<Vec<usize>, SqlMapperError> {
        debug!(statements = batch.len(), "starting transaction");
        let mut conn = self.connector.connect(self.connection_string)?;
        let mut tx = TxGuard::begin(&mut conn)?;

        let outcome = execute_all(tx.conn(), batch).and_then(|counts| tx.commit().map(|()| counts));
        match outcome {
            Ok(counts) => {
                debug!(?counts, "transaction committed");
                Ok(counts)
            }
            Err(original) => {
                warn!(error = %original, "transaction failed, rolling back");
                match tx.rollback() {
                    Ok(()) => Err(TransactionFailure::rolled_back(original).into()),
                    Err(rollback) => {
                        error!(
                            error = %original,
                            rollback_error = %rollback,
                            "rollback failed; database state may be inconsistent"
                        );
                        Err(TransactionFailure::rollback_failed(original, rollback).into())
                    }
                }
            }
        }
    }
}

fn execute_all<D: DriverConnection>(
    conn: &mut D,
    batch: &TransactionBatch,
) -> Result<Vec<usize>, SqlMapperError> {
    let mut counts = Vec::with_capacity(batch.len());
    for (index, (sql, params)) in batch.iter().enumerate() {
        let affected = conn.non_query(&Statement::text(sql), params)?;
        debug!(index, affected, "transaction statement executed");
        counts.push(affected);
    }
    Ok(counts)
}

/// Open transaction on a borrowed connection; rolled back on drop unless it
/// was committed or rolled back explicitly.
struct TxGuard<'c, D: DriverConnection> {
    conn: &'c mut D,
    finished: bool,
}

impl<'c, D: DriverConnection> TxGuard<'c, D> {
    fn begin(conn: &'c mut D) -> Result<Self, SqlMapperError> {
        conn.begin()?;
        Ok(Self {
            conn,
            finished: false,
        })
    }

    fn conn(&mut self) -> &mut D {
        self.conn
    }

    fn commit(&mut self) -> Result<(), SqlMapperError> {
        self.conn.commit()?;
        self.finished = true;
        Ok(())
    }

    fn rollback(&mut self) -> Result<(), SqlMapperError> {
        self.finished = true;
        self.conn.rollback()
    }
}

impl<D: DriverConnection> Drop for TxGuard<'_, D> {
    fn drop(&mut self) {
        if !self.finished
            && let Err(err) = self.conn.rollback()
        {
            warn!(error = %err, "rollback on drop failed");
        }
    }
}
