use std::fmt;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SqlMapperError {
    #[cfg(feature = "sqlite")]
    #[error(transparent)]
    SqliteError(#[from] rusqlite::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Parameter conversion error: {0}")]
    ParameterError(String),

    #[error("SQL execution error: {0}")]
    ExecutionError(String),

    #[error(
        "Mapper error: target type \"{target_type}\", source type \"{source_type}\" cannot be converted: {message}"
    )]
    MappingError {
        /// Declared type of the field being assigned.
        target_type: &'static str,
        /// Runtime type of the value read from the row.
        source_type: &'static str,
        /// Why the assignment failed.
        message: String,
    },

    #[error(transparent)]
    TransactionError(#[from] TransactionFailure),

    #[error("Unimplemented feature: {0}")]
    Unimplemented(String),
}

impl SqlMapperError {
    /// Short name of the error variant, used when composing transaction reports.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            #[cfg(feature = "sqlite")]
            Self::SqliteError(_) => "SqliteError",
            Self::ConfigError(_) => "ConfigError",
            Self::ConnectionError(_) => "ConnectionError",
            Self::ParameterError(_) => "ParameterError",
            Self::ExecutionError(_) => "ExecutionError",
            Self::MappingError { .. } => "MappingError",
            Self::TransactionError(_) => "TransactionError",
            Self::Unimplemented(_) => "Unimplemented",
        }
    }
}

/// Failure of a statement inside a transaction, together with the rollback outcome.
///
/// When the rollback succeeded only the original failure is reported. When the
/// rollback failed too, both are kept so the caller can tell the database may be
/// left in an inconsistent state.
#[derive(Debug)]
pub struct TransactionFailure {
    original: Box<SqlMapperError>,
    rollback: Option<Box<SqlMapperError>>,
}

impl TransactionFailure {
    #[must_use]
    pub fn rolled_back(original: SqlMapperError) -> Self {
        Self {
            original: Box::new(original),
            rollback: None,
        }
    }

    #[must_use]
    pub fn rollback_failed(original: SqlMapperError, rollback: SqlMapperError) -> Self {
        Self {
            original: Box::new(original),
            rollback: Some(Box::new(rollback)),
        }
    }

    /// The error that aborted the transaction.
    #[must_use]
    pub fn original(&self) -> &SqlMapperError {
        &self.original
    }

    /// The error raised by the rollback attempt, if it failed.
    #[must_use]
    pub fn rollback_error(&self) -> Option<&SqlMapperError> {
        self.rollback.as_deref()
    }

    /// Whether the rollback went through.
    #[must_use]
    pub fn is_rolled_back(&self) -> bool {
        self.rollback.is_none()
    }
}

impl fmt::Display for TransactionFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Commit error ({}): {}",
            self.original.kind(),
            self.original
        )?;
        if let Some(rollback) = &self.rollback {
            write!(f, "; Rollback error ({}): {}", rollback.kind(), rollback)?;
        }
        Ok(())
    }
}

impl std::error::Error for TransactionFailure {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(self.original.as_ref())
    }
}
