//! Error types for storefront store operations.
//!
//! Provides a unified error type covering database access, migration,
//! fixture, and configuration failures. Constraint violations raised by the
//! store can be classified with [`StoreError::constraint`].

use rusqlite::{ErrorCode, ffi};
use storefront_core::RowId;
use thiserror::Error;

/// Errors that can occur during store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// SQLite database operation failure.
    #[error("database error: {0}")]
    DatabaseError(#[from] rusqlite::Error),

    /// Row-to-entity conversion failure.
    #[error("conversion error: {0}")]
    ConversionError(String),

    /// Migration lifecycle operation failure.
    #[error("migration error: {0}")]
    MigrationError(String),

    /// Fixture dataset refers to a parent that was not inserted.
    #[error("fixture error: {0}")]
    FixtureError(String),

    /// No row with the given primary key exists.
    #[error("{table} row {id} not found")]
    RowNotFound { table: &'static str, id: RowId },

    /// Store configuration could not be resolved.
    #[error("config error: {0}")]
    ConfigError(#[from] storefront_db::ConfigError),
}

/// Kind of integrity constraint a statement violated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstraintKind {
    Unique,
    PrimaryKey,
    ForeignKey,
    NotNull,
    Check,
    Other,
}

impl StoreError {
    /// Classifies the error as a constraint violation, if it is one.
    pub fn constraint(&self) -> Option<ConstraintKind> {
        let Self::DatabaseError(rusqlite::Error::SqliteFailure(err, _)) = self else {
            return None;
        };
        if err.code != ErrorCode::ConstraintViolation {
            return None;
        }
        Some(match err.extended_code {
            ffi::SQLITE_CONSTRAINT_UNIQUE => ConstraintKind::Unique,
            ffi::SQLITE_CONSTRAINT_PRIMARYKEY => ConstraintKind::PrimaryKey,
            ffi::SQLITE_CONSTRAINT_FOREIGNKEY => ConstraintKind::ForeignKey,
            ffi::SQLITE_CONSTRAINT_NOTNULL => ConstraintKind::NotNull,
            ffi::SQLITE_CONSTRAINT_CHECK => ConstraintKind::Check,
            _ => ConstraintKind::Other,
        })
    }
}

/// Convenience alias for results with [`StoreError`].
pub type Result<T> = std::result::Result<T, StoreError>;
