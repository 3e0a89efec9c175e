/*!
 * Error types for the gradebook application.
 *
 * This module contains custom error types for the seed generator and the
 * query catalog, using the thiserror crate for ergonomic error definitions.
 */

use thiserror::Error;

use crate::database::EntityKind;

/// Errors that can occur while seeding the database
#[derive(Error, Debug)]
pub enum SeedError {
    /// The seed configuration cannot produce a valid dataset
    #[error("Invalid seed configuration: {0}")]
    InvalidConfig(String),

    /// Seeding would mix generated ids with existing rows
    #[error("Database already contains records; rerun with reset to replace them")]
    DatabaseNotEmpty,

    /// Storage failure while staging the batch; nothing was committed
    #[error("Storage error during seeding: {0}")]
    Storage(#[from] rusqlite::Error),
}

/// Errors that can occur when running catalog queries
#[derive(Error, Debug)]
pub enum QueryError {
    /// Wrong number or shape of query arguments
    #[error("Invalid query arguments: {0}")]
    InvalidArguments(String),

    /// A query description references columns or aliases it does not have
    #[error("Invalid query plan: {0}")]
    InvalidPlan(String),

    /// Strict mode only: a referenced id has no row
    #[error("Unknown {kind} id: {id}")]
    UnknownId {
        /// Entity the id was expected to reference
        kind: EntityKind,
        /// The missing id
        id: i64,
    },

    /// Underlying storage failure
    #[error("Storage error: {0}")]
    Storage(#[from] rusqlite::Error),
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from seeding
    #[error("Seed error: {0}")]
    Seed(#[from] SeedError),

    /// Error from a catalog query
    #[error("Query error: {0}")]
    Query(#[from] QueryError),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}
