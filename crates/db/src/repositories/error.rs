//! Repository error type.

use sea_orm::DbErr;
use tally_core::projection::ProjectionError;

/// Error types for repository operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A stored value could not be mapped onto a domain type.
    #[error("Invalid {column} '{value}' in {table}")]
    InvalidColumn {
        /// Table the row came from.
        table: &'static str,
        /// Column holding the bad value.
        column: &'static str,
        /// The stored value.
        value: String,
    },

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl From<StoreError> for ProjectionError {
    fn from(err: StoreError) -> Self {
        Self::Persistence(err.to_string())
    }
}

/// Parses a text column into a domain enum.
pub(crate) fn parse_column<T: std::str::FromStr>(
    table: &'static str,
    column: &'static str,
    value: &str,
) -> Result<T, StoreError> {
    value.parse().map_err(|_| StoreError::InvalidColumn {
        table,
        column,
        value: value.to_string(),
    })
}
