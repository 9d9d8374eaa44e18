//! Error types for the refresh engine.

use std::path::PathBuf;

/// Errors that can occur while refreshing a relation.
#[derive(Debug, thiserror::Error)]
pub enum RefreshError {
    /// The pending query could not be materialized for column discovery.
    ///
    /// Raised before any statement touches the target, so the target is
    /// left as it was.
    #[error("Failed to inspect the query for '{relation}': {source}")]
    InspectionFailed {
        /// The relation whose query was being inspected.
        relation: String,
        /// The underlying failure.
        #[source]
        source: Box<RefreshError>,
    },

    /// A DDL/DML statement was rejected by the store.
    #[error("Statement failed: {source}\n  {statement}")]
    Statement {
        /// The statement text that failed.
        statement: String,
        /// The driver error.
        #[source]
        source: sqlx::Error,
    },

    /// A catalog read failed.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// The altered table would end up with no columns at all.
    #[error("Refusing to alter '{relation}': the final column list is empty")]
    StructuralImpossibility {
        /// The target relation.
        relation: String,
    },

    /// A statement failed after the target had already been truncated or
    /// altered. The target holds no refreshed data until the refresh is
    /// run again.
    #[error(
        "Refresh of '{relation}' interrupted after the target was modified; \
         re-run the refresh to restore its data: {source}"
    )]
    Interrupted {
        /// The target relation.
        relation: String,
        /// The failure that stopped the sequence.
        #[source]
        source: Box<RefreshError>,
    },

    /// A model reference did not resolve to a query file.
    #[error("Model '{name}' not found at {}", .path.display())]
    ModelNotFound {
        /// The model reference.
        name: String,
        /// Where the query text was expected.
        path: PathBuf,
    },

    /// A model reference was given but no resolver is configured.
    #[error("No model resolver configured for '{0}'")]
    UnresolvedModel(String),

    /// An identifier cannot be used to name a relation or column.
    #[error("Invalid identifier: {0:?}")]
    InvalidIdentifier(String),

    /// IO error (reading config or model files).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration file could not be parsed.
    #[error("Invalid configuration: {0}")]
    Config(#[from] serde_json::Error),
}

impl RefreshError {
    /// Returns true if this error left the target in a partially refreshed
    /// state.
    #[must_use]
    pub fn is_interrupted(&self) -> bool {
        matches!(self, Self::Interrupted { .. })
    }
}

/// Result type for refresh operations.
pub type Result<T> = std::result::Result<T, RefreshError>;
