//! Error handling for record queries.
//!
//! Configuration mistakes (unknown sort keys, undeclared filter fields,
//! malformed aggregates) are reported as `QueryError` and are never retried.
//! Failures reported by an external action service are `ActionError` and
//! carry their own retry classification.

use std::io;

/// Specialized error type for query, schema and collection operations
#[derive(Debug, thiserror::Error)]
pub enum QueryError {
    /// Sort key is not one of the collection's sortable fields
    #[error("Invalid sort key '{key}' for collection '{collection}'")]
    InvalidSortKey {
        /// Collection the query was prepared for
        collection: String,
        /// The rejected key
        key: String,
    },

    /// Filter references a field that is not declared filterable
    #[error("Invalid filter field '{field}' for collection '{collection}'")]
    InvalidFilterField {
        /// Collection the query was prepared for
        collection: String,
        /// The rejected field
        field: String,
    },

    /// Filter value does not fit the field it constrains
    #[error("Invalid filter value for field '{field}': {reason}")]
    InvalidFilterValue {
        /// Field the filter applies to
        field: String,
        /// What is wrong with the value
        reason: String,
    },

    /// Schema references a field it never declared
    #[error("Unknown field '{field}' in collection '{collection}'")]
    UnknownField {
        /// Collection being declared or queried
        collection: String,
        /// The missing field
        field: String,
    },

    /// Schema declaration is inconsistent
    #[error("Schema error: {0}")]
    Schema(String),

    /// Aggregate spec cannot be evaluated against the schema
    #[error("Invalid aggregate '{label}': {reason}")]
    InvalidAggregate {
        /// Label of the offending aggregate
        label: String,
        /// What is wrong with it
        reason: String,
    },

    /// Two records in one collection share an identifier
    #[error("Duplicate record id '{0}'")]
    DuplicateRecordId(String),

    /// No record with the given identifier exists
    #[error("Record '{0}' not found")]
    RecordNotFound(String),

    /// Input data could not be turned into a record
    #[error("Invalid record: {0}")]
    InvalidRecord(String),

    /// Error opening or reading a file
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Error decoding or encoding JSON
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// External action service refused or failed the request
    #[error(transparent)]
    Action(#[from] ActionError),
}

impl QueryError {
    /// Whether repeating the same call could succeed
    ///
    /// Only action failures can be transient; everything else is a
    /// deterministic configuration or data mistake.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Action(err) => err.is_retryable(),
            _ => false,
        }
    }
}

/// Failure outcomes of an approve/reject/suspend style action
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ActionError {
    /// The service could not be reached or is temporarily unavailable
    #[error("Action service unavailable: {0}")]
    Unavailable(String),

    /// The service did not answer in time
    #[error("Action timed out after {0} ms")]
    Timeout(u64),

    /// The service understood the request and refused it
    #[error("Action rejected: {0}")]
    Rejected(String),
}

impl ActionError {
    /// Whether the view may offer a retry
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::Unavailable(_) | Self::Timeout(_))
    }
}

/// Result type for record query operations
pub type Result<T> = std::result::Result<T, QueryError>;
