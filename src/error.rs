//! Error types for conversion-sync.
//!
//! Defines the main error enum used throughout the application.

use thiserror::Error;

/// Main error type for import operations.
#[derive(Error, Debug)]
pub enum ImportError {
    /// Configuration errors (missing table name, invalid config file, etc.)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Fatal warehouse errors (malformed SQL, permission denied, job failed, etc.)
    #[error("Query error: {0}")]
    Query(String),

    /// Transient warehouse errors (rate limits, temporary outages).
    ///
    /// The poll loop retries these while backoff attempts remain.
    #[error("Transient query error: {0}")]
    TransientQuery(String),

    /// A conversion category with no entry in the conversion map.
    #[error("Mapping error: {0}")]
    Mapping(String),

    /// Sheet errors (spreadsheet missing, range invalid, API failure, etc.)
    #[error("Sheet error: {0}")]
    Sheet(String),

    /// Internal application errors (unexpected states, bugs, etc.)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ImportError {
    /// Creates a configuration error with the given message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Creates a fatal query error with the given message.
    pub fn query(msg: impl Into<String>) -> Self {
        Self::Query(msg.into())
    }

    /// Creates a transient query error with the given message.
    pub fn transient_query(msg: impl Into<String>) -> Self {
        Self::TransientQuery(msg.into())
    }

    /// Creates a mapping error with the given message.
    pub fn mapping(msg: impl Into<String>) -> Self {
        Self::Mapping(msg.into())
    }

    /// Creates a sheet error with the given message.
    pub fn sheet(msg: impl Into<String>) -> Self {
        Self::Sheet(msg.into())
    }

    /// Creates an internal error with the given message.
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Returns true if the operation that produced this error may be retried.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::TransientQuery(_))
    }

    /// Returns the error category as a string for display purposes.
    pub fn category(&self) -> &'static str {
        match self {
            Self::Config(_) => "Configuration Error",
            Self::Query(_) => "Query Error",
            Self::TransientQuery(_) => "Transient Query Error",
            Self::Mapping(_) => "Mapping Error",
            Self::Sheet(_) => "Sheet Error",
            Self::Internal(_) => "Internal Error",
        }
    }
}

/// Result type alias using ImportError.
pub type Result<T> = std::result::Result<T, ImportError>;
