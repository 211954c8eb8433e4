// Error types for the analytics pipeline

use thiserror::Error;

/// Result type alias for analytics operations
pub type Result<T> = std::result::Result<T, AnalyticsError>;

/// Errors that can occur while recording or aggregating events
#[derive(Debug, Error)]
pub enum AnalyticsError {
    /// Submission did not carry a visitor identifier
    #[error("Visitor ID is required")]
    MissingVisitorId,

    /// Datastore call failed
    #[error("Storage error: {0}")]
    Storage(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AnalyticsError {
    /// Create a storage error
    pub fn storage(msg: impl Into<String>) -> Self {
        AnalyticsError::Storage(msg.into())
    }

    /// Whether the error was caused by the caller's input (4xx-class)
    pub fn is_validation(&self) -> bool {
        matches!(self, AnalyticsError::MissingVisitorId)
    }
}
