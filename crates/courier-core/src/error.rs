use thiserror::Error;

/// Core error type for preference resolution
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PreferenceError {
    /// Subscriber not found for the given environment
    #[error("Subscriber not found: {0}")]
    SubscriberNotFound(String),

    /// Storage collaborator error
    #[error("Storage error: {0}")]
    StorageError(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// Analytics emission error
    #[error("Analytics error: {0}")]
    AnalyticsError(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl From<serde_json::Error> for PreferenceError {
    fn from(err: serde_json::Error) -> Self {
        PreferenceError::SerializationError(err.to_string())
    }
}

impl From<String> for PreferenceError {
    fn from(err: String) -> Self {
        PreferenceError::Other(err)
    }
}

impl From<&str> for PreferenceError {
    fn from(err: &str) -> Self {
        PreferenceError::Other(err.to_string())
    }
}
