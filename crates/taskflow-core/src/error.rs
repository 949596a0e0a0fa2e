use thiserror::Error;

#[derive(Error, Debug)]
pub enum TaskflowError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invariant violation: {0}")]
    InvariantViolation(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl TaskflowError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn not_found(kind: &str, id: impl std::fmt::Display) -> Self {
        Self::NotFound(format!("{} {}", kind, id))
    }

    pub fn invariant(message: impl Into<String>) -> Self {
        Self::InvariantViolation(message.into())
    }

    /// Whether the user can fix this by changing their input.
    pub fn is_user_recoverable(&self) -> bool {
        matches!(self, Self::Validation(_) | Self::NotFound(_))
    }

    /// Text suitable for an error notification.
    ///
    /// Validation messages are already phrased for the user and pass through
    /// verbatim; everything else collapses to a generic message.
    pub fn user_message(&self) -> String {
        match self {
            Self::Validation(message) => message.clone(),
            Self::NotFound(_) => "Something went wrong: the item no longer exists".to_string(),
            Self::InvariantViolation(_) => {
                "Something went wrong: the action was cancelled".to_string()
            }
            Self::Io(_) | Self::Serialization(_) | Self::Storage(_) => {
                "Failed to save your changes".to_string()
            }
            Self::Internal(_) => "Something went wrong".to_string(),
        }
    }
}
