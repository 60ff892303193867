use sea_orm::DbErr;
use thiserror::Error;
use uuid::Uuid;

/// Errors raised by the issue store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Database error from sea-orm.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),

    /// Record not found.
    #[error("Record not found: {context}")]
    NotFound { context: String },

    /// Input or stored data could not be interpreted.
    #[error("Invalid input: {message}")]
    InvalidInput { message: String },
}

impl StoreError {
    /// Create a NotFound error for an issue id.
    pub fn issue_not_found(id: Uuid) -> Self {
        Self::NotFound {
            context: format!("issue id={}", id),
        }
    }

    /// Create a NotFound error for a project id.
    pub fn project_not_found(id: Uuid) -> Self {
        Self::NotFound {
            context: format!("project id={}", id),
        }
    }

    /// Create an InvalidInput error.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }
}

/// Result type alias for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
