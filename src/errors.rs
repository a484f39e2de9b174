use thiserror::Error;

use crate::validation::ValidationError;

/// Error type shared by models, stores, and services.
#[derive(Debug, Error)]
pub enum BudgetError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("{collection} `{id}` not found")]
    NotFound { collection: &'static str, id: String },
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("Storage error: {0}")]
    Storage(String),
}

impl BudgetError {
    pub fn not_found(collection: &'static str, id: impl ToString) -> Self {
        BudgetError::NotFound {
            collection,
            id: id.to_string(),
        }
    }

    /// Status class the transport layer reports for this error.
    pub fn code(&self) -> &'static str {
        match self {
            BudgetError::Validation(err) => err.code(),
            BudgetError::NotFound { .. } => "NOT_FOUND",
            BudgetError::Io(_) | BudgetError::Serde(_) | BudgetError::Storage(_) => "INTERNAL",
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, BudgetError::NotFound { .. })
    }

    pub fn as_validation(&self) -> Option<&ValidationError> {
        match self {
            BudgetError::Validation(err) => Some(err),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, BudgetError>;
