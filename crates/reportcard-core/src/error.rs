use std::path::PathBuf;

use thiserror::Error;

use crate::models::record::Field;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("session store I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

/// A required field is missing or malformed. Always names the field so the
/// caller can point the user at it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("required field `{0}` is empty")]
    Empty(Field),

    #[error("field `{field}` is not a valid ISO date: {reason}")]
    InvalidDate { field: Field, reason: String },
}

impl ValidationError {
    pub fn field(&self) -> Field {
        match self {
            ValidationError::Empty(field) => *field,
            ValidationError::InvalidDate { field, .. } => *field,
        }
    }
}
