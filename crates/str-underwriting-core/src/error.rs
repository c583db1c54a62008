use thiserror::Error;

#[derive(Debug, Error)]
pub enum UnderwritingError {
    #[error("Validation error: {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("Division by zero in {context}")]
    DivisionByZero { context: String },

    #[error("Arithmetic overflow in {context}")]
    Overflow { context: String },

    #[error("Report assembly failed: missing {component}")]
    MissingComponent { component: String },

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl UnderwritingError {
    pub(crate) fn validation(field: impl Into<String>, reason: impl Into<String>) -> Self {
        UnderwritingError::Validation {
            field: field.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn overflow(context: impl Into<String>) -> Self {
        UnderwritingError::Overflow {
            context: context.into(),
        }
    }
}

impl From<serde_json::Error> for UnderwritingError {
    fn from(e: serde_json::Error) -> Self {
        UnderwritingError::Serialization(e.to_string())
    }
}
