//! Error types for flatrec

use thiserror::Error;

/// Errors that can occur while serializing or rebuilding a record
#[derive(Error, Debug)]
pub enum FlatError {
    #[error("Unsupported value shape for member `{member}`: {reason}")]
    UnsupportedValueShape { member: String, reason: String },

    #[error("Malformed wire text: {0}")]
    MalformedWireText(String),

    #[error("No constructor found for `{type_name}` matching ({signature}) and no default constructor")]
    ConstructorNotFound { type_name: String, signature: String },

    #[error("Constructor for `{type_name}` rejected its arguments")]
    ConstructorFailed { type_name: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON conversion error: {0}")]
    JsonError(#[from] serde_json::Error),
}

impl FlatError {
    pub(crate) fn shape(member: impl Into<String>, reason: impl Into<String>) -> Self {
        FlatError::UnsupportedValueShape {
            member: member.into(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, FlatError>;
