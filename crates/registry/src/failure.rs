//! Structured failure envelope produced by invoked operations.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Failure reported by a business operation.
///
/// Opaque to the dispatch engine: it forwards the envelope without
/// interpreting the operation's internal taxonomy, except that `Internal`
/// is reported to callers as a generic system failure.
#[derive(Debug, Error, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum OperationFailure {
    /// Input failed the operation's own schema/shape validation.
    #[error("validation failed: {message}")]
    Validation {
        message: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        details: Option<Value>,
    },

    /// A business rule rejected the request.
    #[error("{code}: {message}")]
    Business { code: String, message: String },

    /// The operation hit an infrastructure problem of its own.
    #[error("internal failure: {message}")]
    Internal { message: String },
}

impl OperationFailure {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
            details: None,
        }
    }

    pub fn business(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Business {
            code: code.into(),
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    pub fn is_internal(&self) -> bool {
        matches!(self, Self::Internal { .. })
    }

    pub fn message(&self) -> &str {
        match self {
            Self::Validation { message, .. }
            | Self::Business { message, .. }
            | Self::Internal { message } => message,
        }
    }
}
