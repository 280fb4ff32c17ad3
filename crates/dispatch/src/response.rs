//! Response envelope returned to the transport layer.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use txgate_core::ResultCode;
use txgate_registry::OperationFailure;

/// Structured outcome of one dispatch.
///
/// `NotMapped` and `SystemError` messages are deliberately generic: an
/// unmapped code reads the same as a disabled one, and infrastructure
/// detail stays in the log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DispatchResponse {
    pub result_code: ResultCode,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl DispatchResponse {
    pub fn ok(data: Value) -> Self {
        Self {
            result_code: ResultCode::Ok,
            message: "ok".to_string(),
            data: Some(data),
        }
    }

    pub fn not_mapped() -> Self {
        Self {
            result_code: ResultCode::NotMapped,
            message: "transaction does not exist".to_string(),
            data: None,
        }
    }

    pub fn forbidden() -> Self {
        Self {
            result_code: ResultCode::Forbidden,
            message: "not authorized for this transaction".to_string(),
            data: None,
        }
    }

    pub fn unknown_operation() -> Self {
        Self {
            result_code: ResultCode::UnknownOperation,
            message: "operation is not available".to_string(),
            data: None,
        }
    }

    /// Forward a business failure envelope verbatim.
    pub fn operation_failed(failure: &OperationFailure) -> Self {
        Self {
            result_code: ResultCode::OperationFailed,
            message: failure.message().to_string(),
            data: serde_json::to_value(failure).ok(),
        }
    }

    pub fn system_error() -> Self {
        Self {
            result_code: ResultCode::SystemError,
            message: "internal error".to_string(),
            data: None,
        }
    }
}
