//! Engine error and result-code taxonomy.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Failure of a persistent-store port (`RouteStore`, `PermissionStore`).
///
/// Store failures during `load()` are fatal to startup; store failures
/// during a single dispatch never leak internal detail to the caller.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The store could not be reached (connection refused, pool closed).
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// A query or statement failed.
    #[error("query failed: {0}")]
    Query(String),

    /// The store returned data that violates an engine invariant
    /// (duplicate transaction code, malformed operation name).
    #[error("integrity violation: {0}")]
    Integrity(String),
}

impl StoreError {
    pub fn unavailable(msg: impl Into<String>) -> Self {
        Self::Unavailable(msg.into())
    }

    pub fn query(msg: impl Into<String>) -> Self {
        Self::Query(msg.into())
    }

    pub fn integrity(msg: impl Into<String>) -> Self {
        Self::Integrity(msg.into())
    }
}

/// Terminal outcome of a dispatch, as reported to the transport layer.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResultCode {
    /// The operation ran and returned a success payload.
    Ok,
    /// The transaction code is not mapped. Deliberately indistinguishable
    /// from a disabled transaction.
    NotMapped,
    /// The route exists but the caller's profile holds no grant for it.
    Forbidden,
    /// The route references an object or method absent from the registry.
    UnknownOperation,
    /// The invoked operation reported a structured business failure.
    OperationFailed,
    /// Infrastructure failure; detail is logged, never returned.
    SystemError,
}

impl ResultCode {
    pub fn is_success(&self) -> bool {
        matches!(self, ResultCode::Ok)
    }
}
