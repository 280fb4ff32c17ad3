//! Shared sqlx error mapping.

use txgate_core::StoreError;

/// Map SQLx errors to `StoreError`.
///
/// Connectivity problems map to `Unavailable` so callers can tell a dead
/// store from a failed statement; everything else is a `Query` failure.
pub(crate) fn map_sqlx_error(operation: &str, err: sqlx::Error) -> StoreError {
    match err {
        sqlx::Error::PoolClosed => {
            StoreError::unavailable(format!("connection pool closed in {operation}"))
        }
        sqlx::Error::PoolTimedOut => {
            StoreError::unavailable(format!("connection pool timed out in {operation}"))
        }
        sqlx::Error::Io(e) => StoreError::unavailable(format!("io error in {operation}: {e}")),
        sqlx::Error::Database(db_err) => StoreError::query(format!(
            "database error in {operation}: {}",
            db_err.message()
        )),
        _ => StoreError::query(format!("sqlx error in {operation}: {err}")),
    }
}
