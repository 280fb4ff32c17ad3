//! Infrastructure layer: store implementations for routes and permissions.
//!
//! In-memory variants back tests and development; Postgres variants back
//! production. Both honor the idempotency contracts of the ports they
//! implement.

pub mod permission_store;
pub mod route_store;
mod sqlx_support;

pub use permission_store::{InMemoryPermissionStore, PostgresPermissionStore};
pub use route_store::{InMemoryRouteStore, PostgresRouteStore};
