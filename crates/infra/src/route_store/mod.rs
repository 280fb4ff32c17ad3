//! Route store implementations.

mod in_memory;
mod postgres;

pub use in_memory::InMemoryRouteStore;
pub use postgres::PostgresRouteStore;
