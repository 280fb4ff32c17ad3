//! Transaction resolver.

use std::sync::{PoisonError, RwLock};

use tracing::info;

use txgate_core::{StoreError, TransactionRoute, TxCode};

use crate::store::RouteStore;
use crate::table::RouteTable;

/// Loads and queries the route table.
///
/// `load` replaces the table wholesale; there is no partial or incremental
/// load. `resolve` is a pure read on the hot path: no I/O, no mutation, and
/// a missing route is an expected outcome, not an error.
#[derive(Debug, Default)]
pub struct TransactionResolver {
    table: RwLock<RouteTable>,
}

impl TransactionResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load all routes from the store, replacing the current table.
    ///
    /// Returns the number of routes loaded. Callers must treat a failure as
    /// a startup abort condition: the engine must not accept traffic over an
    /// unloaded or partially loaded table.
    pub async fn load<S: RouteStore>(&self, store: &S) -> Result<usize, StoreError> {
        let routes = store.load_routes().await?;
        let table = RouteTable::from_routes(routes)?;
        let count = table.len();

        let mut current = self
            .table
            .write()
            .map_err(|_| StoreError::integrity("route table lock poisoned"))?;
        *current = table;

        info!(route_count = count, "route table loaded");
        Ok(count)
    }

    /// O(1) lookup. Never fails for a missing route.
    pub fn resolve(&self, tx: TxCode) -> Option<TransactionRoute> {
        self.table
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(tx)
            .cloned()
    }

    pub fn route_count(&self) -> usize {
        self.table
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Snapshot of the loaded routes, sorted by code.
    pub fn routes(&self) -> Vec<TransactionRoute> {
        self.table
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .routes()
    }
}
