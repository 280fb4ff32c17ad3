//! In-memory route store.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use async_trait::async_trait;

use txgate_core::{StoreError, TransactionRoute, TxCode};
use txgate_routing::RouteStore;

/// Route storage held in memory.
///
/// Intended for tests/dev; provisioning is a plain insert. The load path
/// returns whatever is seeded, including duplicates a buggy seed may
/// produce (the resolver is responsible for rejecting those).
#[derive(Debug, Default)]
pub struct InMemoryRouteStore {
    routes: RwLock<HashMap<TxCode, TransactionRoute>>,
}

impl InMemoryRouteStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_routes(routes: impl IntoIterator<Item = TransactionRoute>) -> Self {
        let store = Self::new();
        for route in routes {
            store.insert(route);
        }
        store
    }

    pub fn insert(&self, route: TransactionRoute) {
        self.routes
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(route.tx, route);
    }

    pub fn remove(&self, tx: TxCode) {
        self.routes
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&tx);
    }
}

#[async_trait]
impl RouteStore for InMemoryRouteStore {
    async fn load_routes(&self) -> Result<Vec<TransactionRoute>, StoreError> {
        let routes = self
            .routes
            .read()
            .map_err(|_| StoreError::unavailable("route store lock poisoned"))?;
        Ok(routes.values().cloned().collect())
    }
}
