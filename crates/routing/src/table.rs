//! In-memory route table.

use std::collections::HashMap;

use txgate_core::{StoreError, TransactionRoute, TxCode};

/// Map from transaction code to its route.
///
/// Built wholesale from a loaded route set; never mutated incrementally.
#[derive(Debug, Default, Clone)]
pub struct RouteTable {
    routes: HashMap<TxCode, TransactionRoute>,
}

impl RouteTable {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a table from a full load, rejecting duplicate codes.
    ///
    /// A duplicate `tx` means the authoritative store is inconsistent; the
    /// table must not guess which route wins.
    pub fn from_routes(
        routes: impl IntoIterator<Item = TransactionRoute>,
    ) -> Result<Self, StoreError> {
        let mut table = HashMap::new();
        for route in routes {
            let tx = route.tx;
            if table.insert(tx, route).is_some() {
                return Err(StoreError::integrity(format!(
                    "duplicate transaction code {tx} in loaded route set"
                )));
            }
        }
        Ok(Self { routes: table })
    }

    pub fn get(&self, tx: TxCode) -> Option<&TransactionRoute> {
        self.routes.get(&tx)
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Snapshot of all routes, sorted by code (inspection/ops tooling).
    pub fn routes(&self) -> Vec<TransactionRoute> {
        let mut all: Vec<_> = self.routes.values().cloned().collect();
        all.sort_by_key(|r| r.tx);
        all
    }
}
