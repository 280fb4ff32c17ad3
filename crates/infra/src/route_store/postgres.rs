//! Postgres-backed route store.
//!
//! ## Error Mapping
//!
//! SQLx errors are mapped to `StoreError` as follows:
//!
//! | SQLx Error | StoreError | Scenario |
//! |------------|------------|----------|
//! | PoolClosed / PoolTimedOut / Io | `Unavailable` | Store unreachable |
//! | Database (any code) | `Query` | Statement failed |
//! | Row decode failure | `Query` | Unexpected column shape |
//! | Malformed object/method names | `Integrity` | Provisioning wrote bad data |

use sqlx::{PgPool, Row};
use std::sync::Arc;
use tracing::instrument;

use txgate_core::{StoreError, TransactionRoute, TxCode};
use txgate_routing::RouteStore;

use crate::sqlx_support::map_sqlx_error;

/// Reads the full route set from the `transaction_routes` table.
///
/// Schema (owned by provisioning tooling, not migrated here):
///
/// ```sql
/// CREATE TABLE transaction_routes (
///     tx          BIGINT PRIMARY KEY,
///     object_name TEXT NOT NULL,
///     method_name TEXT NOT NULL
/// );
/// ```
#[derive(Debug, Clone)]
pub struct PostgresRouteStore {
    pool: Arc<PgPool>,
}

impl PostgresRouteStore {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool: Arc::new(pool),
        }
    }
}

#[async_trait::async_trait]
impl RouteStore for PostgresRouteStore {
    #[instrument(skip(self), err)]
    async fn load_routes(&self) -> Result<Vec<TransactionRoute>, StoreError> {
        let rows = sqlx::query(
            r#"
            SELECT tx, object_name, method_name
            FROM transaction_routes
            ORDER BY tx ASC
            "#,
        )
        .fetch_all(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("load_routes", e))?;

        let mut routes = Vec::with_capacity(rows.len());
        for row in rows {
            let tx: i64 = row
                .try_get("tx")
                .map_err(|e| StoreError::query(format!("failed to read tx: {e}")))?;
            let object_name: String = row
                .try_get("object_name")
                .map_err(|e| StoreError::query(format!("failed to read object_name: {e}")))?;
            let method_name: String = row
                .try_get("method_name")
                .map_err(|e| StoreError::query(format!("failed to read method_name: {e}")))?;

            let route = TransactionRoute::new(TxCode::new(tx), object_name, method_name)
                .map_err(|e| StoreError::integrity(format!("route for tx {tx}: {e}")))?;
            routes.push(route);
        }

        Ok(routes)
    }
}
