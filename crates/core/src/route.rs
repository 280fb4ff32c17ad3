//! Transaction routes.

use serde::{Deserialize, Serialize};

use crate::id::TxCode;
use crate::operation::{InvalidOperationKey, OperationKey};

/// Mapping from a transaction code to the operation it invokes.
///
/// Routes are created by provisioning tooling and are read-only to the
/// engine after load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionRoute {
    pub tx: TxCode,
    pub operation: OperationKey,
}

impl TransactionRoute {
    /// Build a route from raw stored names, validating the operation key.
    pub fn new(
        tx: TxCode,
        object_name: impl Into<String>,
        method_name: impl Into<String>,
    ) -> Result<Self, InvalidOperationKey> {
        Ok(Self {
            tx,
            operation: OperationKey::new(object_name, method_name)?,
        })
    }

    pub fn object_name(&self) -> &str {
        self.operation.object()
    }

    pub fn method_name(&self) -> &str {
        self.operation.method()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exposes_stored_names() {
        let route = TransactionRoute::new(TxCode::new(1001), "Users", "create").unwrap();
        assert_eq!(route.object_name(), "Users");
        assert_eq!(route.method_name(), "create");
    }

    #[test]
    fn rejects_malformed_names() {
        assert!(TransactionRoute::new(TxCode::new(1), "", "create").is_err());
        assert!(TransactionRoute::new(TxCode::new(1), "Users.create", "run").is_err());
    }
}
