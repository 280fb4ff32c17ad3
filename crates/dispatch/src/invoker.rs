//! Operation invoker.

use std::sync::Arc;

use serde_json::Value;
use thiserror::Error;

use txgate_core::{CallerContext, OperationKey};
use txgate_registry::{OperationFailure, OperationRegistry};

/// Resolution failure: the route named something the registry does not
/// expose. An internal inconsistency, distinct from an unmapped code.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InvokeError {
    #[error("unknown object '{0}'")]
    UnknownObject(String),

    #[error("method '{method}' is not invokable on object '{object}'")]
    UnknownMethod { object: String, method: String },
}

/// Resolves an operation key against the registry and invokes it.
///
/// Defense in depth behind the authorization check: a route may reference
/// an object removed from the registry, and a grant string may name a
/// method that was never registered as invokable. Neither executes. The
/// invoker performs no business logic; the handler's result is forwarded
/// unmodified.
pub struct OperationInvoker {
    registry: Arc<dyn OperationRegistry>,
}

impl OperationInvoker {
    pub fn new(registry: Arc<dyn OperationRegistry>) -> Self {
        Self { registry }
    }

    /// Outer `Err` is a resolution failure (nothing ran); the inner result
    /// is whatever the operation itself produced.
    pub async fn invoke(
        &self,
        key: &OperationKey,
        params: Value,
        ctx: &CallerContext,
    ) -> Result<Result<Value, OperationFailure>, InvokeError> {
        let object = self
            .registry
            .resolve(key.object())
            .ok_or_else(|| InvokeError::UnknownObject(key.object().to_string()))?;

        let handler = object
            .method(key.method())
            .ok_or_else(|| InvokeError::UnknownMethod {
                object: key.object().to_string(),
                method: key.method().to_string(),
            })?;

        Ok(handler.invoke(params, ctx).await)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use serde_json::json;

    use txgate_registry::{FnHandler, StaticRegistry};

    use super::*;

    fn registry() -> Arc<dyn OperationRegistry> {
        Arc::new(
            StaticRegistry::builder()
                .register(
                    "Users",
                    "create",
                    Arc::new(FnHandler::new(|params: Value| async move {
                        Ok(json!({ "created": params }))
                    })),
                )
                .build(),
        )
    }

    fn key(s: &str) -> OperationKey {
        OperationKey::parse(s).unwrap()
    }

    #[tokio::test]
    async fn invokes_registered_operation() {
        let invoker = OperationInvoker::new(registry());
        let ctx = CallerContext::anonymous();

        let result = invoker
            .invoke(&key("Users.create"), json!({ "name": "alice" }), &ctx)
            .await
            .unwrap()
            .unwrap();

        assert_eq!(result, json!({ "created": { "name": "alice" } }));
    }

    #[tokio::test]
    async fn unknown_object_is_a_resolution_failure() {
        let invoker = OperationInvoker::new(registry());
        let ctx = CallerContext::anonymous();

        let err = invoker
            .invoke(&key("Ghost.create"), json!({}), &ctx)
            .await
            .unwrap_err();
        assert_eq!(err, InvokeError::UnknownObject("Ghost".to_string()));
    }

    #[tokio::test]
    async fn unregistered_method_is_unreachable() {
        let invoker = OperationInvoker::new(registry());
        let ctx = CallerContext::anonymous();

        let err = invoker
            .invoke(&key("Users.drop_all"), json!({}), &ctx)
            .await
            .unwrap_err();
        assert!(matches!(err, InvokeError::UnknownMethod { .. }));
    }

    #[tokio::test]
    async fn operation_failure_is_forwarded_not_raised() {
        let calls = Arc::new(AtomicUsize::new(0));
        let calls_in_handler = Arc::clone(&calls);

        let registry: Arc<dyn OperationRegistry> = Arc::new(
            StaticRegistry::builder()
                .register(
                    "Users",
                    "create",
                    Arc::new(FnHandler::new(move |_: Value| {
                        let calls = Arc::clone(&calls_in_handler);
                        async move {
                            calls.fetch_add(1, Ordering::SeqCst);
                            Err(OperationFailure::validation("email is required"))
                        }
                    })),
                )
                .build(),
        );

        let invoker = OperationInvoker::new(registry);
        let ctx = CallerContext::anonymous();

        let failure = invoker
            .invoke(&key("Users.create"), json!({}), &ctx)
            .await
            .unwrap()
            .unwrap_err();

        assert_eq!(failure, OperationFailure::validation("email is required"));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
