//! Operation handler trait.

use std::future::Future;

use async_trait::async_trait;
use serde_json::Value;

use txgate_core::CallerContext;

use crate::failure::OperationFailure;

/// A single invokable business operation.
///
/// Handlers own their input validation and all side effects; the engine
/// forwards the parameter bag and the result untouched.
#[async_trait]
pub trait OperationHandler: Send + Sync {
    async fn invoke(&self, params: Value, ctx: &CallerContext) -> Result<Value, OperationFailure>;
}

/// Adapter turning an async closure into an [`OperationHandler`].
///
/// Mostly for tests and small compositions; real operations implement the
/// trait on their own types.
pub struct FnHandler<F>(F);

impl<F> FnHandler<F> {
    pub fn new(f: F) -> Self {
        Self(f)
    }
}

#[async_trait]
impl<F, Fut> OperationHandler for FnHandler<F>
where
    F: Fn(Value) -> Fut + Send + Sync,
    Fut: Future<Output = Result<Value, OperationFailure>> + Send,
{
    async fn invoke(&self, params: Value, _ctx: &CallerContext) -> Result<Value, OperationFailure> {
        (self.0)(params).await
    }
}
