//! `txgate-dispatch` — the dispatch orchestrator.
//!
//! Sequences one incoming transaction request through
//! resolution → authorization → invocation → audit, and returns a
//! structured response to the transport layer. No unmapped or unauthorized
//! operation executes under any failure condition.

pub mod engine;
pub mod invoker;
pub mod response;

pub use engine::DispatchEngine;
pub use invoker::{InvokeError, OperationInvoker};
pub use response::DispatchResponse;
