//! `txgate-core` — shared primitives for the dispatch engine.
//!
//! This crate contains **pure domain** types (no infrastructure concerns):
//! identifiers, the operation key value object, routes, the caller context,
//! and the error/result taxonomy shared by every other crate.

pub mod context;
pub mod error;
pub mod id;
pub mod operation;
pub mod route;

pub use context::CallerContext;
pub use error::{ResultCode, StoreError};
pub use id::{ProfileId, RequestId, TxCode, UserId};
pub use operation::{InvalidOperationKey, OperationKey};
pub use route::TransactionRoute;
