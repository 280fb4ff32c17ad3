//! `txgate-registry` — the callable surface of the system.
//!
//! Business operations register here by name. Resolution is a
//! capability-checked lookup over an allow-list built at construction time:
//! nothing that was not explicitly registered is reachable, whatever a
//! permission grant string happens to say.

pub mod failure;
pub mod handler;
pub mod registry;

pub use failure::OperationFailure;
pub use handler::{FnHandler, OperationHandler};
pub use registry::{ObjectHandle, OperationRegistry, RegistryBuilder, StaticRegistry};
