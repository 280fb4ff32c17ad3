//! `txgate-audit` — audit trail records and sinks.
//!
//! One record is attempted per dispatch, whatever the outcome. Records are
//! append-only and write-once; persistence beyond the sink interface
//! belongs to collaborators.

pub mod record;
pub mod sink;

pub use record::{AuditAction, AuditRecord};
pub use sink::{AuditError, AuditSink, InMemoryAuditSink, TracingAuditSink};
