//! Audit sinks.

use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;
use thiserror::Error;
use tracing::info;

use crate::record::AuditRecord;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("audit write failed: {0}")]
pub struct AuditError(pub String);

/// Destination for audit records.
///
/// Best-effort: the engine logs a failed write and moves on; a sink failure
/// must never change an already-determined response.
#[async_trait]
pub trait AuditSink: Send + Sync {
    async fn log(&self, record: AuditRecord) -> Result<(), AuditError>;
}

#[async_trait]
impl<S> AuditSink for Arc<S>
where
    S: AuditSink + ?Sized,
{
    async fn log(&self, record: AuditRecord) -> Result<(), AuditError> {
        (**self).log(record).await
    }
}

/// Records kept in memory. Intended for tests/dev.
#[derive(Debug, Default)]
pub struct InMemoryAuditSink {
    records: Mutex<Vec<AuditRecord>>,
}

impl InMemoryAuditSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> Vec<AuditRecord> {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn len(&self) -> usize {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl AuditSink for InMemoryAuditSink {
    async fn log(&self, record: AuditRecord) -> Result<(), AuditError> {
        self.records
            .lock()
            .map_err(|_| AuditError("audit buffer lock poisoned".to_string()))?
            .push(record);
        Ok(())
    }
}

/// Default production sink: every record becomes a structured log event.
///
/// Keeps the trail observable even when no persistent audit collaborator is
/// wired; durable fan-out belongs behind a real sink implementation.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingAuditSink;

#[async_trait]
impl AuditSink for TracingAuditSink {
    async fn log(&self, record: AuditRecord) -> Result<(), AuditError> {
        info!(
            target: "txgate::audit",
            request_id = %record.request_id,
            tx = %record.tx,
            action = record.action.as_str(),
            profile_id = record.profile_id.map(i64::from),
            user_id = record.user_id.map(i64::from),
            object = record.object_name.as_deref(),
            method = record.method_name.as_deref(),
            details = %record.details,
            "audit"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use txgate_core::{CallerContext, TransactionRoute, TxCode};

    use crate::record::AuditAction;

    use super::*;

    #[tokio::test]
    async fn in_memory_sink_captures_records() {
        let sink = InMemoryAuditSink::new();
        let ctx = CallerContext::anonymous();
        let route = TransactionRoute::new(TxCode::new(1001), "Users", "create").unwrap();

        sink.log(AuditRecord::for_route(&ctx, &route, AuditAction::Denied, "no grant"))
            .await
            .unwrap();

        let records = sink.records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].action, AuditAction::Denied);
    }
}
