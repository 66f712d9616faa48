//! Audit sink port

use crate::domain::{AuditRecord, LedResult};

/// Append-only store for command attempts.
///
/// The core never reads, updates or deletes through this trait. Object
/// safe, shared as `Arc<dyn AuditSink>` across gateway workers.
pub trait AuditSink: Send + Sync {
    /// Persist one record and return the identity assigned to it
    fn append(&self, record: &AuditRecord) -> LedResult<u64>;
}
