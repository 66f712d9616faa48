//! In-memory audit sink, used by tests and demos.

use std::sync::Mutex;

use crate::domain::{AuditRecord, LedError, LedResult, StoredAuditRecord};
use crate::ports::AuditSink;

#[derive(Default)]
pub struct MemoryAuditLog {
    records: Mutex<Vec<StoredAuditRecord>>,
}

impl MemoryAuditLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything appended so far, in append order
    pub fn records(&self) -> Vec<StoredAuditRecord> {
        self.records
            .lock()
            .map(|r| r.clone())
            .unwrap_or_default()
    }
}

impl AuditSink for MemoryAuditLog {
    fn append(&self, record: &AuditRecord) -> LedResult<u64> {
        let mut records = self
            .records
            .lock()
            .map_err(|_| LedError::Audit("Audit log state corrupted".to_string()))?;
        let id = records.len() as u64 + 1;
        records.push(StoredAuditRecord {
            id,
            record: record.clone(),
        });
        Ok(id)
    }
}
