//! Audit record model
//!
//! One `AuditRecord` per command attempt. Records are stamped when they
//! are built, not when the sink writes them, and are never mutated after.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Maximum length (in characters) of the persisted detail message
pub const MAX_DETAIL_LEN: usize = 500;

/// Outcome of a command attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AuditStatus {
    #[serde(rename = "SUCESSO")]
    Success,
    #[serde(rename = "FALHA")]
    Failure,
}

/// A single command attempt, as handed to an `AuditSink`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditRecord {
    action: String,
    timestamp: DateTime<Utc>,
    status: AuditStatus,
    message: String,
}

impl AuditRecord {
    /// Build a record stamped with the current time. `detail` is cut to
    /// `MAX_DETAIL_LEN` characters.
    pub fn new(action: impl Into<String>, status: AuditStatus, detail: impl Into<String>) -> Self {
        Self {
            action: action.into(),
            timestamp: Utc::now(),
            status,
            message: truncate_chars(detail.into(), MAX_DETAIL_LEN),
        }
    }

    pub fn action(&self) -> &str {
        &self.action
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn status(&self) -> AuditStatus {
        self.status
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// A record together with the identity the sink assigned to it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredAuditRecord {
    pub id: u64,
    #[serde(flatten)]
    pub record: AuditRecord,
}

fn truncate_chars(mut s: String, max: usize) -> String {
    if let Some((idx, _)) = s.char_indices().nth(max) {
        s.truncate(idx);
    }
    s
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn long_detail_is_truncated_to_limit() {
        let record = AuditRecord::new("Ligar LED", AuditStatus::Failure, "x".repeat(1200));
        assert_eq!(record.message().chars().count(), MAX_DETAIL_LEN);
    }

    #[test]
    fn truncation_respects_multibyte_characters() {
        // 'ç' is two bytes; slicing by byte index would panic mid-character.
        let record = AuditRecord::new("Ligar LED", AuditStatus::Failure, "ç".repeat(600));
        assert_eq!(record.message().chars().count(), MAX_DETAIL_LEN);
        assert!(record.message().chars().all(|c| c == 'ç'));
    }

    #[test]
    fn short_detail_is_kept_verbatim() {
        let record = AuditRecord::new("Desligar LED", AuditStatus::Success, "ok");
        assert_eq!(record.message(), "ok");
    }

    #[test]
    fn timestamp_is_taken_at_construction() {
        let before = Utc::now();
        let record = AuditRecord::new("Ligar LED", AuditStatus::Success, "ok");
        let after = Utc::now();
        assert!(record.timestamp() >= before && record.timestamp() <= after);
    }

    #[test]
    fn status_serializes_to_persisted_vocabulary() {
        let stored = StoredAuditRecord {
            id: 7,
            record: AuditRecord::new("Ligar LED", AuditStatus::Success, "ok"),
        };
        let json = serde_json::to_string(&stored).unwrap();
        assert!(json.contains("\"id\":7"));
        assert!(json.contains("\"status\":\"SUCESSO\""));
        assert!(json.contains("\"action\":\"Ligar LED\""));
    }
}
