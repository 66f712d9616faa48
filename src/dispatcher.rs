//! Command Dispatcher
//!
//! Turns a `Command` into one byte on the channel and exactly one audit
//! record. `dispatch` never fails: device errors come back as a message
//! for the caller and a `Failure` record for the log.

use std::sync::Arc;

use crate::channel::Channel;
use crate::domain::{AuditRecord, AuditStatus, Command};
use crate::ports::AuditSink;

/// Owns handles to the channel and the audit sink. Cheap to clone; every
/// gateway worker gets its own copy.
#[derive(Clone)]
pub struct Dispatcher {
    channel: Arc<Channel>,
    audit: Arc<dyn AuditSink>,
}

impl Dispatcher {
    pub fn new(channel: Arc<Channel>, audit: Arc<dyn AuditSink>) -> Self {
        Self { channel, audit }
    }

    pub fn channel(&self) -> &Channel {
        &self.channel
    }

    /// Send `command` once and record the attempt.
    pub fn dispatch(&self, command: Command) -> String {
        let (result, status, detail) = match self.channel.send(command.wire_byte()) {
            Ok(()) => {
                let result = command.success_message().to_string();
                log::info!("{result}");
                (result, AuditStatus::Success, command.success_detail())
            }
            Err(e) => {
                let result = command.failure_message(&e);
                log::error!("{result}");
                (result, AuditStatus::Failure, command.failure_detail(&e))
            }
        };

        let record = AuditRecord::new(command.label(), status, detail);
        match self.audit.append(&record) {
            Ok(id) => log::debug!("Audit record {id} written for '{}'", command.label()),
            Err(e) => log::error!("Could not persist audit record for '{}': {e}", command.label()),
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory_audit::MemoryAuditLog;
    use crate::domain::{LedError, LedResult};

    struct FailingSink;

    impl AuditSink for FailingSink {
        fn append(&self, _record: &AuditRecord) -> LedResult<u64> {
            Err(LedError::Audit("disk full".into()))
        }
    }

    #[test]
    fn unopened_channel_yields_one_failure_record_per_call() {
        let audit = Arc::new(MemoryAuditLog::new());
        let dispatcher = Dispatcher::new(
            Arc::new(Channel::unopened("dispatch-unopened", 9600)),
            audit.clone(),
        );

        let msg = dispatcher.dispatch(Command::TurnOn);
        assert!(msg.contains("ligar LED"));

        let records = audit.records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].record.status(), AuditStatus::Failure);
        assert!(records[0].record.message().starts_with("NotOpen"));
    }

    #[test]
    fn sink_failure_does_not_change_result() {
        let dispatcher = Dispatcher::new(
            Arc::new(Channel::unopened("dispatch-sink-fails", 9600)),
            Arc::new(FailingSink),
        );
        let msg = dispatcher.dispatch(Command::TurnOff);
        assert!(msg.starts_with("Erro ao desligar LED"));
    }
}
