//! Process configuration
//!
//! Everything the controller needs at startup: which port to open, how
//! fast, where to listen and where the audit log lives.

use serde::{Deserialize, Serialize};

use super::{LedError, LedResult};

/// Controller settings. Missing JSON fields take the defaults below.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControllerConfig {
    /// Serial port name (e.g. "COM3", "/dev/ttyUSB0")
    pub serial_port: String,
    /// Serial baud rate
    pub baud_rate: u32,
    /// Timeout applied when opening the port
    pub open_timeout_ms: u64,
    /// HTTP listen address
    pub bind_address: String,
    /// Number of HTTP worker threads
    pub http_workers: usize,
    /// JSON-lines audit log file
    pub audit_log_path: String,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            serial_port: "/dev/ttyUSB0".to_string(),
            baud_rate: 9600,
            open_timeout_ms: 2000,
            bind_address: "0.0.0.0:8080".to_string(),
            http_workers: 4,
            audit_log_path: "ledlink-audit.jsonl".to_string(),
        }
    }
}

impl ControllerConfig {
    pub fn validate(&self) -> LedResult<()> {
        if self.serial_port.trim().is_empty() {
            return Err(LedError::Config("serial_port cannot be empty".to_string()));
        }
        if self.baud_rate == 0 {
            return Err(LedError::Config("baud_rate must be positive".to_string()));
        }
        if self.http_workers == 0 {
            return Err(LedError::Config("http_workers must be at least 1".to_string()));
        }
        if self.audit_log_path.trim().is_empty() {
            return Err(LedError::Config("audit_log_path cannot be empty".to_string()));
        }
        Ok(())
    }
}
