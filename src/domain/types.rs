//! Shared value types

use serde::{Deserialize, Serialize};

/// Information about a serial port
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SerialPortInfo {
    pub name: String,
    pub port_type: String,
}

/// Lifecycle state of a [`crate::channel::Channel`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelState {
    Open,
    Closed,
}
