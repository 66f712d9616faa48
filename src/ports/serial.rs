//! Serial port traits
//!
//! Split into two traits:
//! - `SerialFactory` — listing and opening ports
//! - `SerialConnection` — writing to an open port

use std::time::Duration;

use crate::domain::{LedResult, SerialPortInfo};

/// Factory for creating serial connections.
///
/// Takes `&self` so tests can hand the Channel Manager a factory that
/// reports a fixed port list.
pub trait SerialFactory {
    /// List available serial ports on the system
    fn list_ports(&self) -> LedResult<Vec<SerialPortInfo>>;

    /// Open a port at the given baud rate, configured 8-N-1
    fn open(
        &self,
        port: &str,
        baud_rate: u32,
        timeout: Duration,
    ) -> LedResult<Box<dyn SerialConnection>>;
}

/// Trait for an open serial port connection.
/// Only requires `Send` (not `Sync`) — always accessed behind a Mutex.
pub trait SerialConnection: Send {
    /// Write one byte and flush it to the device
    fn write_byte(&mut self, byte: u8) -> LedResult<()>;

    /// Flush and release the port
    fn close(&mut self) -> LedResult<()>;

    /// Check if the port is still connected
    fn is_connected(&self) -> bool;
}
