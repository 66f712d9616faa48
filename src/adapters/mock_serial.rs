//! Mock serial adapter for development and testing without hardware.
//!
//! Activate by setting LEDLINK_MOCK_SERIAL=1 in the environment:
//!
//!   LEDLINK_MOCK_SERIAL=1 RUST_LOG=ledlink_lib=info cargo run
//!
//! The configured port is always reported as available, and every byte
//! is logged at INFO level so you can see exactly what the Arduino would
//! receive.

use std::time::Duration;

use crate::domain::{LedError, LedResult, SerialPortInfo};
use crate::ports::{SerialConnection, SerialFactory};

/// Environment switch read by `ledlink_lib::serial_factory`
pub const MOCK_SERIAL_ENV: &str = "LEDLINK_MOCK_SERIAL";

pub struct MockSerialFactory {
    port_name: String,
}

impl MockSerialFactory {
    pub fn new(port_name: impl Into<String>) -> Self {
        Self {
            port_name: port_name.into(),
        }
    }

    /// True when LEDLINK_MOCK_SERIAL is set to "1" or "true"
    pub fn enabled() -> bool {
        std::env::var(MOCK_SERIAL_ENV)
            .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
            .unwrap_or(false)
    }
}

impl SerialFactory for MockSerialFactory {
    fn list_ports(&self) -> LedResult<Vec<SerialPortInfo>> {
        Ok(vec![SerialPortInfo {
            name: self.port_name.clone(),
            port_type: "Mock".to_string(),
        }])
    }

    fn open(
        &self,
        port: &str,
        baud_rate: u32,
        _timeout: Duration,
    ) -> LedResult<Box<dyn SerialConnection>> {
        if port != self.port_name {
            return Err(LedError::PortNotFound(port.to_string()));
        }
        log::info!("[MOCK SERIAL] Opened {port} at {baud_rate} baud, 8-N-1");
        Ok(Box::new(MockSerialConnection {
            port: port.to_string(),
            connected: true,
        }))
    }
}

pub struct MockSerialConnection {
    port: String,
    connected: bool,
}

impl SerialConnection for MockSerialConnection {
    fn write_byte(&mut self, byte: u8) -> LedResult<()> {
        if !self.connected {
            return Err(LedError::NotOpen);
        }
        log::info!("[MOCK SERIAL] {} ← '{}' (0x{byte:02X})", self.port, byte as char);
        Ok(())
    }

    fn close(&mut self) -> LedResult<()> {
        self.connected = false;
        log::info!("[MOCK SERIAL] Closed {}", self.port);
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.connected
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lists_only_the_configured_port() {
        let factory = MockSerialFactory::new("COM9");
        let ports = factory.list_ports().unwrap();
        assert_eq!(ports.len(), 1);
        assert_eq!(ports[0].name, "COM9");
    }

    #[test]
    fn write_after_close_is_not_open() {
        let factory = MockSerialFactory::new("COM9");
        let mut conn = factory.open("COM9", 9600, Duration::from_millis(10)).unwrap();
        conn.write_byte(b'1').unwrap();
        conn.close().unwrap();
        assert!(matches!(conn.write_byte(b'1'), Err(LedError::NotOpen)));
    }
}
