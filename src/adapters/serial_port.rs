//! Serial port adapter using the `serialport` crate
//!
//! Implements `SerialFactory` and `SerialConnection` traits.
//! `SerialPortFactory` carries no state; it only lists and opens ports.

use std::io::Write;
use std::time::Duration;

use serialport::{DataBits, FlowControl, Parity, SerialPort, StopBits};

use crate::domain::{LedError, LedResult, SerialPortInfo};
use crate::ports::{SerialConnection, SerialFactory};

/// Zero-sized factory for creating serial port connections.
pub struct SerialPortFactory;

impl SerialFactory for SerialPortFactory {
    fn list_ports(&self) -> LedResult<Vec<SerialPortInfo>> {
        let ports = serialport::available_ports()
            .map_err(|e| LedError::Io(format!("Failed to list ports: {e}")))?;

        Ok(ports
            .into_iter()
            .map(|p| {
                let port_type = match &p.port_type {
                    serialport::SerialPortType::UsbPort(info) => {
                        format!("USB ({:04X}:{:04X})", info.vid, info.pid)
                    }
                    serialport::SerialPortType::PciPort => "PCI".to_string(),
                    serialport::SerialPortType::BluetoothPort => "Bluetooth".to_string(),
                    serialport::SerialPortType::Unknown => "Native".to_string(),
                };
                SerialPortInfo {
                    name: p.port_name,
                    port_type,
                }
            })
            .collect())
    }

    fn open(
        &self,
        port: &str,
        baud_rate: u32,
        timeout: Duration,
    ) -> LedResult<Box<dyn SerialConnection>> {
        let mut serial = serialport::new(port, baud_rate)
            .timeout(timeout)
            .open()
            .map_err(|e| classify_open_error(port, e))?;

        // On failure `serial` drops here and the OS handle is released.
        configure_8n1(serial.as_mut()).map_err(|e| {
            LedError::UnsupportedConfiguration(format!(
                "{port} at {baud_rate} baud (8-N-1): {e}"
            ))
        })?;

        Ok(Box::new(SerialPortConnection {
            port: Some(serial),
            name: port.to_string(),
        }))
    }
}

fn configure_8n1(serial: &mut dyn SerialPort) -> serialport::Result<()> {
    serial.set_data_bits(DataBits::Eight)?;
    serial.set_stop_bits(StopBits::One)?;
    serial.set_parity(Parity::None)?;
    serial.set_flow_control(FlowControl::None)?;
    Ok(())
}

/// Map an open failure on a port we already saw listed.
fn classify_open_error(port: &str, e: serialport::Error) -> LedError {
    use std::io::ErrorKind as Io;
    use serialport::ErrorKind;

    match e.kind() {
        ErrorKind::NoDevice => LedError::PortInUse(format!("{port}: {e}")),
        ErrorKind::Io(Io::PermissionDenied | Io::AddrInUse | Io::WouldBlock) => {
            LedError::PortInUse(format!("{port}: {e}"))
        }
        ErrorKind::InvalidInput => {
            LedError::UnsupportedConfiguration(format!("{port}: {e}"))
        }
        _ => LedError::Io(format!("Failed to open {port}: {e}")),
    }
}

/// An open serial port connection wrapping the `serialport` crate.
pub struct SerialPortConnection {
    port: Option<Box<dyn SerialPort>>,
    name: String,
}

impl SerialConnection for SerialPortConnection {
    fn write_byte(&mut self, byte: u8) -> LedResult<()> {
        let port = self.port.as_mut().ok_or(LedError::NotOpen)?;
        port.write_all(&[byte])
            .and_then(|()| port.flush())
            .map_err(|e| LedError::Io(format!("Write to {} failed: {e}", self.name)))
    }

    fn close(&mut self) -> LedResult<()> {
        let Some(mut port) = self.port.take() else {
            return Ok(());
        };
        // The handle is released when `port` drops, even if the flush fails.
        port.flush()
            .map_err(|e| LedError::Io(format!("Flush of {} on close failed: {e}", self.name)))
    }

    fn is_connected(&self) -> bool {
        self.port.is_some()
    }
}
