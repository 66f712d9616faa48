//! Channel Manager: owns the serial connection to the LED controller.
//!
//! A `Channel` is opened once at startup and closed once at shutdown.
//! `send` and `close` share a single mutex, so writes never interleave and
//! a `close` that races a `send` waits for it to finish.
//!
//! At most one live Channel may exist per port name in the process. The
//! name is claimed before the OS handle is opened and released when the
//! Channel closes (or when the open fails).

use std::collections::HashSet;
use std::sync::{Mutex, MutexGuard, OnceLock};
use std::time::Duration;

use crate::domain::{ChannelState, LedError, LedResult};
use crate::ports::{SerialConnection, SerialFactory};

pub struct Channel {
    port_name: String,
    baud_rate: u32,
    inner: Mutex<Option<OpenPort>>,
}

struct OpenPort {
    conn: Box<dyn SerialConnection>,
    _claim: PortClaim,
}

impl OpenPort {
    /// The one definition of "Open" shared by `state` and `send`.
    fn is_usable(&self) -> bool {
        self.conn.is_connected()
    }
}

impl Channel {
    /// Locate `port` among the factory's available ports and open it.
    pub fn open(
        factory: &dyn SerialFactory,
        port: &str,
        baud_rate: u32,
        timeout: Duration,
    ) -> LedResult<Self> {
        log::info!("Opening serial port {port} at {baud_rate} baud");

        if baud_rate == 0 {
            return Err(LedError::UnsupportedConfiguration(format!(
                "{port}: baud rate must be positive"
            )));
        }

        let available = factory.list_ports()?;
        if !available.iter().any(|p| p.name == port) {
            log::error!(
                "Serial port '{port}' not found (available: {}). Is the Arduino connected?",
                available
                    .iter()
                    .map(|p| p.name.as_str())
                    .collect::<Vec<_>>()
                    .join(", ")
            );
            return Err(LedError::PortNotFound(port.to_string()));
        }

        let claim = PortClaim::acquire(port)?;
        let conn = factory.open(port, baud_rate, timeout).map_err(|e| {
            log::error!("Failed to open serial port {port}: {e}");
            e
        })?;

        log::info!("Serial port {port} open at {baud_rate} baud (8-N-1)");
        Ok(Self {
            port_name: port.to_string(),
            baud_rate,
            inner: Mutex::new(Some(OpenPort {
                conn,
                _claim: claim,
            })),
        })
    }

    /// A channel on which open was never attempted. Every `send` fails
    /// with `NotOpen`.
    pub fn unopened(port: &str, baud_rate: u32) -> Self {
        Self {
            port_name: port.to_string(),
            baud_rate,
            inner: Mutex::new(None),
        }
    }

    pub fn baud_rate(&self) -> u32 {
        self.baud_rate
    }

    pub fn state(&self) -> ChannelState {
        match self.lock().as_ref() {
            Some(open) if open.is_usable() => ChannelState::Open,
            _ => ChannelState::Closed,
        }
    }

    /// Write one byte. Holds the channel lock for the whole write.
    pub fn send(&self, byte: u8) -> LedResult<()> {
        let mut guard = self.lock();
        let open = match guard.as_mut() {
            Some(open) if open.is_usable() => open,
            _ => {
                log::warn!(
                    "Attempted to send to {} but the port is not open",
                    self.port_name
                );
                return Err(LedError::NotOpen);
            }
        };

        match open.conn.write_byte(byte) {
            Ok(()) => {
                log::debug!(
                    "Sent '{}' (ASCII {byte}) to serial port {}",
                    byte as char,
                    self.port_name
                );
                Ok(())
            }
            Err(e) => {
                log::error!(
                    "Could not send '{}' (ASCII {byte}) to serial port {}: {e}",
                    byte as char,
                    self.port_name
                );
                Err(e)
            }
        }
    }

    /// Flush and release the port. Safe to call any number of times;
    /// failures are logged, never returned.
    pub fn close(&self) {
        let Some(mut open) = self.lock().take() else {
            log::warn!(
                "Close requested for serial port {} but it was not open",
                self.port_name
            );
            return;
        };

        match open.conn.close() {
            Ok(()) => log::info!("Serial port {} closed", self.port_name),
            Err(e) => log::error!("Error closing serial port {}: {e}", self.port_name),
        }
        // `open` drops here: OS handle and port claim are released.
    }

    /// A poisoned lock only means a writer panicked; the slot itself is
    /// still consistent, so recover it rather than wedge shutdown.
    fn lock(&self) -> MutexGuard<'_, Option<OpenPort>> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Drop for Channel {
    fn drop(&mut self) {
        let still_open = self
            .inner
            .get_mut()
            .map(|slot| slot.is_some())
            .unwrap_or_else(|poisoned| poisoned.into_inner().is_some());
        if still_open {
            self.close();
        }
    }
}

// ---------------------------------------------------------------------------
// Process-wide port registry
// ---------------------------------------------------------------------------

fn open_ports() -> &'static Mutex<HashSet<String>> {
    static OPEN_PORTS: OnceLock<Mutex<HashSet<String>>> = OnceLock::new();
    OPEN_PORTS.get_or_init(|| Mutex::new(HashSet::new()))
}

/// Exclusive claim on a port name, released on drop.
struct PortClaim {
    port: String,
}

impl PortClaim {
    fn acquire(port: &str) -> LedResult<Self> {
        let mut ports = open_ports()
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if !ports.insert(port.to_string()) {
            log::error!("Serial port {port} is already open in this process");
            return Err(LedError::PortInUse(format!(
                "{port} is already held by another channel in this process"
            )));
        }
        Ok(Self {
            port: port.to_string(),
        })
    }
}

impl Drop for PortClaim {
    fn drop(&mut self) {
        open_ports()
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .remove(&self.port);
    }
}
