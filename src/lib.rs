//! LED controller over a serial link
//!
//! Exposes "turn on" / "turn off" over HTTP, writes the matching byte to
//! an Arduino-style microcontroller, and records every attempt in an
//! append-only audit log.
//!
//! ## Architecture (Hexagonal / Ports & Adapters)
//!
//! - `domain/` - Pure domain types, no I/O dependencies
//! - `ports/` - Trait definitions for serial I/O and the audit sink
//! - `channel` - Serial port lifecycle and serialized writes
//! - `dispatcher` - Command → byte → audit record
//! - `adapters/` - Implementations of ports (serialport, mock serial, audit logs, config file)
//! - `commands/` - Request handlers and the HTTP gateway (driving adapters)
//! - `state` - Startup wiring and shutdown

// Core domain (pure, no I/O)
pub mod domain;
pub mod ports;

// Core services
pub mod channel;
pub mod dispatcher;

// Adapters (external I/O)
pub mod adapters;

// Gateway integration
pub mod commands;
pub mod state;

use std::sync::Arc;

use adapters::jsonl_audit::JsonlAuditLog;
use adapters::mock_serial::MockSerialFactory;
use adapters::serial_port::SerialPortFactory;
use commands::gateway::Gateway;
use domain::{ControllerConfig, LedError, LedResult, SerialPortInfo};
use ports::SerialFactory;
use state::AppState;

/// The real serial factory, or the logging mock when LEDLINK_MOCK_SERIAL=1.
pub fn serial_factory(config: &ControllerConfig) -> Box<dyn SerialFactory> {
    if MockSerialFactory::enabled() {
        log::warn!("LEDLINK_MOCK_SERIAL set: no bytes will reach real hardware");
        Box::new(MockSerialFactory::new(config.serial_port.clone()))
    } else {
        Box::new(SerialPortFactory)
    }
}

pub fn list_serial_ports(config: &ControllerConfig) -> LedResult<Vec<SerialPortInfo>> {
    serial_factory(config).list_ports()
}

/// Open everything, serve until Ctrl-C, then tear down in reverse order.
pub fn run(config: ControllerConfig) -> LedResult<()> {
    config.validate()?;

    let audit = Arc::new(JsonlAuditLog::open(&config.audit_log_path)?);
    let factory = serial_factory(&config);
    let state = AppState::start(&config, factory.as_ref(), audit)?;

    // From here on `state` owns the open port; it is closed on every exit path.
    let result = serve(&config, &state);
    state.shutdown();
    result
}

fn serve(config: &ControllerConfig, state: &AppState) -> LedResult<()> {
    let (shutdown_tx, shutdown_rx) = crossbeam_channel::bounded::<()>(1);
    ctrlc::set_handler(move || {
        let _ = shutdown_tx.try_send(());
    })
    .map_err(|e| LedError::Gateway(format!("Failed to install Ctrl-C handler: {e}")))?;

    let gateway = Gateway::start(
        &config.bind_address,
        config.http_workers,
        state.dispatcher().clone(),
    )?;

    // A closed channel means the handler is gone; treat it like a signal.
    let _ = shutdown_rx.recv();
    log::info!("Shutdown requested");
    gateway.shutdown();
    Ok(())
}
