//! Adapters: concrete implementations of the port traits.

pub mod config_file;
pub mod jsonl_audit;
pub mod memory_audit;
pub mod mock_serial;
pub mod serial_port;
