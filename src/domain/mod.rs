//! Core domain types
//!
//! Pure types with no I/O dependencies: the LED command set, the audit
//! record, process configuration and the error taxonomy.

pub mod audit;
pub mod command;
pub mod config;
pub mod error;
pub mod types;

pub use audit::*;
pub use command::*;
pub use config::*;
pub use error::*;
pub use types::*;
