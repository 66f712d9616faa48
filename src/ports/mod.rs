//! Port traits (interfaces)
//!
//! These traits define the boundaries between the core and external I/O.
//! Adapters implement these traits to connect to real hardware and storage.

pub mod audit;
pub mod serial;

pub use audit::*;
pub use serial::*;
