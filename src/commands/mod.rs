//! Driving adapters: the LED request handlers and the HTTP server that
//! exposes them.

pub mod gateway;
pub mod led;
