//! Domain error types

use thiserror::Error;

/// Errors that can occur while driving the LED controller.
///
/// The first five variants are the channel taxonomy: `PortNotFound`,
/// `PortInUse`, `UnsupportedConfiguration` and `Io` come out of
/// `Channel::open`; `NotOpen` and `Io` come out of `Channel::send`.
#[derive(Error, Debug)]
pub enum LedError {
    #[error("Serial port '{0}' not found")]
    PortNotFound(String),

    #[error("Serial port in use: {0}")]
    PortInUse(String),

    #[error("Unsupported serial configuration: {0}")]
    UnsupportedConfiguration(String),

    #[error("Serial I/O error: {0}")]
    Io(String),

    #[error("Serial port is not open for writing")]
    NotOpen,

    #[error("Audit log error: {0}")]
    Audit(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("HTTP gateway error: {0}")]
    Gateway(String),
}

impl LedError {
    /// Stable taxonomy name, written into audit detail text.
    pub fn kind(&self) -> &'static str {
        match self {
            LedError::PortNotFound(_) => "PortNotFound",
            LedError::PortInUse(_) => "PortInUse",
            LedError::UnsupportedConfiguration(_) => "UnsupportedConfiguration",
            LedError::Io(_) => "IOFailure",
            LedError::NotOpen => "NotOpen",
            LedError::Audit(_) => "AuditFailure",
            LedError::Config(_) => "ConfigError",
            LedError::Gateway(_) => "GatewayError",
        }
    }
}

/// Result type alias for controller operations
pub type LedResult<T> = Result<T, LedError>;
