//! # Error Types
//!
//! Custom error types for Now Link using `thiserror`.

use thiserror::Error;

/// Main error type for Now Link
#[derive(Debug, Error)]
pub enum NowLinkError {
    /// Adapter command/response protocol errors
    #[error("Command protocol error: {0}")]
    Command(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] toml::de::Error),

    /// Serial port errors
    #[error("Serial error: {0}")]
    Serial(String),

    /// No usable serial device among the candidate paths
    #[error("No USB-Now adapter found (tried: {0})")]
    SerialPortNotFound(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for Now Link
pub type Result<T> = std::result::Result<T, NowLinkError>;
