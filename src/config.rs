//! # Configuration Module
//!
//! Handles loading and validating configuration from TOML files.

use serde::Deserialize;
use serde::de::Error;
use std::fs;
use std::path::Path;

use crate::error::Result;

/// Main configuration structure
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    #[serde(default)]
    pub serial: SerialConfig,

    #[serde(default)]
    pub link: LinkConfig,
}

/// Serial port configuration
#[derive(Debug, Deserialize, Clone)]
pub struct SerialConfig {
    #[serde(default = "default_serial_port")]
    pub port: String,

    #[serde(default = "default_baud_rate")]
    pub baud_rate: u32,

    /// How long to wait for the adapter's Ok/Error after a command
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    #[serde(default = "default_reconnect_interval_ms")]
    pub reconnect_interval_ms: u64,
}

/// SLIP link configuration
///
/// Both sides must agree on the checksum setting out-of-band; there is no
/// in-band negotiation.
#[derive(Debug, Deserialize, Clone)]
pub struct LinkConfig {
    /// Decoder buffer capacity in bytes
    #[serde(default = "default_buffer_capacity")]
    pub buffer_capacity: usize,

    /// Whether frames carry a 32-bit checksum trailer
    #[serde(default = "default_checksum")]
    pub checksum: bool,
}

// Default value functions
fn default_serial_port() -> String { "/dev/ttyACM0".to_string() }
fn default_baud_rate() -> u32 { 115200 }
fn default_timeout_ms() -> u64 { 1000 }
fn default_reconnect_interval_ms() -> u64 { 1000 }

fn default_buffer_capacity() -> usize { 2048 }
fn default_checksum() -> bool { true }

impl Default for SerialConfig {
    fn default() -> Self {
        Self {
            port: default_serial_port(),
            baud_rate: default_baud_rate(),
            timeout_ms: default_timeout_ms(),
            reconnect_interval_ms: default_reconnect_interval_ms(),
        }
    }
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            buffer_capacity: default_buffer_capacity(),
            checksum: default_checksum(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            serial: SerialConfig::default(),
            link: LinkConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the configuration file
    ///
    /// # Returns
    ///
    /// * `Result<Config>` - Loaded and validated configuration
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - File cannot be read
    /// - TOML parsing fails
    /// - Validation fails
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values
    ///
    /// # Errors
    ///
    /// Returns error if any configuration value is out of valid range
    pub fn validate(&self) -> Result<()> {
        if self.serial.port.is_empty() {
            return Err(crate::error::NowLinkError::Config(
                toml::de::Error::custom("serial port cannot be empty")
            ));
        }

        if ![9600, 19200, 38400, 57600, 115200, 230400, 460800, 921600]
            .contains(&self.serial.baud_rate)
        {
            return Err(crate::error::NowLinkError::Config(
                toml::de::Error::custom(
                    "baud_rate must be one of: 9600, 19200, 38400, 57600, 115200, 230400, 460800, 921600"
                )
            ));
        }

        if self.serial.timeout_ms == 0 || self.serial.timeout_ms > 10000 {
            return Err(crate::error::NowLinkError::Config(
                toml::de::Error::custom("timeout_ms must be between 1 and 10000")
            ));
        }

        if self.serial.reconnect_interval_ms == 0 || self.serial.reconnect_interval_ms > 60000 {
            return Err(crate::error::NowLinkError::Config(
                toml::de::Error::custom("reconnect_interval_ms must be between 1 and 60000")
            ));
        }

        // Must hold at least the checksum trailer plus a command byte; the
        // adapter's own buffer bounds the upper end
        if self.link.buffer_capacity < 8 || self.link.buffer_capacity > 65536 {
            return Err(crate::error::NowLinkError::Config(
                toml::de::Error::custom("buffer_capacity must be between 8 and 65536")
            ));
        }

        Ok(())
    }
}
