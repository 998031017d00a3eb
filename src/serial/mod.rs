//! # Serial Communication Module
//!
//! Handles serial communication with the USB-Now adapter.
//!
//! This module handles:
//! - Opening the serial port at 115,200 baud
//! - Auto-detecting the adapter across candidate device paths
//! - Framing outgoing command payloads through the SLIP encoder
//! - Pumping incoming bytes through the SLIP decoder until a frame validates

pub mod port_trait;

use crate::config::Config;
use crate::error::{NowLinkError, Result};
use crate::slip::decoder::SlipDecoder;
use crate::slip::encoder::SlipEncoder;
use bytes::{Buf, BytesMut};
use port_trait::{SerialPortIO, TokioSerialPort};
use tokio_serial::SerialPortBuilderExt;
use tracing::{debug, info, warn};

/// USB-Now serial baud rate
pub const USB_NOW_BAUD_RATE: u32 = 115_200;

/// Default adapter device paths to try (in order of preference)
const DEFAULT_DEVICE_PATHS: &[&str] = &[
    "/dev/ttyACM0", // USB CDC devices (most common for ESP32 boards)
    "/dev/ttyUSB0", // USB-to-serial adapters
];

/// Bytes requested from the port per read call
const READ_CHUNK_SIZE: usize = 256;

/// USB-Now adapter serial link
///
/// Owns the port and one SLIP encoder/decoder pair — one frame buffer per
/// direction, matching the adapter's single-frame-in-flight protocol.
pub struct AdapterSerial<P: SerialPortIO = TokioSerialPort> {
    /// Serial port handle
    port: P,
    /// Device path (e.g., /dev/ttyACM0)
    device_path: String,
    /// Incoming frame assembly
    decoder: SlipDecoder,
    /// Outgoing frame construction
    encoder: SlipEncoder,
    /// Raw bytes read from the port, not yet pushed through the decoder
    read_buf: BytesMut,
}

impl<P: SerialPortIO> std::fmt::Debug for AdapterSerial<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdapterSerial")
            .field("device_path", &self.device_path)
            .finish_non_exhaustive()
    }
}

impl AdapterSerial<TokioSerialPort> {
    /// Open the connection to the USB-Now adapter
    ///
    /// Tries the configured port first, then the common device paths.
    ///
    /// # Errors
    ///
    /// Returns error if no adapter is found or the port cannot be configured
    pub fn open(config: &Config) -> Result<Self> {
        let mut paths = vec![config.serial.port.as_str()];
        for path in DEFAULT_DEVICE_PATHS {
            if *path != config.serial.port {
                paths.push(path);
            }
        }
        Self::open_with_paths(&paths, config)
    }

    /// Open the connection trying each device path in order
    ///
    /// # Arguments
    ///
    /// * `paths` - Device paths to try (e.g., &["/dev/ttyACM0"])
    /// * `config` - Baud rate and link settings
    pub fn open_with_paths(paths: &[&str], config: &Config) -> Result<Self> {
        for path in paths {
            debug!("Trying to open serial port: {}", path);

            match Self::open_port(path, config.serial.baud_rate) {
                Ok(port) => {
                    info!("Successfully opened USB-Now adapter at {}", path);
                    return Ok(Self::with_port(
                        TokioSerialPort::new(port),
                        path,
                        config.link.buffer_capacity,
                        config.link.checksum,
                    ));
                }
                Err(e) => {
                    warn!("Failed to open {}: {}", path, e);
                    continue;
                }
            }
        }

        Err(NowLinkError::SerialPortNotFound(paths.join(", ")))
    }

    /// Open a specific serial port with USB-Now settings (8N1, no flow control)
    fn open_port(path: &str, baud_rate: u32) -> Result<tokio_serial::SerialStream> {
        let port = tokio_serial::new(path, baud_rate)
            .data_bits(tokio_serial::DataBits::Eight)
            .parity(tokio_serial::Parity::None)
            .stop_bits(tokio_serial::StopBits::One)
            .flow_control(tokio_serial::FlowControl::None)
            .open_native_async()
            .map_err(|e| NowLinkError::Serial(format!("Failed to open {}: {}", path, e)))?;

        Ok(port)
    }
}

impl<P: SerialPortIO> AdapterSerial<P> {
    /// Wrap an already-open port
    ///
    /// # Arguments
    ///
    /// * `port` - Open port implementing [`SerialPortIO`]
    /// * `device_path` - Path the port was opened at, for logging
    /// * `capacity` - Decoder buffer capacity in bytes
    /// * `checksum` - Whether frames carry a checksum trailer
    pub fn with_port(port: P, device_path: &str, capacity: usize, checksum: bool) -> Self {
        Self {
            port,
            device_path: device_path.to_string(),
            decoder: SlipDecoder::new(capacity, checksum),
            encoder: SlipEncoder::new(checksum),
            read_buf: BytesMut::with_capacity(READ_CHUNK_SIZE),
        }
    }

    /// Send one frame to the adapter
    ///
    /// # Arguments
    ///
    /// * `payload` - Unframed payload bytes (e.g., an encoded command)
    pub async fn send_frame(&mut self, payload: &[u8]) -> Result<()> {
        self.encoder.begin_frame();
        self.encoder.push_bytes(payload);
        self.encoder.end_frame();
        let wire = self.encoder.take_wire();

        self.port
            .write_all(&wire)
            .await
            .map_err(|e| NowLinkError::Serial(format!("Failed to write frame: {}", e)))?;

        self.port
            .flush()
            .await
            .map_err(|e| NowLinkError::Serial(format!("Failed to flush serial port: {}", e)))?;

        debug!("Sent frame ({} payload bytes, {} on wire)", payload.len(), wire.len());
        Ok(())
    }

    /// Receive the next validated frame from the adapter
    ///
    /// Pumps raw bytes through the SLIP decoder until a frame passes checksum
    /// validation. Corrupt and oversized frames are dropped silently by the
    /// decoder; this only returns an error when the port itself fails.
    pub async fn recv_frame(&mut self) -> Result<Vec<u8>> {
        loop {
            while !self.read_buf.is_empty() {
                self.decoder.push(self.read_buf.get_u8());
                if self.decoder.is_ready() {
                    let frame = self.decoder.payload().to_vec();
                    self.decoder.reset();
                    debug!("Received frame ({} bytes)", frame.len());
                    return Ok(frame);
                }
            }

            let mut chunk = [0u8; READ_CHUNK_SIZE];
            let n = self
                .port
                .read(&mut chunk)
                .await
                .map_err(|e| NowLinkError::Serial(format!("Failed to read from port: {}", e)))?;
            if n == 0 {
                return Err(NowLinkError::Serial("Serial port closed".to_string()));
            }
            self.read_buf.extend_from_slice(&chunk[..n]);
        }
    }

    /// Whether the decoder hit its capacity limit since the last frame
    pub fn overflowed(&self) -> bool {
        self.decoder.overflowed()
    }

    /// Get the device path of the opened serial port
    pub fn device_path(&self) -> &str {
        &self.device_path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::slip::encoder::encode_frame;
    use super::port_trait::mocks::MockSerialPort;

    fn mock_adapter(port: MockSerialPort) -> AdapterSerial<MockSerialPort> {
        AdapterSerial::with_port(port, "/dev/mock0", 2048, true)
    }

    #[test]
    fn test_constants() {
        assert_eq!(USB_NOW_BAUD_RATE, 115_200);
        assert_eq!(DEFAULT_DEVICE_PATHS[0], "/dev/ttyACM0");
        assert_eq!(DEFAULT_DEVICE_PATHS[1], "/dev/ttyUSB0");
    }

    #[test]
    fn test_open_with_invalid_paths_returns_error() {
        let config = Config::default();
        let invalid_paths = &["/dev/nonexistent0", "/dev/nonexistent1"];
        let result = AdapterSerial::open_with_paths(invalid_paths, &config);

        assert!(result.is_err());
        match result.unwrap_err() {
            NowLinkError::SerialPortNotFound(msg) => {
                assert!(msg.contains("/dev/nonexistent0"));
                assert!(msg.contains("/dev/nonexistent1"));
            }
            other => panic!("Expected SerialPortNotFound, got: {:?}", other),
        }
    }

    #[test]
    fn test_open_with_empty_paths_returns_error() {
        let config = Config::default();
        let result = AdapterSerial::open_with_paths(&[], &config);

        assert!(matches!(
            result,
            Err(NowLinkError::SerialPortNotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_send_frame_writes_wire_bytes() {
        let port = MockSerialPort::new();
        let mut adapter = mock_adapter(port.clone());

        adapter.send_frame(&[0x01, 0xC0, 0xDB, 0x02]).await.unwrap();

        let written = port.get_written_data();
        assert_eq!(written.len(), 1);
        assert_eq!(written[0], encode_frame(&[0x01, 0xC0, 0xDB, 0x02], true));
    }

    #[tokio::test]
    async fn test_send_frame_write_error() {
        let port = MockSerialPort::new();
        port.set_write_error(std::io::ErrorKind::BrokenPipe);
        let mut adapter = mock_adapter(port);

        let result = adapter.send_frame(&[0x00]).await;
        assert!(matches!(result, Err(NowLinkError::Serial(_))));
    }

    #[tokio::test]
    async fn test_recv_frame_across_chunks() {
        let port = MockSerialPort::new();
        let wire = encode_frame(&[0x0A, 0x0B, 0x0C], true);
        let (first, rest) = wire.split_at(2);
        port.script_read(first);
        port.script_read(rest);

        let mut adapter = mock_adapter(port);
        let frame = adapter.recv_frame().await.unwrap();
        assert_eq!(frame, vec![0x0A, 0x0B, 0x0C]);
    }

    #[tokio::test]
    async fn test_recv_frame_back_to_back_frames_in_one_chunk() {
        let port = MockSerialPort::new();
        let mut chunk = encode_frame(&[0x01], true);
        chunk.extend_from_slice(&encode_frame(&[0x02, 0x03], true));
        port.script_read(&chunk);

        let mut adapter = mock_adapter(port);
        assert_eq!(adapter.recv_frame().await.unwrap(), vec![0x01]);
        assert_eq!(adapter.recv_frame().await.unwrap(), vec![0x02, 0x03]);
    }

    #[tokio::test]
    async fn test_recv_frame_skips_corrupt_frame() {
        let port = MockSerialPort::new();
        let mut corrupt = encode_frame(&[0x11, 0x22], true);
        corrupt[0] ^= 0xFF;
        port.script_read(&corrupt);
        port.script_read(&encode_frame(&[0x33], true));

        let mut adapter = mock_adapter(port);
        assert_eq!(adapter.recv_frame().await.unwrap(), vec![0x33]);
    }

    #[tokio::test]
    async fn test_recv_frame_port_closed() {
        let port = MockSerialPort::new();
        let mut adapter = mock_adapter(port);

        let result = adapter.recv_frame().await;
        assert!(matches!(result, Err(NowLinkError::Serial(_))));
    }

    #[test]
    fn test_device_path() {
        let adapter = mock_adapter(MockSerialPort::new());
        assert_eq!(adapter.device_path(), "/dev/mock0");
    }
}
