//! # Now Link
//!
//! Talk to ESP-NOW radios from your PC through a USB-Now serial adapter.
//!
//! This application drives a USB-Now adapter (an ESP32 acting as a
//! USB-to-ESP-NOW bridge) over a SLIP-framed serial link.
//!
//! # Control Flow
//!
//! 1. **Initialization**
//!    - Set up logging with tracing subscriber
//!    - Load configuration (path given as the first argument, else defaults)
//!    - Open the serial connection, retrying until an adapter appears
//!    - Initialize ESP-NOW on the adapter and log its version and MAC
//!
//! 2. **Monitor Loop**
//!    - Log packets received over the air and delivery confirmations
//!    - Handle Ctrl+C for graceful shutdown
//!
//! 3. **Graceful Shutdown**
//!    - Deinitialize ESP-NOW on the adapter (best effort)
//!    - Log total packet count

use anyhow::Result;
use tokio::time::{sleep, timeout, Duration};
use tracing::{debug, info, warn};
use tracing_subscriber;

mod config;
mod error;
mod slip;
mod command;
mod serial;

use command::decoder::decode_response;
use command::encoder;
use command::protocol::{format_mac, Response};
use config::Config;
use error::NowLinkError;
use serial::port_trait::SerialPortIO;
use serial::AdapterSerial;

/// Number of received packets between summary log messages
const LOG_INTERVAL_PACKETS: u64 = 100;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into())
        )
        .init();

    info!("Now Link v{} starting...", env!("CARGO_PKG_VERSION"));

    let config = match std::env::args().nth(1) {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };

    let mut adapter = tokio::select! {
        adapter = open_with_retry(&config) => adapter?,
        _ = tokio::signal::ctrl_c() => {
            info!("Received Ctrl+C, shutting down...");
            return Ok(());
        }
    };

    bring_up(&mut adapter, &config).await?;

    info!("Monitoring ESP-NOW traffic on {}", adapter.device_path());
    info!("Press Ctrl+C to exit");

    let mut packet_count: u64 = 0;

    // Main monitor loop
    loop {
        tokio::select! {
            frame = adapter.recv_frame() => {
                match decode_response(&frame?) {
                    Ok(Response::Received { src, data }) => {
                        packet_count += 1;
                        info!("Received {} bytes from {}", data.len(), format_mac(&src));

                        if packet_count % LOG_INTERVAL_PACKETS == 0 {
                            info!("{} packets received so far", packet_count);
                        }
                    }
                    Ok(Response::SendStatus { dst, success }) => {
                        if success {
                            debug!("Delivery to {} confirmed", format_mac(&dst));
                        } else {
                            warn!("Delivery to {} failed", format_mac(&dst));
                        }
                    }
                    Ok(other) => debug!("Ignoring response: {:?}", other),
                    Err(e) => warn!("Dropping unparseable frame: {}", e),
                }
            }

            // Handle Ctrl+C for graceful shutdown
            _ = tokio::signal::ctrl_c() => {
                info!("Received Ctrl+C, shutting down...");
                break;
            }
        }
    }

    // Best effort: leave the adapter's radio deinitialized
    if let Err(e) = adapter.send_frame(&encoder::encode_deinit()).await {
        debug!("Failed to send deinit: {}", e);
    }
    info!("Total packets received: {}", packet_count);

    Ok(())
}

/// Open the adapter, retrying until one shows up
///
/// The adapter may be plugged in after the program starts; keep probing at
/// the configured reconnect interval.
async fn open_with_retry(config: &Config) -> Result<AdapterSerial> {
    loop {
        match AdapterSerial::open(config) {
            Ok(adapter) => return Ok(adapter),
            Err(e) => {
                warn!("No USB-Now adapter yet ({}), retrying...", e);
                sleep(Duration::from_millis(config.serial.reconnect_interval_ms)).await;
            }
        }
    }
}

/// Initialize ESP-NOW on the adapter and log its identity
async fn bring_up<P: SerialPortIO>(
    adapter: &mut AdapterSerial<P>,
    config: &Config,
) -> Result<()> {
    adapter.send_frame(&encoder::encode_init()).await?;
    await_ok(adapter, config).await?;
    info!("ESP-NOW initialized");

    adapter.send_frame(&encoder::encode_get_version()).await?;
    for response in await_ok(adapter, config).await? {
        if let Response::Version(version) = response {
            info!("Adapter ESP-NOW version: {}", version);
        }
    }

    adapter.send_frame(&encoder::encode_get_mac()).await?;
    for response in await_ok(adapter, config).await? {
        if let Response::PeerAddr(addr) = response {
            info!("Adapter MAC address: {}", format_mac(&addr));
        }
    }

    Ok(())
}

/// Collect response frames until the adapter acknowledges the last command
///
/// Query replies (version, peer info, ...) arrive before the Ok that closes
/// the exchange; they are returned for the caller to pick through.
async fn await_ok<P: SerialPortIO>(
    adapter: &mut AdapterSerial<P>,
    config: &Config,
) -> Result<Vec<Response>> {
    let deadline = Duration::from_millis(config.serial.timeout_ms);
    let mut responses = Vec::new();

    loop {
        let frame = timeout(deadline, adapter.recv_frame())
            .await
            .map_err(|_| {
                NowLinkError::Command("Timed out waiting for adapter response".to_string())
            })??;

        match decode_response(&frame)? {
            Response::Ok => return Ok(responses),
            Response::Error { status } => {
                return Err(NowLinkError::Command(format!(
                    "Adapter reported error status {}",
                    status
                ))
                .into());
            }
            Response::InvalidLength => {
                return Err(
                    NowLinkError::Command("Adapter rejected command length".to_string()).into(),
                );
            }
            Response::UnknownCommand => {
                return Err(NowLinkError::Command(
                    "Adapter did not recognize command".to_string(),
                )
                .into());
            }
            other => responses.push(other),
        }
    }
}
