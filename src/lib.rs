//! # Now Link Library
//!
//! Talk to ESP-NOW radios from your PC through a USB-Now serial adapter.
//!
//! This library provides the core functionality for driving a USB-Now adapter
//! (an ESP32 acting as a USB-to-ESP-NOW bridge): SLIP framing over the serial
//! link and the adapter's command/response protocol on top of it.

pub mod config;
pub mod error;
pub mod slip;
pub mod command;
pub mod serial;
