//! # USB-Now Command Protocol Module
//!
//! The command/response protocol spoken with the USB-Now adapter on top of
//! SLIP framing.
//!
//! This module handles:
//! - Command payload encoding (Init, Send, peer management, ...)
//! - Response and event frame decoding (Ok/Error, version, received packets)
//! - Protocol constants and peer types
//!
//! Every frame is dispatched on its first payload byte: commands from the
//! host, responses and unsolicited receive/send events from the adapter.

pub mod protocol;
pub mod encoder;
pub mod decoder;
