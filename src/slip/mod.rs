//! # SLIP Framing Module
//!
//! SLIP-style framing for the USB-Now serial link.
//!
//! This module handles:
//! - Incremental frame decoding (one byte at a time, interrupt/poll friendly)
//! - Byte stuffing for delimiter transparency
//! - 32-bit additive checksum trailer generation and verification
//! - Overflow recovery and resynchronization on noisy links

pub mod protocol;
pub mod encoder;
pub mod decoder;
