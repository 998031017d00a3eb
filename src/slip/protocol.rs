//! # SLIP Protocol Constants
//!
//! Byte values and checksum definition for the USB-Now SLIP framing.
//!
//! **Delimiter**: 0xC0 terminates every frame
//! **Escape**: 0xDB, followed by 0xDC (stuffed delimiter) or 0xDD (stuffed escape)
//! **Checksum**: 32-bit wrapping sum of `(byte + 1)` over the unescaped payload

/// Frame delimiter byte (SLIP END)
pub const SLIP_END: u8 = 0xC0;

/// Escape byte (SLIP ESC)
pub const SLIP_ESC: u8 = 0xDB;

/// Escaped stand-in for the delimiter byte
pub const SLIP_ESC_END: u8 = 0xDC;

/// Escaped stand-in for the escape byte
pub const SLIP_ESC_ESC: u8 = 0xDD;

/// Size of the checksum trailer in unescaped bytes
pub const SLIP_CHECKSUM_SIZE: usize = 4;

/// Default decoder buffer capacity in bytes
///
/// Matches the USB-Now adapter's receive buffer, so a frame the adapter can
/// hold is never dropped on the host side.
pub const SLIP_DEFAULT_CAPACITY: usize = 2048;

/// Checksum over a complete payload
///
/// Each byte contributes `(byte + 1)`, summed modulo 2^32. The bias keeps an
/// all-zero payload from producing a zero checksum. Must match the incremental
/// accumulator in the encoder and decoder bit-for-bit.
///
/// # Arguments
///
/// * `payload` - Unescaped payload bytes
///
/// # Returns
///
/// * `u32` - Checksum value as transmitted in the frame trailer
pub fn frame_checksum(payload: &[u8]) -> u32 {
    payload
        .iter()
        .fold(0u32, |sum, &b| sum.wrapping_add(b as u32 + 1))
}
