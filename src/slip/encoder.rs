//! # SLIP Stream Encoder
//!
//! Builds the wire representation of outgoing frames: byte-stuffed payload,
//! escaped little-endian checksum trailer, terminating delimiter.

use super::protocol::*;

/// Streaming SLIP frame encoder
///
/// One instance per stream direction. Wire bytes accumulate in an internal
/// output buffer; the transport drains it with [`take_wire`](Self::take_wire)
/// after [`end_frame`](Self::end_frame).
#[derive(Debug)]
pub struct SlipEncoder {
    /// Running checksum over the payload bytes of the current frame
    checksum: u32,

    /// Append a checksum trailer to each frame (must match the peer's setting)
    checksum_enabled: bool,

    /// Accumulated wire bytes
    out: Vec<u8>,
}

impl SlipEncoder {
    /// Create an encoder
    ///
    /// # Arguments
    ///
    /// * `checksum_enabled` - Whether frames carry a checksum trailer
    pub fn new(checksum_enabled: bool) -> Self {
        Self {
            checksum: 0,
            checksum_enabled,
            out: Vec::new(),
        }
    }

    /// Start a new outgoing frame
    ///
    /// Zeroes the per-frame checksum accumulator. [`end_frame`](Self::end_frame)
    /// also does this, so calling it before the first frame is optional.
    pub fn begin_frame(&mut self) {
        self.checksum = 0;
    }

    /// Encode one payload byte
    ///
    /// Adds `(byte + 1)` to the checksum accumulator — the exact mirror of the
    /// decoder's bias, which is the core correctness invariant of the protocol
    /// — then emits the byte, stuffed if it collides with a reserved value.
    pub fn push_byte(&mut self, byte: u8) {
        self.checksum = self.checksum.wrapping_add(byte as u32 + 1);

        match byte {
            SLIP_END => {
                self.out.push(SLIP_ESC);
                self.out.push(SLIP_ESC_END);
            }
            SLIP_ESC => {
                self.out.push(SLIP_ESC);
                self.out.push(SLIP_ESC_ESC);
            }
            _ => self.out.push(byte),
        }
    }

    /// Encode a run of payload bytes in order
    pub fn push_bytes(&mut self, bytes: &[u8]) {
        for &b in bytes {
            self.push_byte(b);
        }
    }

    /// Terminate the current frame
    ///
    /// Serializes the checksum accumulator little-endian through
    /// [`push_byte`](Self::push_byte), so the trailer is subject to the same
    /// stuffing as payload, then emits one raw delimiter and resets the
    /// accumulator for the next frame. A zero-length frame is legal and
    /// yields just the trailer (checksum of nothing = 0) and the delimiter.
    pub fn end_frame(&mut self) {
        if self.checksum_enabled {
            let sum = self.checksum;
            for b in sum.to_le_bytes() {
                self.push_byte(b);
            }
        }
        self.out.push(SLIP_END);
        self.checksum = 0;
    }

    /// View of the wire bytes accumulated so far
    pub fn wire(&self) -> &[u8] {
        &self.out
    }

    /// Drain the accumulated wire bytes
    pub fn take_wire(&mut self) -> Vec<u8> {
        std::mem::take(&mut self.out)
    }
}

/// Encode one payload into a complete wire frame
///
/// # Arguments
///
/// * `payload` - Unescaped payload bytes (zero-length is legal)
/// * `checksum_enabled` - Whether to append the checksum trailer
///
/// # Returns
///
/// * `Vec<u8>` - Wire bytes: stuffed payload, stuffed trailer, delimiter
///
/// # Examples
///
/// ```
/// use now_link::slip::encoder::encode_frame;
///
/// let wire = encode_frame(&[0x01, 0x02], true);
/// assert_eq!(*wire.last().unwrap(), 0xC0);
/// ```
pub fn encode_frame(payload: &[u8], checksum_enabled: bool) -> Vec<u8> {
    let mut encoder = SlipEncoder::new(checksum_enabled);
    encoder.begin_frame();
    encoder.push_bytes(payload);
    encoder.end_frame();
    encoder.take_wire()
}
