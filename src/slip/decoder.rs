//! # SLIP Stream Decoder
//!
//! Incremental decoder for SLIP frames arriving one byte at a time.
//!
//! The decoder is a small state machine fed by [`SlipDecoder::push`]. It
//! unescapes stuffed bytes into a fixed-capacity buffer, detects the frame
//! delimiter, and verifies the 32-bit checksum trailer. All error handling is
//! silent and self-healing: corrupt or oversized frames are dropped and the
//! decoder resynchronizes on the next delimiter, since the serial link has no
//! return channel for framing errors.

use super::protocol::*;

/// Streaming SLIP frame decoder
///
/// One instance per stream direction. Holds at most one frame at a time; if a
/// completed frame has not been consumed when the next byte arrives, it is
/// dropped in favor of the new frame (drop-oldest policy — the poll loop must
/// never block the byte-arrival path).
#[derive(Debug)]
pub struct SlipDecoder {
    /// Fixed-capacity storage for unescaped bytes
    buf: Vec<u8>,

    /// Count of unescaped bytes currently held (trailer excluded once a
    /// frame completes)
    len: usize,

    /// Running checksum over the bytes counted in `len`
    checksum: u32,

    /// Previous raw byte was the escape byte, awaiting its successor
    esc_pending: bool,

    /// A complete frame is sitting in `buf`
    ready: bool,

    /// Capacity was exceeded since the last reset
    overflow: bool,

    /// Verify the 4-byte trailer (must match the peer's setting)
    checksum_enabled: bool,
}

impl SlipDecoder {
    /// Create a decoder with the given buffer capacity
    ///
    /// # Arguments
    ///
    /// * `capacity` - Maximum unescaped frame size in bytes (including the
    ///   4-byte trailer when checksum verification is enabled); must be > 0
    /// * `checksum_enabled` - Whether frames carry a checksum trailer
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero.
    pub fn new(capacity: usize, checksum_enabled: bool) -> Self {
        assert!(capacity > 0, "decoder capacity must be non-zero");

        Self {
            buf: vec![0u8; capacity],
            len: 0,
            checksum: 0,
            esc_pending: false,
            ready: false,
            overflow: false,
            checksum_enabled,
        }
    }

    /// Consume one byte of the physical stream
    ///
    /// Pure state update, never blocks and never returns an error. Safe to
    /// call from the tightest read loop.
    ///
    /// A byte arriving while an unconsumed frame is ready discards that frame
    /// first. A byte arriving with the buffer full discards the frame in
    /// progress and raises the overflow flag; classification still happens so
    /// the decoder realigns on the next delimiter.
    pub fn push(&mut self, byte: u8) {
        if self.ready {
            self.reset();
        }
        if self.len == self.buf.len() {
            self.reset();
            self.overflow = true;
        }

        if self.esc_pending {
            self.esc_pending = false;
            match byte {
                SLIP_ESC_END => self.append(SLIP_END),
                SLIP_ESC_ESC => self.append(SLIP_ESC),
                // Malformed escape sequence: drop the frame in progress and
                // the offending byte, realign on the next delimiter
                _ => self.reset(),
            }
        } else if byte == SLIP_ESC {
            self.esc_pending = true;
        } else if byte == SLIP_END {
            self.finish_frame();
        } else {
            self.append(byte);
        }
    }

    /// Whether a complete, validated frame is ready for consumption
    ///
    /// With checksum verification enabled, compares the running accumulator
    /// against the little-endian trailer transmitted with the frame. On
    /// mismatch the frame is discarded and the decoder reset — an expected
    /// event on a noisy link, not a fatal one. The caller sees only `false`.
    pub fn is_ready(&mut self) -> bool {
        if !self.ready {
            return false;
        }
        if !self.checksum_enabled {
            return true;
        }

        let trailer = [
            self.buf[self.len],
            self.buf[self.len + 1],
            self.buf[self.len + 2],
            self.buf[self.len + 3],
        ];
        let received = u32::from_le_bytes(trailer);

        if self.checksum == received {
            true
        } else {
            self.reset();
            false
        }
    }

    /// Length of the decoded payload in bytes
    ///
    /// Only meaningful once [`is_ready`](Self::is_ready) returns true; before
    /// that it counts the frame still being assembled.
    pub fn size(&self) -> usize {
        self.len
    }

    /// Read-only view of the decoded payload
    ///
    /// Only meaningful once [`is_ready`](Self::is_ready) returns true.
    pub fn payload(&self) -> &[u8] {
        &self.buf[..self.len]
    }

    /// Whether capacity was exceeded since the last reset
    pub fn overflowed(&self) -> bool {
        self.overflow
    }

    /// Configured buffer capacity in bytes
    pub fn capacity(&self) -> usize {
        self.buf.len()
    }

    /// Return the decoder to its freshly-constructed state
    ///
    /// Buffer contents are not zeroed; `len` bounds all reads.
    pub fn reset(&mut self) {
        self.len = 0;
        self.checksum = 0;
        self.ready = false;
        self.esc_pending = false;
        self.overflow = false;
    }

    /// Append one unescaped byte and accumulate its biased checksum
    fn append(&mut self, byte: u8) {
        self.buf[self.len] = byte;
        self.len += 1;
        self.checksum = self.checksum.wrapping_add(byte as u32 + 1);
    }

    /// Handle the frame delimiter
    ///
    /// With checksum enabled the last 4 buffered bytes are the trailer: they
    /// are backed out of the accumulator and reserved past `len` for
    /// comparison in `is_ready`. A frame too short to carry a trailer cannot
    /// be valid and is discarded, which also makes stray delimiters between
    /// frames harmless.
    fn finish_frame(&mut self) {
        if self.checksum_enabled {
            if self.len < SLIP_CHECKSUM_SIZE {
                self.reset();
                return;
            }
            for i in self.len - SLIP_CHECKSUM_SIZE..self.len {
                self.checksum = self.checksum.wrapping_sub(self.buf[i] as u32 + 1);
            }
            self.len -= SLIP_CHECKSUM_SIZE;
        }
        self.ready = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::slip::encoder::encode_frame;

    fn feed(decoder: &mut SlipDecoder, wire: &[u8]) {
        for &b in wire {
            decoder.push(b);
        }
    }

    #[test]
    fn test_decode_known_frame() {
        // Payload [01 C0 DB 02], checksum 418 = 0x000001A2 little-endian
        let wire = [
            0x01, 0xDB, 0xDC, 0xDB, 0xDD, 0x02, 0xA2, 0x01, 0x00, 0x00, 0xC0,
        ];

        let mut decoder = SlipDecoder::new(64, true);
        feed(&mut decoder, &wire);

        assert!(decoder.is_ready());
        assert_eq!(decoder.size(), 4);
        assert_eq!(decoder.payload(), &[0x01, 0xC0, 0xDB, 0x02]);
    }

    #[test]
    fn test_decode_zero_length_frame() {
        let mut decoder = SlipDecoder::new(64, true);
        feed(&mut decoder, &[0x00, 0x00, 0x00, 0x00, 0xC0]);

        assert!(decoder.is_ready());
        assert_eq!(decoder.size(), 0);
        assert_eq!(decoder.payload(), &[] as &[u8]);
    }

    #[test]
    fn test_round_trip() {
        let payloads: &[&[u8]] = &[
            &[],
            &[0x00],
            &[0xC0],
            &[0xDB],
            &[0xC0, 0xDB, 0xDC, 0xDD],
            &[0x01, 0x02, 0x03, 0x04, 0x05],
            &[0xFF; 32],
        ];

        for payload in payloads {
            let wire = encode_frame(payload, true);
            let mut decoder = SlipDecoder::new(64, true);
            feed(&mut decoder, &wire);

            assert!(decoder.is_ready(), "payload {:02X?} did not decode", payload);
            assert_eq!(decoder.payload(), *payload);
        }
    }

    #[test]
    fn test_checksum_mismatch_discards_frame() {
        let mut wire = encode_frame(&[0x10, 0x20, 0x30], true);
        wire[1] ^= 0x01; // corrupt a payload byte

        let mut decoder = SlipDecoder::new(64, true);
        feed(&mut decoder, &wire);
        assert!(!decoder.is_ready());

        // Decoder is reset and immediately usable again
        assert_eq!(decoder.size(), 0);
        feed(&mut decoder, &encode_frame(&[0x10, 0x20, 0x30], true));
        assert!(decoder.is_ready());
        assert_eq!(decoder.payload(), &[0x10, 0x20, 0x30]);
    }

    #[test]
    fn test_corrupt_trailer_discards_frame() {
        let mut wire = encode_frame(&[0xAA, 0xBB], true);
        let trailer_start = wire.len() - 5; // last byte is the delimiter
        wire[trailer_start] ^= 0x80;

        let mut decoder = SlipDecoder::new(64, true);
        feed(&mut decoder, &wire);
        assert!(!decoder.is_ready());
    }

    #[test]
    fn test_overflow_never_writes_past_capacity() {
        let mut decoder = SlipDecoder::new(8, true);

        for _ in 0..100 {
            decoder.push(0x42);
        }
        assert!(decoder.overflowed());
        assert!(decoder.size() <= decoder.capacity());
    }

    #[test]
    fn test_recovers_after_overflow() {
        let mut decoder = SlipDecoder::new(8, true);

        // Oversized garbage run, then the delimiter that ends the ruined frame
        for _ in 0..20 {
            decoder.push(0x42);
        }
        assert!(decoder.overflowed());
        decoder.push(SLIP_END);
        assert!(!decoder.is_ready());

        // Next well-formed frame decodes normally
        feed(&mut decoder, &encode_frame(&[0x01, 0x02], true));
        assert!(decoder.is_ready());
        assert_eq!(decoder.payload(), &[0x01, 0x02]);
    }

    #[test]
    fn test_stale_ready_frame_is_dropped() {
        let mut decoder = SlipDecoder::new(64, true);

        feed(&mut decoder, &encode_frame(&[0x0A], true));
        assert!(decoder.is_ready());

        // Consumer stalled: next frame arrives before the first was read
        feed(&mut decoder, &encode_frame(&[0x0B, 0x0C], true));
        assert!(decoder.is_ready());
        assert_eq!(decoder.payload(), &[0x0B, 0x0C]);
    }

    #[test]
    fn test_malformed_escape_discards_frame() {
        let mut decoder = SlipDecoder::new(64, true);

        decoder.push(0x01);
        decoder.push(SLIP_ESC);
        decoder.push(0x41); // neither ESC_END nor ESC_ESC
        assert_eq!(decoder.size(), 0);

        // Stream realigns on the next frame
        feed(&mut decoder, &encode_frame(&[0x07], true));
        assert!(decoder.is_ready());
        assert_eq!(decoder.payload(), &[0x07]);
    }

    #[test]
    fn test_short_frame_with_checksum_is_discarded() {
        let mut decoder = SlipDecoder::new(64, true);

        // Fewer than 4 bytes before the delimiter cannot carry a trailer
        feed(&mut decoder, &[0x01, 0x02, 0xC0]);
        assert!(!decoder.is_ready());
        assert_eq!(decoder.size(), 0);
    }

    #[test]
    fn test_stray_delimiters_between_frames() {
        let mut decoder = SlipDecoder::new(64, true);

        feed(&mut decoder, &[0xC0, 0xC0]);
        assert!(!decoder.is_ready());

        feed(&mut decoder, &encode_frame(&[0x33], true));
        assert!(decoder.is_ready());
        assert_eq!(decoder.payload(), &[0x33]);
    }

    #[test]
    fn test_reset_mid_escape() {
        let mut decoder = SlipDecoder::new(64, true);

        decoder.push(0x05);
        decoder.push(SLIP_ESC);
        decoder.reset();
        decoder.reset(); // idempotent

        feed(&mut decoder, &encode_frame(&[0xC0, 0xC0], true));
        assert!(decoder.is_ready());
        assert_eq!(decoder.payload(), &[0xC0, 0xC0]);
    }

    #[test]
    fn test_checksum_disabled() {
        // Without a trailer the frame is just the stuffed payload
        let wire = [0x01, 0xDB, 0xDC, 0x02, 0xC0];

        let mut decoder = SlipDecoder::new(64, false);
        feed(&mut decoder, &wire);

        assert!(decoder.is_ready());
        assert!(decoder.is_ready()); // no validation side effect
        assert_eq!(decoder.payload(), &[0x01, 0xC0, 0x02]);
    }

    #[test]
    fn test_is_ready_repeats_after_validation() {
        let mut decoder = SlipDecoder::new(64, true);
        feed(&mut decoder, &encode_frame(&[0x55], true));

        assert!(decoder.is_ready());
        assert!(decoder.is_ready());
        assert_eq!(decoder.payload(), &[0x55]);
    }

    #[test]
    #[should_panic(expected = "capacity")]
    fn test_zero_capacity_rejected() {
        let _ = SlipDecoder::new(0, true);
    }
}
