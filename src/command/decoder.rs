//! # USB-Now Response Decoder
//!
//! Parses decoded SLIP payloads from the adapter into typed [`Response`]
//! values: command results, query replies, and unsolicited receive/send
//! events.

use super::protocol::*;
use crate::error::{NowLinkError, Result};

/// Decode a response or event frame
///
/// # Arguments
///
/// * `frame` - Complete decoded frame payload (first byte is the response code)
///
/// # Returns
///
/// * `Result<Response>` - Typed response, or error if invalid
///
/// # Errors
///
/// Returns error if:
/// - Frame is empty
/// - Response code is unknown
/// - Payload is too short for its response code
pub fn decode_response(frame: &[u8]) -> Result<Response> {
    let code = *frame.first().ok_or_else(|| {
        NowLinkError::Command("Empty response frame".to_string())
    })?;

    match code {
        RESP_OK => Ok(Response::Ok),

        // The adapter truncates its status code to one byte; older firmware
        // sends none at all
        RESP_ERROR => Ok(Response::Error {
            status: frame.get(1).copied().unwrap_or(0),
        }),

        RESP_VERSION => {
            let bytes = field(frame, 1, 4, "Version")?;
            Ok(Response::Version(u32::from_le_bytes([
                bytes[0], bytes[1], bytes[2], bytes[3],
            ])))
        }

        RESP_PEER => {
            let bytes = field(frame, 1, MAC_LEN + 2, "Peer")?;
            Ok(Response::Peer(PeerInfo {
                addr: mac_from(&bytes[..MAC_LEN]),
                channel: bytes[MAC_LEN],
                encrypt: bytes[MAC_LEN + 1] != 0,
            }))
        }

        RESP_PEER_ADDR => {
            let bytes = field(frame, 1, MAC_LEN, "PeerAddr")?;
            Ok(Response::PeerAddr(mac_from(bytes)))
        }

        RESP_PEER_EXIST => {
            let bytes = field(frame, 1, 1, "PeerExist")?;
            Ok(Response::PeerExist(bytes[0] != 0))
        }

        RESP_PEER_NUM => {
            let bytes = field(frame, 1, 2, "PeerNum")?;
            Ok(Response::PeerNum(PeerNum {
                total: bytes[0],
                encrypted: bytes[1],
            }))
        }

        RESP_RECV_CB => {
            let src = field(frame, 1, MAC_LEN, "RecvCb")?;
            Ok(Response::Received {
                src: mac_from(src),
                data: frame[1 + MAC_LEN..].to_vec(),
            })
        }

        RESP_SEND_CB => {
            let bytes = field(frame, 1, MAC_LEN + 1, "SendCb")?;
            Ok(Response::SendStatus {
                dst: mac_from(&bytes[..MAC_LEN]),
                // esp_now_send_status_t: 0 = success
                success: bytes[MAC_LEN] == 0,
            })
        }

        RESP_ERROR_LEN => Ok(Response::InvalidLength),
        RESP_ERROR_UNKNOWN => Ok(Response::UnknownCommand),

        other => Err(NowLinkError::Command(format!(
            "Unknown response code: 0x{:02X}",
            other
        ))),
    }
}

/// Extract a fixed-size field, erroring on truncation
fn field<'a>(frame: &'a [u8], offset: usize, len: usize, what: &str) -> Result<&'a [u8]> {
    frame.get(offset..offset + len).ok_or_else(|| {
        NowLinkError::Command(format!(
            "{} frame too short: {} bytes",
            what,
            frame.len()
        ))
    })
}

fn mac_from(bytes: &[u8]) -> MacAddr {
    let mut addr = [0u8; MAC_LEN];
    addr.copy_from_slice(&bytes[..MAC_LEN]);
    addr
}

#[cfg(test)]
mod tests {
    use super::*;

    const ADDR: MacAddr = [0x24, 0x6F, 0x28, 0xAA, 0xBB, 0xCC];

    #[test]
    fn test_decode_empty_frame() {
        assert!(decode_response(&[]).is_err());
    }

    #[test]
    fn test_decode_ok() {
        assert_eq!(decode_response(&[RESP_OK]).unwrap(), Response::Ok);
    }

    #[test]
    fn test_decode_error_with_and_without_status() {
        assert_eq!(
            decode_response(&[RESP_ERROR, 0x12]).unwrap(),
            Response::Error { status: 0x12 }
        );
        assert_eq!(
            decode_response(&[RESP_ERROR]).unwrap(),
            Response::Error { status: 0 }
        );
    }

    #[test]
    fn test_decode_version() {
        let frame = [RESP_VERSION, 0x02, 0x00, 0x00, 0x00];
        assert_eq!(decode_response(&frame).unwrap(), Response::Version(2));
    }

    #[test]
    fn test_decode_version_too_short() {
        assert!(decode_response(&[RESP_VERSION, 0x02]).is_err());
    }

    #[test]
    fn test_decode_peer() {
        let mut frame = vec![RESP_PEER];
        frame.extend_from_slice(&ADDR);
        frame.push(6); // channel
        frame.push(1); // encrypt

        assert_eq!(
            decode_response(&frame).unwrap(),
            Response::Peer(PeerInfo {
                addr: ADDR,
                channel: 6,
                encrypt: true,
            })
        );
    }

    #[test]
    fn test_decode_peer_addr() {
        let mut frame = vec![RESP_PEER_ADDR];
        frame.extend_from_slice(&ADDR);
        assert_eq!(decode_response(&frame).unwrap(), Response::PeerAddr(ADDR));
    }

    #[test]
    fn test_decode_peer_exist() {
        assert_eq!(
            decode_response(&[RESP_PEER_EXIST, 1]).unwrap(),
            Response::PeerExist(true)
        );
        assert_eq!(
            decode_response(&[RESP_PEER_EXIST, 0]).unwrap(),
            Response::PeerExist(false)
        );
    }

    #[test]
    fn test_decode_peer_num() {
        assert_eq!(
            decode_response(&[RESP_PEER_NUM, 5, 2]).unwrap(),
            Response::PeerNum(PeerNum {
                total: 5,
                encrypted: 2,
            })
        );
    }

    #[test]
    fn test_decode_received() {
        let mut frame = vec![RESP_RECV_CB];
        frame.extend_from_slice(&ADDR);
        frame.extend_from_slice(&[0xDE, 0xAD]);

        assert_eq!(
            decode_response(&frame).unwrap(),
            Response::Received {
                src: ADDR,
                data: vec![0xDE, 0xAD],
            }
        );
    }

    #[test]
    fn test_decode_received_empty_data() {
        let mut frame = vec![RESP_RECV_CB];
        frame.extend_from_slice(&ADDR);

        assert_eq!(
            decode_response(&frame).unwrap(),
            Response::Received {
                src: ADDR,
                data: vec![],
            }
        );
    }

    #[test]
    fn test_decode_send_status() {
        let mut frame = vec![RESP_SEND_CB];
        frame.extend_from_slice(&ADDR);
        frame.push(0);

        assert_eq!(
            decode_response(&frame).unwrap(),
            Response::SendStatus {
                dst: ADDR,
                success: true,
            }
        );

        *frame.last_mut().unwrap() = 1;
        assert_eq!(
            decode_response(&frame).unwrap(),
            Response::SendStatus {
                dst: ADDR,
                success: false,
            }
        );
    }

    #[test]
    fn test_decode_error_markers() {
        assert_eq!(
            decode_response(&[RESP_ERROR_LEN]).unwrap(),
            Response::InvalidLength
        );
        assert_eq!(
            decode_response(&[RESP_ERROR_UNKNOWN]).unwrap(),
            Response::UnknownCommand
        );
    }

    #[test]
    fn test_decode_unknown_code() {
        assert!(decode_response(&[0x7F]).is_err());
    }
}
