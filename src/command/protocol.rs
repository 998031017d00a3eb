//! # USB-Now Protocol Constants and Types
//!
//! Command and response codes understood by the USB-Now adapter firmware,
//! plus the peer types carried in their payloads.

/// Initialize ESP-NOW on the adapter
pub const CMD_INIT: u8 = 0x00;
/// Shut ESP-NOW down on the adapter
pub const CMD_DEINIT: u8 = 0x01;
/// Query the adapter's ESP-NOW version
pub const CMD_GET_VERSION: u8 = 0x02;
/// Transmit a packet to a peer
pub const CMD_SEND: u8 = 0x03;
/// Add a peer to the adapter's peer list
pub const CMD_ADD_PEER: u8 = 0x04;
/// Remove a peer from the peer list
pub const CMD_DEL_PEER: u8 = 0x05;
/// Modify an existing peer entry
pub const CMD_MOD_PEER: u8 = 0x06;
/// Configure the ESP-NOW PHY rate
pub const CMD_CONFIG_RATE: u8 = 0x07;
/// Look up a peer entry by MAC address
pub const CMD_GET_PEER: u8 = 0x08;
/// Walk the peer list from head or current position
pub const CMD_FETCH_PEER: u8 = 0x09;
/// Test whether a MAC address is a known peer
pub const CMD_IS_PEER_EXIST: u8 = 0x0A;
/// Count peers in the peer list
pub const CMD_GET_PEER_NUM: u8 = 0x0B;
/// Set the primary master key
pub const CMD_SET_PMK: u8 = 0x0C;
/// Set the wake window for power saving
pub const CMD_SET_WAKE_WINDOW: u8 = 0x0D;
/// Query the adapter's own MAC address
pub const CMD_GET_MAC: u8 = 0x0E;

/// Command completed successfully
pub const RESP_OK: u8 = 0x00;
/// Command failed; a status byte follows
pub const RESP_ERROR: u8 = 0x01;
/// ESP-NOW version number (u32 little-endian)
pub const RESP_VERSION: u8 = 0x02;
/// Peer entry: MAC, channel, encrypt flag
pub const RESP_PEER: u8 = 0x03;
/// Bare MAC address (reply to GetMac)
pub const RESP_PEER_ADDR: u8 = 0x04;
/// Peer existence flag
pub const RESP_PEER_EXIST: u8 = 0x05;
/// Peer counts: total, encrypted
pub const RESP_PEER_NUM: u8 = 0x06;
/// Unsolicited: packet received over the air
pub const RESP_RECV_CB: u8 = 0x07;
/// Unsolicited: transmit completion report
pub const RESP_SEND_CB: u8 = 0x08;
/// Command payload had an invalid length
pub const RESP_ERROR_LEN: u8 = 0x09;
/// Command byte not recognized by the adapter
pub const RESP_ERROR_UNKNOWN: u8 = 0x0A;

/// MAC address length in bytes
pub const MAC_LEN: usize = 6;

/// Maximum ESP-NOW packet payload
pub const ESP_NOW_MAX_DATA_LEN: usize = 250;

/// Primary master key length in bytes
pub const ESP_NOW_KEY_LEN: usize = 16;

/// Raw MAC address
pub type MacAddr = [u8; MAC_LEN];

/// Format a MAC address as `AA:BB:CC:DD:EE:FF`
pub fn format_mac(addr: &MacAddr) -> String {
    addr.iter()
        .map(|b| format!("{:02X}", b))
        .collect::<Vec<_>>()
        .join(":")
}

/// One entry in the adapter's peer list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PeerInfo {
    /// Peer MAC address
    pub addr: MacAddr,

    /// WiFi channel (0 = current channel)
    pub channel: u8,

    /// Whether traffic to this peer is encrypted
    pub encrypt: bool,
}

/// Peer list counts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PeerNum {
    /// Total number of peers
    pub total: u8,

    /// Number of encrypted peers
    pub encrypted: u8,
}

/// A decoded response or event frame from the adapter
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Response {
    /// Command completed successfully
    Ok,

    /// Command failed with an adapter-side status code
    Error { status: u8 },

    /// ESP-NOW version number
    Version(u32),

    /// Peer entry (reply to GetPeer / FetchPeer)
    Peer(PeerInfo),

    /// The adapter's own MAC address
    PeerAddr(MacAddr),

    /// Whether the queried MAC is a known peer
    PeerExist(bool),

    /// Peer list counts
    PeerNum(PeerNum),

    /// Packet received over the air
    Received { src: MacAddr, data: Vec<u8> },

    /// Transmit completion report for an earlier Send
    SendStatus { dst: MacAddr, success: bool },

    /// The adapter rejected a command payload's length
    InvalidLength,

    /// The adapter did not recognize the command byte
    UnknownCommand,
}
