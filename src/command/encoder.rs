//! # USB-Now Command Encoder
//!
//! Builds the unframed command payloads sent to the adapter. The SLIP layer
//! wraps each payload in escaping, checksum trailer, and delimiter.

use super::protocol::*;
use crate::error::{NowLinkError, Result};

/// Initialize ESP-NOW on the adapter
pub fn encode_init() -> Vec<u8> {
    vec![CMD_INIT]
}

/// Shut ESP-NOW down on the adapter
pub fn encode_deinit() -> Vec<u8> {
    vec![CMD_DEINIT]
}

/// Query the adapter's ESP-NOW version
pub fn encode_get_version() -> Vec<u8> {
    vec![CMD_GET_VERSION]
}

/// Transmit a packet to a peer
///
/// # Arguments
///
/// * `peer` - Destination MAC address (must already be in the peer list)
/// * `data` - Packet payload, at most [`ESP_NOW_MAX_DATA_LEN`] bytes
///
/// # Errors
///
/// Returns an error if `data` exceeds the ESP-NOW packet limit.
pub fn encode_send(peer: &MacAddr, data: &[u8]) -> Result<Vec<u8>> {
    if data.len() > ESP_NOW_MAX_DATA_LEN {
        return Err(NowLinkError::Command(format!(
            "Send payload of {} bytes exceeds maximum {}",
            data.len(),
            ESP_NOW_MAX_DATA_LEN
        )));
    }

    let mut payload = Vec::with_capacity(1 + MAC_LEN + data.len());
    payload.push(CMD_SEND);
    payload.extend_from_slice(peer);
    payload.extend_from_slice(data);
    Ok(payload)
}

/// Add a peer to the adapter's peer list
pub fn encode_add_peer(peer: &PeerInfo) -> Vec<u8> {
    encode_peer_entry(CMD_ADD_PEER, peer)
}

/// Modify an existing peer entry
pub fn encode_mod_peer(peer: &PeerInfo) -> Vec<u8> {
    encode_peer_entry(CMD_MOD_PEER, peer)
}

fn encode_peer_entry(cmd: u8, peer: &PeerInfo) -> Vec<u8> {
    let mut payload = Vec::with_capacity(1 + MAC_LEN + 2);
    payload.push(cmd);
    payload.extend_from_slice(&peer.addr);
    payload.push(peer.channel);
    payload.push(peer.encrypt as u8);
    payload
}

/// Remove a peer from the peer list
pub fn encode_del_peer(addr: &MacAddr) -> Vec<u8> {
    encode_addr_command(CMD_DEL_PEER, addr)
}

/// Look up a peer entry by MAC address
pub fn encode_get_peer(addr: &MacAddr) -> Vec<u8> {
    encode_addr_command(CMD_GET_PEER, addr)
}

/// Test whether a MAC address is a known peer
pub fn encode_is_peer_exist(addr: &MacAddr) -> Vec<u8> {
    encode_addr_command(CMD_IS_PEER_EXIST, addr)
}

fn encode_addr_command(cmd: u8, addr: &MacAddr) -> Vec<u8> {
    let mut payload = Vec::with_capacity(1 + MAC_LEN);
    payload.push(cmd);
    payload.extend_from_slice(addr);
    payload
}

/// Configure the ESP-NOW PHY rate
///
/// # Arguments
///
/// * `interface` - WiFi interface index on the adapter
/// * `rate` - PHY rate value as defined by the adapter firmware
pub fn encode_config_rate(interface: u8, rate: u8) -> Vec<u8> {
    vec![CMD_CONFIG_RATE, interface, rate]
}

/// Walk the peer list
///
/// # Arguments
///
/// * `from_head` - Restart from the first entry instead of continuing
pub fn encode_fetch_peer(from_head: bool) -> Vec<u8> {
    vec![CMD_FETCH_PEER, from_head as u8]
}

/// Count peers in the peer list
pub fn encode_get_peer_num() -> Vec<u8> {
    vec![CMD_GET_PEER_NUM]
}

/// Set the primary master key
pub fn encode_set_pmk(key: &[u8; ESP_NOW_KEY_LEN]) -> Vec<u8> {
    let mut payload = Vec::with_capacity(1 + ESP_NOW_KEY_LEN);
    payload.push(CMD_SET_PMK);
    payload.extend_from_slice(key);
    payload
}

/// Set the wake window for power saving
///
/// The window is transmitted big-endian, matching the adapter firmware.
pub fn encode_set_wake_window(window: u16) -> Vec<u8> {
    let mut payload = Vec::with_capacity(3);
    payload.push(CMD_SET_WAKE_WINDOW);
    payload.extend_from_slice(&window.to_be_bytes());
    payload
}

/// Query the adapter's own MAC address
pub fn encode_get_mac() -> Vec<u8> {
    vec![CMD_GET_MAC]
}
