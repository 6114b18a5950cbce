//! MIDI-CI
//!
//! SysEx byte builders announcing this engine to MIDI-CI capable peers,
//! plus the JSON capability document served over property exchange.

use serde::{Deserialize, Serialize};

const SYSEX_START: u8 = 0xF0;
const SYSEX_END: u8 = 0xF7;
const UNIVERSAL_NON_REALTIME: u8 = 0x7E;
const MIDI_CI: u8 = 0x0D;
const CI_VERSION: u8 = 0x02;

const SUB_ID_DISCOVERY: u8 = 0x70;
const SUB_ID_PROFILE_INQUIRY_REPLY: u8 = 0x22;

/// Length of a discovery request.
pub const DISCOVERY_REQUEST_LEN: usize = 31;

/// Length of a profile inquiry reply announcing one profile.
pub const PROFILE_INQUIRY_REPLY_LEN: usize = 23;

/// Profile id: non-commercial bank followed by ASCII "CHRD".
pub const PROFILE_ID: [u8; 5] = [0x7D, 0x43, 0x48, 0x52, 0x44];

/// Channel value addressing the whole function block.
pub const ALL_CHANNELS: u8 = 0x7F;

const MANUFACTURER_ID: [u8; 3] = [0x7D, 0x00, 0x00];
const FAMILY: [u8; 2] = [0x01, 0x00];
const MODEL: [u8; 2] = [0x01, 0x00];
const SOFTWARE_REVISION: [u8; 4] = [0x00, 0x01, 0x00, 0x00];
const CATEGORIES: u8 = 0x0E;
const MAX_SYSEX: [u8; 4] = [0x00, 0x01, 0x00, 0x00];

/// A 28-bit MIDI-CI unique id, stored as four 7-bit bytes.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Muid([u8; 4]);

impl Muid {
    /// Destination that addresses every device.
    pub const BROADCAST: Muid = Muid([0x7F; 4]);

    /// Fallback source id ("CHRD"). Devices should supply their own.
    pub const DEFAULT: Muid = Muid([0x43, 0x48, 0x52, 0x44]);

    /// Build from four bytes, keeping the low seven bits of each.
    pub const fn new(bytes: [u8; 4]) -> Self {
        Muid([
            bytes[0] & 0x7F,
            bytes[1] & 0x7F,
            bytes[2] & 0x7F,
            bytes[3] & 0x7F,
        ])
    }

    /// The four 7-bit bytes.
    pub const fn bytes(&self) -> [u8; 4] {
        self.0
    }
}

impl Default for Muid {
    fn default() -> Self {
        Muid::DEFAULT
    }
}

fn header(channel: u8, sub_id: u8, source: Muid) -> Vec<u8> {
    let mut buf = Vec::with_capacity(DISCOVERY_REQUEST_LEN);
    buf.extend_from_slice(&[
        SYSEX_START,
        UNIVERSAL_NON_REALTIME,
        channel & 0x7F,
        MIDI_CI,
        sub_id,
        CI_VERSION,
    ]);
    buf.extend_from_slice(&source.bytes());
    buf.extend_from_slice(&Muid::BROADCAST.bytes());
    buf
}

/// Discovery Request (sub-id 0x70) broadcast from `source`.
pub fn discovery_request(source: Muid) -> Vec<u8> {
    let mut buf = header(ALL_CHANNELS, SUB_ID_DISCOVERY, source);
    buf.extend_from_slice(&MANUFACTURER_ID);
    buf.extend_from_slice(&FAMILY);
    buf.extend_from_slice(&MODEL);
    buf.extend_from_slice(&SOFTWARE_REVISION);
    buf.push(CATEGORIES);
    buf.extend_from_slice(&MAX_SYSEX);
    buf.push(SYSEX_END);
    buf
}

/// Profile Inquiry Reply (sub-id 0x22) listing this engine's profile as enabled.
pub fn profile_inquiry_reply(channel: u8, source: Muid) -> Vec<u8> {
    let mut buf = header(channel, SUB_ID_PROFILE_INQUIRY_REPLY, source);
    buf.push(channel & 0x7F);
    buf.push(0x01);
    buf.extend_from_slice(&PROFILE_ID);
    buf.push(0x00);
    buf.push(SYSEX_END);
    buf
}

/// Capability document served as a property-exchange resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Capabilities {
    /// Engine name.
    pub name: String,
    /// Engine version.
    pub version: String,
    /// Scale families recognised by field deduction.
    pub scales: Vec<String>,
    /// Chord families recognised by naming.
    pub chords: Vec<String>,
    /// Supported features.
    pub features: Vec<String>,
}

fn owned(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

impl Default for Capabilities {
    fn default() -> Self {
        Capabilities {
            name: env!("CARGO_PKG_NAME").to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            scales: owned(&["major", "minor", "modes"]),
            chords: owned(&["triad", "seventh", "ninth"]),
            features: owned(&[
                "chord_detect",
                "key_sig",
                "harmonic_func",
                "per_note",
                "field_deduce",
            ]),
        }
    }
}

/// The default capability document as compact JSON.
pub fn capabilities_json() -> serde_json::Result<String> {
    serde_json::to_string(&Capabilities::default())
}
