//! MIDI 1.0
//!
//! Byte-stream reassembly (running status, SysEx absorption, real-time
//! pass-through) and the stateless classification of reconstructed
//! messages into monitor intents.

use log::trace;

use crate::monitor::{HarmonicMonitor, Intent};
use crate::pitch::Pitch;

const NOTE_OFF: u8 = 0x80;
const NOTE_ON: u8 = 0x90;
const POLY_PRESSURE: u8 = 0xA0;
const CONTROL_CHANGE: u8 = 0xB0;
const PROGRAM_CHANGE: u8 = 0xC0;
const CHANNEL_PRESSURE: u8 = 0xD0;
const PITCH_BEND: u8 = 0xE0;

const SYSEX_START: u8 = 0xF0;
const SYSEX_END: u8 = 0xF7;
const REAL_TIME_FIRST: u8 = 0xF8;

/// Controller number of the sustain (damper) pedal.
pub const CC_SUSTAIN: u8 = 64;

/// Controller number of All Notes Off.
pub const CC_ALL_NOTES_OFF: u8 = 123;

/// A reconstructed channel message. `data2` is 0 for one-data-byte kinds.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Message {
    /// Status byte, channel nibble included.
    pub status: u8,
    /// First data byte.
    pub data1: u8,
    /// Second data byte.
    pub data2: u8,
}

impl Message {
    /// Classify this message. See [`classify`].
    pub fn intent(&self) -> Option<Intent> {
        classify(self.status, self.data1, self.data2)
    }
}

/// Classify a channel message into a monitor intent.
///
/// The channel nibble is ignored. Note On with velocity 0 is a release.
/// Returns `None` for everything the monitor does not consume.
pub fn classify(status: u8, data1: u8, data2: u8) -> Option<Intent> {
    match status & 0xF0 {
        NOTE_ON if data2 > 0 => Some(Intent::Activate {
            pitch: Pitch::new(data1),
            velocity: data2,
        }),
        NOTE_ON | NOTE_OFF => Some(Intent::Release {
            pitch: Pitch::new(data1),
        }),
        CONTROL_CHANGE => match data1 {
            CC_SUSTAIN => Some(Intent::Sustain(data2 >= 64)),
            CC_ALL_NOTES_OFF => Some(Intent::ClearAll),
            _ => None,
        },
        _ => None,
    }
}

/// Classify a message and forward it to the monitor.
///
/// Returns `true` when the message was handled.
pub fn dispatch(status: u8, data1: u8, data2: u8, monitor: &mut HarmonicMonitor) -> bool {
    match classify(status, data1, data2) {
        Some(intent) => {
            monitor.apply(intent);
            true
        }
        None => {
            trace!("unhandled message {status:#04x} {data1} {data2}");
            false
        }
    }
}

/// Number of data bytes following a channel status byte.
const fn data_length(status: u8) -> u8 {
    match status & 0xF0 {
        NOTE_OFF | NOTE_ON | POLY_PRESSURE | CONTROL_CHANGE | PITCH_BEND => 2,
        PROGRAM_CHANGE | CHANNEL_PRESSURE => 1,
        _ => 2,
    }
}

/// Stateful MIDI 1.0 byte-stream parser.
///
/// Feed one byte at a time. Real-time bytes (0xF8..=0xFF) pass through
/// without touching state, SysEx is absorbed up to its terminator, and
/// system-common bytes cancel running status.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct ByteStreamParser {
    status: u8,
    data1: u8,
    pending: u8,
    in_sysex: bool,
}

impl ByteStreamParser {
    /// Create a parser with no running status.
    pub const fn new() -> Self {
        ByteStreamParser {
            status: 0,
            data1: 0,
            pending: 0,
            in_sysex: false,
        }
    }

    /// Forget running status, pending data and any open SysEx.
    pub fn reset(&mut self) {
        *self = ByteStreamParser::new();
    }

    /// Current running status, 0 when none.
    pub const fn running_status(&self) -> u8 {
        self.status
    }

    /// Whether a SysEx body is being absorbed.
    pub const fn in_sysex(&self) -> bool {
        self.in_sysex
    }

    /// Push one byte; returns a message when this byte completes one.
    pub fn push(&mut self, byte: u8) -> Option<Message> {
        if byte >= REAL_TIME_FIRST {
            return None;
        }
        if byte == SYSEX_END {
            self.in_sysex = false;
            return None;
        }
        if byte == SYSEX_START {
            self.in_sysex = true;
            self.pending = 0;
            return None;
        }
        if self.in_sysex {
            return None;
        }
        if byte > SYSEX_START {
            // System common
            self.status = 0;
            self.pending = 0;
            return None;
        }
        if byte & 0x80 != 0 {
            self.status = byte;
            self.pending = 0;
            return None;
        }

        if self.status == 0 {
            trace!("stray data byte {byte:#04x} without running status");
            return None;
        }

        if self.pending == 0 {
            if data_length(self.status) == 1 {
                return Some(Message {
                    status: self.status,
                    data1: byte,
                    data2: 0,
                });
            }
            self.data1 = byte;
            self.pending = 1;
            return None;
        }

        self.pending = 0;
        Some(Message {
            status: self.status,
            data1: self.data1,
            data2: byte,
        })
    }

    /// Push one byte and dispatch any completed message to the monitor.
    ///
    /// Returns `true` when this byte completed a handled message.
    pub fn feed(&mut self, byte: u8, monitor: &mut HarmonicMonitor) -> bool {
        match self.push(byte) {
            Some(msg) => dispatch(msg.status, msg.data1, msg.data2, monitor),
            None => false,
        }
    }

    /// Feed a whole buffer; returns how many handled messages it completed.
    pub fn feed_all(&mut self, bytes: &[u8], monitor: &mut HarmonicMonitor) -> usize {
        let mut handled = 0;
        for &b in bytes {
            if self.feed(b, monitor) {
                handled += 1;
            }
        }
        handled
    }
}
