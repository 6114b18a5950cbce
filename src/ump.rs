//! Universal MIDI Packets
//!
//! Inbound classification of MIDI 1.0 and MIDI 2.0 channel-voice packets,
//! and outbound builders for Flex Data chord names, key signatures and
//! per-note harmonic context.
//!
//! Flex Data word 0 layout:
//!
//! | bits  | field                          |
//! |-------|--------------------------------|
//! | 31-28 | message type (0xD)             |
//! | 27-24 | group                          |
//! | 23-22 | format (0, complete)           |
//! | 21-20 | addressing (1, channel)        |
//! | 19-16 | channel                        |
//! | 15-8  | status bank                    |
//! | 7-0   | status                         |

use log::trace;

use crate::chord::{Chord, ChordKind};
use crate::field::{Field, NoteContext, ScaleType};
use crate::midi1::{self, CC_ALL_NOTES_OFF, CC_SUSTAIN};
use crate::monitor::{HarmonicMonitor, Intent};
use crate::pitch::{NoteName, Pitch};

/// MIDI 1.0 channel voice, one word.
pub const MT_MIDI1_CHANNEL_VOICE: u8 = 0x2;
/// MIDI 2.0 channel voice, two words.
pub const MT_MIDI2_CHANNEL_VOICE: u8 = 0x4;
/// Flex Data, four words.
pub const MT_FLEX_DATA: u8 = 0xD;

const OPCODE_NOTE_OFF: u8 = 0x8;
const OPCODE_NOTE_ON: u8 = 0x9;
const OPCODE_CONTROL_CHANGE: u8 = 0xB;
const OPCODE_ASSIGNABLE_PER_NOTE: u8 = 0x1;

const STATUS_KEY_SIGNATURE: u8 = 0x05;
const STATUS_CHORD_NAME: u8 = 0x06;

/// Chord-type code for qualities with no MIDI 2.0 counterpart.
pub const CHORD_TYPE_UNKNOWN: u8 = 0;

/// A Universal MIDI Packet of up to four 32-bit words.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash)]
pub struct Packet {
    words: [u32; 4],
    len: u8,
}

impl Packet {
    const fn with_words(words: [u32; 4], len: u8) -> Self {
        Packet { words, len }
    }

    /// The valid words.
    pub fn words(&self) -> &[u32] {
        &self.words[..self.len as usize]
    }

    /// Number of valid words.
    pub const fn word_count(&self) -> u8 {
        self.len
    }

    /// Number of bytes on the wire.
    pub const fn byte_count(&self) -> u8 {
        self.len * 4
    }

    /// Message type nibble of word 0.
    pub const fn message_type(&self) -> u8 {
        (self.words[0] >> 28) as u8 & 0xF
    }

    /// Big-endian wire bytes of the valid words.
    pub fn to_be_bytes(&self) -> Vec<u8> {
        self.words().iter().flat_map(|w| w.to_be_bytes()).collect()
    }

    /// Classify this packet. See [`classify`].
    pub fn intent(&self) -> Option<Intent> {
        classify(self.words())
    }
}

/// Classify an inbound packet into a monitor intent.
///
/// Message type 0x2 reuses the MIDI 1.0 rules on its embedded fields.
/// Message type 0x4 reads a 16-bit velocity (note messages) or a 32-bit
/// controller value from word 1; a controller value with its high bit set
/// means "on". Slices too short for their type are unhandled.
pub fn classify(words: &[u32]) -> Option<Intent> {
    let w0 = *words.first()?;
    let opcode = ((w0 >> 20) & 0xF) as u8;
    let index = ((w0 >> 8) & 0x7F) as u8;

    match ((w0 >> 28) & 0xF) as u8 {
        MT_MIDI1_CHANNEL_VOICE => {
            let data2 = (w0 & 0x7F) as u8;
            midi1::classify(opcode << 4, index, data2)
        }
        MT_MIDI2_CHANNEL_VOICE => {
            let w1 = *words.get(1)?;
            match opcode {
                OPCODE_NOTE_ON | OPCODE_NOTE_OFF => {
                    let velocity = (w1 >> 16) as u16;
                    let pitch = Pitch::new(index);
                    if opcode == OPCODE_NOTE_ON && velocity > 0 {
                        Some(Intent::Activate {
                            pitch,
                            velocity: ((velocity >> 9) as u8).max(1),
                        })
                    } else {
                        Some(Intent::Release { pitch })
                    }
                }
                OPCODE_CONTROL_CHANGE => match index {
                    CC_SUSTAIN => Some(Intent::Sustain(w1 & 0x8000_0000 != 0)),
                    CC_ALL_NOTES_OFF => Some(Intent::ClearAll),
                    _ => None,
                },
                _ => None,
            }
        }
        _ => None,
    }
}

/// Classify a packet and forward it to the monitor.
///
/// Returns `true` when the packet was handled.
pub fn dispatch(words: &[u32], monitor: &mut HarmonicMonitor) -> bool {
    match classify(words) {
        Some(intent) => {
            monitor.apply(intent);
            true
        }
        None => {
            trace!("unhandled packet {words:x?}");
            false
        }
    }
}

/// Flex Data word 0, channel-addressed, complete in one packet.
const fn flex_word0(status_bank: u8, status: u8, group: u8, channel: u8) -> u32 {
    ((MT_FLEX_DATA as u32) << 28)
        | (((group & 0xF) as u32) << 24)
        | (0x1 << 20)
        | (((channel & 0xF) as u32) << 16)
        | ((status_bank as u32) << 8)
        | status as u32
}

/// Tonic letter (A=1 .. G=7) and accidental (natural=0, sharp=1).
pub const fn tonic_code(note: NoteName) -> (u8, u8) {
    let letter = match note.letter() {
        'A' => 1,
        'B' => 2,
        'C' => 3,
        'D' => 4,
        'E' => 5,
        'F' => 6,
        _ => 7,
    };
    (letter, note.is_sharp() as u8)
}

/// MIDI 2.0 chord-type code of a quality.
pub const fn chord_type_code(kind: ChordKind) -> u8 {
    match kind {
        ChordKind::Major => 1,
        ChordKind::Sixth => 2,
        ChordKind::MajorSeventh => 3,
        ChordKind::MajorNinth => 4,
        ChordKind::MajorThirteenth => 6,
        ChordKind::Minor => 7,
        ChordKind::MinorSixth => 8,
        ChordKind::MinorSeventh => 9,
        ChordKind::MinorNinth => 10,
        ChordKind::MinorEleventh => 11,
        ChordKind::MinorThirteenth => 12,
        ChordKind::DominantSeventh => 13,
        ChordKind::DominantNinth => 14,
        ChordKind::DominantEleventh => 15,
        ChordKind::DominantThirteenth => 16,
        ChordKind::Augmented => 17,
        ChordKind::AugmentedSeventh
        | ChordKind::SeventhPlusFive
        | ChordKind::MajorSeventhSharpFive => 18,
        ChordKind::Diminished => 19,
        ChordKind::DiminishedSeventh => 20,
        ChordKind::HalfDiminished => 21,
        ChordKind::MinorMajorSeventh => 22,
        ChordKind::PowerFifth => 24,
        ChordKind::SuspendedSecond => 25,
        ChordKind::SuspendedFourth | ChordKind::Suspended => 26,
        ChordKind::SuspendedSeventh => 27,
        _ => CHORD_TYPE_UNKNOWN,
    }
}

/// Key-signature mode code of a scale family (unlisted families read as major).
pub const fn scale_mode_code(scale: ScaleType) -> u8 {
    match scale {
        ScaleType::NaturalMinor => 1,
        ScaleType::HarmonicMinor => 2,
        ScaleType::MelodicMinor => 3,
        _ => 0,
    }
}

/// Flex Data Chord Name packet (status bank 0x00, status 0x06).
///
/// Word 1 carries accidental[31:28], tonic letter[27:24] and chord
/// type[23:16]; alterations and bass note are left empty.
pub fn chord_name(chord: &Chord, group: u8, channel: u8) -> Packet {
    let (letter, accidental) = tonic_code(chord.root);
    let w1 = ((accidental as u32) << 28)
        | ((letter as u32) << 24)
        | ((chord_type_code(chord.quality) as u32) << 16);
    Packet::with_words(
        [flex_word0(0x00, STATUS_CHORD_NAME, group, channel), w1, 0, 0],
        4,
    )
}

/// Flex Data Key Signature packet (status bank 0x00, status 0x05).
pub fn key_signature(field: &Field, group: u8, channel: u8) -> Packet {
    let (letter, accidental) = tonic_code(field.tonic);
    let w1 = ((accidental as u32) << 28)
        | ((letter as u32) << 24)
        | ((scale_mode_code(field.scale) as u32) << 16);
    Packet::with_words(
        [flex_word0(0x00, STATUS_KEY_SIGNATURE, group, channel), w1, 0, 0],
        4,
    )
}

/// Assignable per-note controller 0 carrying a note's harmonic context.
///
/// The note index is `ctx.pitch`. Word 1: degree[31:24], function[23:16],
/// interval[15:8], in-scale[7:0].
pub fn per_note_controller(ctx: &NoteContext, group: u8, channel: u8) -> Packet {
    let w0 = ((MT_MIDI2_CHANNEL_VOICE as u32) << 28)
        | (((group & 0xF) as u32) << 24)
        | ((OPCODE_ASSIGNABLE_PER_NOTE as u32) << 20)
        | (((channel & 0xF) as u32) << 16)
        | ((ctx.pitch.key() as u32) << 8);
    let w1 = ((ctx.degree as u32) << 24)
        | ((ctx.function as u32) << 16)
        | ((ctx.interval as u32) << 8)
        | ctx.in_scale as u32;
    Packet::with_words([w0, w1, 0, 0], 2)
}
