//! Integration tests for Universal MIDI Packet decoding and the outbound encoders.

use chord_monitor::ump::{self, MT_FLEX_DATA, MT_MIDI2_CHANNEL_VOICE};
use chord_monitor::{
    Chord, ChordKind, Field, HarmonicFunction, HarmonicMonitor, Intent, NoteContext, NoteName,
    Pitch, ScaleType,
};

fn midi1_packet(status: u8, data1: u8, data2: u8) -> u32 {
    0x2000_0000 | (status as u32) << 16 | (data1 as u32) << 8 | data2 as u32
}

#[test]
fn midi1_packets_follow_the_byte_rules() {
    assert_eq!(midi1_packet(0x90, 60, 100), 0x2090_3C64);
    assert_eq!(
        ump::classify(&[0x2090_3C64]),
        Some(Intent::Activate {
            pitch: Pitch::new(60),
            velocity: 100
        })
    );
    assert_eq!(
        ump::classify(&[0x2093_3C00]),
        Some(Intent::Release {
            pitch: Pitch::new(60)
        })
    );
    assert_eq!(
        ump::classify(&[midi1_packet(0x80, 62, 40)]),
        Some(Intent::Release {
            pitch: Pitch::new(62)
        })
    );
    assert_eq!(
        ump::classify(&[midi1_packet(0xB0, 64, 127)]),
        Some(Intent::Sustain(true))
    );
    assert_eq!(
        ump::classify(&[midi1_packet(0xB0, 123, 0)]),
        Some(Intent::ClearAll)
    );
    assert_eq!(ump::classify(&[midi1_packet(0xC0, 5, 0)]), None);
}

#[test]
fn midi2_velocity_maps_to_seven_bits() {
    let on = |w1: u32| ump::classify(&[0x4090_3C00, w1]);

    assert_eq!(
        on(0xFFFF_0000),
        Some(Intent::Activate {
            pitch: Pitch::new(60),
            velocity: 127
        })
    );
    assert_eq!(
        on(0x8000_0000),
        Some(Intent::Activate {
            pitch: Pitch::new(60),
            velocity: 64
        })
    );
    // Non-zero but below one 7-bit step still sounds.
    assert_eq!(
        on(0x0100_0000),
        Some(Intent::Activate {
            pitch: Pitch::new(60),
            velocity: 1
        })
    );
    assert_eq!(
        on(0x0000_FFFF),
        Some(Intent::Release {
            pitch: Pitch::new(60)
        })
    );
    assert_eq!(
        ump::classify(&[0x4080_3C00, 0xFFFF_0000]),
        Some(Intent::Release {
            pitch: Pitch::new(60)
        })
    );
}

#[test]
fn midi2_controllers_test_the_high_bit() {
    assert_eq!(
        ump::classify(&[0x40B0_4000, 0x8000_0000]),
        Some(Intent::Sustain(true))
    );
    assert_eq!(
        ump::classify(&[0x40B0_4000, 0x7FFF_FFFF]),
        Some(Intent::Sustain(false))
    );
    assert_eq!(
        ump::classify(&[0x40B0_7B00, 0]),
        Some(Intent::ClearAll)
    );
    assert_eq!(ump::classify(&[0x40B0_0100, 0xFFFF_FFFF]), None);
}

#[test]
fn short_and_unsupported_packets_are_unhandled() {
    let mut monitor = HarmonicMonitor::new();

    assert!(!ump::dispatch(&[], &mut monitor));
    assert!(!ump::dispatch(&[0x4090_3C00], &mut monitor));
    assert!(!ump::dispatch(&[0x1000_F800], &mut monitor));
    assert!(!ump::dispatch(&[0xD010_0006, 0, 0, 0], &mut monitor));
    assert_eq!(monitor.active_count(), 0);
}

#[test]
fn packets_drive_the_monitor() {
    let mut monitor = HarmonicMonitor::new();

    assert!(ump::dispatch(&[midi1_packet(0x90, 60, 100)], &mut monitor));
    assert!(ump::dispatch(&[0x4090_4000, 0xC000_0000], &mut monitor));
    assert!(ump::dispatch(&[midi1_packet(0x90, 67, 100)], &mut monitor));

    assert_eq!(
        monitor.chord(),
        Some(&Chord::new(NoteName::C, ChordKind::Major))
    );
    assert_eq!(monitor.active()[1].velocity, 96);

    assert!(ump::dispatch(&[0x40B0_7B00, 0], &mut monitor));
    assert!(!monitor.has_chord());
}

#[test]
fn outbound_packets_are_not_consumed() {
    let field = Field::new(NoteName::G, ScaleType::Major);
    let chord = Chord::new(NoteName::G, ChordKind::DominantSeventh);

    assert_eq!(ump::chord_name(&chord, 0, 0).intent(), None);
    assert_eq!(ump::key_signature(&field, 0, 0).intent(), None);
    assert_eq!(
        ump::per_note_controller(&field.note_context(Pitch::new(67)), 0, 0).intent(),
        None
    );
}

#[test]
fn chord_name_layout() {
    let packet = ump::chord_name(&Chord::new(NoteName::C, ChordKind::Major), 0, 0);
    assert_eq!(packet.words(), &[0xD010_0006, 0x0301_0000, 0, 0]);
    assert_eq!(packet.message_type(), MT_FLEX_DATA);
    assert_eq!(packet.word_count(), 4);
    assert_eq!(packet.byte_count(), 16);
    assert_eq!(
        packet.to_be_bytes(),
        vec![0xD0, 0x10, 0x00, 0x06, 0x03, 0x01, 0x00, 0x00, 0, 0, 0, 0, 0, 0, 0, 0]
    );

    let packet = ump::chord_name(&"F#m7".parse().unwrap(), 2, 5);
    assert_eq!(packet.words(), &[0xD215_0006, 0x1609_0000, 0, 0]);

    // Group and channel are four bits wide.
    let packet = ump::chord_name(&"F#m7".parse().unwrap(), 0x12, 0x15);
    assert_eq!(packet.words()[0], 0xD215_0006);
}

#[test]
fn chord_types_without_a_code_encode_unknown() {
    assert_eq!(ump::chord_type_code(ChordKind::AddNine), ump::CHORD_TYPE_UNKNOWN);
    assert_eq!(ump::chord_type_code(ChordKind::SixNine), ump::CHORD_TYPE_UNKNOWN);

    let packet = ump::chord_name(&Chord::new(NoteName::C, ChordKind::AddNine), 0, 0);
    assert_eq!(packet.words()[1], 0x0300_0000);

    assert_eq!(ump::chord_type_code(ChordKind::DominantSeventh), 13);
    assert_eq!(ump::chord_type_code(ChordKind::HalfDiminished), 21);
    assert_eq!(ump::chord_type_code(ChordKind::SuspendedFourth), 26);
    assert_eq!(ump::chord_type_code(ChordKind::Suspended), 26);
}

#[test]
fn tonic_letters_and_accidentals() {
    assert_eq!(ump::tonic_code(NoteName::A), (1, 0));
    assert_eq!(ump::tonic_code(NoteName::As), (1, 1));
    assert_eq!(ump::tonic_code(NoteName::B), (2, 0));
    assert_eq!(ump::tonic_code(NoteName::Cs), (3, 1));
    assert_eq!(ump::tonic_code(NoteName::G), (7, 0));
    assert_eq!(ump::tonic_code(NoteName::Gs), (7, 1));
}

#[test]
fn key_signature_layout() {
    let packet = ump::key_signature(&Field::new(NoteName::A, ScaleType::NaturalMinor), 0, 0);
    assert_eq!(packet.words(), &[0xD010_0005, 0x0101_0000, 0, 0]);

    let packet = ump::key_signature(&Field::new(NoteName::Ds, ScaleType::Major), 1, 9);
    assert_eq!(packet.words(), &[0xD119_0005, 0x1400_0000, 0, 0]);

    // Families without a mode code read as major.
    let packet = ump::key_signature(&Field::new(NoteName::C, ScaleType::Blues), 0, 0);
    assert_eq!(packet.words()[1], 0x0300_0000);
}

#[test]
fn per_note_controller_layout() {
    let field = Field::new(NoteName::C, ScaleType::Major);

    let e = Pitch::new(64);
    let ctx = field.note_context(e);
    assert_eq!(ctx.degree, 3);
    assert_eq!(ctx.function, HarmonicFunction::Tonic);
    let packet = ump::per_note_controller(&ctx, 0, 0);
    assert_eq!(packet.words(), &[0x4010_4000, 0x0300_0401]);
    assert_eq!(packet.message_type(), MT_MIDI2_CHANNEL_VOICE);
    assert_eq!(packet.byte_count(), 8);

    let f = Pitch::new(65);
    let packet = ump::per_note_controller(&field.note_context(f), 3, 2);
    assert_eq!(packet.words(), &[0x4312_4100, 0x0401_0501]);

    let fs = Pitch::new(66);
    let packet = ump::per_note_controller(&field.note_context(fs), 0, 0);
    assert_eq!(packet.words(), &[0x4010_4200, 0x0000_0600]);

    // The note index comes from the context itself.
    let high = Pitch::new(127);
    let packet = ump::per_note_controller(&field.note_context(high), 0, 0);
    assert_eq!(packet.words()[0] >> 8 & 0x7F, 127);
    let packet = ump::per_note_controller(&NoteContext::neutral(Pitch::new(21)), 0, 0);
    assert_eq!(packet.words(), &[0x4010_1500, 0]);
}
