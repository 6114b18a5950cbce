//! Integration tests for pitches, chord naming and field deduction.

use chord_monitor::field::FieldDeducer;
use chord_monitor::pitch::chromatic_distance;
use chord_monitor::{
    Chord, ChordError, ChordKind, ChordNamer, Field, FormulaNamer, HarmonicFunction, NoteName,
    Pitch, PitchClassSet, ScaleDeducer, ScaleType,
};

fn names(s: &str) -> Vec<NoteName> {
    s.split_whitespace().map(|n| n.parse().unwrap()).collect()
}

#[test]
fn pitches_print_with_octave() {
    assert_eq!(Pitch::new(60).to_string(), "C4");
    assert_eq!(Pitch::new(61).to_string(), "C#4");
    assert_eq!(Pitch::new(0).to_string(), "C-1");
    assert_eq!(Pitch::new(127).to_string(), "G9");
    // High bit is not part of the key number.
    assert_eq!(Pitch::new(200), Pitch::new(72));
    assert_eq!(Pitch::new(69).name(), NoteName::A);
    assert_eq!(Pitch::new(69).class(), 9);
}

#[test]
fn note_names_parse_any_spelling() {
    let parse = |s: &str| s.parse::<NoteName>();
    assert_eq!(parse("C"), Ok(NoteName::C));
    assert_eq!(parse("Db"), Ok(NoteName::Cs));
    assert_eq!(parse("B#"), Ok(NoteName::C));
    assert_eq!(parse("Cb"), Ok(NoteName::B));
    assert_eq!(parse("Ebb"), Ok(NoteName::D));
    assert_eq!(parse(""), Err(ChordError::Empty));
    assert_eq!(
        parse("H"),
        Err(ChordError::UnknownNote {
            name: "H".to_string()
        })
    );
    assert_eq!(
        parse("C$"),
        Err(ChordError::UnknownNote {
            name: "C$".to_string()
        })
    );
}

#[test]
fn pitch_class_sets() {
    let triad: PitchClassSet = [0u8, 4, 7].into_iter().collect();
    assert_eq!(triad.len(), 3);
    assert_eq!(triad.rotate(5).iter().collect::<Vec<_>>(), vec![0, 5, 9]);
    assert_eq!(triad.rotate(12), triad);
    assert!(triad.contains(16));
    assert_eq!(PitchClassSet::from_mask(0xF091).mask(), 0x091);

    assert_eq!(chromatic_distance(0, 6), 6);
    assert_eq!(chromatic_distance(0, 7), 5);
    assert_eq!(chromatic_distance(11, 0), 1);
    assert_eq!(chromatic_distance(0, 7), chromatic_distance(7, 0));
}

#[test]
fn chord_symbols_parse() {
    let parse = |s: &str| s.parse::<Chord>();

    assert_eq!(parse("C"), Ok(Chord::new(NoteName::C, ChordKind::Major)));
    assert_eq!(parse("Am7"), Ok(Chord::new(NoteName::A, ChordKind::MinorSeventh)));
    assert_eq!(parse("Bbmaj7"), Ok(Chord::new(NoteName::As, ChordKind::MajorSeventh)));
    assert_eq!(
        parse("F#m7(b5)"),
        Ok(Chord::new(NoteName::Fs, ChordKind::HalfDiminished))
    );
    assert_eq!(parse("Gdom7"), Ok(Chord::new(NoteName::G, ChordKind::DominantSeventh)));
    assert_eq!(parse("Dmin"), Ok(Chord::new(NoteName::D, ChordKind::Minor)));
    assert_eq!(parse("E+"), Ok(Chord::new(NoteName::E, ChordKind::Augmented)));

    assert_eq!(parse(""), Err(ChordError::Empty));
    assert_eq!(
        parse("H7"),
        Err(ChordError::UnknownNote {
            name: "H".to_string()
        })
    );
    assert_eq!(
        parse("Cxyz"),
        Err(ChordError::UnknownQuality {
            symbol: "xyz".to_string()
        })
    );
}

#[test]
fn every_name_round_trips() {
    for root in NoteName::ALL {
        for quality in ChordKind::ALL {
            let chord = Chord::new(root, quality);
            assert_eq!(chord.name().parse::<Chord>(), Ok(chord), "{chord}");
        }
    }
}

#[test]
fn chord_tones() {
    let chord: Chord = "Dm7".parse().unwrap();
    assert_eq!(chord.size(), 4);
    assert_eq!(chord.pitch_classes(), vec![2, 5, 9, 0]);
    assert_eq!(chord.mask(), [0u8, 2, 5, 9].into_iter().collect::<PitchClassSet>());
    assert_eq!(chord.interval_mask(), [0u8, 3, 7, 10].into_iter().collect::<PitchClassSet>());
    assert_eq!(chord.triad_mode(), None);

    // Compound intervals fold into the octave.
    let chord: Chord = "C9".parse().unwrap();
    assert_eq!(chord.pitch_classes(), vec![0, 4, 7, 10, 2]);

    assert_eq!("G".parse::<Chord>().unwrap().triad_mode(), Some(true));
    assert_eq!("Gm".parse::<Chord>().unwrap().triad_mode(), Some(false));
}

#[test]
fn namer_prefers_the_first_note_as_root() {
    let namer = FormulaNamer::new();
    let id = |pcs: &[u8]| namer.identify(pcs).map(|c| c.name());

    assert_eq!(id(&[0, 4, 7]), Some("CM".to_string()));
    assert_eq!(id(&[9, 0, 4]), Some("Am".to_string()));
    // C-E-G-A from C is a sixth, from A a minor seventh.
    assert_eq!(id(&[0, 4, 7, 9]), Some("C6".to_string()));
    assert_eq!(id(&[9, 0, 4, 7]), Some("Am7".to_string()));
    // Octaves are folded.
    assert_eq!(id(&[60, 64, 67, 72]), Some("CM".to_string()));
}

#[test]
fn namer_falls_back_to_other_roots() {
    let namer = FormulaNamer::default();
    let id = |pcs: &[u8]| namer.identify(pcs).map(|c| c.name());

    assert_eq!(id(&[0, 9, 4]), Some("Am".to_string()));
    assert_eq!(id(&[7, 0]), Some("C5".to_string()));
    assert_eq!(id(&[4, 7, 0]), Some("CM".to_string()));
}

#[test]
fn namer_reports_the_earliest_formula_row() {
    let namer = FormulaNamer::new();
    let id = |pcs: &[u8]| namer.identify(pcs).map(|c| c.quality);

    assert_eq!(id(&[0, 2, 4, 7]), Some(ChordKind::AddNine));
    assert_eq!(id(&[0, 5, 7]), Some(ChordKind::SuspendedFourth));
    assert_eq!(id(&[0, 4, 8, 10]), Some(ChordKind::AugmentedSeventh));
    assert_eq!(id(&[0, 3, 7, 10, 5]), Some(ChordKind::MinorEleventh));
}

#[test]
fn namer_rejects_what_it_cannot_name() {
    let namer = FormulaNamer::new();
    assert_eq!(namer.identify(&[]), None);
    assert_eq!(namer.identify(&[0]), None);
    assert_eq!(namer.identify(&[0, 12]), None);
    assert_eq!(namer.identify(&[0, 1]), None);
    assert_eq!(namer.identify(&(0..12).collect::<Vec<u8>>()), None);
}

#[test]
fn field_degrees_and_functions() {
    let c_major = Field::new(NoteName::C, ScaleType::Major);
    assert_eq!(c_major.degree_of(NoteName::C), 1);
    assert_eq!(c_major.degree_of(NoteName::G), 5);
    assert_eq!(c_major.degree_of(NoteName::Fs), 0);
    assert!(!c_major.contains(NoteName::Fs));
    assert_eq!(c_major.function(5), HarmonicFunction::Dominant);
    assert_eq!(c_major.function(4), HarmonicFunction::Subdominant);
    assert_eq!(c_major.function(0), HarmonicFunction::Tonic);
    assert_eq!(c_major.to_string(), "C major");

    let a_harmonic = Field::new(NoteName::A, ScaleType::HarmonicMinor);
    assert_eq!(a_harmonic.degree_of(NoteName::Gs), 7);
    assert_eq!(a_harmonic.function(7), HarmonicFunction::Dominant);
    assert_eq!(a_harmonic.interval_of(NoteName::C), 3);

    let whole = Field::new(NoteName::C, ScaleType::WholeTone);
    assert_eq!(whole.function(7), HarmonicFunction::Tonic);

    let ctx = c_major.note_context(Pitch::new(71));
    assert_eq!((ctx.degree, ctx.interval, ctx.in_scale), (7, 11, true));
    assert_eq!(ctx.function, HarmonicFunction::Dominant);
}

#[test]
fn scale_tables_have_their_sizes() {
    let sizes: Vec<u8> = ScaleType::ALL.iter().map(|s| s.size()).collect();
    assert_eq!(sizes, vec![7, 7, 7, 7, 8, 7, 6, 6, 6, 12]);
    for scale in ScaleType::ALL {
        let iv = scale.intervals();
        assert_eq!(iv[0], 0, "{scale}");
        assert!(iv.windows(2).all(|w| w[0] < w[1]), "{scale}");
    }
}

#[test]
fn deduction_ranks_by_matches_then_first_note() {
    let deducer = ScaleDeducer::new();

    let ranked = deducer.deduce(&names("C E G"));
    assert_eq!(ranked[0].field(), Field::new(NoteName::C, ScaleType::Major));
    assert_eq!(ranked[0].matched, 3);
    assert!(ranked.windows(2).all(|w| w[0].matched >= w[1].matched));
    assert!(ranked.iter().all(|c| c.matched > 0));
    assert!(ranked.iter().all(|c| c.scale != ScaleType::Chromatic));

    let ranked = deducer.deduce(&names("A C E"));
    assert_eq!(ranked[0].field(), Field::new(NoteName::A, ScaleType::NaturalMinor));

    // G# rules out the natural minor.
    let ranked = deducer.deduce(&names("A C E G#"));
    assert_eq!(ranked[0].field(), Field::new(NoteName::A, ScaleType::HarmonicMinor));

    assert!(deducer.deduce(&[]).is_empty());
    assert_eq!(deducer.top_k(&names("D F A"), 3).len(), 3);
}

#[test]
fn diatonic_chords_of_a_field() {
    let c_major = Field::new(NoteName::C, ScaleType::Major);
    let named = |chords: Vec<Chord>| chords.iter().map(Chord::name).collect::<Vec<_>>().join(" ");

    assert_eq!(named(c_major.chords()), "CM Dm Em FM GM Am Bdim");
    assert_eq!(named(c_major.sevenths()), "C7M Dm7 Em7 F7M G7 Am7 Bm7(b5)");
    assert_eq!(c_major.chord(5), Some("G".parse().unwrap()));
    assert_eq!(c_major.seventh(7), Some("Bm7(b5)".parse().unwrap()));
    assert_eq!(c_major.chord(0), None);
    assert_eq!(c_major.chord(8), None);

    let a_harmonic = Field::new(NoteName::A, ScaleType::HarmonicMinor);
    assert_eq!(named(a_harmonic.chords()), "Am Bdim Caug Dm EM FM G#dim");
    assert_eq!(a_harmonic.seventh(5), Some("E7".parse().unwrap()));

    // Every degree yields a chord, even where stacking thirds is irregular.
    for scale in ScaleType::ALL {
        let field = Field::new(NoteName::D, scale);
        assert_eq!(field.chords().len(), scale.size() as usize, "{scale}");
        assert_eq!(field.sevenths().len(), scale.size() as usize, "{scale}");
    }
}

#[test]
fn chord_functions_and_roles() {
    let c_major = Field::new(NoteName::C, ScaleType::Major);
    let chord = |s: &str| s.parse::<Chord>().unwrap();

    assert_eq!(c_major.function_of(&chord("G7")), HarmonicFunction::Dominant);
    assert_eq!(c_major.function_of(&chord("Dm")), HarmonicFunction::Subdominant);
    assert_eq!(c_major.function_of(&chord("Am")), HarmonicFunction::Tonic);
    assert_eq!(c_major.function_of(&chord("F#M")), HarmonicFunction::Tonic);

    let roles: Vec<&str> = (1..=7).map(|d| c_major.role(d)).collect();
    assert_eq!(
        roles,
        [
            "primary",
            "relative of IV",
            "transitive",
            "primary",
            "primary",
            "relative of I",
            "relative of V",
        ]
    );
    assert_eq!(c_major.role(6), "relative of I");
    assert_eq!(c_major.role(0), "primary");
    assert_eq!(c_major.role(8), "primary");
    assert_eq!(c_major.role_of(&chord("Em")), "transitive");
    assert_eq!(c_major.role_of(&chord("Eb")), "primary");

    let a_minor = Field::new(NoteName::A, ScaleType::NaturalMinor);
    assert_eq!(a_minor.role(3), "primary");
    assert_eq!(a_minor.function_of(&chord("E7")), HarmonicFunction::Dominant);
}
