//! Field
//!
//! Harmonic fields (a tonic plus a scale family), per-note harmonic context
//! and the scale-matching key deduction used by the monitor.

use std::cmp::Reverse;
use std::fmt::Display;

use crate::chord::{Chord, ChordKind, ChordNamer, FormulaNamer};
use crate::pitch::{NoteName, Pitch, SEMITONES};

/// Number of scale families.
const NUM_SCALE_TYPES: usize = 10;

/// Scale families in table order
const SCALE_TYPES: [ScaleType; NUM_SCALE_TYPES] = [
    ScaleType::Major,
    ScaleType::NaturalMinor,
    ScaleType::HarmonicMinor,
    ScaleType::MelodicMinor,
    ScaleType::Diminished,
    ScaleType::HarmonicMajor,
    ScaleType::WholeTone,
    ScaleType::Augmented,
    ScaleType::Blues,
    ScaleType::Chromatic,
];

/// (name, semitone offsets from the tonic) matching `SCALE_TYPES` order
const SCALE_FORMULAS: [(&str, &[u8]); NUM_SCALE_TYPES] = [
    ("major", &[0, 2, 4, 5, 7, 9, 11]),
    ("natural minor", &[0, 2, 3, 5, 7, 8, 10]),
    ("harmonic minor", &[0, 2, 3, 5, 7, 8, 11]),
    ("melodic minor", &[0, 2, 3, 5, 7, 9, 11]),
    ("diminished", &[0, 2, 3, 5, 6, 8, 9, 11]),
    ("harmonic major", &[0, 2, 4, 5, 7, 8, 11]),
    ("whole tone", &[0, 2, 4, 6, 8, 10]),
    ("augmented", &[0, 3, 4, 7, 8, 11]),
    ("blues", &[0, 3, 5, 6, 7, 10]),
    ("chromatic", &[0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11]),
];

use self::HarmonicFunction::{Dominant as D, Subdominant as S, Tonic as T};

/// Harmonic function per degree (1-indexed by position), matching `SCALE_TYPES` order
const FUNCTION_TABLE: [[HarmonicFunction; 8]; NUM_SCALE_TYPES] = [
    [T, S, T, S, D, T, D, T],
    [T, S, T, S, D, S, D, T],
    [T, S, T, S, D, S, D, T],
    [T, S, T, S, D, S, D, T],
    [T, D, T, D, T, D, T, D],
    [T, S, T, S, D, S, D, T],
    [T, T, T, T, T, T, T, T],
    [T, T, T, T, T, T, T, T],
    [T, S, D, T, S, D, T, T],
    [T, T, T, T, T, T, T, T],
];

/// Scale families a field can be built on
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ScaleType {
    /// Major (Ionian)
    Major,
    /// Natural minor (Aeolian)
    NaturalMinor,
    /// Harmonic minor
    HarmonicMinor,
    /// Melodic minor (ascending)
    MelodicMinor,
    /// Whole-half diminished (octatonic)
    Diminished,
    /// Harmonic major
    HarmonicMajor,
    /// Whole tone
    WholeTone,
    /// Augmented (hexatonic)
    Augmented,
    /// Blues hexatonic
    Blues,
    /// All twelve pitch classes
    Chromatic,
}

impl ScaleType {
    /// All scale families in table order.
    pub const ALL: [ScaleType; NUM_SCALE_TYPES] = SCALE_TYPES;

    /// Lower-case descriptive name.
    pub const fn name(self) -> &'static str {
        SCALE_FORMULAS[self as usize].0
    }

    /// Semitone offsets from the tonic, ascending.
    pub const fn intervals(self) -> &'static [u8] {
        SCALE_FORMULAS[self as usize].1
    }

    /// Number of degrees.
    pub const fn size(self) -> u8 {
        self.intervals().len() as u8
    }
}

impl Display for ScaleType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Scale-degree offsets stacked into a triad
const TRIAD_OFFSETS: [usize; 3] = [0, 2, 4];

/// Scale-degree offsets stacked into a seventh chord
const SEVENTH_OFFSETS: [usize; 4] = [0, 2, 4, 6];

const ROLE_PRIMARY: &str = "primary";

/// Role of each major-scale degree
const MAJOR_ROLES: [&str; 7] = [
    ROLE_PRIMARY,
    "relative of IV",
    "transitive",
    ROLE_PRIMARY,
    ROLE_PRIMARY,
    "relative of I",
    "relative of V",
];

/// Tonal role of a scale degree
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum HarmonicFunction {
    /// Tonic (stable)
    Tonic = 0,
    /// Subdominant (departure)
    Subdominant = 1,
    /// Dominant (tension)
    Dominant = 2,
}

/// A harmonic field: a tonic and the scale family built on it.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Field {
    /// Tonic pitch class.
    pub tonic: NoteName,
    /// Scale family.
    pub scale: ScaleType,
}

impl Field {
    /// Create a field from its parts.
    pub const fn new(tonic: NoteName, scale: ScaleType) -> Self {
        Field { tonic, scale }
    }

    /// Ascending interval from the tonic to the pitch class (0..=11).
    pub const fn interval_of(&self, note: NoteName) -> u8 {
        (note.index() + SEMITONES - self.tonic.index()) % SEMITONES
    }

    /// Scale degree of the note (1-indexed), or 0 when outside the scale.
    pub fn degree_of(&self, note: NoteName) -> u8 {
        let interval = self.interval_of(note);
        self.scale
            .intervals()
            .iter()
            .position(|&i| i == interval)
            .map_or(0, |p| p as u8 + 1)
    }

    /// Whether the note belongs to the scale.
    pub fn contains(&self, note: NoteName) -> bool {
        self.degree_of(note) > 0
    }

    /// Function of a degree (1-indexed). Out-of-range degrees read as tonic.
    pub fn function(&self, degree: u8) -> HarmonicFunction {
        if degree == 0 || degree > self.scale.size() || degree > 8 {
            return HarmonicFunction::Tonic;
        }
        FUNCTION_TABLE[self.scale as usize][(degree - 1) as usize]
    }

    /// Role of a degree (1-indexed). Only major fields distinguish roles;
    /// everything else reads as `"primary"`.
    pub fn role(&self, degree: u8) -> &'static str {
        match (self.scale, degree) {
            (ScaleType::Major, 1..=7) => MAJOR_ROLES[(degree - 1) as usize],
            _ => ROLE_PRIMARY,
        }
    }

    /// Function of a chord's root in this field, tonic when the root is outside the scale.
    pub fn function_of(&self, chord: &Chord) -> HarmonicFunction {
        self.function(self.degree_of(chord.root))
    }

    /// Role of a chord's root in this field, `"primary"` when the root is outside the scale.
    pub fn role_of(&self, chord: &Chord) -> &'static str {
        self.role(self.degree_of(chord.root))
    }

    /// Diatonic triads, one per degree.
    pub fn chords(&self) -> Vec<Chord> {
        self.stack(&TRIAD_OFFSETS)
    }

    /// Diatonic seventh chords, one per degree.
    pub fn sevenths(&self) -> Vec<Chord> {
        self.stack(&SEVENTH_OFFSETS)
    }

    /// Triad on a degree (1-indexed).
    pub fn chord(&self, degree: u8) -> Option<Chord> {
        self.chords().get((degree as usize).checked_sub(1)?).copied()
    }

    /// Seventh chord on a degree (1-indexed).
    pub fn seventh(&self, degree: u8) -> Option<Chord> {
        self.sevenths().get((degree as usize).checked_sub(1)?).copied()
    }

    /// Stack scale tones at `offsets` above every degree and name the result.
    /// Stacks the namer rejects fall back to a major triad on the degree.
    fn stack(&self, offsets: &[usize]) -> Vec<Chord> {
        let namer = FormulaNamer::new();
        let tones: Vec<u8> = self
            .scale
            .intervals()
            .iter()
            .map(|&i| (self.tonic.index() + i) % SEMITONES)
            .collect();

        (0..tones.len())
            .map(|degree| {
                let pcs: Vec<u8> = offsets
                    .iter()
                    .map(|&o| tones[(degree + o) % tones.len()])
                    .collect();
                namer.identify(&pcs).unwrap_or_else(|| {
                    Chord::new(NoteName::from_index(pcs[0]), ChordKind::Major)
                })
            })
            .collect()
    }

    /// Harmonic context of a sounding pitch within this field.
    pub fn note_context(&self, pitch: Pitch) -> NoteContext {
        let note = pitch.name();
        let degree = self.degree_of(note);
        NoteContext {
            pitch,
            degree,
            interval: self.interval_of(note),
            function: self.function(degree),
            in_scale: degree > 0,
        }
    }
}

impl Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.tonic, self.scale)
    }
}

/// Per-note harmonic context, delivered on every activation.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct NoteContext {
    /// The activated pitch.
    pub pitch: Pitch,
    /// Scale degree 1..=8, 0 when outside the scale.
    pub degree: u8,
    /// Ascending semitones from the field tonic (0..=11).
    pub interval: u8,
    /// Function of the degree.
    pub function: HarmonicFunction,
    /// Whether the pitch belongs to the field.
    pub in_scale: bool,
}

impl NoteContext {
    /// Context used while no field is known.
    pub const fn neutral(pitch: Pitch) -> Self {
        NoteContext {
            pitch,
            degree: 0,
            interval: 0,
            function: HarmonicFunction::Tonic,
            in_scale: false,
        }
    }
}

/// A ranked deduction result.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct FieldCandidate {
    /// Tonic pitch class.
    pub tonic: NoteName,
    /// Scale family.
    pub scale: ScaleType,
    /// Number of input notes the field contains.
    pub matched: u8,
}

impl FieldCandidate {
    /// The candidate as a field.
    pub const fn field(&self) -> Field {
        Field::new(self.tonic, self.scale)
    }
}

/// Ranks the fields that best explain a collection of notes.
pub trait FieldDeducer {
    /// Candidates ordered best first. An empty result means no field fits.
    fn deduce(&self, notes: &[NoteName]) -> Vec<FieldCandidate>;
}

impl<F> FieldDeducer for F
where
    F: Fn(&[NoteName]) -> Vec<FieldCandidate>,
{
    fn deduce(&self, notes: &[NoteName]) -> Vec<FieldCandidate> {
        self(notes)
    }
}

/// Scores every tonic and scale family by note containment.
///
/// Ties are broken in favour of the first note as tonic, then by scale
/// table order, then by tonic in chromatic order. The chromatic scale is
/// never proposed since it contains everything.
#[derive(Debug, Copy, Clone, Default)]
pub struct ScaleDeducer;

impl ScaleDeducer {
    /// Create a deducer.
    pub fn new() -> Self {
        ScaleDeducer
    }

    /// Return the top `k` candidates.
    pub fn top_k(&self, notes: &[NoteName], k: usize) -> Vec<FieldCandidate> {
        let mut ranked = self.deduce(notes);
        ranked.truncate(k);
        ranked
    }
}

impl FieldDeducer for ScaleDeducer {
    fn deduce(&self, notes: &[NoteName]) -> Vec<FieldCandidate> {
        let Some(&first) = notes.first() else {
            return Vec::new();
        };

        let mut scores = Vec::with_capacity(SEMITONES as usize * NUM_SCALE_TYPES);
        for &scale in SCALE_TYPES.iter().filter(|&&s| s != ScaleType::Chromatic) {
            for tonic in NoteName::ALL {
                let field = Field::new(tonic, scale);
                let matched = notes.iter().filter(|&&n| field.contains(n)).count() as u8;
                if matched > 0 {
                    scores.push(FieldCandidate {
                        tonic,
                        scale,
                        matched,
                    });
                }
            }
        }

        scores.sort_unstable_by_key(|c| (Reverse(c.matched), c.tonic != first, c.scale, c.tonic));
        scores
    }
}
