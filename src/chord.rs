//! Chord
//!
//! Named chords and the formula table used to name pitch-class sets.
//!
//! The formula table keeps its historical row order: when several rows
//! reduce to the same pitch-class set (e.g. `add9` and `add2`), the earlier
//! row is the name reported by [`FormulaNamer`].

use std::fmt::Display;
use std::str::FromStr;

use thiserror::Error;

use crate::pitch::{NoteName, PitchClassSet, SEMITONES};

/// Number of formula rows.
const NUM_CHORD_KINDS: usize = 42;

/// Chord qualities in formula-table order.
const CHORD_KINDS: [ChordKind; NUM_CHORD_KINDS] = [
    ChordKind::Major,
    ChordKind::MajorSeventh,
    ChordKind::Sixth,
    ChordKind::SixNine,
    ChordKind::MajorNinth,
    ChordKind::Minor,
    ChordKind::MinorSeventh,
    ChordKind::MinorSixth,
    ChordKind::MinorEleventh,
    ChordKind::MinorMajorSeventh,
    ChordKind::DominantSeventh,
    ChordKind::DominantNinth,
    ChordKind::DominantEleventh,
    ChordKind::Diminished,
    ChordKind::DiminishedSeventh,
    ChordKind::HalfDiminished,
    ChordKind::Augmented,
    ChordKind::AugmentedSeventh,
    ChordKind::SeventhFlatFive,
    ChordKind::DominantThirteenth,
    ChordKind::ThirteenthSharpEleven,
    ChordKind::SeventhPlusFive,
    ChordKind::SeventhSharpNine,
    ChordKind::SeventhFlatNine,
    ChordKind::SeventhSharpEleven,
    ChordKind::PowerFifth,
    ChordKind::AddNine,
    ChordKind::AddSecond,
    ChordKind::AddEleven,
    ChordKind::AddFourth,
    ChordKind::SuspendedSecond,
    ChordKind::SuspendedFourth,
    ChordKind::SuspendedSeventh,
    ChordKind::SuspendedNinth,
    ChordKind::MinorThirteenth,
    ChordKind::MajorThirteenth,
    ChordKind::Suspended,
    ChordKind::MinorNinth,
    ChordKind::MajorSeventhSharpFive,
    ChordKind::MinorSeventhEleven,
    ChordKind::AddFlatNine,
    ChordKind::AddFlatThirteen,
];

/// (canonical symbol, semitone offsets from the root) matching `CHORD_KINDS` order.
/// Offsets above 11 are compound intervals (9ths, 11ths, 13ths).
const CHORD_FORMULAS: [(&str, &[u8]); NUM_CHORD_KINDS] = [
    ("M", &[0, 4, 7]),
    ("7M", &[0, 4, 7, 11]),
    ("6", &[0, 4, 7, 9]),
    ("6(9)", &[0, 4, 7, 9, 14]),
    ("M9", &[0, 4, 7, 11, 14]),
    ("m", &[0, 3, 7]),
    ("m7", &[0, 3, 7, 10]),
    ("m6", &[0, 3, 7, 9]),
    ("m11", &[0, 3, 7, 10, 17]),
    ("mM7", &[0, 3, 7, 11]),
    ("7", &[0, 4, 7, 10]),
    ("9", &[0, 4, 7, 10, 14]),
    ("11", &[0, 4, 7, 10, 14, 17]),
    ("dim", &[0, 3, 6]),
    ("dim7", &[0, 3, 6, 9]),
    ("m7(b5)", &[0, 3, 6, 10]),
    ("aug", &[0, 4, 8]),
    ("7#5", &[0, 4, 8, 10]),
    ("7(b5)", &[0, 4, 6, 10]),
    ("13", &[0, 4, 7, 10, 14, 17, 21]),
    ("13(#11)", &[0, 4, 7, 10, 14, 18, 21]),
    ("7+5", &[0, 4, 8, 10]),
    ("7+9", &[0, 4, 7, 10, 15]),
    ("7(b9)", &[0, 4, 7, 10, 13]),
    ("7(#11)", &[0, 4, 7, 10, 18]),
    ("5", &[0, 7]),
    ("add9", &[0, 4, 7, 14]),
    ("add2", &[0, 2, 4, 7]),
    ("add11", &[0, 4, 7, 17]),
    ("add4", &[0, 4, 5, 7]),
    ("sus2", &[0, 2, 7]),
    ("sus4", &[0, 5, 7]),
    ("sus7", &[0, 5, 7, 10]),
    ("sus9", &[0, 5, 7, 14]),
    ("m13", &[0, 3, 7, 10, 14, 17, 21]),
    ("maj13", &[0, 4, 7, 11, 14, 18, 21]),
    ("sus", &[0, 5, 7]),
    ("m9", &[0, 3, 7, 10, 14]),
    ("M7#5", &[0, 4, 8, 11]),
    ("m7(11)", &[0, 3, 7, 10, 17]),
    ("(b9)", &[0, 4, 7, 13]),
    ("(b13)", &[0, 4, 7, 20]),
];

/// Accepted quality symbols, sorted by byte order for binary search.
/// Each entry points at a formula row.
const CHORD_ALIASES: &[(&str, usize)] = &[
    ("(9)", 26),
    ("(b13)", 41),
    ("(b9)", 40),
    ("+", 16),
    ("+M7", 38),
    ("11", 12),
    ("13", 19),
    ("13(#11)", 20),
    ("5", 25),
    ("6", 2),
    ("6(9)", 3),
    ("7", 10),
    ("7#5", 17),
    ("7(#11)", 24),
    ("7(9)", 11),
    ("7(b5)", 18),
    ("7(b9)", 23),
    ("7+5", 21),
    ("7+9", 22),
    ("7/9", 11),
    ("7M", 1),
    ("7M(#5)", 38),
    ("9", 11),
    ("M", 0),
    ("M13", 35),
    ("M6", 2),
    ("M7#5", 38),
    ("M9", 4),
    ("add11", 28),
    ("add2", 27),
    ("add4", 29),
    ("add9", 26),
    ("aug", 16),
    ("dim", 13),
    ("dim7", 14),
    ("dom7", 10),
    ("m", 5),
    ("m11", 8),
    ("m13", 34),
    ("m6", 7),
    ("m7", 6),
    ("m7(11)", 39),
    ("m7(b5)", 15),
    ("m7M", 9),
    ("m9", 37),
    ("mM7", 9),
    ("maj", 0),
    ("maj13", 35),
    ("maj7", 1),
    ("maj9", 4),
    ("mi", 5),
    ("min", 5),
    ("min7", 6),
    ("sus", 36),
    ("sus2", 30),
    ("sus4", 31),
    ("sus7", 32),
    ("sus9", 33),
];

/// Errors when parsing chord symbols and note names
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ChordError {
    /// The input was empty.
    #[error("empty chord or note name")]
    Empty,

    /// The root note could not be read.
    #[error("unknown note name `{name}`")]
    UnknownNote {
        /// The text that failed to parse.
        name: String,
    },

    /// The quality suffix is not in the symbol table.
    #[error("unknown chord quality `{symbol}`")]
    UnknownQuality {
        /// The suffix that failed to resolve.
        symbol: String,
    },
}

/// Supported chord qualities, one per formula row
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ChordKind {
    /// Major triad (C-E-G)
    Major,
    /// Major seventh (C-E-G-B)
    MajorSeventh,
    /// Major sixth (C-E-G-A)
    Sixth,
    /// Six-nine (C-E-G-A-D)
    SixNine,
    /// Major ninth (C-E-G-B-D)
    MajorNinth,
    /// Minor triad (C-Eb-G)
    Minor,
    /// Minor seventh (C-Eb-G-Bb)
    MinorSeventh,
    /// Minor sixth (C-Eb-G-A)
    MinorSixth,
    /// Minor eleventh (C-Eb-G-Bb-F)
    MinorEleventh,
    /// Minor-major seventh (C-Eb-G-B)
    MinorMajorSeventh,
    /// Dominant seventh (C-E-G-Bb)
    DominantSeventh,
    /// Dominant ninth (C-E-G-Bb-D)
    DominantNinth,
    /// Dominant eleventh (C-E-G-Bb-D-F)
    DominantEleventh,
    /// Diminished triad (C-Eb-Gb)
    Diminished,
    /// Diminished seventh (C-Eb-Gb-A)
    DiminishedSeventh,
    /// Half-diminished seventh (C-Eb-Gb-Bb)
    HalfDiminished,
    /// Augmented triad (C-E-G#)
    Augmented,
    /// Augmented seventh (C-E-G#-Bb)
    AugmentedSeventh,
    /// Seventh with flat fifth (C-E-Gb-Bb)
    SeventhFlatFive,
    /// Dominant thirteenth (C-E-G-Bb-D-F-A)
    DominantThirteenth,
    /// Thirteenth with sharp eleventh (C-E-G-Bb-D-F#-A)
    ThirteenthSharpEleven,
    /// Augmented seventh, `7+5` spelling
    SeventhPlusFive,
    /// Seventh with sharp ninth (C-E-G-Bb-D#)
    SeventhSharpNine,
    /// Seventh with flat ninth (C-E-G-Bb-Db)
    SeventhFlatNine,
    /// Seventh with sharp eleventh (C-E-G-Bb-F#)
    SeventhSharpEleven,
    /// Power chord (C-G)
    PowerFifth,
    /// Added ninth (C-E-G-D)
    AddNine,
    /// Added second (C-D-E-G)
    AddSecond,
    /// Added eleventh (C-E-G-F)
    AddEleven,
    /// Added fourth (C-E-F-G)
    AddFourth,
    /// Suspended second (C-D-G)
    SuspendedSecond,
    /// Suspended fourth (C-F-G)
    SuspendedFourth,
    /// Seventh suspended fourth (C-F-G-Bb)
    SuspendedSeventh,
    /// Suspended fourth with ninth (C-F-G-D)
    SuspendedNinth,
    /// Minor thirteenth (C-Eb-G-Bb-D-F-A)
    MinorThirteenth,
    /// Major thirteenth (C-E-G-B-D-F#-A)
    MajorThirteenth,
    /// Suspended fourth, bare `sus` spelling
    Suspended,
    /// Minor ninth (C-Eb-G-Bb-D)
    MinorNinth,
    /// Major seventh with sharp fifth (C-E-G#-B)
    MajorSeventhSharpFive,
    /// Minor seventh with eleventh (C-Eb-G-Bb-F)
    MinorSeventhEleven,
    /// Major triad with added flat ninth (C-E-G-Db)
    AddFlatNine,
    /// Major triad with added flat thirteenth (C-E-G-Ab)
    AddFlatThirteen,
}

impl ChordKind {
    /// All qualities in formula-table order.
    pub const ALL: [ChordKind; NUM_CHORD_KINDS] = CHORD_KINDS;

    /// Canonical symbol, e.g. `"m7"`.
    pub const fn symbol(self) -> &'static str {
        CHORD_FORMULAS[self as usize].0
    }

    /// Semitone offsets from the root, in formula order.
    pub const fn intervals(self) -> &'static [u8] {
        CHORD_FORMULAS[self as usize].1
    }

    /// Number of chord tones.
    pub const fn size(self) -> u8 {
        self.intervals().len() as u8
    }

    /// Resolve a quality symbol or one of its aliases.
    pub fn from_symbol(symbol: &str) -> Option<ChordKind> {
        CHORD_ALIASES
            .binary_search_by(|(name, _)| (*name).cmp(symbol))
            .ok()
            .map(|i| CHORD_KINDS[CHORD_ALIASES[i].1])
    }

    /// Pitch-class set of the formula rooted on C.
    pub fn reduced(self) -> PitchClassSet {
        self.intervals().iter().copied().collect()
    }
}

impl Display for ChordKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.symbol())
    }
}

/// A chord named by its root and quality.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Chord {
    /// The root note of the chord.
    pub root: NoteName,
    /// The quality (e.g., Major, Minor) of the chord.
    pub quality: ChordKind,
}

impl Chord {
    /// Create a chord from its parts.
    pub const fn new(root: NoteName, quality: ChordKind) -> Self {
        Chord { root, quality }
    }

    /// Full name: root followed by the quality symbol ("CM", "F#m7").
    pub fn name(&self) -> String {
        self.to_string()
    }

    /// Number of chord tones.
    pub const fn size(&self) -> u8 {
        self.quality.size()
    }

    /// Pitch classes of the chord tones in formula order.
    pub fn pitch_classes(&self) -> Vec<u8> {
        let root = self.root.index();
        self.quality
            .intervals()
            .iter()
            .map(|&i| (root + i) % SEMITONES)
            .collect()
    }

    /// Pitch-class set of the chord tones.
    pub fn mask(&self) -> PitchClassSet {
        self.quality.reduced().rotate(self.root.index())
    }

    /// Offsets from the root reduced into one octave.
    pub fn interval_mask(&self) -> PitchClassSet {
        self.quality.reduced()
    }

    /// `Some(true)` for a plain major triad, `Some(false)` for a plain minor
    /// triad, `None` otherwise.
    pub const fn triad_mode(&self) -> Option<bool> {
        match self.quality {
            ChordKind::Major => Some(true),
            ChordKind::Minor => Some(false),
            _ => None,
        }
    }
}

impl Display for Chord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.root, self.quality)
    }
}

impl FromStr for Chord {
    type Err = ChordError;

    /// Parses "C", "Am7", "Bbmaj7", "F#m7(b5)". A bare root is a major triad.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(ChordError::Empty);
        }
        let split = s
            .char_indices()
            .skip(1)
            .find(|&(_, c)| c != '#' && c != 'b')
            .map_or(s.len(), |(i, _)| i);
        let (root, symbol) = s.split_at(split);
        let root: NoteName = root.parse()?;
        let quality = if symbol.is_empty() {
            ChordKind::Major
        } else {
            ChordKind::from_symbol(symbol).ok_or_else(|| ChordError::UnknownQuality {
                symbol: symbol.to_string(),
            })?
        };
        Ok(Chord { root, quality })
    }
}

/// Names a set of sounding pitch classes.
///
/// Implementations receive pitch classes in activation order; the first
/// entry is the presumed root.
pub trait ChordNamer {
    /// Return the chord the pitch classes spell, if any.
    fn identify(&self, pitch_classes: &[u8]) -> Option<Chord>;
}

impl<F> ChordNamer for F
where
    F: Fn(&[u8]) -> Option<Chord>,
{
    fn identify(&self, pitch_classes: &[u8]) -> Option<Chord> {
        self(pitch_classes)
    }
}

/// Exact formula lookup over the chord table
#[derive(Debug, Clone)]
pub struct FormulaNamer {
    reduced: [PitchClassSet; NUM_CHORD_KINDS],
}

impl FormulaNamer {
    /// Create a namer with precomputed reduced formulas.
    pub fn new() -> Self {
        let mut reduced = [PitchClassSet::EMPTY; NUM_CHORD_KINDS];
        for (slot, kind) in reduced.iter_mut().zip(CHORD_KINDS) {
            *slot = kind.reduced();
        }
        FormulaNamer { reduced }
    }

    /// First formula row whose reduced set equals `relative` (rooted on C).
    fn lookup(&self, relative: PitchClassSet) -> Option<ChordKind> {
        self.reduced
            .iter()
            .position(|&r| r == relative)
            .map(|i| CHORD_KINDS[i])
    }
}

impl Default for FormulaNamer {
    fn default() -> Self {
        FormulaNamer::new()
    }
}

impl ChordNamer for FormulaNamer {
    fn identify(&self, pitch_classes: &[u8]) -> Option<Chord> {
        let set: PitchClassSet = pitch_classes.iter().copied().collect();
        if set.len() < 2 {
            return None;
        }

        // Presumed root first, then the other members in arrival order.
        let mut tried = PitchClassSet::EMPTY;
        for &pc in pitch_classes {
            let pc = pc % SEMITONES;
            if tried.contains(pc) {
                continue;
            }
            tried.insert(pc);
            let relative = set.rotate(SEMITONES - pc);
            if let Some(quality) = self.lookup(relative) {
                return Some(Chord::new(NoteName::from_index(pc), quality));
            }
        }
        None
    }
}
