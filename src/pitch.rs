//! Pitch
//!
//! Key numbers, sharp-spelled pitch classes and 12-bit pitch-class sets.

use std::fmt::Display;
use std::str::FromStr;

use crate::chord::ChordError;

/// Number of pitch classes in an octave.
pub const SEMITONES: u8 = 12;

const PC_MASK: u16 = 0x0FFF;

/// Sharp spelling of each chromatic index, as used in chord and field names.
const CHROMATIC_NAMES: [&str; SEMITONES as usize] = [
    "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
];

/// A MIDI key number (0..=127), octave-qualified.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Pitch(u8);

impl Pitch {
    /// Create a pitch from a key number. The high bit is discarded.
    pub const fn new(key: u8) -> Self {
        Pitch(key & 0x7F)
    }

    /// The raw key number.
    pub const fn key(self) -> u8 {
        self.0
    }

    /// Pitch class index (0 = C .. 11 = B).
    pub const fn class(self) -> u8 {
        self.0 % SEMITONES
    }

    /// Octave number with key 60 in octave 4.
    pub const fn octave(self) -> i8 {
        (self.0 / SEMITONES) as i8 - 1
    }

    /// Pitch class as a note name.
    pub const fn name(self) -> NoteName {
        NoteName::from_index(self.0)
    }
}

impl Display for Pitch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.name(), self.octave())
    }
}

impl From<u8> for Pitch {
    fn from(key: u8) -> Self {
        Pitch::new(key)
    }
}

/// Twelve chromatic pitch classes
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum NoteName {
    /// C
    C,
    /// C sharp / D flat
    Cs,
    /// D
    D,
    /// D sharp / E flat
    Ds,
    /// E
    E,
    /// F
    F,
    /// F sharp / G flat
    Fs,
    /// G
    G,
    /// G sharp / A flat
    Gs,
    /// A
    A,
    /// A sharp / B flat
    As,
    /// B
    B,
}

impl NoteName {
    /// All pitch classes in chromatic order starting from C.
    pub const ALL: [NoteName; SEMITONES as usize] = [
        NoteName::C,
        NoteName::Cs,
        NoteName::D,
        NoteName::Ds,
        NoteName::E,
        NoteName::F,
        NoteName::Fs,
        NoteName::G,
        NoteName::Gs,
        NoteName::A,
        NoteName::As,
        NoteName::B,
    ];

    /// Pitch class for a chromatic index, wrapping at the octave.
    pub const fn from_index(idx: u8) -> NoteName {
        Self::ALL[(idx % SEMITONES) as usize]
    }

    /// Chromatic index (0 = C .. 11 = B).
    pub const fn index(self) -> u8 {
        self as u8
    }

    /// Natural letter of the sharp spelling.
    pub const fn letter(self) -> char {
        match self {
            NoteName::C | NoteName::Cs => 'C',
            NoteName::D | NoteName::Ds => 'D',
            NoteName::E => 'E',
            NoteName::F | NoteName::Fs => 'F',
            NoteName::G | NoteName::Gs => 'G',
            NoteName::A | NoteName::As => 'A',
            NoteName::B => 'B',
        }
    }

    /// Whether the sharp spelling carries an accidental.
    pub const fn is_sharp(self) -> bool {
        matches!(
            self,
            NoteName::Cs | NoteName::Ds | NoteName::Fs | NoteName::Gs | NoteName::As
        )
    }

    /// Sharp-spelled name ("C", "C#", ...).
    pub const fn as_str(self) -> &'static str {
        CHROMATIC_NAMES[self as usize]
    }
}

impl Display for NoteName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NoteName {
    type Err = ChordError;

    /// Accepts a natural letter followed by any run of `#` or `b`, so that
    /// "Db", "C#", "B#" and "Ebb" all resolve to their pitch class.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        let base: i16 = match chars.next() {
            Some('C') => 0,
            Some('D') => 2,
            Some('E') => 4,
            Some('F') => 5,
            Some('G') => 7,
            Some('A') => 9,
            Some('B') => 11,
            Some(_) => return Err(ChordError::UnknownNote { name: s.to_string() }),
            None => return Err(ChordError::Empty),
        };
        let mut shift = 0i16;
        for c in chars {
            match c {
                '#' => shift += 1,
                'b' => shift -= 1,
                _ => return Err(ChordError::UnknownNote { name: s.to_string() }),
            }
        }
        Ok(NoteName::from_index((base + shift).rem_euclid(12) as u8))
    }
}

impl From<Pitch> for NoteName {
    fn from(p: Pitch) -> Self {
        p.name()
    }
}

/// A set of pitch classes stored as a 12-bit mask (bit i = pitch class i).
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash)]
pub struct PitchClassSet(u16);

impl PitchClassSet {
    /// The empty set.
    pub const EMPTY: PitchClassSet = PitchClassSet(0);

    /// Build a set from a raw mask; bits above 11 are ignored.
    pub const fn from_mask(mask: u16) -> Self {
        PitchClassSet(mask & PC_MASK)
    }

    /// Raw 12-bit mask.
    pub const fn mask(self) -> u16 {
        self.0
    }

    /// Add a pitch class (taken modulo 12).
    pub fn insert(&mut self, pc: u8) {
        self.0 |= 1 << (pc % SEMITONES);
    }

    /// Whether the pitch class (taken modulo 12) is present.
    pub const fn contains(self, pc: u8) -> bool {
        self.0 & (1 << (pc % SEMITONES)) != 0
    }

    /// Number of pitch classes present.
    pub const fn len(self) -> u8 {
        self.0.count_ones() as u8
    }

    /// Whether no pitch class is present.
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Transpose every member up by `n` semitones.
    pub const fn rotate(self, n: u8) -> Self {
        let n = (n % SEMITONES) as u32;
        let m = self.0 as u32;
        PitchClassSet((((m << n) | (m >> (SEMITONES as u32 - n))) as u16) & PC_MASK)
    }

    /// Members in ascending order.
    pub fn iter(self) -> impl Iterator<Item = u8> {
        (0..SEMITONES).filter(move |&pc| self.contains(pc))
    }

    /// Interval-class vector: entry i counts unordered pairs a whole
    /// interval class (i + 1) apart.
    pub fn interval_vector(self) -> [u8; 6] {
        let mut iv = [0u8; 6];
        for i in 0..SEMITONES {
            if !self.contains(i) {
                continue;
            }
            for j in (i + 1)..SEMITONES {
                if !self.contains(j) {
                    continue;
                }
                let d = j - i;
                let ic = d.min(SEMITONES - d);
                iv[(ic - 1) as usize] += 1;
            }
        }
        iv
    }
}

impl FromIterator<u8> for PitchClassSet {
    fn from_iter<I: IntoIterator<Item = u8>>(iter: I) -> Self {
        let mut set = PitchClassSet::EMPTY;
        for pc in iter {
            set.insert(pc);
        }
        set
    }
}

/// Shortest distance between two pitch classes on the chromatic circle (0..=6).
pub const fn chromatic_distance(a: u8, b: u8) -> u8 {
    let d = (b % SEMITONES + SEMITONES - a % SEMITONES) % SEMITONES;
    if d > 6 {
        SEMITONES - d
    } else {
        d
    }
}
