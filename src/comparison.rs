//! Comparison
//!
//! Pairwise relations between two named chords: shared tones, root motion,
//! set relations, transposition, voice-leading distance and neo-Riemannian
//! transformations.

use std::fmt::Display;

use crate::chord::{Chord, ChordKind};
use crate::pitch::{chromatic_distance, NoteName, PitchClassSet, SEMITONES};

/// Largest chord size searched by exhaustive permutation.
const PERMUTATION_LIMIT: usize = 7;

/// How the pitch-class sets of two chords contain each other.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum SubsetRelation {
    /// Neither set contains the other.
    Neither,
    /// Every tone of A is in B, B has more.
    AInB,
    /// Every tone of B is in A, A has more.
    BInA,
    /// Same pitch-class set.
    Equal,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum Step {
    Parallel,
    LeadingTone,
    Relative,
}

impl Step {
    /// Apply to a triad given as (root, is_major).
    const fn apply(self, root: u8, major: bool) -> (u8, bool) {
        let shift = match (self, major) {
            (Step::Parallel, _) => 0,
            (Step::LeadingTone, true) => 4,
            (Step::LeadingTone, false) => 8,
            (Step::Relative, true) => 9,
            (Step::Relative, false) => 3,
        };
        ((root + shift) % SEMITONES, !major)
    }
}

/// Neo-Riemannian transformation between two major or minor triads.
///
/// Compound variants apply their first letter first: `RelativeParallel`
/// is R followed by P.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Transformation {
    /// P: same root, major and minor swapped.
    Parallel,
    /// L: leading-tone exchange.
    LeadingTone,
    /// R: relative major or minor.
    Relative,
    /// R then P
    RelativeParallel,
    /// R then L
    RelativeLeadingTone,
    /// L then P
    LeadingToneParallel,
    /// L then R
    LeadingToneRelative,
    /// P then R
    ParallelRelative,
    /// P then L
    ParallelLeadingTone,
}

impl Transformation {
    /// Every transformation in search order: single steps, then compounds.
    pub const ALL: [Transformation; 9] = [
        Transformation::Parallel,
        Transformation::LeadingTone,
        Transformation::Relative,
        Transformation::RelativeParallel,
        Transformation::RelativeLeadingTone,
        Transformation::LeadingToneParallel,
        Transformation::LeadingToneRelative,
        Transformation::ParallelRelative,
        Transformation::ParallelLeadingTone,
    ];

    const fn steps(self) -> &'static [Step] {
        use Step::*;
        match self {
            Transformation::Parallel => &[Parallel],
            Transformation::LeadingTone => &[LeadingTone],
            Transformation::Relative => &[Relative],
            Transformation::RelativeParallel => &[Relative, Parallel],
            Transformation::RelativeLeadingTone => &[Relative, LeadingTone],
            Transformation::LeadingToneParallel => &[LeadingTone, Parallel],
            Transformation::LeadingToneRelative => &[LeadingTone, Relative],
            Transformation::ParallelRelative => &[Parallel, Relative],
            Transformation::ParallelLeadingTone => &[Parallel, LeadingTone],
        }
    }

    /// Short name in application order ("P", "RL", ...).
    pub const fn name(self) -> &'static str {
        match self {
            Transformation::Parallel => "P",
            Transformation::LeadingTone => "L",
            Transformation::Relative => "R",
            Transformation::RelativeParallel => "RP",
            Transformation::RelativeLeadingTone => "RL",
            Transformation::LeadingToneParallel => "LP",
            Transformation::LeadingToneRelative => "LR",
            Transformation::ParallelRelative => "PR",
            Transformation::ParallelLeadingTone => "PL",
        }
    }

    /// Apply to a chord. Only plain major and minor triads transform.
    pub fn apply(self, chord: &Chord) -> Option<Chord> {
        let major = chord.triad_mode()?;
        let (root, major) = self
            .steps()
            .iter()
            .fold((chord.root.index(), major), |(r, m), step| step.apply(r, m));
        let quality = if major {
            ChordKind::Major
        } else {
            ChordKind::Minor
        };
        Some(Chord::new(NoteName::from_index(root), quality))
    }

    /// First transformation, in search order, taking `a` to `b`.
    pub fn between(a: &Chord, b: &Chord) -> Option<Transformation> {
        b.triad_mode()?;
        Transformation::ALL
            .into_iter()
            .find(|t| t.apply(a).as_ref() == Some(b))
    }
}

impl Display for Transformation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Everything derivable from a pair of chords.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct ChordComparison {
    /// Pitch classes in both chords.
    pub shared: PitchClassSet,
    /// Pitch classes only in A.
    pub exclusive_a: PitchClassSet,
    /// Pitch classes only in B.
    pub exclusive_b: PitchClassSet,
    /// Size of `shared`.
    pub shared_count: u8,
    /// Shortest root motion in semitones (0..=6).
    pub root_distance: u8,
    /// Signed root motion from A to B, normalized to -5..=6.
    pub root_direction: i8,
    /// Same quality.
    pub same_quality: bool,
    /// Same number of chord tones.
    pub same_size: bool,
    /// Offsets from the root common to both chords.
    pub shared_intervals: PitchClassSet,
    /// Same pitch-class set, whatever the spelling.
    pub enharmonic: bool,
    /// Containment between the two sets.
    pub subset: SubsetRelation,
    /// Same pitch-class set on different roots.
    pub inversion: bool,
    /// Smallest upward shift taking A's set onto B's.
    pub transposition: Option<u8>,
    /// Minimal total voice movement; `None` when sizes differ.
    pub voice_leading: Option<u32>,
    /// Neo-Riemannian relation, triads only.
    pub transformation: Option<Transformation>,
    /// Interval-class vector of A.
    pub interval_vector_a: [u8; 6],
    /// Interval-class vector of B.
    pub interval_vector_b: [u8; 6],
    /// The two interval-class vectors match.
    pub same_interval_vector: bool,
}

impl ChordComparison {
    /// Compare chord `a` against chord `b`.
    pub fn compute(a: &Chord, b: &Chord) -> Self {
        let mask_a = a.mask();
        let mask_b = b.mask();
        let shared = PitchClassSet::from_mask(mask_a.mask() & mask_b.mask());

        let root_a = a.root.index();
        let root_b = b.root.index();
        let up = (root_b + SEMITONES - root_a) % SEMITONES;
        let root_direction = if up > 6 {
            up as i8 - SEMITONES as i8
        } else {
            up as i8
        };

        let subset = match (shared == mask_a, shared == mask_b) {
            (true, true) => SubsetRelation::Equal,
            (true, false) => SubsetRelation::AInB,
            (false, true) => SubsetRelation::BInA,
            (false, false) => SubsetRelation::Neither,
        };

        let interval_vector_a = mask_a.interval_vector();
        let interval_vector_b = mask_b.interval_vector();

        ChordComparison {
            shared,
            exclusive_a: PitchClassSet::from_mask(mask_a.mask() & !mask_b.mask()),
            exclusive_b: PitchClassSet::from_mask(mask_b.mask() & !mask_a.mask()),
            shared_count: shared.len(),
            root_distance: root_direction.unsigned_abs(),
            root_direction,
            same_quality: a.quality == b.quality,
            same_size: a.size() == b.size(),
            shared_intervals: PitchClassSet::from_mask(
                a.interval_mask().mask() & b.interval_mask().mask(),
            ),
            enharmonic: mask_a == mask_b,
            subset,
            inversion: mask_a == mask_b && root_a != root_b,
            transposition: transposition(mask_a, mask_b),
            voice_leading: voice_leading(&a.pitch_classes(), &b.pitch_classes()),
            transformation: Transformation::between(a, b),
            interval_vector_a,
            interval_vector_b,
            same_interval_vector: interval_vector_a == interval_vector_b,
        }
    }
}

/// Smallest `n` in 0..12 with `a` rotated up by `n` equal to `b`.
pub fn transposition(a: PitchClassSet, b: PitchClassSet) -> Option<u8> {
    (0..SEMITONES).find(|&n| a.rotate(n) == b)
}

/// Minimal total shortest-arc movement pairing every pitch class of `a`
/// with a distinct one of `b`.
///
/// Returns `None` when the two sides have different lengths. Up to seven
/// notes the pairings are searched exhaustively; larger inputs are solved
/// as a minimum-weight assignment.
pub fn voice_leading(a: &[u8], b: &[u8]) -> Option<u32> {
    if a.len() != b.len() {
        return None;
    }
    let mut a: Vec<u8> = a.iter().map(|&p| p % SEMITONES).collect();
    let mut b: Vec<u8> = b.iter().map(|&p| p % SEMITONES).collect();
    a.sort_unstable();
    b.sort_unstable();

    if a.len() <= PERMUTATION_LIMIT {
        let mut used = [false; PERMUTATION_LIMIT];
        let mut best = u32::MAX;
        search_pairings(&a, &b, 0, 0, &mut used, &mut best);
        Some(best)
    } else {
        Some(min_cost_assignment(&a, &b))
    }
}

fn search_pairings(a: &[u8], b: &[u8], depth: usize, cost: u32, used: &mut [bool], best: &mut u32) {
    if cost >= *best {
        return;
    }
    if depth == a.len() {
        *best = cost;
        return;
    }
    for (j, &pb) in b.iter().enumerate() {
        if used[j] {
            continue;
        }
        used[j] = true;
        let step = chromatic_distance(a[depth], pb) as u32;
        search_pairings(a, b, depth + 1, cost + step, used, best);
        used[j] = false;
        if *best == 0 {
            return;
        }
    }
}

/// Hungarian method over the square distance matrix of `a` x `b`.
#[allow(clippy::needless_range_loop)]
fn min_cost_assignment(a: &[u8], b: &[u8]) -> u32 {
    let n = a.len();
    let cost = |i: usize, j: usize| chromatic_distance(a[i - 1], b[j - 1]) as i64;

    // 1-indexed potentials; column 0 is the virtual start.
    let mut u = vec![0i64; n + 1];
    let mut v = vec![0i64; n + 1];
    let mut row_of = vec![0usize; n + 1];
    let mut way = vec![0usize; n + 1];

    for i in 1..=n {
        row_of[0] = i;
        let mut j0 = 0;
        let mut min_v = vec![i64::MAX; n + 1];
        let mut used = vec![false; n + 1];
        loop {
            used[j0] = true;
            let i0 = row_of[j0];
            let mut delta = i64::MAX;
            let mut j1 = 0;
            for j in 1..=n {
                if used[j] {
                    continue;
                }
                let reduced = cost(i0, j) - u[i0] - v[j];
                if reduced < min_v[j] {
                    min_v[j] = reduced;
                    way[j] = j0;
                }
                if min_v[j] < delta {
                    delta = min_v[j];
                    j1 = j;
                }
            }
            for j in 0..=n {
                if used[j] {
                    u[row_of[j]] += delta;
                    v[j] -= delta;
                } else {
                    min_v[j] -= delta;
                }
            }
            j0 = j1;
            if row_of[j0] == 0 {
                break;
            }
        }
        loop {
            let j1 = way[j0];
            row_of[j0] = row_of[j1];
            j0 = j1;
            if j0 == 0 {
                break;
            }
        }
    }

    (1..=n).map(|j| cost(row_of[j], j) as u32).sum()
}
