//! Harmonic Monitor
//!
//! Tracks the sounding pitches of a performance and keeps the best chord
//! name and harmonic field for them, notifying observers only on change.
//!
//! All state belongs to one [`HarmonicMonitor`]; every entry point is a
//! synchronous, total function of the current state plus one event, and
//! callbacks run on the caller's stack before the entry point returns.

use log::{debug, warn};
use thiserror::Error;

use crate::chord::{Chord, ChordNamer, FormulaNamer};
use crate::field::{Field, FieldDeducer, NoteContext, ScaleDeducer};
use crate::pitch::{NoteName, Pitch};

/// Upper bound on simultaneously tracked pitches.
pub const MAX_ACTIVE: usize = 16;

/// Callback fired when a new chord is identified.
pub type ChordCallback = Box<dyn FnMut(&Chord) + Send>;

/// Callback fired when a new field is deduced.
pub type FieldCallback = Box<dyn FnMut(&Field) + Send>;

/// Callback fired on every activation with that pitch's context.
pub type NoteCallback = Box<dyn FnMut(&NoteContext) + Send>;

/// Errors when configuring a monitor
#[derive(Debug, Error)]
pub enum MonitorError {
    /// An invalid argument was provided to the builder.
    #[error("invalid argument `{arg}`: {msg}")]
    InvalidArgument {
        /// The name of the invalid argument.
        arg: &'static str,
        /// A description of the invalid argument.
        msg: String,
    },
}

/// What a decoded transport message asks the monitor to do.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Intent {
    /// A key went down.
    Activate {
        /// The key.
        pitch: Pitch,
        /// Velocity in the 7-bit domain (1..=127).
        velocity: u8,
    },
    /// A key came up.
    Release {
        /// The key.
        pitch: Pitch,
    },
    /// Sustain pedal pressed (`true`) or lifted (`false`).
    Sustain(bool),
    /// Drop everything (All Notes Off).
    ClearAll,
}

/// One tracked pitch.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct ActiveNote {
    /// The sounding key.
    pub pitch: Pitch,
    /// Velocity it was struck with.
    pub velocity: u8,
    /// Released while the pedal was down; kept until the pedal lifts.
    pub sustained: bool,
}

/// Builder for `HarmonicMonitor` to customize capacity, lookup engines and callbacks
pub struct MonitorBuilder {
    capacity: usize,
    namer: Box<dyn ChordNamer + Send>,
    deducer: Box<dyn FieldDeducer + Send>,
    on_chord: Option<ChordCallback>,
    on_field: Option<FieldCallback>,
    on_note: Option<NoteCallback>,
}

impl MonitorBuilder {
    /// Start with capacity = 16, the formula chord namer and the scale deducer.
    pub fn new() -> Self {
        MonitorBuilder {
            capacity: MAX_ACTIVE,
            namer: Box::new(FormulaNamer::new()),
            deducer: Box::new(ScaleDeducer::new()),
            on_chord: None,
            on_field: None,
            on_note: None,
        }
    }

    /// Set the maximum number of tracked pitches (1..=16).
    pub fn capacity(mut self, n: usize) -> Self {
        self.capacity = n;
        self
    }

    /// Replace the chord-naming engine.
    pub fn namer(mut self, namer: impl ChordNamer + Send + 'static) -> Self {
        self.namer = Box::new(namer);
        self
    }

    /// Replace the field-deduction engine.
    pub fn deducer(mut self, deducer: impl FieldDeducer + Send + 'static) -> Self {
        self.deducer = Box::new(deducer);
        self
    }

    /// Register the chord-changed callback.
    pub fn on_chord(mut self, f: impl FnMut(&Chord) + Send + 'static) -> Self {
        self.on_chord = Some(Box::new(f));
        self
    }

    /// Register the field-changed callback.
    pub fn on_field(mut self, f: impl FnMut(&Field) + Send + 'static) -> Self {
        self.on_field = Some(Box::new(f));
        self
    }

    /// Register the per-note callback.
    pub fn on_note(mut self, f: impl FnMut(&NoteContext) + Send + 'static) -> Self {
        self.on_note = Some(Box::new(f));
        self
    }

    /// Build the `HarmonicMonitor`.
    pub fn build(self) -> Result<HarmonicMonitor, MonitorError> {
        if self.capacity == 0 || self.capacity > MAX_ACTIVE {
            return Err(MonitorError::InvalidArgument {
                arg: "capacity",
                msg: format!("must be within 1..={MAX_ACTIVE}, got {}", self.capacity),
            });
        }

        Ok(HarmonicMonitor {
            capacity: self.capacity,
            active: Vec::with_capacity(self.capacity),
            sustain: false,
            chord: None,
            field: None,
            namer: self.namer,
            deducer: self.deducer,
            on_chord: self.on_chord,
            on_field: self.on_field,
            on_note: self.on_note,
        })
    }
}

impl Default for MonitorBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Event-driven harmonic state tracker
pub struct HarmonicMonitor {
    capacity: usize,
    active: Vec<ActiveNote>,
    sustain: bool,
    chord: Option<Chord>,
    field: Option<Field>,
    namer: Box<dyn ChordNamer + Send>,
    deducer: Box<dyn FieldDeducer + Send>,
    on_chord: Option<ChordCallback>,
    on_field: Option<FieldCallback>,
    on_note: Option<NoteCallback>,
}

impl HarmonicMonitor {
    /// Return a builder to customize the monitor
    pub fn builder() -> MonitorBuilder {
        MonitorBuilder::new()
    }

    /// Create a monitor with default capacity and lookup engines, no callbacks.
    pub fn new() -> Self {
        HarmonicMonitor {
            capacity: MAX_ACTIVE,
            active: Vec::with_capacity(MAX_ACTIVE),
            sustain: false,
            chord: None,
            field: None,
            namer: Box::new(FormulaNamer::new()),
            deducer: Box::new(ScaleDeducer::new()),
            on_chord: None,
            on_field: None,
            on_note: None,
        }
    }

    /// Replace the chord-changed callback.
    pub fn on_chord(&mut self, f: impl FnMut(&Chord) + Send + 'static) {
        self.on_chord = Some(Box::new(f));
    }

    /// Replace the field-changed callback.
    pub fn on_field(&mut self, f: impl FnMut(&Field) + Send + 'static) {
        self.on_field = Some(Box::new(f));
    }

    /// Replace the per-note callback.
    pub fn on_note(&mut self, f: impl FnMut(&NoteContext) + Send + 'static) {
        self.on_note = Some(Box::new(f));
    }

    /// Route a decoded intent to the matching entry point.
    pub fn apply(&mut self, intent: Intent) {
        match intent {
            Intent::Activate { pitch, velocity } => self.activate(pitch, velocity),
            Intent::Release { pitch } => self.release(pitch),
            Intent::Sustain(true) => self.sustain_on(),
            Intent::Sustain(false) => self.sustain_off(),
            Intent::ClearAll => self.clear(),
        }
    }

    /// A key went down.
    ///
    /// Adds the pitch if it is new and there is room, re-evaluating when the
    /// set changed. The per-note callback fires on every call, including
    /// repeats and activations dropped for lack of room.
    pub fn activate(&mut self, pitch: impl Into<Pitch>, velocity: u8) {
        let pitch = pitch.into();

        if let Some(note) = self.active.iter_mut().find(|n| n.pitch == pitch) {
            // Struck again: the key is held, no longer only sustained.
            note.sustained = false;
        } else if self.active.len() < self.capacity {
            self.active.push(ActiveNote {
                pitch,
                velocity,
                sustained: false,
            });
            self.evaluate();
        } else {
            warn!("active set full ({}), dropping {pitch}", self.capacity);
        }

        let ctx = match self.field {
            Some(field) => field.note_context(pitch),
            None => NoteContext::neutral(pitch),
        };
        if let Some(cb) = self.on_note.as_mut() {
            cb(&ctx);
        }
    }

    /// A key came up.
    ///
    /// With the pedal down the pitch is only marked sustained and nothing is
    /// re-evaluated.
    pub fn release(&mut self, pitch: impl Into<Pitch>) {
        let pitch = pitch.into();

        if self.sustain {
            if let Some(note) = self.active.iter_mut().find(|n| n.pitch == pitch) {
                note.sustained = true;
            }
            return;
        }

        let before = self.active.len();
        self.active.retain(|n| n.pitch != pitch);
        if self.active.len() != before {
            self.evaluate();
        }
    }

    /// Pedal down.
    pub fn sustain_on(&mut self) {
        self.sustain = true;
    }

    /// Pedal up: drop every pitch released while it was down and re-evaluate.
    pub fn sustain_off(&mut self) {
        self.sustain = false;
        self.active.retain(|n| !n.sustained);
        self.evaluate();
    }

    /// Hard reset of pitches, pedal, chord and field. Fires nothing.
    pub fn clear(&mut self) {
        debug!("clearing {} active pitches", self.active.len());
        self.active.clear();
        self.sustain = false;
        self.chord = None;
        self.field = None;
    }

    /// Number of tracked pitches, sustained ones included.
    pub fn active_count(&self) -> usize {
        self.active.len()
    }

    /// Tracked pitches in activation order.
    pub fn active(&self) -> &[ActiveNote] {
        &self.active
    }

    /// Configured capacity.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Whether the pedal is down.
    pub fn is_sustained(&self) -> bool {
        self.sustain
    }

    /// Whether a chord is currently identified.
    pub fn has_chord(&self) -> bool {
        self.chord.is_some()
    }

    /// The identified chord, if any.
    pub fn chord(&self) -> Option<&Chord> {
        self.chord.as_ref()
    }

    /// Whether a field is currently deduced.
    pub fn has_field(&self) -> bool {
        self.field.is_some()
    }

    /// The deduced field, if any.
    pub fn field(&self) -> Option<&Field> {
        self.field.as_ref()
    }

    /// Re-derive chord and field from the active set, firing on change.
    ///
    /// A chord that stops being identifiable clears silently, and takes the
    /// field with it.
    fn evaluate(&mut self) {
        let count = self.active.len();
        let mut classes = [0u8; MAX_ACTIVE];
        for (slot, note) in classes.iter_mut().zip(&self.active) {
            *slot = note.pitch.class();
        }

        let chord = if count >= 2 {
            self.namer.identify(&classes[..count])
        } else {
            None
        };

        if let Some(new) = chord {
            if self.chord != Some(new) {
                debug!("chord -> {new}");
                if let Some(cb) = self.on_chord.as_mut() {
                    cb(&new);
                }
            }
        }
        self.chord = chord;

        if self.chord.is_none() {
            self.field = None;
            return;
        }

        let mut names = [NoteName::C; MAX_ACTIVE];
        for (slot, note) in names.iter_mut().zip(&self.active) {
            *slot = note.pitch.name();
        }
        let field = self
            .deducer
            .deduce(&names[..count])
            .first()
            .map(|c| c.field());

        if let Some(new) = field {
            if self.field != Some(new) {
                debug!("field -> {new}");
                if let Some(cb) = self.on_field.as_mut() {
                    cb(&new);
                }
            }
        }
        self.field = field;
    }
}

impl Default for HarmonicMonitor {
    fn default() -> Self {
        HarmonicMonitor::new()
    }
}
