//! # chord_monitor
//!
//! Real-time harmonic analysis of a live MIDI performance: track sounding
//! notes, name the chord they form, deduce the harmonic field and report
//! each note's role in it, with minimal latency.
//!
//! ## Example
//! ```rust
//! use chord_monitor::{ByteStreamParser, HarmonicMonitor};
//! use std::sync::{Arc, Mutex};
//!
//! fn run() -> Result<(), Box<dyn std::error::Error>> {
//!     let seen = Arc::new(Mutex::new(Vec::new()));
//!     let sink = Arc::clone(&seen);
//!
//!     // 1) Build a monitor with a chord callback
//!     let mut monitor = HarmonicMonitor::builder()
//!         .capacity(16)
//!         .on_chord(move |chord| sink.lock().unwrap().push(chord.name()))
//!         .build()?;
//!
//!     // 2) Feed raw MIDI bytes (running status, C-E-G)
//!     let mut parser = ByteStreamParser::new();
//!     parser.feed_all(&[0x90, 60, 100, 64, 100, 67, 100], &mut monitor);
//!
//!     assert_eq!(monitor.chord().map(|c| c.name()), Some("CM".to_string()));
//!     assert_eq!(seen.lock().unwrap().last().map(String::as_str), Some("CM"));
//!     Ok(())
//! }
//! # run().unwrap();
//! ```
//!
//! ## Modules
//! - [`midi1`] and [`ump`]: transport decoding into monitor intents, and
//!   Flex Data / per-note encoders for the results
//! - [`monitor`]: the event-driven state machine
//! - [`chord`] and [`field`]: the naming and deduction engines
//! - [`comparison`]: chord-to-chord relations
//! - [`ci`]: MIDI-CI discovery and capability messages

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rust_2018_idioms)]
#![deny(clippy::all)]

/// Chord naming API.
pub use chord::{Chord, ChordError, ChordKind, ChordNamer, FormulaNamer};

/// Chord comparison API.
pub use comparison::{ChordComparison, SubsetRelation, Transformation};

/// Field deduction API.
pub use field::{
    Field, FieldCandidate, FieldDeducer, HarmonicFunction, NoteContext, ScaleDeducer, ScaleType,
};

/// Byte-stream transport.
pub use midi1::ByteStreamParser;

/// Harmonic monitor.
pub use monitor::{ActiveNote, HarmonicMonitor, Intent, MonitorBuilder, MonitorError};

/// Pitch primitives.
pub use pitch::{NoteName, Pitch, PitchClassSet};

/// Packet transport.
pub use ump::Packet;

/// Chord naming module.
pub mod chord;

/// MIDI-CI capability messages.
pub mod ci;

/// Chord comparison module.
pub mod comparison;

/// Harmonic field module.
pub mod field;

/// MIDI 1.0 byte protocol.
pub mod midi1;

/// Harmonic monitor module.
pub mod monitor;

/// Pitch and pitch-class primitives.
pub mod pitch;

/// Universal MIDI Packet protocol.
pub mod ump;
