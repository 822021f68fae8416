//! ticktext - multi-track MIDI to per-tick text and back
//!
//! The forward direction merges every note-carrying track into one
//! tick-ordered stream, rescales it to a reference tempo and a coarse
//! resolution, and writes one token group per tick. The reverse direction
//! sanitizes a line of text and decodes it into note-on/note-off events.

pub mod error;
pub mod options;
pub mod process;
pub mod text;
pub mod transforms;
pub mod types;

#[cfg(feature = "midi")]
pub mod midi;

// Re-export commonly used types
pub use error::{ConversionError, Result};
pub use options::{CodecOptions, DurationOverflow};
pub use process::{sequence_to_canonical, sequence_to_text, text_to_canonical, text_to_events};
pub use text::decode::DecodedText;
pub use text::validate::{is_valid, sanitize};
pub use types::event::{EventKind, TimedEvent, Track};
pub use types::sequence::{CanonicalSequence, Sequence};
pub use types::tempo::{TempoEntry, TempoTable};
