use crate::options::CodecOptions;
use crate::text::grammar::{Symbol, Symbols};
use crate::text::validate::sanitize;
use crate::types::event::TimedEvent;
use log::{debug, warn};

/// Events read back from a line of text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DecodedText {
    /// Note-on/note-off pairs in reading order, not sorted by tick.
    pub events: Vec<TimedEvent>,
    /// Tick reached after the last separator.
    pub end_tick: u64,
}

impl DecodedText {
    /// Last tick that anything happens at, including note ends.
    pub fn last_tick(&self) -> u64 {
        self.events
            .iter()
            .map(|e| e.tick)
            .max()
            .unwrap_or(0)
            .max(self.end_tick)
    }
}

/// Returns the first line of `text`, warning about any content after it.
fn first_line(text: &str) -> &str {
    let mut lines = text.lines();
    let first = lines.next().unwrap_or("");
    let ignored = lines.filter(|line| !line.trim().is_empty()).count();
    if ignored > 0 {
        warn!("Ignoring {} lines after the first", ignored);
    }
    first
}

/// Sanitizes the first line of `text` and turns every note token into a
/// note-on at the current tick and a note-off `duration` ticks later.
/// Each separator advances the tick by one.
pub fn decode(text: &str, options: &CodecOptions) -> DecodedText {
    let line = sanitize(first_line(text));

    let mut decoded = DecodedText::default();
    for (symbol, _) in Symbols::new(&line) {
        match symbol {
            Symbol::Separator => decoded.end_tick += 1,
            Symbol::Note { pitch, duration } => {
                let tick = decoded.end_tick;
                decoded
                    .events
                    .push(TimedEvent::note_on(tick, pitch, options.note_velocity));
                decoded
                    .events
                    .push(TimedEvent::note_off(tick + duration as u64, pitch));
            }
            Symbol::Chain | Symbol::Rest | Symbol::Invalid(_) => {}
        }
    }

    debug!(
        "Decoded {} notes over {} ticks",
        decoded.events.len() / 2,
        decoded.end_tick + 1
    );
    decoded
}
