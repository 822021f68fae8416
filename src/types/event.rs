use std::fmt;

/// The subset of event kinds the codec distinguishes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventKind {
    NoteOn { pitch: i32, velocity: u8 },
    NoteOff { pitch: i32, velocity: u8 },
    /// Raw tempo meta payload: microseconds per quarter note, 3 bytes big-endian.
    Tempo { payload: [u8; 3] },
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimedEvent {
    pub tick: u64,
    pub kind: EventKind,
}

impl TimedEvent {
    pub fn new(tick: u64, kind: EventKind) -> Self {
        Self { tick, kind }
    }

    pub fn note_on(tick: u64, pitch: i32, velocity: u8) -> Self {
        Self::new(tick, EventKind::NoteOn { pitch, velocity })
    }

    pub fn note_off(tick: u64, pitch: i32) -> Self {
        Self::new(tick, EventKind::NoteOff { pitch, velocity: 0 })
    }

    pub fn tempo(tick: u64, micros_per_quarter: u32) -> Self {
        let [_, hi, mid, lo] = micros_per_quarter.to_be_bytes();
        Self::new(
            tick,
            EventKind::Tempo {
                payload: [hi, mid, lo],
            },
        )
    }

    pub fn pitch(&self) -> Option<i32> {
        match self.kind {
            EventKind::NoteOn { pitch, .. } | EventKind::NoteOff { pitch, .. } => Some(pitch),
            _ => None,
        }
    }

    /// Any note-on message, including the velocity 0 form used as a note-off.
    pub fn is_note_on_message(&self) -> bool {
        matches!(self.kind, EventKind::NoteOn { .. })
    }

    pub fn is_note(&self) -> bool {
        self.pitch().is_some()
    }

    /// A note-on that actually sounds.
    pub fn starts_note(&self) -> bool {
        matches!(self.kind, EventKind::NoteOn { velocity, .. } if velocity > 0)
    }

    /// A note-off message or a note-on with velocity 0.
    pub fn ends_note(&self) -> bool {
        matches!(
            self.kind,
            EventKind::NoteOff { .. } | EventKind::NoteOn { velocity: 0, .. }
        )
    }

    /// Replaces the pitch of a note event, leaving other kinds untouched.
    pub fn with_pitch(mut self, new_pitch: i32) -> Self {
        match &mut self.kind {
            EventKind::NoteOn { pitch, .. } | EventKind::NoteOff { pitch, .. } => {
                *pitch = new_pitch
            }
            _ => {}
        }
        self
    }
}

impl fmt::Display for TimedEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            EventKind::NoteOn { pitch, velocity } => {
                write!(f, "{} on {} vel={}", self.tick, pitch, velocity)
            }
            EventKind::NoteOff { pitch, velocity } => {
                write!(f, "{} off {} vel={}", self.tick, pitch, velocity)
            }
            EventKind::Tempo { payload } => write!(
                f,
                "{} tempo {}",
                self.tick,
                u32::from_be_bytes([0, payload[0], payload[1], payload[2]])
            ),
            EventKind::Other => write!(f, "{} other", self.tick),
        }
    }
}

/// Ordered list of events. Ticks are expected to be non-decreasing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Track {
    pub events: Vec<TimedEvent>,
}

impl Track {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn from_events(events: Vec<TimedEvent>) -> Self {
        Self { events }
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TimedEvent> {
        self.events.iter()
    }

    /// Tick of the last event, 0 for an empty track.
    pub fn last_tick(&self) -> u64 {
        self.events.last().map(|e| e.tick).unwrap_or(0)
    }

    pub fn is_tick_sorted(&self) -> bool {
        self.events.windows(2).all(|w| w[0].tick <= w[1].tick)
    }
}

impl<'a> IntoIterator for &'a Track {
    type Item = &'a TimedEvent;
    type IntoIter = std::slice::Iter<'a, TimedEvent>;

    fn into_iter(self) -> Self::IntoIter {
        self.events.iter()
    }
}
