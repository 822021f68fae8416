use crate::types::event::{TimedEvent, Track};

/// In-memory view of a parsed multi-track file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Sequence {
    /// Ticks per quarter note.
    pub resolution: u16,
    pub tracks: Vec<Track>,
}

impl Sequence {
    pub fn with_tracks(resolution: u16, tracks: Vec<Track>) -> Self {
        Self { resolution, tracks }
    }

    pub fn event_count(&self) -> usize {
        self.tracks.iter().map(|t| t.len()).sum()
    }
}

/// A single merged track of retained note events, normalised to one tempo and
/// one resolution, starting at tick 0.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CanonicalSequence {
    pub resolution: u16,
    pub track: Track,
}

impl CanonicalSequence {
    pub fn new(resolution: u16, track: Track) -> Self {
        Self { resolution, track }
    }

    /// Builds a canonical sequence from events in any order.
    ///
    /// Events are sorted by tick, then by pitch within each tick. The sort is
    /// stable, so a note-on keeps its place ahead of a same-pitch note-off.
    pub fn from_unordered(resolution: u16, mut events: Vec<TimedEvent>) -> Self {
        events.sort_by_key(|e| (e.tick, e.pitch()));
        Self::new(resolution, Track::from_events(events))
    }

    pub fn events(&self) -> &[TimedEvent] {
        &self.track.events
    }

    pub fn max_tick(&self) -> u64 {
        self.track.last_tick()
    }

    pub fn is_empty(&self) -> bool {
        self.track.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_from_unordered() {
        let canonical = CanonicalSequence::from_unordered(
            48,
            vec![
                TimedEvent::note_on(2, 64, 50),
                TimedEvent::note_on(0, 62, 50),
                TimedEvent::note_off(2, 62),
                TimedEvent::note_on(0, 60, 50),
            ],
        );
        assert_eq!(
            canonical.events(),
            &[
                TimedEvent::note_on(0, 60, 50),
                TimedEvent::note_on(0, 62, 50),
                TimedEvent::note_off(2, 62),
                TimedEvent::note_on(2, 64, 50),
            ]
        );
        assert_eq!(canonical.max_tick(), 2);
    }

    #[test]
    fn test_event_count() {
        let sequence = Sequence::with_tracks(
            480,
            vec![
                Track::from_events(vec![TimedEvent::note_on(0, 60, 1)]),
                Track::from_events(vec![
                    TimedEvent::note_on(0, 60, 1),
                    TimedEvent::note_off(1, 60),
                ]),
            ],
        );
        assert_eq!(sequence.event_count(), 3);
        assert_eq!(Sequence::default().event_count(), 0);
    }
}
