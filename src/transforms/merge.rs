use crate::options::CodecOptions;
use crate::types::event::{TimedEvent, Track};
use crate::types::tempo::{DEFAULT_TEMPO, TempoTable};
use log::debug;

/// Scan state threaded through the tempo rescaling sweep.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RescaleState {
    pub tempo_index: usize,
    pub current_tempo: u32,
    pub prev_tick: u64,
    pub prev_rescaled_tick: u64,
}

impl Default for RescaleState {
    fn default() -> Self {
        Self {
            tempo_index: 0,
            current_tempo: DEFAULT_TEMPO,
            prev_tick: 0,
            prev_rescaled_tick: 0,
        }
    }
}

impl RescaleState {
    /// Moves past every tempo change at or before `tick`.
    pub fn advance_tempo(&mut self, tempos: &TempoTable, tick: u64) {
        while let Some(entry) = tempos.get(self.tempo_index) {
            if entry.tick > tick {
                break;
            }
            self.current_tempo = entry.micros_per_quarter;
            self.tempo_index += 1;
        }
    }

    /// Maps `tick` onto the reference tempo timeline and records it as the
    /// new anchor. Ticks must arrive in non-decreasing order.
    pub fn rescale(&mut self, tick: u64, reference_tempo: u32) -> u64 {
        let ratio = self.current_tempo as f64 / reference_tempo as f64;
        let delta = tick.saturating_sub(self.prev_tick) as f64 * ratio;
        let rescaled = delta.round() as u64 + self.prev_rescaled_tick;
        self.prev_tick = tick;
        self.prev_rescaled_tick = rescaled;
        rescaled
    }
}

/// Two-pointer merge on tick. Ties go to the left track.
fn merge_pair(left: &Track, right: &Track) -> Track {
    let mut events = Vec::with_capacity(left.len() + right.len());
    let mut left_iter = left.iter().peekable();
    let mut right_iter = right.iter().peekable();

    while let (Some(l), Some(r)) = (left_iter.peek(), right_iter.peek()) {
        if l.tick <= r.tick {
            events.push((*l).clone());
            left_iter.next();
        } else {
            events.push((*r).clone());
            right_iter.next();
        }
    }
    events.extend(left_iter.cloned());
    events.extend(right_iter.cloned());

    Track::from_events(events)
}

/// Merges tick-sorted tracks into one tick-sorted track by splitting the
/// slice in halves. Recursion depth is logarithmic in the track count.
pub fn merge_tracks(tracks: &[Track]) -> Track {
    match tracks {
        [] => Track::new(),
        [only] => only.clone(),
        [left, right] => merge_pair(left, right),
        _ => {
            let (front, back) = tracks.split_at(tracks.len() / 2);
            merge_pair(&merge_tracks(front), &merge_tracks(back))
        }
    }
}

/// Orders each run of same-tick events by ascending pitch.
///
/// The sort is stable: events of equal pitch keep their merge order, and
/// non-note events go ahead of notes.
pub fn order_simultaneous(events: &mut [TimedEvent]) {
    for run in events.chunk_by_mut(|a, b| a.tick == b.tick) {
        run.sort_by_key(|event| event.pitch());
    }
}

/// Rescales ticks to the reference tempo, keeping only note events whose
/// offset pitch falls in the retained band, then shifts the result so the
/// first kept event sits at tick 0.
pub fn rescale_tempo(track: &Track, tempos: &TempoTable, options: &CodecOptions) -> Track {
    let mut state = RescaleState::default();
    let mut retained: Vec<TimedEvent> = Vec::new();

    for event in track {
        state.advance_tempo(tempos, event.tick);

        let Some(pitch) = event.pitch() else {
            continue;
        };
        let pitch = pitch - options.pitch_offset;
        if !options.pitch_in_range(pitch) {
            continue;
        }

        let tick = state.rescale(event.tick, options.reference_tempo);
        let mut kept = event.clone().with_pitch(pitch);
        kept.tick = tick;
        retained.push(kept);
    }

    if let Some(shift) = retained.first().map(|e| e.tick) {
        for event in retained.iter_mut() {
            event.tick -= shift;
        }
    }

    Track::from_events(retained)
}

/// Merges the selected tracks and normalises them to the reference tempo.
pub fn transform(tracks: &[Track], tempos: &TempoTable, options: &CodecOptions) -> Track {
    let mut merged = merge_tracks(tracks);
    debug!(
        "Merged {} tracks into {} events",
        tracks.len(),
        merged.len()
    );
    order_simultaneous(&mut merged.events);
    let rescaled = rescale_tempo(&merged, tempos, options);
    debug!("Retained {} note events", rescaled.len());
    rescaled
}
