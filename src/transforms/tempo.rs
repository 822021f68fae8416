use crate::types::event::{EventKind, Track};
use crate::types::tempo::TempoTable;
use log::{debug, warn};

/// Finds the first track holding tempo events.
pub fn find_tempo_track(tracks: &[Track]) -> Option<&Track> {
    tracks.iter().find(|track| {
        track
            .iter()
            .any(|event| matches!(event.kind, EventKind::Tempo { .. }))
    })
}

/// Rounds to the nearest multiple of `step`, halves going up.
pub fn round_tempo(micros_per_quarter: u32, step: u32) -> u32 {
    if step == 0 {
        return micros_per_quarter;
    }
    let rounded = (micros_per_quarter as u64 + step as u64 / 2) / step as u64 * step as u64;
    rounded.min(u32::MAX as u64) as u32
}

/// Builds the tempo table of a file.
///
/// Only the first track with tempo events is scanned. Without one, the
/// implicit 120 BPM table is returned.
pub fn extract_tempo_table(tracks: &[Track], rounding: u32) -> TempoTable {
    let Some(track) = find_tempo_track(tracks) else {
        warn!("No tempo track found, assuming 120 BPM");
        return TempoTable::default();
    };

    let mut table = TempoTable::empty();
    for event in track {
        if let EventKind::Tempo { payload } = event.kind {
            let micros = u32::from_be_bytes([0, payload[0], payload[1], payload[2]]);
            table.push(round_tempo(micros, rounding), event.tick);
        }
    }

    debug!("Tempo table has {} entries", table.len());
    table
}
