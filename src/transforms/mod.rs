pub mod merge;
pub mod resolution;
pub mod select;
pub mod tempo;

use crate::options::CodecOptions;
use crate::types::sequence::{CanonicalSequence, Sequence};
use log::debug;

/// Runs the forward normalisation: select note tracks, read the tempo map,
/// merge and rescale to the reference tempo, then to the target resolution.
pub fn apply_transforms(sequence: &Sequence, options: &CodecOptions) -> CanonicalSequence {
    // order is important here: tempo offsets are in source ticks

    let note_tracks = select::transform(&sequence.tracks);
    debug!(
        "{} of {} tracks carry notes",
        note_tracks.len(),
        sequence.tracks.len()
    );

    let tempos = tempo::extract_tempo_table(&sequence.tracks, options.tempo_rounding);
    let merged = merge::transform(&note_tracks, &tempos, options);

    let factor = resolution::resolution_factor(sequence.resolution, options.target_resolution);
    let mut track = resolution::transform(&merged, factor);
    // division can land notes from different source ticks on one tick
    merge::order_simultaneous(&mut track.events);

    CanonicalSequence::new(options.target_resolution, track)
}
