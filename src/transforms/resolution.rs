use crate::types::event::Track;
use log::{debug, warn};

/// Integer factor taking `source` ticks per quarter down to `target`.
///
/// Never below 1, so a source coarser than the target passes through.
pub fn resolution_factor(source: u16, target: u16) -> u64 {
    if target == 0 {
        return 1;
    }
    if source % target != 0 {
        warn!(
            "Resolution {} is not a multiple of {}, ticks will be quantized",
            source, target
        );
    }
    ((source / target) as u64).max(1)
}

/// Divides every tick by `factor`, truncating.
pub fn transform(track: &Track, factor: u64) -> Track {
    debug!("Rescaling {} events by 1/{}", track.len(), factor);
    let factor = factor.max(1);
    Track::from_events(
        track
            .iter()
            .map(|event| {
                let mut event = event.clone();
                event.tick /= factor;
                event
            })
            .collect(),
    )
}
