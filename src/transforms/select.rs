use crate::types::event::Track;

/// Keeps the tracks that carry at least one note-on message.
pub fn transform(tracks: &[Track]) -> Vec<Track> {
    tracks
        .iter()
        .filter(|track| track.iter().any(|event| event.is_note_on_message()))
        .cloned()
        .collect()
}
