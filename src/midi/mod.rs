mod midi_to_text;
mod text_to_midi;

pub use midi_to_text::{convert_midi_to_sequence, convert_midi_to_text, convert_smf_to_sequence};
pub use text_to_midi::convert_text_to_midi;
