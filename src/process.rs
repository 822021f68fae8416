use crate::error::Result;
use crate::options::CodecOptions;
use crate::text::decode::{DecodedText, decode};
use crate::text::encode::encode;
use crate::transforms::apply_transforms;
use crate::types::sequence::{CanonicalSequence, Sequence};

/// Merges and normalises a multi-track sequence.
pub fn sequence_to_canonical(sequence: &Sequence, options: &CodecOptions) -> CanonicalSequence {
    apply_transforms(sequence, options)
}

/// Full forward conversion: sequence to one line of text.
pub fn sequence_to_text(sequence: &Sequence, options: &CodecOptions) -> Result<String> {
    let canonical = sequence_to_canonical(sequence, options);
    encode(&canonical, options)
}

/// Full reverse conversion: text to unordered note events.
pub fn text_to_events(text: &str, options: &CodecOptions) -> DecodedText {
    decode(text, options)
}

/// Decodes text and orders the events the way the encoder expects them.
pub fn text_to_canonical(text: &str, options: &CodecOptions) -> CanonicalSequence {
    let decoded = decode(text, options);
    CanonicalSequence::from_unordered(options.target_resolution, decoded.events)
}
