use thiserror::Error;

/// The one failure a single file conversion can end with.
#[derive(Debug, Error)]
pub enum ConversionError {
    #[cfg(feature = "midi")]
    #[error("invalid MIDI data: {0}")]
    Midi(#[from] midly::Error),

    #[error("SMPTE timecode timing is not supported")]
    UnsupportedTiming,

    #[error(
        "note {pitch} at tick {tick} lasts {duration} ticks, more than the 3 digit duration field holds"
    )]
    DurationOverflow { tick: u64, pitch: i32, duration: u64 },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ConversionError>;
