use crate::types::tempo::DEFAULT_TEMPO;
use std::fmt;
use std::str::FromStr;

/// What to do with a note whose duration does not fit in three digits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DurationOverflow {
    /// Fail the conversion with [`crate::ConversionError::DurationOverflow`].
    #[default]
    Reject,
    /// Write the largest representable duration instead.
    Clamp,
}

impl FromStr for DurationOverflow {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "reject" => Ok(DurationOverflow::Reject),
            "clamp" => Ok(DurationOverflow::Clamp),
            _ => Err(format!("Unknown duration overflow policy: {}", s)),
        }
    }
}

impl fmt::Display for DurationOverflow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DurationOverflow::Reject => write!(f, "reject"),
            DurationOverflow::Clamp => write!(f, "clamp"),
        }
    }
}

/// Knobs of both conversion directions. `Default` gives the canonical format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodecOptions {
    /// Ticks per quarter note of the canonical sequence and of decoded files.
    pub target_resolution: u16,
    /// Microseconds per quarter note all ticks are rescaled against.
    pub reference_tempo: u32,
    /// Subtracted from every source pitch before the band check.
    pub pitch_offset: i32,
    pub min_pitch: i32,
    pub max_pitch: i32,
    /// Tempo values are rounded to the nearest multiple of this.
    pub tempo_rounding: u32,
    /// Velocity of decoded note-ons.
    pub note_velocity: u8,
    /// Program change written at the start of decoded files.
    pub program: u8,
    pub duration_overflow: DurationOverflow,
}

impl Default for CodecOptions {
    fn default() -> Self {
        Self {
            target_resolution: 48,
            reference_tempo: DEFAULT_TEMPO,
            pitch_offset: 12,
            min_pitch: 21,
            max_pitch: 108,
            tempo_rounding: 10_000,
            note_velocity: 50,
            program: 0,
            duration_overflow: DurationOverflow::Reject,
        }
    }
}

impl CodecOptions {
    pub fn pitch_in_range(&self, pitch: i32) -> bool {
        (self.min_pitch..=self.max_pitch).contains(&pitch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = CodecOptions::default();
        assert_eq!(options.target_resolution, 48);
        assert_eq!(options.reference_tempo, 500_000);
        assert!(options.pitch_in_range(21));
        assert!(options.pitch_in_range(108));
        assert!(!options.pitch_in_range(20));
        assert!(!options.pitch_in_range(109));
    }

    #[test]
    fn test_parse_overflow_policy() {
        assert_eq!("clamp".parse(), Ok(DurationOverflow::Clamp));
        assert_eq!("Reject".parse(), Ok(DurationOverflow::Reject));
        assert!("truncate".parse::<DurationOverflow>().is_err());
        assert_eq!(DurationOverflow::Clamp.to_string(), "clamp");
    }
}
