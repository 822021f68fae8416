use crate::error::{ConversionError, Result};
use crate::options::{CodecOptions, DurationOverflow};
use crate::text::grammar::{CHAIN, MAX_DURATION, REST, SEPARATOR, pitch_to_char};
use crate::types::event::TimedEvent;
use crate::types::sequence::CanonicalSequence;
use log::{debug, warn};

/// Duration of the note started at `events[index]`: the distance to the first
/// later note end of the same pitch, or 1 when there is none.
///
/// Same-pitch notes that overlap pair with the earliest end, which can cut the
/// first note short.
pub fn note_duration(events: &[TimedEvent], index: usize) -> u64 {
    let start = &events[index];
    let pitch = start.pitch();
    events[index + 1..]
        .iter()
        .find(|event| event.ends_note() && event.pitch() == pitch)
        .map(|end| end.tick - start.tick)
        .unwrap_or_else(|| {
            warn!(
                "No note end for pitch {:?} at tick {}, using duration 1",
                pitch, start.tick
            );
            1
        })
}

fn fit_duration(start: &TimedEvent, duration: u64, policy: DurationOverflow) -> Result<u64> {
    if duration <= MAX_DURATION {
        return Ok(duration);
    }
    match policy {
        DurationOverflow::Reject => Err(ConversionError::DurationOverflow {
            tick: start.tick,
            pitch: start.pitch().unwrap_or_default(),
            duration,
        }),
        DurationOverflow::Clamp => {
            warn!(
                "Clamping duration {} at tick {} to {}",
                duration, start.tick, MAX_DURATION
            );
            Ok(MAX_DURATION)
        }
    }
}

/// Writes one token group per tick, from tick 0 through the last event.
///
/// Expects events sorted by tick and by pitch within a tick, as produced by
/// the merger or [`CanonicalSequence::from_unordered`].
pub fn encode(sequence: &CanonicalSequence, options: &CodecOptions) -> Result<String> {
    let events = sequence.events();
    let max_tick = sequence.max_tick();
    debug!("Encoding {} events over {} ticks", events.len(), max_tick + 1);

    let mut output = String::new();
    let mut group = String::new();
    let mut index = 0;

    for tick in 0..=max_tick {
        group.clear();

        while let Some(event) = events.get(index).filter(|e| e.tick == tick) {
            if event.starts_note() {
                let pitch = event.pitch().unwrap_or_default();
                match pitch_to_char(pitch) {
                    Some(ch) => {
                        let duration = note_duration(events, index);
                        let duration = fit_duration(event, duration, options.duration_overflow)?;
                        if !group.is_empty() {
                            group.push(CHAIN);
                        }
                        group.push(ch);
                        group.push_str(&format!("{:03}", duration));
                    }
                    None => warn!("Pitch {} at tick {} has no character", pitch, tick),
                }
            }
            index += 1;
        }

        if tick > 0 {
            output.push(SEPARATOR);
        }
        if group.is_empty() {
            output.push(REST);
        } else {
            output.push_str(&group);
        }
    }

    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::event::Track;
    use pretty_assertions::assert_eq;

    fn canonical(events: Vec<TimedEvent>) -> CanonicalSequence {
        CanonicalSequence::new(48, Track::from_events(events))
    }

    #[test]
    fn test_encode_rests_and_notes() {
        let sequence = canonical(vec![
            TimedEvent::note_on(1, 52, 50),
            TimedEvent::note_on(2, 48, 50),
            TimedEvent::note_off(3, 52),
            TimedEvent::note_on(4, 48, 0),
        ]);
        let text = encode(&sequence, &CodecOptions::default()).unwrap();
        assert_eq!(text, "~ A002 =002 ~ ~");
    }

    #[test]
    fn test_encode_chain() {
        let sequence = canonical(vec![
            TimedEvent::note_on(0, 48, 50),
            TimedEvent::note_on(0, 52, 50),
            TimedEvent::note_on(0, 55, 50),
            TimedEvent::note_off(12, 48),
            TimedEvent::note_off(12, 52),
            TimedEvent::note_off(24, 55),
        ]);
        let text = encode(&sequence, &CodecOptions::default()).unwrap();
        let groups: Vec<&str> = text.split(' ').collect();
        assert_eq!(groups.len(), 25);
        assert_eq!(groups[0], "=012!A012!D024");
        assert!(groups[1..].iter().all(|g| *g == "~"));
    }

    #[test]
    fn test_note_ends_do_not_chain() {
        // a note end sharing the tick must not add a chain-marker
        let sequence = canonical(vec![
            TimedEvent::note_on(0, 48, 50),
            TimedEvent::note_off(1, 48),
            TimedEvent::note_on(1, 50, 50),
            TimedEvent::note_off(1, 60),
            TimedEvent::note_off(2, 50),
        ]);
        let text = encode(&sequence, &CodecOptions::default()).unwrap();
        assert_eq!(text, "=001 ?001 ~");
    }

    #[test]
    fn test_missing_note_end_defaults_to_one() {
        let sequence = canonical(vec![
            TimedEvent::note_on(0, 60, 50),
            TimedEvent::note_on(3, 62, 50),
        ]);
        let text = encode(&sequence, &CodecOptions::default()).unwrap();
        assert_eq!(text, "I001 ~ ~ K001");
    }

    #[test]
    fn test_zero_length_note() {
        let sequence = canonical(vec![
            TimedEvent::note_on(0, 60, 50),
            TimedEvent::note_off(0, 60),
        ]);
        assert_eq!(encode(&sequence, &CodecOptions::default()).unwrap(), "I000");
    }

    #[test]
    fn test_overlapping_same_pitch_pairs_first_end() {
        // known limitation: both notes pair with the end at tick 2
        let sequence = canonical(vec![
            TimedEvent::note_on(0, 60, 50),
            TimedEvent::note_on(1, 60, 50),
            TimedEvent::note_off(2, 60),
            TimedEvent::note_off(5, 60),
        ]);
        let text = encode(&sequence, &CodecOptions::default()).unwrap();
        assert_eq!(text, "I002 I001 ~ ~ ~ ~");
    }

    #[test]
    fn test_empty_sequence_is_single_rest() {
        let text = encode(&CanonicalSequence::default(), &CodecOptions::default()).unwrap();
        assert_eq!(text, "~");
    }

    #[test]
    fn test_out_of_band_pitch_is_skipped() {
        let sequence = canonical(vec![
            TimedEvent::note_on(0, 10, 50),
            TimedEvent::note_on(0, 48, 50),
            TimedEvent::note_off(1, 48),
        ]);
        let text = encode(&sequence, &CodecOptions::default()).unwrap();
        assert_eq!(text, "=001 ~");
    }

    #[test]
    fn test_long_note_rejected_by_default() {
        let sequence = canonical(vec![
            TimedEvent::note_on(0, 48, 50),
            TimedEvent::note_off(1000, 48),
        ]);
        let err = encode(&sequence, &CodecOptions::default()).unwrap_err();
        assert!(matches!(
            err,
            ConversionError::DurationOverflow {
                tick: 0,
                pitch: 48,
                duration: 1000
            }
        ));
    }

    #[test]
    fn test_long_note_clamped() {
        let sequence = canonical(vec![
            TimedEvent::note_on(0, 48, 50),
            TimedEvent::note_off(999, 48),
            TimedEvent::note_on(1000, 48, 50),
            TimedEvent::note_off(2500, 48),
        ]);
        let options = CodecOptions {
            duration_overflow: DurationOverflow::Clamp,
            ..CodecOptions::default()
        };
        let text = encode(&sequence, &options).unwrap();
        let groups: Vec<&str> = text.split(' ').collect();
        assert_eq!(groups.len(), 2501);
        assert_eq!(groups[0], "=999");
        assert_eq!(groups[1000], "=999");
    }
}
