use crate::error::Result;
use crate::options::CodecOptions;
use crate::text::decode::{DecodedText, decode};
use crate::types::event::EventKind;
use log::debug;
use midly::num::{u4, u7, u15, u28};
use midly::{Format, Header, MetaMessage, MidiMessage, Smf, Timing, TrackEvent, TrackEventKind};

fn key(pitch: i32) -> u7 {
    u7::new(pitch.clamp(0, 127) as u8)
}

/// Absolute-tick events of the decoded track, in writing order.
fn decoded_to_timed_kinds<'a>(
    decoded: &DecodedText,
    track_name: &'a str,
    options: &CodecOptions,
) -> Vec<(u64, TrackEventKind<'a>)> {
    let channel = u4::new(0);
    let mut events: Vec<(u64, TrackEventKind<'a>)> = vec![
        (
            0,
            TrackEventKind::Meta(MetaMessage::TrackName(track_name.as_bytes())),
        ),
        (
            0,
            TrackEventKind::Midi {
                channel,
                message: MidiMessage::ProgramChange {
                    program: u7::new(options.program.min(127)),
                },
            },
        ),
    ];

    let mut notes: Vec<(u64, TrackEventKind<'a>)> = decoded
        .events
        .iter()
        .filter_map(|event| {
            let message = match event.kind {
                EventKind::NoteOn { pitch, velocity } => MidiMessage::NoteOn {
                    key: key(pitch),
                    vel: u7::new(velocity.min(127)),
                },
                EventKind::NoteOff { pitch, velocity } => MidiMessage::NoteOff {
                    key: key(pitch),
                    vel: u7::new(velocity.min(127)),
                },
                _ => return None,
            };
            Some((event.tick, TrackEventKind::Midi { channel, message }))
        })
        .collect();
    notes.sort_by_key(|(tick, _)| *tick);
    events.extend(notes);

    events.push((decoded.last_tick(), TrackEventKind::Meta(MetaMessage::EndOfTrack)));
    events
}

/// Turns absolute ticks into deltas, splitting gaps wider than a delta can hold.
fn to_track_events<'a>(timed: Vec<(u64, TrackEventKind<'a>)>) -> Vec<TrackEvent<'a>> {
    let max_delta = u28::max_value().as_int() as u64;
    let mut track_events = Vec::with_capacity(timed.len());
    let mut last_tick = 0u64;

    for (tick, kind) in timed {
        let mut delta_tick = tick.saturating_sub(last_tick);
        last_tick = tick.max(last_tick);

        while delta_tick > max_delta {
            track_events.push(TrackEvent {
                delta: u28::max_value(),
                kind: TrackEventKind::Meta(MetaMessage::Text(b"long delta")),
            });
            delta_tick -= max_delta;
        }

        track_events.push(TrackEvent {
            delta: u28::new(delta_tick as u32),
            kind,
        });
    }
    track_events
}

/// Decodes text into a single-track file at the target resolution, named
/// `track_name`, with a program change and an end-of-track marker.
pub fn convert_text_to_midi(
    text: &str,
    track_name: &str,
    options: &CodecOptions,
) -> Result<Vec<u8>> {
    let decoded = decode(text, options);
    let timed = decoded_to_timed_kinds(&decoded, track_name, options);

    let smf = Smf {
        header: Header {
            format: Format::SingleTrack,
            timing: Timing::Metrical(u15::new(options.target_resolution)),
        },
        tracks: vec![to_track_events(timed)],
    };

    let mut buffer = Vec::new();
    smf.write_std(&mut buffer)?;
    debug!("Wrote {} MIDI bytes", buffer.len());

    Ok(buffer)
}
