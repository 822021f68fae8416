use crate::error::{ConversionError, Result};
use crate::options::CodecOptions;
use crate::process::sequence_to_text;
use crate::types::event::{EventKind, TimedEvent, Track};
use crate::types::sequence::Sequence;
use log::debug;
use midly::{MetaMessage, MidiMessage, Smf, Timing, TrackEventKind};

pub fn convert_midi_to_text(midi_bytes: &[u8], options: &CodecOptions) -> Result<String> {
    let sequence = convert_midi_to_sequence(midi_bytes)?;
    sequence_to_text(&sequence, options)
}

pub fn convert_midi_to_sequence(midi_bytes: &[u8]) -> Result<Sequence> {
    let smf = Smf::parse(midi_bytes)?;
    convert_smf_to_sequence(&smf)
}

fn convert_event_kind(kind: &TrackEventKind) -> EventKind {
    match kind {
        TrackEventKind::Midi { message, .. } => match message {
            MidiMessage::NoteOn { key, vel } => EventKind::NoteOn {
                pitch: key.as_int() as i32,
                velocity: vel.as_int(),
            },
            MidiMessage::NoteOff { key, vel } => EventKind::NoteOff {
                pitch: key.as_int() as i32,
                velocity: vel.as_int(),
            },
            _ => EventKind::Other,
        },
        TrackEventKind::Meta(MetaMessage::Tempo(tempo)) => {
            let [_, hi, mid, lo] = tempo.as_int().to_be_bytes();
            EventKind::Tempo {
                payload: [hi, mid, lo],
            }
        }
        _ => EventKind::Other,
    }
}

/// Lays every track out on absolute ticks. Track order is kept.
pub fn convert_smf_to_sequence(smf: &Smf) -> Result<Sequence> {
    let resolution = match smf.header.timing {
        Timing::Metrical(ppqn) => ppqn.as_int(),
        Timing::Timecode(_, _) => return Err(ConversionError::UnsupportedTiming),
    };

    debug!(
        "MIDI format: {:?}, tracks: {}, resolution: {}",
        smf.header.format,
        smf.tracks.len(),
        resolution
    );

    let tracks = smf
        .tracks
        .iter()
        .map(|track| {
            let mut current_ticks = 0u64;
            let events = track
                .iter()
                .map(|event| {
                    current_ticks += event.delta.as_int() as u64;
                    TimedEvent::new(current_ticks, convert_event_kind(&event.kind))
                })
                .collect();
            Track::from_events(events)
        })
        .collect();

    let sequence = Sequence::with_tracks(resolution, tracks);
    debug!("Read {} events", sequence.event_count());
    Ok(sequence)
}
