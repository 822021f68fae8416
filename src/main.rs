use anyhow::{Context, Result};
use clap::{Arg, Command};
use log::{LevelFilter, info};
use std::path::Path;
use ticktext::{CodecOptions, DurationOverflow, midi};

#[derive(Debug, PartialEq)]
enum FileFormat {
    Midi,
    Text,
}

fn detect_file_format(file_path: &str) -> Result<FileFormat> {
    let path = Path::new(file_path);
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .ok_or_else(|| anyhow::anyhow!("File has no extension: {}", file_path))?;

    match extension.to_lowercase().as_str() {
        "mid" => Ok(FileFormat::Midi),
        "midi" => Ok(FileFormat::Midi),
        "smf" => Ok(FileFormat::Midi),
        "txt" => Ok(FileFormat::Text),
        _ => Err(anyhow::anyhow!(
            "Unsupported file extension: .{}",
            extension
        )),
    }
}

fn track_name(output_file: &str) -> &str {
    Path::new(output_file)
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or("ticktext")
}

fn main() -> Result<()> {
    let defaults = CodecOptions::default();

    let matches = Command::new("ticktext")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Converts MIDI files to per-tick text and back")
        .arg(
            Arg::new("input")
                .help("Input file (.mid or .txt)")
                .required(true)
                .value_name("INPUT_FILE")
                .index(1),
        )
        .arg(
            Arg::new("output")
                .help("Output file (.txt or .mid)")
                .required(true)
                .value_name("OUTPUT_FILE")
                .index(2),
        )
        .arg(
            Arg::new("verbose")
                .help("Enable verbose output")
                .short('v')
                .long("verbose")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("velocity")
                .help("Velocity of decoded notes")
                .long("velocity")
                .value_name("VELOCITY")
                .value_parser(clap::value_parser!(u8).range(1..=127)),
        )
        .arg(
            Arg::new("program")
                .help("Program change written to decoded files")
                .long("program")
                .value_name("PROGRAM")
                .value_parser(clap::value_parser!(u8).range(0..=127)),
        )
        .arg(
            Arg::new("resolution")
                .help("Target ticks per quarter note")
                .long("resolution")
                .value_name("PPQ")
                .value_parser(clap::value_parser!(u16).range(1..=0x7fff)),
        )
        .arg(
            Arg::new("long-notes")
                .help("Notes longer than 999 ticks: reject or clamp")
                .long("long-notes")
                .value_name("POLICY")
                .value_parser(clap::value_parser!(DurationOverflow)),
        )
        .get_matches();

    let verbose = matches.get_flag("verbose");
    let mut logger =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    if verbose {
        logger.filter_level(LevelFilter::Debug);
    }
    logger.init();

    let input_file = matches
        .get_one::<String>("input")
        .context("Missing input file")?;
    let output_file = matches
        .get_one::<String>("output")
        .context("Missing output file")?;

    let options = CodecOptions {
        note_velocity: matches
            .get_one::<u8>("velocity")
            .copied()
            .unwrap_or(defaults.note_velocity),
        program: matches
            .get_one::<u8>("program")
            .copied()
            .unwrap_or(defaults.program),
        target_resolution: matches
            .get_one::<u16>("resolution")
            .copied()
            .unwrap_or(defaults.target_resolution),
        duration_overflow: matches
            .get_one::<DurationOverflow>("long-notes")
            .copied()
            .unwrap_or(defaults.duration_overflow),
        ..defaults
    };

    let input_format = detect_file_format(input_file)
        .with_context(|| format!("Failed to detect input file format: {}", input_file))?;

    let output_format = detect_file_format(output_file)
        .with_context(|| format!("Failed to detect output file format: {}", output_file))?;

    info!(
        "Input format: {:?}, Output format: {:?}",
        input_format, output_format
    );

    match (input_format, output_format) {
        (FileFormat::Midi, FileFormat::Text) => {
            info!("Reading MIDI file: {}", input_file);
            let midi_bytes = std::fs::read(input_file)
                .with_context(|| format!("Failed to read MIDI file: {}", input_file))?;
            let text = midi::convert_midi_to_text(&midi_bytes, &options)
                .with_context(|| format!("Failed to convert MIDI file: {}", input_file))?;

            info!("Writing text file: {}", output_file);
            std::fs::write(output_file, format!("{}\n", text))
                .with_context(|| format!("Failed to write text file: {}", output_file))?;
        }
        (FileFormat::Text, FileFormat::Midi) => {
            info!("Reading text file: {}", input_file);
            let text = std::fs::read_to_string(input_file)
                .with_context(|| format!("Failed to read text file: {}", input_file))?;
            let midi_bytes =
                midi::convert_text_to_midi(&text, track_name(output_file), &options)
                    .context("Failed to convert text to MIDI")?;

            info!("Writing MIDI file: {}", output_file);
            std::fs::write(output_file, midi_bytes)
                .with_context(|| format!("Failed to write MIDI file: {}", output_file))?;
        }
        (input, output) => {
            anyhow::bail!(
                "Cannot convert {:?} to {:?}: one side must be MIDI and the other text",
                input,
                output
            );
        }
    }

    Ok(())
}
