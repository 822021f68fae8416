//! Token alphabet of the per-tick text format.
//!
//! A line is a sequence of tick groups separated by a single space. A group
//! is either the rest-marker `~` or one or more note tokens joined by the
//! chain-marker `!`. A note token is one pitch character followed by exactly
//! three decimal digits of duration in ticks, e.g. `=024`.

use std::fmt;

pub const SEPARATOR: char = ' ';
pub const CHAIN: char = '!';
pub const REST: char = '~';

/// Distance between a pitch and the code point of its character.
pub const PITCH_CHAR_OFFSET: u32 = 13;
/// Pitch characters span `"` (34) to `y` (121), which excludes the three
/// marker characters.
pub const MIN_PITCH_CHAR: u32 = 34;
pub const MAX_PITCH_CHAR: u32 = 121;

pub const DURATION_DIGITS: usize = 3;
pub const MAX_DURATION: u64 = 999;

/// Maps a pitch to its token character: `char(pitch + 13)`, defined for
/// pitches 21 through 108 only.
pub fn pitch_to_char(pitch: i32) -> Option<char> {
    let code = u32::try_from(pitch).ok()? + PITCH_CHAR_OFFSET;
    if (MIN_PITCH_CHAR..=MAX_PITCH_CHAR).contains(&code) {
        char::from_u32(code)
    } else {
        None
    }
}

/// Inverse of [`pitch_to_char`].
pub fn char_to_pitch(ch: char) -> Option<i32> {
    let code = ch as u32;
    if (MIN_PITCH_CHAR..=MAX_PITCH_CHAR).contains(&code) {
        Some((code - PITCH_CHAR_OFFSET) as i32)
    } else {
        None
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SymbolClass {
    Separator,
    Chain,
    Rest,
    Note,
    Invalid,
}

impl SymbolClass {
    pub const ALL: [SymbolClass; 5] = [
        SymbolClass::Separator,
        SymbolClass::Chain,
        SymbolClass::Rest,
        SymbolClass::Note,
        SymbolClass::Invalid,
    ];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Symbol {
    Separator,
    Chain,
    Rest,
    Note { pitch: i32, duration: u16 },
    Invalid(char),
}

impl Symbol {
    pub fn class(&self) -> SymbolClass {
        match self {
            Symbol::Separator => SymbolClass::Separator,
            Symbol::Chain => SymbolClass::Chain,
            Symbol::Rest => SymbolClass::Rest,
            Symbol::Note { .. } => SymbolClass::Note,
            Symbol::Invalid(_) => SymbolClass::Invalid,
        }
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Symbol::Separator => write!(f, "{}", SEPARATOR),
            Symbol::Chain => write!(f, "{}", CHAIN),
            Symbol::Rest => write!(f, "{}", REST),
            Symbol::Note { pitch, duration } => {
                // out-of-band pitches still print their raw code point
                let ch = pitch
                    .checked_add(PITCH_CHAR_OFFSET as i32)
                    .and_then(|code| u32::try_from(code).ok())
                    .and_then(char::from_u32)
                    .unwrap_or(char::REPLACEMENT_CHARACTER);
                write!(f, "{}{:03}", ch, duration)
            }
            Symbol::Invalid(ch) => write!(f, "{}", ch),
        }
    }
}

/// Splits raw text into symbols. Never fails: anything unrecognised comes
/// out as a one-character [`Symbol::Invalid`].
pub struct Symbols<'a> {
    rest: &'a str,
}

impl<'a> Symbols<'a> {
    pub fn new(text: &'a str) -> Self {
        Self { rest: text }
    }
}

fn parse_duration(digits: &str) -> Option<u16> {
    if digits.len() == DURATION_DIGITS && digits.bytes().all(|b| b.is_ascii_digit()) {
        digits.parse().ok()
    } else {
        None
    }
}

impl<'a> Iterator for Symbols<'a> {
    /// The symbol and the exact text it was read from.
    type Item = (Symbol, &'a str);

    fn next(&mut self) -> Option<Self::Item> {
        let ch = self.rest.chars().next()?;
        let width = ch.len_utf8();

        let (symbol, consumed) = match ch {
            SEPARATOR => (Symbol::Separator, width),
            CHAIN => (Symbol::Chain, width),
            REST => (Symbol::Rest, width),
            _ => {
                let note = char_to_pitch(ch).and_then(|pitch| {
                    let digits = self.rest.get(width..width + DURATION_DIGITS)?;
                    let duration = parse_duration(digits)?;
                    Some(Symbol::Note { pitch, duration })
                });
                match note {
                    Some(note) => (note, width + DURATION_DIGITS),
                    None => (Symbol::Invalid(ch), width),
                }
            }
        };

        let (text, rest) = self.rest.split_at(consumed);
        self.rest = rest;
        Some((symbol, text))
    }
}
