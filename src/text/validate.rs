//! Finite-state sanitizer for the tick text grammar.
//!
//! Every symbol the current state cannot accept is dropped, so the output is
//! always something the decoder reads without error. The state advances on
//! kept symbols only; dropped and invalid symbols leave it as it was.
//!
//! [`State::next`] still maps an invalid symbol to [`State::Any`], but
//! [`sanitize`] never feeds it one. Resetting on a dropped symbol would let a
//! rest-marker follow a chain-marker once the chain was rejected, and a second
//! pass could then strip more. Advancing on kept symbols only keeps
//! `sanitize(sanitize(s)) == sanitize(s)`. The cost is that garbage between
//! tokens never relaxes the grammar: `A001q~ B001` becomes `A001 B001`, where
//! a reset on `q` would have kept the `~`.

use crate::text::grammar::{SymbolClass, Symbols};
use log::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum State {
    /// Start of input, nothing constrained yet.
    Any,
    /// After a note: a separator or a chain-marker.
    SepOrChain,
    /// After a rest-marker: only a separator.
    Sep,
    /// After a separator: a note or a rest-marker.
    NoteOrRest,
    /// After a chain-marker: only a note.
    Note,
}

impl State {
    pub const ALL: [State; 5] = [
        State::Any,
        State::SepOrChain,
        State::Sep,
        State::NoteOrRest,
        State::Note,
    ];

    pub fn accepts(self, class: SymbolClass) -> bool {
        use SymbolClass as C;
        match self {
            State::Any => matches!(class, C::Separator | C::Rest | C::Note),
            State::SepOrChain => matches!(class, C::Separator | C::Chain),
            State::Sep => matches!(class, C::Separator),
            State::NoteOrRest => matches!(class, C::Rest | C::Note),
            State::Note => matches!(class, C::Note),
        }
    }

    /// The state after reading `class`. Depends on the symbol alone.
    pub fn next(self, class: SymbolClass) -> State {
        match class {
            SymbolClass::Separator => State::NoteOrRest,
            SymbolClass::Chain => State::Note,
            SymbolClass::Rest => State::Sep,
            SymbolClass::Note => State::SepOrChain,
            SymbolClass::Invalid => State::Any,
        }
    }
}

/// Strips every symbol that may not follow what has been kept so far.
pub fn sanitize(text: &str) -> String {
    let mut output = String::with_capacity(text.len());
    let mut state = State::Any;
    let mut dropped = 0usize;

    for (symbol, raw) in Symbols::new(text) {
        let class = symbol.class();
        if state.accepts(class) {
            output.push_str(raw);
            state = state.next(class);
        } else {
            dropped += 1;
        }
    }

    if dropped > 0 {
        warn!("Sanitizer dropped {} symbols", dropped);
    }
    output
}

/// True when `text` passes through [`sanitize`] unchanged.
pub fn is_valid(text: &str) -> bool {
    let mut state = State::Any;
    for (symbol, _) in Symbols::new(text) {
        let class = symbol.class();
        if !state.accepts(class) {
            return false;
        }
        state = state.next(class);
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    #[test]
    fn test_acceptance_table() {
        use SymbolClass as C;
        let expected = [
            (State::Any, [true, false, true, true, false]),
            (State::SepOrChain, [true, true, false, false, false]),
            (State::Sep, [true, false, false, false, false]),
            (State::NoteOrRest, [false, false, true, true, false]),
            (State::Note, [false, false, false, true, false]),
        ];
        let classes = [C::Separator, C::Chain, C::Rest, C::Note, C::Invalid];

        for (state, row) in expected {
            for (class, keep) in classes.iter().zip(row) {
                assert_eq!(state.accepts(*class), keep, "{:?} {:?}", state, class);
            }
        }
    }

    #[test]
    fn test_transition_table() {
        for state in State::ALL {
            for class in SymbolClass::ALL {
                let expected = match class {
                    SymbolClass::Separator => State::NoteOrRest,
                    SymbolClass::Chain => State::Note,
                    SymbolClass::Rest => State::Sep,
                    SymbolClass::Note => State::SepOrChain,
                    SymbolClass::Invalid => State::Any,
                };
                assert_eq!(state.next(class), expected, "{:?} {:?}", state, class);
            }
        }
    }

    #[test]
    fn test_valid_text_is_untouched() {
        for text in ["~", "~ ~ A001", "=012!A003 ~ y999", "A001 ", " ~", ""] {
            assert_eq!(sanitize(text), text);
            assert!(is_valid(text));
        }
    }

    #[test]
    fn test_rest_after_chain_is_dropped() {
        assert_eq!(sanitize("A001!~B002"), "A001!B002");
        assert!(!is_valid("A001!~B002"));
    }

    #[test]
    fn test_invalid_characters_are_dropped() {
        assert_eq!(sanitize("A001xyz ~"), "A001 ~");
        assert_eq!(sanitize("\t~ A01 B001\n"), "~ B001");
        assert_eq!(sanitize("hello"), "");
    }

    #[test]
    fn test_structural_violations_are_dropped() {
        // doubled markers
        assert_eq!(sanitize("A001!! B001"), "A001!B001");
        assert_eq!(sanitize("~~ ~"), "~ ~");
        // a rest may not be chained
        assert_eq!(sanitize("A001!~ ~"), "A001!");
        // notes need a separator between tick groups
        assert_eq!(sanitize("A001B001"), "A001");
        assert_eq!(sanitize("~A001 B001"), "~ B001");
    }

    #[test]
    fn test_dropped_symbol_does_not_reset_state() {
        // the invalid 'q' must not let the rest-marker follow the note
        assert_eq!(sanitize("A001q~ B001"), "A001 B001");
    }

    #[test]
    fn test_idempotent() {
        let alphabet: Vec<char> = " !~0123456789ABz=\"y#\té".chars().collect();
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..2000 {
            let len = rng.gen_range(0..40);
            let text: String = (0..len)
                .map(|_| alphabet[rng.gen_range(0..alphabet.len())])
                .collect();
            let once = sanitize(&text);
            assert_eq!(sanitize(&once), once, "input {:?}", text);
            assert!(is_valid(&once));
        }
    }
}
