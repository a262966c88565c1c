use alloc::{boxed::Box, vec::Vec};

use crate::{LexerInput, LexerOptions, RawToken};

/// Externalised automaton state captured after a token.
///
/// `state` is the language's own tag for where the automaton stands between
/// tokens; `counter` is an auxiliary signed counter (nesting depth, open
/// conditional operators, ...). `None` in place of a snapshot always means
/// "initial state".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LexerState {
    pub state: u16,
    pub counter: i32,
}

impl LexerState {
    #[must_use]
    pub const fn new(state: u16, counter: i32) -> Self {
        Self { state, counter }
    }
}

/// A per-language lexical automaton.
///
/// The automaton holds no reference to the input; each call reads from the
/// input it is given, starting at a token boundary, and returns the next
/// token or `None` once the input is exhausted. Malformed input must come
/// back as error-kind tokens, never as a panic.
pub trait Lexer {
    fn next_token(&mut self, input: &mut LexerInput<'_>) -> Option<RawToken>;

    /// Snapshot to restart from after the last returned token.
    fn state(&self) -> Option<LexerState>;
}

/// Creates a lexer resuming from a snapshot (or from scratch for `None`).
pub type LexerFactory = fn(Option<LexerState>, &LexerOptions) -> Box<dyn Lexer>;

/// Runs a fresh lexer over all of `text`, returning every token with the
/// snapshot after it.
#[must_use]
pub fn tokenize(
    factory: LexerFactory,
    text: &[char],
    options: &LexerOptions,
) -> Vec<(RawToken, Option<LexerState>)> {
    let mut lexer = factory(None, options);
    let mut input = LexerInput::new(text);
    let mut out = Vec::new();
    while let Some(tok) = lexer.next_token(&mut input) {
        out.push((tok, lexer.state()));
    }
    debug_assert_eq!(
        input.position(),
        text.len(),
        "lexer stopped before the end of input"
    );
    out
}
