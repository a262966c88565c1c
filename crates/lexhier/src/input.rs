//! Code point input handed to a lexer while it recognises tokens.
//!
//! A [`LexerInput`] reads from a slice of the buffer starting at some token
//! boundary. The lexer reads ahead as far as it needs, backs up the code
//! points that belong to the next token, and then cuts a [`RawToken`] out of
//! everything read since the previous cut.
//!
//! Invariants
//! - `token_start <= pos <= text.len()`.
//! - `backup` never moves before `token_start`; doing so is a lexer bug and
//!   panics.
//! - An EOF read counts as one code point for `read_length_eof` and for the
//!   recorded lookahead, and is the first thing undone by `backup`.

use alloc::string::String;

/// A token cut from the input: `(kind, length)` plus the lookahead the lexer
/// used to decide where the token ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawToken {
    pub kind: u16,
    pub length: usize,
    pub lookahead: usize,
}

#[derive(Debug)]
pub struct LexerInput<'t> {
    text: &'t [char],
    pos: usize,
    token_start: usize,
    eof_read: bool,
    /// Exclusive end of everything examined since `token_start`, EOF
    /// counting as the slot at `text.len()`.
    furthest: usize,
}

impl<'t> LexerInput<'t> {
    #[must_use]
    pub fn new(text: &'t [char]) -> Self {
        Self::at(text, 0)
    }

    /// Input positioned at `start`, which must be a token boundary.
    #[must_use]
    pub fn at(text: &'t [char], start: usize) -> Self {
        assert!(start <= text.len(), "input start {start} past end {}", text.len());
        Self {
            text,
            pos: start,
            token_start: start,
            eof_read: false,
            furthest: start,
        }
    }

    /// Reads the next code point, or `None` at end of input.
    #[inline]
    pub fn read(&mut self) -> Option<char> {
        if let Some(&c) = self.text.get(self.pos) {
            self.pos += 1;
            self.furthest = self.furthest.max(self.pos);
            Some(c)
        } else {
            self.eof_read = true;
            self.furthest = self.furthest.max(self.text.len() + 1);
            None
        }
    }

    /// Un-reads `count` code points; an EOF read is undone first.
    pub fn backup(&mut self, mut count: usize) {
        if count == 0 {
            return;
        }
        if self.eof_read {
            self.eof_read = false;
            count -= 1;
        }
        assert!(
            count <= self.pos - self.token_start,
            "backup({count}) past token start (read length {})",
            self.pos - self.token_start
        );
        self.pos -= count;
    }

    /// Code points consumed since the last emitted token.
    #[inline]
    #[must_use]
    pub fn read_length(&self) -> usize {
        self.pos - self.token_start
    }

    /// Like [`read_length`](Self::read_length) but counts a pending EOF read
    /// as one extra code point. A value of 1 with `read_length() == 0` means
    /// the lexer hit a clean end of input.
    #[inline]
    #[must_use]
    pub fn read_length_eof(&self) -> usize {
        self.read_length() + usize::from(self.eof_read)
    }

    #[must_use]
    pub fn read_text(&self) -> &'t [char] {
        &self.text[self.token_start..self.pos]
    }

    #[must_use]
    pub fn read_string(&self) -> String {
        self.read_text().iter().collect()
    }

    /// Whether the pending text equals `s`.
    #[must_use]
    pub fn read_text_is(&self, s: &str) -> bool {
        let text = self.read_text();
        text.len() == s.chars().count() && text.iter().copied().eq(s.chars())
    }

    /// Absolute position of the next code point to read.
    #[must_use]
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Cuts everything read since the previous token into a token of `kind`.
    ///
    /// # Panics
    ///
    /// Panics if nothing was read: zero-length tokens would stall the lexing
    /// loop and break gapless coverage.
    pub fn token(&mut self, kind: u16) -> RawToken {
        let length = self.read_length();
        assert!(length > 0, "lexer produced a zero-length token (kind {kind})");
        let lookahead = self.furthest - self.pos;
        self.token_start = self.pos;
        self.furthest = self.pos;
        self.eof_read = false;
        RawToken {
            kind,
            length,
            lookahead,
        }
    }
}
