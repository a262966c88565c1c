//! Cursors over token lists.

use alloc::{rc::Rc, string::String};
use core::fmt;

use crate::{
    Language, LanguagePath, LanguageRegistry, LexerOptions, TokenCategory, WrapContext,
    WrapTokenId, token_list::TokenList,
};

/// What a cursor needs besides its list to materialise embeddings.
#[derive(Clone, Copy)]
pub(crate) struct Hierarchy<'a> {
    /// The whole buffer; list offsets are relative to a base inside it.
    pub(crate) text: &'a [char],
    pub(crate) registry: &'a LanguageRegistry,
    pub(crate) options: &'a LexerOptions,
}

/// A token as seen through a [`TokenSequence`]: its wrapped id and absolute
/// position.
#[derive(Clone)]
pub struct Token<'a> {
    id: Rc<WrapTokenId>,
    offset: usize,
    text: &'a [char],
}

impl<'a> Token<'a> {
    /// Shared id: the same token kind in the same embedding context returns
    /// the same `Rc` while it stays cached.
    #[must_use]
    pub fn id(&self) -> &Rc<WrapTokenId> {
        &self.id
    }

    #[must_use]
    pub fn kind(&self) -> u16 {
        self.id.id.ordinal
    }

    #[must_use]
    pub fn name(&self) -> &'static str {
        self.id.id.name()
    }

    #[must_use]
    pub fn category(&self) -> TokenCategory {
        self.id.id.category()
    }

    #[must_use]
    pub fn offset(&self) -> usize {
        self.offset
    }

    #[must_use]
    pub fn length(&self) -> usize {
        self.text.len()
    }

    #[must_use]
    pub fn end(&self) -> usize {
        self.offset + self.text.len()
    }

    #[must_use]
    pub fn chars(&self) -> &'a [char] {
        self.text
    }

    #[must_use]
    pub fn text(&self) -> String {
        self.text.iter().collect()
    }

    /// Whether the token's default embedding was suppressed.
    #[must_use]
    pub fn is_embedding_suppressed(&self) -> bool {
        self.id.context == WrapContext::NoDefaultEmbedding
    }
}

impl fmt::Debug for Token<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}{:?}", self.name(), self.offset, self.text())
    }
}

impl fmt::Display for Token<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.text.iter().try_for_each(|c| fmt::Write::write_char(f, *c))
    }
}

/// Bidirectional cursor over one token list.
///
/// The cursor sits either on a token or between tokens. A fresh sequence sits
/// before the first token, so the usual loop is
/// `while seq.move_next() { ... seq.token() ... }`.
#[derive(Clone)]
pub struct TokenSequence<'a> {
    hierarchy: Hierarchy<'a>,
    list: &'a TokenList,
    /// Absolute offset of the list start.
    base: usize,
    /// Token `move_next` lands on.
    next: usize,
    current: Option<usize>,
}

impl<'a> TokenSequence<'a> {
    pub(crate) fn new(hierarchy: Hierarchy<'a>, list: &'a TokenList, base: usize) -> Self {
        Self {
            hierarchy,
            list,
            base,
            next: 0,
            current: None,
        }
    }

    pub(crate) fn list(&self) -> &'a TokenList {
        self.list
    }

    pub(crate) fn base(&self) -> usize {
        self.base
    }

    #[must_use]
    pub fn language(&self) -> &'a Language {
        self.list.language()
    }

    #[must_use]
    pub fn language_path(&self) -> &'a LanguagePath {
        self.list.path()
    }

    #[must_use]
    pub fn token_count(&self) -> usize {
        self.list.token_count()
    }

    /// Absolute start of the covered text.
    #[must_use]
    pub fn start(&self) -> usize {
        self.base
    }

    /// Absolute end of the covered text.
    #[must_use]
    pub fn end(&self) -> usize {
        self.base + self.list.len()
    }

    /// Index of the current token.
    #[must_use]
    pub fn index(&self) -> Option<usize> {
        self.current
    }

    pub fn move_next(&mut self) -> bool {
        if self.next < self.list.token_count() {
            self.current = Some(self.next);
            self.next += 1;
            true
        } else {
            self.current = None;
            false
        }
    }

    pub fn move_previous(&mut self) -> bool {
        let at = self.current.unwrap_or(self.next);
        if at == 0 {
            self.current = None;
            self.next = 0;
            return false;
        }
        self.current = Some(at - 1);
        self.next = at;
        true
    }

    /// Positions the cursor so that `move_next` lands on token `index`
    /// (clamped to the token count).
    pub fn move_index(&mut self, index: usize) {
        self.next = index.min(self.list.token_count());
        self.current = None;
    }

    pub fn move_start(&mut self) {
        self.move_index(0);
    }

    pub fn move_end(&mut self) {
        self.move_index(self.list.token_count());
    }

    /// Positions the cursor so that `move_next` lands on the token containing
    /// absolute `offset`, and returns `offset` minus that token's start.
    ///
    /// Offsets before the list land on the first token (negative result);
    /// offsets at or past its end land on the last token (result at least the
    /// token's length). Returns `None` for an empty list.
    #[allow(clippy::cast_possible_wrap)]
    pub fn move_to(&mut self, offset: usize) -> Option<isize> {
        self.current = None;
        let count = self.list.token_count();
        if count == 0 {
            self.next = 0;
            return None;
        }
        let index = if offset < self.base {
            0
        } else {
            self.list.index_at(offset - self.base).unwrap_or(count - 1)
        };
        self.next = index;
        let start = self.base + self.list.entry(index).offset;
        Some(offset as isize - start as isize)
    }

    #[must_use]
    pub fn token(&self) -> Option<Token<'a>> {
        self.current.map(|i| self.token_at_index(i))
    }

    /// Absolute offset of the current token.
    #[must_use]
    pub fn offset(&self) -> Option<usize> {
        self.current.map(|i| self.base + self.list.entry(i).offset)
    }

    pub(crate) fn token_at_index(&self, index: usize) -> Token<'a> {
        let entry = self.list.entry(index);
        let language = self.list.language();
        let id = if entry.suppressed {
            language.wrap(entry.kind, &WrapContext::NoDefaultEmbedding)
        } else {
            language.wrap(entry.kind, self.list.context())
        };
        let offset = self.base + entry.offset;
        Token {
            id,
            offset,
            text: &self.hierarchy.text[offset..offset + entry.length],
        }
    }

    /// All tokens of the list, independent of the cursor.
    pub fn tokens(&self) -> impl Iterator<Item = Token<'a>> + '_ {
        (0..self.list.token_count()).map(|i| self.token_at_index(i))
    }

    /// Embedded sequence of the current token, lexing it on first access.
    #[must_use]
    pub fn embedded(&self) -> Option<TokenSequence<'a>> {
        self.embedded_at(self.current?)
    }

    pub(crate) fn embedded_at(&self, index: usize) -> Option<TokenSequence<'a>> {
        let Hierarchy {
            text,
            registry,
            options,
        } = self.hierarchy;
        let list = self.list;
        let inner = list.embedded(index, self.base, text, registry, options)?;
        let base = self.base + list.entry(index).offset + inner.start_in_host();
        Some(TokenSequence::new(self.hierarchy, inner, base))
    }
}

impl fmt::Debug for TokenSequence<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenSequence")
            .field("path", self.language_path())
            .field("start", &self.start())
            .field("tokens", &self.token_count())
            .field("index", &self.current)
            .finish()
    }
}
