//! Token lists and incremental re-lexing.
//!
//! A [`TokenList`] covers a contiguous span of text with gapless tokens.
//! Token offsets are relative to the start of the list, so an embedded list
//! never needs touching when text before its host moves.
//!
//! Re-lexing after an edit restarts the automaton at the first token whose
//! examined text (token plus lookahead) reaches the edit, using the snapshot
//! stored after the preceding token. It stops as soon as a new token ends on
//! an old boundary behind the edit with the same snapshot as the old token
//! there: from that point on the old tokens are still what the lexer would
//! produce.
//!
//! Invariants
//! - `entries[0].offset == 0` and `entries[i + 1].offset == entries[i].offset
//!   + entries[i].length`; every length is positive.
//! - The lengths add up to `len`.
//! - `la` has one `(lookahead, snapshot-after-token)` pair per entry.

use alloc::{boxed::Box, vec::Vec};
use core::{cell::OnceCell, ops::Range};

use crate::{
    IntegrityError, LaState, Language, LanguagePath, LanguageRegistry, LexerInput, LexerOptions,
    LexerState, WrapContext,
};

#[derive(Debug)]
pub(crate) struct TokenEntry {
    pub(crate) kind: u16,
    pub(crate) offset: usize,
    pub(crate) length: usize,
    /// Default embedding removed by the user; cleared by re-lexing.
    pub(crate) suppressed: bool,
    pub(crate) embedded: OnceCell<Option<Box<TokenList>>>,
}

impl TokenEntry {
    fn new(kind: u16, offset: usize, length: usize) -> Self {
        Self {
            kind,
            offset,
            length,
            suppressed: false,
            embedded: OnceCell::new(),
        }
    }

    pub(crate) fn end(&self) -> usize {
        self.offset + self.length
    }
}

/// What an edit did to a token list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TokenChange {
    pub offset: usize,
    pub removed_len: usize,
    pub inserted_len: usize,
    /// Index of the first replaced token.
    pub index: usize,
    /// Span (after the edit) that was lexed again.
    pub relex_start: usize,
    pub relex_end: usize,
    pub removed_tokens: usize,
    pub added_tokens: usize,
    /// Whether lexing re-joined the old tokens before the end of the text.
    pub resynced: bool,
}

#[derive(Debug)]
pub struct TokenList {
    language: Language,
    path: LanguagePath,
    context: WrapContext,
    /// Offset of the list inside its host token (0 for a top-level list).
    start: usize,
    entries: Vec<TokenEntry>,
    la: LaState<LexerState>,
    /// Upper bound on every lookahead ever stored in `la`.
    max_lookahead: usize,
    len: usize,
}

impl TokenList {
    /// Lexes all of `text` with the innermost language of `path`.
    pub(crate) fn lex(
        registry: &LanguageRegistry,
        path: LanguagePath,
        text: &[char],
        options: &LexerOptions,
    ) -> Self {
        let language = path.innermost().clone();
        let context = registry.context_of(&path);
        let mut lexer = (language.def().lexer)(None, options);
        let mut input = LexerInput::new(text);
        let mut entries = Vec::new();
        let mut la = LaState::empty();
        let mut offset = 0;
        let mut max_lookahead = 0;
        while let Some(tok) = lexer.next_token(&mut input) {
            entries.push(TokenEntry::new(tok.kind, offset, tok.length));
            la.add(tok.lookahead, lexer.state());
            max_lookahead = max_lookahead.max(tok.lookahead);
            offset += tok.length;
        }
        assert_eq!(
            offset,
            text.len(),
            "{} lexer stopped at {offset} of {}",
            language.name(),
            text.len()
        );
        Self {
            language,
            path,
            context,
            start: 0,
            entries,
            la,
            max_lookahead,
            len: text.len(),
        }
    }

    #[must_use]
    pub fn language(&self) -> &Language {
        &self.language
    }

    #[must_use]
    pub fn path(&self) -> &LanguagePath {
        &self.path
    }

    #[must_use]
    pub fn context(&self) -> &WrapContext {
        &self.context
    }

    /// Offset of this list relative to the start of its host token.
    #[must_use]
    pub fn start_in_host(&self) -> usize {
        self.start
    }

    #[must_use]
    pub fn token_count(&self) -> usize {
        self.entries.len()
    }

    /// Length of the covered text.
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn lookahead(&self, index: usize) -> usize {
        self.la.lookahead(index)
    }

    #[must_use]
    pub fn state(&self, index: usize) -> Option<&LexerState> {
        self.la.state(index)
    }

    pub(crate) fn entry(&self, index: usize) -> &TokenEntry {
        &self.entries[index]
    }

    pub(crate) fn entry_mut(&mut self, index: usize) -> &mut TokenEntry {
        &mut self.entries[index]
    }

    /// `(kind, offset, length)` of each token, list-relative.
    pub fn tokens(&self) -> impl Iterator<Item = (u16, usize, usize)> + '_ {
        self.entries.iter().map(|e| (e.kind, e.offset, e.length))
    }

    /// Index of the token containing list-relative `offset`.
    #[must_use]
    pub fn index_at(&self, offset: usize) -> Option<usize> {
        if offset >= self.len {
            return None;
        }
        Some(self.entries.partition_point(|e| e.end() <= offset))
    }

    /// Number of tokens intersecting the list-relative range `start..end`.
    #[must_use]
    pub fn token_count_in_range(&self, start: usize, end: usize) -> usize {
        self.indices_in_range(start, end).len()
    }

    /// Indices of the tokens intersecting the list-relative range `start..end`.
    pub(crate) fn indices_in_range(&self, start: usize, end: usize) -> Range<usize> {
        if start >= end {
            return 0..0;
        }
        let first = self.entries.partition_point(|e| e.end() <= start);
        let last = self.entries.partition_point(|e| e.offset < end);
        first..last.max(first)
    }

    /// The embedded list of token `index`, lexing it on first access.
    ///
    /// `base` is the absolute offset of this list and `text` the whole
    /// buffer.
    pub(crate) fn embedded(
        &self,
        index: usize,
        base: usize,
        text: &[char],
        registry: &LanguageRegistry,
        options: &LexerOptions,
    ) -> Option<&TokenList> {
        let entry = &self.entries[index];
        if entry.suppressed {
            return None;
        }
        entry
            .embedded
            .get_or_init(|| self.create_embedding(entry, base, text, registry, options))
            .as_deref()
    }

    fn create_embedding(
        &self,
        entry: &TokenEntry,
        base: usize,
        text: &[char],
        registry: &LanguageRegistry,
        options: &LexerOptions,
    ) -> Option<Box<TokenList>> {
        let host_start = base + entry.offset;
        let host = &text[host_start..host_start + entry.length];
        let embedding = (self.language.def().embedding)(entry.kind, host)?;
        if embedding.start_skip + embedding.end_skip > entry.length {
            return None;
        }
        let Some(language) = registry.language(embedding.language) else {
            log::debug!(
                "{} token at {host_start} embeds unknown language '{}'",
                self.language.name(),
                embedding.language
            );
            return None;
        };
        let inner = &host[embedding.start_skip..entry.length - embedding.end_skip];
        let path = self.path.embedded(&language);
        log::debug!(
            "materialising {path:?} embedding at {} ({} chars)",
            host_start + embedding.start_skip,
            inner.len()
        );
        let mut list = TokenList::lex(registry, path, inner, options);
        list.start = embedding.start_skip;
        Some(Box::new(list))
    }

    /// Drops every materialised embedding below this list.
    pub(crate) fn evict_embeddings(&mut self) -> usize {
        let mut evicted = 0;
        for entry in &mut self.entries {
            if entry.embedded.take().flatten().is_some() {
                evicted += 1;
            }
        }
        evicted
    }

    /// Re-lexes after `removed` characters at `offset` were replaced by
    /// `inserted` characters. `text` is the list's text after the edit.
    pub(crate) fn relex(
        &mut self,
        text: &[char],
        offset: usize,
        removed: usize,
        inserted: usize,
        options: &LexerOptions,
    ) -> TokenChange {
        debug_assert_eq!(self.len + inserted, text.len() + removed);
        let first = self.first_affected(offset);
        let (relex_start, restart) = if first == 0 {
            (0, None)
        } else {
            (self.entries[first - 1].end(), self.la.state(first - 1).copied())
        };

        let mut lexer = (self.language.def().lexer)(restart, options);
        let mut input = LexerInput::at(text, relex_start);
        let mut fresh = Vec::new();
        let mut fresh_la = LaState::empty();
        let edit_end = offset + inserted;
        let mut old = first;
        let mut synced_at = None;
        let mut pos = relex_start;

        while let Some(tok) = lexer.next_token(&mut input) {
            let state = lexer.state();
            fresh.push(TokenEntry::new(tok.kind, pos, tok.length));
            fresh_la.add(tok.lookahead, state);
            self.max_lookahead = self.max_lookahead.max(tok.lookahead);
            pos += tok.length;
            log::trace!("relexed {} token {} at {}", self.language.name(), tok.kind, pos - tok.length);

            if pos < edit_end || pos == text.len() {
                continue;
            }
            let old_end = pos - inserted + removed;
            while old < self.entries.len() && self.entries[old].end() < old_end {
                old += 1;
            }
            if old < self.entries.len()
                && self.entries[old].end() == old_end
                && self.la.state(old) == state.as_ref()
            {
                synced_at = Some(old);
                break;
            }
        }

        let replaced_end = match synced_at {
            Some(last) => last + 1,
            None => {
                assert_eq!(
                    pos,
                    text.len(),
                    "{} lexer stopped at {pos} of {}",
                    self.language.name(),
                    text.len()
                );
                self.entries.len()
            }
        };
        for entry in &mut self.entries[replaced_end..] {
            entry.offset = entry.offset - removed + inserted;
        }
        let removed_tokens = replaced_end - first;
        let added_tokens = fresh.len();
        self.entries.splice(first..replaced_end, fresh);
        self.la.remove(first, removed_tokens);
        self.la.add_all(first, &fresh_la);
        self.len = text.len();

        let change = TokenChange {
            offset,
            removed_len: removed,
            inserted_len: inserted,
            index: first,
            relex_start,
            relex_end: pos,
            removed_tokens,
            added_tokens,
            resynced: synced_at.is_some(),
        };
        log::debug!("{} relex: {change:?}", self.language.name());
        change
    }

    /// First token whose examined text reaches `offset`.
    ///
    /// A token far back may have peeked across several shorter ones, so the
    /// walk only stops once no stored lookahead can span the gap.
    fn first_affected(&self, offset: usize) -> usize {
        let mut first = self.entries.partition_point(|e| e.end() <= offset);
        let mut prev = first;
        while prev > 0 {
            prev -= 1;
            let end = self.entries[prev].end();
            if end + self.max_lookahead <= offset {
                break;
            }
            if end + self.la.lookahead(prev) > offset {
                first = prev;
            }
        }
        first
    }

    /// Checks the gapless-coverage invariants of this list only.
    ///
    /// # Errors
    ///
    /// Returns the first violated invariant.
    pub fn check_integrity(&self) -> Result<(), IntegrityError> {
        if self.la.len() != self.entries.len() {
            return Err(IntegrityError::StateCount {
                tokens: self.entries.len(),
                states: self.la.len(),
            });
        }
        let mut expected = 0;
        for (index, entry) in self.entries.iter().enumerate() {
            if entry.length == 0 {
                return Err(IntegrityError::EmptyToken { index });
            }
            if entry.offset != expected {
                return Err(IntegrityError::Gap {
                    index,
                    expected,
                    found: entry.offset,
                });
            }
            expected = entry.end();
        }
        if expected != self.len {
            return Err(IntegrityError::Coverage {
                covered: expected,
                len: self.len,
            });
        }
        Ok(())
    }

    /// Whether both lists hold the same tokens, lookaheads and snapshots.
    #[must_use]
    pub fn same_tokens(&self, other: &TokenList) -> bool {
        self.len == other.len
            && self.tokens().eq(other.tokens())
            && self.la.iter().eq(other.la.iter())
    }
}
