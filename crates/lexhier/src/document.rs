//! The text buffer plus its token hierarchy.

use alloc::{rc::Rc, string::String, vec::Vec};
use core::fmt;

use bstr::ByteSlice;

use crate::{
    EditError, Error, IntegrityError, Language, LanguagePath, LanguageRegistry, LexerOptions,
    Token, TokenChange, TokenSequence, TokenSequenceList,
    sequence::Hierarchy,
    token_list::TokenList,
};

/// A mutable text buffer whose top-level tokens are kept up to date on every
/// edit.
///
/// Offsets and lengths count code points. Edits take `&mut self`, so no
/// [`TokenSequence`] can observe a half-updated hierarchy; embedded lists
/// below an edited token are discarded and re-lexed lazily on the next query.
pub struct Document {
    registry: Rc<LanguageRegistry>,
    options: LexerOptions,
    text: Vec<char>,
    root: TokenList,
}

impl fmt::Debug for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Document")
            .field("language", self.language())
            .field("len", &self.text.len())
            .field("tokens", &self.root.token_count())
            .finish_non_exhaustive()
    }
}

impl Document {
    #[must_use]
    pub fn new(
        registry: Rc<LanguageRegistry>,
        language: &Language,
        text: &str,
        options: LexerOptions,
    ) -> Self {
        Self::from_chars(registry, language, text.chars().collect(), options)
    }

    /// Creates a document for a language looked up by name.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Registry`] if `language` is not registered.
    pub fn open(
        registry: Rc<LanguageRegistry>,
        language: &str,
        text: &str,
        options: LexerOptions,
    ) -> Result<Self, Error> {
        let language = registry.require(language)?;
        Ok(Self::new(registry, &language, text, options))
    }

    /// Creates a document from bytes; invalid UTF-8 becomes U+FFFD.
    #[must_use]
    pub fn from_bytes(
        registry: Rc<LanguageRegistry>,
        language: &Language,
        bytes: &[u8],
        options: LexerOptions,
    ) -> Self {
        Self::from_chars(registry, language, bytes.chars().collect(), options)
    }

    fn from_chars(
        registry: Rc<LanguageRegistry>,
        language: &Language,
        text: Vec<char>,
        options: LexerOptions,
    ) -> Self {
        let root = TokenList::lex(&registry, LanguagePath::root(language), &text, &options);
        log::debug!(
            "lexed {} document: {} chars, {} tokens",
            language.name(),
            text.len(),
            root.token_count()
        );
        Self {
            registry,
            options,
            text,
            root,
        }
    }

    #[must_use]
    pub fn registry(&self) -> &Rc<LanguageRegistry> {
        &self.registry
    }

    #[must_use]
    pub fn options(&self) -> &LexerOptions {
        &self.options
    }

    #[must_use]
    pub fn language(&self) -> &Language {
        self.root.language()
    }

    #[must_use]
    pub fn text(&self) -> &[char] {
        &self.text
    }

    #[must_use]
    pub fn text_string(&self) -> String {
        self.text.iter().collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.text.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Number of top-level tokens.
    #[must_use]
    pub fn token_count(&self) -> usize {
        self.root.token_count()
    }

    /// Number of top-level tokens intersecting `start..end`.
    #[must_use]
    pub fn token_count_in_range(&self, start: usize, end: usize) -> usize {
        self.root.token_count_in_range(start, end)
    }

    /// # Errors
    ///
    /// Returns [`EditError::OffsetOutOfBounds`] if `offset` is past the end.
    pub fn insert(&mut self, offset: usize, text: &str) -> Result<TokenChange, EditError> {
        self.replace(offset, 0, text)
    }

    /// Inserts bytes; invalid UTF-8 becomes U+FFFD.
    ///
    /// # Errors
    ///
    /// Returns [`EditError::OffsetOutOfBounds`] if `offset` is past the end.
    pub fn insert_bytes(&mut self, offset: usize, bytes: &[u8]) -> Result<TokenChange, EditError> {
        self.check_range(offset, 0)?;
        let inserted: Vec<char> = bytes.chars().collect();
        Ok(self.apply(offset, 0, &inserted))
    }

    /// # Errors
    ///
    /// Fails if `offset..offset + length` is not inside the buffer.
    pub fn remove(&mut self, offset: usize, length: usize) -> Result<TokenChange, EditError> {
        self.replace(offset, length, "")
    }

    /// Replaces `length` code points at `offset` with `text` as one edit.
    ///
    /// # Errors
    ///
    /// Fails if `offset..offset + length` is not inside the buffer.
    pub fn replace(
        &mut self,
        offset: usize,
        length: usize,
        text: &str,
    ) -> Result<TokenChange, EditError> {
        self.check_range(offset, length)?;
        let inserted: Vec<char> = text.chars().collect();
        Ok(self.apply(offset, length, &inserted))
    }

    fn check_range(&self, offset: usize, length: usize) -> Result<(), EditError> {
        let len = self.text.len();
        if offset > len {
            return Err(EditError::OffsetOutOfBounds { offset, len });
        }
        if length > len - offset {
            return Err(EditError::RangeOutOfBounds {
                offset,
                length,
                len,
            });
        }
        Ok(())
    }

    fn apply(&mut self, offset: usize, removed: usize, inserted: &[char]) -> TokenChange {
        self.text
            .splice(offset..offset + removed, inserted.iter().copied());
        let change = self
            .root
            .relex(&self.text, offset, removed, inserted.len(), &self.options);
        #[cfg(any(test, feature = "fuzzing"))]
        if self.options.verify_relex {
            self.verify_relex();
        }
        debug_assert_eq!(self.root.check_integrity(), Ok(()));
        change
    }

    #[cfg(any(test, feature = "fuzzing"))]
    fn verify_relex(&self) {
        let fresh = TokenList::lex(
            &self.registry,
            self.root.path().clone(),
            &self.text,
            &self.options,
        );
        assert!(
            self.root.same_tokens(&fresh),
            "incremental relex diverged from a full lex of {:?}\nincremental: {:?}\nfull: {:?}",
            self.text_string(),
            self.root.tokens().collect::<Vec<_>>(),
            fresh.tokens().collect::<Vec<_>>(),
        );
    }

    fn hierarchy(&self) -> Hierarchy<'_> {
        Hierarchy {
            text: &self.text,
            registry: &self.registry,
            options: &self.options,
        }
    }

    /// Cursor over the top-level tokens.
    #[must_use]
    pub fn token_sequence(&self) -> TokenSequence<'_> {
        TokenSequence::new(self.hierarchy(), &self.root, 0)
    }

    /// The top-level token containing `offset`.
    #[must_use]
    pub fn token_at(&self, offset: usize) -> Option<Token<'_>> {
        let index = self.root.index_at(offset)?;
        Some(self.token_sequence().token_at_index(index))
    }

    /// The sequence of the innermost language of `path` that covers `offset`,
    /// lexing embeddings along the way as needed.
    #[must_use]
    pub fn embedded_sequence(&self, path: &LanguagePath, offset: usize) -> Option<TokenSequence<'_>> {
        let mut seq = self.token_sequence();
        if seq.language() != path.top() {
            return None;
        }
        for language in &path.languages()[1..] {
            let index = seq.list().index_at(offset.checked_sub(seq.base())?)?;
            let inner = seq.embedded_at(index)?;
            if inner.language() != language || offset < inner.start() || offset >= inner.end() {
                return None;
            }
            seq = inner;
        }
        Some(seq)
    }

    /// Sequences of the innermost language of `path` for every embedding
    /// region intersecting `start..end`.
    #[must_use]
    pub fn token_sequence_list(
        &self,
        path: &LanguagePath,
        start: usize,
        end: usize,
    ) -> TokenSequenceList<'_> {
        TokenSequenceList::collect(self.token_sequence(), path, start, end)
    }

    /// Removes the default embedding of the token at `offset` in the list of
    /// `path`'s innermost language. Returns whether such a token exists.
    ///
    /// The token's wrapped id switches to the no-default-embedding context
    /// until the token is re-lexed.
    pub fn suppress_embedding(&mut self, path: &LanguagePath, offset: usize) -> bool {
        // Materialise the lists along the path first.
        if self.embedded_sequence(path, offset).is_none() {
            return false;
        }
        let mut list = &mut self.root;
        let mut base = 0;
        for _ in &path.languages()[1..] {
            let Some(index) = offset.checked_sub(base).and_then(|rel| list.index_at(rel)) else {
                return false;
            };
            let entry = list.entry_mut(index);
            let host = base + entry.offset;
            let Some(inner) = entry.embedded.get_mut().and_then(Option::as_deref_mut) else {
                return false;
            };
            base = host + inner.start_in_host();
            list = inner;
        }
        let Some(index) = offset.checked_sub(base).and_then(|rel| list.index_at(rel)) else {
            return false;
        };
        let entry = list.entry_mut(index);
        entry.suppressed = true;
        if entry.embedded.take().flatten().is_some() {
            log::debug!("dropped embedding of {path:?} token at {}", base + entry.offset);
        }
        true
    }

    /// Drops every materialised embedded list; they are re-lexed on demand.
    /// Returns the number of top-level tokens that had one.
    pub fn evict_embeddings(&mut self) -> usize {
        let evicted = self.root.evict_embeddings();
        log::debug!("evicted {evicted} embedded lists");
        evicted
    }

    /// Checks gapless coverage of the top-level list and of every
    /// materialised embedded list.
    ///
    /// # Errors
    ///
    /// Returns the first violated invariant.
    pub fn check_integrity(&self) -> Result<(), IntegrityError> {
        check_deep(&self.root)
    }
}

fn check_deep(list: &TokenList) -> Result<(), IntegrityError> {
    list.check_integrity()?;
    for index in 0..list.token_count() {
        if let Some(Some(inner)) = list.entry(index).embedded.get() {
            check_deep(inner)?;
        }
    }
    Ok(())
}
