//! All token sequences of one embedded language over an offset range.
//!
//! Walking down a [`LanguagePath`], every token of the current level that
//! intersects the range and embeds the next language of the path contributes
//! its embedded list. At the last level each embedded list (one embedding
//! region) becomes one entry; empty lists are left out.

use alloc::vec::Vec;
use core::slice;

use crate::{LanguagePath, TokenSequence};

#[derive(Debug)]
pub struct TokenSequenceList<'a> {
    path: LanguagePath,
    start: usize,
    end: usize,
    sequences: Vec<TokenSequence<'a>>,
}

impl<'a> TokenSequenceList<'a> {
    /// Collects below `root`, whose language must be the top of `path`.
    pub(crate) fn collect(root: TokenSequence<'a>, path: &LanguagePath, start: usize, end: usize) -> Self {
        let mut sequences = Vec::new();
        if root.language() == path.top() {
            // A point query still wants the token containing the point.
            let end = end.max(start + 1);
            walk(root, path, 1, start, end, &mut sequences);
        }
        log::trace!("{path:?} over {start}..{end}: {} sequences", sequences.len());
        Self {
            path: path.clone(),
            start,
            end,
            sequences,
        }
    }

    #[must_use]
    pub fn path(&self) -> &LanguagePath {
        &self.path
    }

    #[must_use]
    pub fn range(&self) -> (usize, usize) {
        (self.start, self.end)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.sequences.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sequences.is_empty()
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&TokenSequence<'a>> {
        self.sequences.get(index)
    }

    pub fn iter(&self) -> slice::Iter<'_, TokenSequence<'a>> {
        self.sequences.iter()
    }
}

impl<'a> IntoIterator for TokenSequenceList<'a> {
    type Item = TokenSequence<'a>;
    type IntoIter = alloc::vec::IntoIter<TokenSequence<'a>>;

    fn into_iter(self) -> Self::IntoIter {
        self.sequences.into_iter()
    }
}

impl<'s, 'a> IntoIterator for &'s TokenSequenceList<'a> {
    type Item = &'s TokenSequence<'a>;
    type IntoIter = slice::Iter<'s, TokenSequence<'a>>;

    fn into_iter(self) -> Self::IntoIter {
        self.sequences.iter()
    }
}

/// `seq` is at `path[depth - 1]`.
fn walk<'a>(
    seq: TokenSequence<'a>,
    path: &LanguagePath,
    depth: usize,
    start: usize,
    end: usize,
    out: &mut Vec<TokenSequence<'a>>,
) {
    if depth == path.len() {
        if seq.token_count() > 0 {
            out.push(seq);
        }
        return;
    }
    let base = seq.base();
    if end <= base {
        return;
    }
    let wanted = &path.languages()[depth];
    for index in seq.list().indices_in_range(start.saturating_sub(base), end - base) {
        let Some(inner) = seq.embedded_at(index) else {
            continue;
        };
        if inner.language() == wanted {
            walk(inner, path, depth + 1, start, end, out);
        }
    }
}
