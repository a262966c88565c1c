//! Token ids wrapped with their embedding context.
//!
//! Tokens of the same kind in the same embedding context share one
//! [`WrapTokenId`]. The plain and no-default-embedding wraps are memoised per
//! token kind for the life of the cache; wraps for embedded contexts live in
//! a small per-kind LRU keyed by the identity of the context's
//! [`LanguageIdSet`]. A wrap evicted from that LRU is not remembered
//! anywhere, so asking again yields a fresh, non-identical wrap.

use alloc::{rc::Rc, vec::Vec};

use super::{LanguageIdSet, TokenId, TokenInfo};

/// Lines per token kind in the embedded-context cache.
pub const WRAP_CACHE_LINES: usize = 4;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WrapContext {
    /// Token of a top-level list.
    Plain,
    /// Token whose default embedding was suppressed.
    NoDefaultEmbedding,
    /// Token of an embedded list; the set holds the enclosing languages.
    Embedded(LanguageIdSet),
}

#[derive(Debug, PartialEq, Eq)]
pub struct WrapTokenId {
    pub id: TokenId,
    pub context: WrapContext,
}

impl WrapTokenId {
    #[must_use]
    pub fn ptr_eq(a: &Rc<Self>, b: &Rc<Self>) -> bool {
        Rc::ptr_eq(a, b)
    }
}

#[derive(Debug)]
struct KindEntry {
    plain: Rc<WrapTokenId>,
    no_default_embedding: Rc<WrapTokenId>,
    /// Most recently used first.
    lines: [Option<Rc<WrapTokenId>>; WRAP_CACHE_LINES],
}

#[derive(Debug)]
pub struct WrapTokenIdCache {
    tokens: &'static [TokenInfo],
    kinds: Vec<Option<KindEntry>>,
}

impl WrapTokenIdCache {
    #[must_use]
    pub fn new(tokens: &'static [TokenInfo]) -> Self {
        Self {
            tokens,
            kinds: Vec::new(),
        }
    }

    pub fn wrap(&mut self, ordinal: u16, context: &WrapContext) -> Rc<WrapTokenId> {
        match context {
            WrapContext::Plain => self.entry(ordinal).plain.clone(),
            WrapContext::NoDefaultEmbedding => self.entry(ordinal).no_default_embedding.clone(),
            WrapContext::Embedded(set) => self.embedded(ordinal, set),
        }
    }

    fn embedded(&mut self, ordinal: u16, set: &LanguageIdSet) -> Rc<WrapTokenId> {
        let id = self.token_id(ordinal);
        let lines = &mut self.entry(ordinal).lines;
        let hit = lines.iter().position(|line| {
            line.as_ref()
                .is_some_and(|w| matches!(&w.context, WrapContext::Embedded(s) if s == set))
        });
        if let Some(i) = hit {
            lines[..=i].rotate_right(1);
            if let Some(wrap) = &lines[0] {
                return wrap.clone();
            }
        }
        let wrap = Rc::new(WrapTokenId {
            id,
            context: WrapContext::Embedded(set.clone()),
        });
        lines.rotate_right(1);
        if let Some(evicted) = lines[0].replace(wrap.clone()) {
            log::trace!("wrap cache evicted {:?} for {}", evicted.context, id.name());
        }
        wrap
    }

    fn token_id(&self, ordinal: u16) -> TokenId {
        TokenId {
            ordinal,
            info: &self.tokens[usize::from(ordinal)],
        }
    }

    fn entry(&mut self, ordinal: u16) -> &mut KindEntry {
        let index = usize::from(ordinal);
        if self.kinds.len() <= index {
            self.kinds.resize_with(index + 1, || None);
        }
        let id = self.token_id(ordinal);
        self.kinds[index].get_or_insert_with(|| KindEntry {
            plain: Rc::new(WrapTokenId {
                id,
                context: WrapContext::Plain,
            }),
            no_default_embedding: Rc::new(WrapTokenId {
                id,
                context: WrapContext::NoDefaultEmbedding,
            }),
            lines: [const { None }; WRAP_CACHE_LINES],
        })
    }
}
