//! Language ids and canonical language id sets.
//!
//! Every language gets a small positive id the first time it is used; `0` is
//! the null language. A [`LanguageIdSet`] is an ordered, duplicate-free list
//! of ids (outer language first) that is canonical: as long as one instance
//! for a sequence is alive, every way of building that sequence returns the
//! same instance, so equality is a pointer comparison.
//!
//! Sets form a trie rooted at the empty set. A node keeps its prefix alive
//! and remembers its children (and removal results) weakly, so sets that
//! nobody uses any more are dropped and rebuilt on demand.

use alloc::{boxed::Box, rc::Rc, rc::Weak, vec::Vec};
use core::{
    cell::{Cell, RefCell},
    fmt,
};

use super::Language;

/// Id of a language; [`LanguageId::NULL`] stands for "no language".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LanguageId(pub u32);

impl LanguageId {
    pub const NULL: LanguageId = LanguageId(0);

    #[must_use]
    pub fn is_null(self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for LanguageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

type Links = RefCell<Vec<(LanguageId, Weak<SetNode>)>>;

struct SetNode {
    ids: Box<[LanguageId]>,
    /// Keeps the trie path to this node alive.
    _parent: Option<LanguageIdSet>,
    appended: Links,
    removed: Links,
}

fn lookup(links: &Links, id: LanguageId) -> Option<LanguageIdSet> {
    links
        .borrow()
        .iter()
        .find(|(key, _)| *key == id)
        .and_then(|(_, weak)| weak.upgrade())
        .map(LanguageIdSet)
}

fn remember(links: &Links, id: LanguageId, set: &LanguageIdSet) {
    let mut links = links.borrow_mut();
    links.retain(|(key, weak)| *key != id && weak.strong_count() > 0);
    links.push((id, Rc::downgrade(&set.0)));
}

#[derive(Clone)]
pub struct LanguageIdSet(Rc<SetNode>);

impl LanguageIdSet {
    #[must_use]
    pub fn ids(&self) -> &[LanguageId] {
        &self.0.ids
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.ids.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.ids.is_empty()
    }

    #[must_use]
    pub fn contains_id(&self, id: LanguageId) -> bool {
        self.0.ids.contains(&id)
    }

    /// Whether `language` is a member. A language that never received an id
    /// cannot be in any set.
    #[must_use]
    pub fn contains_language(&self, language: Option<&Language>) -> bool {
        match language {
            None => self.contains_id(LanguageId::NULL),
            Some(lang) => lang.assigned_id().is_some_and(|id| self.contains_id(id)),
        }
    }

    #[must_use]
    pub fn ptr_eq(a: &Self, b: &Self) -> bool {
        Rc::ptr_eq(&a.0, &b.0)
    }

    /// Address of the shared node, usable as an identity key.
    #[must_use]
    pub fn as_ptr(&self) -> *const () {
        Rc::as_ptr(&self.0).cast()
    }
}

impl PartialEq for LanguageIdSet {
    fn eq(&self, other: &Self) -> bool {
        Self::ptr_eq(self, other)
    }
}

impl Eq for LanguageIdSet {}

impl fmt::Debug for LanguageIdSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.0.ids.iter().map(|id| id.0)).finish()
    }
}

/// Id assignment and set canonicalisation for one registry.
pub struct LanguageIds {
    next: Cell<u32>,
    empty: LanguageIdSet,
}

impl Default for LanguageIds {
    fn default() -> Self {
        Self::new()
    }
}

impl LanguageIds {
    #[must_use]
    pub fn new() -> Self {
        Self {
            next: Cell::new(1),
            empty: LanguageIdSet(Rc::new(SetNode {
                ids: Box::new([]),
                _parent: None,
                appended: RefCell::new(Vec::new()),
                removed: RefCell::new(Vec::new()),
            })),
        }
    }

    /// The id of `language`, assigning the next free one on first use.
    pub fn id(&self, language: Option<&Language>) -> LanguageId {
        let Some(lang) = language else {
            return LanguageId::NULL;
        };
        if let Some(id) = lang.assigned_id() {
            return id;
        }
        let id = LanguageId(self.next.get());
        self.next.set(id.0 + 1);
        lang.assign_id(id);
        log::trace!("language '{}' assigned id {id}", lang.name());
        id
    }

    #[must_use]
    pub fn empty(&self) -> LanguageIdSet {
        self.empty.clone()
    }

    /// The canonical one-element set `[language]`.
    pub fn get(&self, language: Option<&Language>) -> LanguageIdSet {
        let id = self.id(language);
        self.with_id(&self.empty, id)
    }

    /// `set` with `language` appended; `set` itself if already a member.
    pub fn get_with(&self, set: &LanguageIdSet, language: Option<&Language>) -> LanguageIdSet {
        let id = self.id(language);
        self.with_id(set, id)
    }

    /// `set` without `language`; `set` itself if not a member.
    pub fn get_removed(&self, set: &LanguageIdSet, language: Option<&Language>) -> LanguageIdSet {
        let id = self.id(language);
        if !set.contains_id(id) {
            return set.clone();
        }
        if let Some(cached) = lookup(&set.0.removed, id) {
            return cached;
        }
        let mut result = self.empty();
        for &member in set.ids().iter().filter(|&&m| m != id) {
            result = self.with_id(&result, member);
        }
        remember(&set.0.removed, id, &result);
        result
    }

    /// Builds the canonical set for an id sequence, skipping duplicates.
    pub fn from_ids(&self, ids: &[LanguageId]) -> LanguageIdSet {
        ids.iter()
            .fold(self.empty(), |set, &id| self.with_id(&set, id))
    }

    fn with_id(&self, set: &LanguageIdSet, id: LanguageId) -> LanguageIdSet {
        if set.contains_id(id) {
            return set.clone();
        }
        if let Some(cached) = lookup(&set.0.appended, id) {
            return cached;
        }
        let ids: Box<[LanguageId]> = set.ids().iter().copied().chain([id]).collect();
        let child = LanguageIdSet(Rc::new(SetNode {
            ids,
            _parent: Some(set.clone()),
            appended: RefCell::new(Vec::new()),
            removed: RefCell::new(Vec::new()),
        }));
        remember(&set.0.appended, id, &child);
        child
    }
}
