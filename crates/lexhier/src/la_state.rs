//! Lookahead/state store: one `(lookahead, state)` pair per token.
//!
//! Most tokens end in the lexer's initial state after peeking at most a few
//! code points, so the store starts out keeping only byte-wide lookaheads and
//! switches to a general representation the first time a value does not fit.
//!
//! Invariants
//! - `NoState` holds only lookaheads `<= MAX_BYTE_LOOKAHEAD` with implicit
//!   `None` states.
//! - The tier only ever moves `Empty -> NoState -> Large`; removing entries
//!   never moves it back.
//! - All operations observe the same `(len, lookahead(i), state(i))` in every
//!   tier.

use alloc::vec::Vec;

/// Largest lookahead the byte tier can hold; kept at 127 so that an `add` of
/// 128 promotes, even though a `u8` could store up to 255.
pub const MAX_BYTE_LOOKAHEAD: usize = 127;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LaTier {
    Empty,
    NoState,
    Large,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LaState<S> {
    Empty,
    NoState(Vec<u8>),
    Large(Vec<(usize, Option<S>)>),
}

impl<S> Default for LaState<S> {
    fn default() -> Self {
        Self::Empty
    }
}

impl<S: Clone> LaState<S> {
    #[must_use]
    pub fn empty() -> Self {
        Self::Empty
    }

    #[must_use]
    pub fn tier(&self) -> LaTier {
        match self {
            Self::Empty => LaTier::Empty,
            Self::NoState(_) => LaTier::NoState,
            Self::Large(_) => LaTier::Large,
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Empty => 0,
            Self::NoState(la) => la.len(),
            Self::Large(entries) => entries.len(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// # Panics
    ///
    /// Panics if `index` is out of bounds.
    #[must_use]
    pub fn lookahead(&self, index: usize) -> usize {
        match self {
            Self::Empty => panic!("lookahead({index}) on an empty store"),
            Self::NoState(la) => usize::from(la[index]),
            Self::Large(entries) => entries[index].0,
        }
    }

    /// # Panics
    ///
    /// Panics if `index` is out of bounds.
    #[must_use]
    pub fn state(&self, index: usize) -> Option<&S> {
        match self {
            Self::Empty => panic!("state({index}) on an empty store"),
            Self::NoState(la) => {
                assert!(index < la.len(), "state({index}) out of bounds ({})", la.len());
                None
            }
            Self::Large(entries) => entries[index].1.as_ref(),
        }
    }

    pub fn add(&mut self, lookahead: usize, state: Option<S>) {
        self.promote(Self::tier_for(lookahead, state.is_some()));
        match self {
            Self::Empty => unreachable!("promote leaves a non-empty tier"),
            Self::NoState(la) => la.push(Self::narrow(lookahead)),
            Self::Large(entries) => entries.push((lookahead, state)),
        }
    }

    /// Inserts all entries of `other` before `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index > self.len()`.
    pub fn add_all(&mut self, index: usize, other: &LaState<S>) {
        assert!(index <= self.len(), "add_all at {index} past end {}", self.len());
        if other.tier() == LaTier::Empty {
            return;
        }
        self.promote(other.tier());
        match (&mut *self, other) {
            (Self::NoState(la), Self::NoState(src)) => {
                la.splice(index..index, src.iter().copied());
            }
            (Self::Large(entries), Self::NoState(src)) => {
                entries.splice(index..index, src.iter().map(|&l| (usize::from(l), None)));
            }
            (Self::Large(entries), Self::Large(src)) => {
                entries.splice(index..index, src.iter().cloned());
            }
            _ => unreachable!("promote reaches at least the tier of `other`"),
        }
    }

    /// Removes `count` entries starting at `index`.
    ///
    /// # Panics
    ///
    /// Panics if the range is out of bounds.
    pub fn remove(&mut self, index: usize, count: usize) {
        if count == 0 {
            return;
        }
        match self {
            Self::Empty => panic!("remove({index}, {count}) on an empty store"),
            Self::NoState(la) => {
                la.drain(index..index + count);
            }
            Self::Large(entries) => {
                entries.drain(index..index + count);
            }
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, Option<&S>)> + '_ {
        (0..self.len()).map(|i| (self.lookahead(i), self.state(i)))
    }

    fn tier_for(lookahead: usize, has_state: bool) -> LaTier {
        if has_state || lookahead > MAX_BYTE_LOOKAHEAD {
            LaTier::Large
        } else {
            LaTier::NoState
        }
    }

    #[allow(clippy::cast_possible_truncation)]
    fn narrow(lookahead: usize) -> u8 {
        debug_assert!(lookahead <= MAX_BYTE_LOOKAHEAD);
        lookahead as u8
    }

    fn promote(&mut self, target: LaTier) {
        if self.tier() >= target {
            return;
        }
        *self = match core::mem::take(self) {
            Self::Empty if target == LaTier::NoState => Self::NoState(Vec::new()),
            Self::Empty => Self::Large(Vec::new()),
            Self::NoState(la) => {
                Self::Large(la.into_iter().map(|l| (usize::from(l), None)).collect())
            }
            Self::Large(_) => unreachable!("already the widest tier"),
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn small_lookaheads_without_state_stay_narrow() {
        let mut la = LaState::<&'static str>::empty();
        assert_eq!(la.tier(), LaTier::Empty);
        la.add(1, None);
        assert_eq!(la.tier(), LaTier::NoState);
        la.add(127, None);
        assert_eq!(la.tier(), LaTier::NoState);
        assert_eq!(la.len(), 2);
        assert_eq!(la.lookahead(1), 127);
        assert_eq!(la.state(1), None);
    }

    #[test]
    fn state_forces_general_tier() {
        let mut la = LaState::empty();
        la.add(127, Some("obj"));
        assert_eq!(la.tier(), LaTier::Large);
        assert_eq!(la.state(0), Some(&"obj"));
    }

    #[test]
    fn wide_lookahead_forces_general_tier() {
        let mut la = LaState::<u32>::empty();
        la.add(128, None);
        assert_eq!(la.tier(), LaTier::Large);
        assert_eq!(la.lookahead(0), 128);
        assert_eq!(la.state(0), None);
    }

    #[test]
    fn promotion_keeps_existing_entries() {
        let mut la = LaState::empty();
        la.add(3, None);
        la.add(4, None);
        la.add(5, Some(9u32));
        assert_eq!(la.tier(), LaTier::Large);
        let all: Vec<_> = la.iter().map(|(l, s)| (l, s.copied())).collect();
        assert_eq!(all, [(3, None), (4, None), (5, Some(9))]);
    }

    #[test]
    fn remove_never_demotes() {
        let mut la = LaState::empty();
        la.add(1, Some(1u32));
        la.remove(0, 1);
        assert!(la.is_empty());
        assert_eq!(la.tier(), LaTier::Large);
        la.add(1, None);
        assert_eq!(la.tier(), LaTier::Large);
    }

    #[test]
    fn add_all_merges_tiers() {
        let mut narrow = LaState::empty();
        narrow.add(1, None);
        narrow.add(2, None);

        let mut wide = LaState::empty();
        wide.add(300, Some(7u32));

        let mut merged = narrow.clone();
        merged.add_all(1, &wide);
        assert_eq!(merged.tier(), LaTier::Large);
        let all: Vec<_> = merged.iter().map(|(l, s)| (l, s.copied())).collect();
        assert_eq!(all, [(1, None), (300, Some(7)), (2, None)]);

        let mut from_empty = LaState::<u32>::empty();
        from_empty.add_all(0, &narrow);
        assert_eq!(from_empty.tier(), LaTier::NoState);
        assert_eq!(from_empty.len(), 2);

        from_empty.add_all(2, &LaState::empty());
        assert_eq!(from_empty.tier(), LaTier::NoState);
    }
}
