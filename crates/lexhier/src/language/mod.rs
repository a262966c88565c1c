//! Language definitions, the registry that owns them, and language paths.

mod ids;
mod wrap;

use alloc::{rc::Rc, string::ToString, vec::Vec};
use core::{
    cell::{Cell, RefCell},
    fmt,
};

pub use ids::{LanguageId, LanguageIdSet, LanguageIds};
pub use wrap::{WRAP_CACHE_LINES, WrapContext, WrapTokenId, WrapTokenIdCache};

use crate::{LexerFactory, RegistryError};

/// Coarse classification of a token kind, for highlighting-style consumers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TokenCategory {
    Whitespace,
    Identifier,
    Keyword,
    Operator,
    Separator,
    Literal,
    Comment,
    Text,
    Tag,
    Error,
}

/// Static description of one token kind of a language.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenInfo {
    pub name: &'static str,
    pub category: TokenCategory,
}

impl TokenInfo {
    #[must_use]
    pub const fn new(name: &'static str, category: TokenCategory) -> Self {
        Self { name, category }
    }
}

/// A token kind: its ordinal within the language plus its static info.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenId {
    pub ordinal: u16,
    pub info: &'static TokenInfo,
}

impl TokenId {
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.info.name
    }

    #[must_use]
    pub fn category(&self) -> TokenCategory {
        self.info.category
    }
}

/// Where a host token embeds another language.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Embedding {
    pub language: &'static str,
    /// Code points at the start of the host token that stay in the host.
    pub start_skip: usize,
    /// Code points at the end of the host token that stay in the host.
    pub end_skip: usize,
}

impl Embedding {
    #[must_use]
    pub const fn new(language: &'static str, start_skip: usize, end_skip: usize) -> Self {
        Self {
            language,
            start_skip,
            end_skip,
        }
    }
}

/// Default embedding rule: given a token kind and its text, the embedding
/// that applies to it, if any.
pub type EmbeddingRule = fn(u16, &[char]) -> Option<Embedding>;

#[must_use]
pub fn no_embedding(_kind: u16, _text: &[char]) -> Option<Embedding> {
    None
}

/// What a language brings to the registry.
#[derive(Clone, Copy)]
pub struct LanguageDef {
    pub name: &'static str,
    pub tokens: &'static [TokenInfo],
    pub lexer: LexerFactory,
    pub embedding: EmbeddingRule,
}

impl fmt::Debug for LanguageDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LanguageDef")
            .field("name", &self.name)
            .field("tokens", &self.tokens.len())
            .finish_non_exhaustive()
    }
}

struct LanguageInner {
    def: LanguageDef,
    id: Cell<Option<LanguageId>>,
    wraps: RefCell<WrapTokenIdCache>,
}

/// Handle to a registered language. Clones share identity; equality is
/// identity.
#[derive(Clone)]
pub struct Language(Rc<LanguageInner>);

impl Language {
    fn new(def: LanguageDef) -> Self {
        Self(Rc::new(LanguageInner {
            def,
            id: Cell::new(None),
            wraps: RefCell::new(WrapTokenIdCache::new(def.tokens)),
        }))
    }

    #[must_use]
    pub fn name(&self) -> &'static str {
        self.0.def.name
    }

    #[must_use]
    pub fn def(&self) -> &LanguageDef {
        &self.0.def
    }

    #[must_use]
    pub fn token_count(&self) -> usize {
        self.0.def.tokens.len()
    }

    /// # Panics
    ///
    /// Panics if `ordinal` is not a token kind of this language.
    #[must_use]
    pub fn token_id(&self, ordinal: u16) -> TokenId {
        TokenId {
            ordinal,
            info: &self.0.def.tokens[usize::from(ordinal)],
        }
    }

    #[must_use]
    pub fn token_by_name(&self, name: &str) -> Option<TokenId> {
        let pos = self.0.def.tokens.iter().position(|t| t.name == name)?;
        Some(self.token_id(u16::try_from(pos).ok()?))
    }

    /// The id assigned by the registry, if this language was used already.
    #[must_use]
    pub fn assigned_id(&self) -> Option<LanguageId> {
        self.0.id.get()
    }

    fn assign_id(&self, id: LanguageId) {
        debug_assert!(self.0.id.get().is_none(), "language id assigned twice");
        self.0.id.set(Some(id));
    }

    /// Shared wrap id for a token of this language in `context`.
    #[must_use]
    pub fn wrap(&self, ordinal: u16, context: &WrapContext) -> Rc<WrapTokenId> {
        self.0.wraps.borrow_mut().wrap(ordinal, context)
    }

    #[must_use]
    pub fn ptr_eq(a: &Self, b: &Self) -> bool {
        Rc::ptr_eq(&a.0, &b.0)
    }
}

impl PartialEq for Language {
    fn eq(&self, other: &Self) -> bool {
        Self::ptr_eq(self, other)
    }
}

impl Eq for Language {}

impl fmt::Debug for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Language({})", self.name())
    }
}

/// An embedding stack of languages, outermost first.
#[derive(Clone, PartialEq, Eq)]
pub struct LanguagePath(Vec<Language>);

impl LanguagePath {
    #[must_use]
    pub fn root(language: &Language) -> Self {
        Self(alloc::vec![language.clone()])
    }

    /// # Errors
    ///
    /// Returns [`RegistryError::EmptyPath`] for an empty slice.
    pub fn new(languages: &[Language]) -> Result<Self, RegistryError> {
        if languages.is_empty() {
            return Err(RegistryError::EmptyPath);
        }
        Ok(Self(languages.to_vec()))
    }

    #[must_use]
    pub fn embedded(&self, language: &Language) -> Self {
        let mut langs = self.0.clone();
        langs.push(language.clone());
        Self(langs)
    }

    #[must_use]
    pub fn languages(&self) -> &[Language] {
        &self.0
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn top(&self) -> &Language {
        &self.0[0]
    }

    #[must_use]
    pub fn innermost(&self) -> &Language {
        &self.0[self.0.len() - 1]
    }

    #[must_use]
    pub fn starts_with(&self, prefix: &LanguagePath) -> bool {
        self.0.starts_with(&prefix.0)
    }
}

impl fmt::Debug for LanguagePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, lang) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("/")?;
            }
            f.write_str(lang.name())?;
        }
        Ok(())
    }
}

/// Owns the registered languages and the id machinery shared by their token
/// hierarchies.
///
/// A registry is an explicit value rather than a global so that independent
/// hierarchies (and tests) never observe each other's ids.
#[derive(Default)]
pub struct LanguageRegistry {
    languages: Vec<Language>,
    ids: LanguageIds,
}

impl fmt::Debug for LanguageRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(&self.languages).finish()
    }
}

impl LanguageRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding the built-in languages (`el`, `template`, `source`,
    /// `javadoc`, `html`).
    #[must_use]
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        for def in crate::langs::definitions() {
            if let Err(err) = registry.register(def) {
                unreachable!("built-in languages have distinct names: {err}");
            }
        }
        registry
    }

    /// # Errors
    ///
    /// Returns [`RegistryError::DuplicateLanguage`] if a language with the same
    /// name is already registered.
    pub fn register(&mut self, def: LanguageDef) -> Result<Language, RegistryError> {
        if self.language(def.name).is_some() {
            return Err(RegistryError::DuplicateLanguage(def.name));
        }
        let language = Language::new(def);
        log::debug!("registered language '{}'", def.name);
        self.languages.push(language.clone());
        Ok(language)
    }

    #[must_use]
    pub fn language(&self, name: &str) -> Option<Language> {
        self.languages.iter().find(|l| l.name() == name).cloned()
    }

    /// # Errors
    ///
    /// Returns [`RegistryError::UnknownLanguage`] if `name` is not registered.
    pub fn require(&self, name: &str) -> Result<Language, RegistryError> {
        self.language(name)
            .ok_or_else(|| RegistryError::UnknownLanguage(name.to_string()))
    }

    #[must_use]
    pub fn languages(&self) -> &[Language] {
        &self.languages
    }

    #[must_use]
    pub fn ids(&self) -> &LanguageIds {
        &self.ids
    }

    pub fn id(&self, language: &Language) -> LanguageId {
        self.ids.id(Some(language))
    }

    /// Builds a path from language names, outermost first.
    ///
    /// # Errors
    ///
    /// Fails on an empty list or an unknown name.
    pub fn path(&self, names: &[&str]) -> Result<LanguagePath, RegistryError> {
        let languages = names
            .iter()
            .map(|name| self.require(name))
            .collect::<Result<Vec<_>, _>>()?;
        LanguagePath::new(&languages)
    }

    /// The canonical id set of the languages enclosing the innermost language
    /// of `path`, used as the wrap context of its tokens.
    pub(crate) fn context_of(&self, path: &LanguagePath) -> WrapContext {
        let outer = &path.languages()[..path.len() - 1];
        if outer.is_empty() {
            return WrapContext::Plain;
        }
        let set = outer
            .iter()
            .fold(self.ids.empty(), |set, lang| self.ids.get_with(&set, Some(lang)));
        WrapContext::Embedded(set)
    }
}

#[cfg(test)]
mod tests;
