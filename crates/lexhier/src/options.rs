#![allow(clippy::struct_excessive_bools)]

/// Configuration shared by every lexer created for a document.
///
/// The options are handed to each [`LexerFactory`](crate::LexerFactory) when a
/// lexer is (re)started, both for the top-level token list and for lazily
/// created embedded lists.
///
/// # Examples
///
/// ```rust
/// use lexhier::{Document, LanguageRegistry, LexerOptions};
/// use std::rc::Rc;
///
/// let registry = Rc::new(LanguageRegistry::builtin());
/// let options = LexerOptions {
///     ascii_identifiers_only: true,
///     ..Default::default()
/// };
/// let doc = Document::open(registry, "el", "a + b", options).unwrap();
/// assert_eq!(doc.token_count(), 5);
/// ```
///
/// # Default
///
/// All options default to `false`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LexerOptions {
    /// Restrict identifiers to ASCII letters, digits, `_` and `$`.
    ///
    /// By default identifiers may also start with any alphabetic code point or
    /// currency symbol, and continue with alphanumerics, combining marks and
    /// joiners.
    ///
    /// # Default
    ///
    /// `false`
    pub ascii_identifiers_only: bool,

    /// Whether to treat any Unicode whitespace as whitespace.
    ///
    /// By default only space, tab, line feed, carriage return and form feed
    /// are whitespace; other code points lex as invalid characters.
    ///
    /// # Default
    ///
    /// `false`
    pub allow_unicode_whitespace: bool,

    #[cfg(any(test, feature = "fuzzing"))]
    #[cfg_attr(feature = "serde", serde(default))]
    /// Re-lex the whole buffer after every edit and panic if the incremental
    /// result differs.
    ///
    /// Enabled only in test and fuzzing builds.
    pub verify_relex: bool,
}

impl LexerOptions {
    #[cfg(any(test, feature = "fuzzing"))]
    #[must_use]
    pub fn verifying() -> Self {
        Self {
            verify_relex: true,
            ..Self::default()
        }
    }
}
