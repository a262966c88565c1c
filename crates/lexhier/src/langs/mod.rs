//! Built-in languages.
//!
//! `template` text embeds `el` expressions; `source` doc comments embed
//! `javadoc`, whose HTML tags embed `html`.

/// Declares a token kind enum together with its [`TokenInfo`](crate::TokenInfo)
/// table; the ordinal of each variant indexes the table.
macro_rules! token_kinds {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $($variant:ident => $tok:literal, $category:ident;)*
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        #[repr(u16)]
        $vis enum $name {
            $($variant,)*
        }

        impl $name {
            pub const TOKENS: &'static [$crate::TokenInfo] = &[
                $($crate::TokenInfo::new($tok, $crate::TokenCategory::$category),)*
            ];

            const ALL: &'static [$name] = &[$($name::$variant,)*];

            #[must_use]
            pub const fn ordinal(self) -> u16 {
                self as u16
            }

            #[must_use]
            pub fn from_ordinal(ordinal: u16) -> Option<Self> {
                Self::ALL.get(usize::from(ordinal)).copied()
            }

            #[must_use]
            pub fn name(self) -> &'static str {
                Self::TOKENS[usize::from(self.ordinal())].name
            }
        }
    };
}

pub mod el;
pub mod html;
pub mod javadoc;
pub mod source;
pub mod template;

use crate::{LanguageDef, no_embedding};

pub const EL: LanguageDef = LanguageDef {
    name: "el",
    tokens: el::ElToken::TOKENS,
    lexer: el::lexer,
    embedding: no_embedding,
};

pub const TEMPLATE: LanguageDef = LanguageDef {
    name: "template",
    tokens: template::TemplateToken::TOKENS,
    lexer: template::lexer,
    embedding: template::embedding,
};

pub const SOURCE: LanguageDef = LanguageDef {
    name: "source",
    tokens: source::SourceToken::TOKENS,
    lexer: source::lexer,
    embedding: source::embedding,
};

pub const JAVADOC: LanguageDef = LanguageDef {
    name: "javadoc",
    tokens: javadoc::JavadocToken::TOKENS,
    lexer: javadoc::lexer,
    embedding: javadoc::embedding,
};

pub const HTML: LanguageDef = LanguageDef {
    name: "html",
    tokens: html::HtmlToken::TOKENS,
    lexer: html::lexer,
    embedding: no_embedding,
};

#[must_use]
pub fn definitions() -> [LanguageDef; 5] {
    [EL, TEMPLATE, SOURCE, JAVADOC, HTML]
}

/// `(token name, token text)` pairs from a fresh full lex.
#[cfg(test)]
pub(crate) fn lex_names(
    def: &LanguageDef,
    text: &str,
) -> alloc::vec::Vec<(&'static str, alloc::string::String)> {
    let chars: alloc::vec::Vec<char> = text.chars().collect();
    let mut pos = 0;
    crate::tokenize(def.lexer, &chars, &crate::LexerOptions::default())
        .into_iter()
        .map(|(tok, _)| {
            let slice = &chars[pos..pos + tok.length];
            pos += tok.length;
            (def.tokens[usize::from(tok.kind)].name, slice.iter().collect())
        })
        .collect()
}
