//! Incremental lexing over a mutable text buffer, with languages embedded in
//! the tokens of other languages.
//!
//! A [`Document`] owns the text and a top-level [`TokenList`]. Edits re-lex
//! only the tokens whose examined text they touch, restarting each language's
//! automaton from the snapshot stored after the preceding token. Tokens whose
//! language embeds another language (doc comments, template expressions,
//! inline HTML) get their own token list the first time anyone asks for it.
//!
//! ```rust
//! use lexhier::{Document, LanguageRegistry, LexerOptions};
//! use std::rc::Rc;
//!
//! let registry = Rc::new(LanguageRegistry::builtin());
//! let mut doc = Document::open(registry, "template", "Hi ${user.name}!", LexerOptions::default())
//!     .unwrap();
//! let mut seq = doc.token_sequence();
//! seq.move_next();
//! seq.move_next();
//! let el = seq.embedded().unwrap();
//! assert_eq!(el.language_path().innermost().name(), "el");
//! assert_eq!(el.token_count(), 3);
//!
//! let change = doc.insert(10, "first_").unwrap();
//! assert!(change.resynced);
//! assert_eq!(doc.text_string(), "Hi ${user.first_name}!");
//! ```

#![no_std]
#![allow(missing_docs)]
extern crate alloc;

#[cfg(test)]
extern crate std;

pub mod chars;
mod document;
mod error;
mod input;
mod la_state;
mod language;
pub mod langs;
mod lexer;
mod options;
mod sequence;
mod sequence_list;
mod token_list;

#[cfg(test)]
mod tests;

pub use document::Document;
pub use error::{EditError, Error, IntegrityError, RegistryError};
pub use input::{LexerInput, RawToken};
pub use la_state::{LaState, LaTier, MAX_BYTE_LOOKAHEAD};
pub use language::{
    Embedding, EmbeddingRule, Language, LanguageDef, LanguageId, LanguageIdSet, LanguageIds,
    LanguagePath, LanguageRegistry, TokenCategory, TokenId, TokenInfo, WRAP_CACHE_LINES,
    WrapContext, WrapTokenId, WrapTokenIdCache, no_embedding,
};
pub use lexer::{Lexer, LexerFactory, LexerState, tokenize};
pub use options::LexerOptions;
pub use sequence::{Token, TokenSequence};
pub use sequence_list::TokenSequenceList;
pub use token_list::{TokenChange, TokenList};
