use alloc::string::String;

use thiserror::Error;

/// An edit that does not fit the current buffer.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EditError {
    #[error("offset {offset} is past the end of the buffer (length {len})")]
    OffsetOutOfBounds { offset: usize, len: usize },
    #[error("removing {length} characters at {offset} runs past the end of the buffer (length {len})")]
    RangeOutOfBounds {
        offset: usize,
        length: usize,
        len: usize,
    },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("language '{0}' is already registered")]
    DuplicateLanguage(&'static str),
    #[error("unknown language '{0}'")]
    UnknownLanguage(String),
    #[error("a language path needs at least one language")]
    EmptyPath,
}

/// A broken token list invariant. Any of these is a bug in a lexer or in the
/// re-lexing code, never a property of the input text.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IntegrityError {
    #[error("token {index} starts at {found}, expected {expected}")]
    Gap {
        index: usize,
        expected: usize,
        found: usize,
    },
    #[error("token {index} is empty")]
    EmptyToken { index: usize },
    #[error("tokens cover {covered} characters of a {len}-character span")]
    Coverage { covered: usize, len: usize },
    #[error("{tokens} tokens but {states} lookahead entries")]
    StateCount { tokens: usize, states: usize },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("edit error: {0}")]
    Edit(#[from] EditError),
    #[error("registry error: {0}")]
    Registry(#[from] RegistryError),
}
