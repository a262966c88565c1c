//! A small C-like host language whose doc comments embed `javadoc`.

use alloc::boxed::Box;

use crate::{
    Embedding, Lexer, LexerInput, LexerOptions, LexerState, RawToken,
    chars::{is_digit, is_identifier_part, is_identifier_start, is_whitespace},
};

token_kinds! {
    pub enum SourceToken {
        Whitespace => "WHITESPACE", Whitespace;
        Identifier => "IDENTIFIER", Identifier;
        Keyword => "KEYWORD", Keyword;
        Number => "NUMBER", Literal;
        String => "STRING", Literal;
        Char => "CHAR", Literal;
        Operator => "OPERATOR", Operator;
        Separator => "SEPARATOR", Separator;
        LineComment => "LINE_COMMENT", Comment;
        BlockComment => "BLOCK_COMMENT", Comment;
        DocComment => "DOC_COMMENT", Comment;
        InvalidChar => "INVALID_CHAR", Error;
    }
}

const KEYWORDS: &[&str] = &[
    "class", "else", "for", "if", "int", "new", "private", "public", "return", "static", "void",
    "while",
];

#[derive(Debug)]
pub struct SourceLexer {
    options: LexerOptions,
}

#[must_use]
pub fn lexer(_state: Option<LexerState>, options: &LexerOptions) -> Box<dyn Lexer> {
    Box::new(SourceLexer { options: *options })
}

/// Doc comments embed `javadoc` without the `/**` and `*/` delimiters.
#[must_use]
pub fn embedding(kind: u16, text: &[char]) -> Option<Embedding> {
    if kind != SourceToken::DocComment.ordinal() {
        return None;
    }
    let terminated = text.len() >= 5 && text.ends_with(&['*', '/']);
    Some(Embedding::new("javadoc", 3, if terminated { 2 } else { 0 }))
}

impl SourceLexer {
    fn run(input: &mut LexerInput<'_>, mut accept: impl FnMut(char) -> bool) {
        loop {
            match input.read() {
                Some(c) if accept(c) => {}
                _ => {
                    input.backup(1);
                    return;
                }
            }
        }
    }

    fn quoted(input: &mut LexerInput<'_>, quote: char) {
        let mut escaped = false;
        loop {
            match input.read() {
                None | Some('\n') => {
                    input.backup(1);
                    return;
                }
                Some(_) if escaped => escaped = false,
                Some('\\') => escaped = true,
                Some(c) if c == quote => return,
                Some(_) => {}
            }
        }
    }

    /// After `/*`; returns the comment kind.
    fn block_comment(input: &mut LexerInput<'_>) -> SourceToken {
        let doc = match input.read() {
            Some('*') => match input.read() {
                // `/**/` is an empty block comment.
                Some('/') => return SourceToken::BlockComment,
                _ => {
                    input.backup(1);
                    true
                }
            },
            _ => {
                input.backup(1);
                false
            }
        };
        let mut star = false;
        loop {
            match input.read() {
                None => {
                    input.backup(1);
                    break;
                }
                Some('/') if star => break,
                Some(c) => star = c == '*',
            }
        }
        if doc {
            SourceToken::DocComment
        } else {
            SourceToken::BlockComment
        }
    }
}

impl Lexer for SourceLexer {
    fn next_token(&mut self, input: &mut LexerInput<'_>) -> Option<RawToken> {
        let options = self.options;
        let c = input.read()?;
        let kind = match c {
            c if is_whitespace(c, &options) => {
                Self::run(input, |c| is_whitespace(c, &options));
                SourceToken::Whitespace
            }
            c if is_identifier_start(c, &options) => {
                Self::run(input, |c| is_identifier_part(c, &options));
                let text = input.read_text();
                if KEYWORDS.iter().any(|kw| kw.chars().eq(text.iter().copied())) {
                    SourceToken::Keyword
                } else {
                    SourceToken::Identifier
                }
            }
            c if is_digit(c) => {
                Self::run(input, |c| c == '.' || is_identifier_part(c, &options));
                SourceToken::Number
            }
            '"' => {
                Self::quoted(input, '"');
                SourceToken::String
            }
            '\'' => {
                Self::quoted(input, '\'');
                SourceToken::Char
            }
            '/' => match input.read() {
                Some('/') => {
                    Self::run(input, |c| c != '\n');
                    SourceToken::LineComment
                }
                Some('*') => Self::block_comment(input),
                _ => {
                    input.backup(1);
                    SourceToken::Operator
                }
            },
            '+' | '-' | '*' | '%' | '=' | '<' | '>' | '!' | '&' | '|' | '^' | '~' | '?' | ':' => {
                SourceToken::Operator
            }
            '(' | ')' | '{' | '}' | '[' | ']' | ';' | ',' | '.' | '@' => SourceToken::Separator,
            _ => SourceToken::InvalidChar,
        };
        Some(input.token(kind.ordinal()))
    }

    fn state(&self) -> Option<LexerState> {
        None
    }
}
