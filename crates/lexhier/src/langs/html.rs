//! Tag-level HTML lexer.
//!
//! Recognises tag delimiters, tag names, attributes and their values, and
//! treats everything between tags as text. Where the automaton stands inside
//! a tag (right after `<` or `</`, after the tag name, after `=`) is part of
//! the snapshot, so re-lexing can restart in the middle of a tag.

use alloc::boxed::Box;

use crate::{
    Lexer, LexerInput, LexerOptions, LexerState, RawToken, chars::is_whitespace,
};

token_kinds! {
    pub enum HtmlToken {
        Text => "TEXT", Text;
        Ws => "WS", Whitespace;
        TagOpenSymbol => "TAG_OPEN_SYMBOL", Tag;
        TagOpen => "TAG_OPEN", Tag;
        TagClose => "TAG_CLOSE", Tag;
        TagCloseSymbol => "TAG_CLOSE_SYMBOL", Tag;
        Argument => "ARGUMENT", Identifier;
        Operator => "OPERATOR", Operator;
        Value => "VALUE", Literal;
        Error => "ERROR", Error;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u16)]
enum Where {
    Outside = 0,
    AfterOpenSymbol = 1,
    AfterCloseSymbol = 2,
    InTag = 3,
    AfterEq = 4,
}

impl Where {
    fn from_state(state: Option<LexerState>) -> Self {
        match state.map(|s| s.state) {
            Some(1) => Self::AfterOpenSymbol,
            Some(2) => Self::AfterCloseSymbol,
            Some(3) => Self::InTag,
            Some(4) => Self::AfterEq,
            _ => Self::Outside,
        }
    }
}

fn is_name_start(c: char) -> bool {
    c.is_alphabetic() || c == '_' || c == ':'
}

fn is_name_part(c: char) -> bool {
    c.is_alphanumeric() || matches!(c, '-' | '_' | ':' | '.')
}

#[derive(Debug)]
pub struct HtmlLexer {
    options: LexerOptions,
    at: Where,
}

#[must_use]
pub fn lexer(state: Option<LexerState>, options: &LexerOptions) -> Box<dyn Lexer> {
    Box::new(HtmlLexer {
        options: *options,
        at: Where::from_state(state),
    })
}

impl HtmlLexer {
    fn run(input: &mut LexerInput<'_>, mut accept: impl FnMut(char) -> bool) {
        while input.read().is_some_and(&mut accept) {}
        input.backup(1);
    }

    fn outside(&mut self, input: &mut LexerInput<'_>, c: char) -> HtmlToken {
        if c == '<' {
            match input.read() {
                Some('/') => {
                    self.at = Where::AfterCloseSymbol;
                    return HtmlToken::TagOpenSymbol;
                }
                Some(n) if is_name_start(n) => {
                    input.backup(1);
                    self.at = Where::AfterOpenSymbol;
                    return HtmlToken::TagOpenSymbol;
                }
                _ => input.backup(1),
            }
        }
        loop {
            match input.read() {
                None => {
                    input.backup(1);
                    break;
                }
                Some('<') => {
                    let opens = input.read().is_some_and(|n| n == '/' || is_name_start(n));
                    if opens {
                        input.backup(2);
                        break;
                    }
                    input.backup(1);
                }
                Some(_) => {}
            }
        }
        HtmlToken::Text
    }

    fn in_tag(&mut self, input: &mut LexerInput<'_>, c: char) -> HtmlToken {
        let options = self.options;
        match c {
            c if is_whitespace(c, &options) => {
                Self::run(input, |c| is_whitespace(c, &options));
                HtmlToken::Ws
            }
            '>' => {
                self.at = Where::Outside;
                HtmlToken::TagCloseSymbol
            }
            '/' => {
                if input.read() == Some('>') {
                    self.at = Where::Outside;
                    HtmlToken::TagCloseSymbol
                } else {
                    input.backup(1);
                    HtmlToken::Error
                }
            }
            '=' => {
                self.at = Where::AfterEq;
                HtmlToken::Operator
            }
            '<' => {
                // Unclosed tag; the `<` starts whatever follows.
                self.at = Where::Outside;
                self.outside(input, c)
            }
            c if is_name_start(c) => {
                Self::run(input, is_name_part);
                HtmlToken::Argument
            }
            _ => HtmlToken::Error,
        }
    }

    fn after_eq(&mut self, input: &mut LexerInput<'_>, c: char) -> HtmlToken {
        let options = self.options;
        match c {
            c if is_whitespace(c, &options) => {
                Self::run(input, |c| is_whitespace(c, &options));
                HtmlToken::Ws
            }
            '>' => {
                self.at = Where::Outside;
                HtmlToken::TagCloseSymbol
            }
            '"' | '\'' => {
                loop {
                    match input.read() {
                        None => {
                            input.backup(1);
                            break;
                        }
                        Some(q) if q == c => break,
                        Some(_) => {}
                    }
                }
                self.at = Where::InTag;
                HtmlToken::Value
            }
            _ => {
                Self::run(input, |c| c != '>' && !is_whitespace(c, &options));
                self.at = Where::InTag;
                HtmlToken::Value
            }
        }
    }
}

impl Lexer for HtmlLexer {
    fn next_token(&mut self, input: &mut LexerInput<'_>) -> Option<RawToken> {
        let c = input.read()?;
        let kind = match self.at {
            Where::Outside => self.outside(input, c),
            at @ (Where::AfterOpenSymbol | Where::AfterCloseSymbol) => {
                self.at = Where::InTag;
                if is_name_start(c) {
                    Self::run(input, is_name_part);
                    if at == Where::AfterOpenSymbol {
                        HtmlToken::TagOpen
                    } else {
                        HtmlToken::TagClose
                    }
                } else {
                    self.in_tag(input, c)
                }
            }
            Where::InTag => self.in_tag(input, c),
            Where::AfterEq => self.after_eq(input, c),
        };
        Some(input.token(kind.ordinal()))
    }

    fn state(&self) -> Option<LexerState> {
        match self.at {
            Where::Outside => None,
            at => Some(LexerState::new(at as u16, 0)),
        }
    }
}
