//! Text templates with `${...}` and `#{...}` expressions.
//!
//! A backslash keeps the next character in the text, so `\${` is not an
//! expression. Inside an expression braces nest and quoted strings are
//! skipped; an expression without its closing brace runs to the end of the
//! input. Every token starts from the same state, so the lexer never needs a
//! snapshot.

use alloc::boxed::Box;

use crate::{Embedding, Lexer, LexerInput, LexerOptions, LexerState, RawToken};

token_kinds! {
    pub enum TemplateToken {
        Text => "TEXT", Text;
        El => "EL", Tag;
        ElUnterminated => "EL_UNTERMINATED", Tag;
    }
}

#[derive(Debug, Default)]
pub struct TemplateLexer;

#[must_use]
pub fn lexer(_state: Option<LexerState>, _options: &LexerOptions) -> Box<dyn Lexer> {
    Box::new(TemplateLexer)
}

/// Expressions embed `el` between their delimiters.
#[must_use]
pub fn embedding(kind: u16, _text: &[char]) -> Option<Embedding> {
    match TemplateToken::from_ordinal(kind)? {
        TemplateToken::El => Some(Embedding::new("el", 2, 1)),
        TemplateToken::ElUnterminated => Some(Embedding::new("el", 2, 0)),
        TemplateToken::Text => None,
    }
}

impl TemplateLexer {
    fn text(input: &mut LexerInput<'_>, first: char) -> RawToken {
        let mut escaped = first == '\\';
        loop {
            let Some(c) = input.read() else {
                input.backup(1);
                break;
            };
            if matches!(c, '$' | '#') && !escaped {
                if input.read() == Some('{') {
                    input.backup(2);
                    break;
                }
                input.backup(1);
            }
            escaped = c == '\\' && !escaped;
        }
        input.token(TemplateToken::Text.ordinal())
    }

    fn expression(input: &mut LexerInput<'_>) -> RawToken {
        let mut depth = 1_usize;
        let mut quote = None;
        let mut escaped = false;
        loop {
            let Some(c) = input.read() else {
                input.backup(1);
                return input.token(TemplateToken::ElUnterminated.ordinal());
            };
            if let Some(q) = quote {
                if escaped {
                    escaped = false;
                } else if c == '\\' {
                    escaped = true;
                } else if c == q {
                    quote = None;
                }
                continue;
            }
            match c {
                '"' | '\'' => quote = Some(c),
                '{' => depth += 1,
                '}' => {
                    depth -= 1;
                    if depth == 0 {
                        return input.token(TemplateToken::El.ordinal());
                    }
                }
                _ => {}
            }
        }
    }
}

impl Lexer for TemplateLexer {
    fn next_token(&mut self, input: &mut LexerInput<'_>) -> Option<RawToken> {
        let first = input.read()?;
        if matches!(first, '$' | '#') {
            match input.read() {
                Some('{') => return Some(Self::expression(input)),
                _ => input.backup(1),
            }
        }
        Some(Self::text(input, first))
    }

    fn state(&self) -> Option<LexerState> {
        None
    }
}

#[cfg(test)]
mod tests {
    use alloc::{string::String, vec, vec::Vec};

    use rstest::rstest;

    use super::*;
    use crate::langs::{TEMPLATE, lex_names};

    fn template(text: &str) -> Vec<(&'static str, String)> {
        lex_names(&TEMPLATE, text)
    }

    #[test]
    fn text_and_expressions() {
        assert_eq!(
            template("a ${x + 1} b #{y}"),
            vec![
                ("TEXT", "a ".into()),
                ("EL", "${x + 1}".into()),
                ("TEXT", " b ".into()),
                ("EL", "#{y}".into()),
            ]
        );
    }

    #[rstest]
    #[case(r"\${x}")]
    #[case(r"a\#{x}")]
    #[case("price: $5 or #3")]
    #[case("$")]
    #[case("$$")]
    #[case("{}")]
    fn plain_text(#[case] text: &str) {
        assert_eq!(template(text), vec![("TEXT", text.into())]);
    }

    #[test]
    fn double_backslash_does_not_escape() {
        assert_eq!(
            template(r"\\${x}"),
            vec![("TEXT", r"\\".into()), ("EL", "${x}".into())]
        );
    }

    #[rstest]
    #[case("${a{b}c}")]
    #[case("${'}'}")]
    #[case(r#"${"a\"}"}"#)]
    fn expressions_nest_and_skip_strings(#[case] text: &str) {
        assert_eq!(template(text), vec![("EL", text.into())]);
    }

    #[test]
    fn unterminated_expression_runs_to_end() {
        assert_eq!(
            template("x ${a + {b}"),
            vec![("TEXT", "x ".into()), ("EL_UNTERMINATED", "${a + {b}".into())]
        );
    }

    #[test]
    fn embedding_skips_delimiters() {
        let closed: Vec<char> = "${a}".chars().collect();
        assert_eq!(
            embedding(TemplateToken::El.ordinal(), &closed),
            Some(Embedding::new("el", 2, 1))
        );
        assert_eq!(
            embedding(TemplateToken::ElUnterminated.ordinal(), &closed),
            Some(Embedding::new("el", 2, 0))
        );
        assert_eq!(embedding(TemplateToken::Text.ordinal(), &closed), None);
    }
}
