//! Contents of a doc comment: words, `@tags`, `.` and `#` (member
//! references) and inline HTML tags, with everything else as plain text.
//! HTML tags embed `html`.

use alloc::boxed::Box;

use crate::{
    Embedding, Lexer, LexerInput, LexerOptions, LexerState, RawToken,
    chars::{is_identifier_part, is_identifier_start},
};

token_kinds! {
    pub enum JavadocToken {
        Ident => "IDENT", Identifier;
        Tag => "TAG", Keyword;
        HtmlTag => "HTML_TAG", Tag;
        Dot => "DOT", Separator;
        Hash => "HASH", Separator;
        OtherText => "OTHER_TEXT", Text;
    }
}

#[derive(Debug)]
pub struct JavadocLexer {
    options: LexerOptions,
}

#[must_use]
pub fn lexer(_state: Option<LexerState>, options: &LexerOptions) -> Box<dyn Lexer> {
    Box::new(JavadocLexer { options: *options })
}

#[must_use]
pub fn embedding(kind: u16, _text: &[char]) -> Option<Embedding> {
    (kind == JavadocToken::HtmlTag.ordinal()).then_some(Embedding::new("html", 0, 0))
}

impl JavadocLexer {
    fn starts_special(&self, c: char) -> bool {
        matches!(c, '@' | '<' | '.' | '#') || is_identifier_start(c, &self.options)
    }

    fn identifier_run(&self, input: &mut LexerInput<'_>) {
        while input.read().is_some_and(|c| is_identifier_part(c, &self.options)) {}
        input.backup(1);
    }

    fn other_text(&self, input: &mut LexerInput<'_>) -> JavadocToken {
        loop {
            match input.read() {
                Some(c) if !self.starts_special(c) => {}
                // A lone `@` or `<` stays in the text.
                Some(c @ ('@' | '<')) => {
                    let next = input.read();
                    input.backup(1);
                    if self.opens(c, next) {
                        input.backup(1);
                        break;
                    }
                }
                _ => {
                    input.backup(1);
                    break;
                }
            }
        }
        JavadocToken::OtherText
    }

    /// Whether `c` followed by `next` starts a tag or an HTML tag.
    fn opens(&self, c: char, next: Option<char>) -> bool {
        match (c, next) {
            ('@', Some(n)) => is_identifier_start(n, &self.options),
            ('<', Some(n)) => n == '/' || n == '!' || n.is_alphabetic(),
            _ => false,
        }
    }
}

impl Lexer for JavadocLexer {
    fn next_token(&mut self, input: &mut LexerInput<'_>) -> Option<RawToken> {
        let c = input.read()?;
        let kind = match c {
            '.' => JavadocToken::Dot,
            '#' => JavadocToken::Hash,
            '@' | '<' => {
                let next = input.read();
                input.backup(1);
                if !self.opens(c, next) {
                    self.other_text(input)
                } else if c == '@' {
                    self.identifier_run(input);
                    JavadocToken::Tag
                } else {
                    while input.read().is_some_and(|c| c != '>') {}
                    if input.read_text().last() != Some(&'>') {
                        input.backup(1);
                    }
                    JavadocToken::HtmlTag
                }
            }
            c if is_identifier_start(c, &self.options) => {
                self.identifier_run(input);
                JavadocToken::Ident
            }
            _ => self.other_text(input),
        };
        Some(input.token(kind.ordinal()))
    }

    fn state(&self) -> Option<LexerState> {
        None
    }
}

#[cfg(test)]
mod tests {
    use alloc::{string::String, vec, vec::Vec};

    use super::*;
    use crate::langs::{JAVADOC, lex_names};

    fn javadoc(text: &str) -> Vec<(&'static str, String)> {
        lex_names(&JAVADOC, text)
    }

    #[test]
    fn tags_references_and_html() {
        assert_eq!(
            javadoc(" Uses <b>Foo#bar</b>.\n * @param x"),
            vec![
                ("OTHER_TEXT", " ".into()),
                ("IDENT", "Uses".into()),
                ("OTHER_TEXT", " ".into()),
                ("HTML_TAG", "<b>".into()),
                ("IDENT", "Foo".into()),
                ("HASH", "#".into()),
                ("IDENT", "bar".into()),
                ("HTML_TAG", "</b>".into()),
                ("DOT", ".".into()),
                ("OTHER_TEXT", "\n * ".into()),
                ("TAG", "@param".into()),
                ("OTHER_TEXT", " ".into()),
                ("IDENT", "x".into()),
            ]
        );
    }

    #[test]
    fn lone_markers_are_text() {
        assert_eq!(javadoc("1 < 2 @ 3"), vec![("OTHER_TEXT", "1 < 2 @ 3".into())]);
        assert_eq!(javadoc("@"), vec![("OTHER_TEXT", "@".into())]);
    }

    #[test]
    fn unterminated_html_tag_runs_to_end() {
        assert_eq!(
            javadoc("a <i class"),
            vec![
                ("IDENT", "a".into()),
                ("OTHER_TEXT", " ".into()),
                ("HTML_TAG", "<i class".into()),
            ]
        );
    }

    #[test]
    fn only_html_tags_embed() {
        let text: Vec<char> = "<b>".chars().collect();
        assert_eq!(
            embedding(JavadocToken::HtmlTag.ordinal(), &text),
            Some(Embedding::new("html", 0, 0))
        );
        assert_eq!(embedding(JavadocToken::Tag.ordinal(), &text), None);
    }
}
