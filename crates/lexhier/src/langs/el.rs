//! Expression-language lexer.
//!
//! Operators, keywords (`and`, `div`, `eq`, ... ), identifiers, numbers with
//! Java-style suffixes, and quoted literals. Between tokens the automaton
//! carries two pieces of context in its snapshot:
//!
//! - the number of open conditional operators (`?` without its `:` yet); an
//!   identifier directly followed by `:` is a tag library prefix only when no
//!   conditional is open;
//! - whether it is inside an index expression (`[` ... `]`), where prefix
//!   detection is off and `]` closes the context. Every other input is handled
//!   exactly as outside brackets.

use alloc::boxed::Box;

use crate::{
    Lexer, LexerInput, LexerOptions, LexerState, RawToken,
    chars::{is_digit, is_hex_digit, is_identifier_part, is_identifier_start, is_octal_digit, is_whitespace},
};

token_kinds! {
    pub enum ElToken {
        Whitespace => "WHITESPACE", Whitespace;
        StringLiteral => "STRING_LITERAL", Literal;
        CharLiteral => "CHAR_LITERAL", Literal;
        Identifier => "IDENTIFIER", Identifier;
        TagLibPrefix => "TAG_LIB_PREFIX", Identifier;
        Lt => "LT", Operator;
        Gt => "GT", Operator;
        Dot => "DOT", Separator;
        Comma => "COMMA", Separator;
        Question => "QUESTION", Operator;
        Plus => "PLUS", Operator;
        Minus => "MINUS", Operator;
        Mul => "MUL", Operator;
        Div => "DIV", Operator;
        Mod => "MOD", Operator;
        LParen => "LPAREN", Separator;
        RParen => "RPAREN", Separator;
        LBracket => "LBRACKET", Separator;
        RBracket => "RBRACKET", Separator;
        Colon => "COLON", Operator;
        EqEq => "EQ_EQ", Operator;
        LtEq => "LT_EQ", Operator;
        GtEq => "GT_EQ", Operator;
        NotEq => "NOT_EQ", Operator;
        AndAnd => "AND_AND", Operator;
        OrOr => "OR_OR", Operator;
        Not => "NOT", Operator;
        AndKeyword => "AND_KEYWORD", Keyword;
        DivKeyword => "DIV_KEYWORD", Keyword;
        EmptyKeyword => "EMPTY_KEYWORD", Keyword;
        EqKeyword => "EQ_KEYWORD", Keyword;
        FalseKeyword => "FALSE_KEYWORD", Keyword;
        GeKeyword => "GE_KEYWORD", Keyword;
        GtKeyword => "GT_KEYWORD", Keyword;
        InstanceofKeyword => "INSTANCEOF_KEYWORD", Keyword;
        LeKeyword => "LE_KEYWORD", Keyword;
        LtKeyword => "LT_KEYWORD", Keyword;
        ModKeyword => "MOD_KEYWORD", Keyword;
        NeKeyword => "NE_KEYWORD", Keyword;
        NotKeyword => "NOT_KEYWORD", Keyword;
        NullKeyword => "NULL_KEYWORD", Keyword;
        OrKeyword => "OR_KEYWORD", Keyword;
        TrueKeyword => "TRUE_KEYWORD", Keyword;
        IntLiteral => "INT_LITERAL", Literal;
        LongLiteral => "LONG_LITERAL", Literal;
        HexLiteral => "HEX_LITERAL", Literal;
        OctalLiteral => "OCTAL_LITERAL", Literal;
        FloatLiteral => "FLOAT_LITERAL", Literal;
        DoubleLiteral => "DOUBLE_LITERAL", Literal;
        InvalidOctalLiteral => "INVALID_OCTAL_LITERAL", Error;
        InvalidChar => "INVALID_CHAR", Error;
    }
}

use ElToken::*;

/// Snapshot tag bit for "inside `[` ... `]`".
const IN_BRACKET: u16 = 1;

/// Longest keyword (`instanceof`); anything longer skips the table.
const MAX_KEYWORD_LEN: usize = 10;

/// Keyword for an identifier's text, if any.
#[must_use]
pub fn keyword(text: &[char]) -> Option<ElToken> {
    if text.len() > MAX_KEYWORD_LEN {
        return None;
    }
    let candidates: &[(&str, ElToken)] = match text.first()? {
        'a' => &[("and", AndKeyword)],
        'd' => &[("div", DivKeyword)],
        'e' => &[("eq", EqKeyword), ("empty", EmptyKeyword)],
        'f' => &[("false", FalseKeyword)],
        'g' => &[("ge", GeKeyword), ("gt", GtKeyword)],
        'i' => &[("instanceof", InstanceofKeyword)],
        'l' => &[("le", LeKeyword), ("lt", LtKeyword)],
        'm' => &[("mod", ModKeyword)],
        'n' => &[("ne", NeKeyword), ("not", NotKeyword), ("null", NullKeyword)],
        'o' => &[("or", OrKeyword)],
        't' => &[("true", TrueKeyword)],
        _ => return None,
    };
    candidates
        .iter()
        .find(|(kw, _)| kw.len() == text.len() && kw.chars().eq(text.iter().copied()))
        .map(|&(_, token)| token)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Scan {
    Whitespace,
    Identifier,
    Zero,
    Int,
    Octal,
    InvalidOctal,
    Hex,
    /// Read `.` with nothing before it.
    Dot,
    Fraction,
    /// Read `e`/`E`; the payload is what the token is if no digits follow.
    ExponentMark(ElToken),
    ExponentSign(ElToken),
    Exponent,
    Quoted { quote: char, escaped: bool },
    Lt,
    Gt,
    Eq,
    Bang,
    Amp,
    Pipe,
}

enum Step {
    Go(Scan),
    /// Back up `n` code points and cut a token.
    Emit(ElToken, usize),
}

use Step::{Emit, Go};

/// Expression-language lexer; its snapshot carries the open `?` count and
/// the bracket flag.
#[derive(Debug)]
pub struct ElLexer {
    options: LexerOptions,
    conditionals: i32,
    in_bracket: bool,
}

/// Factory registered for the `el` language.
#[must_use]
pub fn lexer(state: Option<LexerState>, options: &LexerOptions) -> Box<dyn Lexer> {
    Box::new(ElLexer::new(state, options))
}

impl ElLexer {
    /// Resumes from `state`, or starts fresh outside any bracket.
    #[must_use]
    pub fn new(state: Option<LexerState>, options: &LexerOptions) -> Self {
        let (in_bracket, conditionals) = match state {
            Some(s) => (s.state & IN_BRACKET != 0, s.counter),
            None => (false, 0),
        };
        Self {
            options: *options,
            conditionals,
            in_bracket,
        }
    }

    fn initial(&self, c: char) -> Step {
        match c {
            c if is_whitespace(c, &self.options) => Go(Scan::Whitespace),
            c if is_identifier_start(c, &self.options) => Go(Scan::Identifier),
            '0' => Go(Scan::Zero),
            '1'..='9' => Go(Scan::Int),
            '.' => Go(Scan::Dot),
            '"' | '\'' => Go(Scan::Quoted { quote: c, escaped: false }),
            '<' => Go(Scan::Lt),
            '>' => Go(Scan::Gt),
            '=' => Go(Scan::Eq),
            '!' => Go(Scan::Bang),
            '&' => Go(Scan::Amp),
            '|' => Go(Scan::Pipe),
            ',' => Emit(Comma, 0),
            '?' => Emit(Question, 0),
            ':' => Emit(Colon, 0),
            '+' => Emit(Plus, 0),
            '-' => Emit(Minus, 0),
            '*' => Emit(Mul, 0),
            '/' => Emit(Div, 0),
            '%' => Emit(Mod, 0),
            '(' => Emit(LParen, 0),
            ')' => Emit(RParen, 0),
            '[' => Emit(LBracket, 0),
            ']' => Emit(RBracket, 0),
            _ => Emit(InvalidChar, 0),
        }
    }

    fn identifier(&self, input: &LexerInput<'_>, next: Option<char>) -> ElToken {
        if next == Some(':') && self.conditionals == 0 && !self.in_bracket {
            return TagLibPrefix;
        }
        // `read_text` still includes the terminator here.
        let text = input.read_text();
        let end = text.len() - usize::from(next.is_some());
        keyword(&text[..end]).unwrap_or(Identifier)
    }

    #[expect(clippy::too_many_lines)]
    fn step(&self, scan: Scan, c: Option<char>, input: &LexerInput<'_>) -> Step {
        use Scan::*;
        match scan {
            Whitespace => match c {
                Some(c) if is_whitespace(c, &self.options) => Go(Whitespace),
                _ => Emit(ElToken::Whitespace, 1),
            },
            Identifier => match c {
                Some(c) if is_identifier_part(c, &self.options) => Go(Identifier),
                _ => Emit(self.identifier(input, c), 1),
            },

            // -------------------------- NUMBERS -----------------------------
            Zero => match c {
                Some('.') => Go(Fraction),
                Some('x' | 'X') => Go(Hex),
                Some('l' | 'L') => Emit(LongLiteral, 0),
                Some('f' | 'F') => Emit(FloatLiteral, 0),
                Some('d' | 'D') => Emit(DoubleLiteral, 0),
                Some('e' | 'E') => Go(ExponentMark(IntLiteral)),
                Some(c) if is_octal_digit(c) => Go(Octal),
                Some('8' | '9') => Go(InvalidOctal),
                _ => Emit(IntLiteral, 1),
            },
            Int => match c {
                Some(c) if is_digit(c) => Go(Int),
                Some('.') => Go(Fraction),
                Some('l' | 'L') => Emit(LongLiteral, 0),
                Some('f' | 'F') => Emit(FloatLiteral, 0),
                Some('d' | 'D') => Emit(DoubleLiteral, 0),
                Some('e' | 'E') => Go(ExponentMark(IntLiteral)),
                _ => Emit(IntLiteral, 1),
            },
            Octal => match c {
                Some(c) if is_octal_digit(c) => Go(Octal),
                Some('8' | '9') => Go(InvalidOctal),
                Some('.') => Go(Fraction),
                Some('l' | 'L') => Emit(LongLiteral, 0),
                Some('f' | 'F') => Emit(FloatLiteral, 0),
                Some('d' | 'D') => Emit(DoubleLiteral, 0),
                Some('e' | 'E') => Go(ExponentMark(OctalLiteral)),
                _ => Emit(OctalLiteral, 1),
            },
            InvalidOctal => match c {
                Some(c) if is_digit(c) => Go(InvalidOctal),
                Some('.') => Go(Fraction),
                Some('f' | 'F') => Emit(FloatLiteral, 0),
                Some('d' | 'D') => Emit(DoubleLiteral, 0),
                Some('e' | 'E') => Go(ExponentMark(InvalidOctalLiteral)),
                _ => Emit(InvalidOctalLiteral, 1),
            },
            Hex => match c {
                Some(c) if is_hex_digit(c) => Go(Hex),
                Some('l' | 'L') => Emit(LongLiteral, 0),
                _ => Emit(HexLiteral, 1),
            },
            Dot => match c {
                Some(c) if is_digit(c) => Go(Fraction),
                _ => Emit(ElToken::Dot, 1),
            },
            Fraction => match c {
                Some(c) if is_digit(c) => Go(Fraction),
                Some('f' | 'F') => Emit(FloatLiteral, 0),
                Some('d' | 'D') => Emit(DoubleLiteral, 0),
                Some('e' | 'E') => Go(ExponentMark(DoubleLiteral)),
                _ => Emit(DoubleLiteral, 1),
            },
            ExponentMark(prior) => match c {
                Some(c) if is_digit(c) => Go(Exponent),
                Some('+' | '-') => Go(ExponentSign(prior)),
                _ => Emit(prior, 2),
            },
            ExponentSign(prior) => match c {
                Some(c) if is_digit(c) => Go(Exponent),
                _ => Emit(prior, 3),
            },
            Exponent => match c {
                Some(c) if is_digit(c) => Go(Exponent),
                Some('f' | 'F') => Emit(FloatLiteral, 0),
                Some('d' | 'D') => Emit(DoubleLiteral, 0),
                _ => Emit(DoubleLiteral, 1),
            },

            // -------------------------- LITERALS ----------------------------
            Quoted { quote, escaped } => {
                let kind = if quote == '"' { StringLiteral } else { CharLiteral };
                match c {
                    None | Some('\n') => Emit(kind, 1),
                    Some(_) if escaped => Go(Quoted { quote, escaped: false }),
                    Some('\\') => Go(Quoted { quote, escaped: true }),
                    Some(c) if c == quote => Emit(kind, 0),
                    Some(_) => Go(Quoted { quote, escaped }),
                }
            }

            // -------------------------- OPERATORS ---------------------------
            Lt => match c {
                Some('=') => Emit(LtEq, 0),
                _ => Emit(ElToken::Lt, 1),
            },
            Gt => match c {
                Some('=') => Emit(GtEq, 0),
                _ => Emit(ElToken::Gt, 1),
            },
            Eq => match c {
                Some('=') => Emit(EqEq, 0),
                _ => Emit(InvalidChar, 1),
            },
            Bang => match c {
                Some('=') => Emit(NotEq, 0),
                _ => Emit(Not, 1),
            },
            Amp => match c {
                Some('&') => Emit(AndAnd, 0),
                _ => Emit(InvalidChar, 1),
            },
            Pipe => match c {
                Some('|') => Emit(OrOr, 0),
                _ => Emit(InvalidChar, 1),
            },
        }
    }

    fn emit(&mut self, input: &mut LexerInput<'_>, kind: ElToken) -> RawToken {
        match kind {
            Question => self.conditionals += 1,
            Colon if self.conditionals > 0 => self.conditionals -= 1,
            LBracket => self.in_bracket = true,
            RBracket if self.in_bracket => self.in_bracket = false,
            _ => {}
        }
        input.token(kind.ordinal())
    }
}

impl Lexer for ElLexer {
    fn next_token(&mut self, input: &mut LexerInput<'_>) -> Option<RawToken> {
        let first = input.read()?;
        let mut step = self.initial(first);
        loop {
            match step {
                Go(scan) => {
                    let c = input.read();
                    step = self.step(scan, c, input);
                }
                Emit(kind, backup) => {
                    input.backup(backup);
                    return Some(self.emit(input, kind));
                }
            }
        }
    }

    fn state(&self) -> Option<LexerState> {
        if self.conditionals == 0 && !self.in_bracket {
            return None;
        }
        let flags = if self.in_bracket { IN_BRACKET } else { 0 };
        Some(LexerState::new(flags, self.conditionals))
    }
}

#[cfg(test)]
mod tests {
    use alloc::{string::String, vec, vec::Vec};

    use rstest::rstest;

    use super::*;
    use crate::{langs::lex_names, tokenize};

    fn el(text: &str) -> Vec<(&'static str, String)> {
        lex_names(&crate::langs::EL, text)
    }

    fn single(text: &str) -> (&'static str, usize) {
        let tokens = el(text);
        assert_eq!(tokens.len(), 1, "{text:?} lexed as {tokens:?}");
        (tokens[0].0, tokens[0].1.chars().count())
    }

    #[rstest]
    #[case("and", "AND_KEYWORD")]
    #[case("ands", "IDENTIFIER")]
    #[case("an", "IDENTIFIER")]
    #[case("div", "DIV_KEYWORD")]
    #[case("eq", "EQ_KEYWORD")]
    #[case("empty", "EMPTY_KEYWORD")]
    #[case("false", "FALSE_KEYWORD")]
    #[case("ge", "GE_KEYWORD")]
    #[case("gt", "GT_KEYWORD")]
    #[case("instanceof", "INSTANCEOF_KEYWORD")]
    #[case("instanceofx", "IDENTIFIER")]
    #[case("le", "LE_KEYWORD")]
    #[case("lt", "LT_KEYWORD")]
    #[case("mod", "MOD_KEYWORD")]
    #[case("ne", "NE_KEYWORD")]
    #[case("not", "NOT_KEYWORD")]
    #[case("null", "NULL_KEYWORD")]
    #[case("or", "OR_KEYWORD")]
    #[case("true", "TRUE_KEYWORD")]
    #[case("True", "IDENTIFIER")]
    #[case("_x$1", "IDENTIFIER")]
    fn keywords_need_exact_match(#[case] text: &str, #[case] expected: &str) {
        assert_eq!(single(text), (expected, text.chars().count()));
    }

    #[rstest]
    #[case("0", "INT_LITERAL")]
    #[case("08", "INVALID_OCTAL_LITERAL")]
    #[case("0718", "INVALID_OCTAL_LITERAL")]
    #[case("0.5", "DOUBLE_LITERAL")]
    #[case("0x1F", "HEX_LITERAL")]
    #[case("0X", "HEX_LITERAL")]
    #[case("0x1FL", "LONG_LITERAL")]
    #[case("1e10", "DOUBLE_LITERAL")]
    #[case("1E+10", "DOUBLE_LITERAL")]
    #[case("1e-10f", "FLOAT_LITERAL")]
    #[case("3L", "LONG_LITERAL")]
    #[case("0l", "LONG_LITERAL")]
    #[case("017", "OCTAL_LITERAL")]
    #[case("123", "INT_LITERAL")]
    #[case("1.", "DOUBLE_LITERAL")]
    #[case(".5", "DOUBLE_LITERAL")]
    #[case("2.5e3d", "DOUBLE_LITERAL")]
    #[case("2f", "FLOAT_LITERAL")]
    #[case("0d", "DOUBLE_LITERAL")]
    #[case("09.5", "DOUBLE_LITERAL")]
    fn numeric_literals(#[case] text: &str, #[case] expected: &str) {
        assert_eq!(single(text), (expected, text.chars().count()));
    }

    #[test]
    fn exponent_without_digits_backs_up() {
        assert_eq!(
            el("1e"),
            vec![("INT_LITERAL", "1".into()), ("IDENTIFIER", "e".into())]
        );
        assert_eq!(
            el("2.5e+x"),
            vec![
                ("DOUBLE_LITERAL", "2.5".into()),
                ("IDENTIFIER", "e".into()),
                ("PLUS", "+".into()),
                ("IDENTIFIER", "x".into()),
            ]
        );
    }

    #[test]
    fn exponent_backup_records_lookahead() {
        let text: Vec<char> = "1e".chars().collect();
        let tokens = tokenize(lexer, &text, &LexerOptions::default());
        // `1`, then peeked at `e` and EOF.
        assert_eq!(tokens[0].0.length, 1);
        assert_eq!(tokens[0].0.lookahead, 2);
    }

    #[rstest]
    #[case("\"abc")]
    #[case("'abc")]
    #[case("\"a\\\"bc")]
    #[case("\"abc\\")]
    fn unterminated_literals_cover_the_rest(#[case] text: &str) {
        let (name, len) = single(text);
        assert!(name == "STRING_LITERAL" || name == "CHAR_LITERAL");
        assert_eq!(len, text.chars().count());
    }

    #[test]
    fn literals_stop_before_newline() {
        assert_eq!(
            el("'ab\ncd'"),
            vec![
                ("CHAR_LITERAL", "'ab".into()),
                ("WHITESPACE", "\n".into()),
                ("IDENTIFIER", "cd".into()),
                ("CHAR_LITERAL", "'".into()),
            ]
        );
    }

    #[test]
    fn escaped_quote_does_not_terminate() {
        assert_eq!(single(r#""a\"b""#), ("STRING_LITERAL", 6));
        assert_eq!(single(r"'a\\'"), ("CHAR_LITERAL", 5));
    }

    #[test]
    fn operators() {
        let names: Vec<_> = el("<<=>>===!=!&&||+-*/%(),?:[].")
            .into_iter()
            .map(|(name, _)| name)
            .collect();
        assert_eq!(
            names,
            [
                "LT", "LT_EQ", "GT", "GT_EQ", "EQ_EQ", "NOT_EQ", "NOT", "AND_AND", "OR_OR",
                "PLUS", "MINUS", "MUL", "DIV", "MOD", "LPAREN", "RPAREN", "COMMA", "QUESTION",
                "COLON", "LBRACKET", "RBRACKET", "DOT",
            ]
        );
    }

    #[rstest]
    #[case("&")]
    #[case("|")]
    #[case("=")]
    #[case("#")]
    #[case("{")]
    fn invalid_characters(#[case] text: &str) {
        assert_eq!(single(text), ("INVALID_CHAR", 1));
    }

    #[test]
    fn tag_lib_prefix_outside_conditionals() {
        assert_eq!(
            el("fn:length(x)")[..2],
            [("TAG_LIB_PREFIX", "fn".into()), ("COLON", ":".into())]
        );
        let names: Vec<_> = el("a ? b:c : d").into_iter().map(|(name, _)| name).collect();
        assert_eq!(
            names,
            [
                "IDENTIFIER", "WHITESPACE", "QUESTION", "WHITESPACE", "IDENTIFIER", "COLON",
                "IDENTIFIER", "WHITESPACE", "COLON", "WHITESPACE", "IDENTIFIER",
            ]
        );
        // The conditional is closed, so prefix detection is back.
        assert_eq!(el("a?b:c:d:e")[6].0, "TAG_LIB_PREFIX");
    }

    #[test]
    fn bracket_context_disables_prefix() {
        let names: Vec<_> = el("m[k:v]").into_iter().map(|(name, _)| name).collect();
        assert_eq!(
            names,
            ["IDENTIFIER", "LBRACKET", "IDENTIFIER", "COLON", "IDENTIFIER", "RBRACKET"]
        );
        assert_eq!(el("m[0]p:q")[4].0, "TAG_LIB_PREFIX");
    }

    #[test]
    fn snapshot_carries_conditionals_and_brackets() {
        let text: Vec<char> = "a ? m[b".chars().collect();
        let tokens = tokenize(lexer, &text, &LexerOptions::default());
        let states: Vec<_> = tokens.iter().map(|(_, s)| *s).collect();
        assert_eq!(states[0], None);
        assert_eq!(states[2], Some(LexerState::new(0, 1)));
        assert_eq!(states[5], Some(LexerState::new(IN_BRACKET, 1)));

        // Resuming inside the bracket keeps prefix detection off.
        let rest: Vec<char> = "k:v".chars().collect();
        let mut resumed = ElLexer::new(states[5], &LexerOptions::default());
        let mut input = LexerInput::new(&rest);
        let tok = resumed.next_token(&mut input).unwrap();
        assert_eq!(tok.kind, Identifier.ordinal());
    }

    #[test]
    fn keyword_table_rejects_long_identifiers_early() {
        let long: Vec<char> = "instanceofs".chars().collect();
        assert_eq!(keyword(&long), None);
        let exact: Vec<char> = "instanceof".chars().collect();
        assert_eq!(keyword(&exact), Some(InstanceofKeyword));
    }

    #[test]
    fn unicode_identifiers_follow_options() {
        assert_eq!(single("größe"), ("IDENTIFIER", 5));
        let text: Vec<char> = "größe".chars().collect();
        let ascii = LexerOptions {
            ascii_identifiers_only: true,
            ..LexerOptions::default()
        };
        let kinds: Vec<_> = tokenize(lexer, &text, &ascii)
            .into_iter()
            .map(|(t, _)| ElToken::from_ordinal(t.kind).unwrap())
            .collect();
        assert_eq!(kinds, [Identifier, InvalidChar, InvalidChar, Identifier]);
    }
}
