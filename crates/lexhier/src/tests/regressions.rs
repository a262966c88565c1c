//! Edit scenarios that once needed care; each runs with relex verification on.

use alloc::{rc::Rc, string::String, vec::Vec};

use rstest::rstest;

use super::utils::flatten;
use crate::{Document, LanguageRegistry, LexerOptions};

fn open(language: &str, text: &str) -> Document {
    let registry = Rc::new(LanguageRegistry::builtin());
    Document::open(registry, language, text, LexerOptions::verifying()).unwrap()
}

fn assert_matches_fresh(doc: &Document) {
    let fresh = Document::new(
        doc.registry().clone(),
        doc.language(),
        &doc.text_string(),
        LexerOptions::default(),
    );
    assert_eq!(flatten(doc), flatten(&fresh));
}

#[rstest]
#[case::open_block_comment("source", "int a; int b;", 0, 0, "/*")]
#[case::close_quote_removed("source", "a = \"x\"; b = 1;", 6, 1, "")]
#[case::break_template_expression("template", "a ${x} b ${y} c", 5, 1, "")]
#[case::unescape_template("template", r"a \${x} b", 2, 1, "")]
#[case::grow_number_into_long("el", "1 + 23", 6, 0, "L")]
#[case::keyword_from_identifier("el", "a n b", 3, 0, "e")]
#[case::conditional_colon("el", "a ? b : c : d", 2, 1, " ")]
#[case::bracket_prefix("el", "a[b:c] d:e", 5, 1, "")]
#[case::split_html_tag("html", "<a href=x>t</a>", 3, 0, ">")]
#[case::javadoc_tag_opened("javadoc", " see b> x", 5, 0, "<")]
#[case::doc_comment_closed("source", "/** <b>x</b> int y;", 12, 0, " */")]
#[case::clear_everything("template", "${a}b${c}", 0, 9, "")]
#[case::exponent_digit_after_plus("el", "1e+x", 3, 1, "5")]
#[case::exponent_digit_after_minus("el", "1e-x", 3, 1, "7")]
#[case::fraction_exponent_digit("el", "2.5E+q", 5, 1, "3")]
#[case::exponent_digit_appended("el", "1e+", 3, 0, "2")]
fn edit_matches_full_lex(
    #[case] language: &str,
    #[case] text: &str,
    #[case] offset: usize,
    #[case] removed: usize,
    #[case] inserted: &str,
) {
    let mut doc = open(language, text);
    let _ = flatten(&doc);
    doc.replace(offset, removed, inserted).unwrap();
    doc.check_integrity().unwrap();
    assert_matches_fresh(&doc);
}

#[test]
fn exponent_completed_behind_shorter_tokens() {
    let mut doc = open("el", "1e+x");
    let names = |doc: &Document| -> Vec<&'static str> {
        let mut seq = doc.token_sequence();
        let mut names = Vec::new();
        while seq.move_next() {
            names.extend(seq.token().map(|t| t.name()));
        }
        names
    };
    assert_eq!(names(&doc), ["INT_LITERAL", "IDENTIFIER", "PLUS", "IDENTIFIER"]);

    let change = doc.replace(3, 1, "5").unwrap();
    assert_eq!(change.index, 0);
    assert_eq!(names(&doc), ["DOUBLE_LITERAL"]);
    assert_matches_fresh(&doc);
}

#[test]
fn opening_and_closing_a_comment_resyncs() {
    let mut doc = open("source", "a /* b */ c d e");
    let tail = doc.token_count();
    doc.remove(2, 2).unwrap();
    assert!(doc.token_count() > tail);

    let change = doc.insert(2, "/*").unwrap();
    assert_eq!(doc.text_string(), "a /* b */ c d e");
    assert_eq!(doc.token_count(), tail);
    assert!(change.resynced);
    assert!(change.relex_end < doc.len());
}

#[test]
fn typing_character_by_character() {
    let target = "/** Use <code>x</code>. */ int f() { return \"${s}\"; }";
    let mut doc = open("source", "");
    for (i, c) in target.chars().enumerate() {
        let mut buf = [0_u8; 4];
        doc.insert(i, c.encode_utf8(&mut buf)).unwrap();
        let _ = flatten(&doc);
    }
    assert_eq!(doc.text_string(), target);
    assert_matches_fresh(&doc);
}

#[test]
fn deleting_backwards() {
    let mut doc = open("template", "x ${a ? 'b}' : {c}} y #{d[e]}");
    let _ = flatten(&doc);
    while !doc.is_empty() {
        doc.remove(doc.len() - 1, 1).unwrap();
        assert_matches_fresh(&doc);
    }
    assert_eq!(doc.token_count(), 0);
}

#[test]
fn nested_embeddings_follow_host_edits() {
    let mut doc = open("source", "/** <a href=x>y</a> */\nint z;");
    let before: Vec<String> = flatten(&doc);
    assert!(before.iter().any(|line| line.contains("html/ARGUMENT")));

    // Rename the attribute inside the doc comment.
    doc.replace(7, 4, "name").unwrap();
    let after = flatten(&doc);
    assert!(after.iter().any(|line| line.contains("\"name\"")));
    assert_matches_fresh(&doc);
}
