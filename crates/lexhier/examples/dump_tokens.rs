//! Prints the token hierarchy of a snippet, applies an edit and prints what
//! changed.
//!
//! Run with
//!
//! ```bash
//! cargo run -p lexhier --example dump_tokens
//! ```

use std::rc::Rc;

use lexhier::{Document, LanguageRegistry, LexerOptions, TokenSequence};

fn dump(seq: TokenSequence<'_>, depth: usize) {
    let mut seq = seq;
    while seq.move_next() {
        let Some(token) = seq.token() else { break };
        println!(
            "{:indent$}{:<8} {:<18} {:>3}..{:<3} {:?}",
            "",
            seq.language().name(),
            token.name(),
            token.offset(),
            token.end(),
            token.text(),
            indent = depth * 2,
        );
        if let Some(inner) = seq.embedded() {
            dump(inner, depth + 1);
        }
    }
}

fn main() -> Result<(), lexhier::Error> {
    let registry = Rc::new(LanguageRegistry::builtin());
    let text = "/** Greets <b>${user.name}</b>. */\nString greet() { return \"Hi ${user.name ne null ? user.name : 'you'}\"; }\n";
    let mut doc = Document::open(registry.clone(), "source", text, LexerOptions::default())?;
    dump(doc.token_sequence(), 0);

    let offset = text.find("greet(").map_or(0, |b| text[..b].chars().count());
    let change = doc.insert(offset + "greet".len(), "ing")?;
    println!("\n{change:?}\n");
    dump(doc.token_sequence(), 0);

    let html = registry.path(&["source", "javadoc", "html"])?;
    let tags = doc.token_sequence_list(&html, 0, doc.len());
    println!("\n{} html regions in {:?}", tags.len(), tags.path());
    Ok(())
}
