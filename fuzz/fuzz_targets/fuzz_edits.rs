#![no_main]
use std::{cell::RefCell, rc::Rc};

use arbitrary::{Arbitrary, Unstructured};
use lexhier::{Document, LanguageRegistry, LexerOptions};
use libfuzzer_sys::{fuzz_mutator, fuzz_target, fuzzer_mutate};
use rand::{Rng, SeedableRng, rngs::SmallRng};

const LANGUAGES: &[&str] = &["el", "template", "source", "javadoc", "html"];

/// Byte sequences that put the lexers into their less common states.
static FRAGMENTS: &[&[u8]] = &[
    b"${", b"#{", b"}", b"\\", b"'", b"\"", b"\n", b"?", b":", b"[", b"]", b"instanceof",
    b"0x1F", b"07", b"08", b"1.5e", b"L", b"/*", b"/**", b"*/", b"//", b"@param", b"<b>",
    b"</b>", b"<a href=", b"/>",
];

thread_local! {
    static RNG: RefCell<SmallRng> = RefCell::new(SmallRng::from_os_rng());
}

fn with_rng<F, R>(f: F) -> R
where
    F: FnOnce(&mut SmallRng) -> R,
{
    RNG.with(|cell| f(&mut cell.borrow_mut()))
}

/// Splices a fragment into the input in place of some random bytes.
fn mutator(data: &mut [u8], size: usize, max_size: usize, seed: u32) -> usize {
    if size == 0 || seed % 4 != 0 {
        return fuzzer_mutate(data, size, max_size);
    }
    with_rng(|rng| {
        let fragment = FRAGMENTS[rng.random_range(0..FRAGMENTS.len())];
        let at = rng.random_range(0..size);
        let len = fragment.len().min(max_size - at);
        data[at..at + len].copy_from_slice(&fragment[..len]);
        size.max(at + len)
    })
}

fuzz_mutator!(|data: &mut [u8], size: usize, max_size: usize, seed: u32| {
    mutator(data, size, max_size, seed)
});

#[derive(Debug, Arbitrary)]
struct Edit {
    offset: u16,
    removed: u8,
    inserted: Vec<u8>,
}

#[derive(Debug, Arbitrary)]
struct Script {
    language: u8,
    text: Vec<u8>,
    /// Materialise every embedding after each edit.
    walk: bool,
    edits: Vec<Edit>,
}

fn walk(seq: lexhier::TokenSequence<'_>) -> usize {
    let mut seq = seq;
    let mut count = 0;
    while seq.move_next() {
        count += 1;
        if let Some(inner) = seq.embedded() {
            count += walk(inner);
        }
    }
    count
}

fn run(data: &[u8]) {
    let Ok(script) = Script::arbitrary(&mut Unstructured::new(data)) else {
        return;
    };
    let registry = Rc::new(LanguageRegistry::builtin());
    let name = LANGUAGES[usize::from(script.language) % LANGUAGES.len()];
    let Ok(language) = registry.require(name) else {
        return;
    };
    let mut doc = Document::from_bytes(
        registry,
        &language,
        &script.text,
        LexerOptions::verifying(),
    );
    for edit in script.edits {
        let len = doc.len();
        let offset = usize::from(edit.offset) % (len + 1);
        let removed = usize::from(edit.removed) % (len - offset + 1);
        if removed > 0 {
            doc.remove(offset, removed).unwrap();
        }
        doc.insert_bytes(offset, &edit.inserted).unwrap();
        if script.walk {
            walk(doc.token_sequence());
        }
        doc.check_integrity().unwrap();
    }
}

fuzz_target!(|data: &[u8]| run(data));
