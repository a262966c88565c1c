use alloc::{format, string::String, vec::Vec};

use crate::{Document, TokenSequence};

/// Every token of the hierarchy, embedded lists included, one line each.
pub(crate) fn flatten(doc: &Document) -> Vec<String> {
    let mut out = Vec::new();
    walk(doc.token_sequence(), 0, &mut out);
    out
}

fn walk(mut seq: TokenSequence<'_>, depth: usize, out: &mut Vec<String>) {
    while seq.move_next() {
        let Some(token) = seq.token() else {
            break;
        };
        out.push(format!(
            "{:indent$}{}/{} {}..{} {:?}",
            "",
            seq.language().name(),
            token.name(),
            token.offset(),
            token.end(),
            token.text(),
            indent = depth * 2,
        ));
        if let Some(inner) = seq.embedded() {
            walk(inner, depth + 1, out);
        }
    }
}

/// Clamps a raw edit onto a buffer of `len` code points.
pub(crate) fn clamp_edit(len: usize, offset: usize, removed: usize) -> (usize, usize) {
    let offset = offset % (len + 1);
    let removed = removed % (len - offset + 1);
    (offset, removed)
}
