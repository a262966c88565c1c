//! Code point classification for lexer dispatch.
//!
//! ASCII is answered from a precomputed flag table. Outside ASCII, identifier
//! extras come from sorted range tables (binary searched) and everything else
//! falls back to the Unicode properties in `core`.

use crate::LexerOptions;

const WHITESPACE: u8 = 0b0000_0001;
const ID_START: u8 = 0b0000_0010;
const ID_PART: u8 = 0b0000_0100;
const DIGIT: u8 = 0b0000_1000;
const OCTAL: u8 = 0b0001_0000;
const HEX: u8 = 0b0010_0000;

const ASCII_CLASS: [u8; 128] = {
    let mut table = [0u8; 128];
    let mut i = 0;
    while i < 128 {
        let c = i as u8;
        let mut flags = 0u8;
        if matches!(c, b' ' | b'\t' | b'\n' | b'\r' | 0x0c) {
            flags |= WHITESPACE;
        }
        if matches!(c, b'a'..=b'z' | b'A'..=b'Z' | b'_' | b'$') {
            flags |= ID_START | ID_PART;
        }
        if matches!(c, b'0'..=b'9') {
            flags |= DIGIT | ID_PART | HEX;
        }
        if matches!(c, b'0'..=b'7') {
            flags |= OCTAL;
        }
        if matches!(c, b'a'..=b'f' | b'A'..=b'F') {
            flags |= HEX;
        }
        table[i] = flags;
        i += 1;
    }
    table
};

/// Non-alphabetic code points that may start an identifier (currency signs).
const IDENT_START_EXTRA: &[(char, char)] = &[
    ('\u{00A2}', '\u{00A5}'),
    ('\u{058F}', '\u{058F}'),
    ('\u{060B}', '\u{060B}'),
    ('\u{09F2}', '\u{09F3}'),
    ('\u{0AF1}', '\u{0AF1}'),
    ('\u{0E3F}', '\u{0E3F}'),
    ('\u{17DB}', '\u{17DB}'),
    ('\u{20A0}', '\u{20C0}'),
    ('\u{FDFC}', '\u{FDFC}'),
    ('\u{FE69}', '\u{FE69}'),
    ('\u{FF04}', '\u{FF04}'),
    ('\u{FFE0}', '\u{FFE1}'),
    ('\u{FFE5}', '\u{FFE6}'),
];

/// Non-alphanumeric code points that may continue an identifier: combining
/// marks, joiners and connector punctuation.
const IDENT_PART_EXTRA: &[(char, char)] = &[
    ('\u{0300}', '\u{036F}'),
    ('\u{0483}', '\u{0487}'),
    ('\u{0591}', '\u{05BD}'),
    ('\u{05BF}', '\u{05BF}'),
    ('\u{05C1}', '\u{05C2}'),
    ('\u{0610}', '\u{061A}'),
    ('\u{064B}', '\u{065F}'),
    ('\u{0670}', '\u{0670}'),
    ('\u{06D6}', '\u{06DC}'),
    ('\u{0900}', '\u{0903}'),
    ('\u{093A}', '\u{094F}'),
    ('\u{1AB0}', '\u{1AFF}'),
    ('\u{1DC0}', '\u{1DFF}'),
    ('\u{200C}', '\u{200D}'),
    ('\u{203F}', '\u{2040}'),
    ('\u{2054}', '\u{2054}'),
    ('\u{20D0}', '\u{20FF}'),
    ('\u{FE00}', '\u{FE0F}'),
    ('\u{FE20}', '\u{FE2F}'),
    ('\u{FE33}', '\u{FE34}'),
    ('\u{FE4D}', '\u{FE4F}'),
    ('\u{FF3F}', '\u{FF3F}'),
];

#[inline]
fn ascii_has(c: char, flag: u8) -> bool {
    (c as u32) < 128 && ASCII_CLASS[c as usize] & flag != 0
}

fn in_ranges(c: char, ranges: &[(char, char)]) -> bool {
    ranges
        .binary_search_by(|&(lo, hi)| {
            if hi < c {
                core::cmp::Ordering::Less
            } else if lo > c {
                core::cmp::Ordering::Greater
            } else {
                core::cmp::Ordering::Equal
            }
        })
        .is_ok()
}

#[inline]
pub fn is_identifier_start(c: char, options: &LexerOptions) -> bool {
    if c.is_ascii() {
        return ascii_has(c, ID_START);
    }
    !options.ascii_identifiers_only && (c.is_alphabetic() || in_ranges(c, IDENT_START_EXTRA))
}

#[inline]
pub fn is_identifier_part(c: char, options: &LexerOptions) -> bool {
    if c.is_ascii() {
        return ascii_has(c, ID_PART);
    }
    !options.ascii_identifiers_only
        && (c.is_alphanumeric()
            || in_ranges(c, IDENT_PART_EXTRA)
            || in_ranges(c, IDENT_START_EXTRA))
}

#[inline]
pub fn is_whitespace(c: char, options: &LexerOptions) -> bool {
    if c.is_ascii() {
        return ascii_has(c, WHITESPACE);
    }
    options.allow_unicode_whitespace && c.is_whitespace()
}

#[inline]
pub fn is_digit(c: char) -> bool {
    ascii_has(c, DIGIT)
}

#[inline]
pub fn is_octal_digit(c: char) -> bool {
    ascii_has(c, OCTAL)
}

#[inline]
pub fn is_hex_digit(c: char) -> bool {
    ascii_has(c, HEX)
}
