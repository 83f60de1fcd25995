//! Card name sanitization shared with corpus preprocessing
//!
//! The similarity index is built over sanitized names, so query documents
//! must reproduce the exact same mapping. Two raw names that sanitize
//! identically are the same card.

/// Characters removed from raw card names
const STRIPPED: &str = "#$%&'()*+,.:;<=>?@[\\]^_`{|}~";

/// Sanitize a raw card name into its corpus identifier.
///
/// Each space or `/` becomes a dash (one dash per character, no
/// collapsing), the punctuation in [`STRIPPED`] is removed, everything
/// else is lowercased, and leading/trailing whitespace is trimmed.
pub fn sanitize(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            ' ' | '/' => out.push('-'),
            c if STRIPPED.contains(c) => {}
            c => out.extend(c.to_lowercase()),
        }
    }
    out.trim().to_string()
}
