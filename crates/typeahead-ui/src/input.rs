//! Grapheme-aware editing of the input line.

use unicode_segmentation::UnicodeSegmentation;

/// Append a character at the end of `value`.
pub fn insert(value: &mut String, c: char) {
    value.push(c);
}

/// Remove the last grapheme cluster. Returns false if `value` was empty.
pub fn backspace(value: &mut String) -> bool {
    match value.grapheme_indices(true).next_back() {
        Some((start, _)) => {
            value.truncate(start);
            true
        }
        None => false,
    }
}

/// Display width of `value` in grapheme clusters, for cursor placement.
pub fn cursor_offset(value: &str) -> usize {
    value.graphemes(true).count()
}
