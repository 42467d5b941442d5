/// Length of `text` in UTF-16 code units.
pub fn utf16_len(text: &str) -> usize {
    text.chars().map(char::len_utf16).sum()
}

/// Byte offset in `text` that corresponds to `units` UTF-16 code units.
///
/// Returns `None` when `units` is past the end or falls inside a surrogate pair.
pub fn byte_offset_for_utf16(text: &str, units: usize) -> Option<usize> {
    let mut seen = 0;
    for (byte, ch) in text.char_indices() {
        if seen == units {
            return Some(byte);
        }
        seen += ch.len_utf16();
        if seen > units {
            return None;
        }
    }
    (seen == units).then_some(text.len())
}

/// Remove the structural bracket characters `{ } [ ]` and trim whitespace.
pub fn strip_brackets(value: &str) -> String {
    value
        .chars()
        .filter(|c| !matches!(c, '{' | '}' | '[' | ']'))
        .collect::<String>()
        .trim()
        .to_string()
}
