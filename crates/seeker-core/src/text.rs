/// Byte index of the `char_offset`-th character, clamped to `text.len()`.
pub(crate) fn byte_index(text: &str, char_offset: usize) -> usize {
    text.char_indices()
        .nth(char_offset)
        .map(|(idx, _)| idx)
        .unwrap_or(text.len())
}

pub(crate) fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// Characters `[start, end)` of `text` (char offsets, clamped).
pub(crate) fn char_slice(text: &str, start: usize, end: usize) -> &str {
    let start_byte = byte_index(text, start);
    let end_byte = byte_index(text, end.max(start));
    &text[start_byte..end_byte]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_char_slice_is_unicode_aware() {
        let text = "a👋bc";
        assert_eq!(char_len(text), 4);
        assert_eq!(char_slice(text, 1, 3), "👋b");
        assert_eq!(char_slice(text, 3, 99), "c");
        assert_eq!(byte_index(text, 2), 5);
    }
}
