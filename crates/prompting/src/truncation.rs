/// Character-based truncation.
///
/// Returns the first `max_chars` characters of `content` (never splitting a
/// UTF-8 sequence) and whether anything was cut.
pub fn truncate_chars(content: &str, max_chars: usize) -> (&str, bool) {
    match content.char_indices().nth(max_chars) {
        Some((boundary, _)) => (&content[..boundary], true),
        None => (content, false),
    }
}
