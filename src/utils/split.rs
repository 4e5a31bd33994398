//! Splitting long listings into sendable chunks.

/// Character budget per outgoing message chunk.
pub const MAX_MESSAGE_LEN: usize = 4000;

/// Split text into chunks of at most `limit` characters.
///
/// Prefers the last line boundary at or before the limit and falls back to a
/// hard cut when a chunk has no newline at all. Each remainder is stripped of
/// leading whitespace, so joining the chunks reproduces the input modulo the
/// consumed boundaries. Captions are never passed through here, only plain
/// text listings.
pub fn split_message(text: &str, limit: usize) -> Vec<&str> {
    let mut chunks = Vec::new();
    let mut rest = text;

    while rest.chars().count() > limit {
        let cut = byte_of_char(rest, limit);
        let head = &rest[..cut];

        match head.rfind('\n') {
            Some(nl) => {
                chunks.push(&rest[..nl]);
                rest = rest[nl..].trim_start();
            }
            None => {
                chunks.push(head);
                rest = rest[cut..].trim_start();
            }
        }
    }

    chunks.push(rest);
    chunks
}

/// Byte offset of the `n`-th character (or the end of the string).
fn byte_of_char(s: &str, n: usize) -> usize {
    s.char_indices().nth(n).map(|(i, _)| i).unwrap_or(s.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_text_is_one_chunk() {
        assert_eq!(split_message("hello", 4000), vec!["hello"]);
    }

    #[test]
    fn test_text_at_exactly_the_limit_is_not_split() {
        let text = "x".repeat(4000);
        assert_eq!(split_message(&text, 4000).len(), 1);
    }

    #[test]
    fn test_hard_cut_without_newlines() {
        let text = "a".repeat(9000);
        let chunks = split_message(&text, 4000);

        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[0].len(), 4000);
        assert_eq!(chunks[1].len(), 4000);
        assert_eq!(chunks[2].len(), 1000);
        assert_eq!(chunks.concat(), text);
    }

    #[test]
    fn test_splits_at_last_line_boundary() {
        // 60 numbered lines of ~100 chars, split with a small budget.
        let line = "x".repeat(96);
        let text = (0..60)
            .map(|i| format!("{i:02} {line}"))
            .collect::<Vec<_>>()
            .join("\n");

        let chunks = split_message(&text, 1000);

        assert!(chunks.len() > 1);
        for chunk in &chunks {
            assert!(chunk.chars().count() <= 1000);
            // Chunks end on whole lines and never start with the eaten newline.
            assert!(chunk.ends_with(&line));
            assert!(!chunk.starts_with(char::is_whitespace));
        }

        let rejoined = chunks.join("\n");
        assert_eq!(rejoined, text);
    }

    #[test]
    fn test_limit_counts_characters_not_bytes() {
        let text = "é".repeat(4001);
        let chunks = split_message(&text, 4000);

        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].chars().count(), 4000);
        assert_eq!(chunks[1].chars().count(), 1);
    }
}
