//! Button markup parsing for filter bodies.
//!
//! Filter text can embed URL buttons with the syntax:
//! - `[Label](buttonurl:https://example.com)` - one button
//! - several on one line form one button row
//!
//! Lines that contain button markup are removed from the visible text
//! entirely; everything else passes through untouched. The `buttonurl` tag
//! is matched case-insensitively and `<...>`-wrapped URLs are unwrapped.

use crate::database::models::{FilterRecord, InlineButton};

const TAG: &str = "buttonurl:";

/// Split text into visible text and button rows.
///
/// Each source line holding at least one `[label](buttonurl:URL)` pattern
/// becomes one row of buttons (left to right) and is dropped from the
/// returned text. Malformed patterns stay in the text as literals.
pub fn parse_button_markup(input: &str) -> (String, Vec<Vec<InlineButton>>) {
    let mut kept_lines: Vec<&str> = Vec::new();
    let mut rows: Vec<Vec<InlineButton>> = Vec::new();

    for line in input.split('\n') {
        let row = scan_line(line);
        if row.is_empty() {
            kept_lines.push(line);
        } else {
            rows.push(row);
        }
    }

    (kept_lines.join("\n").trim().to_string(), rows)
}

/// Collect every button pattern on one line, in order.
fn scan_line(line: &str) -> Vec<InlineButton> {
    let chars: Vec<char> = line.chars().collect();
    let mut row = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        if chars[i] == '[' {
            if let Some((btn, next)) = try_parse_button(&chars, i) {
                row.push(btn);
                i = next;
                continue;
            }
        }
        i += 1;
    }

    row
}

/// Try to parse `[label](buttonurl:URL)` starting at an opening bracket.
fn try_parse_button(chars: &[char], start: usize) -> Option<(InlineButton, usize)> {
    let mut i = start + 1;

    // Label runs to the closing bracket.
    let mut label = String::new();
    while i < chars.len() && chars[i] != ']' {
        label.push(chars[i]);
        i += 1;
    }
    if i >= chars.len() {
        return None;
    }
    i += 1; // skip ]

    if i >= chars.len() || chars[i] != '(' {
        return None;
    }
    i += 1; // skip (

    // The tag itself is case-insensitive.
    if i + TAG.len() > chars.len() {
        return None;
    }
    let tag: String = chars[i..i + TAG.len()].iter().collect();
    if !tag.eq_ignore_ascii_case(TAG) {
        return None;
    }
    i += TAG.len();

    // URL runs to the closing paren.
    let mut url = String::new();
    while i < chars.len() && chars[i] != ')' {
        url.push(chars[i]);
        i += 1;
    }
    if i >= chars.len() {
        return None;
    }
    i += 1; // skip )

    let label = label.trim();
    let url = url
        .trim()
        .trim_start_matches('<')
        .trim_end_matches('>')
        .trim();
    if label.is_empty() || url.is_empty() {
        return None;
    }

    Some((InlineButton::new(label, url), i))
}

/// Pull the quoted keyword out of a `/filter "keyword" ...` caption.
///
/// Returns the lowercased keyword and the remaining body text after the
/// closing quote, or `None` when no usable quoted keyword is present.
pub fn extract_filter_keyword(caption: &str) -> Option<(String, String)> {
    let rest = caption.trim_start().strip_prefix("/filter")?;

    let open = rest.find('"')?;
    let after_open = &rest[open + 1..];
    let close = after_open.find('"')?;

    let keyword = after_open[..close].trim().to_lowercase();
    if keyword.is_empty() {
        return None;
    }

    let body = after_open[close + 1..].trim().to_string();
    Some((keyword, body))
}

/// Build the final reply for a stored filter.
///
/// The body is re-parsed for embedded button markup at send time; embedded
/// rows come first, the rows stored on the record are appended after.
pub fn compose_reply(record: &FilterRecord) -> (String, Vec<Vec<InlineButton>>) {
    let (text, mut rows) = parse_button_markup(&record.body_text);
    rows.extend(record.buttons.iter().cloned());
    (text, rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_button_line_is_extracted() {
        let input = "Scenes from the movie\n[Download](buttonurl:https://example.com/pack)";
        let (text, rows) = parse_button_markup(input);

        assert_eq!(text, "Scenes from the movie");
        assert_eq!(rows.len(), 1);
        assert_eq!(
            rows[0],
            vec![InlineButton::new("Download", "https://example.com/pack")]
        );
    }

    #[test]
    fn test_buttons_on_one_line_share_a_row() {
        let input = "[A](buttonurl:https://a.test) [B](buttonurl:https://b.test)";
        let (text, rows) = parse_button_markup(input);

        assert_eq!(text, "");
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].len(), 2);
        assert_eq!(rows[0][0].label, "A");
        assert_eq!(rows[0][1].label, "B");
    }

    #[test]
    fn test_each_line_becomes_its_own_row() {
        let input = "[A](buttonurl:https://a.test)\n[B](buttonurl:https://b.test)";
        let (_, rows) = parse_button_markup(input);

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0][0].label, "A");
        assert_eq!(rows[1][0].label, "B");
    }

    #[test]
    fn test_angle_wrapped_url_is_unwrapped() {
        let input = "[Go](buttonurl:<https://example.com>)";
        let (_, rows) = parse_button_markup(input);

        assert_eq!(rows[0][0].url, "https://example.com");
    }

    #[test]
    fn test_tag_is_case_insensitive() {
        let input = "[Go](ButtonURL:https://example.com)";
        let (_, rows) = parse_button_markup(input);

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0][0].url, "https://example.com");
    }

    #[test]
    fn test_non_matching_lines_survive_in_order() {
        let input = "first\n[A](buttonurl:https://a.test)\nsecond";
        let (text, rows) = parse_button_markup(input);

        assert_eq!(text, "first\nsecond");
        assert_eq!(rows.len(), 1);
    }

    #[test]
    fn test_malformed_patterns_stay_literal() {
        let cases = [
            "[half open](buttonurl:https://a.test",
            "[no url](buttonurl:)",
            "[plain link](https://a.test)",
            "not markup at all",
        ];

        for input in cases {
            let (text, rows) = parse_button_markup(input);
            assert_eq!(text, *input, "input: {input}");
            assert!(rows.is_empty(), "input: {input}");
        }
    }

    #[test]
    fn test_empty_input() {
        let (text, rows) = parse_button_markup("");
        assert_eq!(text, "");
        assert!(rows.is_empty());
    }

    #[test]
    fn test_clean_text_is_free_of_markup() {
        let input = "intro\n[A](buttonurl:https://a.test) trailing words\noutro";
        let (text, _) = parse_button_markup(input);

        assert!(!text.contains(TAG));
        assert_eq!(text, "intro\noutro");
    }

    #[test]
    fn test_extract_filter_keyword() {
        let (keyword, body) = extract_filter_keyword("/filter \"Alpha\" The 2024 one").unwrap();
        assert_eq!(keyword, "alpha");
        assert_eq!(body, "The 2024 one");
    }

    #[test]
    fn test_extract_filter_keyword_requires_quotes() {
        assert_eq!(extract_filter_keyword("/filter alpha"), None);
        assert_eq!(extract_filter_keyword("/filter \"\""), None);
        assert_eq!(extract_filter_keyword("something else"), None);
    }

    #[test]
    fn test_extract_filter_keyword_with_empty_body() {
        let (keyword, body) = extract_filter_keyword("/filter \"beta\"").unwrap();
        assert_eq!(keyword, "beta");
        assert_eq!(body, "");
    }

    #[test]
    fn test_compose_reply_merges_embedded_before_stored() {
        use crate::database::models::FilterKind;

        let record = FilterRecord {
            id: None,
            chat_id: -100,
            keyword: "alpha".to_string(),
            kind: FilterKind::Text,
            body_text: "Here you go\n[Embedded](buttonurl:https://e.test)".to_string(),
            media_ref: None,
            buttons: vec![vec![InlineButton::new("Stored", "https://s.test")]],
        };

        let (text, rows) = compose_reply(&record);

        assert_eq!(text, "Here you go");
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0][0].label, "Embedded");
        assert_eq!(rows[1][0].label, "Stored");
    }
}
