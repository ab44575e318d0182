//! Message segmentation under the provider's per-message character budget.

/// Maximum characters the provider accepts in one send request.
pub const MAX_MSG_LENGTH: usize = 1600;

/// Split `text` into in-order parts of at most `max_len` characters.
///
/// The split is character-count based, not word-aware: concatenating the
/// parts in order reproduces `text` exactly, and no unnecessary parts are
/// produced. Text of `max_len` characters or fewer (including the empty
/// string) yields exactly one part.
pub fn segment(text: &str, max_len: usize) -> Vec<String> {
    debug_assert!(max_len > 0, "part budget must be positive");

    let mut parts = Vec::new();
    let mut part = String::new();
    let mut len = 0;
    for c in text.chars() {
        if len == max_len {
            parts.push(std::mem::take(&mut part));
            len = 0;
        }
        part.push(c);
        len += 1;
    }
    parts.push(part);
    parts
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_text_is_a_single_part() {
        assert_eq!(segment("hello", 160), vec!["hello".to_owned()]);
        assert_eq!(segment("", 160), vec![String::new()]);

        let exactly = "x".repeat(160);
        assert_eq!(segment(&exactly, 160), vec![exactly]);
    }

    #[test]
    fn long_text_splits_into_the_minimum_number_of_parts() {
        let text = "x".repeat(3200);
        let parts = segment(&text, MAX_MSG_LENGTH);
        assert_eq!(parts.len(), 2);
        assert!(parts.iter().all(|p| p.chars().count() == 1600));

        let text = "x".repeat(1601);
        let parts = segment(&text, MAX_MSG_LENGTH);
        assert_eq!(parts.len(), 2);
        assert_eq!(parts[1].chars().count(), 1);
    }

    #[test]
    fn concatenating_parts_reconstructs_the_text() {
        let text = "é".repeat(7).repeat(100) + "tail";
        let parts = segment(&text, 13);
        for part in &parts {
            assert!(part.chars().count() <= 13);
        }
        assert_eq!(parts.concat(), text);
    }

    #[test]
    fn splits_count_characters_not_bytes() {
        // multi-byte characters still count as one toward the budget
        let text = "ααααα";
        let parts = segment(text, 2);
        assert_eq!(parts, vec!["αα", "αα", "α"]);
    }
}
