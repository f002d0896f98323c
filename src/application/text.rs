//! Text normalization shared by keyword and name matching.

/// Lower-cases `text`, turns every character other than alphanumerics and `&`
/// into a space, collapses runs of spaces and pads both ends with one space.
///
/// Padding lets callers test for a whole-word phrase with
/// `normalized.find(&normalize(phrase))`.
pub fn normalize(text: &str) -> String {
    let cleaned: String = text
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '&' {
                c.to_ascii_lowercase()
            } else {
                ' '
            }
        })
        .collect();

    let joined = cleaned.split_whitespace().collect::<Vec<_>>().join(" ");
    format!(" {joined} ")
}

/// Position of `phrase` as a whole-word match inside an already normalized
/// text, or `None`.
pub fn find_phrase(normalized_text: &str, phrase: &str) -> Option<usize> {
    let needle = normalize(phrase);
    if needle.trim().is_empty() {
        return None;
    }
    normalized_text.find(&needle)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_pads_and_collapses() {
        assert_eq!(normalize("  Dr. Reddy's   Q3 "), " dr reddy s q3 ");
        assert_eq!(normalize(""), "  ");
    }

    #[test]
    fn test_find_phrase_respects_word_boundaries() {
        let text = normalize("Switch to ITC shares");
        assert!(find_phrase(&text, "itc").is_some());
        assert!(find_phrase(&normalize("A switch flipped"), "itc").is_none());
        assert!(find_phrase(&text, "").is_none());
    }
}
