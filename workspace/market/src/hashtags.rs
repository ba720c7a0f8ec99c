use model::entities::hashtag::MAX_NAME_LEN;
use regex::Regex;
use std::sync::LazyLock;

/// `#` followed by ASCII letters, digits, `_` or Hangul syllables.
static HASHTAG_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"#([0-9A-Za-z가-힣_]+)").expect("hashtag pattern is valid"));

/// Extracts hashtag names from free text.
///
/// Names are returned without the leading `#`, in order of first occurrence,
/// with repeats dropped. Runs longer than [`MAX_NAME_LEN`] characters are not
/// tags and are skipped. Text without any match yields an empty list.
pub fn extract_hashtags(text: &str) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for capture in HASHTAG_PATTERN.captures_iter(text) {
        let name = &capture[1];
        if name.chars().count() > MAX_NAME_LEN {
            continue;
        }
        if !names.iter().any(|n| n == name) {
            names.push(name.to_string());
        }
    }
    names
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extracts_ascii_and_hangul_in_order() {
        let tags = extract_hashtags("buy #phone_case now #폰케이스!");
        assert_eq!(tags, vec!["phone_case", "폰케이스"]);
    }

    #[test]
    fn test_extraction_is_idempotent() {
        let text = "buy #phone_case now #폰케이스!";
        assert_eq!(extract_hashtags(text), extract_hashtags(text));
    }

    #[test]
    fn test_no_tags() {
        assert!(extract_hashtags("no tags here").is_empty());
        assert!(extract_hashtags("").is_empty());
        // A bare hash is not a tag
        assert!(extract_hashtags("price # 10").is_empty());
    }

    #[test]
    fn test_repeats_are_dropped() {
        let tags = extract_hashtags("#shoes #bag #shoes");
        assert_eq!(tags, vec!["shoes", "bag"]);
    }

    #[test]
    fn test_stops_at_punctuation() {
        let tags = extract_hashtags("#new-arrival, #sale.");
        assert_eq!(tags, vec!["new", "sale"]);
    }

    #[test]
    fn test_overlong_runs_are_skipped() {
        let text = format!("great #{} deal #sale", "a".repeat(MAX_NAME_LEN + 1));
        assert_eq!(extract_hashtags(&text), vec!["sale"]);

        let longest = "가".repeat(MAX_NAME_LEN);
        assert_eq!(extract_hashtags(&format!("#{longest}")), vec![longest]);
    }

    #[test]
    fn test_adjacent_tags() {
        let tags = extract_hashtags("#a#b");
        assert_eq!(tags, vec!["a", "b"]);
    }
}
