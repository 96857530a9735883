use crate::parsers::text::{self, TextOptions};

#[cfg(test)]
mod basic_tests {
    use super::*;

    fn fragments(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_join_one_line_per_fragment() {
        let result = text::join(&fragments(&["First", "  Second  ", "", "Third"]));
        assert_eq!(result, "First\nSecond\nThird");
    }

    #[test]
    fn test_join_drops_consecutive_repeats() {
        let result = text::join(&fragments(&["Menu", "Menu", "Body", "Menu"]));
        assert_eq!(result, "Menu\nBody\nMenu");
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(text::join(&[]), "");
        assert_eq!(text::collapse_whitespace("   \n\t "), "");
    }

    #[test]
    fn test_collapse_whitespace() {
        assert_eq!(
            text::collapse_whitespace("  Hello \n\n  world\t again "),
            "Hello world again"
        );
    }

    #[test]
    fn test_split_keywords() {
        assert_eq!(
            text::split_keywords(" rust,  web ,, llm "),
            vec!["rust", "web", "llm"]
        );
        assert!(text::split_keywords("").is_empty());
    }
}

#[cfg(test)]
mod options_tests {
    use super::*;

    #[test]
    fn test_min_fragment_length() {
        let options = TextOptions {
            min_fragment_length: 5,
            ..TextOptions::default()
        };
        let input = vec!["Hi".to_string(), "Hello there".to_string(), "Yo".to_string()];
        assert_eq!(text::join_with_options(&input, &options), "Hello there");
    }

    #[test]
    fn test_max_length_truncates_with_ellipsis() {
        let options = TextOptions {
            max_length: 8,
            ..TextOptions::default()
        };
        let input = vec!["Line one".to_string(), "Line two".to_string()];
        assert_eq!(text::join_with_options(&input, &options), "Line one...");
    }
}
