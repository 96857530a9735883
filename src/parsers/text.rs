use crate::utils::truncate_chars;

/// Options for turning extracted fragments into a text blob
#[derive(Debug, Clone, Copy)]
pub struct TextOptions {
    /// Fragments shorter than this (in characters) are dropped
    pub min_fragment_length: usize,
    /// Output is cut to this many characters with an ellipsis
    pub max_length: usize,
}

impl Default for TextOptions {
    fn default() -> Self {
        Self {
            min_fragment_length: 1,
            max_length: 10_000,
        }
    }
}

/// Joins fragments one per line with default options
pub fn join(fragments: &[String]) -> String {
    join_with_options(fragments, &TextOptions::default())
}

/// Joins fragments one per line, dropping short ones and immediate repeats,
/// then truncates
pub fn join_with_options(fragments: &[String], options: &TextOptions) -> String {
    let kept = filter_fragments(fragments, options.min_fragment_length);
    truncate_chars(&kept.join("\n"), options.max_length)
}

/// Drops fragments below `min_length` characters and consecutive duplicates
pub fn filter_fragments(fragments: &[String], min_length: usize) -> Vec<&str> {
    let mut kept: Vec<&str> = Vec::with_capacity(fragments.len());
    for fragment in fragments {
        let fragment = fragment.trim();
        if fragment.is_empty() || fragment.chars().count() < min_length {
            continue;
        }
        if kept.last() == Some(&fragment) {
            continue;
        }
        kept.push(fragment);
    }
    kept
}

/// Collapses every run of whitespace into one space and trims the ends
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Splits a comma separated keywords meta value
pub fn split_keywords(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|keyword| !keyword.is_empty())
        .map(str::to_string)
        .collect()
}
