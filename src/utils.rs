use sha2::{Digest, Sha256};
use url::Url;

/// Query parameters that never change what a page shows
const TRACKING_PARAMS: [&str; 2] = ["ref", "source"];

/// Canonicalizes a URL for loop detection.
///
/// Lower-cases the whole URL, drops `utm_*`, `ref` and `source` query
/// parameters, removes the fragment and strips trailing slashes from any
/// path other than the root. Percent escapes added while parsing are
/// lower-cased too, so applying it twice gives the same result as applying
/// it once. Unparseable input falls back to the lower-cased raw string.
pub fn normalize_url(raw: &str) -> String {
    let lowered = raw.trim().to_lowercase();
    let mut url = match Url::parse(&lowered) {
        Ok(url) => url,
        Err(_) => return lowered,
    };

    let mut kept: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(key, _)| !is_tracking_param(key))
        .map(|(key, value)| (key.into_owned(), value.into_owned()))
        .collect();
    kept.sort();

    if kept.is_empty() {
        url.set_query(None);
    } else {
        url.query_pairs_mut().clear().extend_pairs(kept.iter());
    }

    url.set_fragment(None);

    if !url.cannot_be_a_base() {
        let path = url.path().to_string();
        if path.len() > 1 && path.ends_with('/') {
            let trimmed = path.trim_end_matches('/');
            url.set_path(if trimmed.is_empty() { "/" } else { trimmed });
        }
    }

    url.to_string().to_lowercase()
}

fn is_tracking_param(key: &str) -> bool {
    key.starts_with("utm_") || TRACKING_PARAMS.contains(&key)
}

/// SHA-256 of the raw fetched bytes, hex encoded
pub fn content_hash(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}

/// Resolves a possibly relative link against the page it was found on
pub fn resolve_url(base: &str, link: &str) -> Option<String> {
    let link = link.trim();
    if link.is_empty() {
        return None;
    }
    match Url::parse(link) {
        Ok(absolute) => Some(absolute.to_string()),
        Err(_) => Url::parse(base)
            .and_then(|base| base.join(link))
            .map(|joined| joined.to_string())
            .ok(),
    }
}

/// Lower-cased host of a URL, if it has one
pub fn host_of(url: &str) -> Option<String> {
    Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(|h| h.to_lowercase()))
}

/// Whether the URL uses a scheme we can fetch
pub fn is_http_url(url: &str) -> bool {
    Url::parse(url)
        .map(|u| matches!(u.scheme(), "http" | "https"))
        .unwrap_or(false)
}

/// Cuts text to at most `max_chars` characters, marking the cut with an ellipsis
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((byte_index, _)) => format!("{}...", &text[..byte_index]),
        None => text.to_string(),
    }
}
