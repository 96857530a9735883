use crate::config::ScraperConfig;
use crate::results::LinkKind;
use regex::Regex;
use std::sync::LazyLock;
use url::Url;

/// Platforms whose profile pages are always worth following
pub const PROFESSIONAL_DOMAINS: [&str; 8] = [
    "linkedin.com",
    "github.com",
    "gitlab.com",
    "stackoverflow.com",
    "medium.com",
    "dev.to",
    "twitter.com",
    "x.com",
];

/// Non-content links that internal navigation never follows
const SKIP_PATTERNS: [&str; 8] = [
    r"#",
    r"^(mailto|tel|javascript):",
    r"\.(css|js|ico|png|jpe?g|gif|svg|webp|woff2?|ttf|eot)(\?|$)",
    r"\.(pdf|xlsx|docx|csv|zip)(\?|$)",
    r"/(admin|login|logout|cart|checkout)(/|\?|$)",
    r"/wp-(admin|login)",
    r"[?&](search|sort|filter)\b",
    r"/feed/?$",
];

static SKIP_REGEXES: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    SKIP_PATTERNS
        .iter()
        .map(|pattern| Regex::new(pattern).unwrap())
        .collect()
});

/// Outcome of classifying a discovered link
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkClass {
    /// Hosted on a recognized professional platform
    Professional,
    /// Same-site navigation that passed the allow and skip lists
    InternalNav,
    Skip,
}

/// Decides which URLs may be crawled and which discovered links to follow
#[derive(Debug)]
pub struct UrlFilter {
    allowed_patterns: Vec<String>,
    enable_internal_links: bool,
}

impl UrlFilter {
    /// Create a filter from the scraper configuration
    pub fn new(config: &ScraperConfig) -> Self {
        Self {
            allowed_patterns: config
                .allowed_url_patterns
                .iter()
                .map(|p| p.to_lowercase())
                .collect(),
            enable_internal_links: config.enable_internal_links,
        }
    }

    /// Whether the URL passes the configured allow patterns (empty allows all)
    pub fn is_allowed(&self, url: &str) -> bool {
        if self.allowed_patterns.is_empty() {
            return true;
        }
        let lower = url.to_lowercase();
        self.allowed_patterns
            .iter()
            .any(|pattern| lower.contains(pattern.as_str()))
    }

    /// Whether the URL is hosted on one of the professional platforms
    pub fn is_professional(&self, url: &str) -> bool {
        match Url::parse(url) {
            Ok(parsed) => parsed
                .host_str()
                .map(|host| is_professional_host(&host.to_lowercase()))
                .unwrap_or(false),
            Err(_) => false,
        }
    }

    /// Whether the URL matches the non-content skip list
    pub fn is_skipped(&self, url: &str) -> bool {
        let lower = url.to_lowercase();
        SKIP_REGEXES.iter().any(|regex| regex.is_match(&lower))
    }

    /// Same-site navigation link that is allowed and not skipped
    pub fn is_internal_navigation(&self, url: &str, site_host: &str) -> bool {
        link_kind(url, site_host) == LinkKind::Internal
            && self.is_allowed(url)
            && !self.is_skipped(url)
    }

    /// Classify an absolute link found while crawling the site rooted at `site_host`
    pub fn classify(&self, url: &str, site_host: &str) -> LinkClass {
        if self.is_professional(url) {
            return LinkClass::Professional;
        }
        if self.enable_internal_links && self.is_internal_navigation(url, site_host) {
            return LinkClass::InternalNav;
        }
        LinkClass::Skip
    }
}

/// Matches the host itself or any subdomain of a professional platform
pub fn is_professional_host(host: &str) -> bool {
    PROFESSIONAL_DOMAINS
        .iter()
        .any(|domain| host == *domain || host.ends_with(&format!(".{}", domain)))
}

/// Internal when the link stays on the site's host (ignoring a `www.` prefix)
pub fn link_kind(url: &str, site_host: &str) -> LinkKind {
    let host = Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(|h| h.to_lowercase()));
    match host {
        Some(host) if strip_www(&host) == strip_www(&site_host.to_lowercase()) => {
            LinkKind::Internal
        }
        _ => LinkKind::External,
    }
}

fn strip_www(host: &str) -> &str {
    host.strip_prefix("www.").unwrap_or(host)
}

const PROFESSIONAL_KEYWORDS: [&str; 6] =
    ["github", "linkedin", "gitlab", "portfolio", "resume", "cv"];
const TECHNICAL_KEYWORDS: [&str; 6] = [
    "developer",
    "engineer",
    "programming",
    "code",
    "software",
    "tech",
];
const BLOG_KEYWORDS: [&str; 4] = ["blog", "article", "tutorial", "guide"];

/// Heuristic 0-10 relevance of a linked page for questions about its owner
pub fn relevance_score(url: &str, title: &str) -> u8 {
    let url = url.to_lowercase();
    let title = title.to_lowercase();
    let mut score: u8 = 5;

    if PROFESSIONAL_KEYWORDS
        .iter()
        .any(|k| url.contains(k) || title.contains(k))
    {
        score += 2;
    }
    if TECHNICAL_KEYWORDS.iter().any(|k| title.contains(k)) {
        score += 1;
    }
    if BLOG_KEYWORDS
        .iter()
        .any(|k| url.contains(k) || title.contains(k))
    {
        score += 1;
    }

    score.min(10)
}
