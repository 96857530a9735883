use crate::parsers::text;
use scraper::{ElementRef, Html, Node, Selector};
use std::collections::BTreeMap;
use std::sync::LazyLock;

static TITLE_SELECTOR: LazyLock<Selector> = LazyLock::new(|| Selector::parse("title").unwrap());
static META_SELECTOR: LazyLock<Selector> = LazyLock::new(|| Selector::parse("meta").unwrap());
static LINK_SELECTOR: LazyLock<Selector> = LazyLock::new(|| Selector::parse("a[href]").unwrap());
static BODY_SELECTOR: LazyLock<Selector> = LazyLock::new(|| Selector::parse("body").unwrap());

static GITHUB_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(
        ".p-name, .p-note, .user-profile-bio, .p-label, .p-org, \
         .pinned-item-list-item-content, article.markdown-body, [itemprop='about']",
    )
    .unwrap()
});
static LINKEDIN_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(
        ".top-card-layout__title, .top-card-layout__headline, .core-section-container__content, \
         .experience-item, .education__list-item, .summary",
    )
    .unwrap()
});

/// Elements whose text never counts as body content. Anchor text is kept
/// with the link instead.
const EXCLUDED_TAGS: [&str; 6] = ["script", "style", "noscript", "frame", "iframe", "a"];

/// Sites with known profile sections worth pulling out ahead of the body text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    GitHub,
    LinkedIn,
}

impl Platform {
    pub fn from_url(url: &str) -> Option<Self> {
        let lower = url.to_lowercase();
        if lower.contains("github.com") {
            Some(Platform::GitHub)
        } else if lower.contains("linkedin.com") {
            Some(Platform::LinkedIn)
        } else {
            None
        }
    }

    fn selector(&self) -> &'static Selector {
        match self {
            Platform::GitHub => &GITHUB_SELECTOR,
            Platform::LinkedIn => &LINKEDIN_SELECTOR,
        }
    }
}

/// An `<a href>` as found in the document, before resolution
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawLink {
    pub href: String,
    pub text: String,
}

/// Everything the crawler needs from one HTML document, detached from the DOM
#[derive(Debug, Clone, Default)]
pub struct ParsedPage {
    /// Trimmed text of the first `<title>`, empty if absent
    pub title: String,
    /// `<meta name|property>` to `content`, keys lower-cased, first one wins
    pub meta: BTreeMap<String, String>,
    pub links: Vec<RawLink>,
    /// One entry per element that carries its own text, in document order
    pub text_lines: Vec<String>,
    /// Platform profile sections, empty unless a platform was requested
    pub highlights: Vec<String>,
}

impl ParsedPage {
    /// `description` meta, falling back to `og:description`
    pub fn description(&self) -> String {
        self.meta
            .get("description")
            .or_else(|| self.meta.get("og:description"))
            .cloned()
            .unwrap_or_default()
    }

    pub fn keywords(&self) -> Vec<String> {
        self.meta
            .get("keywords")
            .map(|raw| text::split_keywords(raw))
            .unwrap_or_default()
    }
}

/// Parses HTML content into an owned page summary
pub fn parse(html: &str) -> ParsedPage {
    parse_with_platform(html, None)
}

/// Parses HTML content, also collecting profile sections for `platform`
pub fn parse_with_platform(html: &str, platform: Option<Platform>) -> ParsedPage {
    let doc = Html::parse_document(html);

    let links = parse_links(&doc);
    ::log::debug!("HTML parser found {} links", links.len());

    ParsedPage {
        title: parse_title(&doc),
        meta: parse_meta(&doc),
        links,
        text_lines: extract_text(&doc),
        highlights: platform
            .map(|platform| parse_highlights(&doc, platform))
            .unwrap_or_default(),
    }
}

pub fn parse_title(doc: &Html) -> String {
    doc.select(&TITLE_SELECTOR)
        .next()
        .map(|title| text::collapse_whitespace(&title.text().collect::<String>()))
        .unwrap_or_default()
}

pub fn parse_meta(doc: &Html) -> BTreeMap<String, String> {
    let mut meta = BTreeMap::new();
    for element in doc.select(&META_SELECTOR) {
        let value = element.value();
        let key = value.attr("name").or_else(|| value.attr("property"));
        if let (Some(key), Some(content)) = (key, value.attr("content")) {
            let content = content.trim();
            if !content.is_empty() {
                meta.entry(key.trim().to_lowercase())
                    .or_insert_with(|| content.to_string());
            }
        }
    }
    meta
}

pub fn parse_links(doc: &Html) -> Vec<RawLink> {
    doc.select(&LINK_SELECTOR)
        .filter_map(|element| {
            let href = element.value().attr("href")?.trim();
            if href.is_empty() {
                return None;
            }
            Some(RawLink {
                href: href.to_string(),
                text: text::collapse_whitespace(&element.text().collect::<String>()),
            })
        })
        .collect()
}

/// Depth-first walk of the body emitting each element's own text as one line
pub fn extract_text(doc: &Html) -> Vec<String> {
    let root = doc
        .select(&BODY_SELECTOR)
        .next()
        .unwrap_or_else(|| doc.root_element());

    let mut lines = Vec::new();
    walk(root, &mut lines);
    lines
}

fn walk(element: ElementRef<'_>, lines: &mut Vec<String>) {
    if EXCLUDED_TAGS.contains(&element.value().name()) {
        return;
    }

    let own_text = element
        .children()
        .filter_map(|child| match child.value() {
            Node::Text(text) => Some(&**text),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join(" ");
    let own_text = text::collapse_whitespace(&own_text);
    if !own_text.is_empty() {
        lines.push(own_text);
    }

    for child in element.children() {
        if let Some(child) = ElementRef::wrap(child) {
            walk(child, lines);
        }
    }
}

fn parse_highlights(doc: &Html, platform: Platform) -> Vec<String> {
    doc.select(platform.selector())
        .map(|section| text::collapse_whitespace(&section.text().collect::<Vec<_>>().join(" ")))
        .filter(|section| !section.is_empty())
        .collect()
}
