use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Where a link points relative to the site being crawled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkKind {
    Internal,
    External,
}

/// A link discovered on a page, in document order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    /// Absolute URL the link resolves to
    pub url: String,

    /// Trimmed anchor text
    #[serde(default)]
    pub anchor_text: String,

    pub kind: LinkKind,
}

/// Coarse category of a linked page, derived from its URL
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    Professional,
    Blog,
    Project,
    Technical,
    #[default]
    General,
}

impl ContentType {
    /// First matching rule wins: project, professional, blog, technical
    pub fn from_url(url: &str) -> Self {
        let lower = url.to_lowercase();
        if lower.contains("github.com") || lower.contains("gitlab.com") {
            ContentType::Project
        } else if lower.contains("linkedin.com") {
            ContentType::Professional
        } else if lower.contains("medium.com") || lower.contains("dev.to") || lower.contains("blog")
        {
            ContentType::Blog
        } else if lower.contains("stackoverflow.com") {
            ContentType::Technical
        } else {
            ContentType::General
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ContentType::Professional => "professional",
            ContentType::Blog => "blog",
            ContentType::Project => "project",
            ContentType::Technical => "technical",
            ContentType::General => "general",
        }
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Recognized document formats handed to the document extractor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentKind {
    Pdf,
    Xlsx,
    Docx,
    Csv,
}

impl DocumentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentKind::Pdf => "pdf",
            DocumentKind::Xlsx => "xlsx",
            DocumentKind::Docx => "docx",
            DocumentKind::Csv => "csv",
        }
    }
}

/// Text and metadata extracted from a linked document (PDF, spreadsheet, ...)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentRecord {
    pub url: String,
    pub kind: DocumentKind,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub metadata: BTreeMap<String, String>,
    /// Pages for PDFs, sheets for spreadsheets
    #[serde(default)]
    pub page_count: usize,
    pub last_updated: DateTime<Utc>,
}

/// A page reached by following a qualifying link from the root or another linked page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkedPageRecord {
    pub url: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub metadata: BTreeMap<String, String>,
    #[serde(default)]
    pub content_type: ContentType,
    /// 0-10, zero when scoring is disabled
    #[serde(default)]
    pub relevance: u8,
    #[serde(default)]
    pub content_hash: String,
    pub last_updated: DateTime<Utc>,
}

/// Aggregate content for one crawled root URL
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageRecord {
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub links: Vec<Link>,
    #[serde(default)]
    pub metadata: BTreeMap<String, String>,
    /// Keyed by the link URL the document was found under
    #[serde(default)]
    pub documents: BTreeMap<String, DocumentRecord>,
    /// Every page reached from this root, flattened regardless of hop count
    #[serde(default)]
    pub linked_pages: BTreeMap<String, LinkedPageRecord>,
    #[serde(default)]
    pub content_hash: String,
    pub last_updated: DateTime<Utc>,
}

impl PageRecord {
    /// Create an empty record for a freshly fetched page
    pub fn new(url: &str, title: String, content_hash: String) -> Self {
        Self {
            url: url.to_string(),
            title,
            description: String::new(),
            text: String::new(),
            links: Vec::new(),
            metadata: BTreeMap::new(),
            documents: BTreeMap::new(),
            linked_pages: BTreeMap::new(),
            content_hash,
            last_updated: Utc::now(),
        }
    }

    /// Whether the record is younger than `max_age`
    pub fn is_fresh(&self, max_age: std::time::Duration) -> bool {
        is_fresh(self.last_updated, max_age)
    }

    /// Copy of this record re-stamped for another URL
    pub fn reused_for(&self, url: &str) -> Self {
        let mut copy = self.clone();
        copy.url = url.to_string();
        copy.last_updated = Utc::now();
        copy
    }
}

impl LinkedPageRecord {
    /// Copy of this record re-stamped for another URL
    pub fn reused_for(&self, url: &str) -> Self {
        let mut copy = self.clone();
        copy.url = url.to_string();
        copy.last_updated = Utc::now();
        copy
    }
}

impl DocumentRecord {
    pub fn is_fresh(&self, max_age: std::time::Duration) -> bool {
        is_fresh(self.last_updated, max_age)
    }
}

fn is_fresh(stamp: DateTime<Utc>, max_age: std::time::Duration) -> bool {
    let age = Utc::now().signed_duration_since(stamp);
    match chrono::Duration::from_std(max_age) {
        Ok(max_age) => age < max_age,
        Err(_) => true,
    }
}
