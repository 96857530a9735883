use crate::results::ContentType;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// What kind of resource an audit entry describes
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuditKind {
    Main,
    Linked,
    Document,
}

impl AuditKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuditKind::Main => "main",
            AuditKind::Linked => "linked",
            AuditKind::Document => "document",
        }
    }
}

/// Where the content behind an entry came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordOrigin {
    Fetched,
    DiskCache,
    MemoryCache,
    /// Copied from another URL with identical content
    Reused,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditEntry {
    pub url: String,
    pub kind: AuditKind,
    pub title: String,
    pub success: bool,
    pub error: Option<String>,
    pub timestamp: DateTime<Utc>,
    pub relevance: u8,
    pub content_type: Option<ContentType>,
    pub origin: RecordOrigin,
}

impl AuditEntry {
    /// Successful entry for freshly fetched content
    pub fn success(url: &str, kind: AuditKind, title: &str) -> Self {
        Self {
            url: url.to_string(),
            kind,
            title: title.to_string(),
            success: true,
            error: None,
            timestamp: Utc::now(),
            relevance: 0,
            content_type: None,
            origin: RecordOrigin::Fetched,
        }
    }

    pub fn failure(url: &str, kind: AuditKind, error: impl ToString) -> Self {
        Self {
            success: false,
            error: Some(error.to_string()),
            ..Self::success(url, kind, "")
        }
    }

    pub fn with_origin(mut self, origin: RecordOrigin) -> Self {
        self.origin = origin;
        self
    }

    pub fn with_content_type(mut self, content_type: ContentType, relevance: u8) -> Self {
        self.content_type = Some(content_type);
        self.relevance = relevance;
        self
    }
}

/// Counts per kind
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KindCounts {
    pub succeeded: usize,
    pub failed: usize,
}

/// Aggregate view of an audit log
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuditSummary {
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub by_kind: BTreeMap<AuditKind, KindCounts>,
}

impl fmt::Display for AuditSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} URLs visited ({} succeeded, {} failed)",
            self.total, self.succeeded, self.failed
        )?;
        for (kind, counts) in &self.by_kind {
            write!(
                f,
                "; {}: {} ok / {} failed",
                kind.as_str(),
                counts.succeeded,
                counts.failed
            )?;
        }
        Ok(())
    }
}

/// Append-only record of every URL a session touched, in processing order
#[derive(Debug, Clone, Default)]
pub struct AuditLog {
    entries: Vec<AuditEntry>,
}

impl AuditLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, entry: AuditEntry) {
        if entry.success {
            ::log::debug!("audit [{}] ok {}", entry.kind.as_str(), entry.url);
        } else {
            ::log::debug!(
                "audit [{}] failed {}: {}",
                entry.kind.as_str(),
                entry.url,
                entry.error.as_deref().unwrap_or("unknown error")
            );
        }
        self.entries.push(entry);
    }

    pub fn entries(&self) -> &[AuditEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries for one URL, oldest first
    pub fn entries_for<'a>(&'a self, url: &'a str) -> impl Iterator<Item = &'a AuditEntry> + 'a {
        self.entries.iter().filter(move |entry| entry.url == url)
    }

    pub fn summary(&self) -> AuditSummary {
        let mut summary = AuditSummary::default();
        for entry in &self.entries {
            summary.total += 1;
            let counts = summary.by_kind.entry(entry.kind).or_default();
            if entry.success {
                summary.succeeded += 1;
                counts.succeeded += 1;
            } else {
                summary.failed += 1;
                counts.failed += 1;
            }
        }
        summary
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entries_keep_processing_order() {
        let mut log = AuditLog::new();
        log.record(AuditEntry::success("https://a.example/", AuditKind::Main, "A"));
        log.record(AuditEntry::failure(
            "https://b.example/",
            AuditKind::Linked,
            "HTTP 500",
        ));
        log.record(
            AuditEntry::success("https://github.com/alice", AuditKind::Linked, "alice")
                .with_content_type(ContentType::Project, 7),
        );

        let urls: Vec<&str> = log.entries().iter().map(|e| e.url.as_str()).collect();
        assert_eq!(
            urls,
            vec!["https://a.example/", "https://b.example/", "https://github.com/alice"]
        );
        assert_eq!(log.entries()[1].error.as_deref(), Some("HTTP 500"));
        assert_eq!(log.entries()[2].content_type, Some(ContentType::Project));
        assert_eq!(log.entries()[2].relevance, 7);
    }

    #[test]
    fn test_summary_counts_by_kind() {
        let mut log = AuditLog::new();
        log.record(AuditEntry::success("https://a.example/", AuditKind::Main, "A"));
        log.record(AuditEntry::success("https://b.example/", AuditKind::Linked, "B"));
        log.record(AuditEntry::failure("https://c.example/", AuditKind::Linked, "timeout"));
        log.record(AuditEntry::failure("https://a.example/cv.pdf", AuditKind::Document, "bad"));

        let summary = log.summary();
        assert_eq!(summary.total, 4);
        assert_eq!(summary.succeeded, 2);
        assert_eq!(summary.failed, 2);
        assert_eq!(
            summary.by_kind[&AuditKind::Linked],
            KindCounts {
                succeeded: 1,
                failed: 1
            }
        );
        assert_eq!(
            summary.to_string(),
            "4 URLs visited (2 succeeded, 2 failed); main: 1 ok / 0 failed; \
             linked: 1 ok / 1 failed; document: 0 ok / 1 failed"
        );
    }

    #[test]
    fn test_clear() {
        let mut log = AuditLog::new();
        log.record(AuditEntry::success("https://a.example/", AuditKind::Main, "A"));
        log.clear();
        assert!(log.is_empty());
        assert_eq!(log.summary(), AuditSummary::default());
    }
}
