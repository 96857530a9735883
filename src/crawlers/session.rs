use crate::audit::AuditLog;
use crate::utils::normalize_url;
use std::collections::HashSet;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Normalized URLs already claimed by the current session
#[derive(Debug, Clone, Default)]
pub struct VisitedSet {
    urls: HashSet<String>,
}

impl VisitedSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_visited(&self, url: &str) -> bool {
        self.urls.contains(&normalize_url(url))
    }

    /// Returns false if the URL was already present
    pub fn mark_visited(&mut self, url: &str) -> bool {
        self.urls.insert(normalize_url(url))
    }

    pub fn len(&self) -> usize {
        self.urls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.urls.is_empty()
    }
}

/// Shared flag that stops a running crawl at its next fetch or recursion step
#[derive(Debug, Clone, Default)]
pub struct CancelHandle(Arc<AtomicBool>);

impl CancelHandle {
    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Work counters for one session
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CrawlStats {
    /// Network fetches attempted
    pub fetches: usize,
    /// Text extraction passes run
    pub extractions: usize,
    /// Records copied from identical content under another URL
    pub reused: usize,
    /// Root records served from the disk or memory cache
    pub cache_hits: usize,
}

/// State for one user-triggered refresh cycle
#[derive(Debug)]
pub struct CrawlSession {
    pub visited: VisitedSet,
    pub audit: AuditLog,
    pub stats: CrawlStats,
    pages_remaining: usize,
    /// Probed once per session, on first use
    pub(crate) summarizer_available: Option<bool>,
    cancel: CancelHandle,
}

impl CrawlSession {
    pub fn new(page_budget: usize) -> Self {
        Self {
            visited: VisitedSet::new(),
            audit: AuditLog::new(),
            stats: CrawlStats::default(),
            pages_remaining: page_budget,
            summarizer_available: None,
            cancel: CancelHandle::default(),
        }
    }

    /// Starts over with an empty visited set and audit log and a fresh budget
    ///
    /// The old cancel handle is detached, so cancelling it no longer affects
    /// this session.
    pub fn reset(&mut self, page_budget: usize) {
        self.visited = VisitedSet::new();
        self.audit.clear();
        self.stats = CrawlStats::default();
        self.pages_remaining = page_budget;
        self.summarizer_available = None;
        self.cancel = CancelHandle::default();
    }

    pub fn pages_remaining(&self) -> usize {
        self.pages_remaining
    }

    /// Claims one linked-page fetch from the budget
    pub fn take_page(&mut self) -> bool {
        if self.pages_remaining == 0 {
            return false;
        }
        self.pages_remaining -= 1;
        true
    }

    pub fn cancel_handle(&self) -> CancelHandle {
        self.cancel.clone()
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::{AuditEntry, AuditKind};

    #[test]
    fn test_visited_set_uses_normalized_form() {
        let mut visited = VisitedSet::new();
        assert!(visited.mark_visited("https://Example.com/about/?utm_source=x"));
        assert!(visited.is_visited("https://example.com/about#team"));
        assert!(!visited.mark_visited("https://example.com/about"));
        assert_eq!(visited.len(), 1);

        let once = crate::utils::normalize_url("https://example.com/Café");
        assert!(visited.mark_visited("https://example.com/Café"));
        assert!(visited.is_visited(&once));
    }

    #[test]
    fn test_budget_never_goes_negative() {
        let mut session = CrawlSession::new(2);
        assert!(session.take_page());
        assert!(session.take_page());
        assert!(!session.take_page());
        assert_eq!(session.pages_remaining(), 0);
    }

    #[test]
    fn test_cancel_handle_is_shared() {
        let session = CrawlSession::new(1);
        let handle = session.cancel_handle();
        assert!(!session.is_cancelled());
        handle.cancel();
        assert!(session.is_cancelled());
    }

    #[test]
    fn test_reset_clears_session_state() {
        let mut session = CrawlSession::new(1);
        let old_handle = session.cancel_handle();
        session.visited.mark_visited("https://example.com/a");
        session
            .audit
            .record(AuditEntry::success("https://example.com/a", AuditKind::Linked, "A"));
        session.stats.fetches = 3;
        session.summarizer_available = Some(false);
        assert!(session.take_page());

        session.reset(5);

        assert!(session.visited.is_empty());
        assert!(session.audit.is_empty());
        assert_eq!(session.stats.fetches, 0);
        assert_eq!(session.summarizer_available, None);
        assert_eq!(session.pages_remaining(), 5);

        old_handle.cancel();
        assert!(!session.is_cancelled());
    }
}
