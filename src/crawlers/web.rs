use crate::audit::{AuditEntry, AuditKind, RecordOrigin};
use crate::cache::DiskCache;
use crate::config::ScraperConfig;
use crate::crawlers::crawler::{DocumentExtractor, PageFetcher, Summarizer};
use crate::crawlers::fetch::{FetchedPage, HttpFetcher, fetch_page};
use crate::crawlers::session::{CancelHandle, CrawlSession};
use crate::error::{CacheError, ScrapeError};
use crate::filter::{LinkClass, UrlFilter, link_kind, relevance_score};
use crate::parsers::html::{Platform, RawLink};
use crate::parsers::{ParserType, text};
use crate::results::{
    ContentType, DocumentKind, DocumentRecord, Link, LinkKind, LinkedPageRecord, PageRecord,
};
use crate::utils::{host_of, is_http_url, normalize_url, resolve_url, truncate_chars};
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use std::time::Duration;

/// Recursive, depth- and budget-bounded crawler with disk and memory caching
///
/// One `WebScraper` serves many sessions. Each session tracks visited URLs,
/// the remaining linked-page budget and the audit log; call
/// [`WebScraper::start_session`] before every refresh cycle.
pub struct WebScraper {
    config: ScraperConfig,
    filter: UrlFilter,
    fetcher: Arc<dyn PageFetcher>,
    summarizer: Option<Arc<dyn Summarizer>>,
    documents: Option<Arc<dyn DocumentExtractor>>,
    cache: DiskCache,
    memory: HashMap<String, PageRecord>,
    document_cache: HashMap<String, DocumentRecord>,
    session: CrawlSession,
}

impl WebScraper {
    /// Create a scraper that fetches over HTTP
    pub fn new(config: ScraperConfig) -> Result<Self, ScrapeError> {
        let fetcher = HttpFetcher::new(&config.user_agent)?;
        Ok(Self::with_fetcher(config, Arc::new(fetcher)))
    }

    /// Create a scraper around any page fetcher
    pub fn with_fetcher(config: ScraperConfig, fetcher: Arc<dyn PageFetcher>) -> Self {
        let config = config.normalized();
        ::log::info!(
            "Scraper configured: depth={}, pages/session={}, cache={}h, internal links={}",
            config.max_depth,
            config.max_pages_per_session,
            config.cache_duration_hours,
            config.enable_internal_links
        );

        Self {
            filter: UrlFilter::new(&config),
            cache: DiskCache::new(config.cache_dir.clone()),
            session: CrawlSession::new(config.max_pages_per_session),
            fetcher,
            summarizer: None,
            documents: None,
            memory: HashMap::new(),
            document_cache: HashMap::new(),
            config,
        }
    }

    pub fn with_summarizer(mut self, summarizer: Arc<dyn Summarizer>) -> Self {
        self.summarizer = Some(summarizer);
        self
    }

    pub fn with_documents(mut self, extractor: Arc<dyn DocumentExtractor>) -> Self {
        self.documents = Some(extractor);
        self
    }

    pub fn config(&self) -> &ScraperConfig {
        &self.config
    }

    pub fn cache(&self) -> &DiskCache {
        &self.cache
    }

    pub fn session(&self) -> &CrawlSession {
        &self.session
    }

    pub fn cancel_handle(&self) -> CancelHandle {
        self.session.cancel_handle()
    }

    /// Discards the visited set, page budget and audit log of the previous session
    pub fn start_session(&mut self) -> &CrawlSession {
        self.session.reset(self.config.max_pages_per_session);
        ::log::debug!(
            "Started crawl session with a budget of {} pages",
            self.session.pages_remaining()
        );
        &self.session
    }

    /// Crawls a root URL, serving it from cache when fresh
    ///
    /// Only a failure on the root URL itself is returned as an error; failures
    /// on linked pages and documents are audited and skipped.
    pub async fn crawl_root(&mut self, url: &str) -> Result<PageRecord, ScrapeError> {
        if self.session.is_cancelled() {
            return Err(ScrapeError::Cancelled);
        }
        if !is_http_url(url) {
            let error = ScrapeError::InvalidUrl(url.to_string());
            self.audit_failure(url, AuditKind::Main, &error);
            return Err(error);
        }
        if !self.filter.is_allowed(url) {
            let error = ScrapeError::Disallowed(url.to_string());
            self.audit_failure(url, AuditKind::Main, &error);
            return Err(error);
        }

        let key = normalize_url(url);
        if self.config.refresh_content {
            ::log::info!("Refresh requested, bypassing caches for {}", url);
        } else if let Some(record) = self.load_cached(url, &key) {
            return Ok(record);
        }

        self.session.visited.mark_visited(url);
        let fetched = match self.fetch(url, self.config.root_timeout(), None).await {
            Ok(fetched) => fetched,
            Err(e) => {
                ::log::error!("Failed to fetch root {}: {}", url, e);
                self.audit_failure(url, AuditKind::Main, &e);
                return Err(e);
            }
        };

        if self.config.reuse_content_by_hash {
            if let Ok(existing) = self.cache.find_page_by_hash(&fetched.content_hash) {
                ::log::info!(
                    "Content of {} matches cached {}, reusing its record",
                    url,
                    existing.url
                );
                let record = existing.reused_for(url);
                self.session.stats.reused += 1;
                self.session.audit.record(
                    AuditEntry::success(url, AuditKind::Main, &record.title)
                        .with_origin(RecordOrigin::Reused),
                );
                self.persist(url, &key, &record);
                return Ok(record);
            }
        }

        let site_host = host_of(url).unwrap_or_default();
        let FetchedPage {
            content_hash, page, ..
        } = fetched;

        let mut record = PageRecord::new(url, page.title.clone(), content_hash);
        record.description = page.description();
        record.metadata = page.meta.clone();
        record.links = resolve_links(url, &page.links, &site_host);
        record.text = self.extract_text(&page.title, page.text_lines).await;

        self.collect_documents(&mut record).await;

        let mut linked_pages = BTreeMap::new();
        let targets: Vec<String> = record
            .links
            .iter()
            .filter(|link| self.should_follow(&link.url, &site_host, &site_host))
            .map(|link| link.url.clone())
            .collect();
        ::log::info!("{} links from {} qualify for crawling", targets.len(), url);

        for target in targets {
            if self.session.is_cancelled() {
                ::log::warn!("Crawl cancelled, stopping link expansion of {}", url);
                break;
            }
            if let Err(e) = self
                .crawl_linked(&target, 1, &site_host, &mut linked_pages)
                .await
            {
                ::log::warn!("Skipping linked page {}: {}", target, e);
            }
        }
        record.linked_pages = linked_pages;

        self.session
            .audit
            .record(AuditEntry::success(url, AuditKind::Main, &record.title));
        self.persist(url, &key, &record);

        ::log::info!(
            "Crawled {}: {} chars of text, {} links, {} linked pages, {} documents",
            url,
            record.text.chars().count(),
            record.links.len(),
            record.linked_pages.len(),
            record.documents.len()
        );
        Ok(record)
    }

    /// Crawls one linked page at `depth`, adding it and everything it leads
    /// to into `linked_pages`
    ///
    /// Depth, budget and already-visited URLs end the branch silently.
    async fn crawl_linked(
        &mut self,
        url: &str,
        depth: usize,
        site_host: &str,
        linked_pages: &mut BTreeMap<String, LinkedPageRecord>,
    ) -> Result<(), ScrapeError> {
        if self.session.is_cancelled() {
            return Err(ScrapeError::Cancelled);
        }
        if depth > self.config.max_depth || self.session.pages_remaining() == 0 {
            ::log::debug!(
                "Not crawling {}: depth={}, pages remaining={}",
                url,
                depth,
                self.session.pages_remaining()
            );
            return Ok(());
        }
        if self.session.visited.is_visited(url) {
            ::log::trace!("Already visited {}", url);
            return Ok(());
        }
        if !self.filter.is_allowed(url) {
            let error = ScrapeError::Disallowed(url.to_string());
            self.audit_failure(url, AuditKind::Linked, &error);
            return Err(error);
        }

        self.session.visited.mark_visited(url);
        self.session.take_page();

        let timeout = if depth > 1 {
            self.config.peripheral_timeout()
        } else {
            self.config.linked_timeout()
        };
        let fetched = match self.fetch(url, timeout, Platform::from_url(url)).await {
            Ok(fetched) => fetched,
            Err(e) => {
                self.audit_failure(url, AuditKind::Linked, &e);
                return Err(e);
            }
        };

        let content_type = ContentType::from_url(url);
        if self.config.reuse_content_by_hash {
            if let Some(existing) = self.find_linked_by_hash(&fetched.content_hash, linked_pages) {
                ::log::info!(
                    "Content of {} matches {}, reusing its record",
                    url,
                    existing.url
                );
                let mut record = existing.reused_for(url);
                record.content_type = content_type;
                self.session.stats.reused += 1;
                self.session.audit.record(
                    AuditEntry::success(url, AuditKind::Linked, &record.title)
                        .with_content_type(content_type, record.relevance)
                        .with_origin(RecordOrigin::Reused),
                );
                linked_pages.insert(url.to_string(), record);
                return Ok(());
            }
        }

        let FetchedPage {
            content_hash, page, ..
        } = fetched;
        let relevance = if self.config.score_relevance {
            relevance_score(url, &page.title)
        } else {
            0
        };

        let min_length = self.config.min_text_length;
        let mut fragments: Vec<String> = page
            .highlights
            .iter()
            .filter(|highlight| highlight.chars().count() > min_length)
            .cloned()
            .collect();
        fragments.extend(page.text_lines.iter().cloned());
        let text = self.extract_text(&page.title, fragments).await;

        let record = LinkedPageRecord {
            url: url.to_string(),
            title: page.title.clone(),
            description: page.description(),
            text,
            keywords: page.keywords(),
            metadata: page.meta.clone(),
            content_type,
            relevance,
            content_hash,
            last_updated: chrono::Utc::now(),
        };
        self.session.audit.record(
            AuditEntry::success(url, AuditKind::Linked, &record.title)
                .with_content_type(content_type, relevance),
        );
        linked_pages.insert(url.to_string(), record);
        ::log::info!("Crawled linked page {} at depth {}", url, depth);

        if depth >= self.config.max_depth {
            return Ok(());
        }

        let page_host = host_of(url).unwrap_or_default();
        let targets: Vec<String> = resolve_links(url, &page.links, site_host)
            .into_iter()
            .filter(|link| self.should_follow(&link.url, &page_host, site_host))
            .map(|link| link.url)
            .collect();

        for target in targets {
            if self.session.is_cancelled() {
                break;
            }
            if let Err(e) =
                Box::pin(self.crawl_linked(&target, depth + 1, site_host, linked_pages)).await
            {
                ::log::warn!("Skipping linked page {}: {}", target, e);
            }
        }

        Ok(())
    }

    /// Professional links leaving the current page's host, or internal
    /// navigation on the root site when enabled. Documents and assets are
    /// never crawled as pages.
    fn should_follow(&self, url: &str, page_host: &str, site_host: &str) -> bool {
        if !ParserType::from_url(url).should_extract_links() {
            return false;
        }
        match self.filter.classify(url, site_host) {
            LinkClass::Professional => link_kind(url, page_host) == LinkKind::External,
            LinkClass::InternalNav => true,
            LinkClass::Skip => false,
        }
    }

    async fn fetch(
        &mut self,
        url: &str,
        timeout: Duration,
        platform: Option<Platform>,
    ) -> Result<FetchedPage, ScrapeError> {
        if self.session.is_cancelled() {
            return Err(ScrapeError::Cancelled);
        }
        ::log::info!("Fetching {} (timeout {:?})", url, timeout);
        self.session.stats.fetches += 1;
        fetch_page(self.fetcher.as_ref(), url, timeout, platform).await
    }

    /// Joins fragments, then summarizes when a summarizer is up, else truncates
    async fn extract_text(&mut self, title: &str, fragments: Vec<String>) -> String {
        self.session.stats.extractions += 1;
        let full = text::join_with_options(
            &fragments,
            &text::TextOptions {
                min_fragment_length: 1,
                max_length: usize::MAX,
            },
        );
        if full.is_empty() {
            return full;
        }

        if let Some(summary) = self.summarize(title, &full).await {
            return summary;
        }
        truncate_chars(&full, self.config.max_content_length)
    }

    async fn summarize(&mut self, title: &str, text: &str) -> Option<String> {
        let summarizer = self.summarizer.clone()?;

        let available = match self.session.summarizer_available {
            Some(available) => available,
            None => {
                let available = summarizer.is_available().await;
                if !available {
                    ::log::warn!("Summarizer not available, falling back to truncation");
                }
                self.session.summarizer_available = Some(available);
                available
            }
        };
        if !available {
            return None;
        }

        match summarizer.summarize(title, text).await {
            Ok(summary) if !summary.trim().is_empty() => Some(summary.trim().to_string()),
            Ok(_) => None,
            Err(e) => {
                ::log::warn!("Summarizing '{}' failed, truncating instead: {}", title, e);
                None
            }
        }
    }

    /// Extracts linked documents into the record, reusing fresh in-memory results
    async fn collect_documents(&mut self, record: &mut PageRecord) {
        let Some(extractor) = self.documents.clone() else {
            return;
        };

        let candidates: Vec<(String, DocumentKind)> = record
            .links
            .iter()
            .filter_map(|link| {
                ParserType::from_url(&link.url)
                    .document_kind()
                    .map(|kind| (link.url.clone(), kind))
            })
            .filter(|(url, _)| self.filter.is_allowed(url))
            .collect();

        for (url, kind) in candidates {
            if record.documents.contains_key(&url) {
                continue;
            }
            if let Some(cached) = self.document_cache.get(&url) {
                if cached.is_fresh(self.config.cache_duration()) {
                    record.documents.insert(url, cached.clone());
                    continue;
                }
            }
            if self.session.is_cancelled() {
                break;
            }

            ::log::info!("Extracting {} document {}", kind.as_str(), url);
            match extractor.extract(&url, kind).await {
                Ok(document) => {
                    self.session
                        .audit
                        .record(AuditEntry::success(&url, AuditKind::Document, &document.title));
                    self.document_cache.insert(url.clone(), document.clone());
                    record.documents.insert(url, document);
                }
                Err(e) => {
                    ::log::warn!("Document extraction failed for {}: {}", url, e);
                    self.audit_failure(&url, AuditKind::Document, &e);
                }
            }
        }
    }

    /// Fresh disk snapshot first, then the shorter-lived memory cache
    fn load_cached(&mut self, url: &str, key: &str) -> Option<PageRecord> {
        match self.cache.load(url) {
            Ok(record) if record.is_fresh(self.config.cache_duration()) => {
                ::log::info!("Serving {} from disk cache", url);
                self.session.stats.cache_hits += 1;
                self.session.audit.record(
                    AuditEntry::success(url, AuditKind::Main, &record.title)
                        .with_origin(RecordOrigin::DiskCache),
                );
                self.memory.insert(key.to_string(), record.clone());
                return Some(record);
            }
            Ok(_) => ::log::debug!("Disk cache for {} is stale", url),
            Err(CacheError::NotFound(_)) => {}
            Err(e) => ::log::warn!("Failed to read disk cache for {}: {}", url, e),
        }

        let record = self.memory.get(key)?;
        if !record.is_fresh(self.config.memory_cache_duration()) {
            return None;
        }
        let record = record.clone();
        ::log::info!("Serving {} from memory cache", url);
        self.session.stats.cache_hits += 1;
        self.session.audit.record(
            AuditEntry::success(url, AuditKind::Main, &record.title)
                .with_origin(RecordOrigin::MemoryCache),
        );
        Some(record)
    }

    fn find_linked_by_hash(
        &self,
        hash: &str,
        linked_pages: &BTreeMap<String, LinkedPageRecord>,
    ) -> Option<LinkedPageRecord> {
        if let Some(found) = linked_pages.values().find(|page| page.content_hash == hash) {
            return Some(found.clone());
        }
        self.cache.find_linked_by_hash(hash).ok()
    }

    /// Writes to disk and memory; disk failures are only logged
    fn persist(&mut self, url: &str, key: &str, record: &PageRecord) {
        if let Err(e) = self.cache.save(url, record) {
            ::log::warn!("Failed to cache {}: {}", url, e);
        }
        self.memory.insert(key.to_string(), record.clone());
    }

    fn audit_failure(&mut self, url: &str, kind: AuditKind, error: &ScrapeError) {
        self.session.audit.record(AuditEntry::failure(url, kind, error));
    }

    #[cfg(test)]
    pub(crate) fn memory_record_mut(&mut self, url: &str) -> Option<&mut PageRecord> {
        self.memory.get_mut(&normalize_url(url))
    }
}

/// Resolves raw hrefs against the page URL, dropping non-HTTP targets
fn resolve_links(page_url: &str, raw_links: &[RawLink], site_host: &str) -> Vec<Link> {
    raw_links
        .iter()
        .filter_map(|raw| {
            let url = resolve_url(page_url, &raw.href)?;
            if !is_http_url(&url) {
                return None;
            }
            Some(Link {
                kind: link_kind(&url, site_host),
                url,
                anchor_text: raw.text.clone(),
            })
        })
        .collect()
}
