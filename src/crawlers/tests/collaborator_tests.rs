use super::stubs::{StubDocuments, StubFetcher, StubSummarizer, html_page, test_config};
use crate::audit::AuditKind;
use crate::crawlers::WebScraper;
use crate::results::DocumentKind;
use std::sync::Arc;
use std::sync::atomic::Ordering;
use tempfile::TempDir;

const ROOT: &str = "http://site.example/";

#[cfg(test)]
mod summarizer_tests {
    use super::*;

    fn fetcher() -> Arc<StubFetcher> {
        Arc::new(
            StubFetcher::new()
                .page(ROOT, html_page("Root", &["https://github.com/alice"]))
                .page("https://github.com/alice", html_page("alice", &[])),
        )
    }

    #[tokio::test]
    async fn test_summary_replaces_text_and_probe_runs_once() {
        let dir = TempDir::new().unwrap();
        let summarizer = Arc::new(StubSummarizer::available());
        let mut scraper = WebScraper::with_fetcher(test_config(dir.path()), fetcher())
            .with_summarizer(summarizer.clone());

        let record = scraper.crawl_root(ROOT).await.unwrap();

        assert_eq!(record.text, "Summary of Root");
        assert_eq!(
            record.linked_pages["https://github.com/alice"].text,
            "Summary of alice"
        );
        assert_eq!(summarizer.probes.load(Ordering::SeqCst), 1);
        assert_eq!(summarizer.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_unavailable_summarizer_falls_back_to_truncation() {
        let dir = TempDir::new().unwrap();
        let mut config = test_config(dir.path());
        config.max_content_length = 12;
        let summarizer = Arc::new(StubSummarizer::unavailable());
        let mut scraper =
            WebScraper::with_fetcher(config, fetcher()).with_summarizer(summarizer.clone());

        let record = scraper.crawl_root(ROOT).await.unwrap();

        assert_eq!(record.text, "Root\nContent...");
        assert_eq!(summarizer.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_failed_summary_falls_back_silently() {
        let dir = TempDir::new().unwrap();
        let summarizer = Arc::new(StubSummarizer::failing());
        let mut scraper = WebScraper::with_fetcher(test_config(dir.path()), fetcher())
            .with_summarizer(summarizer);

        let record = scraper.crawl_root(ROOT).await.unwrap();

        assert_eq!(record.text, "Root\nContent of the Root page.");
    }
}

#[cfg(test)]
mod document_tests {
    use super::*;

    fn fetcher() -> Arc<StubFetcher> {
        Arc::new(StubFetcher::new().page(
            ROOT,
            html_page("Root", &["/files/cv.pdf", "/files/data.csv", "/about"]),
        ))
    }

    #[tokio::test]
    async fn test_documents_are_extracted_and_cached() {
        let dir = TempDir::new().unwrap();
        let mut config = test_config(dir.path());
        config.refresh_content = true;
        config.reuse_content_by_hash = false;
        let documents = Arc::new(StubDocuments::new());
        let mut scraper =
            WebScraper::with_fetcher(config, fetcher()).with_documents(documents.clone());

        let record = scraper.crawl_root(ROOT).await.unwrap();

        assert_eq!(record.documents.len(), 2);
        let cv = &record.documents["http://site.example/files/cv.pdf"];
        assert_eq!(cv.kind, DocumentKind::Pdf);
        assert_eq!(cv.page_count, 2);
        assert_eq!(
            record.documents["http://site.example/files/data.csv"].kind,
            DocumentKind::Csv
        );
        assert_eq!(documents.calls.load(Ordering::SeqCst), 2);

        scraper.start_session();
        scraper.crawl_root(ROOT).await.unwrap();
        assert_eq!(documents.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_document_failure_is_isolated() {
        let dir = TempDir::new().unwrap();
        let documents = Arc::new(StubDocuments::failing());
        let mut scraper = WebScraper::with_fetcher(test_config(dir.path()), fetcher())
            .with_documents(documents);

        let record = scraper.crawl_root(ROOT).await.unwrap();

        assert!(record.documents.is_empty());
        let failed: Vec<_> = scraper
            .session()
            .audit
            .entries()
            .iter()
            .filter(|e| e.kind == AuditKind::Document && !e.success)
            .collect();
        assert_eq!(failed.len(), 2);
        assert_eq!(scraper.session().audit.summary().succeeded, 1);
    }
}
