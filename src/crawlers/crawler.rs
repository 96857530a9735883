use crate::error::{LlmError, ScrapeError};
use crate::results::{DocumentKind, DocumentRecord};
use async_trait::async_trait;
use std::time::Duration;

/// Performs one bounded HTTP GET and returns the full body
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Fetch `url`, failing on any non-200 status or after `timeout`
    async fn fetch(&self, url: &str, timeout: Duration) -> Result<Vec<u8>, ScrapeError>;
}

/// Turns a linked PDF or office document into text
#[async_trait]
pub trait DocumentExtractor: Send + Sync {
    async fn extract(&self, url: &str, kind: DocumentKind) -> Result<DocumentRecord, ScrapeError>;
}

/// Condenses extracted page text into a short synopsis
#[async_trait]
pub trait Summarizer: Send + Sync {
    /// Cheap liveness probe
    async fn is_available(&self) -> bool;

    async fn summarize(&self, title: &str, text: &str) -> Result<String, LlmError>;
}
