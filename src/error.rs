use thiserror::Error;

/// Errors raised while fetching or crawling a single URL
#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("URL not allowed for scraping: {0}")]
    Disallowed(String),
    #[error("HTTP {0}")]
    HttpStatus(u16),
    #[error("request timed out after {0:?}")]
    Timeout(std::time::Duration),
    #[error("failed to fetch {url}: {message}")]
    Network { url: String, message: String },
    #[error("failed to build HTTP client: {0}")]
    Client(String),
    #[error("invalid URL: {0}")]
    InvalidUrl(String),
    #[error("crawl session cancelled")]
    Cancelled,
    #[error("document extraction failed: {0}")]
    Document(String),
}

impl ScrapeError {
    /// Policy rejections are never worth retrying in a later session
    pub fn is_policy_rejection(&self) -> bool {
        matches!(self, ScrapeError::Disallowed(_))
    }
}

/// Errors from the on-disk content cache
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("cache I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("cache snapshot is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("no cached content for {0}")]
    NotFound(String),
}

/// Errors from the local language model endpoint
#[derive(Debug, Error)]
pub enum LlmError {
    #[error("language model is not available at {0}")]
    Unavailable(String),
    #[error("language model request failed: {0}")]
    Request(String),
    #[error("language model request timed out after {0:?}")]
    Timeout(std::time::Duration),
    #[error("language model returned an empty response")]
    EmptyResponse,
}

/// Errors while loading configuration from a file
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config file: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors surfaced by the question-answering layer
#[derive(Debug, Error)]
pub enum AssistantError {
    #[error("failed to refresh website data: {0}")]
    Scrape(#[from] ScrapeError),
    #[error(transparent)]
    Llm(#[from] LlmError),
    #[error("no language model available")]
    LlmUnavailable,
    #[error("website has not been crawled yet")]
    NotCrawled,
}
