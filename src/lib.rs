pub mod assistant;
pub mod audit;
pub mod cache;
pub mod config;
pub mod crawlers;
pub mod error;
pub mod filter;
pub mod llm;
pub mod parsers;
pub mod prompt;
pub mod results;
pub mod utils;

// Re-export commonly used types for convenience
pub use assistant::{Assistant, ChatMessage};
pub use audit::{AuditEntry, AuditKind, AuditLog, AuditSummary};
pub use cache::DiskCache;
pub use config::{AppConfig, LlmConfig, ScraperConfig};
pub use crawlers::{CrawlSession, WebScraper};
pub use error::{AssistantError, CacheError, LlmError, ScrapeError};
pub use llm::OllamaClient;
pub use results::{ContentType, LinkedPageRecord, PageRecord};
pub use utils::{content_hash, normalize_url};
