use crate::config::AppConfig;
use crate::crawlers::WebScraper;
use crate::error::AssistantError;
use crate::llm::OllamaClient;
use crate::prompt::build_prompt;
use crate::results::PageRecord;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Crawled data younger than this is answered from without recrawling
const DATA_REUSE_WINDOW_MINUTES: i64 = 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

impl ChatMessage {
    fn new(role: Role, content: &str) -> Self {
        Self {
            role,
            content: content.to_string(),
            timestamp: Utc::now(),
        }
    }
}

/// Answers questions about one website from its crawled content
pub struct Assistant {
    website_url: String,
    scraper: WebScraper,
    llm: Option<Arc<OllamaClient>>,
    data: Option<PageRecord>,
    refreshed_at: Option<DateTime<Utc>>,
    history: Vec<ChatMessage>,
}

impl Assistant {
    /// Build the scraper and model client from configuration
    ///
    /// The model client doubles as the scraper's summarizer. An unusable
    /// model URL leaves the assistant without a model instead of failing.
    pub fn from_config(website_url: &str, config: &AppConfig) -> Result<Self, AssistantError> {
        let llm = match OllamaClient::new(config.llm.clone()) {
            Ok(client) => Some(Arc::new(client)),
            Err(e) => {
                ::log::warn!("Language model disabled: {}", e);
                None
            }
        };

        let mut scraper = WebScraper::new(config.scraper.clone())?;
        if let Some(client) = &llm {
            scraper = scraper.with_summarizer(client.clone());
        }

        Ok(Self::new(website_url, scraper, llm))
    }

    pub fn new(website_url: &str, scraper: WebScraper, llm: Option<Arc<OllamaClient>>) -> Self {
        Self {
            website_url: website_url.to_string(),
            scraper,
            llm,
            data: None,
            refreshed_at: None,
            history: Vec::new(),
        }
    }

    pub fn website_url(&self) -> &str {
        &self.website_url
    }

    pub fn scraper(&self) -> &WebScraper {
        &self.scraper
    }

    pub fn data(&self) -> Option<&PageRecord> {
        self.data.as_ref()
    }

    pub fn history(&self) -> &[ChatMessage] {
        &self.history
    }

    fn needs_refresh(&self) -> bool {
        match (&self.data, self.refreshed_at) {
            (Some(_), Some(at)) => {
                Utc::now().signed_duration_since(at)
                    >= chrono::Duration::minutes(DATA_REUSE_WINDOW_MINUTES)
            }
            _ => true,
        }
    }

    /// Runs a new crawl session unless recent data is already loaded
    ///
    /// A root URL failure is returned; the previous data, if any, is kept.
    pub async fn refresh(&mut self) -> Result<&PageRecord, AssistantError> {
        if self.needs_refresh() {
            ::log::info!("Refreshing website data for {}", self.website_url);
            self.scraper.start_session();

            let result = self.scraper.crawl_root(&self.website_url).await;
            let session = self.scraper.session();
            ::log::info!("Scrape audit: {}", session.audit.summary());
            ::log::debug!(
                "Session stats: {} fetches, {} extractions, {} reused, {} cache hits",
                session.stats.fetches,
                session.stats.extractions,
                session.stats.reused,
                session.stats.cache_hits
            );

            let record = result?;
            self.data = Some(record);
            self.refreshed_at = Some(Utc::now());
        }

        self.data.as_ref().ok_or(AssistantError::NotCrawled)
    }

    /// Refreshes the data if needed, then answers `question` with the model
    ///
    /// Without a reachable model this returns `AssistantError::LlmUnavailable`
    /// after refreshing, so callers can fall back to their own reply.
    pub async fn ask(&mut self, question: &str) -> Result<String, AssistantError> {
        self.history.push(ChatMessage::new(Role::User, question));
        let max_context_length = self.scraper.config().max_context_length;

        let prompt = {
            let record = self.refresh().await?;
            build_prompt(record, question, max_context_length)
        };

        let llm = self.llm.as_ref().ok_or(AssistantError::LlmUnavailable)?;
        if !llm.is_available().await {
            return Err(AssistantError::LlmUnavailable);
        }

        ::log::info!(
            "Asking {} ({} prompt chars)",
            llm.model(),
            prompt.chars().count()
        );
        let answer = llm.complete(&prompt).await?;
        self.history.push(ChatMessage::new(Role::Assistant, &answer));
        Ok(answer)
    }
}
