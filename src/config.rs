use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

const MIN_DEPTH: usize = 1;
const MAX_DEPTH: usize = 10;

/// Configuration for the recursive web scraper
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScraperConfig {
    /// Lower-cased substrings a URL must contain (empty allows everything)
    #[serde(default)]
    pub allowed_url_patterns: Vec<String>,

    /// Follow same-site navigation links in addition to professional profiles
    #[serde(default)]
    pub enable_internal_links: bool,

    /// Bypass both cache layers for the root URL
    #[serde(default)]
    pub refresh_content: bool,

    /// Platform section fragments at or below this length are ignored
    #[serde(default = "default_min_text_length")]
    pub min_text_length: usize,

    /// Extracted text is cut to this many characters when not summarized
    #[serde(default = "default_max_content_length")]
    pub max_content_length: usize,

    /// Maximum link hops from the root page
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,

    /// Linked-page fetches allowed per session
    #[serde(default = "default_max_pages_per_session")]
    pub max_pages_per_session: usize,

    /// Disk cache freshness, in hours
    #[serde(default = "default_cache_duration_hours")]
    pub cache_duration_hours: u64,

    /// Root directory of the disk cache
    #[serde(default = "default_cache_dir")]
    pub cache_dir: PathBuf,

    /// Adopt an existing record when fetched bytes hash to known content
    #[serde(default = "default_true")]
    pub reuse_content_by_hash: bool,

    /// Compute a 0-10 relevance score for linked pages
    #[serde(default)]
    pub score_relevance: bool,

    /// Upper bound on the context text handed to the language model
    #[serde(default = "default_max_context_length")]
    pub max_context_length: usize,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    #[serde(default = "default_root_timeout_secs")]
    pub root_timeout_secs: u64,

    #[serde(default = "default_linked_timeout_secs")]
    pub linked_timeout_secs: u64,

    /// Timeout for linked pages at depth 2 and beyond
    #[serde(default = "default_peripheral_timeout_secs")]
    pub peripheral_timeout_secs: u64,
}

/// Configuration for the local language model endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    #[serde(default = "default_ollama_url")]
    pub base_url: String,

    #[serde(default = "default_ollama_model")]
    pub model: String,

    #[serde(default = "default_llm_timeout_secs")]
    pub request_timeout_secs: u64,

    #[serde(default = "default_probe_timeout_secs")]
    pub probe_timeout_secs: u64,

    /// Characters of page text sent to the summarizer
    #[serde(default = "default_summary_input_limit")]
    pub summary_input_limit: usize,

    /// Target length of a summary, in characters
    #[serde(default = "default_summary_target_length")]
    pub summary_target_length: usize,
}

/// Top-level configuration file layout
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Site the assistant answers questions about
    #[serde(default)]
    pub website_url: Option<String>,

    #[serde(default)]
    pub scraper: ScraperConfig,

    #[serde(default)]
    pub llm: LlmConfig,
}

fn default_min_text_length() -> usize {
    10
}

fn default_max_content_length() -> usize {
    10_000
}

fn default_max_depth() -> usize {
    2
}

fn default_max_pages_per_session() -> usize {
    100
}

fn default_cache_duration_hours() -> u64 {
    24
}

fn default_cache_dir() -> PathBuf {
    PathBuf::from("scraped_content")
}

fn default_true() -> bool {
    true
}

fn default_max_context_length() -> usize {
    60_000
}

fn default_user_agent() -> String {
    "Mozilla/5.0 (compatible; WebSiteAssistantBot/1.0)".to_string()
}

fn default_root_timeout_secs() -> u64 {
    30
}

fn default_linked_timeout_secs() -> u64 {
    15
}

fn default_peripheral_timeout_secs() -> u64 {
    10
}

fn default_ollama_url() -> String {
    "http://localhost:11434".to_string()
}

fn default_ollama_model() -> String {
    "codellama:13b".to_string()
}

fn default_llm_timeout_secs() -> u64 {
    60
}

fn default_probe_timeout_secs() -> u64 {
    5
}

fn default_summary_input_limit() -> usize {
    8_000
}

fn default_summary_target_length() -> usize {
    1_000
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            allowed_url_patterns: Vec::new(),
            enable_internal_links: false,
            refresh_content: false,
            min_text_length: default_min_text_length(),
            max_content_length: default_max_content_length(),
            max_depth: default_max_depth(),
            max_pages_per_session: default_max_pages_per_session(),
            cache_duration_hours: default_cache_duration_hours(),
            cache_dir: default_cache_dir(),
            reuse_content_by_hash: true,
            score_relevance: false,
            max_context_length: default_max_context_length(),
            user_agent: default_user_agent(),
            root_timeout_secs: default_root_timeout_secs(),
            linked_timeout_secs: default_linked_timeout_secs(),
            peripheral_timeout_secs: default_peripheral_timeout_secs(),
        }
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: default_ollama_url(),
            model: default_ollama_model(),
            request_timeout_secs: default_llm_timeout_secs(),
            probe_timeout_secs: default_probe_timeout_secs(),
            summary_input_limit: default_summary_input_limit(),
            summary_target_length: default_summary_target_length(),
        }
    }
}

impl ScraperConfig {
    /// Read settings from the process environment
    pub fn from_env() -> Self {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Read settings through an arbitrary variable lookup; unset or invalid
    /// values keep their defaults
    pub fn from_vars(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(patterns) = lookup("ALLOWED_SCRAPING_URL_PATTERNS") {
            config.allowed_url_patterns = parse_patterns(&patterns);
        }
        config.enable_internal_links = parse_flag(lookup("ENABLE_INTERNAL_LINK_SCRAPING"));
        config.refresh_content = parse_flag(lookup("REFRESH_CONTENT"));

        if let Some(value) = parse_positive::<usize>(lookup("MIN_TEXT_LENGTH")) {
            config.min_text_length = value;
        }
        if let Some(value) = parse_positive::<usize>(lookup("MAX_CONTENT_LENGTH")) {
            config.max_content_length = value;
        }
        if let Some(value) = parse_positive::<usize>(lookup("MAX_SCRAPING_DEPTH")) {
            config.max_depth = value;
        }
        if let Some(value) = parse_positive::<usize>(lookup("MAX_PAGES_PER_SESSION")) {
            config.max_pages_per_session = value;
        }
        if let Some(value) = parse_positive::<u64>(lookup("CACHE_DURATION_HOURS")) {
            config.cache_duration_hours = value;
        }
        if let Some(dir) = lookup("SCRAPED_CONTENT_DIR").filter(|d| !d.trim().is_empty()) {
            config.cache_dir = PathBuf::from(dir.trim());
        }
        if let Some(value) = lookup("REUSE_CONTENT_BY_HASH") {
            config.reuse_content_by_hash = !value.trim().eq_ignore_ascii_case("false");
        }
        config.score_relevance = parse_flag(lookup("SCORE_RELEVANCE"));
        if let Some(value) = parse_positive::<usize>(lookup("MAX_CONTEXT_LENGTH")) {
            config.max_context_length = value;
        }

        config.normalized()
    }

    /// Clamp values into their valid ranges
    pub fn normalized(mut self) -> Self {
        self.max_depth = self.max_depth.clamp(MIN_DEPTH, MAX_DEPTH);
        if self.min_text_length == 0 {
            self.min_text_length = default_min_text_length();
        }
        if self.max_content_length <= self.min_text_length {
            ::log::warn!(
                "max_content_length {} must exceed min_text_length {}, using default",
                self.max_content_length,
                self.min_text_length
            );
            self.max_content_length = default_max_content_length().max(self.min_text_length + 1);
        }
        if self.max_pages_per_session == 0 {
            self.max_pages_per_session = default_max_pages_per_session();
        }
        if self.cache_duration_hours == 0 {
            self.cache_duration_hours = default_cache_duration_hours();
        }
        self.allowed_url_patterns = self
            .allowed_url_patterns
            .iter()
            .map(|p| p.trim().to_lowercase())
            .filter(|p| !p.is_empty())
            .collect();
        self
    }

    pub fn cache_duration(&self) -> Duration {
        Duration::from_secs(self.cache_duration_hours * 3600)
    }

    /// min(1h, cache duration / 24), never below 15 minutes
    pub fn memory_cache_duration(&self) -> Duration {
        let hour = Duration::from_secs(3600);
        let floor = Duration::from_secs(15 * 60);
        (self.cache_duration() / 24).min(hour).max(floor)
    }

    pub fn root_timeout(&self) -> Duration {
        Duration::from_secs(self.root_timeout_secs)
    }

    pub fn linked_timeout(&self) -> Duration {
        Duration::from_secs(self.linked_timeout_secs)
    }

    pub fn peripheral_timeout(&self) -> Duration {
        Duration::from_secs(self.peripheral_timeout_secs)
    }
}

impl LlmConfig {
    pub fn from_env() -> Self {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    pub fn from_vars(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        if let Some(url) = lookup("OLLAMA_URL").filter(|u| !u.trim().is_empty()) {
            config.base_url = url.trim().trim_end_matches('/').to_string();
        }
        if let Some(model) = lookup("OLLAMA_MODEL").filter(|m| !m.trim().is_empty()) {
            config.model = model.trim().to_string();
        }
        config
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn probe_timeout(&self) -> Duration {
        Duration::from_secs(self.probe_timeout_secs)
    }
}

impl AppConfig {
    /// Build the whole configuration from environment variables
    pub fn from_env() -> Self {
        Self {
            website_url: std::env::var("WEBSITE_URL")
                .ok()
                .filter(|u| !u.trim().is_empty()),
            scraper: ScraperConfig::from_env(),
            llm: LlmConfig::from_env(),
        }
    }

    /// Load configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let mut file = File::open(path)?;
        let mut contents = String::new();
        file.read_to_string(&mut contents)?;
        Self::from_json(&contents)
    }

    /// Load configuration from a JSON string
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let mut config: Self = serde_json::from_str(json)?;
        config.scraper = config.scraper.normalized();
        Ok(config)
    }
}

fn parse_patterns(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|p| p.trim().to_lowercase())
        .filter(|p| !p.is_empty())
        .collect()
}

fn parse_flag(value: Option<String>) -> bool {
    value
        .map(|v| v.trim().eq_ignore_ascii_case("true"))
        .unwrap_or(false)
}

fn parse_positive<T>(value: Option<String>) -> Option<T>
where
    T: FromStr + PartialOrd + Default,
{
    value
        .and_then(|v| v.trim().parse::<T>().ok())
        .filter(|v| *v > T::default())
}
