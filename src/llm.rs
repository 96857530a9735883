use crate::config::LlmConfig;
use crate::crawlers::crawler::Summarizer;
use crate::error::LlmError;
use crate::utils::truncate_chars;
use async_trait::async_trait;
use ollama_rs::Ollama;
use ollama_rs::generation::completion::request::GenerationRequest;
use url::Url;

const DEFAULT_OLLAMA_PORT: u16 = 11434;

/// Client for a local Ollama endpoint
pub struct OllamaClient {
    ollama: Ollama,
    config: LlmConfig,
}

impl OllamaClient {
    pub fn new(config: LlmConfig) -> Result<Self, LlmError> {
        let (host, port) = split_base_url(&config.base_url)?;
        ::log::debug!("Using Ollama at {}:{} with model {}", host, port, config.model);

        Ok(Self {
            ollama: Ollama::new(host, port),
            config,
        })
    }

    pub fn model(&self) -> &str {
        &self.config.model
    }

    /// Whether the endpoint answers a model listing within the probe timeout
    pub async fn is_available(&self) -> bool {
        match tokio::time::timeout(self.config.probe_timeout(), self.ollama.list_local_models())
            .await
        {
            Ok(Ok(_)) => true,
            Ok(Err(e)) => {
                ::log::warn!("Ollama not available at {}: {}", self.config.base_url, e);
                false
            }
            Err(_) => {
                ::log::warn!(
                    "Ollama probe at {} timed out after {:?}",
                    self.config.base_url,
                    self.config.probe_timeout()
                );
                false
            }
        }
    }

    /// Runs one completion with the configured model
    pub async fn complete(&self, prompt: &str) -> Result<String, LlmError> {
        let request = GenerationRequest::new(self.config.model.clone(), prompt.to_string());
        ::log::debug!(
            "Sending {} chars to {}",
            prompt.chars().count(),
            self.config.model
        );

        let response = tokio::time::timeout(self.config.request_timeout(), self.ollama.generate(request))
            .await
            .map_err(|_| LlmError::Timeout(self.config.request_timeout()))?
            .map_err(|e| LlmError::Request(e.to_string()))?;

        let text = response.response.trim().to_string();
        if text.is_empty() {
            return Err(LlmError::EmptyResponse);
        }
        Ok(text)
    }

    /// Condenses page text into a short synopsis
    pub async fn summarize(&self, title: &str, text: &str) -> Result<String, LlmError> {
        let prompt = summary_prompt(
            title,
            &truncate_chars(text, self.config.summary_input_limit),
            self.config.summary_target_length,
        );
        self.complete(&prompt).await
    }
}

#[async_trait]
impl Summarizer for OllamaClient {
    async fn is_available(&self) -> bool {
        OllamaClient::is_available(self).await
    }

    async fn summarize(&self, title: &str, text: &str) -> Result<String, LlmError> {
        OllamaClient::summarize(self, title, text).await
    }
}

/// Instruction template for page summaries
pub fn summary_prompt(title: &str, text: &str, target_length: usize) -> String {
    format!(
        "Summarize the following web page content in at most {} characters.\n\
         Keep names, job titles, companies, project names, technologies, dates and numbers exactly as written.\n\
         Do not add information that is not in the text.\n\n\
         Title: {}\n\n\
         Content:\n{}\n\n\
         Summary:",
        target_length, title, text
    )
}

/// Splits `http://host:port` into the `(scheme://host, port)` pair Ollama expects
fn split_base_url(base_url: &str) -> Result<(String, u16), LlmError> {
    let url = Url::parse(base_url).map_err(|_| LlmError::Unavailable(base_url.to_string()))?;
    let host = url
        .host_str()
        .ok_or_else(|| LlmError::Unavailable(base_url.to_string()))?;
    let port = url.port().unwrap_or(DEFAULT_OLLAMA_PORT);
    Ok((format!("{}://{}", url.scheme(), host), port))
}
