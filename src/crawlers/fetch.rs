use crate::crawlers::crawler::PageFetcher;
use crate::error::ScrapeError;
use crate::parsers::html::{self, ParsedPage, Platform};
use crate::utils::content_hash;
use async_trait::async_trait;
use reqwest::redirect::Policy;
use reqwest::{Client, StatusCode};
use std::time::Duration;

const MAX_REDIRECTS: usize = 10;

/// `PageFetcher` backed by a shared reqwest client
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(user_agent: &str) -> Result<Self, ScrapeError> {
        let client = Client::builder()
            .user_agent(user_agent)
            .gzip(true)
            .redirect(Policy::limited(MAX_REDIRECTS))
            .build()
            .map_err(|e| ScrapeError::Client(e.to_string()))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &str, timeout: Duration) -> Result<Vec<u8>, ScrapeError> {
        let response = self
            .client
            .get(url)
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| request_error(url, timeout, e))?;

        let status = response.status();
        if status != StatusCode::OK {
            ::log::debug!("{} returned {}", url, status);
            return Err(ScrapeError::HttpStatus(status.as_u16()));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| request_error(url, timeout, e))?;
        Ok(body.to_vec())
    }
}

fn request_error(url: &str, timeout: Duration, error: reqwest::Error) -> ScrapeError {
    if error.is_timeout() {
        ScrapeError::Timeout(timeout)
    } else if error.is_builder() {
        ScrapeError::InvalidUrl(url.to_string())
    } else {
        ScrapeError::Network {
            url: url.to_string(),
            message: error.to_string(),
        }
    }
}

/// A fetched page: digest of the raw bytes plus the parsed document
#[derive(Debug, Clone)]
pub struct FetchedPage {
    pub url: String,
    pub content_hash: String,
    pub page: ParsedPage,
}

/// Fetches `url` in full, hashes the raw body, then parses it
pub async fn fetch_page(
    fetcher: &dyn PageFetcher,
    url: &str,
    timeout: Duration,
    platform: Option<Platform>,
) -> Result<FetchedPage, ScrapeError> {
    let body = fetcher.fetch(url, timeout).await?;
    let content_hash = content_hash(&body);
    let page = html::parse_with_platform(&String::from_utf8_lossy(&body), platform);

    Ok(FetchedPage {
        url: url.to_string(),
        content_hash,
        page,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const USER_AGENT: &str = "Mozilla/5.0 (compatible; WebSiteAssistantBot/1.0)";

    #[tokio::test]
    async fn test_fetch_page_parses_and_hashes() {
        let mut server = mockito::Server::new_async().await;
        let body = "<html><head><title> Hello </title></head><body><p>World</p></body></html>";
        let mock = server
            .mock("GET", "/")
            .match_header("user-agent", USER_AGENT)
            .with_status(200)
            .with_header("content-type", "text/html")
            .with_body(body)
            .create_async()
            .await;

        let fetcher = HttpFetcher::new(USER_AGENT).unwrap();
        let url = format!("{}/", server.url());
        let fetched = fetch_page(&fetcher, &url, Duration::from_secs(5), None)
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(fetched.page.title, "Hello");
        assert_eq!(fetched.page.text_lines, vec!["World"]);
        assert_eq!(fetched.content_hash, content_hash(body.as_bytes()));
    }

    #[tokio::test]
    async fn test_non_200_is_an_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/missing")
            .with_status(404)
            .create_async()
            .await;

        let fetcher = HttpFetcher::new(USER_AGENT).unwrap();
        let result = fetcher
            .fetch(&format!("{}/missing", server.url()), Duration::from_secs(5))
            .await;
        assert!(matches!(result, Err(ScrapeError::HttpStatus(404))));
    }

    #[tokio::test]
    async fn test_connection_failure_is_reported() {
        let fetcher = HttpFetcher::new(USER_AGENT).unwrap();
        let result = fetcher
            .fetch("http://127.0.0.1:1/", Duration::from_secs(2))
            .await;
        assert!(matches!(
            result,
            Err(ScrapeError::Network { .. }) | Err(ScrapeError::Timeout(_))
        ));
    }
}
