use clap::Parser;
use site_assistant::config::AppConfig;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "site-assistant")]
#[command(about = "Crawls a website and its linked profiles, then answers questions about it")]
#[command(version)]
pub struct Args {
    /// Website to crawl (falls back to WEBSITE_URL)
    pub url: Option<String>,

    /// Question to answer with the local language model
    #[arg(short, long)]
    pub question: Option<String>,

    /// JSON configuration file (otherwise read from the environment)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Maximum link depth to follow from the root page (1-10)
    #[arg(short, long)]
    pub depth: Option<usize>,

    /// Maximum linked pages fetched per session
    #[arg(long)]
    pub max_pages: Option<usize>,

    /// Ignore cached content and fetch everything again
    #[arg(long)]
    pub refresh: bool,

    /// Also follow same-site navigation links
    #[arg(long)]
    pub internal_links: bool,

    /// Directory for cached page snapshots
    #[arg(long)]
    pub cache_dir: Option<PathBuf>,
}

impl Args {
    /// Overlay command-line flags onto loaded configuration
    pub fn apply(&self, config: &mut AppConfig) {
        if let Some(url) = &self.url {
            config.website_url = Some(url.clone());
        }
        if let Some(depth) = self.depth {
            config.scraper.max_depth = depth;
        }
        if let Some(max_pages) = self.max_pages {
            config.scraper.max_pages_per_session = max_pages;
        }
        if self.refresh {
            config.scraper.refresh_content = true;
        }
        if self.internal_links {
            config.scraper.enable_internal_links = true;
        }
        if let Some(dir) = &self.cache_dir {
            config.scraper.cache_dir = dir.clone();
        }
    }
}
