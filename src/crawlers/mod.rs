pub mod crawler;
pub mod fetch;
pub mod session;
pub mod web;

#[cfg(test)]
mod tests;

pub use crawler::{DocumentExtractor, PageFetcher, Summarizer};
pub use fetch::{FetchedPage, HttpFetcher, fetch_page};
pub use session::{CancelHandle, CrawlSession, CrawlStats, VisitedSet};
pub use web::WebScraper;
