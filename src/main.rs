use clap::Parser;
use site_assistant::config::AppConfig;
use site_assistant::{Assistant, AssistantError, PageRecord};

mod args;
use args::Args;

#[tokio::main]
async fn main() {
    // Initialize logging
    env_logger::init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => match AppConfig::from_file(path) {
            Ok(config) => config,
            Err(e) => {
                ::log::error!("Failed to load {}: {}", path.display(), e);
                std::process::exit(2);
            }
        },
        None => AppConfig::from_env(),
    };
    args.apply(&mut config);
    config.scraper = config.scraper.normalized();

    let website_url = config
        .website_url
        .clone()
        .or_else(|| std::env::var("WEBSITE_URL").ok());
    let Some(url) = website_url.filter(|u| !u.trim().is_empty()) else {
        eprintln!("No website given: pass a URL or set WEBSITE_URL");
        std::process::exit(2);
    };

    ::log::info!("Starting site assistant for: {}", url);
    let start_time = std::time::Instant::now();

    let mut assistant = match Assistant::from_config(&url, &config) {
        Ok(assistant) => assistant,
        Err(e) => {
            ::log::error!("Failed to set up: {}", e);
            std::process::exit(1);
        }
    };

    let outcome = match &args.question {
        Some(question) => assistant.ask(question).await.map(Some),
        None => assistant.refresh().await.map(|_| None),
    };

    println!("{}", assistant.scraper().session().audit.summary());

    match outcome {
        Ok(Some(answer)) => println!("\n{}", answer),
        Ok(None) => {
            if let Some(record) = assistant.data() {
                print_overview(record);
            }
        }
        Err(AssistantError::LlmUnavailable) => {
            eprintln!("The language model is not reachable; showing the crawled data instead.");
            if let Some(record) = assistant.data() {
                print_overview(record);
            }
        }
        Err(e) => {
            ::log::error!("{}", e);
            std::process::exit(1);
        }
    }

    ::log::info!(
        "Done in {:.2} seconds",
        start_time.elapsed().as_secs_f64()
    );
}

fn print_overview(record: &PageRecord) {
    println!("\n{} ({})", record.title, record.url);
    if !record.description.is_empty() {
        println!("{}", record.description);
    }
    println!(
        "{} chars of text, {} links, {} documents",
        record.text.chars().count(),
        record.links.len(),
        record.documents.len()
    );
    for page in record.linked_pages.values() {
        println!("  [{}] {} - {}", page.content_type, page.url, page.title);
    }
}
