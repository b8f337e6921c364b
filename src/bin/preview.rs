//! Preview binary - fetches the editions once and prints the page sections
//! without starting the server
//!
//! Usage:
//!   cargo run --bin preview                         # Default language
//!   cargo run --bin preview -- --lang fr            # French sections
//!   cargo run --bin preview -- --lang en --query nhl
//!
//! Required environment variables:
//! - GOOGLE_SERVICE_ACCOUNT_JSON or GOOGLE_APPLICATION_CREDENTIALS
//! - SHEET_ID

use anyhow::{Context, Result};
use newsletter_viewer::config::Config;
use newsletter_viewer::i18n::Language;
use newsletter_viewer::render::{build_page, ArchiveSection, LatestSection};
use newsletter_viewer::repository::EditionRepository;
use newsletter_viewer::sheets::ClientProvider;
use tracing::info;

/// Value following `flag`, if any.
fn arg_value(args: &[String], flag: &str) -> Option<String> {
    args.iter()
        .position(|arg| arg == flag)
        .and_then(|index| args.get(index + 1))
        .cloned()
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    let _ = dotenvy::dotenv();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("newsletter_viewer=info".parse()?),
        )
        .init();

    // Parse CLI arguments
    let args: Vec<String> = std::env::args().collect();
    let query = arg_value(&args, "--query").unwrap_or_default();

    info!("Loading configuration...");
    let config = Config::from_env()?;
    let language = match arg_value(&args, "--lang") {
        Some(code) => Language::from_code(&code)?,
        None => config.default_language,
    };
    let sheet_id = config
        .sheet_id
        .clone()
        .context("SHEET_ID not set, nothing to preview")?;

    let provider = ClientProvider::new(config.credentials.clone(), &config.sheets_api_url)?;
    let repository = EditionRepository::new(provider, config.cache_ttl);
    let snapshot = repository.load_editions(&sheet_id).await?;

    let view = build_page(&snapshot.editions, language, &query);
    let strings = language.strings();

    println!("\n{}", "=".repeat(80));
    println!("{} ({})", strings.latest, language.code());
    println!("{}", "=".repeat(80));
    match &view.latest {
        LatestSection::Edition(edition) => {
            println!(
                "{}  [{}]",
                edition.title.as_deref().unwrap_or_default(),
                edition.date_label().unwrap_or_default()
            );
            println!();
            println!("{}", edition.content_md.as_deref().unwrap_or_default());
        }
        LatestSection::Empty { message } => println!("{}", message),
    }

    println!("\n{}", "=".repeat(80));
    println!("{}", strings.archive);
    println!("{}", "=".repeat(80));
    match &view.archive {
        ArchiveSection::Entries(entries) => {
            for edition in entries {
                println!(
                    "- {}  {}",
                    edition.date_label().unwrap_or_else(|| "----------".to_string()),
                    edition.title.as_deref().unwrap_or_default()
                );
            }
        }
        ArchiveSection::Empty { message } => println!("{}", message),
    }

    println!(
        "\n{}: {}",
        strings.last_sync,
        snapshot.fetched_at.format("%Y-%m-%d %H:%M:%S UTC")
    );

    Ok(())
}
