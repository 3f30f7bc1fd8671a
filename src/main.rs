use anyhow::Result;
use clap::{Parser, Subcommand};
use futures::StreamExt;
use mangahindisub::{
    CatalogCard, ChapterEntry, ConnectorConfig, LastChapter, MangaClient, MangaHindiSubClient,
};
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "mangahindisub")]
#[command(about = "Query the MangaHindiSub catalog and resolve its shortened links")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path (site defaults are used when it is missing)
    #[arg(short, long, default_value = "mangahindisub.toml")]
    config: String,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Search the catalog
    Search {
        query: String,
        #[arg(short, long, default_value = "1")]
        page: usize,
    },
    /// List one page of a title's chapters
    Chapters {
        /// Title page URL
        url: String,
        #[arg(short, long, default_value = "1")]
        page: usize,
        #[arg(short, long, default_value = "")]
        name: String,
    },
    /// Print every chapter of a title as it is resolved
    Stream {
        url: String,
        #[arg(short, long, default_value = "")]
        name: String,
    },
    /// Resolve the page images of a chapter
    Pages {
        /// Chapter URL
        url: String,
    },
    /// Compare a JSON snapshot (list of {url, chapter_url}) with the updates page
    Updates {
        snapshot: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose)?;

    let config = if Path::new(&cli.config).exists() {
        ConnectorConfig::load(&cli.config)?
    } else {
        warn!("Config file '{}' not found, using site defaults", cli.config);
        ConnectorConfig::default()
    };

    let client = MangaHindiSubClient::new(config)?;

    match cli.command {
        Commands::Search { query, page } => {
            let cards = client.search(&query, page).await?;
            println!("{:<40} {:<60}", "Title", "URL");
            println!("{}", "-".repeat(100));
            for card in cards {
                println!("{:<40} {:<60}", card.title, card.source_url);
            }
        }
        Commands::Chapters { url, page, name } => {
            let card = CatalogCard {
                title: name,
                source_url: url,
                thumbnail_url: None,
            };
            let chapters = client.list_chapters(&card, page).await?;
            println!("{:<10} {:<30} {:<60}", "Number", "Chapter", "URL");
            println!("{}", "-".repeat(100));
            for chapter in chapters {
                let number = chapter
                    .number()
                    .map(|n| n.to_string())
                    .unwrap_or_else(|| "-".to_string());
                println!("{:<10} {:<30} {:<60}", number, chapter.label, chapter.url);
            }
        }
        Commands::Stream { url, name } => {
            let mut chapters = client.stream_chapters(&url, &name);
            while let Some(chapter) = chapters.next().await {
                let chapter = chapter?;
                println!("{}\t{}", chapter.label, chapter.url);
            }
        }
        Commands::Pages { url } => {
            let card = CatalogCard {
                title: String::new(),
                source_url: url.clone(),
                thumbnail_url: None,
            };
            let mut chapter = ChapterEntry::new(String::new(), url, Arc::new(card));
            client.load_pages(&mut chapter).await?;
            for (index, page) in chapter.page_urls.iter().enumerate() {
                println!("{:>3} {}", index + 1, page);
            }
        }
        Commands::Updates { snapshot } => {
            let content = std::fs::read_to_string(&snapshot)?;
            let known: Vec<LastChapter> = serde_json::from_str(&content)?;
            info!("Checking {} known titles for updates...", known.len());

            let report = client.check_updates(&known).await?;
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }

    Ok(())
}

fn init_logging(verbose: bool) -> Result<()> {
    let level = if verbose { "debug" } else { "info" };

    tracing_subscriber::fmt()
        .with_env_filter(format!("mangahindisub={}", level))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    Ok(())
}
