//! sanad CLI
//!
//! Command-line front end over the source router: every read goes remote
//! first (when enabled and reachable) and falls back to the bundled corpus.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use sanad::{
    error::Result,
    models::{Config, parse_composite_id},
    router::SourceRouter,
};

/// sanad - Hadith Content Access CLI
#[derive(Parser, Debug)]
#[command(name = "sanad", version, about = "Hadith collections, books and records")]
struct Cli {
    /// Path to a TOML configuration file
    #[arg(short, long, default_value = "sanad.toml")]
    config: PathBuf,

    /// Skip the remote source entirely and serve the bundled corpus
    #[arg(long)]
    offline: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List all collections
    Collections,

    /// List the books of a collection
    Books {
        /// Collection slug, e.g. "bukhari"
        collection: String,
    },

    /// List records of a collection, optionally scoped to one book
    Items {
        /// Collection slug
        collection: String,

        /// Book number within the collection
        #[arg(long)]
        book: Option<i64>,

        /// Page number (1-based)
        #[arg(long, default_value_t = 1)]
        page: usize,

        /// Records per page (default from config)
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Fetch one record by composite id ("bukhari-1-1") or by parts
    Get {
        /// Composite id, or the collection slug when book/number are given
        id: String,

        /// Book number (with a bare collection slug)
        book: Option<i64>,

        /// Record number within the book
        number: Option<i64>,
    },

    /// Search record text
    Search {
        /// Substring to look for
        query: String,

        /// Page number (1-based)
        #[arg(long, default_value_t = 1)]
        page: usize,

        /// Results per page (default from config)
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Draw one random record with its collection and book
    Random,

    /// Validate the configuration file
    Validate,
}

/// Initialize logging based on verbosity flag.
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Main entry point for the CLI application.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut config = Config::load_or_default(&cli.config);
    if cli.offline {
        config.remote.enabled = false;
    }

    if let Command::Validate = cli.command {
        log::info!("Validating configuration...");
        if let Err(e) = config.validate() {
            log::error!("Config validation failed: {}", e);
            return Err(e);
        }
        log::info!("All validations passed!");
        return Ok(());
    }

    let router = SourceRouter::from_config(&config).await?;

    match cli.command {
        Command::Collections => {
            print_json(&router.collections().await)?;
        }

        Command::Books { collection } => {
            print_json(&router.books(&collection).await)?;
        }

        Command::Items {
            collection,
            book,
            page,
            limit,
        } => {
            let page_size = limit.unwrap_or(config.listing.default_page_size);
            print_json(&router.items(&collection, book, page, page_size).await)?;
        }

        Command::Get { id, book, number } => {
            let (collection, book, number) = match (book, number) {
                (Some(book), Some(number)) => (id, book, number),
                _ => parse_composite_id(&id).ok_or_else(|| {
                    sanad::error::AppError::validation(format!(
                        "'{id}' is not a composite id (expected collection-book-number)"
                    ))
                })?,
            };
            match router.item(&collection, book, number).await {
                Some(item) => print_json(&item)?,
                None => {
                    log::error!("No record {collection}-{book}-{number}");
                    std::process::exit(1);
                }
            }
        }

        Command::Search { query, page, limit } => {
            let page_size = limit.unwrap_or(config.listing.default_page_size);
            print_json(&router.search(&query, page, page_size).await)?;
        }

        Command::Random => match router.random_pick().await {
            Some(pick) => {
                log::info!("{}", pick.item.reference());
                print_json(&pick)?;
            }
            None => {
                log::error!("No records available to draw from");
                std::process::exit(1);
            }
        },

        Command::Validate => unreachable!("handled before router construction"),
    }

    Ok(())
}
