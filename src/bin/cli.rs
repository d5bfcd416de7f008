//! lecture-sync CLI
//!
//! Long-running entry point. With no arguments it loads `config.toml` (or
//! built-in defaults) and syncs the lecture listing once per local midnight.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use lecture_sync::{
    error::Result,
    models::Config,
    pipeline::{self, SyncContext},
    services::{CalendarPublisher, CssPageParser, EventFetcher, GoogleCalendarPublisher, LogPublisher},
    storage::{EventStore, JsonFileStore},
    utils::http,
};

/// lecture-sync - Lecture listing to calendar publisher
#[derive(Parser, Debug)]
#[command(
    name = "lecture-sync",
    version,
    about = "Publishes newly listed public lectures to a calendar"
)]
struct Cli {
    /// Path to the configuration file
    #[arg(short, long, default_value = "config.toml")]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Sync now, then again at every local midnight (default)
    Run,

    /// Run a single sync pass and exit
    Once {
        /// Log new events instead of publishing them and leave the store untouched
        #[arg(long)]
        dry_run: bool,
    },

    /// Validate the configuration file
    Validate,

    /// Show the published event store
    Info,
}

/// Initialize logging based on verbosity flag.
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

/// Main entry point for the CLI application.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = Config::load_or_default(&cli.config).inspect_err(|e| {
        log::error!("Failed to load {}: {}", cli.config.display(), e);
    })?;

    match cli.command.unwrap_or(Command::Run) {
        Command::Run => {
            config.validate()?;
            log::info!("lecture-sync starting, watching {}", config.source.listing_url);
            run(&config, false, true).await?;
        }

        Command::Once { dry_run } => {
            config.validate()?;
            run(&config, dry_run, false).await?;
        }

        Command::Validate => {
            log::info!("Validating configuration...");

            if let Err(e) = config.validate() {
                log::error!("Config validation failed: {}", e);
                return Err(e);
            }
            log::info!("✓ Listing: {}", config.source.listing_url);
            log::info!("✓ Timezone: {}", config.source.reference_timezone);
            log::info!("✓ Store: {}", config.storage.store_path);
            log::info!("All validations passed!");
        }

        Command::Info => {
            let store = JsonFileStore::from_config(&config.storage);
            let published = store.load().await?;
            log::info!("Store: {}", store.location());
            log::info!("Published events: {}", published.len());
            for event in published.events() {
                log::info!("  - {}", event.summary);
            }
        }
    }

    Ok(())
}

/// Assemble the pipeline and run it once or forever.
async fn run(config: &Config, dry_run: bool, forever: bool) -> Result<()> {
    let client = http::create_client(&config.crawler)?;
    let fetcher = EventFetcher::with_client(client.clone(), config)?;
    let parser = CssPageParser::from_config(config)?;
    let store = JsonFileStore::from_config(&config.storage);
    let publisher: Box<dyn CalendarPublisher> = if dry_run {
        Box::new(LogPublisher)
    } else {
        Box::new(GoogleCalendarPublisher::from_env(client, &config.calendar)?)
    };

    let ctx = SyncContext {
        config,
        fetcher: &fetcher,
        parser: &parser,
        store: &store,
        publisher: publisher.as_ref(),
        persist: !dry_run,
    };

    if forever {
        pipeline::run_forever(&ctx).await
    } else {
        let outcome = pipeline::run_once(&ctx).await?;
        for event in &outcome.published {
            log::info!("New: {}", event.title);
        }
        Ok(())
    }
}
