use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use anisync_core::{
    load_config, load_config_from_env, validate_config, AniListClient, AnifyProvider, Config,
    CrawlConfig, CrawlOrchestrator, MediaCatalog, MediaType, ProviderAdapter,
    ReconciliationEngine, SqliteMediaCache,
};

/// Config file picked up from the working directory when `--config` is absent.
const DEFAULT_CONFIG_FILE: &str = "anisync.toml";

#[derive(Parser)]
#[command(name = "anisync")]
#[command(about = "Match AniList entries with content provider search results")]
#[command(version)]
struct Cli {
    /// Configuration file (TOML). Environment variables prefixed with
    /// ANISYNC_ override it.
    #[arg(long, short = 'c', env = "ANISYNC_CONFIG", global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Search the catalog and every provider, print the merged records
    Search {
        /// Free-text title query
        query: String,
    },

    /// Reconcile a single catalog ID (served from the cache when present)
    Get {
        /// AniList media ID
        id: u64,
    },

    /// Walk the catalog sitemap and reconcile every entry of the target format
    #[command(after_help = "\
Examples:
  anisync crawl --max-ids 20
  anisync crawl --type anime --stop-on-error")]
    Crawl {
        /// Abort on the first failed ID
        #[arg(long)]
        stop_on_error: bool,

        /// Visit at most this many IDs
        #[arg(long, value_name = "N")]
        max_ids: Option<usize>,

        /// Sitemap listing to walk (manga or anime)
        #[arg(long = "type", value_name = "TYPE")]
        media_type: Option<MediaType>,
    },

    /// Print trending, seasonal, popular and top-rated listings
    Seasonal {
        #[arg(long, default_value_t = 1)]
        page: u32,

        #[arg(long, default_value_t = 6)]
        per_page: u32,
    },

    /// Print every catalog ID listed in the sitemap
    Ids {
        /// Sitemap listing (manga or anime)
        #[arg(long = "type", value_name = "TYPE")]
        media_type: MediaType,
    },

    /// Print the effective configuration
    Config,
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("Fatal error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    // Logs go to stderr so stdout stays valid JSON
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let config = resolve_config(cli.config.as_deref())?;
    validate_config(&config).context("Configuration validation failed")?;

    let catalog = Arc::new(
        AniListClient::new(config.catalog.clone()).context("Failed to create AniList client")?,
    );

    match cli.command {
        Commands::Search { query } => {
            let engine = build_engine(&config, catalog)?;
            let results = engine.search(&query).await?;
            print_json(&results)
        }
        Commands::Get { id } => {
            let engine = build_engine(&config, catalog)?;
            let record = engine.get(id).await?;
            if record.is_none() {
                info!("No record found for ID {}", id);
            }
            print_json(&record)
        }
        Commands::Crawl {
            stop_on_error,
            max_ids,
            media_type,
        } => {
            let crawl_config = CrawlConfig {
                media_type: media_type.unwrap_or(config.crawl.media_type),
                stop_on_error: stop_on_error || config.crawl.stop_on_error,
                max_ids: max_ids.or(config.crawl.max_ids),
            };
            let engine = Arc::new(build_engine(&config, catalog)?);
            let results = CrawlOrchestrator::new(engine, crawl_config).run().await?;
            print_json(&results)
        }
        Commands::Seasonal { page, per_page } => {
            let seasonal = catalog.get_seasonal(page, per_page).await?;
            print_json(&seasonal)
        }
        Commands::Ids { media_type } => {
            let ids = catalog.media_ids(media_type).await?;
            info!("Sitemap listed {} {} IDs", ids.len(), media_type);
            print_json(&ids)
        }
        Commands::Config => print_json(&config),
    }
}

/// Load the config file named on the command line, else `anisync.toml` when
/// present, else environment variables and defaults alone.
fn resolve_config(path: Option<&Path>) -> Result<Config> {
    let default_path = Path::new(DEFAULT_CONFIG_FILE);
    let path = match path {
        Some(path) => Some(path),
        None if default_path.exists() => Some(default_path),
        None => None,
    };

    match path {
        Some(path) => {
            info!("Loading configuration from {:?}", path);
            load_config(path).with_context(|| format!("Failed to load config from {:?}", path))
        }
        None => load_config_from_env().context("Failed to load config from environment"),
    }
}

fn build_engine(config: &Config, catalog: Arc<AniListClient>) -> Result<ReconciliationEngine> {
    let mut providers: Vec<Arc<dyn ProviderAdapter>> = Vec::new();
    if config.providers.anify.enabled {
        let anify = AnifyProvider::new(config.providers.anify.clone())
            .context("Failed to create Anify provider")?;
        providers.push(Arc::new(anify));
    }
    if providers.is_empty() {
        info!("No providers enabled, searches will return no records");
    }

    let engine = ReconciliationEngine::new(config.engine.clone(), catalog, providers);
    info!("Providers: {:?}", engine.provider_names());

    if !config.cache.enabled {
        return Ok(engine);
    }

    let cache = SqliteMediaCache::new(&config.cache.path)
        .with_context(|| format!("Failed to open cache at {:?}", config.cache.path))?;
    info!("Cache: {:?}", config.cache.path);
    Ok(engine.with_cache(Arc::new(cache), config.cache.insert_results))
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    println!("{}", json);
    Ok(())
}
