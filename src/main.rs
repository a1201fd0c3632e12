//! kaistmenu - Show the KAIST cafeteria menu in the terminal
//!
//! Serves the day's menu from the local cache when it was already fetched
//! today, and from the campus website otherwise.

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use kaistmenu::cli::{Cli, DateChoice, RunOptions};
use kaistmenu::config::AppConfig;
use kaistmenu::date::local_now;
use kaistmenu::menu::render_menu_text;
use kaistmenu::{FileCacheStore, KaistFetcher, MenuResolver};

/// Fallback cache file when no home directory is available
const FALLBACK_CACHE_FILE: &str = "kaistmenu_cache.json";

/// Sets up logging to stderr; `RUST_LOG` wins over the verbosity flag.
fn init_tracing(verbose: u8) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(RunOptions::log_level(verbose)));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Chooses the cache file: configured path, XDG cache dir, or the temp dir.
fn cache_store(config: &AppConfig) -> FileCacheStore {
    if let Some(path) = &config.cache_path {
        return FileCacheStore::with_path(path.clone());
    }
    FileCacheStore::new().unwrap_or_else(|| {
        let path = std::env::temp_dir().join(FALLBACK_CACHE_FILE);
        tracing::warn!(path = %path.display(), "no cache directory available, using temp dir");
        FileCacheStore::with_path(path)
    })
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = match AppConfig::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", e);
            return Ok(ExitCode::from(2));
        }
    };

    let opts = match RunOptions::from_cli(&cli, config, local_now()) {
        Ok(opts) => opts,
        Err(e) => {
            eprintln!("{}", e);
            return Ok(ExitCode::from(2));
        }
    };

    let store = cache_store(&opts.config);
    tracing::debug!(path = %store.path().display(), "using menu cache");
    let fetcher = KaistFetcher::new(opts.config.timeout())?;
    let resolver = MenuResolver::new(store, fetcher);

    let result = match opts.date {
        DateChoice::Today(today) => resolver.resolve(opts.cafeteria, opts.refresh, today).await,
        DateChoice::Explicit(date) => resolver.fetch_uncached(opts.cafeteria, date).await,
    };

    let status = match result {
        Ok(text) => {
            print!("{}", render_menu_text(&text, opts.date.date(), opts.config.max_length));
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Failed to fetch menu for {}: {}", opts.cafeteria, e);
            ExitCode::FAILURE
        }
    };

    if opts.save_rc {
        match AppConfig::config_path() {
            Some(path) => match opts.config.save_rc(&path) {
                Ok(()) => tracing::info!(path = %path.display(), "saved defaults"),
                Err(e) => eprintln!("{}", e),
            },
            None => eprintln!("No config directory available, defaults not saved"),
        }
    }

    Ok(status)
}
