//! medcache - medical reference information that works offline.
//!
//! Lists the bundled medical categories, shows their content and saves or
//! removes local copies so they stay readable without a connection.

use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Result;
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use medcache_core::utils::{format_date, truncate_string};
use medcache_core::{
    Config, FsStorage, MedicalRecord, OfflineCache, OfflineError, SavedRecord,
};

// ============================================================================
// Constants
// ============================================================================

/// Overrides the configured data directory
const ENV_DATA_DIR: &str = "MEDCACHE_DATA_DIR";

/// Overrides the configured catalog file
const ENV_CATALOG: &str = "MEDCACHE_CATALOG";

/// Width of the title column in `list`
const TITLE_WIDTH: usize = 32;

const USAGE: &str = "\
Usage: medcache <command>

Commands:
  list            List medical categories and their offline status
  show <id>       Show a category (from the offline copy when saved)
  save <id>       Save a category for offline use
  remove <id>     Remove the offline copy of a category
  saved           List categories available offline
  config          Print the resolved configuration
  config init     Write the resolved configuration to the config file";

/// Initialize the tracing subscriber for logging
fn init_tracing() {
    // Use RUST_LOG env var to control log level (e.g., RUST_LOG=debug)
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();
}

enum Command {
    List,
    Show(String),
    Save(String),
    Remove(String),
    Saved,
    Config,
    InitConfig,
}

/// Parse `args` (including the program name). Wrong arity is rejected.
fn parse_args(args: &[String]) -> Option<Command> {
    let rest: Vec<&str> = args.iter().skip(1).map(String::as_str).collect();
    match rest.as_slice() {
        ["list"] => Some(Command::List),
        ["show", id] => Some(Command::Show(id.to_string())),
        ["save", id] => Some(Command::Save(id.to_string())),
        ["remove", id] => Some(Command::Remove(id.to_string())),
        ["saved"] => Some(Command::Saved),
        ["config"] => Some(Command::Config),
        ["config", "init"] => Some(Command::InitConfig),
        _ => None,
    }
}

fn load_config() -> Config {
    let mut config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            warn!(error = %e, "Failed to load config, using defaults");
            Config::default()
        }
    };
    if let Ok(dir) = std::env::var(ENV_DATA_DIR) {
        config.data_dir = Some(PathBuf::from(dir));
    }
    if let Ok(path) = std::env::var(ENV_CATALOG) {
        config.catalog_path = Some(PathBuf::from(path));
    }
    config
}

fn main() -> ExitCode {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    init_tracing();

    let args: Vec<String> = std::env::args().collect();
    let Some(command) = parse_args(&args) else {
        eprintln!("{}", USAGE);
        return ExitCode::from(2);
    };

    match run(command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn open_cache(config: &Config) -> Result<OfflineCache<FsStorage>> {
    let catalog = Arc::new(config.catalog()?);
    let storage_dir = config.storage_dir()?;
    let mut cache = OfflineCache::new(catalog, FsStorage::new(&storage_dir));

    if let Err(e) = cache.initialize() {
        // Keep going online-only
        println!("Notice: {}", e.user_message());
    }
    info!(dir = %storage_dir.display(), saved = cache.index().len(), "Offline cache ready");
    Ok(cache)
}

fn run(command: Command) -> Result<()> {
    let config = load_config();

    match command {
        Command::Config => {
            println!("config file:  {}", Config::config_path()?.display());
            println!("storage dir:  {}", config.storage_dir()?.display());
            match config.catalog_path {
                Some(ref path) => println!("catalog:      {}", path.display()),
                None => println!("catalog:      (bundled)"),
            }
        }
        Command::InitConfig => {
            let path = Config::config_path()?;
            if path.exists() {
                println!("Config file already exists: {}", path.display());
            } else {
                config.save()?;
                println!("Wrote {}", path.display());
            }
        }
        Command::List => {
            let cache = open_cache(&config)?;
            for summary in cache.summaries() {
                println!(
                    "{} {:<20} {:<width$} {}",
                    if summary.saved { "[saved]" } else { "       " },
                    summary.id,
                    truncate_string(&summary.title, TITLE_WIDTH),
                    summary.source,
                    width = TITLE_WIDTH,
                );
            }
        }
        Command::Show(id) => {
            let cache = open_cache(&config)?;
            // An unreadable offline copy falls back to the catalog
            let saved = cache.load_offline(&id).map_err(notice).unwrap_or(None);
            match show_lines(saved.as_ref(), cache.catalog().get(&id)) {
                Some(lines) => {
                    for line in lines {
                        println!("{}", line);
                    }
                }
                None => return Err(notice(OfflineError::RecordNotFound(id))),
            }
        }
        Command::Save(id) => {
            let mut cache = open_cache(&config)?;
            let title = cache
                .catalog()
                .get(&id)
                .map(|r| r.title.clone())
                .unwrap_or_else(|| id.clone());
            cache.save_for_offline(&id).map_err(notice)?;
            println!("{} saved for offline use", title);
        }
        Command::Remove(id) => {
            let mut cache = open_cache(&config)?;
            let was_saved = cache.is_available_offline(&id);
            cache.remove_offline_content(&id).map_err(notice)?;
            if was_saved {
                println!("{} removed from offline storage", id);
            } else {
                println!("{} was not saved", id);
            }
        }
        Command::Saved => {
            let cache = open_cache(&config)?;
            if cache.index().is_empty() {
                println!("Nothing saved for offline use");
            }
            for id in cache.index().iter() {
                match cache.catalog().get(id) {
                    Some(record) => println!("{:<20} {}", id, record.title),
                    None => println!("{:<20} (no longer in catalog)", id),
                }
            }
        }
    }

    Ok(())
}

/// Print the user-facing notice for a cache error and pass it on.
fn notice(e: OfflineError) -> anyhow::Error {
    println!("Notice: {}", e.user_message());
    if e.is_retryable() {
        println!("You can try again.");
    }
    anyhow::Error::new(e)
}

/// Lines for `show`: the offline copy when there is one, else the catalog
/// record. `None` when neither exists.
fn show_lines(saved: Option<&SavedRecord>, current: Option<&MedicalRecord>) -> Option<Vec<String>> {
    match (saved, current) {
        (Some(saved), current) => {
            let mut lines = record_lines(&saved.record);
            lines.push(String::new());
            lines.push(format!("Available offline (saved {})", saved.age_display()));
            if current.is_some_and(|c| saved.is_outdated(c)) {
                lines.push("A newer version is available. Save again to update.".to_string());
            }
            Some(lines)
        }
        (None, Some(record)) => Some(record_lines(record)),
        (None, None) => None,
    }
}

fn record_lines(record: &MedicalRecord) -> Vec<String> {
    let mut lines = vec![
        record.title.clone(),
        format!("Source: {}", record.source),
        format!(
            "Last updated: {} ({} sections)",
            format_date(&record.last_updated),
            record.section_count()
        ),
        String::new(),
        record.content.introduction.clone(),
    ];

    if !record.content.general_principles.is_empty() {
        lines.push(String::new());
        lines.push("General principles".to_string());
        for principle in &record.content.general_principles {
            lines.push(format!("  * {}", principle));
        }
    }

    for section in &record.content.sections {
        lines.push(String::new());
        lines.push(section.title.clone());
        lines.push(section.content.clone());
    }
    lines
}
