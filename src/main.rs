use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;
use tracing::info;

use safegate::cache::{MemoryCache, VerdictCache};
use safegate::config::{CacheBackend, Config};
use safegate::image::ContentKey;
use safegate::moderation::ModerationGate;
use safegate::output::terminal;
use safegate::pipeline::check::{check_files, CheckTally};
use safegate::vision::safe_search::SafeSearchClassifier;

/// Safegate: decide whether uploaded images are safe to publish.
///
/// Images are classified with Cloud Vision safe-search and the verdict is
/// cached by content hash, so the same bytes are never classified twice.
#[derive(Parser)]
#[command(name = "safegate", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the verdict cache
    Init,

    /// Run image files through the moderation gate
    Check {
        /// Image files to check
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Number of files to check in parallel (default: 4)
        #[arg(long, default_value = "4")]
        concurrency: usize,

        /// Print per-category scores for freshly classified images
        #[arg(long)]
        scores: bool,
    },

    /// Show the cached verdict for a content key without classifying
    Lookup {
        /// Content key (SHA-256 hex of the image bytes)
        key: String,
    },

    /// Show cache location and verdict counts
    Status,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    // Load .env file if present (silently ignore if missing)
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("safegate=info")),
        )
        .init();

    let cli = Cli::parse();
    let config = Config::load()?;

    match cli.command {
        Commands::Init => {
            init_cache(&config).await?;
        }

        Commands::Check {
            files,
            concurrency,
            scores,
        } => {
            config.require_vision()?;
            let cache = open_cache(&config)?;

            let mut classifier =
                SafeSearchClassifier::new(&config.vision_api_url, config.vision_api_key.clone());
            if let Some(qps) = config.vision_qps {
                classifier = classifier.with_rate_limit(qps);
            }

            let gate = ModerationGate::new(Arc::new(classifier), cache)
                .with_policy(config.policy)
                .with_options(config.gate);

            println!("Checking {} file(s)...", files.len());
            let outcomes = check_files(&gate, files, concurrency, true).await;

            for outcome in &outcomes {
                let label = outcome.path.display().to_string();
                match (&outcome.key, &outcome.evaluation) {
                    (Some(key), Some(evaluation)) => {
                        terminal::display_evaluation(&label, key, evaluation);
                        if scores {
                            if let Some(s) = &evaluation.scores {
                                terminal::display_scores(s, gate.policy());
                            }
                        }
                    }
                    _ => {
                        let reason = outcome.error.as_deref().unwrap_or("unreadable");
                        println!("  {:<40} {}", label, reason.red());
                    }
                }
            }

            let tally = CheckTally::from_outcomes(&outcomes);
            terminal::display_summary(tally.approved, tally.rejected, tally.failed);

            if tally.rejected > 0 || tally.failed > 0 {
                return Ok(ExitCode::FAILURE);
            }
        }

        Commands::Lookup { key } => {
            let cache = open_cache(&config)?;
            let key = ContentKey::new(key);
            let entry = cache.get_entry(&key).await?;
            terminal::display_cache_entry(&key, entry.as_ref());
        }

        Commands::Status => {
            let cache = open_cache(&config)?;
            let path = match config.cache_backend {
                CacheBackend::Sqlite => Some(config.db_path.as_str()),
                CacheBackend::Memory => None,
            };
            safegate::status::show(&cache, path).await?;
        }
    }

    Ok(ExitCode::SUCCESS)
}

/// Open the configured cache backend.
fn open_cache(config: &Config) -> Result<Arc<dyn VerdictCache>> {
    match config.cache_backend {
        CacheBackend::Memory => {
            info!("Using in-memory verdict cache");
            Ok(Arc::new(MemoryCache::new()))
        }
        CacheBackend::Sqlite => {
            #[cfg(feature = "sqlite")]
            {
                Ok(Arc::new(safegate::cache::open_sqlite(&config.db_path)?))
            }
            #[cfg(not(feature = "sqlite"))]
            anyhow::bail!(
                "SAFEGATE_CACHE=sqlite but the 'sqlite' feature is not compiled in.\n\
                 Rebuild with: cargo build --features sqlite, or set SAFEGATE_CACHE=memory"
            )
        }
    }
}

/// Create the cache file and tables (SQLite only).
async fn init_cache(config: &Config) -> Result<()> {
    match config.cache_backend {
        CacheBackend::Memory => {
            println!("SAFEGATE_CACHE=memory: nothing to initialize.");
            Ok(())
        }
        CacheBackend::Sqlite => {
            #[cfg(feature = "sqlite")]
            {
                info!("Initializing verdict cache...");
                let cache = safegate::cache::initialize_sqlite(&config.db_path)?;
                let table_count = cache.table_count().await?;
                println!("Verdict cache initialized at: {}", config.db_path);
                println!("Tables created: {table_count}");
                println!("\nNext: set VISION_API_KEY in your .env file, then run");
                println!("  safegate check <image files>");
                Ok(())
            }
            #[cfg(not(feature = "sqlite"))]
            anyhow::bail!(
                "SAFEGATE_CACHE=sqlite but the 'sqlite' feature is not compiled in.\n\
                 Rebuild with: cargo build --features sqlite"
            )
        }
    }
}
