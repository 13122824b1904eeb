// Verdict cache — ContentKey -> Verdict, no expiry.
//
// The SQLite backend (rusqlite, "bundled" feature, no system SQLite needed)
// is the default. The file lives wherever SAFEGATE_DB_PATH points
// (defaults to ./safegate.db). MemoryCache is always available.

pub mod memory;
pub mod traits;

#[cfg(feature = "sqlite")]
pub mod queries;
#[cfg(feature = "sqlite")]
pub mod schema;
#[cfg(feature = "sqlite")]
pub mod sqlite;

pub use memory::MemoryCache;
pub use traits::{CacheEntry, VerdictCache};

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteCache;

#[cfg(feature = "sqlite")]
use anyhow::{Context, Result};
#[cfg(feature = "sqlite")]
use rusqlite::Connection;
#[cfg(feature = "sqlite")]
use std::path::Path;

/// Open (or create) the cache file and run migrations.
#[cfg(feature = "sqlite")]
pub fn initialize_sqlite(db_path: &str) -> Result<SqliteCache> {
    if let Some(parent) = Path::new(db_path).parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory for cache: {}", db_path))?;
        }
    }

    let conn = Connection::open(db_path)
        .with_context(|| format!("Failed to open cache at {}", db_path))?;

    // WAL lets concurrent readers proceed while a verdict is being written
    conn.pragma_update(None, "journal_mode", "WAL")?;

    schema::create_tables(&conn)?;

    Ok(SqliteCache::new(conn))
}

/// Open an existing cache file (fails if it doesn't exist yet).
#[cfg(feature = "sqlite")]
pub fn open_sqlite(db_path: &str) -> Result<SqliteCache> {
    if !Path::new(db_path).exists() {
        anyhow::bail!(
            "Cache not found at {}. Run `safegate init` first.",
            db_path
        );
    }

    let conn = Connection::open(db_path)
        .with_context(|| format!("Failed to open cache at {}", db_path))?;

    conn.pragma_update(None, "journal_mode", "WAL")?;
    // Older files may predate later migrations
    schema::create_tables(&conn)?;

    Ok(SqliteCache::new(conn))
}
