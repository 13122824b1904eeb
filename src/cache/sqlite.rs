// SqliteCache — rusqlite backend implementing VerdictCache.
//
// Connection is !Sync, so it sits behind a tokio Mutex. Each trait method
// locks, runs one synchronous statement, and returns; the guard never lives
// across an .await on anything else.

use anyhow::Result;
use async_trait::async_trait;
use rusqlite::Connection;
use tokio::sync::Mutex;

use super::traits::{CacheEntry, VerdictCache};
use crate::image::ContentKey;
use crate::moderation::verdict::Verdict;

pub struct SqliteCache {
    conn: Mutex<Connection>,
}

impl SqliteCache {
    /// Wrap an already-opened connection (tables must exist).
    pub fn new(conn: Connection) -> Self {
        Self {
            conn: Mutex::new(conn),
        }
    }

    pub async fn table_count(&self) -> Result<i64> {
        let conn = self.conn.lock().await;
        super::schema::table_count(&conn)
    }
}

#[async_trait]
impl VerdictCache for SqliteCache {
    async fn get_entry(&self, key: &ContentKey) -> Result<Option<CacheEntry>> {
        let conn = self.conn.lock().await;
        let row = super::queries::get_verdict(&conn, key.as_str())?;
        Ok(row.map(|(verdict, judged_at)| CacheEntry {
            verdict: Verdict::parse(&verdict),
            judged_at,
        }))
    }

    async fn set(&self, key: &ContentKey, verdict: Verdict) -> Result<()> {
        let conn = self.conn.lock().await;
        super::queries::set_verdict(&conn, key.as_str(), verdict.as_str())
    }

    async fn summary(&self) -> Result<Vec<(String, u64)>> {
        let conn = self.conn.lock().await;
        super::queries::verdict_counts(&conn)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::moderation::verdict::ContentCategory;

    async fn test_cache() -> SqliteCache {
        let conn = Connection::open_in_memory().unwrap();
        super::super::schema::create_tables(&conn).unwrap();
        SqliteCache::new(conn)
    }

    #[tokio::test]
    async fn test_trait_get_missing() {
        let cache = test_cache().await;
        assert!(cache.get(&"nope".into()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_trait_set_and_get() {
        let cache = test_cache().await;
        let key = ContentKey::from("abc123");
        cache
            .set(&key, Verdict::Rejected(ContentCategory::Spoof))
            .await
            .unwrap();
        let entry = cache.get_entry(&key).await.unwrap().unwrap();
        assert_eq!(entry.verdict, Verdict::Rejected(ContentCategory::Spoof));
        assert!(!entry.judged_at.is_empty());
    }

    #[tokio::test]
    async fn test_unrecognized_stored_value_reads_as_unknown() {
        let cache = test_cache().await;
        {
            let conn = cache.conn.lock().await;
            super::super::queries::set_verdict(&conn, "legacy", "SOMETHING_ELSE").unwrap();
        }
        assert_eq!(
            cache.get(&"legacy".into()).await.unwrap(),
            Some(Verdict::Rejected(ContentCategory::Unknown))
        );
    }

    #[tokio::test]
    async fn test_table_count() {
        let cache = test_cache().await;
        assert_eq!(cache.table_count().await.unwrap(), 2);
    }
}
