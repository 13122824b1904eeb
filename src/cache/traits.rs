// Verdict cache trait — backend-agnostic async key/value interface.
//
// Implementors: MemoryCache (in-process HashMap) and SqliteCache (rusqlite).
// Each get/set is individually atomic; nothing here locks across the gate's
// lookup-classify-write sequence.

use anyhow::Result;
use async_trait::async_trait;

use crate::image::ContentKey;
use crate::moderation::verdict::Verdict;

/// A stored verdict and when it was written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheEntry {
    pub verdict: Verdict,
    /// Timestamp as recorded by the backend (UTC).
    pub judged_at: String,
}

#[async_trait]
pub trait VerdictCache: Send + Sync {
    /// Look up the stored entry for a key.
    async fn get_entry(&self, key: &ContentKey) -> Result<Option<CacheEntry>>;

    /// Store (or overwrite) the verdict for a key. Entries never expire.
    async fn set(&self, key: &ContentKey, verdict: Verdict) -> Result<()>;

    /// Number of entries per stored verdict string, most common first.
    async fn summary(&self) -> Result<Vec<(String, u64)>>;

    async fn get(&self, key: &ContentKey) -> Result<Option<Verdict>> {
        Ok(self.get_entry(key).await?.map(|entry| entry.verdict))
    }
}
