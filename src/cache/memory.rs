// In-process verdict cache.
//
// Used for `SAFEGATE_CACHE=memory` dry runs and as the default test double.
// Verdicts are held as their wire strings, same as the SQLite backend, so
// parsing behaves identically across backends.

use std::collections::HashMap;

use anyhow::Result;
use async_trait::async_trait;
use chrono::{SecondsFormat, Utc};
use tokio::sync::RwLock;

use super::traits::{CacheEntry, VerdictCache};
use crate::image::ContentKey;
use crate::moderation::verdict::Verdict;

#[derive(Default)]
pub struct MemoryCache {
    entries: RwLock<HashMap<ContentKey, (String, String)>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a raw value under a key, bypassing verdict encoding.
    pub async fn insert_raw(&self, key: &ContentKey, value: &str) {
        self.entries
            .write()
            .await
            .insert(key.clone(), (value.to_string(), now()));
    }

    pub async fn raw(&self, key: &ContentKey) -> Option<String> {
        self.entries.read().await.get(key).map(|(v, _)| v.clone())
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

#[async_trait]
impl VerdictCache for MemoryCache {
    async fn get_entry(&self, key: &ContentKey) -> Result<Option<CacheEntry>> {
        let entries = self.entries.read().await;
        Ok(entries.get(key).map(|(value, judged_at)| CacheEntry {
            verdict: Verdict::parse(value),
            judged_at: judged_at.clone(),
        }))
    }

    async fn set(&self, key: &ContentKey, verdict: Verdict) -> Result<()> {
        self.insert_raw(key, verdict.as_str()).await;
        Ok(())
    }

    async fn summary(&self) -> Result<Vec<(String, u64)>> {
        let entries = self.entries.read().await;
        let mut counts: HashMap<&str, u64> = HashMap::new();
        for (value, _) in entries.values() {
            *counts.entry(value.as_str()).or_default() += 1;
        }
        let mut summary: Vec<(String, u64)> = counts
            .into_iter()
            .map(|(value, count)| (value.to_string(), count))
            .collect();
        summary.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        Ok(summary)
    }
}

fn now() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)
}
