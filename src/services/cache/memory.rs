use async_trait::async_trait;
use std::{collections::HashMap, sync::Arc, time::Duration};
use tokio::{sync::Mutex, time::Instant};

use crate::services::cache::client::{CacheClient, CacheResult, ttl_whole_seconds};

/// In-process cache client.
///
/// CACHE_URL が無いときの既定。プロセスをまたいだ共有はしない。
/// 期限切れのエントリは参照時と書き込み時に落とす (掃除用のタスクは持たない)
#[derive(Clone, Debug, Default)]
pub struct MemoryCache {
    entries: Arc<Mutex<HashMap<String, Entry>>>,
}

#[derive(Debug)]
struct Entry {
    value: String,
    expires_at: Instant,
}

impl Entry {
    fn new(value: &str, ttl: Duration, now: Instant) -> Self {
        Self {
            value: value.to_string(),
            expires_at: now + Duration::from_secs(ttl_whole_seconds(ttl)),
        }
    }

    fn is_live(&self, now: Instant) -> bool {
        now < self.expires_at
    }
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    async fn len(&self) -> usize {
        self.entries.lock().await.len()
    }
}

// 書き込み時に期限切れを全件落とす (読まれないキーも残さない)
fn sweep(entries: &mut HashMap<String, Entry>, now: Instant) {
    entries.retain(|_, e| e.is_live(now));
}

#[async_trait]
impl CacheClient for MemoryCache {
    fn backend_name(&self) -> &'static str {
        "memory"
    }

    async fn get_string(&self, key: &str) -> CacheResult<Option<String>> {
        let mut entries = self.entries.lock().await;
        let now = Instant::now();

        match entries.get(key) {
            Some(entry) if entry.is_live(now) => return Ok(Some(entry.value.clone())),
            Some(_) => {}
            None => return Ok(None),
        }

        // expired
        entries.remove(key);
        Ok(None)
    }

    async fn set_string_with_ttl(
        &self,
        key: &str,
        value: &str,
        ttl: Duration,
    ) -> CacheResult<()> {
        let mut entries = self.entries.lock().await;
        let now = Instant::now();

        sweep(&mut entries, now);
        entries.insert(key.to_string(), Entry::new(value, ttl, now));
        Ok(())
    }

    async fn set_if_absent_with_ttl(
        &self,
        key: &str,
        value: &str,
        ttl: Duration,
    ) -> CacheResult<bool> {
        let mut entries = self.entries.lock().await;
        let now = Instant::now();

        sweep(&mut entries, now);
        if entries.contains_key(key) {
            return Ok(false);
        }

        entries.insert(key.to_string(), Entry::new(value, ttl, now));
        Ok(true)
    }

    async fn del(&self, key: &str) -> CacheResult<u64> {
        let mut entries = self.entries.lock().await;
        let now = Instant::now();

        // 期限切れは「存在しない」扱い (Valkey の DEL と揃える)
        Ok(match entries.remove(key) {
            Some(entry) if entry.is_live(now) => 1,
            _ => 0,
        })
    }
}
