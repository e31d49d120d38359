//! Cache client interface (ambient `provider::cache()` から解決される capability)
use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

/// Result type for cache operations.
pub type CacheResult<T> = Result<T, CacheError>;

/// Cache-layer errors (transport/command/serialization).
///
/// Note:
/// - `AppError` とは独立させる。失敗時の扱い (fail-open / fail-closed) は呼び出し側が決める
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("cache connection error: {0}")]
    BackendConnection(String),
    #[error("cache command error: {0}")]
    BackendCommand(String),
    #[error("cache value error: {0}")]
    InvalidValue(String),
}

/// A minimal, string-based cache interface.
///
/// `Arc<dyn CacheClient>` として Services に登録するため object safe に保つ
#[async_trait]
pub trait CacheClient: Send + Sync + 'static {
    // Returns the cache backend name (for logging/metrics).
    fn backend_name(&self) -> &'static str;

    // Get UTF-8 string value.
    async fn get_string(&self, key: &str) -> CacheResult<Option<String>>;

    // Set (overwrite) a value with TTL.
    async fn set_string_with_ttl(
        &self,
        key: &str,
        value: &str,
        ttl: Duration,
    ) -> CacheResult<()>;

    // Set value if the key does not exist, with TTL.
    //
    // Returns:
    // - `Ok(true)`  if the key was set (not seen before)
    // - `Ok(false)` if the key already exists
    async fn set_if_absent_with_ttl(
        &self,
        key: &str,
        value: &str,
        ttl: Duration,
    ) -> CacheResult<bool>;

    // Delete a key. Returns number of deleted keys.
    async fn del(&self, key: &str) -> CacheResult<u64>;
}

/// Convenience helper to build a TTL from seconds.
pub fn ttl_seconds(seconds: u64) -> Duration {
    Duration::from_secs(seconds)
}

/// TTL を整数秒 (最低 1 秒) に丸める
///
/// Valkey の `EX` は整数秒しか取れないので、in-process 側も同じ丸めで揃える
pub fn ttl_whole_seconds(ttl: Duration) -> u64 {
    ttl.as_secs().max(1)
}
