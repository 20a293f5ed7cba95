use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::time::{Duration, Instant};

// 约三十年，TTL 溢出时使用
const FAR_FUTURE: Duration = Duration::from_secs(86400 * 365 * 30);

/// 缓存条目，只在缓存内部持有，读取时去掉包装
#[derive(Debug, Clone)]
pub struct CacheEntry<T> {
    pub value: T,
    pub created_at: DateTime<Utc>,
    pub expires_at: Instant,
    pub expires_at_utc: DateTime<Utc>,
}

impl<T> CacheEntry<T> {
    pub fn new(value: T, ttl: Duration) -> Self {
        let created_at = Utc::now();
        let expires_at_utc = chrono::Duration::from_std(ttl)
            .ok()
            .and_then(|ttl| created_at.checked_add_signed(ttl))
            .unwrap_or(DateTime::<Utc>::MAX_UTC);
        let now = Instant::now();
        let expires_at = now.checked_add(ttl).unwrap_or_else(|| now + FAR_FUTURE);
        Self {
            value,
            created_at,
            expires_at,
            expires_at_utc,
        }
    }

    /// 过期时间到达即视为过期
    pub fn is_expired(&self, now: Instant) -> bool {
        now >= self.expires_at
    }
}

/// 单个缓存键的统计信息
#[derive(Debug, Clone, Serialize)]
pub struct CachedKeyInfo {
    pub key: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

/// 缓存统计
#[derive(Debug, Clone, Serialize)]
pub struct CacheStats {
    pub size: usize,
    pub keys: Vec<CachedKeyInfo>,
}
