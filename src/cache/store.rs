use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::Mutex;
use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;
use tokio::time::{Duration, Instant};

use crate::cache::models::{CacheEntry, CacheStats, CachedKeyInfo};
use crate::cache::sweeper::SweeperHandle;

/// 默认缓存时间（秒）
pub const DEFAULT_CACHE_TTL: u64 = 24 * 3600; // 24小时

/// 进程内结果缓存
///
/// 所有读写都在同一把锁内完成，`get` 触发的过期删除与 `set` 互斥。
/// 缓存操作从不返回错误，未命中一律是 `None`。
pub struct ResultCache {
    entries: Mutex<HashMap<String, CacheEntry<Value>>>,
    default_ttl: Duration,
    sweeper_started: AtomicBool,
}

impl Default for ResultCache {
    fn default() -> Self {
        Self::new(Duration::from_secs(DEFAULT_CACHE_TTL))
    }
}

impl ResultCache {
    /// 创建新的缓存实例
    pub fn new(default_ttl: Duration) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            default_ttl,
            sweeper_started: AtomicBool::new(false),
        }
    }

    pub fn default_ttl(&self) -> Duration {
        self.default_ttl
    }

    /// 写入缓存，无条件覆盖已有条目；`ttl` 为空时使用默认时间
    pub fn set<T: Serialize>(&self, key: &str, value: &T, ttl: Option<Duration>) {
        let json = match serde_json::to_value(value) {
            Ok(json) => json,
            Err(e) => {
                tracing::warn!("缓存序列化失败, key: {}, error: {}", key, e);
                return;
            }
        };

        let entry = CacheEntry::new(json, ttl.unwrap_or(self.default_ttl));
        self.entries.lock().insert(key.to_string(), entry);
    }

    /// 读取缓存，过期条目在返回前立即删除
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let value = self.live_value(key)?;

        match serde_json::from_value(value) {
            Ok(value) => {
                tracing::debug!("Cache HIT for key: {}", key);
                Some(value)
            }
            Err(e) => {
                tracing::warn!("缓存反序列化失败, key: {}, error: {}", key, e);
                None
            }
        }
    }

    /// 检查缓存是否存在，过期语义与 `get` 相同
    pub fn has(&self, key: &str) -> bool {
        self.live_value(key).is_some()
    }

    /// 删除缓存
    pub fn delete(&self, key: &str) -> bool {
        self.entries.lock().remove(key).is_some()
    }

    /// 清空缓存
    pub fn clear(&self) {
        self.entries.lock().clear();
    }

    /// 条目数量，包括尚未清理的过期条目
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// 清理所有过期条目，返回清理数量
    pub fn sweep_expired(&self) -> usize {
        let now = Instant::now();
        let mut entries = self.entries.lock();
        let before = entries.len();
        entries.retain(|_, entry| !entry.is_expired(now));
        before - entries.len()
    }

    /// 缓存统计，只列出未过期的条目
    pub fn stats(&self) -> CacheStats {
        let now = Instant::now();
        let entries = self.entries.lock();

        let mut keys: Vec<CachedKeyInfo> = entries
            .iter()
            .filter(|(_, entry)| !entry.is_expired(now))
            .map(|(key, entry)| CachedKeyInfo {
                key: key.clone(),
                created_at: entry.created_at,
                expires_at: entry.expires_at_utc,
            })
            .collect();
        keys.sort_by(|a, b| a.key.cmp(&b.key));

        CacheStats {
            size: keys.len(),
            keys,
        }
    }

    /// 按前缀列出未过期的缓存键
    pub fn keys_with_prefix(&self, prefix: &str) -> Vec<String> {
        let mut keys: Vec<String> = self
            .stats()
            .keys
            .into_iter()
            .map(|info| info.key)
            .filter(|key| key.starts_with(prefix))
            .collect();
        keys.sort();
        keys
    }

    /// 启动后台清理任务，每个实例只会启动一次；重复调用返回 `None`
    pub fn start_sweeper(self: &Arc<Self>, interval: Duration) -> Option<SweeperHandle> {
        if self
            .sweeper_started
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            tracing::debug!("Cache sweeper already running");
            return None;
        }

        Some(SweeperHandle::spawn(Arc::downgrade(self), interval))
    }

    fn live_value(&self, key: &str) -> Option<Value> {
        let now = Instant::now();
        let mut entries = self.entries.lock();

        let expired = match entries.get(key) {
            Some(entry) => entry.is_expired(now),
            None => {
                tracing::debug!("Cache MISS for key: {}", key);
                return None;
            }
        };

        if expired {
            tracing::debug!("Cache EXPIRED for key: {}", key);
            entries.remove(key);
            return None;
        }

        entries.get(key).map(|entry| entry.value.clone())
    }
}
