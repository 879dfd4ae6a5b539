use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use std::time::{Duration, Instant};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// 缓存条目
#[derive(Debug, Clone)]
struct CacheEntry<T> {
    data: T,
    created_at: Instant,
    ttl: Duration,
}

impl<T> CacheEntry<T> {
    fn new(data: T, ttl: Duration) -> Self {
        Self {
            data,
            created_at: Instant::now(),
            ttl,
        }
    }

    fn is_expired(&self) -> bool {
        self.created_at.elapsed() > self.ttl
    }
}

/// 上游响应缓存的默认容量（条目数）
pub const RESPONSE_CACHE_CAPACITY: usize = 1024;

/// 内存缓存实现
///
/// 条目数达到上限时先清理过期条目，仍然满时淘汰最早写入的条目
#[derive(Debug, Clone)]
pub struct MemoryCache<T> {
    cache: Arc<RwLock<HashMap<String, CacheEntry<T>>>>,
    default_ttl: Duration,
    max_entries: usize,
}

impl<T: Clone> MemoryCache<T> {
    pub fn new(default_ttl: Duration, max_entries: usize) -> Self {
        Self {
            cache: Arc::new(RwLock::new(HashMap::new())),
            default_ttl,
            max_entries: max_entries.max(1),
        }
    }

    pub fn get(&self, key: &str) -> Option<T> {
        let cache = self.cache.read().ok()?;
        let entry = cache.get(key)?;

        if entry.is_expired() {
            drop(cache);
            self.remove(key);
            None
        } else {
            Some(entry.data.clone())
        }
    }

    pub fn set(&self, key: String, value: T) {
        if let Ok(mut cache) = self.cache.write() {
            if !cache.contains_key(&key) && cache.len() >= self.max_entries {
                cache.retain(|_, entry| !entry.is_expired());
            }
            if !cache.contains_key(&key) && cache.len() >= self.max_entries {
                let oldest = cache
                    .iter()
                    .min_by_key(|(_, entry)| entry.created_at)
                    .map(|(k, _)| k.clone());
                if let Some(oldest) = oldest {
                    cache.remove(&oldest);
                }
            }
            cache.insert(key, CacheEntry::new(value, self.default_ttl));
        }
    }

    pub fn remove(&self, key: &str) {
        if let Ok(mut cache) = self.cache.write() {
            cache.remove(key);
        }
    }

    pub fn clear(&self) {
        if let Ok(mut cache) = self.cache.write() {
            cache.clear();
        }
    }

    pub fn cleanup_expired(&self) {
        if let Ok(mut cache) = self.cache.write() {
            cache.retain(|_, entry| !entry.is_expired());
        }
    }

    pub fn size(&self) -> usize {
        self.cache.read().map(|c| c.len()).unwrap_or(0)
    }
}

/// 上游响应缓存
///
/// 以请求 URL 为键缓存已解析的 JSON 响应体，只缓存成功的响应。
/// 缓存时间为 0 时整个缓存处于关闭状态，所有读写都是空操作
#[derive(Debug, Clone)]
pub struct ResponseCache {
    entries: Option<MemoryCache<Value>>,
}

impl ResponseCache {
    /// 创建缓存，`cache_time` 为秒数
    pub fn new(cache_time: u64) -> Self {
        Self::with_capacity(cache_time, RESPONSE_CACHE_CAPACITY)
    }

    /// 创建缓存并指定最大条目数
    pub fn with_capacity(cache_time: u64, max_entries: usize) -> Self {
        let entries = (cache_time > 0)
            .then(|| MemoryCache::new(Duration::from_secs(cache_time), max_entries));
        Self { entries }
    }

    /// 关闭状态的缓存
    pub fn disabled() -> Self {
        Self { entries: None }
    }

    pub fn is_enabled(&self) -> bool {
        self.entries.is_some()
    }

    pub fn get(&self, url: &str) -> Option<Value> {
        self.entries.as_ref()?.get(url)
    }

    pub fn set(&self, url: &str, body: Value) {
        if let Some(entries) = &self.entries {
            entries.set(url.to_string(), body);
        }
    }

    /// 清理过期缓存
    pub fn cleanup_expired(&self) {
        if let Some(entries) = &self.entries {
            entries.cleanup_expired();
        }
    }

    /// 清空所有缓存
    pub fn clear_all(&self) {
        if let Some(entries) = &self.entries {
            entries.clear();
        }
    }

    /// 获取缓存统计信息
    pub fn get_stats(&self) -> CacheStats {
        CacheStats {
            enabled: self.is_enabled(),
            response_cache_size: self.entries.as_ref().map(|e| e.size()).unwrap_or(0),
        }
    }
}

/// 缓存统计信息
#[derive(Debug, Serialize, Deserialize)]
pub struct CacheStats {
    pub enabled: bool,
    pub response_cache_size: usize,
}

/// 缓存清理任务
pub struct CacheCleanupTask {
    cache: ResponseCache,
    interval: Duration,
}

impl CacheCleanupTask {
    pub fn new(cache: ResponseCache, interval: Duration) -> Self {
        Self { cache, interval }
    }

    /// 启动定期清理任务
    pub async fn start(self) {
        let mut interval = tokio::time::interval(self.interval);

        loop {
            interval.tick().await;
            self.cache.cleanup_expired();
            tracing::debug!("Cache cleanup completed. Stats: {:?}", self.cache.get_stats());
        }
    }
}
