pub mod cache;
pub mod douban;
pub mod error;
pub mod source_client;

pub use cache::{CacheCleanupTask, CacheStats, ResponseCache};
pub use douban::DoubanClient;
pub use error::SourceError;
pub use source_client::{SearchOptions, SourceClient, VodConverter};

use crate::config::AppConfig;

/// 外部接口客户端集合
#[derive(Clone)]
pub struct ExternalApiClient {
    pub sources: SourceClient,
    pub douban: DoubanClient,
}

impl ExternalApiClient {
    pub fn new(config: &AppConfig) -> Self {
        let cache = ResponseCache::new(config.cache_time);
        Self {
            sources: SourceClient::new(config.search.clone(), cache),
            douban: DoubanClient::new(),
        }
    }

    pub fn cache(&self) -> &ResponseCache {
        self.sources.cache()
    }

    /// 获取缓存统计信息
    pub fn get_cache_stats(&self) -> CacheStats {
        self.cache().get_stats()
    }

    /// 清空所有缓存
    pub fn clear_cache(&self) {
        self.cache().clear_all();
    }
}
