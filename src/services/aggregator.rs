// 聚合搜索 - 并发查询所有配置的源
//
// 每个源一个任务，各自受超时约束；失败的源贡献空结果，不影响其他源

use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info};

use crate::config::{ApiSite, AppConfig};
use crate::external::{SearchOptions, SourceClient};
use crate::models::{Resolution, SearchResult};
use crate::services::reconcile;

/// 聚合搜索服务
#[derive(Clone)]
pub struct SearchAggregator {
    client: SourceClient,
    sites: Arc<Vec<ApiSite>>,
    options: SearchOptions,
}

impl SearchAggregator {
    pub fn new(client: SourceClient, sites: Vec<ApiSite>, options: SearchOptions) -> Self {
        Self {
            client,
            sites: Arc::new(sites),
            options,
        }
    }

    pub fn from_config(client: SourceClient, config: &AppConfig) -> Self {
        Self::new(client, config.sites.clone(), config.search_options())
    }

    pub fn sites(&self) -> &[ApiSite] {
        &self.sites
    }

    pub fn options(&self) -> SearchOptions {
        self.options
    }

    /// 搜索所有源（关键词为空时直接返回空列表）
    pub async fn search(&self, query: &str) -> Vec<SearchResult> {
        let query = query.trim();
        if query.is_empty() {
            return Vec::new();
        }
        self.search_all(query).await
    }

    /// 并发查询所有源并展平结果
    ///
    /// 单个源内部保持顺序，源之间的顺序不作保证
    pub async fn search_all(&self, query: &str) -> Vec<SearchResult> {
        let start_time = Instant::now();

        let mut handles = Vec::with_capacity(self.sites.len());
        for site in self.sites.iter().cloned() {
            let client = self.client.clone();
            let query = query.to_string();
            let options = self.options;
            handles.push(tokio::spawn(async move {
                client.query_source(&site, &query, &options).await
            }));
        }

        // 等待所有任务完成
        let mut results = Vec::new();
        for handle in handles {
            match handle.await {
                Ok(source_results) => results.extend(source_results),
                Err(e) => error!("Source task failed: {:?}", e),
            }
        }

        info!(
            "Search \"{}\" finished: {} results from {} sources in {}ms",
            query,
            results.len(),
            self.sites.len(),
            start_time.elapsed().as_millis()
        );

        results
    }

    /// 精确匹配并合并
    ///
    /// 见 [`reconcile::resolve`]
    pub async fn resolve_exact(
        &self,
        query: &str,
        title_hint: Option<&str>,
        year_hint: Option<&str>,
    ) -> Resolution {
        let results = self.search(query).await;
        reconcile::resolve(
            results,
            query.trim(),
            title_hint.map(str::trim),
            year_hint.map(str::trim),
        )
    }
}
