// 源客户端 - 查询单个上游资源站
//
// 上游均为苹果 CMS 风格的 JSON 接口：
//   GET {api}?ac=videolist&wd={关键词}
//   GET {api}?ac=videolist&wd={关键词}&pg={页码}
// 响应中 `list` 为条目数组，`pagecount` 为总页数

use futures::future::join_all;
use regex::Regex;
use reqwest::Client;
use serde_json::Value;
use std::sync::{Arc, OnceLock};
use std::time::Duration;
use tokio::time::timeout;
use tracing::{debug, warn};

use crate::config::{ApiSite, SearchApiConfig, DEFAULT_MAX_PAGES, DEFAULT_TIMEOUT_SECS};
use crate::external::cache::ResponseCache;
use crate::external::error::SourceError;
use crate::models::SearchResult;
use crate::services::episodes::EpisodeExtractor;
use crate::services::html::clean_html_tags;

/// 单次搜索调用的参数
///
/// 显式传递到每一个网络请求，超时是唯一的取消方式
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchOptions {
    /// 单个请求的超时时间
    pub timeout: Duration,
    /// 每个源最多获取的页数（含第一页）
    pub max_pages: u32,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            max_pages: DEFAULT_MAX_PAGES,
        }
    }
}

/// 源客户端
#[derive(Clone)]
pub struct SourceClient {
    client: Client,
    search: Arc<SearchApiConfig>,
    cache: ResponseCache,
}

impl SourceClient {
    pub fn new(search: SearchApiConfig, cache: ResponseCache) -> Self {
        Self {
            client: Client::new(),
            search: Arc::new(search),
            cache,
        }
    }

    pub fn cache(&self) -> &ResponseCache {
        &self.cache
    }

    /// 首页搜索地址
    pub fn search_url(&self, site: &ApiSite, query: &str) -> String {
        format!("{}{}{}", site.api, self.search.path, urlencoding::encode(query))
    }

    /// 分页搜索地址
    pub fn page_url(&self, site: &ApiSite, query: &str, page: u32) -> String {
        let path = self
            .search
            .page_path
            .replace("{query}", &urlencoding::encode(query))
            .replace("{page}", &page.to_string());
        format!("{}{}", site.api, path)
    }

    /// 需要额外获取的页数
    ///
    /// `min(总页数 - 1, 最大页数 - 1)`，不为正时返回 0
    pub fn pages_to_fetch(page_count: i64, max_pages: u32) -> u32 {
        let pages = (page_count - 1).min(i64::from(max_pages) - 1);
        if pages > 0 {
            pages as u32
        } else {
            0
        }
    }

    /// 查询单个源
    ///
    /// 任何失败（超时、非 2xx、格式错误、list 缺失）都返回空列表，不会向上抛出。
    /// 结果顺序：第一页在前，随后是第 2..N 页
    pub async fn query_source(
        &self,
        site: &ApiSite,
        query: &str,
        opts: &SearchOptions,
    ) -> Vec<SearchResult> {
        let url = self.search_url(site, query);
        let body = match self.fetch_json(&url, opts.timeout).await {
            Ok(body) => body,
            Err(e) => {
                warn!("Source {} search failed: {}", site.key, e);
                return Vec::new();
            }
        };

        let items = match list_items(&body) {
            Some(items) if !items.is_empty() => items,
            _ => {
                debug!("Source {} returned no list for {}", site.key, query);
                return Vec::new();
            }
        };

        let mut results: Vec<SearchResult> = items
            .iter()
            .map(|item| VodConverter::item_to_search_result(item, site))
            .collect();

        let pages_to_fetch = Self::pages_to_fetch(page_count(&body), opts.max_pages);
        if pages_to_fetch > 0 {
            debug!(
                "Source {} fetching {} additional pages for {}",
                site.key, pages_to_fetch, query
            );

            let page_requests =
                (2..=pages_to_fetch + 1).map(|page| self.fetch_page(site, query, page, opts.timeout));

            for page_results in join_all(page_requests).await {
                results.extend(page_results);
            }
        }

        results
    }

    /// 获取额外的一页，失败时返回空列表
    async fn fetch_page(
        &self,
        site: &ApiSite,
        query: &str,
        page: u32,
        timeout_duration: Duration,
    ) -> Vec<SearchResult> {
        let url = self.page_url(site, query, page);
        match self.fetch_json(&url, timeout_duration).await {
            Ok(body) => list_items(&body)
                .map(|items| {
                    items
                        .iter()
                        .map(|item| VodConverter::item_to_search_result(item, site))
                        .collect()
                })
                .unwrap_or_default(),
            Err(e) => {
                warn!("Source {} page {} failed: {}", site.key, page, e);
                Vec::new()
            }
        }
    }

    /// 请求并解析 JSON（带超时和缓存）
    async fn fetch_json(&self, url: &str, timeout_duration: Duration) -> Result<Value, SourceError> {
        if let Some(cached) = self.cache.get(url) {
            debug!("Cache hit for {}", url);
            return Ok(cached);
        }

        let body = match timeout(timeout_duration, self.request_json(url)).await {
            Ok(result) => result?,
            Err(_) => return Err(SourceError::Timeout),
        };

        self.cache.set(url, body.clone());
        Ok(body)
    }

    async fn request_json(&self, url: &str) -> Result<Value, SourceError> {
        let mut request = self.client.get(url);
        for (name, value) in self.search.headers.iter() {
            request = request.header(name.as_str(), value.as_str());
        }

        let response = request.send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::Status(status.as_u16()));
        }

        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

/// 响应中的条目数组
fn list_items(body: &Value) -> Option<&Vec<Value>> {
    body.get("list")?.as_array()
}

/// 响应中的总页数，缺失或无法解析时为 1
fn page_count(body: &Value) -> i64 {
    match body.get("pagecount") {
        Some(Value::Number(n)) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f as i64))
            .unwrap_or(1),
        Some(Value::String(s)) => s.trim().parse().unwrap_or(1),
        _ => 1,
    }
}

/// 上游条目转换器
pub struct VodConverter;

impl VodConverter {
    /// 将上游条目转换为 SearchResult
    ///
    /// 字段缺失或类型不符时使用默认值，不会失败
    pub fn item_to_search_result(item: &Value, site: &ApiSite) -> SearchResult {
        let douban_id = field_string(item, "vod_douban_id");

        SearchResult {
            id: field_string(item, "vod_id"),
            title: field_string(item, "vod_name"),
            poster: field_string(item, "vod_pic"),
            episodes: EpisodeExtractor::extract(&field_string(item, "vod_play_url")),
            source: site.key.clone(),
            source_name: site.name.clone(),
            class_tag: field_string(item, "vod_class"),
            year: extract_year(&field_string(item, "vod_year")),
            desc: clean_html_tags(&field_string(item, "vod_content")),
            type_name: field_string(item, "type_name"),
            douban_id: if douban_id == "0" { String::new() } else { douban_id },
        }
    }
}

/// 读取字符串字段，数字会被转换为字符串
fn field_string(item: &Value, key: &str) -> String {
    match item.get(key) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    }
}

/// 取第一个四位 ASCII 数字作为年份
fn extract_year(raw: &str) -> String {
    static YEAR_REGEX: OnceLock<Regex> = OnceLock::new();

    let regex = YEAR_REGEX.get_or_init(|| Regex::new(r"[0-9]{4}").expect("年份正则表达式编译失败"));
    regex
        .find(raw)
        .map(|m| m.as_str().to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn site() -> ApiSite {
        ApiSite {
            key: "ffzy".to_string(),
            api: "https://api.example/api.php/provide/vod".to_string(),
            name: "非凡影视".to_string(),
            detail: None,
        }
    }

    fn client() -> SourceClient {
        SourceClient::new(SearchApiConfig::default(), ResponseCache::disabled())
    }

    #[test]
    fn test_search_url_encodes_query() {
        assert_eq!(
            client().search_url(&site(), "流浪 地球&2"),
            "https://api.example/api.php/provide/vod?ac=videolist&wd=%E6%B5%81%E6%B5%AA%20%E5%9C%B0%E7%90%83%262"
        );
    }

    #[test]
    fn test_page_url_substitutes_placeholders() {
        assert_eq!(
            client().page_url(&site(), "a b", 3),
            "https://api.example/api.php/provide/vod?ac=videolist&wd=a%20b&pg=3"
        );
    }

    #[test]
    fn test_pages_to_fetch() {
        assert_eq!(SourceClient::pages_to_fetch(3, 5), 2);
        assert_eq!(SourceClient::pages_to_fetch(10, 2), 1);
        assert_eq!(SourceClient::pages_to_fetch(10, 5), 4);
        assert_eq!(SourceClient::pages_to_fetch(1, 5), 0);
        assert_eq!(SourceClient::pages_to_fetch(0, 5), 0);
        assert_eq!(SourceClient::pages_to_fetch(8, 1), 0);
        assert_eq!(SourceClient::pages_to_fetch(8, 0), 0);
    }

    #[test]
    fn test_page_count_variants() {
        assert_eq!(page_count(&json!({ "pagecount": 4 })), 4);
        assert_eq!(page_count(&json!({ "pagecount": "6" })), 6);
        assert_eq!(page_count(&json!({ "pagecount": null })), 1);
        assert_eq!(page_count(&json!({})), 1);
        assert_eq!(page_count(&json!({ "pagecount": "x" })), 1);
    }

    #[test]
    fn test_list_items_requires_array() {
        assert!(list_items(&json!({ "list": "nope" })).is_none());
        assert!(list_items(&json!({})).is_none());
        assert_eq!(list_items(&json!({ "list": [1, 2] })).map(|l| l.len()), Some(2));
    }

    #[test]
    fn test_extract_year() {
        assert_eq!(extract_year("2023"), "2023");
        assert_eq!(extract_year("2019-02-05"), "2019");
        assert_eq!(extract_year("约1998年"), "1998");
        assert_eq!(extract_year("未知"), "");
        assert_eq!(extract_year("99"), "");
    }

    #[test]
    fn test_extract_year_ignores_non_ascii_digits() {
        assert_eq!(extract_year("２０２３"), "");
        assert_eq!(extract_year("٢٠٢٣"), "");
        assert_eq!(extract_year("２０２３年/2024"), "2024");

        let result = VodConverter::item_to_search_result(
            &json!({ "vod_id": 1, "vod_name": "繁花", "vod_year": "２０２３" }),
            &site(),
        );
        assert_eq!(result.year, "");
    }

    #[test]
    fn test_convert_full_item() {
        let item = json!({
            "vod_id": 1024,
            "vod_name": "狂飙",
            "vod_pic": "https://img.example/1.jpg",
            "vod_remarks": "全39集",
            "vod_play_url": "第01集$https://v.example/1/index.m3u8#第02集$https://v.example/2/index.m3u8",
            "vod_class": "剧情,犯罪",
            "vod_year": "2023",
            "vod_content": "<p>一部<b>扫黑</b>剧</p>",
            "type_name": "国产剧",
            "vod_douban_id": 35465232
        });

        let result = VodConverter::item_to_search_result(&item, &site());
        assert_eq!(result.id, "1024");
        assert_eq!(result.title, "狂飙");
        assert_eq!(result.episodes.len(), 2);
        assert_eq!(result.source, "ffzy");
        assert_eq!(result.source_name, "非凡影视");
        assert_eq!(result.class_tag, "剧情,犯罪");
        assert_eq!(result.year, "2023");
        assert_eq!(result.desc, "一部\n扫黑\n剧");
        assert_eq!(result.type_name, "国产剧");
        assert_eq!(result.douban_id, "35465232");
    }

    #[test]
    fn test_convert_sparse_item_uses_defaults() {
        let item = json!({ "vod_id": "9", "vod_name": "x", "vod_year": 0, "vod_douban_id": 0, "vod_pic": null });

        let result = VodConverter::item_to_search_result(&item, &site());
        assert_eq!(result.id, "9");
        assert_eq!(result.poster, "");
        assert_eq!(result.year, "");
        assert_eq!(result.douban_id, "");
        assert!(result.episodes.is_empty());
        assert_eq!(result.source, "ffzy");
    }
}
