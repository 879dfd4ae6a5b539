use regex::Regex;
use reqwest::Client;
use serde::Deserialize;
use std::sync::OnceLock;
use std::time::Duration;
use tokio::time::timeout;

use crate::external::error::SourceError;
use crate::models::{DoubanItem, DoubanKind};

const DOUBAN_BASE_URL: &str = "https://movie.douban.com";
const DOUBAN_TIMEOUT_SECS: u64 = 10;
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/121.0.0.0 Safari/537.36";

/// 豆瓣推荐接口响应
#[derive(Debug, Deserialize)]
struct DoubanApiResponse {
    #[serde(default)]
    subjects: Vec<DoubanSubject>,
}

#[derive(Debug, Deserialize)]
struct DoubanSubject {
    #[serde(default)]
    title: String,
    #[serde(default)]
    cover: String,
    #[serde(default)]
    rate: String,
}

/// 豆瓣推荐客户端
#[derive(Clone)]
pub struct DoubanClient {
    client: Client,
    base_url: String,
    timeout: Duration,
}

impl DoubanClient {
    pub fn new() -> Self {
        Self::with_base_url(DOUBAN_BASE_URL)
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into(),
            timeout: Duration::from_secs(DOUBAN_TIMEOUT_SECS),
        }
    }

    /// 获取推荐列表
    ///
    /// `top250` 标签解析 HTML 页面，其余标签走 JSON 接口。失败时返回空列表
    pub async fn fetch_items(
        &self,
        kind: DoubanKind,
        tag: &str,
        page_size: u32,
        page_start: u32,
    ) -> Vec<DoubanItem> {
        let result = if tag == "top250" {
            self.fetch_top250(page_start).await
        } else {
            self.fetch_subjects(kind, tag, page_size, page_start).await
        };

        match result {
            Ok(items) => items,
            Err(e) => {
                tracing::warn!("Douban fetch failed (type={}, tag={}): {}", kind.as_str(), tag, e);
                Vec::new()
            }
        }
    }

    async fn fetch_subjects(
        &self,
        kind: DoubanKind,
        tag: &str,
        page_size: u32,
        page_start: u32,
    ) -> Result<Vec<DoubanItem>, SourceError> {
        let url = format!(
            "{}/j/search_subjects?type={}&tag={}&sort=recommend&page_limit={}&page_start={}",
            self.base_url,
            kind.as_str(),
            urlencoding::encode(tag),
            page_size,
            page_start
        );

        let body = self.get_text(&url, "application/json, text/plain, */*").await?;
        let response: DoubanApiResponse = serde_json::from_str(&body)?;

        Ok(response
            .subjects
            .into_iter()
            .map(|subject| DoubanItem {
                title: subject.title,
                poster: subject.cover,
                rate: subject.rate,
            })
            .collect())
    }

    async fn fetch_top250(&self, page_start: u32) -> Result<Vec<DoubanItem>, SourceError> {
        let url = format!("{}/top250?start={}&filter=", self.base_url, page_start);
        let html = self
            .get_text(
                &url,
                "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8",
            )
            .await?;
        Ok(parse_top250(&html))
    }

    async fn get_text(&self, url: &str, accept: &str) -> Result<String, SourceError> {
        let request = self
            .client
            .get(url)
            .header("User-Agent", USER_AGENT)
            .header("Referer", "https://movie.douban.com/")
            .header("Accept", accept)
            .send();

        let response = match timeout(self.timeout, request).await {
            Ok(response) => response?,
            Err(_) => return Err(SourceError::Timeout),
        };

        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::Status(status.as_u16()));
        }

        match timeout(self.timeout, response.text()).await {
            Ok(text) => Ok(text?),
            Err(_) => Err(SourceError::Timeout),
        }
    }
}

impl Default for DoubanClient {
    fn default() -> Self {
        Self::new()
    }
}

/// 解析 Top250 页面
pub fn parse_top250(html: &str) -> Vec<DoubanItem> {
    static ITEM_REGEX: OnceLock<Regex> = OnceLock::new();

    let regex = ITEM_REGEX.get_or_init(|| {
        Regex::new(
            r#"<div class="item">[\s\S]*?<img[^>]+alt="([^"]+)"[^>]*src="([^"]+)"[\s\S]*?<span class="rating_num"[^>]*>([^<]+)</span>[\s\S]*?</div>"#,
        )
        .expect("Top250 正则表达式编译失败")
    });

    regex
        .captures_iter(html)
        .map(|cap| DoubanItem {
            title: cap[1].to_string(),
            poster: upgrade_to_https(&cap[2]),
            rate: cap[3].trim().to_string(),
        })
        .collect()
}

fn upgrade_to_https(url: &str) -> String {
    match url.strip_prefix("http:") {
        Some(rest) => format!("https:{}", rest),
        None => url.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOP250_SNIPPET: &str = r#"
        <ol class="grid_view">
        <li><div class="item">
            <div class="pic"><a href="https://movie.douban.com/subject/1292052/">
                <img width="100" alt="肖申克的救赎" src="http://img.doubanio.com/view/photo/s_ratio_poster/public/p480747492.webp" class="">
            </a></div>
            <div class="info"><div class="bd"><div class="star">
                <span class="rating_num" property="v:average">9.7</span>
            </div></div></div>
        </div></li>
        <li><div class="item">
            <div class="pic"><a href="https://movie.douban.com/subject/1291546/">
                <img width="100" alt="霸王别姬" src="https://img.doubanio.com/view/photo/s_ratio_poster/public/p2561716440.webp" class="">
            </a></div>
            <div class="info"><div class="bd"><div class="star">
                <span class="rating_num" property="v:average">9.6</span>
            </div></div></div>
        </div></li>
        </ol>
    "#;

    #[test]
    fn test_parse_top250() {
        let items = parse_top250(TOP250_SNIPPET);
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].title, "肖申克的救赎");
        assert_eq!(
            items[0].poster,
            "https://img.doubanio.com/view/photo/s_ratio_poster/public/p480747492.webp"
        );
        assert_eq!(items[0].rate, "9.7");
        assert_eq!(items[1].title, "霸王别姬");
        assert_eq!(items[1].rate, "9.6");
    }

    #[test]
    fn test_parse_top250_empty_page() {
        assert!(parse_top250("<html></html>").is_empty());
    }

    #[test]
    fn test_client_uses_fixed_timeout() {
        let client = DoubanClient::with_base_url("http://127.0.0.1:9");
        assert_eq!(client.timeout, Duration::from_secs(DOUBAN_TIMEOUT_SECS));
        assert_eq!(client.base_url, "http://127.0.0.1:9");
    }

    #[test]
    fn test_upgrade_to_https() {
        assert_eq!(upgrade_to_https("http://a/b.jpg"), "https://a/b.jpg");
        assert_eq!(upgrade_to_https("https://a/b.jpg"), "https://a/b.jpg");
    }
}
