// 集成测试共用的工具函数

#![allow(dead_code)]

use serde_json::{json, Value};
use std::time::Duration;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use vod_aggregator::config::{ApiSite, SearchApiConfig};
use vod_aggregator::external::{ResponseCache, SearchOptions, SourceClient};
use vod_aggregator::services::SearchAggregator;

pub const VOD_PATH: &str = "/api.php/provide/vod";

pub fn site_for(server: &MockServer, key: &str) -> ApiSite {
    ApiSite {
        key: key.to_string(),
        api: format!("{}{}", server.uri(), VOD_PATH),
        name: format!("{}资源", key),
        detail: None,
    }
}

pub fn vod_item(id: &str, name: &str, year: &str, episodes: usize) -> Value {
    let play_url = (1..=episodes)
        .map(|i| format!("第{:02}集$https://cdn.example/{}/{}/index.m3u8", i, id, i))
        .collect::<Vec<_>>()
        .join("#");

    json!({
        "vod_id": id,
        "vod_name": name,
        "vod_pic": format!("https://img.example/{}.jpg", id),
        "vod_year": year,
        "vod_content": format!("<p>{} 简介</p>", name),
        "vod_class": "剧情",
        "type_name": "国产剧",
        "vod_play_url": play_url,
    })
}

pub fn page_body(items: Vec<Value>, page_count: u32) -> Value {
    json!({
        "code": 1,
        "page": 1,
        "pagecount": page_count,
        "list": items,
    })
}

/// 首页（无 pg 参数）的响应
pub async fn mount_first_page(server: &MockServer, query: &str, body: Value) {
    Mock::given(method("GET"))
        .and(path(VOD_PATH))
        .and(query_param("ac", "videolist"))
        .and(query_param("wd", query))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

/// 指定页的响应，优先级高于首页 mock
pub async fn mount_page(server: &MockServer, query: &str, page: u32, body: Value, expected: u64) {
    Mock::given(method("GET"))
        .and(path(VOD_PATH))
        .and(query_param("wd", query))
        .and(query_param("pg", page.to_string()))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .with_priority(1)
        .expect(expected)
        .mount(server)
        .await;
}

pub fn options(max_pages: u32) -> SearchOptions {
    SearchOptions {
        timeout: Duration::from_millis(500),
        max_pages,
    }
}

pub fn aggregator(sites: Vec<ApiSite>, options: SearchOptions) -> SearchAggregator {
    SearchAggregator::new(
        SourceClient::new(SearchApiConfig::default(), ResponseCache::disabled()),
        sites,
        options,
    )
}
