use axum::{
    extract::{Query, State},
    response::IntoResponse,
};
use serde::{de, Deserialize, Deserializer, Serialize};
use std::time::Instant;

use super::response::success;
use super::AppState;
use crate::models::{ResultGroup, SearchResult};
use crate::services::group_results;

/// 搜索参数
#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub q: Option<String>,
    /// 按 (标题, 年份) 分组返回，接受 true/false、1/0、yes/no、on/off
    #[serde(default, deserialize_with = "deserialize_flag")]
    pub grouped: bool,
}

fn deserialize_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    match raw.as_deref().map(|v| v.trim().to_ascii_lowercase()).as_deref() {
        None | Some("") | Some("0") | Some("false") | Some("no") | Some("off") => Ok(false),
        Some("1") | Some("true") | Some("yes") | Some("on") => Ok(true),
        Some(other) => Err(de::Error::custom(format!("invalid boolean flag: {}", other))),
    }
}

#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub query: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub results: Option<Vec<SearchResult>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub groups: Option<Vec<ResultGroup>>,
    pub total: usize,
    pub took_ms: u64,
}

/// 多源搜索
///
/// 关键词为空时返回空列表而不是错误
pub async fn search_videos(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> impl IntoResponse {
    let start_time = Instant::now();
    let query = params.q.unwrap_or_default().trim().to_string();

    let results = state.aggregator.search(&query).await;
    let total = results.len();

    let (results, groups) = if params.grouped {
        (None, Some(group_results(results)))
    } else {
        (Some(results), None)
    };

    success(SearchResponse {
        query,
        results,
        groups,
        total,
        took_ms: start_time.elapsed().as_millis() as u64,
    })
}
