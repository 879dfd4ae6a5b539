use axum::{
    extract::{Query, State},
    http::header,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;

use super::error::ApiResult;
use super::AppState;
use crate::api_error;
use crate::models::{DoubanKind, DoubanResult};

const DEFAULT_PAGE_SIZE: u32 = 16;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DoubanParams {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub tag: Option<String>,
    pub page_size: Option<u32>,
    pub page_start: Option<u32>,
}

/// 豆瓣推荐列表
pub async fn get_douban_items(
    State(state): State<AppState>,
    Query(params): Query<DoubanParams>,
) -> ApiResult<impl IntoResponse> {
    let (Some(kind), Some(tag)) = (params.kind.as_deref(), params.tag.as_deref()) else {
        return Err(api_error!(BadRequest, "缺少必要参数: type 或 tag"));
    };
    let kind = DoubanKind::from_str(kind)
        .ok_or_else(|| api_error!(BadRequest, "type 参数必须是 tv 或 movie"))?;
    if tag.trim().is_empty() {
        return Err(api_error!(BadRequest, "缺少必要参数: type 或 tag"));
    }

    let list = state
        .external_client
        .douban
        .fetch_items(
            kind,
            tag,
            params.page_size.unwrap_or(DEFAULT_PAGE_SIZE),
            params.page_start.unwrap_or(0),
        )
        .await;

    let cache_control = format!("public, max-age={}", state.config.cache_time);
    Ok((
        [(header::CACHE_CONTROL, cache_control)],
        Json(DoubanResult {
            code: 200,
            message: "获取成功".to_string(),
            list,
        }),
    ))
}
