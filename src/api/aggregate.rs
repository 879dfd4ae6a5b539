use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::error::ApiResult;
use super::response::success;
use super::AppState;
use crate::api_error;
use crate::models::{PlaySource, ReconciledView, Resolution};

/// 聚合参数
#[derive(Debug, Deserialize)]
pub struct AggregateParams {
    pub q: Option<String>,
    pub title: Option<String>,
    pub year: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct AggregateResponse {
    #[serde(flatten)]
    pub view: ReconciledView,
    pub sources: Vec<PlaySource>,
}

impl From<ReconciledView> for AggregateResponse {
    fn from(view: ReconciledView) -> Self {
        let sources = view.play_sources();
        Self { view, sources }
    }
}

/// 精确匹配并合并多个源
///
/// 唯一分组返回合并视图；多个分组返回 300 并指向列表页
pub async fn aggregate_video(
    State(state): State<AppState>,
    Query(params): Query<AggregateParams>,
) -> ApiResult<Response> {
    let query = params.q.as_deref().map(str::trim).unwrap_or_default();
    if query.is_empty() {
        return Err(api_error!(BadRequest, "缺少搜索关键词"));
    }

    let resolution = state
        .aggregator
        .resolve_exact(query, params.title.as_deref(), params.year.as_deref())
        .await;

    match resolution {
        Resolution::Merged(view) => {
            tracing::info!(
                "Aggregated \"{}\" from {} sources",
                view.title,
                view.members.len()
            );
            Ok(success(AggregateResponse::from(view)).into_response())
        }
        Resolution::Ambiguous { query } => {
            let redirect = format!("/api/search?q={}", urlencoding::encode(&query));
            let body = Json(json!({
                "success": true,
                "data": {
                    "status": "ambiguous",
                    "query": query,
                    "redirect": redirect,
                }
            }));
            Ok((StatusCode::MULTIPLE_CHOICES, body).into_response())
        }
        Resolution::NotFound => Err(api_error!(NotFound, format!("未找到匹配结果: {}", query))),
    }
}
