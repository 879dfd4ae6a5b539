use axum::{extract::State, response::IntoResponse};
use serde_json::json;

use super::response::{success, ApiResponse};
use super::AppState;

/// 健康检查端点
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let options = state.aggregator.options();

    success(json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "version": env!("CARGO_PKG_VERSION"),
        "sources": state.aggregator.sites().len(),
        "search": {
            "max_pages": options.max_pages,
            "timeout_secs": options.timeout.as_secs(),
        },
        "cache": state.external_client.get_cache_stats(),
    }))
}

/// 清空上游响应缓存
pub async fn clear_cache(State(state): State<AppState>) -> impl IntoResponse {
    state.external_client.clear_cache();
    tracing::info!("Response cache cleared");

    ApiResponse::success_with_message(
        json!({ "cache": state.external_client.get_cache_stats() }),
        "缓存已清空",
    )
}
