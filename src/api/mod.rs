pub mod aggregate;
pub mod douban;
pub mod error;
pub mod health;
pub mod response;
pub mod search;

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;

use crate::{config::AppConfig, external::ExternalApiClient, services::SearchAggregator};

#[derive(Clone)]
pub struct AppState {
    pub aggregator: SearchAggregator,
    pub external_client: ExternalApiClient,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        let external_client = ExternalApiClient::new(&config);
        let aggregator = SearchAggregator::from_config(external_client.sources.clone(), &config);
        Self {
            aggregator,
            external_client,
            config: Arc::new(config),
        }
    }
}

/// 构建路由
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(|| async { "VOD Aggregator API v1.0" }))
        // Health and cache
        .route("/api/health", get(health::health_check))
        .route("/api/cache/clear", post(health::clear_cache))
        // Search
        .route("/api/search", get(search::search_videos))
        .route("/api/aggregate", get(aggregate::aggregate_video))
        // Douban
        .route("/api/douban", get(douban::get_douban_items))
        .layer(CorsLayer::permissive())
        .with_state(state)
}
