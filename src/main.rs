use std::net::SocketAddr;
use std::time::Duration;

use vod_aggregator::{
    api::{self, AppState},
    config::AppConfig,
    external::CacheCleanupTask,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    // Load environment variables
    dotenv::dotenv().ok();

    // Load source configuration
    let config = AppConfig::load(AppConfig::path_from_env()).await?;
    tracing::info!(
        "{} sources configured (max pages: {}, timeout: {}s)",
        config.sites.len(),
        config.max_pages,
        config.timeout.as_secs()
    );

    let state = AppState::new(config);

    // Start cache cleanup task
    if state.external_client.cache().is_enabled() {
        let cache_cleanup_task = CacheCleanupTask::new(
            state.external_client.cache().clone(),
            Duration::from_secs(5 * 60), // 每5分钟清理一次
        );
        tokio::spawn(cache_cleanup_task.start());
        tracing::info!("📊 Cache cleanup task started (interval: 5 minutes)");
    }

    let app = api::build_router(state);

    // Run the server - 从环境变量读取配置
    let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port: u16 = std::env::var("PORT")
        .unwrap_or_else(|_| "3000".to_string())
        .parse()
        .unwrap_or(3000);

    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;
    tracing::info!("🚀 Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
