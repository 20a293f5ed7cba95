use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;

use rating_backend::{
    AppState,
    cache::ResultCache,
    config::Config,
    middleware::log_errors,
    providers::{HttpBusinessProvider, HttpGeocoder},
    routes,
    search::SearchSettings,
    throttle::Throttlers,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    // 初始化日志
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // 加载配置
    let config = Config::from_env().expect("Failed to load configuration");

    // 进程内唯一的缓存实例及其清理任务
    let cache = Arc::new(ResultCache::new(config.cache_default_ttl()));
    let sweeper = cache.start_sweeper(config.cache_sweep_interval());

    // 每个上游服务一个节流器
    let throttlers = Throttlers::new(config.geocoding_throttle(), config.business_throttle());

    let geocoder = HttpGeocoder::new(
        &config.geocoding_api_url,
        &config.geocoding_user_agent,
        config.upstream_timeout(),
        throttlers.geocoding.clone(),
    )
    .expect("Failed to create geocoding client");
    let provider = HttpBusinessProvider::new(
        &config.business_api_url,
        &config.business_api_key,
        config.upstream_timeout(),
        throttlers.business.clone(),
    )
    .expect("Failed to create business data client");

    // 设置应用状态
    let state = AppState::new(
        cache.clone(),
        Arc::new(geocoder),
        Arc::new(provider),
        SearchSettings {
            page_size: config.search_page_size,
            hit_ttl: config.search_hit_ttl(),
            miss_ttl: config.search_miss_ttl(),
        },
    )
    .with_max_distribution_total(config.max_distribution_total);

    let router = routes::create_router(state, &config.api_base_uri)
        .layer(axum::middleware::from_fn(log_errors));

    // 根据编译模式决定是否添加CORS
    #[cfg(debug_assertions)]
    let router = {
        tracing::debug!("Adding CORS layer for development mode");
        router.layer(tower_http::cors::CorsLayer::permissive())
    };

    // 启动服务器
    let addr = SocketAddr::new(
        config.server_host.parse().unwrap_or_else(|_| {
            tracing::warn!("Invalid server_host, falling back to dual-stack default");
            IpAddr::V6(std::net::Ipv6Addr::UNSPECIFIED)
        }),
        config.server_port,
    );
    tracing::info!("Server listening on {}", addr);
    axum::serve(
        tokio::net::TcpListener::bind(&addr)
            .await
            .expect("Failed to bind"),
        router,
    )
    .with_graceful_shutdown(shutdown_signal())
    .await
    .expect("Failed to start server");

    if let Some(sweeper) = sweeper {
        sweeper.stop().await;
    }
    tracing::info!("Server stopped");
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
    tracing::info!("Shutdown signal received");
}
