use axum::extract::{Json, State};
use serde::Serialize;

use crate::AppState;
use crate::cache::CacheStats;
use crate::utils::{ApiResponse, success_to_api_response};

/// Ping响应
#[derive(Serialize)]
pub struct PingResponse {
    /// 服务状态
    pub status: String,
    /// 服务器时间
    pub timestamp: i64,
}

/// 健康检查接口
pub async fn ping() -> Json<ApiResponse<PingResponse>> {
    success_to_api_response(PingResponse {
        status: "ok".to_string(),
        timestamp: chrono::Utc::now().timestamp(),
    })
}

/// 缓存统计接口
pub async fn cache_stats<G, P>(
    State(state): State<AppState<G, P>>,
) -> Json<ApiResponse<CacheStats>>
where
    G: Send + Sync + 'static,
    P: Send + Sync + 'static,
{
    success_to_api_response(state.cache.stats())
}
