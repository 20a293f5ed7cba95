use axum::{
    Router,
    routing::{get, post},
};

use crate::AppState;
use crate::providers::{BusinessDataProvider, Geocoder};

pub mod adjustment;
pub mod business;
pub mod status;

/// 创建主路由，`base_uri` 为空或 "/" 时不加前缀
pub fn create_router<G, P>(state: AppState<G, P>, base_uri: &str) -> Router
where
    G: Geocoder + 'static,
    P: BusinessDataProvider + 'static,
{
    let routes = Router::new()
        .route("/ping", get(status::ping))
        .route("/cache/stats", get(status::cache_stats::<G, P>))
        .route("/adjustments", post(adjustment::create_adjustment::<G, P>))
        .route(
            "/businesses/search",
            get(business::search_businesses::<G, P>),
        )
        .route(
            "/businesses/{business_id}/adjustment",
            get(adjustment::business_adjustment::<G, P>),
        );

    let base_uri = base_uri.trim_end_matches('/');
    let router = if base_uri.is_empty() {
        Router::new().merge(routes)
    } else {
        Router::new().nest(base_uri, routes)
    };

    router.with_state(state)
}
