use std::sync::Arc;

use cache::ResultCache;
use optimizer::MAX_DISTRIBUTION_TOTAL;
use providers::{BusinessDataProvider, Geocoder};
use search::{CascadingResolver, RatingLookup, SearchSettings};

pub mod cache;
pub mod config;
pub mod error;
pub mod middleware;
pub mod optimizer;
pub mod providers;
pub mod routes;
pub mod search;
pub mod throttle;
pub mod utils;

/// 应用状态，缓存由进程入口创建后注入
pub struct AppState<G, P> {
    pub cache: Arc<ResultCache>,
    pub resolver: Arc<CascadingResolver<G, P>>,
    pub ratings: Arc<RatingLookup<P>>,
    /// 调整计算接受的评论总数上限
    pub max_distribution_total: u64,
}

impl<G, P> Clone for AppState<G, P> {
    fn clone(&self) -> Self {
        Self {
            cache: self.cache.clone(),
            resolver: self.resolver.clone(),
            ratings: self.ratings.clone(),
            max_distribution_total: self.max_distribution_total,
        }
    }
}

impl<G: Geocoder, P: BusinessDataProvider> AppState<G, P> {
    pub fn new(
        cache: Arc<ResultCache>,
        geocoder: Arc<G>,
        provider: Arc<P>,
        settings: SearchSettings,
    ) -> Self {
        Self {
            resolver: Arc::new(CascadingResolver::new(
                cache.clone(),
                geocoder,
                provider.clone(),
                settings,
            )),
            ratings: Arc::new(RatingLookup::new(cache.clone(), provider)),
            cache,
            max_distribution_total: MAX_DISTRIBUTION_TOTAL,
        }
    }

    pub fn with_max_distribution_total(mut self, max_total: u64) -> Self {
        self.max_distribution_total = max_total;
        self
    }
}
