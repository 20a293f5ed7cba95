use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::cache::ResultCache;
use crate::cache::keys::{business_search_page_key, geocoding_key};
use crate::cache::models::{CachedGeocode, CachedSearchOutcome};
use crate::error::{ProviderError, SearchError};
use crate::providers::{
    BusinessDataProvider, BusinessSearchRequest, BusinessSummary, Geocoder, SearchArea,
    SearchMode,
};
use crate::search::categories::categories_for_query;

/// 搜索策略，按固定顺序依次尝试
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchStrategy {
    /// 按名称匹配
    Title,
    /// 按描述全文匹配
    Description,
    /// 按关键词对应的分类匹配
    Category,
}

impl SearchStrategy {
    pub const ORDER: [SearchStrategy; 3] = [
        SearchStrategy::Title,
        SearchStrategy::Description,
        SearchStrategy::Category,
    ];

    /// 生成上游搜索方式；分类策略在没有匹配分类时跳过
    fn mode_for(self, query: &str) -> Option<SearchMode> {
        match self {
            SearchStrategy::Title => Some(SearchMode::Name(query.to_string())),
            SearchStrategy::Description => Some(SearchMode::Term(query.to_string())),
            SearchStrategy::Category => {
                let categories = categories_for_query(query);
                if categories.is_empty() {
                    None
                } else {
                    Some(SearchMode::Categories(
                        categories.into_iter().map(String::from).collect(),
                    ))
                }
            }
        }
    }
}

/// 搜索参数
#[derive(Debug, Clone)]
pub struct SearchSettings {
    pub page_size: u32,
    /// 有结果时的缓存时间
    pub hit_ttl: Duration,
    /// 无结果时的缓存时间
    pub miss_ttl: Duration,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            page_size: 20,
            hit_ttl: Duration::from_secs(6 * 3600),
            miss_ttl: Duration::from_secs(30 * 60),
        }
    }
}

/// 商家查询
#[derive(Debug, Clone)]
pub struct BusinessQuery {
    pub query: String,
    pub location: Option<String>,
    /// 页码，从1开始
    pub page: u32,
    pub bypass_cache: bool,
}

/// 商家查询结果
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedBusinesses {
    pub results: Vec<BusinessSummary>,
    pub strategy_used: Option<SearchStrategy>,
    pub total_count: u64,
    pub offset: u64,
    pub count: usize,
}

impl From<CachedSearchOutcome> for ResolvedBusinesses {
    fn from(outcome: CachedSearchOutcome) -> Self {
        Self {
            count: outcome.results.len(),
            results: outcome.results,
            strategy_used: outcome.strategy_used,
            total_count: outcome.total_count,
            offset: outcome.offset,
        }
    }
}

/// 级联搜索：名称 -> 描述 -> 分类，第一个有结果的策略生效
pub struct CascadingResolver<G, P> {
    cache: Arc<ResultCache>,
    geocoder: Arc<G>,
    provider: Arc<P>,
    settings: SearchSettings,
}

impl<G: Geocoder, P: BusinessDataProvider> CascadingResolver<G, P> {
    pub fn new(
        cache: Arc<ResultCache>,
        geocoder: Arc<G>,
        provider: Arc<P>,
        settings: SearchSettings,
    ) -> Self {
        Self {
            cache,
            geocoder,
            provider,
            settings,
        }
    }

    /// 解析商家查询
    ///
    /// 缓存命中时直接返回，不再尝试任何策略。
    /// 单个策略的上游错误只记录日志并继续下一个策略；
    /// 所有策略都报错时返回错误且不写缓存，有策略正常返回空结果时缓存空结果。
    pub async fn resolve_business_query(
        &self,
        query: &BusinessQuery,
    ) -> Result<ResolvedBusinesses, SearchError> {
        let location = query.location.as_deref().unwrap_or("");
        let key = business_search_page_key(&query.query, location, query.page);

        if !query.bypass_cache {
            if let Some(cached) = self.cache.get::<CachedSearchOutcome>(&key) {
                return Ok(cached.into());
            }
        }

        let area = self.resolve_area(location).await;
        let offset = query.page.saturating_sub(1) as u64 * self.settings.page_size as u64;

        let mut last_error: Option<ProviderError> = None;
        let mut any_answered = false;

        for strategy in SearchStrategy::ORDER {
            let Some(mode) = strategy.mode_for(&query.query) else {
                tracing::debug!("No categories match query '{}', skipping", query.query);
                continue;
            };

            let request = BusinessSearchRequest {
                mode,
                area: area.clone(),
                offset,
                limit: self.settings.page_size,
            };

            match self.provider.search(&request).await {
                Ok(page) if !page.businesses.is_empty() => {
                    tracing::info!(
                        "Query '{}' resolved by {:?} strategy with {} results",
                        query.query,
                        strategy,
                        page.businesses.len()
                    );
                    let outcome = CachedSearchOutcome {
                        results: page.businesses,
                        strategy_used: Some(strategy),
                        total_count: page.total,
                        offset,
                    };
                    self.cache.set(&key, &outcome, Some(self.settings.hit_ttl));
                    return Ok(outcome.into());
                }
                Ok(_) => {
                    any_answered = true;
                    tracing::debug!("{:?} strategy found nothing for '{}'", strategy, query.query);
                }
                Err(e) => {
                    tracing::warn!(
                        "{:?} strategy failed for '{}', falling through: {}",
                        strategy,
                        query.query,
                        e
                    );
                    last_error = Some(e);
                }
            }
        }

        // 所有策略都请求失败属于上游错误，返回错误且不缓存；
        // 只有上游确实回答了“没有结果”时才缓存空结果
        if let (false, Some(e)) = (any_answered, last_error) {
            return Err(SearchError::AllStrategiesFailed(e));
        }

        tracing::info!("Query '{}' has no results", query.query);
        let outcome = CachedSearchOutcome {
            results: Vec::new(),
            strategy_used: None,
            total_count: 0,
            offset,
        };
        self.cache.set(&key, &outcome, Some(self.settings.miss_ttl));
        Ok(outcome.into())
    }

    /// 地名转搜索区域，地理编码失败时退回原始地名
    async fn resolve_area(&self, location: &str) -> Option<SearchArea> {
        let location = location.trim();
        if location.is_empty() {
            return None;
        }

        let key = geocoding_key(location);
        if let Some(cached) = self.cache.get::<CachedGeocode>(&key) {
            return Some(SearchArea::Coordinates(cached.coordinates));
        }

        match self.geocoder.geocode(location).await {
            Ok(Some(result)) => {
                let cached = CachedGeocode {
                    coordinates: result.coordinates,
                    display_name: result.display_name,
                };
                self.cache.set(&key, &cached, None);
                Some(SearchArea::Coordinates(result.coordinates))
            }
            Ok(None) => {
                tracing::debug!("地理编码无结果: {}", location);
                Some(SearchArea::Text(location.to_string()))
            }
            Err(e) => {
                tracing::warn!("地理编码失败: {}, error: {}", location, e);
                Some(SearchArea::Text(location.to_string()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use parking_lot::Mutex;

    use super::*;
    use crate::providers::models::{BusinessPage, BusinessRating, Coordinates, GeocodeResult};

    #[derive(Clone, Copy)]
    enum Outcome {
        Found,
        Empty,
        Fail,
    }

    struct FakeProvider {
        title: Outcome,
        description: Outcome,
        category: Outcome,
        requests: Mutex<Vec<BusinessSearchRequest>>,
    }

    impl FakeProvider {
        fn new(title: Outcome, description: Outcome, category: Outcome) -> Self {
            Self {
                title,
                description,
                category,
                requests: Mutex::new(Vec::new()),
            }
        }

        fn calls(&self) -> usize {
            self.requests.lock().len()
        }
    }

    fn business(id: &str) -> BusinessSummary {
        BusinessSummary {
            id: id.to_string(),
            name: id.to_string(),
            rating: Some(4.0),
            review_count: 10,
            categories: Vec::new(),
            address: None,
            url: None,
            coordinates: None,
        }
    }

    impl BusinessDataProvider for FakeProvider {
        async fn search(
            &self,
            request: &BusinessSearchRequest,
        ) -> Result<BusinessPage, ProviderError> {
            self.requests.lock().push(request.clone());
            let (outcome, id) = match request.mode {
                SearchMode::Name(_) => (self.title, "by-title"),
                SearchMode::Term(_) => (self.description, "by-description"),
                SearchMode::Categories(_) => (self.category, "by-category"),
            };
            match outcome {
                Outcome::Found => Ok(BusinessPage {
                    businesses: vec![business(id)],
                    total: 41,
                }),
                Outcome::Empty => Ok(BusinessPage::default()),
                Outcome::Fail => Err(ProviderError::Status(503)),
            }
        }

        async fn rating_distribution(
            &self,
            _business_id: &str,
        ) -> Result<BusinessRating, ProviderError> {
            Err(ProviderError::NotFound)
        }
    }

    struct FakeGeocoder {
        fail: bool,
        calls: AtomicUsize,
    }

    impl FakeGeocoder {
        fn new(fail: bool) -> Self {
            Self {
                fail,
                calls: AtomicUsize::new(0),
            }
        }
    }

    impl Geocoder for FakeGeocoder {
        async fn geocode(&self, _location: &str) -> Result<Option<GeocodeResult>, ProviderError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(ProviderError::Status(500));
            }
            Ok(Some(GeocodeResult {
                coordinates: Coordinates {
                    latitude: 40.7,
                    longitude: -74.0,
                },
                display_name: None,
            }))
        }
    }

    fn resolver(
        provider: FakeProvider,
        geocoder: FakeGeocoder,
    ) -> (
        CascadingResolver<FakeGeocoder, FakeProvider>,
        Arc<FakeProvider>,
        Arc<FakeGeocoder>,
        Arc<ResultCache>,
    ) {
        let cache = Arc::new(ResultCache::default());
        let provider = Arc::new(provider);
        let geocoder = Arc::new(geocoder);
        let resolver = CascadingResolver::new(
            cache.clone(),
            geocoder.clone(),
            provider.clone(),
            SearchSettings::default(),
        );
        (resolver, provider, geocoder, cache)
    }

    fn query(text: &str, page: u32) -> BusinessQuery {
        BusinessQuery {
            query: text.to_string(),
            location: Some("New York".to_string()),
            page,
            bypass_cache: false,
        }
    }

    #[tokio::test]
    async fn title_match_stops_the_cascade() {
        let (resolver, provider, _, _) = resolver(
            FakeProvider::new(Outcome::Found, Outcome::Found, Outcome::Found),
            FakeGeocoder::new(false),
        );

        let resolved = resolver
            .resolve_business_query(&query("pizza place", 1))
            .await
            .unwrap();

        assert_eq!(resolved.strategy_used, Some(SearchStrategy::Title));
        assert_eq!(resolved.results[0].id, "by-title");
        assert_eq!(resolved.count, 1);
        assert_eq!(resolved.total_count, 41);
        assert_eq!(provider.calls(), 1);
    }

    #[tokio::test]
    async fn falls_through_errors_and_empty_results() {
        let (resolver, provider, _, _) = resolver(
            FakeProvider::new(Outcome::Fail, Outcome::Empty, Outcome::Found),
            FakeGeocoder::new(false),
        );

        let resolved = resolver
            .resolve_business_query(&query("Luigi's Pizzeria", 2))
            .await
            .unwrap();

        assert_eq!(resolved.strategy_used, Some(SearchStrategy::Category));
        assert_eq!(resolved.offset, 20);

        let requests = provider.requests.lock();
        assert_eq!(requests.len(), 3);
        assert_eq!(
            requests[2].mode,
            SearchMode::Categories(vec!["pizza".to_string()])
        );
        assert_eq!(
            requests[2].area,
            Some(SearchArea::Coordinates(Coordinates {
                latitude: 40.7,
                longitude: -74.0
            }))
        );
    }

    #[tokio::test]
    async fn cache_hit_short_circuits() {
        let (resolver, provider, geocoder, _) = resolver(
            FakeProvider::new(Outcome::Empty, Outcome::Found, Outcome::Found),
            FakeGeocoder::new(false),
        );

        let first = resolver
            .resolve_business_query(&query("Joe's", 1))
            .await
            .unwrap();
        let second = resolver
            .resolve_business_query(&query("  joe's ", 1))
            .await
            .unwrap();

        assert_eq!(first, second);
        assert_eq!(provider.calls(), 2);
        assert_eq!(geocoder.calls.load(Ordering::SeqCst), 1);

        let mut bypass = query("Joe's", 1);
        bypass.bypass_cache = true;
        resolver.resolve_business_query(&bypass).await.unwrap();
        assert_eq!(provider.calls(), 4);
        // 地理编码结果仍然来自缓存
        assert_eq!(geocoder.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn pages_are_cached_independently() {
        let (resolver, provider, _, cache) = resolver(
            FakeProvider::new(Outcome::Found, Outcome::Found, Outcome::Found),
            FakeGeocoder::new(false),
        );

        resolver.resolve_business_query(&query("Joe's", 1)).await.unwrap();
        resolver.resolve_business_query(&query("Joe's", 2)).await.unwrap();

        assert_eq!(provider.calls(), 2);
        assert_eq!(cache.keys_with_prefix("search:").len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn empty_result_is_cached_briefly() {
        let (resolver, provider, _, _) = resolver(
            FakeProvider::new(Outcome::Empty, Outcome::Empty, Outcome::Empty),
            FakeGeocoder::new(false),
        );

        let resolved = resolver
            .resolve_business_query(&query("Acme Holdings", 1))
            .await
            .unwrap();
        assert!(resolved.results.is_empty());
        assert_eq!(resolved.strategy_used, None);
        // 没有匹配的分类，只尝试两个策略
        assert_eq!(provider.calls(), 2);

        resolver
            .resolve_business_query(&query("Acme Holdings", 1))
            .await
            .unwrap();
        assert_eq!(provider.calls(), 2);

        tokio::time::advance(SearchSettings::default().miss_ttl).await;
        resolver
            .resolve_business_query(&query("Acme Holdings", 1))
            .await
            .unwrap();
        assert_eq!(provider.calls(), 4);
    }

    #[tokio::test]
    async fn all_failures_are_reported_and_not_cached() {
        let (resolver, provider, _, cache) = resolver(
            FakeProvider::new(Outcome::Fail, Outcome::Fail, Outcome::Fail),
            FakeGeocoder::new(false),
        );

        let result = resolver.resolve_business_query(&query("sushi", 1)).await;

        assert!(matches!(result, Err(SearchError::AllStrategiesFailed(_))));
        assert_eq!(provider.calls(), 3);
        assert!(cache.keys_with_prefix("search:").is_empty());
    }

    #[tokio::test]
    async fn geocoding_failure_falls_back_to_text() {
        let (resolver, provider, _, cache) = resolver(
            FakeProvider::new(Outcome::Found, Outcome::Found, Outcome::Found),
            FakeGeocoder::new(true),
        );

        resolver.resolve_business_query(&query("Joe's", 1)).await.unwrap();

        assert_eq!(
            provider.requests.lock()[0].area,
            Some(SearchArea::Text("New York".to_string()))
        );
        assert!(cache.keys_with_prefix("geocode:").is_empty());
    }
}
