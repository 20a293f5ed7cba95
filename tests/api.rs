use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode, header},
};
use rating_backend::{
    AppState,
    cache::ResultCache,
    error::ProviderError,
    optimizer::RatingDistribution,
    providers::{
        BusinessDataProvider, BusinessPage, BusinessRating, BusinessSearchRequest,
        BusinessSummary, Coordinates, GeocodeResult, Geocoder, SearchMode,
    },
    routes,
    search::SearchSettings,
    utils::error_codes,
};
use serde_json::{Value, json};
use tower::ServiceExt;

struct StubGeocoder;

impl Geocoder for StubGeocoder {
    async fn geocode(&self, _location: &str) -> Result<Option<GeocodeResult>, ProviderError> {
        Ok(Some(GeocodeResult {
            coordinates: Coordinates {
                latitude: 40.7128,
                longitude: -74.006,
            },
            display_name: Some("New York".into()),
        }))
    }
}

struct StubProvider {
    searches: AtomicUsize,
    fail_search: bool,
}

impl BusinessDataProvider for StubProvider {
    async fn search(&self, request: &BusinessSearchRequest) -> Result<BusinessPage, ProviderError> {
        self.searches.fetch_add(1, Ordering::SeqCst);
        if self.fail_search {
            return Err(ProviderError::Status(502));
        }
        match &request.mode {
            SearchMode::Term(term) => Ok(BusinessPage {
                businesses: vec![BusinessSummary {
                    id: "joes-pizza".into(),
                    name: term.clone(),
                    rating: Some(3.7),
                    review_count: 247,
                    categories: vec!["pizza".into()],
                    address: None,
                    url: None,
                    coordinates: None,
                }],
                total: 1,
            }),
            _ => Ok(BusinessPage::default()),
        }
    }

    async fn rating_distribution(&self, business_id: &str) -> Result<BusinessRating, ProviderError> {
        if business_id != "joes-pizza" {
            return Err(ProviderError::NotFound);
        }
        Ok(BusinessRating {
            business_id: business_id.to_string(),
            reported_rating: Some(3.8),
            distribution: RatingDistribution::new(18, 28, 45, 67, 89),
        })
    }
}

fn app(fail_search: bool) -> (Router, Arc<ResultCache>, Arc<StubProvider>) {
    let cache = Arc::new(ResultCache::default());
    let provider = Arc::new(StubProvider {
        searches: AtomicUsize::new(0),
        fail_search,
    });
    let state = AppState::new(
        cache.clone(),
        Arc::new(StubGeocoder),
        provider.clone(),
        SearchSettings::default(),
    );
    (routes::create_router(state, "/api"), cache, provider)
}

async fn send(router: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = router.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn ping_reports_ok() {
    let (router, _, _) = app(false);
    let (status, body) = send(router, get("/api/ping")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["code"], error_codes::SUCCESS);
    assert_eq!(body["resp_data"]["status"], "ok");
}

#[tokio::test]
async fn adjustment_for_posted_distribution() {
    let (router, _, _) = app(false);
    let request = post_json(
        "/api/adjustments",
        json!({
            "distribution": {"1": 18, "2": 28, "3": 45, "4": 67, "5": 89},
            "current_rating": 3.8,
            "target_rating": 4.0
        }),
    );

    let (status, body) = send(router, request).await;

    assert_eq!(status, StatusCode::OK);
    let data = &body["resp_data"];
    assert_eq!(data["current_rating"], 3.73);
    assert_eq!(data["plan"]["strategy"], "remove");
    assert_eq!(data["plan"]["removals"]["1"], 18);
    assert_eq!(data["plan"]["removals"]["2"], 6);
    assert_eq!(data["plan"]["additions"], 0);
    assert_eq!(data["plan"]["projected_rating"], 4.0);
}

#[tokio::test]
async fn adjustment_rejects_target_below_current() {
    let (router, _, _) = app(false);
    let request = post_json(
        "/api/adjustments",
        json!({
            "distribution": {"4": 1, "5": 1},
            "target_rating": 4.0
        }),
    );

    let (status, body) = send(router, request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], error_codes::VALIDATION_ERROR);
}

#[tokio::test]
async fn adjustment_rejects_oversized_distribution() {
    let (router, _, _) = app(false);
    let request = post_json(
        "/api/adjustments",
        json!({
            "distribution": {"1": 4294967295u32, "2": 4294967295u32, "5": 1},
            "target_rating": 5.0
        }),
    );

    let (status, body) = send(router, request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], error_codes::VALIDATION_ERROR);
}

#[tokio::test]
async fn adjustment_limit_is_configurable() {
    let state = AppState::new(
        Arc::new(ResultCache::default()),
        Arc::new(StubGeocoder),
        Arc::new(StubProvider {
            searches: AtomicUsize::new(0),
            fail_search: false,
        }),
        SearchSettings::default(),
    )
    .with_max_distribution_total(10);
    let router = routes::create_router(state, "/api");

    let body = json!({
        "distribution": {"1": 6, "5": 5},
        "target_rating": 4.0
    });
    let (status, _) = send(router.clone(), post_json("/api/adjustments", body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let body = json!({
        "distribution": {"1": 5, "5": 5},
        "target_rating": 4.0
    });
    let (status, _) = send(router, post_json("/api/adjustments", body)).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn business_adjustment_uses_cached_rating() {
    let (router, cache, _) = app(false);

    let (status, body) = send(
        router.clone(),
        get("/api/businesses/joes-pizza/adjustment?target_rating=4.0"),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["resp_data"]["business_id"], "joes-pizza");
    assert_eq!(body["resp_data"]["plan"]["removals"]["1"], 18);
    assert!(cache.has("rating:joes-pizza"));

    let (status, body) = send(router, get("/api/businesses/unknown/adjustment?target_rating=4.0")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], error_codes::NOT_FOUND);
}

#[tokio::test]
async fn search_resolves_through_description() {
    let (router, cache, provider) = app(false);

    let uri = "/api/businesses/search?query=Joe%27s%20Pizza&location=New%20York";
    let (status, body) = send(router.clone(), get(uri)).await;

    assert_eq!(status, StatusCode::OK);
    let data = &body["resp_data"];
    assert_eq!(data["strategy_used"], "description");
    assert_eq!(data["count"], 1);
    assert_eq!(data["offset"], 0);
    assert_eq!(data["results"][0]["id"], "joes-pizza");
    assert_eq!(provider.searches.load(Ordering::SeqCst), 2);

    let (_, again) = send(router, get(uri)).await;
    assert_eq!(again["resp_data"], body["resp_data"]);
    assert_eq!(provider.searches.load(Ordering::SeqCst), 2);
    assert_eq!(cache.keys_with_prefix("geocode:"), vec!["geocode:new york"]);
}

#[tokio::test]
async fn search_validates_parameters() {
    let (router, _, _) = app(false);

    let (status, _) = send(router.clone(), get("/api/businesses/search?query=%20")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(router, get("/api/businesses/search?query=pizza&page=0")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn search_reports_upstream_failure() {
    let (router, cache, _) = app(true);

    let (status, body) = send(router, get("/api/businesses/search?query=pizza")).await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["code"], error_codes::UPSTREAM_ERROR);
    assert!(cache.keys_with_prefix("search:").is_empty());
}

#[tokio::test]
async fn cache_stats_lists_live_keys() {
    let (router, cache, _) = app(false);
    cache.set("rating:abc", &1, None);

    let (status, body) = send(router, get("/api/cache/stats")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["resp_data"]["size"], 1);
    assert_eq!(body["resp_data"]["keys"][0]["key"], "rating:abc");
}
