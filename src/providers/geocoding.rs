use std::sync::Arc;
use std::time::Duration;

use crate::error::ProviderError;
use crate::providers::Geocoder;
use crate::providers::models::{GeocodeResult, UpstreamPlace, map_places};
use crate::throttle::RequestThrottler;

/// 基于 HTTP 的地理编码客户端，每次请求前经过节流
pub struct HttpGeocoder {
    http_client: reqwest::Client,
    base_url: String,
    throttler: Arc<RequestThrottler>,
}

impl HttpGeocoder {
    pub fn new(
        base_url: &str,
        user_agent: &str,
        timeout: Duration,
        throttler: Arc<RequestThrottler>,
    ) -> Result<Self, ProviderError> {
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()?;

        Ok(Self {
            http_client,
            base_url: base_url.trim_end_matches('/').to_string(),
            throttler,
        })
    }
}

impl Geocoder for HttpGeocoder {
    async fn geocode(&self, location: &str) -> Result<Option<GeocodeResult>, ProviderError> {
        self.throttler.throttle().await;

        let url = format!("{}/search", self.base_url);
        let response = self
            .http_client
            .get(&url)
            .query(&[("q", location), ("format", "json"), ("limit", "1")])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ProviderError::Status(response.status().as_u16()));
        }

        let places: Vec<UpstreamPlace> = response.json().await?;
        map_places(places)
    }
}
