use std::sync::Arc;
use std::time::Duration;

use reqwest::{StatusCode, Url};

use crate::error::ProviderError;
use crate::providers::BusinessDataProvider;
use crate::providers::models::{
    BusinessPage, BusinessRating, BusinessSearchRequest, SearchArea, SearchMode,
    UpstreamRatingResponse, UpstreamSearchResponse, map_rating_response, map_search_response,
};
use crate::throttle::RequestThrottler;

/// 基于 HTTP 的商家数据客户端，每次请求前经过节流
pub struct HttpBusinessProvider {
    http_client: reqwest::Client,
    base_url: Url,
    api_key: String,
    throttler: Arc<RequestThrottler>,
}

impl HttpBusinessProvider {
    pub fn new(
        base_url: &str,
        api_key: &str,
        timeout: Duration,
        throttler: Arc<RequestThrottler>,
    ) -> Result<Self, ProviderError> {
        let http_client = reqwest::Client::builder().timeout(timeout).build()?;
        let base_url = Url::parse(base_url).map_err(|e| {
            ProviderError::Malformed(format!("invalid base url {}: {}", base_url, e))
        })?;
        if base_url.cannot_be_a_base() {
            return Err(ProviderError::Malformed(format!(
                "base url cannot carry a path: {}",
                base_url
            )));
        }

        Ok(Self {
            http_client,
            base_url,
            api_key: api_key.to_string(),
            throttler,
        })
    }

    /// 在基础地址后追加路径段，每段单独转义
    fn endpoint(&self, segments: &[&str]) -> Result<Url, ProviderError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ProviderError::Malformed(format!("invalid base url {}", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn search_params(request: &BusinessSearchRequest) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("offset", request.offset.to_string()),
            ("limit", request.limit.to_string()),
        ];

        match &request.mode {
            SearchMode::Name(name) => params.push(("name", name.clone())),
            SearchMode::Term(term) => params.push(("term", term.clone())),
            SearchMode::Categories(categories) => {
                params.push(("categories", categories.join(",")))
            }
        }

        match &request.area {
            Some(SearchArea::Coordinates(coordinates)) => {
                params.push(("latitude", coordinates.latitude.to_string()));
                params.push(("longitude", coordinates.longitude.to_string()));
            }
            Some(SearchArea::Text(location)) => params.push(("location", location.clone())),
            None => {}
        }

        params
    }

    fn check_status(status: StatusCode) -> Result<(), ProviderError> {
        match status {
            status if status.is_success() => Ok(()),
            StatusCode::NOT_FOUND => Err(ProviderError::NotFound),
            status => Err(ProviderError::Status(status.as_u16())),
        }
    }
}

impl BusinessDataProvider for HttpBusinessProvider {
    async fn search(&self, request: &BusinessSearchRequest) -> Result<BusinessPage, ProviderError> {
        self.throttler.throttle().await;

        let url = self.endpoint(&["businesses", "search"])?;
        let response = self
            .http_client
            .get(url)
            .bearer_auth(&self.api_key)
            .query(&Self::search_params(request))
            .send()
            .await?;
        Self::check_status(response.status())?;

        let body: UpstreamSearchResponse = response.json().await?;
        Ok(map_search_response(body))
    }

    async fn rating_distribution(&self, business_id: &str) -> Result<BusinessRating, ProviderError> {
        // 空的或只有点号的 id 会被 URL 路径吞掉
        if matches!(business_id, "" | "." | "..") {
            return Err(ProviderError::NotFound);
        }
        let url = self.endpoint(&["businesses", business_id, "rating_distribution"])?;

        self.throttler.throttle().await;
        let response = self
            .http_client
            .get(url)
            .bearer_auth(&self.api_key)
            .send()
            .await?;
        Self::check_status(response.status())?;

        let body: UpstreamRatingResponse = response.json().await?;
        map_rating_response(business_id, body)
    }
}
