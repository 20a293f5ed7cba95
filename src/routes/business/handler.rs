use axum::extract::{Json, Query, State};
use serde::Deserialize;

use crate::AppState;
use crate::error::{AppError, ValidationError};
use crate::providers::{BusinessDataProvider, Geocoder};
use crate::search::{BusinessQuery, ResolvedBusinesses};
use crate::utils::{ApiResponse, success_to_api_response};

// 商家搜索查询参数
#[derive(Debug, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    query: String,
    location: Option<String>,
    page: Option<u32>,
    #[serde(default)]
    bypass_cache: bool,
}

impl SearchParams {
    fn into_query(self) -> Result<BusinessQuery, ValidationError> {
        let query = self.query.trim();
        if query.is_empty() {
            return Err(ValidationError::EmptyQuery);
        }

        let page = self.page.unwrap_or(1);
        if page == 0 {
            return Err(ValidationError::InvalidPage);
        }

        Ok(BusinessQuery {
            query: query.to_string(),
            location: self.location.filter(|location| !location.trim().is_empty()),
            page,
            bypass_cache: self.bypass_cache,
        })
    }
}

// 搜索商家
pub async fn search_businesses<G, P>(
    State(state): State<AppState<G, P>>,
    Query(params): Query<SearchParams>,
) -> Result<Json<ApiResponse<ResolvedBusinesses>>, AppError>
where
    G: Geocoder + 'static,
    P: BusinessDataProvider + 'static,
{
    let query = params.into_query()?;
    let resolved = state.resolver.resolve_business_query(&query).await?;
    Ok(success_to_api_response(resolved))
}
