use axum::extract::{Json, Path, Query, State};
use serde::Deserialize;

use crate::AppState;
use crate::error::AppError;
use crate::optimizer::compute_adjustment;
use crate::providers::{BusinessDataProvider, Geocoder};
use crate::routes::adjustment::model::{AdjustmentRequest, AdjustmentResponse, validate_adjustment};
use crate::utils::{ApiResponse, success_to_api_response};

// 商家评分调整查询参数
#[derive(Debug, Deserialize)]
pub struct TargetQuery {
    target_rating: f64,
}

// 按给定分布计算调整方案
pub async fn create_adjustment<G, P>(
    State(state): State<AppState<G, P>>,
    Json(request): Json<AdjustmentRequest>,
) -> Result<Json<ApiResponse<AdjustmentResponse>>, AppError>
where
    G: Geocoder + 'static,
    P: BusinessDataProvider + 'static,
{
    let current_rating = validate_adjustment(
        &request.distribution,
        request.current_rating,
        request.target_rating,
        state.max_distribution_total,
    )?;

    let plan = compute_adjustment(&request.distribution, request.target_rating);
    tracing::debug!(
        "调整方案: {:?}, 改动 {} 条评论",
        plan.strategy,
        plan.edit_count()
    );

    Ok(success_to_api_response(AdjustmentResponse {
        business_id: None,
        current_rating,
        target_rating: request.target_rating,
        distribution: request.distribution,
        plan,
    }))
}

// 查询商家评分分布后计算调整方案
pub async fn business_adjustment<G, P>(
    State(state): State<AppState<G, P>>,
    Path(business_id): Path<String>,
    Query(query): Query<TargetQuery>,
) -> Result<Json<ApiResponse<AdjustmentResponse>>, AppError>
where
    G: Geocoder + 'static,
    P: BusinessDataProvider + 'static,
{
    let rating = state.ratings.rating_distribution(&business_id).await?;
    let current_rating = validate_adjustment(
        &rating.distribution,
        rating.reported_rating,
        query.target_rating,
        state.max_distribution_total,
    )?;

    let plan = compute_adjustment(&rating.distribution, query.target_rating);

    Ok(success_to_api_response(AdjustmentResponse {
        business_id: Some(business_id),
        current_rating,
        target_rating: query.target_rating,
        distribution: rating.distribution,
        plan,
    }))
}
