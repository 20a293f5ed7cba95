use axum::Json;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::utils::{ApiResponse, error_codes};

/// 上游服务错误
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("上游请求失败: {0}")]
    Http(#[from] reqwest::Error),

    #[error("上游返回状态码 {0}")]
    Status(u16),

    #[error("上游数据格式错误: {0}")]
    Malformed(String),

    #[error("上游未找到资源")]
    NotFound,
}

/// 商家搜索错误，只有所有搜索策略都失败时才返回
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    #[error("所有搜索策略均失败, 最后一次错误: {0}")]
    AllStrategiesFailed(#[source] ProviderError),
}

/// 请求参数校验错误
#[derive(Debug, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("目标评分必须在0到5之间: {0}")]
    TargetOutOfRange(f64),

    #[error("目标评分 {target} 必须高于当前评分 {current}")]
    TargetNotAboveCurrent { target: f64, current: f64 },

    #[error("评分分布为空")]
    EmptyDistribution,

    #[error("评论总数 {total} 超过上限 {max}")]
    DistributionTooLarge { total: u64, max: u64 },

    #[error("坐标无效: {latitude}, {longitude}")]
    InvalidCoordinates { latitude: f64, longitude: f64 },

    #[error("搜索关键词不能为空")]
    EmptyQuery,

    #[error("页码必须从1开始")]
    InvalidPage,
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Search(#[from] SearchError),

    #[error(transparent)]
    Provider(#[from] ProviderError),
}

impl AppError {
    fn code(&self) -> i32 {
        match self {
            AppError::Validation(_) => error_codes::VALIDATION_ERROR,
            AppError::Provider(ProviderError::NotFound) => error_codes::NOT_FOUND,
            AppError::Search(_) | AppError::Provider(_) => error_codes::UPSTREAM_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Provider(ProviderError::NotFound) => StatusCode::NOT_FOUND,
            AppError::Search(_) | AppError::Provider(_) => StatusCode::BAD_GATEWAY,
        };

        if status.is_server_error() {
            tracing::error!("请求失败: {}", self);
        }

        let body = Json(ApiResponse::<()> {
            code: self.code(),
            msg: self.to_string(),
            resp_data: None,
        });

        (status, body).into_response()
    }
}
