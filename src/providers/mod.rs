// 上游服务
// 地理编码和商家数据两类上游，各自使用独立的节流器

use crate::error::ProviderError;

pub mod business;
pub mod geocoding;
pub mod models;

pub use business::HttpBusinessProvider;
pub use geocoding::HttpGeocoder;
pub use models::{
    BusinessPage, BusinessRating, BusinessSearchRequest, BusinessSummary, Coordinates,
    GeocodeResult, SearchArea, SearchMode,
};

/// 地理编码服务：地名 -> 坐标
pub trait Geocoder: Send + Sync {
    fn geocode(
        &self,
        location: &str,
    ) -> impl Future<Output = Result<Option<GeocodeResult>, ProviderError>> + Send;
}

/// 商家数据服务
pub trait BusinessDataProvider: Send + Sync {
    fn search(
        &self,
        request: &BusinessSearchRequest,
    ) -> impl Future<Output = Result<BusinessPage, ProviderError>> + Send;

    fn rating_distribution(
        &self,
        business_id: &str,
    ) -> impl Future<Output = Result<BusinessRating, ProviderError>> + Send;
}
