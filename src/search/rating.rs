use std::sync::Arc;

use crate::cache::ResultCache;
use crate::cache::keys::rating_key;
use crate::error::ProviderError;
use crate::providers::{BusinessDataProvider, BusinessRating};

/// 带缓存的评分分布查询
pub struct RatingLookup<P> {
    cache: Arc<ResultCache>,
    provider: Arc<P>,
}

impl<P: BusinessDataProvider> RatingLookup<P> {
    pub fn new(cache: Arc<ResultCache>, provider: Arc<P>) -> Self {
        Self { cache, provider }
    }

    /// 获取商家评分分布，优先读缓存，未命中时请求上游并写入缓存
    pub async fn rating_distribution(
        &self,
        business_id: &str,
    ) -> Result<BusinessRating, ProviderError> {
        let key = rating_key(business_id);
        if let Some(cached) = self.cache.get::<BusinessRating>(&key) {
            return Ok(cached);
        }

        let rating = self.provider.rating_distribution(business_id).await?;
        self.cache.set(&key, &rating, None);
        Ok(rating)
    }
}
