use serde::{Deserialize, Serialize};

use crate::providers::models::{BusinessSummary, Coordinates};
use crate::search::SearchStrategy;

/// 搜索结果缓存数据模型，记录命中的搜索策略
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct CachedSearchOutcome {
    pub results: Vec<BusinessSummary>,
    pub strategy_used: Option<SearchStrategy>,
    pub total_count: u64,
    pub offset: u64,
}

/// 地理编码缓存数据模型
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct CachedGeocode {
    pub coordinates: Coordinates,
    pub display_name: Option<String>,
}
