/// 缓存键模块
/// 每类资源使用互不相同的前缀，读写两端必须用同一个函数生成键

// 地理编码缓存键
pub mod geocoding_keys;

// 商家搜索缓存键
pub mod business_keys;

// 评分查询缓存键
pub mod rating_keys;

pub use business_keys::{BUSINESS_SEARCH_PREFIX, business_search_key, business_search_page_key};
pub use geocoding_keys::{GEOCODING_PREFIX, geocoding_key};
pub use rating_keys::{RATING_PREFIX, rating_key};
