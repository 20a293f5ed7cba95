// 缓存模块
// 进程内的过期缓存，缓存地理编码、商家搜索和评分查询的上游结果

pub mod keys;
pub mod models;
pub mod store;
pub mod sweeper;

// 重新导出常用类型，方便其他模块使用
pub use models::{CacheStats, CachedKeyInfo};
pub use store::{DEFAULT_CACHE_TTL, ResultCache};
pub use sweeper::{DEFAULT_SWEEP_INTERVAL, SweeperHandle};
