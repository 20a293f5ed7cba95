/// 缓存数据模型
pub mod entry;
pub mod search;

pub use entry::{CacheEntry, CacheStats, CachedKeyInfo};
pub use search::{CachedGeocode, CachedSearchOutcome};
