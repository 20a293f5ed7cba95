// 商家搜索
// 级联搜索策略和带缓存的评分查询

pub mod categories;
pub mod rating;
pub mod strategy;

pub use categories::categories_for_query;
pub use rating::RatingLookup;
pub use strategy::{
    BusinessQuery, CascadingResolver, ResolvedBusinesses, SearchSettings, SearchStrategy,
};
