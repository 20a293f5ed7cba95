/// 评分分布缓存键前缀
pub const RATING_PREFIX: &str = "rating:";

/// 生成评分查询缓存键，商家ID原样使用
pub fn rating_key(business_id: &str) -> String {
    format!("{}{}", RATING_PREFIX, business_id)
}
