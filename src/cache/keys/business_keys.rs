/// 商家搜索缓存键前缀
pub const BUSINESS_SEARCH_PREFIX: &str = "search:";

// 转义键中的分隔符，不同的 (query, location) 组合不会生成相同的键
fn key_component(value: &str) -> String {
    value
        .trim()
        .to_lowercase()
        .replace('%', "%25")
        .replace(':', "%3A")
}

/// 生成商家搜索缓存键
pub fn business_search_key(query: &str, location: &str) -> String {
    format!(
        "{}{}:{}",
        BUSINESS_SEARCH_PREFIX,
        key_component(query),
        key_component(location)
    )
}

/// 生成分页的商家搜索缓存键，每一页独立缓存
pub fn business_search_page_key(query: &str, location: &str, page: u32) -> String {
    format!("{}:page:{}", business_search_key(query, location), page)
}
