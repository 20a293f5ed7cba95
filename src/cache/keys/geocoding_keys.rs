/// 地理编码缓存键前缀
pub const GEOCODING_PREFIX: &str = "geocode:";

/// 生成地理编码缓存键
pub fn geocoding_key(location: &str) -> String {
    format!("{}{}", GEOCODING_PREFIX, location.trim().to_lowercase())
}
