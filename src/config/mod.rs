use std::env;
use std::time::Duration;

use crate::optimizer::MAX_DISTRIBUTION_TOTAL;

#[derive(Debug, Clone, serde::Deserialize)]
pub struct Config {
    pub server_host: String,
    pub server_port: u16,
    pub api_base_uri: String,
    pub business_api_url: String,
    pub business_api_key: String,
    pub geocoding_api_url: String,
    pub geocoding_user_agent: String,
    pub geocoding_throttle_ms: u64,
    pub business_throttle_ms: u64,
    pub upstream_timeout_secs: u64,
    pub cache_default_ttl_secs: u64,
    pub cache_sweep_interval_secs: u64,
    pub search_hit_ttl_secs: u64,
    pub search_miss_ttl_secs: u64,
    pub search_page_size: u32,
    pub max_distribution_total: u64,
}

impl Config {
    pub fn from_env() -> Result<Self, env::VarError> {
        dotenv::dotenv().ok();

        Ok(Config {
            server_host: env::var("SERVER_HOST").unwrap_or_else(|_| "::".into()),
            server_port: parse_or("SERVER_PORT", 3000),
            api_base_uri: env::var("API_BASE_URI").unwrap_or_else(|_| "/api".into()),
            business_api_url: env::var("BUSINESS_API_URL")
                .unwrap_or_else(|_| "https://api.yelp.com/v3".into()),
            business_api_key: env::var("BUSINESS_API_KEY")?,
            geocoding_api_url: env::var("GEOCODING_API_URL")
                .unwrap_or_else(|_| "https://nominatim.openstreetmap.org".into()),
            geocoding_user_agent: env::var("GEOCODING_USER_AGENT")
                .unwrap_or_else(|_| "rating-backend/0.1".into()),
            geocoding_throttle_ms: parse_or("GEOCODING_THROTTLE_MS", 1000),
            business_throttle_ms: parse_or("BUSINESS_THROTTLE_MS", 1000),
            upstream_timeout_secs: parse_or("UPSTREAM_TIMEOUT_SECS", 10),
            cache_default_ttl_secs: parse_or("CACHE_DEFAULT_TTL_SECS", 24 * 3600),
            cache_sweep_interval_secs: parse_or("CACHE_SWEEP_INTERVAL_SECS", 600),
            search_hit_ttl_secs: parse_or("SEARCH_HIT_TTL_SECS", 6 * 3600),
            search_miss_ttl_secs: parse_or("SEARCH_MISS_TTL_SECS", 30 * 60),
            search_page_size: parse_or("SEARCH_PAGE_SIZE", 20),
            max_distribution_total: parse_or("MAX_DISTRIBUTION_TOTAL", MAX_DISTRIBUTION_TOTAL),
        })
    }

    pub fn geocoding_throttle(&self) -> Duration {
        Duration::from_millis(self.geocoding_throttle_ms)
    }

    pub fn business_throttle(&self) -> Duration {
        Duration::from_millis(self.business_throttle_ms)
    }

    pub fn upstream_timeout(&self) -> Duration {
        Duration::from_secs(self.upstream_timeout_secs)
    }

    pub fn cache_default_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_default_ttl_secs)
    }

    pub fn cache_sweep_interval(&self) -> Duration {
        Duration::from_secs(self.cache_sweep_interval_secs)
    }

    pub fn search_hit_ttl(&self) -> Duration {
        Duration::from_secs(self.search_hit_ttl_secs)
    }

    pub fn search_miss_ttl(&self) -> Duration {
        Duration::from_secs(self.search_miss_ttl_secs)
    }
}

// 环境变量缺失或无法解析时使用默认值
fn parse_or<T: std::str::FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|value| value.trim().parse().ok())
        .unwrap_or(default)
}
