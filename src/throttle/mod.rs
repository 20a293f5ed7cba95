// 上游请求节流
// 每个上游服务一个实例，保证相邻两次调用的间隔不小于最小间隔

use std::sync::Arc;

use tokio::sync::Mutex;
use tokio::time::{Duration, Instant};

/// 默认最小调用间隔（毫秒）
pub const DEFAULT_MIN_INTERVAL_MS: u64 = 1000;

/// 请求节流器
///
/// 等待期间持有锁，后来的调用者按顺序排队，
/// 每个调用者都基于前一个调用者更新后的时间计算等待。
#[derive(Debug)]
pub struct RequestThrottler {
    name: &'static str,
    min_interval: Duration,
    last_call: Mutex<Option<Instant>>,
}

impl RequestThrottler {
    pub fn new(name: &'static str, min_interval: Duration) -> Self {
        Self {
            name,
            min_interval,
            last_call: Mutex::new(None),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn min_interval(&self) -> Duration {
        self.min_interval
    }

    /// 等待直到距上一次放行至少经过最小间隔，然后记录本次放行时间
    pub async fn throttle(&self) {
        let mut last_call = self.last_call.lock().await;

        if let Some(previous) = *last_call {
            let ready_at = previous + self.min_interval;
            if ready_at > Instant::now() {
                tracing::debug!(
                    "Throttling {} request for {:?}",
                    self.name,
                    ready_at - Instant::now()
                );
                tokio::time::sleep_until(ready_at).await;
            }
        }

        *last_call = Some(Instant::now());
    }
}

/// 各上游服务的节流器，互不共享状态
#[derive(Debug, Clone)]
pub struct Throttlers {
    pub geocoding: Arc<RequestThrottler>,
    pub business: Arc<RequestThrottler>,
}

impl Throttlers {
    pub fn new(geocoding_interval: Duration, business_interval: Duration) -> Self {
        Self {
            geocoding: Arc::new(RequestThrottler::new("geocoding", geocoding_interval)),
            business: Arc::new(RequestThrottler::new("business", business_interval)),
        }
    }
}

impl Default for Throttlers {
    fn default() -> Self {
        let interval = Duration::from_millis(DEFAULT_MIN_INTERVAL_MS);
        Self::new(interval, interval)
    }
}
