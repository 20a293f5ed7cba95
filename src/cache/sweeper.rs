use std::sync::Weak;

use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::{Duration, MissedTickBehavior};

use crate::cache::store::ResultCache;

/// 默认清理间隔（秒）
pub const DEFAULT_SWEEP_INTERVAL: u64 = 600; // 10分钟

/// 后台清理任务句柄，由进程入口持有并在退出时停止；句柄被丢弃时任务也会退出
pub struct SweeperHandle {
    shutdown: Option<oneshot::Sender<()>>,
    task: JoinHandle<()>,
}

impl SweeperHandle {
    pub(crate) fn spawn(cache: Weak<ResultCache>, interval: Duration) -> Self {
        let (shutdown, mut shutdown_rx) = oneshot::channel();

        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // 第一次 tick 立即返回，跳过
            ticker.tick().await;

            loop {
                tokio::select! {
                    _ = &mut shutdown_rx => break,
                    _ = ticker.tick() => {
                        let Some(cache) = cache.upgrade() else {
                            break;
                        };
                        let removed = cache.sweep_expired();
                        if removed > 0 {
                            tracing::debug!("Cache sweep removed {} expired entries", removed);
                        }
                    }
                }
            }

            tracing::info!("Cache sweeper stopped");
        });

        tracing::info!("Cache sweeper started, interval: {:?}", interval);
        Self {
            shutdown: Some(shutdown),
            task,
        }
    }

    /// 停止清理任务并等待其退出
    pub async fn stop(mut self) {
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(());
        }
        if let Err(e) = (&mut self.task).await {
            tracing::error!("Cache sweeper task failed: {}", e);
        }
    }
}
