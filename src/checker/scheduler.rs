//! 检测调度器模块
//!
//! 以随机间隔不断执行页面检测，并定时输出存活日志

use crate::checker::page::PageChecker;
use crate::config::ScheduleConfig;
use crate::error::{ConfigError, Result};
use rand::Rng;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, sleep, Instant, Interval};
use tracing::{debug, error, info};

/// 两轮检测之间的随机间隔范围（毫秒，闭区间）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DelayWindow {
    min_ms: u64,
    max_ms: u64,
}

impl DelayWindow {
    /// 创建间隔范围
    ///
    /// # 参数
    /// * `min_ms` - 最小间隔
    /// * `max_ms` - 最大间隔
    ///
    /// # 返回
    /// * `Result<Self>` - 最小值大于最大值时返回错误
    pub fn new(min_ms: u64, max_ms: u64) -> Result<Self> {
        if min_ms > max_ms {
            return Err(ConfigError::ValidationError(format!(
                "检测间隔范围无效: 最小值 {}ms 大于最大值 {}ms",
                min_ms, max_ms
            ))
            .into());
        }
        Ok(Self { min_ms, max_ms })
    }

    /// 从调度配置创建
    pub fn from_config(config: &ScheduleConfig) -> Result<Self> {
        Self::new(config.min_delay_ms, config.max_delay_ms)
    }

    /// 在范围内均匀采样一个间隔
    pub fn sample(&self) -> Duration {
        let ms = rand::rng().random_range(self.min_ms..=self.max_ms);
        Duration::from_millis(ms)
    }

    /// 最小间隔
    pub fn min(&self) -> Duration {
        Duration::from_millis(self.min_ms)
    }

    /// 最大间隔
    pub fn max(&self) -> Duration {
        Duration::from_millis(self.max_ms)
    }
}

impl Default for DelayWindow {
    fn default() -> Self {
        Self {
            min_ms: 2500,
            max_ms: 3000,
        }
    }
}

/// 检测调度器
///
/// 上一轮检测（包括通知）全部完成后才会安排下一轮，两轮之间不会重叠。
pub struct CheckScheduler {
    /// 页面检测器
    checker: Arc<PageChecker>,
    /// 随机间隔范围
    window: DelayWindow,
}

impl CheckScheduler {
    /// 创建新的检测调度器
    pub fn new(checker: Arc<PageChecker>, window: DelayWindow) -> Self {
        Self { checker, window }
    }

    /// 执行一轮检测，返回到下一轮之前需要等待的时间
    ///
    /// 每轮检测在独立的任务中运行，即使发生 panic 也只影响本轮。
    pub async fn run_cycle(&self) -> Duration {
        let checker = Arc::clone(&self.checker);
        let task = tokio::spawn(async move { checker.check_once().await });

        match task.await {
            Ok(result) if result.found_active => debug!("本轮检测找到可用按钮"),
            Ok(_) => {}
            Err(e) => error!("检测任务异常退出: {}", e),
        }

        let delay = self.window.sample();
        info!("⏱️ {}ms 后再次检测", delay.as_millis());
        delay
    }

    /// 持续运行检测循环，不会主动退出
    pub async fn run(self) {
        info!(
            "启动页面检测循环: {} (间隔 {}-{}ms)",
            self.checker.target_url(),
            self.window.min().as_millis(),
            self.window.max().as_millis()
        );

        loop {
            let delay = self.run_cycle().await;
            sleep(delay).await;
        }
    }
}

/// 存活日志的计时器，第一次触发在一个完整周期之后
fn liveness_interval(period: Duration) -> Interval {
    interval_at(Instant::now() + period, period)
}

/// 启动存活日志任务，按固定间隔输出一条日志，与检测循环互不影响
pub fn spawn_liveness_logger(period: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = liveness_interval(period);
        loop {
            ticker.tick().await;
            info!("🟢 检测程序仍在运行: {}", chrono::Utc::now().to_rfc3339());
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_window() {
        let window = DelayWindow::default();
        assert_eq!(window.min(), Duration::from_millis(2500));
        assert_eq!(window.max(), Duration::from_millis(3000));
        assert_eq!(
            DelayWindow::from_config(&ScheduleConfig::default()).unwrap(),
            window
        );
    }

    #[test]
    fn test_sample_stays_in_window() {
        let window = DelayWindow::default();
        for _ in 0..2000 {
            let delay = window.sample();
            assert!(delay >= window.min() && delay <= window.max());
        }
    }

    #[test]
    fn test_degenerate_window() {
        let window = DelayWindow::new(100, 100).unwrap();
        assert_eq!(window.sample(), Duration::from_millis(100));
    }

    #[test]
    fn test_inverted_window_rejected() {
        assert!(DelayWindow::new(3000, 2500).is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_liveness_interval_has_no_immediate_tick() {
        let period = Duration::from_secs(60);
        let start = Instant::now();
        let mut ticker = liveness_interval(period);

        ticker.tick().await;
        assert!(start.elapsed() >= period);
        assert!(start.elapsed() < period * 2);

        ticker.tick().await;
        assert!(start.elapsed() >= period * 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_liveness_logger_keeps_running() {
        let handle = spawn_liveness_logger(Duration::from_secs(60));

        for _ in 0..5 {
            tokio::time::advance(Duration::from_secs(60)).await;
            tokio::task::yield_now().await;
        }

        assert!(!handle.is_finished());
        handle.abort();
    }
}
