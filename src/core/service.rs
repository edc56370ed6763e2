//! 服务管理模块
//!
//! 负责组件初始化、后台任务启动和生命周期管理

use crate::checker::{spawn_liveness_logger, CheckScheduler, DelayWindow, PageChecker};
use crate::config::Config;
use crate::error::Result;
use crate::notification::{NotificationSender, TelegramSender};
use crate::snapshot::{create_snapshot_store, SnapshotStore};
use crate::web::HealthServer;
use std::sync::Arc;
use std::time::Duration;
use tokio::signal;
use tokio::task::JoinHandle;
use tracing::{error, info};

/// 服务组件结构
pub struct ServiceComponents {
    /// 页面快照存储，检测器写入、HTTP服务器读取
    pub snapshot: Arc<dyn SnapshotStore>,
    /// 页面检测器
    pub checker: Arc<PageChecker>,
}

/// 服务启动器
pub struct ServiceLauncher;

impl ServiceLauncher {
    /// 初始化服务组件
    ///
    /// # 参数
    /// * `config` - 生效的配置
    /// * `notifier` - 通知发送器
    pub fn initialize_service_components(
        config: &Config,
        notifier: Arc<dyn NotificationSender>,
    ) -> Result<ServiceComponents> {
        info!("初始化服务组件...");

        let snapshot = create_snapshot_store(&config.snapshot);
        let checker = Arc::new(PageChecker::new(
            &config.target,
            config.telegram.title.clone(),
            notifier,
            Arc::clone(&snapshot),
        )?);

        Ok(ServiceComponents { snapshot, checker })
    }

    /// 创建 Telegram 通知发送器
    pub fn create_notifier(config: &Config) -> Result<Arc<dyn NotificationSender>> {
        Ok(Arc::new(TelegramSender::new(&config.telegram)?))
    }

    /// 启动检测循环、存活日志和HTTP服务器，直到收到中断信号
    pub async fn run(config: Config) -> Result<()> {
        let window = DelayWindow::from_config(&config.schedule)?;
        let notifier = Self::create_notifier(&config)?;
        let components = Self::initialize_service_components(&config, notifier)?;

        // 存活探测服务器失败（包括端口被占用）只记录日志，检测循环照常运行
        let server = HealthServer::new(config.server.clone(), Arc::clone(&components.snapshot));
        let server_handle = tokio::spawn(async move {
            if let Err(e) = server.run().await {
                error!("HTTP服务器运行失败: {}", e);
            }
        });

        let liveness_handle =
            spawn_liveness_logger(Duration::from_millis(config.schedule.liveness_interval_ms));

        let scheduler = CheckScheduler::new(Arc::clone(&components.checker), window);
        let scheduler_handle = tokio::spawn(scheduler.run());

        Self::handle_shutdown(vec![scheduler_handle, liveness_handle, server_handle]).await
    }

    /// 等待中断信号并停止后台任务
    async fn handle_shutdown(handles: Vec<JoinHandle<()>>) -> Result<()> {
        info!("服务已启动，按 Ctrl+C 停止");

        signal::ctrl_c().await?;
        info!("收到中断信号，正在停止服务...");

        for handle in handles {
            handle.abort();
        }

        info!("服务已停止");
        Ok(())
    }
}
