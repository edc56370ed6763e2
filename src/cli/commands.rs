//! 命令处理逻辑
//!
//! 实现各种CLI命令的处理逻辑

use crate::checker::CheckResult;
use crate::cli::args::{Args, Commands, OutputFormat};
use crate::core::service::ServiceLauncher;
use crate::error::{NotificationError, Result, WatchError};
use crate::notification::{NoOpSender, NotificationMessage, NotificationSender};
use async_trait::async_trait;
use std::sync::Arc;

/// 命令处理器trait
#[async_trait]
pub trait Command: Send + Sync {
    /// 执行命令
    async fn execute(&self, args: &Args) -> Result<()>;
}

/// 启动命令
pub struct StartCommand;

#[async_trait]
impl Command for StartCommand {
    async fn execute(&self, args: &Args) -> Result<()> {
        let config = args.load_config().await?;
        ServiceLauncher::run(config).await
    }
}

/// 单次检测命令
pub struct CheckCommand;

#[async_trait]
impl Command for CheckCommand {
    async fn execute(&self, args: &Args) -> Result<()> {
        let Commands::Check { format, notify } = args.command() else {
            return Ok(());
        };

        let config = args.load_config().await?;
        let notifier: Arc<dyn NotificationSender> = if notify {
            ServiceLauncher::create_notifier(&config)?
        } else {
            Arc::new(NoOpSender)
        };
        let components = ServiceLauncher::initialize_service_components(&config, notifier)?;

        println!("🔍 检测页面: {}", config.target.url);
        let result = components.checker.check_once().await;

        match format {
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&result)?),
            OutputFormat::Text => print_result_text(&result),
        }

        match result.error {
            Some(e) => Err(WatchError::Other(anyhow::anyhow!("页面检测失败: {}", e))),
            None => Ok(()),
        }
    }
}

/// 以文本格式输出检测结果
fn print_result_text(result: &CheckResult) {
    if let Some(ref e) = result.error {
        println!("❌ 检测失败: {e}");
        return;
    }

    for button in &result.buttons {
        println!(
            "  #{} \"{}\" {}",
            button.position(),
            button.text,
            if button.disabled { "(disabled)" } else { "" }
        );
    }

    match result.active_button() {
        Some(button) => println!("✅ 按钮 #{} 可以预约", button.position()),
        None => println!("🔁 未找到可点击的预约按钮"),
    }
}

/// 测试通知命令
pub struct TestNotificationCommand;

#[async_trait]
impl Command for TestNotificationCommand {
    async fn execute(&self, args: &Args) -> Result<()> {
        let Commands::TestNotification { message } = args.command() else {
            return Ok(());
        };

        let config = args.load_config().await?;
        let notifier = ServiceLauncher::create_notifier(&config)?;

        println!("📤 发送测试消息到会话 {}...", config.telegram.chat_id);
        let send_result = match message {
            Some(message) => {
                let body = format!(
                    "**测试时间**: {}\n**测试消息**: {}",
                    chrono::Utc::now().format("%Y-%m-%d %H:%M:%S UTC"),
                    message
                );
                notifier
                    .send_message(&NotificationMessage::new("🧪 Slot Watch 通知测试", body))
                    .await
            }
            None => notifier.test_connection().await,
        };

        match send_result {
            Ok(()) => {
                println!("✅ 测试消息发送成功");
                Ok(())
            }
            Err(e) => {
                println!("❌ 测试消息发送失败，请检查 BOT_TOKEN 和 CHAT_ID");
                Err(NotificationError::SendError(format!("{:#}", e)).into())
            }
        }
    }
}

/// 验证配置命令
pub struct ValidateCommand;

#[async_trait]
impl Command for ValidateCommand {
    async fn execute(&self, args: &Args) -> Result<()> {
        let mut config = args.load_config().await?;
        if !config.telegram.bot_token.is_empty() {
            config.telegram.bot_token = "***".to_string();
        }

        let rendered = toml::to_string_pretty(&config).map_err(|e| {
            WatchError::Other(anyhow::anyhow!("配置序列化失败: {}", e))
        })?;
        println!("✅ 配置有效");
        println!("{rendered}");
        Ok(())
    }
}
