//! 通知发送器模块
//!
//! 定义通知发送的trait和基础实现

use anyhow::Result;
use async_trait::async_trait;
use tracing::error;

/// 通知消息结构
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationMessage {
    /// 消息标题
    pub title: String,
    /// 消息内容
    pub body: String,
}

impl NotificationMessage {
    /// 创建新的通知消息
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
        }
    }
}

/// 通知发送器trait
#[async_trait]
pub trait NotificationSender: Send + Sync {
    /// 发送消息，发送失败时返回错误
    ///
    /// # 参数
    /// * `message` - 通知消息
    ///
    /// # 返回
    /// * `Result<()>` - 发送结果
    async fn send_message(&self, message: &NotificationMessage) -> Result<()>;

    /// 测试连接
    ///
    /// # 返回
    /// * `Result<()>` - 测试结果
    async fn test_connection(&self) -> Result<()>;

    /// 发送通知，失败只记录日志，不向调用方传播
    ///
    /// # 参数
    /// * `title` - 通知标题
    /// * `body` - 通知内容
    ///
    /// # 返回
    /// * `bool` - 是否发送成功
    async fn notify(&self, title: &str, body: &str) -> bool {
        let message = NotificationMessage::new(title, body);
        match self.send_message(&message).await {
            Ok(()) => true,
            Err(e) => {
                error!("发送通知失败: {:#}", e);
                false
            }
        }
    }
}

/// 空的通知发送器实现（用于测试或禁用通知）
pub struct NoOpSender;

#[async_trait]
impl NotificationSender for NoOpSender {
    async fn send_message(&self, _message: &NotificationMessage) -> Result<()> {
        // 不执行任何操作
        Ok(())
    }

    async fn test_connection(&self) -> Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FailingSender;

    #[async_trait]
    impl NotificationSender for FailingSender {
        async fn send_message(&self, _message: &NotificationMessage) -> Result<()> {
            Err(anyhow::anyhow!("connection reset"))
        }

        async fn test_connection(&self) -> Result<()> {
            Err(anyhow::anyhow!("connection reset"))
        }
    }

    #[tokio::test]
    async fn test_noop_sender_reports_success() {
        assert!(NoOpSender.notify("title", "body").await);
    }

    #[tokio::test]
    async fn test_notify_swallows_send_errors() {
        assert!(!FailingSender.notify("title", "body").await);
    }
}
