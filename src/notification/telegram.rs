//! Telegram通知发送器模块
//!
//! 通过 Telegram Bot API 的 sendMessage 接口发送通知

use crate::config::TelegramConfig;
use crate::error::NotificationError;
use crate::notification::sender::{NotificationMessage, NotificationSender};
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};
use std::time::Duration;
use tracing::{debug, info};

/// Telegram通知发送器
pub struct TelegramSender {
    /// HTTP客户端
    client: Client,
    /// Bot API 地址
    api_base_url: String,
    /// Bot token
    bot_token: String,
    /// 目标会话ID
    chat_id: String,
}

impl TelegramSender {
    /// 创建新的Telegram发送器
    ///
    /// # 参数
    /// * `config` - Telegram配置
    ///
    /// # 返回
    /// * `Result<Self>` - 发送器实例
    pub fn new(config: &TelegramConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .context("创建HTTP客户端失败")?;

        Ok(Self {
            client,
            api_base_url: config.api_base_url.trim_end_matches('/').to_string(),
            bot_token: config.bot_token.clone(),
            chat_id: config.chat_id.clone(),
        })
    }

    /// sendMessage 接口地址
    fn send_message_url(&self) -> String {
        format!("{}/bot{}/sendMessage", self.api_base_url, self.bot_token)
    }

    /// 构建消息体，标题加粗，正文另起一行
    fn build_message_body(&self, message: &NotificationMessage) -> Value {
        json!({
            "chat_id": self.chat_id,
            "text": format!("*{}*\n{}", message.title, message.body),
            "parse_mode": "Markdown"
        })
    }

    /// 发送消息到 Bot API
    async fn send_to_api(&self, body: &Value) -> Result<()> {
        // token 属于凭据，不写入日志
        debug!("发送消息到Telegram会话: {}", self.chat_id);

        let response = self
            .client
            .post(self.send_message_url())
            .json(body)
            .send()
            .await
            .context("发送Telegram消息失败")?;

        let status = response.status();
        if status.is_success() {
            info!("Telegram通知发送成功");
            Ok(())
        } else {
            // 状态码和响应体随错误返回，由调用方记录
            let text = response.text().await.unwrap_or_default();
            Err(NotificationError::BadStatus {
                status: status.as_u16(),
                body: text,
            }
            .into())
        }
    }
}

#[async_trait]
impl NotificationSender for TelegramSender {
    async fn send_message(&self, message: &NotificationMessage) -> Result<()> {
        let body = self.build_message_body(message);
        self.send_to_api(&body).await
    }

    async fn test_connection(&self) -> Result<()> {
        let test_message = NotificationMessage::new(
            "连接测试",
            format!(
                "这是一条来自 {} 的测试消息，用于验证Telegram通知是否正常。",
                crate::APP_NAME
            ),
        );
        self.send_message(&test_message).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sender() -> TelegramSender {
        TelegramSender::new(&TelegramConfig {
            bot_token: "123:abc".to_string(),
            chat_id: "42".to_string(),
            api_base_url: "https://api.telegram.org/".to_string(),
            ..Default::default()
        })
        .unwrap()
    }

    #[test]
    fn test_send_message_url() {
        assert_eq!(
            sender().send_message_url(),
            "https://api.telegram.org/bot123:abc/sendMessage"
        );
    }

    #[test]
    fn test_build_message_body() {
        let body = sender().build_message_body(&NotificationMessage::new("Slot", "line two"));
        assert_eq!(
            body,
            json!({
                "chat_id": "42",
                "text": "*Slot*\nline two",
                "parse_mode": "Markdown"
            })
        );
    }
}
