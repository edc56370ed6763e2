//! 预约页面检测器实现
//!
//! 抓取目标页面，保存快照，按选择器规则查找可点击的预约按钮，
//! 找到后发送一次通知

use crate::checker::result::{ButtonInfo, CheckResult};
use crate::config::TargetConfig;
use crate::error::{CheckError, Result};
use crate::notification::NotificationSender;
use crate::snapshot::SnapshotStore;
use reqwest::header::ACCEPT;
use reqwest::Client;
use scraper::{Html, Selector};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// 按钮匹配规则
#[derive(Debug, Clone)]
pub struct ButtonRule {
    /// 按钮容器选择器
    container: Selector,
    /// 容器内按钮选择器
    button: Selector,
    /// 小写的匹配文字
    match_text: String,
}

impl ButtonRule {
    /// 创建按钮匹配规则
    ///
    /// # 参数
    /// * `container_selector` - 按钮容器的CSS选择器
    /// * `button_selector` - 容器内按钮的CSS选择器
    /// * `match_text` - 按钮可预约时的文字，比较时忽略大小写
    ///
    /// # 返回
    /// * `Result<Self>` - 规则实例，选择器无效时返回错误
    pub fn new(container_selector: &str, button_selector: &str, match_text: &str) -> Result<Self> {
        Ok(Self {
            container: parse_selector(container_selector)?,
            button: parse_selector(button_selector)?,
            match_text: match_text.trim().to_lowercase(),
        })
    }

    /// 从目标页面配置创建规则
    pub fn from_config(target: &TargetConfig) -> Result<Self> {
        Self::new(
            &target.container_selector,
            &target.button_selector,
            &target.match_text,
        )
    }

    /// 按钮是否满足可预约条件
    fn matches(&self, button: &ButtonInfo) -> bool {
        !button.disabled && button.normalized_text() == self.match_text
    }
}

fn parse_selector(selector: &str) -> Result<Selector> {
    Selector::parse(selector).map_err(|e| {
        CheckError::InvalidSelector {
            selector: selector.to_string(),
            reason: format!("{:?}", e),
        }
        .into()
    })
}

/// 在页面中查找第一个可点击的预约按钮
///
/// 按文档顺序遍历容器，每个容器只看第一个按钮；找到后立即停止，
/// 后面的容器不再检查。
pub fn evaluate_document(html: &str, rule: &ButtonRule) -> CheckResult {
    let document = Html::parse_document(html);
    let mut result = CheckResult::default();

    for (index, container) in document.select(&rule.container).enumerate() {
        let Some(button) = container.select(&rule.button).next() else {
            info!("容器 #{} 中没有按钮，跳过", index + 1);
            continue;
        };

        let candidate = ButtonInfo {
            index,
            text: button.text().collect::<String>().trim().to_string(),
            disabled: button.value().attr("disabled").is_some(),
        };

        if rule.matches(&candidate) {
            info!("找到可点击的按钮 #{}: \"{}\"", candidate.position(), candidate.text);
            result.buttons.push(candidate);
            result.found_active = true;
            break;
        }

        info!(
            "按钮 #{} 不可用 (text=\"{}\", disabled={})",
            candidate.position(),
            candidate.normalized_text(),
            candidate.disabled
        );
        result.buttons.push(candidate);
    }

    result
}

/// 可用按钮的通知内容
pub fn booking_message(button: &ButtonInfo) -> String {
    format!(
        "🚨 Booking button #{} (\"{}\") is now clickable!",
        button.position(),
        button.text
    )
}

/// 预约页面检测器
pub struct PageChecker {
    /// HTTP客户端
    client: Client,
    /// 目标页面URL
    target_url: String,
    /// Accept 请求头
    accept: String,
    /// 按钮匹配规则
    rule: ButtonRule,
    /// 通知标题
    title: String,
    /// 通知发送器
    notifier: Arc<dyn NotificationSender>,
    /// 页面快照存储
    snapshot: Arc<dyn SnapshotStore>,
}

impl PageChecker {
    /// 创建新的页面检测器
    ///
    /// # 参数
    /// * `target` - 目标页面配置
    /// * `title` - 通知标题
    /// * `notifier` - 通知发送器
    /// * `snapshot` - 页面快照存储
    ///
    /// # 返回
    /// * `Result<Self>` - 检测器实例
    pub fn new(
        target: &TargetConfig,
        title: impl Into<String>,
        notifier: Arc<dyn NotificationSender>,
        snapshot: Arc<dyn SnapshotStore>,
    ) -> Result<Self> {
        let mut builder = Client::builder().user_agent(target.user_agent.as_str());
        if let Some(secs) = target.request_timeout_seconds {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder.build().map_err(CheckError::RequestError)?;

        Ok(Self {
            client,
            target_url: target.url.clone(),
            accept: target.accept.clone(),
            rule: ButtonRule::from_config(target)?,
            title: title.into(),
            notifier,
            snapshot,
        })
    }

    /// 目标页面URL
    pub fn target_url(&self) -> &str {
        &self.target_url
    }

    /// 抓取页面内容，返回未经解码的原始字节
    async fn fetch_page(&self) -> Result<Vec<u8>> {
        debug!("抓取目标页面: {}", self.target_url);

        let response = self
            .client
            .get(&self.target_url)
            .header(ACCEPT, self.accept.as_str())
            .send()
            .await
            .map_err(CheckError::RequestError)?;

        let status = response.status();
        if !status.is_success() {
            warn!("目标页面返回非成功状态码: {}", status);
        }

        let body = response.bytes().await.map_err(CheckError::RequestError)?;
        Ok(body.to_vec())
    }

    /// 执行一轮检测
    ///
    /// 所有失败都在内部记录日志，不会向调用方返回错误；
    /// 如果需要发送通知，返回前通知已经发送完成（或已失败）。
    pub async fn check_once(&self) -> CheckResult {
        let body = match self.fetch_page().await {
            Ok(body) => body,
            Err(e) => {
                error!("抓取目标页面失败: {}", e);
                return CheckResult::failed(e.to_string());
            }
        };

        if let Err(e) = self.snapshot.store(&body).await {
            error!("保存页面快照失败: {}", e);
        }

        let result = evaluate_document(&String::from_utf8_lossy(&body), &self.rule);

        match result.active_button() {
            Some(button) => {
                let message = booking_message(button);
                if !self.notifier.notify(&self.title, &message).await {
                    warn!("按钮 #{} 可用，但通知未送达", button.position());
                }
            }
            None => info!("未找到可点击的预约按钮"),
        }

        result
    }
}
