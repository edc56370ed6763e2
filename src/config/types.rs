//! 配置数据结构定义
//!
//! 定义应用程序的配置结构体和验证逻辑

use serde::{Deserialize, Serialize};
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

/// 主配置结构
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Config {
    /// 目标页面配置
    #[serde(default)]
    pub target: TargetConfig,
    /// Telegram 通知配置
    #[serde(default)]
    pub telegram: TelegramConfig,
    /// 存活探测服务器配置
    #[serde(default)]
    pub server: ServerConfig,
    /// 检测调度配置
    #[serde(default)]
    pub schedule: ScheduleConfig,
    /// 页面快照配置
    #[serde(default)]
    pub snapshot: SnapshotConfig,
}

/// 目标页面配置
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TargetConfig {
    /// 目标页面URL
    #[serde(default = "default_target_url")]
    pub url: String,
    /// 按钮容器选择器
    #[serde(default = "default_container_selector")]
    pub container_selector: String,
    /// 容器内按钮选择器
    #[serde(default = "default_button_selector")]
    pub button_selector: String,
    /// 按钮可预约时的文字（忽略大小写）
    #[serde(default = "default_match_text")]
    pub match_text: String,
    /// 请求使用的 User-Agent
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    /// 请求使用的 Accept 头
    #[serde(default = "default_accept")]
    pub accept: String,
    /// 请求超时时间（秒），不设置时使用客户端默认行为
    pub request_timeout_seconds: Option<u64>,
}

/// Telegram 通知配置
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TelegramConfig {
    /// Bot token
    #[serde(default)]
    pub bot_token: String,
    /// 目标会话ID
    #[serde(default)]
    pub chat_id: String,
    /// Bot API 地址
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    /// 通知标题
    #[serde(default = "default_notification_title")]
    pub title: String,
}

/// 存活探测服务器配置
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ServerConfig {
    /// 绑定地址
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
    /// 监听端口
    #[serde(default = "default_port")]
    pub port: u16,
    /// 快照调试路径
    #[serde(default = "default_debug_path")]
    pub debug_path: String,
}

/// 检测调度配置
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScheduleConfig {
    /// 两次检测之间的最小间隔（毫秒）
    #[serde(default = "default_min_delay_ms")]
    pub min_delay_ms: u64,
    /// 两次检测之间的最大间隔（毫秒）
    #[serde(default = "default_max_delay_ms")]
    pub max_delay_ms: u64,
    /// 存活日志间隔（毫秒）
    #[serde(default = "default_liveness_interval_ms")]
    pub liveness_interval_ms: u64,
}

/// 页面快照配置
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SnapshotConfig {
    /// 快照文件路径，设置为空字符串时仅保存在内存中
    #[serde(default = "default_snapshot_path")]
    pub file_path: Option<PathBuf>,
}

// 默认值函数
fn default_target_url() -> String {
    "https://www.goethe.de/ins/bd/en/spr/prf/gzsd1.cfm".to_string()
}
fn default_container_selector() -> String {
    ".pr-buttons".to_string()
}
fn default_button_selector() -> String {
    "button".to_string()
}
fn default_match_text() -> String {
    "book".to_string()
}
fn default_user_agent() -> String {
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0 Safari/537.36".to_string()
}
fn default_accept() -> String {
    "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8".to_string()
}
fn default_api_base_url() -> String {
    "https://api.telegram.org".to_string()
}
fn default_notification_title() -> String {
    "Goethe Slot Open".to_string()
}
fn default_bind_address() -> String {
    "0.0.0.0".to_string()
}
fn default_port() -> u16 {
    3000
}
fn default_debug_path() -> String {
    "/debug-html".to_string()
}
fn default_min_delay_ms() -> u64 {
    2500
}
fn default_max_delay_ms() -> u64 {
    3000
}
fn default_liveness_interval_ms() -> u64 {
    60_000
}
fn default_snapshot_path() -> Option<PathBuf> {
    Some(PathBuf::from("debug.html"))
}

impl Default for TargetConfig {
    fn default() -> Self {
        Self {
            url: default_target_url(),
            container_selector: default_container_selector(),
            button_selector: default_button_selector(),
            match_text: default_match_text(),
            user_agent: default_user_agent(),
            accept: default_accept(),
            request_timeout_seconds: None,
        }
    }
}

impl Default for TelegramConfig {
    fn default() -> Self {
        Self {
            bot_token: String::new(),
            chat_id: String::new(),
            api_base_url: default_api_base_url(),
            title: default_notification_title(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            port: default_port(),
            debug_path: default_debug_path(),
        }
    }
}

impl ServerConfig {
    /// 获取监听地址
    pub fn socket_addr(&self) -> Result<SocketAddr, String> {
        let ip: IpAddr = self
            .bind_address
            .parse()
            .map_err(|e| format!("无效的绑定地址 {}: {}", self.bind_address, e))?;
        Ok(SocketAddr::new(ip, self.port))
    }
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            min_delay_ms: default_min_delay_ms(),
            max_delay_ms: default_max_delay_ms(),
            liveness_interval_ms: default_liveness_interval_ms(),
        }
    }
}

impl Default for SnapshotConfig {
    fn default() -> Self {
        Self {
            file_path: default_snapshot_path(),
        }
    }
}

/// 配置验证函数
///
/// 凭据缺失不做校验，只检查会导致检测循环无法运行的配置项。
///
/// # 参数
/// * `config` - 要验证的配置
///
/// # 返回
/// * `Result<(), String>` - 验证结果，错误时返回错误信息
pub fn validate_config(config: &Config) -> Result<(), String> {
    let target = &config.target;
    if !target.url.starts_with("http://") && !target.url.starts_with("https://") {
        return Err(format!("目标页面URL格式无效: {}", target.url));
    }
    if target.container_selector.trim().is_empty() {
        return Err("按钮容器选择器不能为空".to_string());
    }
    if target.button_selector.trim().is_empty() {
        return Err("按钮选择器不能为空".to_string());
    }
    if target.match_text.trim().is_empty() {
        return Err("按钮匹配文字不能为空".to_string());
    }
    if target.request_timeout_seconds == Some(0) {
        return Err("请求超时时间不能为0".to_string());
    }

    let schedule = &config.schedule;
    if schedule.min_delay_ms > schedule.max_delay_ms {
        return Err(format!(
            "检测间隔范围无效: 最小值 {}ms 大于最大值 {}ms",
            schedule.min_delay_ms, schedule.max_delay_ms
        ));
    }
    if schedule.liveness_interval_ms == 0 {
        return Err("存活日志间隔不能为0".to_string());
    }

    let server = &config.server;
    if server.port == 0 {
        return Err("监听端口不能为0".to_string());
    }
    server.socket_addr()?;
    if !server.debug_path.starts_with('/') {
        return Err(format!("快照调试路径必须以 / 开头: {}", server.debug_path));
    }
    // 路由语法中的捕获和通配符不能出现在固定路径里
    if server.debug_path.contains(['{', '}', '*'])
        || server.debug_path.split('/').any(|segment| segment.starts_with(':'))
    {
        return Err(format!(
            "快照调试路径不能包含 {{ }} * 或以 : 开头的路径段: {}",
            server.debug_path
        ));
    }

    Ok(())
}
