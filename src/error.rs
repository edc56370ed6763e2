//! 错误处理模块
//!
//! 定义应用程序的统一错误类型

use thiserror::Error;

/// Slot Watch 应用程序的主要错误类型
#[derive(Error, Debug)]
pub enum WatchError {
    /// 配置相关错误
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),

    /// 页面检测相关错误
    #[error("页面检测错误: {0}")]
    Check(#[from] CheckError),

    /// 通知相关错误
    #[error("通知错误: {0}")]
    Notification(#[from] NotificationError),

    /// 快照读写错误
    #[error("快照错误: {0}")]
    Snapshot(String),

    /// IO错误
    #[error("IO错误: {0}")]
    Io(#[from] std::io::Error),

    /// JSON序列化/反序列化错误
    #[error("JSON错误: {0}")]
    Json(#[from] serde_json::Error),

    /// 其他错误
    #[error("其他错误: {0}")]
    Other(#[from] anyhow::Error),
}

/// 配置错误类型
#[derive(Error, Debug)]
pub enum ConfigError {
    /// 配置文件解析错误
    #[error("配置文件解析失败: {0}")]
    ParseError(String),

    /// 配置验证错误
    #[error("配置验证失败: {0}")]
    ValidationError(String),

    /// 配置文件不存在
    #[error("配置文件不存在: {path}")]
    FileNotFound { path: String },

    /// 环境变量替换错误
    #[error("环境变量替换失败: {var}")]
    EnvVarError { var: String },
}

/// 页面检测错误类型
#[derive(Error, Debug)]
pub enum CheckError {
    /// HTTP请求错误
    #[error("HTTP请求失败: {0}")]
    RequestError(#[from] reqwest::Error),

    /// 选择器无效
    #[error("无效的选择器 `{selector}`: {reason}")]
    InvalidSelector { selector: String, reason: String },
}

/// 通知错误类型
#[derive(Error, Debug)]
pub enum NotificationError {
    /// 发送失败
    #[error("通知发送失败: {0}")]
    SendError(String),

    /// 接口返回非成功状态码
    #[error("通知接口返回状态码 {status}: {body}")]
    BadStatus { status: u16, body: String },
}

/// 结果类型别名
pub type Result<T> = std::result::Result<T, WatchError>;
