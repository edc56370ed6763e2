//! 命令行参数定义
//!
//! 使用clap定义应用程序的命令行接口

use crate::config::{Config, ConfigLoader, TomlConfigLoader};
use crate::error::Result;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Slot Watch - 预约页面监控工具
#[derive(Parser, Debug, Clone)]
#[command(
    name = "slot-watch",
    version = crate::VERSION,
    about = crate::APP_DESCRIPTION,
    long_about = None
)]
pub struct Args {
    /// 配置文件路径
    #[arg(
        short,
        long,
        value_name = "FILE",
        help = "配置文件路径",
        env = "SLOT_WATCH_CONFIG",
        global = true
    )]
    pub config: Option<PathBuf>,

    /// 日志级别
    #[arg(
        short,
        long,
        value_enum,
        default_value = "info",
        help = "日志级别",
        env = "SLOT_WATCH_LOG_LEVEL",
        global = true
    )]
    pub log_level: LogLevel,

    /// 是否输出JSON格式日志
    #[arg(long, help = "输出JSON格式日志", global = true)]
    pub json_logs: bool,

    /// Telegram Bot token
    #[arg(
        long,
        value_name = "TOKEN",
        help = "Telegram Bot token",
        env = "BOT_TOKEN",
        hide_env_values = true,
        global = true
    )]
    pub bot_token: Option<String>,

    /// Telegram 会话ID
    #[arg(
        long,
        value_name = "ID",
        help = "Telegram 会话ID",
        env = "CHAT_ID",
        global = true
    )]
    pub chat_id: Option<String>,

    /// HTTP监听端口
    #[arg(
        short,
        long,
        value_name = "PORT",
        help = "HTTP监听端口",
        env = "PORT",
        global = true
    )]
    pub port: Option<u16>,

    /// 子命令，默认为 start
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// 日志级别枚举
#[derive(ValueEnum, Clone, Debug, PartialEq)]
pub enum LogLevel {
    /// 调试级别
    Debug,
    /// 信息级别
    Info,
    /// 警告级别
    Warn,
    /// 错误级别
    Error,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Error => log::LevelFilter::Error,
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogLevel::Debug => write!(f, "debug"),
            LogLevel::Info => write!(f, "info"),
            LogLevel::Warn => write!(f, "warn"),
            LogLevel::Error => write!(f, "error"),
        }
    }
}

/// 子命令定义
#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Commands {
    /// 启动检测循环和HTTP服务器
    Start,

    /// 执行一次页面检测
    Check {
        /// 输出格式
        #[arg(short, long, value_enum, default_value = "text", help = "输出格式")]
        format: OutputFormat,

        /// 找到可用按钮时是否发送通知
        #[arg(long, help = "找到可用按钮时发送通知")]
        notify: bool,
    },

    /// 发送测试通知
    TestNotification {
        /// 测试消息内容，不指定时发送内置的连接测试消息
        #[arg(short, long, help = "测试消息内容")]
        message: Option<String>,
    },

    /// 验证配置并输出生效的配置
    Validate,
}

impl Default for Commands {
    fn default() -> Self {
        Commands::Start
    }
}

/// 输出格式
#[derive(ValueEnum, Clone, Debug, PartialEq)]
pub enum OutputFormat {
    /// 文本格式
    Text,
    /// JSON格式
    Json,
}

impl Args {
    /// 要执行的子命令
    pub fn command(&self) -> Commands {
        self.command.clone().unwrap_or_default()
    }

    /// 加载生效的配置
    ///
    /// 依次应用内置默认值、配置文件、命令行参数和环境变量。
    pub async fn load_config(&self) -> Result<Config> {
        let loader = TomlConfigLoader::new(true);
        let mut config = match &self.config {
            Some(path) => loader.load_from_file(path).await?,
            None => Config::default(),
        };

        self.apply_overrides(&mut config);
        loader.validate(&config)?;

        if config.telegram.bot_token.is_empty() || config.telegram.chat_id.is_empty() {
            tracing::warn!("未配置 BOT_TOKEN 或 CHAT_ID，通知将无法送达");
        }

        Ok(config)
    }

    /// 使用命令行参数覆盖配置
    pub fn apply_overrides(&self, config: &mut Config) {
        if let Some(ref token) = self.bot_token {
            config.telegram.bot_token = token.clone();
        }
        if let Some(ref chat_id) = self.chat_id {
            config.telegram.chat_id = chat_id.clone();
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
    }
}
