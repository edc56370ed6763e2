//! 日志系统模块
//!
//! 基于 tracing 的日志初始化，同时桥接 log crate 的日志记录

use log::LevelFilter;
use std::sync::{Mutex, OnceLock};
use tracing_subscriber::{fmt, prelude::*, registry, EnvFilter, Layer};

/// 日志配置结构
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// 日志级别
    pub level: LevelFilter,
    /// 是否使用JSON格式
    pub json_format: bool,
    /// 是否输出ANSI颜色
    pub ansi: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: LevelFilter::Info,
            json_format: false,
            ansi: true,
        }
    }
}

/// 全局日志初始化结果，只初始化一次
static LOGGING_INIT: OnceLock<Mutex<Option<Result<(), String>>>> = OnceLock::new();

/// 日志系统
#[derive(Debug)]
pub struct LoggingSystem {
    config: LogConfig,
}

impl LoggingSystem {
    /// 初始化日志系统
    ///
    /// 重复调用不会重新安装 subscriber，而是返回第一次初始化的结果。
    ///
    /// # 参数
    /// * `config` - 日志配置
    ///
    /// # 返回
    /// * `Result<LoggingSystem, anyhow::Error>` - 初始化结果
    pub fn setup_logging(config: LogConfig) -> anyhow::Result<Self> {
        let state = LOGGING_INIT.get_or_init(|| Mutex::new(None));
        let mut state = state
            .lock()
            .map_err(|_| anyhow::anyhow!("日志初始化状态锁已损坏"))?;

        let result = state
            .get_or_insert_with(|| Self::perform_initialization(&config).map_err(|e| e.to_string()))
            .clone();

        result.map_err(|e| anyhow::anyhow!("日志系统初始化失败: {}", e))?;
        Ok(Self { config })
    }

    /// 当前日志配置
    pub fn config(&self) -> &LogConfig {
        &self.config
    }

    /// 执行实际的日志系统初始化
    fn perform_initialization(config: &LogConfig) -> anyhow::Result<()> {
        // log crate 到 tracing 的桥接；已被其他组件安装时忽略
        let _ = tracing_log::LogTracer::init();

        let env_filter = EnvFilter::builder()
            .with_default_directive(Self::convert_level_to_directive(config.level))
            .from_env_lossy();

        let fmt_layer = if config.json_format {
            fmt::layer()
                .json()
                .with_timer(fmt::time::ChronoUtc::rfc_3339())
                .with_target(true)
                .boxed()
        } else {
            fmt::layer()
                .with_timer(fmt::time::ChronoUtc::rfc_3339())
                .with_ansi(config.ansi)
                .with_target(false)
                .boxed()
        };

        match registry().with(env_filter).with(fmt_layer).try_init() {
            Ok(()) => {
                tracing::debug!("日志配置: {:?}", config);
                Ok(())
            }
            Err(e) => {
                let error_msg = e.to_string();
                if error_msg.contains("a global default trace dispatcher has already been set") {
                    // 测试中可能已经被其他 subscriber 占用
                    Ok(())
                } else {
                    Err(anyhow::anyhow!("tracing subscriber初始化失败: {}", error_msg))
                }
            }
        }
    }

    /// 将 log::LevelFilter 转换为 tracing 的指令
    fn convert_level_to_directive(level: LevelFilter) -> tracing_subscriber::filter::Directive {
        use tracing_subscriber::filter::{Directive, LevelFilter as TracingLevel};
        let level = match level {
            LevelFilter::Off => TracingLevel::OFF,
            LevelFilter::Error => TracingLevel::ERROR,
            LevelFilter::Warn => TracingLevel::WARN,
            LevelFilter::Info => TracingLevel::INFO,
            LevelFilter::Debug => TracingLevel::DEBUG,
            LevelFilter::Trace => TracingLevel::TRACE,
        };
        Directive::from(level)
    }
}
