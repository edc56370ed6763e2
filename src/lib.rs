//! Slot Watch - 预约页面监控工具
//!
//! 定时抓取目标预约页面，检测预约按钮是否可点击，并通过Telegram发送通知：
//! - 随机间隔的页面检测循环
//! - Telegram Bot 通知
//! - 存活探测与页面快照调试接口
//! - 结构化日志记录

pub mod checker;
pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod logging;
pub mod notification;
pub mod snapshot;
pub mod web;

// 重新导出主要类型
pub use checker::{ButtonInfo, CheckResult, CheckScheduler, PageChecker};
pub use config::Config;
pub use error::WatchError;

/// 应用程序版本信息
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// 应用程序名称
pub const APP_NAME: &str = env!("CARGO_PKG_NAME");

/// 应用程序描述
pub const APP_DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");
