//! 通知模块
//!
//! 提供Telegram通知功能

pub mod sender;
pub mod telegram;

// 重新导出主要类型
pub use sender::{NoOpSender, NotificationMessage, NotificationSender};
pub use telegram::TelegramSender;
