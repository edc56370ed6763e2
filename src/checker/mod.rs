//! 页面检测模块
//!
//! 提供预约页面检测、检测结果和调度循环

pub mod page;
pub mod result;
pub mod scheduler;

// 重新导出主要类型
pub use page::{booking_message, evaluate_document, ButtonRule, PageChecker};
pub use result::{ButtonInfo, CheckResult};
pub use scheduler::{spawn_liveness_logger, CheckScheduler, DelayWindow};
