//! 存活探测与调试接口模块
//!
//! 对外提供存活探测和最近一次页面快照的查看接口

use crate::snapshot::SnapshotStore;
use std::sync::Arc;

pub mod handlers;
pub mod server;

pub use server::{create_router, HealthServer};

/// Web 应用状态
#[derive(Clone)]
pub struct WebAppState {
    /// 页面快照存储（只读）
    pub snapshot: Arc<dyn SnapshotStore>,
}

impl WebAppState {
    /// 创建新的 Web 应用状态
    pub fn new(snapshot: Arc<dyn SnapshotStore>) -> Self {
        Self { snapshot }
    }
}
