//! Slot Watch 主程序入口
//!
//! 预约页面监控工具

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    slot_watch::core::app::main().await
}
