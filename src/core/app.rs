//! 应用程序核心逻辑
//!
//! 包含主函数、命令执行和应用程序生命周期管理

use crate::cli::args::{Args, Commands};
use crate::cli::commands::{
    CheckCommand, Command, StartCommand, TestNotificationCommand, ValidateCommand,
};
use crate::logging::{LogConfig, LoggingSystem};
use anyhow::{Context, Result};
use clap::Parser;
use tracing::{error, info};

/// 应用程序主函数
pub async fn main() -> Result<()> {
    let args = Args::parse();

    let log_config = LogConfig {
        level: args.log_level.clone().into(),
        json_format: args.json_logs,
        ..Default::default()
    };
    let _logging_system = LoggingSystem::setup_logging(log_config).context("初始化日志系统失败")?;

    info!("{} v{} 启动", crate::APP_NAME, crate::VERSION);

    if let Err(e) = execute_command(&args).await {
        error!("命令执行失败: {:#}", e);
        std::process::exit(1);
    }

    Ok(())
}

/// 执行CLI命令
pub async fn execute_command(args: &Args) -> Result<()> {
    let command: Box<dyn Command> = match args.command() {
        Commands::Start => Box::new(StartCommand),
        Commands::Check { .. } => Box::new(CheckCommand),
        Commands::TestNotification { .. } => Box::new(TestNotificationCommand),
        Commands::Validate => Box::new(ValidateCommand),
    };

    command.execute(args).await.map_err(anyhow::Error::from)
}
