//! Stream Watch CLI
//!
//! 检查 Twitch 频道状态，开播 / 下线时发送短信通知

use anyhow::Result;
use clap::{Parser, Subcommand};
use stream_watch::{
    cli::{handle_check, handle_config, handle_watch, CheckArgs, ConfigArgs, WatchArgs},
    Config,
};
use tracing::error;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "stream-watch")]
#[command(about = "Stream Watch - 监控 Twitch 频道并发送短信通知")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// 检查所有频道一次（默认由外部调度器周期性调用）
    Check(CheckArgs),
    /// 常驻进程，按固定间隔重复检查
    Watch(WatchArgs),
    /// 打印当前配置（敏感字段脱敏）
    Config(ConfigArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("stream_watch=info"));

    fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .init();

    let cli = Cli::parse();

    // 配置错误在连接 store 之前终止
    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "Invalid configuration");
            return Err(e.into());
        }
    };

    match cli.command {
        Commands::Check(args) => {
            handle_check(&config, args).await?;
        }
        Commands::Watch(args) => handle_watch(&config, args).await?,
        Commands::Config(args) => handle_config(&config, args)?,
    }

    Ok(())
}
