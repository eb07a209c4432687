// src/cli/check.rs
//! Check / Watch 命令 - 执行一次（或周期性）频道检查

use crate::batch::{BatchCoordinator, BatchReport};
use crate::config::Config;
use crate::notification::{Dispatcher, TwilioClient};
use crate::store::{DryRunConnector, StoreConnector, UriConnector};
use crate::twitch::TwitchClient;
use anyhow::{anyhow, Context, Result};
use clap::Args;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info};

use super::output::format_report;

/// Check 命令参数
#[derive(Args)]
pub struct CheckArgs {
    /// 不发送短信，也不写入 store（只读取已记录的状态）
    #[arg(long)]
    pub dry_run: bool,

    /// 输出 JSON 格式
    #[arg(long)]
    pub json: bool,
}

/// Watch 命令参数
#[derive(Args)]
pub struct WatchArgs {
    /// 检查间隔（秒）
    #[arg(long, short, default_value = "60")]
    pub interval: u64,

    /// 不发送短信，也不写入 store；各轮之间的状态只保存在进程内
    #[arg(long)]
    pub dry_run: bool,
}

/// 根据配置组装 coordinator
pub fn build_coordinator(config: &Config, dry_run: bool) -> Result<BatchCoordinator> {
    let fetcher = TwitchClient::new(
        config.twitch_api_url.clone(),
        config.twitch_client_id.clone(),
        config.http_timeout,
    )
    .context("Failed to build the Twitch client")?;

    let sender = TwilioClient::new(
        config.twilio_api_url.clone(),
        config.twilio.clone(),
        config.http_timeout,
    )
    .context("Failed to build the Twilio client")?;

    let dispatcher = Dispatcher::new(
        Arc::new(sender),
        config.sender_number.clone(),
        config.recipients.clone(),
    )
    .with_suppress_offline(config.suppress_offline)
    .with_dry_run(dry_run);

    let mut connector: Arc<dyn StoreConnector> = Arc::new(UriConnector::new(config.store_uri.clone()));
    if dry_run {
        connector = Arc::new(DryRunConnector::new(connector));
    }

    Ok(BatchCoordinator::new(config, connector, Arc::new(fetcher), dispatcher))
}

/// 处理 check 命令
pub async fn handle_check(config: &Config, args: CheckArgs) -> Result<BatchReport> {
    let coordinator = build_coordinator(config, args.dry_run)?;
    let report = coordinator.run().await?;

    println!("{}", format_report(&report, args.json)?);
    Ok(report)
}

/// 处理 watch 命令：每个周期是一个独立的 batch（各自打开并释放 store）
pub async fn handle_watch(config: &Config, args: WatchArgs) -> Result<()> {
    if args.interval == 0 {
        return Err(anyhow!("--interval must be at least 1 second"));
    }

    let coordinator = build_coordinator(config, args.dry_run)?;
    let mut ticker = tokio::time::interval(Duration::from_secs(args.interval));
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

    info!(interval = args.interval, channels = config.channels.len(), "Watching channels");
    loop {
        tokio::select! {
            _ = ticker.tick() => {}
            _ = tokio::signal::ctrl_c() => {
                info!("Received Ctrl-C, stopping");
                return Ok(());
            }
        }

        match coordinator.run().await {
            Ok(report) => info!(
                channels = report.channels.len(),
                failed = report.failed_channels(),
                sent = report.sent_count(),
                "Batch finished"
            ),
            // 连接失败只影响本轮，下一轮重新连接
            Err(e) => error!(error = %e, "Batch aborted"),
        }
    }
}
