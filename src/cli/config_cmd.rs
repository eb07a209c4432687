// src/cli/config_cmd.rs
//! Config 命令 - 打印校验后的配置（敏感字段已脱敏）

use crate::config::Config;
use anyhow::Result;
use clap::Args;

use super::output::format_output;

/// Config 命令参数
#[derive(Args)]
pub struct ConfigArgs {
    /// 输出 JSON 格式
    #[arg(long)]
    pub json: bool,
}

/// 处理 config 命令
pub fn handle_config(config: &Config, args: ConfigArgs) -> Result<()> {
    let redacted = config.redacted();

    if args.json {
        println!("{}", format_output(&redacted)?);
        return Ok(());
    }

    println!("Channels:          {}", redacted.channels.join(", "));
    println!("Recipients:        {}", redacted.recipients.join(", "));
    println!("Store:             {}", redacted.store_uri);
    println!("Sender number:     {}", redacted.sender_number);
    println!("Suppress offline:  {}", redacted.suppress_offline);
    println!("Timezone:          {}", redacted.timezone);
    println!("Twitch client id:  {}", redacted.twitch_client_id);
    println!("HTTP timeout:      {}s", redacted.http_timeout_secs);
    Ok(())
}
