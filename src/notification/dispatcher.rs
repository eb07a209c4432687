//! 通知分发器 - 把一条消息并发发送给所有接收者

use super::channel::{DeliveryOutcome, SmsSender};
use super::transition::Direction;
use futures::future::join_all;
use std::sync::Arc;
use tracing::{info, warn};

/// 通知分发器
pub struct Dispatcher {
    sender: Arc<dyn SmsSender>,
    /// 发送方号码
    from: String,
    recipients: Vec<String>,
    /// 下线通知不发送
    suppress_offline: bool,
    /// 是否为 dry-run 模式
    dry_run: bool,
}

impl Dispatcher {
    pub fn new(sender: Arc<dyn SmsSender>, from: impl Into<String>, recipients: Vec<String>) -> Self {
        Self {
            sender,
            from: from.into(),
            recipients,
            suppress_offline: false,
            dry_run: false,
        }
    }

    /// 设置是否抑制下线通知
    pub fn with_suppress_offline(mut self, suppress: bool) -> Self {
        self.suppress_offline = suppress;
        self
    }

    /// 设置 dry-run 模式
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn recipients(&self) -> &[String] {
        &self.recipients
    }

    /// 发送消息给所有接收者
    ///
    /// 每个接收者独立发送，失败互不影响。返回结果按接收者列表顺序排列，
    /// 实际发送顺序不保证。
    pub async fn dispatch(&self, direction: Direction, message: &str) -> Vec<DeliveryOutcome> {
        if direction == Direction::WentOffline && self.suppress_offline {
            info!("Offline but notifications are disabled by the settings");
            return vec![DeliveryOutcome::Suppressed {
                reason: "offline notifications disabled".to_string(),
                recipients: self.recipients.len(),
            }];
        }

        if self.dry_run {
            return self
                .recipients
                .iter()
                .map(|to| {
                    info!(recipient = %to, body = message, "[DRY-RUN] Would send sms");
                    DeliveryOutcome::Skipped {
                        recipient: to.clone(),
                        reason: "dry-run".to_string(),
                    }
                })
                .collect();
        }

        let sends = self.recipients.iter().map(|to| self.send_one(to, message));
        join_all(sends).await
    }

    async fn send_one(&self, to: &str, message: &str) -> DeliveryOutcome {
        match self.sender.send(&self.from, to, message).await {
            Ok(delivery_id) => {
                info!(channel = self.sender.name(), recipient = %to, sid = %delivery_id, "SMS sent");
                DeliveryOutcome::Sent {
                    recipient: to.to_string(),
                    delivery_id,
                }
            }
            Err(e) => {
                warn!(channel = self.sender.name(), recipient = %to, error = %e, "SMS send failed");
                DeliveryOutcome::Failed {
                    recipient: to.to_string(),
                    reason: e.to_string(),
                }
            }
        }
    }
}
