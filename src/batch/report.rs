//! 单个频道与整批检查的结果

use super::coordinator::BatchState;
use crate::error::ChannelError;
use crate::notification::{DeliveryOutcome, Direction};
use serde::{Serialize, Serializer};
use std::fmt;

/// 单个频道检查的最终结果
#[derive(Debug, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ChannelOutcome {
    /// 状态未变化
    Unchanged { live: bool },
    /// 首次记录该频道（离线），不发送通知
    FirstSeen { live: bool },
    /// 已分发（逐个接收者的结果）
    Notified {
        direction: Direction,
        message: String,
        deliveries: Vec<DeliveryOutcome>,
    },
    /// 检测到下线，但配置抑制了通知
    Suppressed { message: String },
    Failed {
        #[serde(serialize_with = "serialize_display")]
        error: ChannelError,
    },
}

impl ChannelOutcome {
    /// 该结果结算的份额
    pub fn settles(&self, quota: usize) -> usize {
        match self {
            ChannelOutcome::Notified { deliveries, .. } => {
                deliveries.iter().map(DeliveryOutcome::settles).sum()
            }
            _ => quota,
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, ChannelOutcome::Failed { .. })
    }

    /// 发送成功的短信数量
    pub fn sent_count(&self) -> usize {
        match self {
            ChannelOutcome::Notified { deliveries, .. } => {
                deliveries.iter().filter(|d| d.is_sent()).count()
            }
            _ => 0,
        }
    }
}

fn serialize_display<S, T>(value: &T, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
    T: fmt::Display,
{
    serializer.collect_str(value)
}

/// 单个频道的报告
#[derive(Debug, Serialize)]
pub struct ChannelReport {
    pub channel: String,
    #[serde(flatten)]
    pub outcome: ChannelOutcome,
}

impl fmt::Display for ChannelReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let status = |live: &bool| if *live { "live" } else { "offline" };
        match &self.outcome {
            ChannelOutcome::Unchanged { live } => {
                write!(f, "Status didn't change for: {} Still {}.", self.channel, status(live))
            }
            ChannelOutcome::FirstSeen { live } => {
                write!(f, "First check for: {} Recorded as {}.", self.channel, status(live))
            }
            ChannelOutcome::Notified {
                direction,
                deliveries,
                ..
            } => {
                let sent = deliveries.iter().filter(|d| d.is_sent()).count();
                let failed = deliveries.iter().filter(|d| d.is_failure()).count();
                write!(
                    f,
                    "{} {}: {} sms sent, {} failed, {} skipped.",
                    self.channel,
                    direction,
                    sent,
                    failed,
                    deliveries.len() - sent - failed
                )
            }
            ChannelOutcome::Suppressed { .. } => write!(
                f,
                "{} went offline but don't send because of the settings.",
                self.channel
            ),
            ChannelOutcome::Failed { error } => write!(f, "{} check failed: {}", self.channel, error),
        }
    }
}

/// 一次 batch 的汇总
#[derive(Debug, Serialize)]
pub struct BatchReport {
    pub channels: Vec<ChannelReport>,
    /// ledger 初始值
    pub expected_units: usize,
    /// 结束时剩余（正常为 0）
    pub remaining_units: usize,
    pub store_released: bool,
    /// 结束时的状态（正常为 Closed）
    pub state: BatchState,
}

impl BatchReport {
    pub fn channel(&self, name: &str) -> Option<&ChannelReport> {
        self.channels.iter().find(|c| c.channel == name)
    }

    pub fn failed_channels(&self) -> usize {
        self.channels.iter().filter(|c| c.outcome.is_failure()).count()
    }

    pub fn sent_count(&self) -> usize {
        self.channels.iter().map(|c| c.outcome.sent_count()).sum()
    }
}
