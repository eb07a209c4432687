//! 短信渠道 trait 与单个接收者的发送结果

use crate::error::DispatchError;
use async_trait::async_trait;
use serde::Serialize;

/// 单个接收者（或整批被抑制时）的发送结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum DeliveryOutcome {
    /// 发送成功，附带渠道返回的投递 ID
    Sent {
        recipient: String,
        delivery_id: String,
    },
    /// 发送失败（只影响该接收者）
    Failed { recipient: String, reason: String },
    /// 跳过（dry-run）
    Skipped { recipient: String, reason: String },
    /// 整条通知被配置抑制，未发送给任何人
    Suppressed { reason: String, recipients: usize },
}

impl DeliveryOutcome {
    /// 该结果结算的接收者份额
    pub fn settles(&self) -> usize {
        match self {
            DeliveryOutcome::Suppressed { recipients, .. } => *recipients,
            _ => 1,
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, DeliveryOutcome::Failed { .. })
    }

    pub fn is_sent(&self) -> bool {
        matches!(self, DeliveryOutcome::Sent { .. })
    }
}

/// 短信发送渠道
#[async_trait]
pub trait SmsSender: Send + Sync {
    /// 渠道名称（用于日志）
    fn name(&self) -> &str;

    /// 发送一条短信，成功时返回投递 ID
    async fn send(&self, from: &str, to: &str, body: &str) -> Result<String, DispatchError>;
}
