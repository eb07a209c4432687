//! 状态变化检测 - 对比 store 中的旧状态与本次观察结果

use crate::error::StoreError;
use crate::store::{PreviousStatus, StatusStore};
use crate::twitch::StreamSnapshot;
use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// 变化方向
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    WentLive,
    WentOffline,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::WentLive => write!(f, "went live"),
            Direction::WentOffline => write!(f, "went offline"),
        }
    }
}

/// 一次需要通知的状态变化
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub from: bool,
    pub to: bool,
    pub snapshot: StreamSnapshot,
}

impl Transition {
    pub fn direction(&self) -> Direction {
        if self.to {
            Direction::WentLive
        } else {
            Direction::WentOffline
        }
    }

    pub fn channel(&self) -> &str {
        &self.snapshot.channel
    }
}

/// 检测结果
#[derive(Debug, Clone, PartialEq)]
pub enum Detection {
    /// 与记录一致
    NoChange { live: bool },
    /// 首次见到该频道且离线：只记录，不通知
    FirstSeen { live: bool },
    Transition(Transition),
}

/// 状态变化检测器
pub struct TransitionDetector {
    store: Arc<dyn StatusStore>,
}

impl TransitionDetector {
    pub fn new(store: Arc<dyn StatusStore>) -> Self {
        Self { store }
    }

    /// 写入新状态并判断是否发生变化。StoreError 直接向上返回，不重试
    pub async fn detect(&self, snapshot: StreamSnapshot) -> Result<Detection, StoreError> {
        let live = snapshot.is_live();
        let previous = self.store.get_and_set(&snapshot.channel, live).await?;
        debug!(channel = %snapshot.channel, %previous, live, "Compared with recorded status");

        Ok(classify(previous, snapshot))
    }
}

/// 根据旧状态与快照分类
///
/// Unknown 只有在本次为在线时才算开播；离线与默认值 false 相同，不构成变化。
pub fn classify(previous: PreviousStatus, snapshot: StreamSnapshot) -> Detection {
    let live = snapshot.is_live();
    match previous.as_live() {
        None if !live => Detection::FirstSeen { live },
        None => Detection::Transition(Transition {
            from: false,
            to: true,
            snapshot,
        }),
        Some(from) if from == live => Detection::NoChange { live },
        Some(from) => Detection::Transition(Transition {
            from,
            to: live,
            snapshot,
        }),
    }
}
