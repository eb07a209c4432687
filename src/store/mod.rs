//! 频道状态存储 - channel → 上次观察到的 live 状态
//!
//! 唯一的共享可变资源。每次 run 打开一个连接，所有频道检查结束后恰好释放一次。

mod dry_run;
mod memory;
mod redis_store;

pub use self::dry_run::{DryRunConnector, DryRunStatusStore};
pub use self::memory::MemoryStatusStore;
pub use self::redis_store::RedisStatusStore;

use crate::error::StoreError;
use async_trait::async_trait;
use serde::Serialize;
use std::fmt;
use std::sync::Arc;

/// 内存存储使用的 URI scheme
pub const MEMORY_URI: &str = "memory://";

/// Store 中记录的上一次状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PreviousStatus {
    Live,
    Offline,
    /// 从未见过该频道（key 不存在或值无法识别）
    Unknown,
}

impl PreviousStatus {
    /// 从存储值解析（"true" / "false"）
    pub fn from_stored(value: Option<&str>) -> Self {
        match value {
            Some("true") => PreviousStatus::Live,
            Some("false") => PreviousStatus::Offline,
            _ => PreviousStatus::Unknown,
        }
    }

    pub fn from_live(live: bool) -> Self {
        if live {
            PreviousStatus::Live
        } else {
            PreviousStatus::Offline
        }
    }

    /// 已知状态下是否为 live
    pub fn as_live(&self) -> Option<bool> {
        match self {
            PreviousStatus::Live => Some(true),
            PreviousStatus::Offline => Some(false),
            PreviousStatus::Unknown => None,
        }
    }
}

impl fmt::Display for PreviousStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PreviousStatus::Live => write!(f, "live"),
            PreviousStatus::Offline => write!(f, "offline"),
            PreviousStatus::Unknown => write!(f, "unknown"),
        }
    }
}

/// 存储值的字符串形式
pub fn stored_value(live: bool) -> &'static str {
    if live {
        "true"
    } else {
        "false"
    }
}

/// 状态存储 trait
#[async_trait]
pub trait StatusStore: Send + Sync {
    /// 原子地写入新状态并返回旧状态（一次往返）
    async fn get_and_set(&self, channel: &str, live: bool) -> Result<PreviousStatus, StoreError>;

    /// 只读取当前记录，不写入
    async fn peek(&self, channel: &str) -> Result<PreviousStatus, StoreError>;

    /// 释放连接。之后的 `get_and_set` 返回 `StoreError::Closed`
    async fn close(&self);
}

/// 打开 store 连接（Connecting 阶段）
#[async_trait]
pub trait StoreConnector: Send + Sync {
    async fn connect(&self) -> Result<Arc<dyn StatusStore>, StoreError>;
}

/// 根据 URI 选择 Redis 或内存存储
pub struct UriConnector {
    uri: String,
}

impl UriConnector {
    pub fn new(uri: impl Into<String>) -> Self {
        Self { uri: uri.into() }
    }
}

#[async_trait]
impl StoreConnector for UriConnector {
    async fn connect(&self) -> Result<Arc<dyn StatusStore>, StoreError> {
        if self.uri.starts_with(MEMORY_URI) {
            return Ok(Arc::new(MemoryStatusStore::new()));
        }
        let store = RedisStatusStore::connect(&self.uri).await?;
        Ok(Arc::new(store))
    }
}
