//! Redis 状态存储 - 通过 GETSET 实现一次往返的原子读写

use super::{stored_value, PreviousStatus, StatusStore};
use crate::error::StoreError;
use async_trait::async_trait;
use redis::aio::MultiplexedConnection;
use std::sync::Mutex;
use tracing::{debug, info};

/// Redis 状态存储
///
/// 内部持有一个 multiplexed 连接，各频道任务克隆后并发使用。
/// `close` 取走连接，之后的命令返回 `StoreError::Closed`。
pub struct RedisStatusStore {
    conn: Mutex<Option<MultiplexedConnection>>,
}

impl RedisStatusStore {
    /// 建立连接并用 PING 确认可达
    pub async fn connect(uri: &str) -> Result<Self, StoreError> {
        let client = redis::Client::open(uri).map_err(|e| StoreError::InvalidUri(e.to_string()))?;
        let mut conn = client
            .get_multiplexed_async_connection()
            .await
            .map_err(|e| StoreError::Connect(e.to_string()))?;

        let _: String = redis::cmd("PING")
            .query_async(&mut conn)
            .await
            .map_err(|e| StoreError::Connect(e.to_string()))?;

        info!("Connected to redis");
        Ok(Self {
            conn: Mutex::new(Some(conn)),
        })
    }

    fn connection(&self) -> Result<MultiplexedConnection, StoreError> {
        let guard = self.conn.lock().unwrap_or_else(|e| e.into_inner());
        guard.as_ref().cloned().ok_or(StoreError::Closed)
    }
}

#[async_trait]
impl StatusStore for RedisStatusStore {
    async fn get_and_set(&self, channel: &str, live: bool) -> Result<PreviousStatus, StoreError> {
        let mut conn = self.connection()?;
        let previous: Option<String> = redis::cmd("GETSET")
            .arg(channel)
            .arg(stored_value(live))
            .query_async(&mut conn)
            .await?;
        debug!(channel, previous = ?previous, live, "GETSET");
        Ok(PreviousStatus::from_stored(previous.as_deref()))
    }

    async fn peek(&self, channel: &str) -> Result<PreviousStatus, StoreError> {
        let mut conn = self.connection()?;
        let current: Option<String> = redis::cmd("GET").arg(channel).query_async(&mut conn).await?;
        Ok(PreviousStatus::from_stored(current.as_deref()))
    }

    async fn close(&self) {
        let taken = self.conn.lock().unwrap_or_else(|e| e.into_inner()).take();
        if taken.is_some() {
            // 最后一个克隆被 drop 时底层连接关闭
            drop(taken);
            info!("Redis connection released");
        }
    }
}
