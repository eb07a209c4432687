//! Dry-run 存储 - 读取真实 store，写入只保存在进程内
//!
//! `check --dry-run` 不能消耗真实的状态变化，否则下一次正式运行会漏发通知。

use super::{PreviousStatus, StatusStore, StoreConnector};
use crate::error::StoreError;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tracing::debug;

type Overlay = Arc<Mutex<HashMap<String, bool>>>;

/// 只读包装：`get_and_set` 从底层 `peek`，新状态写入 overlay
pub struct DryRunStatusStore {
    inner: Arc<dyn StatusStore>,
    overlay: Overlay,
}

impl DryRunStatusStore {
    pub fn new(inner: Arc<dyn StatusStore>) -> Self {
        Self::with_overlay(inner, Overlay::default())
    }

    fn with_overlay(inner: Arc<dyn StatusStore>, overlay: Overlay) -> Self {
        Self { inner, overlay }
    }

    fn recorded(&self, channel: &str) -> Option<bool> {
        let overlay = self.overlay.lock().unwrap_or_else(|e| e.into_inner());
        overlay.get(channel).copied()
    }

    fn record(&self, channel: &str, live: bool) {
        let mut overlay = self.overlay.lock().unwrap_or_else(|e| e.into_inner());
        overlay.insert(channel.to_string(), live);
    }
}

#[async_trait]
impl StatusStore for DryRunStatusStore {
    async fn get_and_set(&self, channel: &str, live: bool) -> Result<PreviousStatus, StoreError> {
        let previous = match self.recorded(channel) {
            Some(recorded) => PreviousStatus::from_live(recorded),
            None => self.inner.peek(channel).await?,
        };
        self.record(channel, live);
        debug!(channel, %previous, live, "Dry-run status recorded in memory only");
        Ok(previous)
    }

    async fn peek(&self, channel: &str) -> Result<PreviousStatus, StoreError> {
        match self.recorded(channel) {
            Some(recorded) => Ok(PreviousStatus::from_live(recorded)),
            None => self.inner.peek(channel).await,
        }
    }

    async fn close(&self) {
        self.inner.close().await;
    }
}

/// 包装另一个 connector；overlay 在多个 batch（watch 模式）之间共享
pub struct DryRunConnector {
    inner: Arc<dyn StoreConnector>,
    overlay: Overlay,
}

impl DryRunConnector {
    pub fn new(inner: Arc<dyn StoreConnector>) -> Self {
        Self {
            inner,
            overlay: Overlay::default(),
        }
    }
}

#[async_trait]
impl StoreConnector for DryRunConnector {
    async fn connect(&self) -> Result<Arc<dyn StatusStore>, StoreError> {
        let inner = self.inner.connect().await?;
        Ok(Arc::new(DryRunStatusStore::with_overlay(
            inner,
            self.overlay.clone(),
        )))
    }
}
