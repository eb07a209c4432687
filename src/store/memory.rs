//! 内存状态存储 - `memory://`，用于 dry-run 与测试

use super::{stored_value, PreviousStatus, StatusStore};
use crate::error::StoreError;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

/// 进程内状态存储
#[derive(Debug, Default)]
pub struct MemoryStatusStore {
    records: Mutex<HashMap<String, String>>,
    closed: AtomicBool,
    close_count: AtomicUsize,
    /// 模拟不可达：所有 get_and_set 失败
    unreachable: AtomicBool,
}

impl MemoryStatusStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 预置记录
    pub fn with_record(self, channel: impl Into<String>, live: bool) -> Self {
        self.lock_records()
            .insert(channel.into(), stored_value(live).to_string());
        self
    }

    /// 让后续命令失败（模拟连接断开）
    pub fn set_unreachable(&self, unreachable: bool) {
        self.unreachable.store(unreachable, Ordering::SeqCst);
    }

    /// 读取当前记录（不修改）
    pub fn get(&self, channel: &str) -> Option<bool> {
        let records = self.lock_records();
        PreviousStatus::from_stored(records.get(channel).map(String::as_str)).as_live()
    }

    /// `close` 被调用的次数
    pub fn close_count(&self) -> usize {
        self.close_count.load(Ordering::SeqCst)
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    fn lock_records(&self) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
        // 锁内没有会 panic 的操作，poison 时直接取回数据
        self.records.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl StatusStore for MemoryStatusStore {
    async fn get_and_set(&self, channel: &str, live: bool) -> Result<PreviousStatus, StoreError> {
        if self.closed.load(Ordering::SeqCst) {
            return Err(StoreError::Closed);
        }
        if self.unreachable.load(Ordering::SeqCst) {
            return Err(StoreError::Connect("memory store marked unreachable".to_string()));
        }

        let previous = self
            .lock_records()
            .insert(channel.to_string(), stored_value(live).to_string());
        Ok(PreviousStatus::from_stored(previous.as_deref()))
    }

    async fn peek(&self, channel: &str) -> Result<PreviousStatus, StoreError> {
        if self.closed.load(Ordering::SeqCst) {
            return Err(StoreError::Closed);
        }
        if self.unreachable.load(Ordering::SeqCst) {
            return Err(StoreError::Connect("memory store marked unreachable".to_string()));
        }
        Ok(PreviousStatus::from_stored(
            self.lock_records().get(channel).map(String::as_str),
        ))
    }

    async fn close(&self) {
        self.close_count.fetch_add(1, Ordering::SeqCst);
        self.closed.store(true, Ordering::SeqCst);
    }
}
