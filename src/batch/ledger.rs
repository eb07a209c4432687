//! Outstanding work 计数器
//!
//! 初始值为 频道数 × 接收者数，每个频道结束时扣减其份额，只减不增。
//! 到零的那一次 `settle` 返回 true，之后的扣减不再产生效果。

use std::sync::atomic::{AtomicUsize, Ordering};

#[derive(Debug)]
pub struct WorkLedger {
    expected: usize,
    remaining: AtomicUsize,
}

impl WorkLedger {
    pub fn new(channels: usize, quota: usize) -> Self {
        let expected = channels.saturating_mul(quota);
        Self {
            expected,
            remaining: AtomicUsize::new(expected),
        }
    }

    /// 扣减 `units`（饱和到零）。只有让计数器归零的那次调用返回 true
    pub fn settle(&self, units: usize) -> bool {
        let result = self
            .remaining
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |remaining| {
                if remaining == 0 {
                    None
                } else {
                    Some(remaining.saturating_sub(units))
                }
            });

        match result {
            Ok(before) => before > 0 && before <= units,
            Err(_) => false,
        }
    }

    pub fn remaining(&self) -> usize {
        self.remaining.load(Ordering::SeqCst)
    }

    pub fn expected(&self) -> usize {
        self.expected
    }

    pub fn is_drained(&self) -> bool {
        self.remaining() == 0
    }
}
