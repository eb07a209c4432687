//! Batch 协调器 - 并发检查所有频道，统计未完成工作，最后释放 store
//!
//! 状态机：`Init → Connecting → Checking → Draining → Closed`

use super::ledger::WorkLedger;
use super::report::{BatchReport, ChannelOutcome, ChannelReport};
use crate::config::Config;
use crate::error::{BatchError, ChannelError};
use crate::notification::{
    DeliveryOutcome, Detection, Dispatcher, NotificationComposer, TransitionDetector,
};
use crate::store::{StatusStore, StoreConnector};
use crate::twitch::StatusFetch;
use futures::stream::{FuturesUnordered, StreamExt};
use serde::Serialize;
use std::sync::Arc;
use tracing::{error, info, warn};

/// Batch 生命周期
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BatchState {
    Init,
    Connecting,
    Checking,
    Draining,
    Closed,
}

/// 单个频道任务共享的组件
struct ChannelContext {
    fetcher: Arc<dyn StatusFetch>,
    detector: TransitionDetector,
    composer: NotificationComposer,
    dispatcher: Arc<Dispatcher>,
}

impl ChannelContext {
    /// fetch → detect → (有变化时) compose + dispatch
    async fn check(&self, channel: &str) -> ChannelOutcome {
        let snapshot = match self.fetcher.fetch(channel).await {
            Ok(snapshot) => snapshot,
            Err(e) => return ChannelOutcome::Failed { error: e.into() },
        };

        let transition = match self.detector.detect(snapshot).await {
            Ok(Detection::NoChange { live }) => return ChannelOutcome::Unchanged { live },
            Ok(Detection::FirstSeen { live }) => return ChannelOutcome::FirstSeen { live },
            Ok(Detection::Transition(transition)) => transition,
            Err(e) => return ChannelOutcome::Failed { error: e.into() },
        };

        let message = match self.composer.compose(&transition) {
            Ok(message) => message,
            Err(e) => return ChannelOutcome::Failed { error: e.into() },
        };

        let direction = transition.direction();
        let deliveries = self.dispatcher.dispatch(direction, &message).await;

        if let [DeliveryOutcome::Suppressed { .. }] = deliveries.as_slice() {
            return ChannelOutcome::Suppressed { message };
        }
        ChannelOutcome::Notified {
            direction,
            message,
            deliveries,
        }
    }
}

/// Batch 协调器
pub struct BatchCoordinator {
    channels: Vec<String>,
    connector: Arc<dyn StoreConnector>,
    fetcher: Arc<dyn StatusFetch>,
    composer: NotificationComposer,
    dispatcher: Arc<Dispatcher>,
}

impl BatchCoordinator {
    pub fn new(
        config: &Config,
        connector: Arc<dyn StoreConnector>,
        fetcher: Arc<dyn StatusFetch>,
        dispatcher: Dispatcher,
    ) -> Self {
        Self {
            channels: config.channels.clone(),
            connector,
            fetcher,
            composer: NotificationComposer::new(config.timezone),
            dispatcher: Arc::new(dispatcher),
        }
    }

    /// 每个频道需要结算的份额
    pub fn quota(&self) -> usize {
        self.dispatcher.recipients().len()
    }

    /// 执行一次完整的 batch
    ///
    /// 只有连接 store 失败时返回 Err；其余失败都记录在对应频道的结果里。
    pub async fn run(&self) -> Result<BatchReport, BatchError> {
        let mut state = BatchState::Init;

        advance(&mut state, BatchState::Connecting);
        info!("Connecting to the db...");
        let store = match self.connector.connect().await {
            Ok(store) => store,
            Err(e) => {
                error!(error = %e, "Cannot connect to the status store");
                advance(&mut state, BatchState::Closed);
                return Err(BatchError::Connect(e));
            }
        };

        advance(&mut state, BatchState::Checking);
        let quota = self.quota();
        let ledger = WorkLedger::new(self.channels.len(), quota);
        let context = Arc::new(ChannelContext {
            fetcher: self.fetcher.clone(),
            detector: TransitionDetector::new(store.clone()),
            composer: self.composer,
            dispatcher: self.dispatcher.clone(),
        });

        let mut pending: FuturesUnordered<_> = self
            .channels
            .iter()
            .map(|channel| {
                let context = context.clone();
                let name = channel.clone();
                let handle = tokio::spawn(async move { context.check(&name).await });
                let channel = channel.clone();
                async move { (channel, handle.await) }
            })
            .collect();

        advance(&mut state, BatchState::Draining);
        let mut store = Some(store);
        let mut reports = Vec::with_capacity(self.channels.len());

        while let Some((channel, joined)) = pending.next().await {
            let outcome = joined.unwrap_or_else(|e| ChannelOutcome::Failed {
                error: ChannelError::Aborted(e.to_string()),
            });

            let report = ChannelReport { channel, outcome };
            log_report(&report);

            if ledger.settle(report.outcome.settles(quota)) {
                release(&mut store, &mut state).await;
            }
            reports.push(report);
        }

        // 没有任何份额（无频道或无接收者）时 ledger 从未触发，这里兜底释放
        if store.is_some() {
            if !ledger.is_drained() {
                warn!(
                    remaining = ledger.remaining(),
                    "All channel checks finished but work is still outstanding"
                );
            }
            release(&mut store, &mut state).await;
        }

        Ok(BatchReport {
            channels: reports,
            expected_units: ledger.expected(),
            remaining_units: ledger.remaining(),
            store_released: store.is_none(),
            state,
        })
    }
}

fn advance(state: &mut BatchState, next: BatchState) {
    let from = *state;
    info!(?from, to = ?next, "Batch state changed");
    *state = next;
}

/// 释放 store（take 保证只执行一次）
async fn release(store: &mut Option<Arc<dyn StatusStore>>, state: &mut BatchState) {
    if let Some(store) = store.take() {
        store.close().await;
        advance(state, BatchState::Closed);
    }
}

fn log_report(report: &ChannelReport) {
    match &report.outcome {
        ChannelOutcome::Failed { .. } => error!(channel = %report.channel, "{}", report),
        _ => info!(channel = %report.channel, "{}", report),
    }
}
