//! Batch - 对所有关注频道的一次完整检查

mod coordinator;
mod ledger;
mod report;

pub use coordinator::{BatchCoordinator, BatchState};
pub use ledger::WorkLedger;
pub use report::{BatchReport, ChannelOutcome, ChannelReport};
