//! Stream Watch - 监控 Twitch 频道开播 / 下线并发送短信通知

pub mod batch;
pub mod cli;
pub mod config;
pub mod error;
pub mod notification;
pub mod store;
pub mod twitch;

pub use batch::{BatchCoordinator, BatchReport, BatchState, ChannelOutcome, ChannelReport, WorkLedger};
pub use config::Config;
pub use error::{BatchError, ChannelError, ComposeError, ConfigError, DispatchError, FetchError, StoreError};
pub use notification::{
    DeliveryOutcome, Detection, Direction, Dispatcher, NotificationComposer, SmsSender, Transition,
    TransitionDetector, TwilioClient,
};
pub use store::{
    DryRunConnector, DryRunStatusStore, MemoryStatusStore, PreviousStatus, RedisStatusStore, StatusStore, StoreConnector,
    UriConnector,
};
pub use twitch::{LiveStream, StatusFetch, StreamSnapshot, TwitchClient};
