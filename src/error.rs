//! 错误类型 - 按失败边界划分
//!
//! - `ConfigError` 与连接阶段的 `StoreError` 会终止整个 run
//! - 其余错误在 channel / recipient 边界被捕获、记录，并计入 ledger

use thiserror::Error;

/// 配置错误（启动前致命）
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing required setting {0}")]
    Missing(&'static str),
    #[error("{0} must contain at least one non-empty entry")]
    EmptyList(&'static str),
    #[error("channel {0} is listed more than once")]
    DuplicateChannel(String),
    #[error("invalid channel name {0:?}: only letters, digits and '_' are allowed")]
    InvalidChannel(String),
    #[error("unknown timezone {0:?}")]
    InvalidTimezone(String),
    #[error("invalid value {value:?} for {key}")]
    InvalidValue { key: &'static str, value: String },
}

/// Status store 错误
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("invalid store uri: {0}")]
    InvalidUri(String),
    #[error("cannot connect to the store: {0}")]
    Connect(String),
    #[error("store command failed: {0}")]
    Command(String),
    #[error("store connection already released")]
    Closed,
}

impl From<redis::RedisError> for StoreError {
    fn from(err: redis::RedisError) -> Self {
        if err.is_connection_refusal() || err.is_connection_dropped() || err.is_io_error() {
            StoreError::Connect(err.to_string())
        } else {
            StoreError::Command(err.to_string())
        }
    }
}

/// 频道状态获取错误
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("no response from the server: {0}")]
    Request(String),
    #[error("status api answered {0}")]
    Status(u16),
    #[error("empty body in the response")]
    EmptyBody,
    #[error("malformed status payload: {0}")]
    Malformed(String),
}

/// 单个接收者的发送错误
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("sms request failed: {0}")]
    Request(String),
    #[error("sms rejected (code {code}): {message}")]
    Rejected { code: String, message: String },
    #[error("malformed sms response: {0}")]
    Malformed(String),
}

/// 消息渲染错误
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ComposeError {
    #[error("channel {0} went live but the snapshot carries no stream details")]
    MissingStream(String),
}

/// 单个频道检查失败的原因
#[derive(Debug, Error)]
pub enum ChannelError {
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Compose(#[from] ComposeError),
    #[error("channel task aborted: {0}")]
    Aborted(String),
}

/// 整个 batch 失败（未执行任何频道检查）
#[derive(Debug, Error)]
pub enum BatchError {
    #[error("connecting to the status store failed: {0}")]
    Connect(#[source] StoreError),
}
