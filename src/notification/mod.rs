//! 通知层 - 状态变化检测、文案渲染与短信分发
//!
//! # 流程
//! 1. `TransitionDetector` 通过 store 的原子 get-and-set 判断状态是否变化
//! 2. `NotificationComposer` 渲染开播 / 下线文案
//! 3. `Dispatcher` 并发发送给所有接收者，每个接收者的结果独立上报

pub mod channel;
pub mod channels;
pub mod dispatcher;
pub mod formatter;
pub mod transition;

pub use channel::{DeliveryOutcome, SmsSender};
pub use channels::TwilioClient;
pub use dispatcher::Dispatcher;
pub use formatter::NotificationComposer;
pub use transition::{Detection, Direction, Transition, TransitionDetector};
