//! 通知文案渲染
//!
//! 两个固定模板：
//! - 开播：`{display_name} is streaming {game} from {HH:mm}.`
//! - 下线：`{channel} goes offline!`（离线快照没有 display name，使用原始频道名）

use super::transition::{Direction, Transition};
use crate::error::ComposeError;
use chrono_tz::Tz;

/// game 为空时的占位
const UNKNOWN_GAME: &str = "an unknown game";

/// 通知文案生成器（纯函数，无副作用）
#[derive(Debug, Clone, Copy)]
pub struct NotificationComposer {
    timezone: Tz,
}

impl NotificationComposer {
    /// 时区已在加载配置时校验
    pub fn new(timezone: Tz) -> Self {
        Self { timezone }
    }

    pub fn compose(&self, transition: &Transition) -> Result<String, ComposeError> {
        match transition.direction() {
            Direction::WentLive => {
                let stream = transition
                    .snapshot
                    .live
                    .as_ref()
                    .ok_or_else(|| ComposeError::MissingStream(transition.channel().to_string()))?;

                let game = if stream.game.trim().is_empty() {
                    UNKNOWN_GAME
                } else {
                    stream.game.as_str()
                };
                let started = stream.started_at.with_timezone(&self.timezone).format("%H:%M");

                Ok(format!("{} is streaming {} from {}.", stream.display_name, game, started))
            }
            Direction::WentOffline => Ok(format!("{} goes offline!", transition.channel())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::twitch::{LiveStream, StreamSnapshot};
    use chrono::{TimeZone, Utc};

    fn went_live(game: &str) -> Transition {
        Transition {
            from: false,
            to: true,
            snapshot: StreamSnapshot::live(
                "alpha",
                LiveStream {
                    display_name: "AlphaTV".to_string(),
                    game: game.to_string(),
                    started_at: Utc.with_ymd_and_hms(2017, 3, 4, 18, 5, 0).unwrap(),
                },
            ),
        }
    }

    #[test]
    fn test_live_message_utc() {
        let composer = NotificationComposer::new(Tz::UTC);
        assert_eq!(
            composer.compose(&went_live("Factorio")).unwrap(),
            "AlphaTV is streaming Factorio from 18:05."
        );
    }

    #[test]
    fn test_live_message_converts_timezone() {
        // 3 月布达佩斯为 UTC+1
        let composer = NotificationComposer::new(chrono_tz::Europe::Budapest);
        assert_eq!(
            composer.compose(&went_live("Factorio")).unwrap(),
            "AlphaTV is streaming Factorio from 19:05."
        );

        // 跨日时只显示时分
        let composer = NotificationComposer::new(chrono_tz::Asia::Tokyo);
        assert_eq!(
            composer.compose(&went_live("Factorio")).unwrap(),
            "AlphaTV is streaming Factorio from 03:05."
        );
    }

    #[test]
    fn test_live_message_without_game() {
        let composer = NotificationComposer::new(Tz::UTC);
        assert_eq!(
            composer.compose(&went_live("")).unwrap(),
            "AlphaTV is streaming an unknown game from 18:05."
        );
    }

    #[test]
    fn test_offline_message_uses_channel_id() {
        let composer = NotificationComposer::new(Tz::UTC);
        let transition = Transition {
            from: true,
            to: false,
            snapshot: StreamSnapshot::offline("alpha"),
        };
        assert_eq!(composer.compose(&transition).unwrap(), "alpha goes offline!");
    }

    #[test]
    fn test_live_without_stream_details() {
        let composer = NotificationComposer::new(Tz::UTC);
        let transition = Transition {
            from: false,
            to: true,
            snapshot: StreamSnapshot::offline("alpha"),
        };
        assert_eq!(
            composer.compose(&transition).unwrap_err(),
            ComposeError::MissingStream("alpha".to_string())
        );
    }
}
