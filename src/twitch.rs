//! Twitch 直播状态客户端
//!
//! 调用 `GET {base}/kraken/streams/{channel}`，请求必须带 `Client-ID` header。
//! 响应体 `{"stream": null}` 表示离线，`stream` 为对象表示正在直播。

use crate::error::FetchError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

/// Kraken v5 Accept header
const KRAKEN_ACCEPT: &str = "application/vnd.twitchtv.v5+json";

/// 正在进行的直播信息
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LiveStream {
    pub display_name: String,
    pub game: String,
    pub started_at: DateTime<Utc>,
}

/// 某个频道在检查时刻的状态
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StreamSnapshot {
    pub channel: String,
    /// None 表示离线
    pub live: Option<LiveStream>,
}

impl StreamSnapshot {
    pub fn offline(channel: impl Into<String>) -> Self {
        Self {
            channel: channel.into(),
            live: None,
        }
    }

    pub fn live(channel: impl Into<String>, stream: LiveStream) -> Self {
        Self {
            channel: channel.into(),
            live: Some(stream),
        }
    }

    pub fn is_live(&self) -> bool {
        self.live.is_some()
    }
}

/// 获取频道状态
#[async_trait]
pub trait StatusFetch: Send + Sync {
    async fn fetch(&self, channel: &str) -> Result<StreamSnapshot, FetchError>;
}

// Kraken 响应结构

#[derive(Debug, Deserialize)]
struct StreamsResponse {
    /// 字段缺失与 null 需要区分：缺失说明不是 streams 响应
    #[serde(default, deserialize_with = "deserialize_present")]
    stream: Option<Option<KrakenStream>>,
}

#[derive(Debug, Deserialize)]
struct KrakenStream {
    #[serde(default)]
    game: Option<String>,
    created_at: DateTime<Utc>,
    channel: KrakenChannel,
}

#[derive(Debug, Deserialize)]
struct KrakenChannel {
    display_name: String,
}

fn deserialize_present<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

/// 解析 streams 响应体
pub fn parse_stream_body(channel: &str, body: &str) -> Result<StreamSnapshot, FetchError> {
    if body.trim().is_empty() {
        return Err(FetchError::EmptyBody);
    }

    let response: StreamsResponse =
        serde_json::from_str(body).map_err(|e| FetchError::Malformed(e.to_string()))?;

    match response.stream {
        None => Err(FetchError::Malformed("missing `stream` field".to_string())),
        Some(None) => Ok(StreamSnapshot::offline(channel)),
        Some(Some(stream)) => Ok(StreamSnapshot::live(
            channel,
            LiveStream {
                display_name: stream.channel.display_name,
                game: stream.game.unwrap_or_default(),
                started_at: stream.created_at,
            },
        )),
    }
}

/// Twitch API 客户端
#[derive(Debug, Clone)]
pub struct TwitchClient {
    client: Client,
    base_url: String,
    client_id: SecretString,
}

impl TwitchClient {
    pub fn new(
        base_url: impl Into<String>,
        client_id: SecretString,
        timeout: Duration,
    ) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| FetchError::Request(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client_id,
        })
    }

    /// 频道的 streams URL
    pub fn stream_url(&self, channel: &str) -> String {
        format!("{}/kraken/streams/{}", self.base_url, channel)
    }
}

#[async_trait]
impl StatusFetch for TwitchClient {
    async fn fetch(&self, channel: &str) -> Result<StreamSnapshot, FetchError> {
        let url = self.stream_url(channel);
        debug!(channel, url = %url, "Fetching stream status");

        let response = self
            .client
            .get(&url)
            .header("Client-ID", self.client_id.expose_secret().as_str())
            .header("Accept", KRAKEN_ACCEPT)
            .send()
            .await
            .map_err(|e| FetchError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        let body = response
            .text()
            .await
            .map_err(|e| FetchError::Request(e.to_string()))?;

        parse_stream_body(channel, &body)
    }
}
