//! Twilio 短信渠道
//!
//! `POST {base}/2010-04-01/Accounts/{account_sid}/Messages.json`，
//! 使用 API key（api_sid / api_secret）做 basic auth。

use crate::config::TwilioCredentials;
use crate::error::DispatchError;
use crate::notification::channel::SmsSender;
use async_trait::async_trait;
use reqwest::Client;
use secrecy::ExposeSecret;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

/// 成功响应
#[derive(Debug, Deserialize)]
struct MessageResource {
    sid: String,
}

/// 错误响应
#[derive(Debug, Deserialize)]
struct TwilioError {
    #[serde(default)]
    code: Option<serde_json::Value>,
    #[serde(default)]
    message: Option<String>,
}

/// Twilio 客户端
#[derive(Debug, Clone)]
pub struct TwilioClient {
    client: Client,
    base_url: String,
    credentials: TwilioCredentials,
}

impl TwilioClient {
    pub fn new(
        base_url: impl Into<String>,
        credentials: TwilioCredentials,
        timeout: Duration,
    ) -> Result<Self, DispatchError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| DispatchError::Request(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            credentials,
        })
    }

    pub fn messages_url(&self) -> String {
        format!(
            "{}/2010-04-01/Accounts/{}/Messages.json",
            self.base_url, self.credentials.account_sid
        )
    }
}

#[async_trait]
impl SmsSender for TwilioClient {
    fn name(&self) -> &str {
        "twilio"
    }

    async fn send(&self, from: &str, to: &str, body: &str) -> Result<String, DispatchError> {
        debug!(recipient = %to, "Sending sms via twilio");

        let response = self
            .client
            .post(self.messages_url())
            .basic_auth(
                &self.credentials.api_sid,
                Some(self.credentials.api_secret.expose_secret()),
            )
            .form(&[("To", to), ("From", from), ("Body", body)])
            .send()
            .await
            .map_err(|e| DispatchError::Request(e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| DispatchError::Request(e.to_string()))?;

        if status.is_success() {
            let resource: MessageResource =
                serde_json::from_str(&text).map_err(|e| DispatchError::Malformed(e.to_string()))?;
            return Ok(resource.sid);
        }

        let error: TwilioError = serde_json::from_str(&text).unwrap_or(TwilioError {
            code: None,
            message: None,
        });
        Err(DispatchError::Rejected {
            code: match error.code {
                Some(serde_json::Value::String(code)) => code,
                Some(code) => code.to_string(),
                None => status.as_u16().to_string(),
            },
            message: error
                .message
                .unwrap_or_else(|| status.canonical_reason().unwrap_or("unknown error").to_string()),
        })
    }
}
