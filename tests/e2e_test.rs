//! End-to-end tests: 真实的 Twitch / Twilio HTTP 客户端对接 mock server

use std::collections::HashMap;
use std::sync::Arc;
use stream_watch::cli::build_coordinator;
use stream_watch::store::StoreConnector;
use stream_watch::{
    BatchCoordinator, ChannelOutcome, Config, Dispatcher, MemoryStatusStore, StatusStore,
    StoreError, TwilioClient, TwitchClient,
};

fn config(twitch_url: &str, twilio_url: &str) -> Config {
    let env: HashMap<&str, String> = [
        ("CHANNEL_NAMES", "alpha,beta"),
        ("NOTIFICATION_PHONE_NUMBERS", "+1555"),
        ("REDIS_URL", "memory://"),
        ("TWITCH_CLIENT_ID", "client-123"),
        ("TWILIO_ACCOUNT_SID", "AC1"),
        ("TWILIO_API_SID", "SK1"),
        ("TWILIO_API_SECRET", "secret"),
        ("SMS_SENDER_PHONE_NUMBER", "+1999"),
        ("DISPLAY_TIMEZONE", "Europe/Budapest"),
        ("TWITCH_API_URL", twitch_url),
        ("TWILIO_API_URL", twilio_url),
    ]
    .into_iter()
    .map(|(k, v)| (k, v.to_string()))
    .collect();
    Config::from_lookup(|key| env.get(key).cloned()).unwrap()
}

struct SharedConnector(Arc<MemoryStatusStore>);

#[async_trait::async_trait]
impl StoreConnector for SharedConnector {
    async fn connect(&self) -> Result<Arc<dyn StatusStore>, StoreError> {
        Ok(self.0.clone())
    }
}

#[tokio::test]
async fn test_e2e_first_run_notifies_live_channels_only() {
    // Given: Twitch 返回 alpha 在线、beta 离线；memory:// store 为空
    let mut twitch = mockito::Server::new_async().await;
    let mut twilio = mockito::Server::new_async().await;
    let alpha = twitch
        .mock("GET", "/kraken/streams/alpha")
        .match_header("client-id", "client-123")
        .with_status(200)
        .with_body(r#"{"stream": {"game": "Factorio", "created_at": "2017-03-04T18:05:00Z", "channel": {"display_name": "AlphaTV"}}}"#)
        .create_async()
        .await;
    let beta = twitch
        .mock("GET", "/kraken/streams/beta")
        .with_status(200)
        .with_body(r#"{"stream": null}"#)
        .create_async()
        .await;
    let sms = twilio
        .mock("POST", "/2010-04-01/Accounts/AC1/Messages.json")
        .with_status(201)
        .with_body(r#"{"sid": "SM1"}"#)
        .expect(1)
        .create_async()
        .await;

    let config = config(&twitch.url(), &twilio.url());

    // When
    let report = build_coordinator(&config, false).unwrap().run().await.unwrap();

    // Then: alpha 首次在线即开播；beta 首次离线只记录
    alpha.assert_async().await;
    beta.assert_async().await;
    sms.assert_async().await;
    assert!(matches!(
        report.channel("alpha").unwrap().outcome,
        ChannelOutcome::Notified { .. }
    ));
    assert!(matches!(
        report.channel("beta").unwrap().outcome,
        ChannelOutcome::FirstSeen { live: false }
    ));
    assert_eq!(report.sent_count(), 1);
    assert_eq!(report.remaining_units, 0);
    assert!(report.store_released);
}

#[tokio::test]
async fn test_e2e_going_live_sends_sms_through_twilio() {
    // Given: alpha 之前离线，beta 之前在线
    let mut twitch = mockito::Server::new_async().await;
    let mut twilio = mockito::Server::new_async().await;
    let _alpha = twitch
        .mock("GET", "/kraken/streams/alpha")
        .with_status(200)
        .with_body(r#"{"stream": {"game": "Factorio", "created_at": "2017-03-04T18:05:00Z", "channel": {"display_name": "AlphaTV"}}}"#)
        .create_async()
        .await;
    let _beta = twitch
        .mock("GET", "/kraken/streams/beta")
        .with_status(200)
        .with_body(r#"{"stream": null}"#)
        .create_async()
        .await;
    let sms = twilio
        .mock("POST", "/2010-04-01/Accounts/AC1/Messages.json")
        .match_body(mockito::Matcher::UrlEncoded(
            "Body".to_string(),
            "AlphaTV is streaming Factorio from 19:05.".to_string(),
        ))
        .with_status(201)
        .with_body(r#"{"sid": "SM1"}"#)
        .expect(1)
        .create_async()
        .await;

    let config = config(&twitch.url(), &twilio.url());
    let store = Arc::new(
        MemoryStatusStore::new()
            .with_record("alpha", false)
            .with_record("beta", true),
    );
    let fetcher = TwitchClient::new(
        config.twitch_api_url.clone(),
        config.twitch_client_id.clone(),
        config.http_timeout,
    )
    .unwrap();
    let sender = TwilioClient::new(
        config.twilio_api_url.clone(),
        config.twilio.clone(),
        config.http_timeout,
    )
    .unwrap();
    let dispatcher = Dispatcher::new(
        Arc::new(sender),
        config.sender_number.clone(),
        config.recipients.clone(),
    )
    .with_suppress_offline(config.suppress_offline);
    let coordinator = BatchCoordinator::new(
        &config,
        Arc::new(SharedConnector(store.clone())),
        Arc::new(fetcher),
        dispatcher,
    );

    // When
    let report = coordinator.run().await.unwrap();

    // Then: alpha 开播短信发送一次；beta 下线被默认配置抑制
    sms.assert_async().await;
    assert_eq!(report.sent_count(), 1);
    assert!(matches!(
        report.channel("beta").unwrap().outcome,
        ChannelOutcome::Suppressed { .. }
    ));
    assert_eq!(report.remaining_units, 0);
    assert_eq!(store.close_count(), 1);
}

#[tokio::test]
async fn test_e2e_twitch_error_status() {
    let mut twitch = mockito::Server::new_async().await;
    let twilio = mockito::Server::new_async().await;
    let _alpha = twitch
        .mock("GET", "/kraken/streams/alpha")
        .with_status(500)
        .create_async()
        .await;
    let _beta = twitch
        .mock("GET", "/kraken/streams/beta")
        .with_status(200)
        .with_body("")
        .create_async()
        .await;

    let config = config(&twitch.url(), &twilio.url());
    let report = build_coordinator(&config, true).unwrap().run().await.unwrap();

    assert_eq!(report.failed_channels(), 2);
    assert_eq!(report.remaining_units, 0);
    assert!(report.store_released);
}
