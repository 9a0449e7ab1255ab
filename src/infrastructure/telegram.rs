//! # Telegram Bot Adapter
//!
//! Implements the `Notifier` trait over the Telegram Bot HTTP API using
//! `reqwest`, and exposes the long-poll update stream consumed by the main
//! loop. Messages are sent with Markdown parse mode.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;

use crate::domain::traits::{Notifier, NotifyError};

#[derive(Debug, thiserror::Error)]
pub enum TelegramError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("telegram api: {0}")]
    Api(String),
}

pub struct TelegramBot {
    client: reqwest::Client,
    api_base: String,
}

impl TelegramBot {
    pub fn new(token: &str) -> Result<Self, reqwest::Error> {
        // The client timeout must sit above the long-poll timeout.
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(90))
            .build()?;
        Ok(Self {
            client,
            api_base: format!("https://api.telegram.org/bot{token}"),
        })
    }

    /// For testing: point the bot at a mock server.
    #[cfg(test)]
    fn with_api_base(mut self, api_base: &str) -> Self {
        self.api_base = api_base.to_string();
        self
    }

    async fn call<T: serde::de::DeserializeOwned>(
        &self,
        telegram_method: &str,
        payload: &serde_json::Value,
    ) -> Result<T, TelegramError> {
        let url = format!("{}/{}", self.api_base, telegram_method);
        let envelope: ApiEnvelope<T> = self
            .client
            .post(&url)
            .json(payload)
            .send()
            .await?
            .json()
            .await?;

        if !envelope.ok {
            return Err(TelegramError::Api(
                envelope.description.unwrap_or_else(|| "unknown error".into()),
            ));
        }
        envelope
            .result
            .ok_or_else(|| TelegramError::Api("response without result".into()))
    }

    /// Verifies the bot token and returns the bot's own profile.
    pub async fn get_me(&self) -> Result<BotProfile, TelegramError> {
        self.call("getMe", &serde_json::json!({})).await
    }

    /// Long-polls for updates after `offset`.
    pub async fn get_updates(&self, offset: i64, timeout_secs: u64) -> Result<Vec<Update>, TelegramError> {
        self.call(
            "getUpdates",
            &serde_json::json!({ "offset": offset, "timeout": timeout_secs }),
        )
        .await
    }

    pub async fn send_message(&self, chat_id: i64, text: &str) -> Result<(), TelegramError> {
        let _sent: Message = self
            .call(
                "sendMessage",
                &serde_json::json!({
                    "chat_id": chat_id,
                    "text": text,
                    "parse_mode": "Markdown",
                }),
            )
            .await?;
        Ok(())
    }
}

#[async_trait]
impl Notifier for TelegramBot {
    async fn send_text(&self, chat_id: i64, text: &str) -> Result<(), NotifyError> {
        self.send_message(chat_id, text)
            .await
            .map_err(|e| NotifyError::Delivery(e.to_string()))
    }
}

// -- Wire models --

#[derive(Debug, Deserialize)]
struct ApiEnvelope<T> {
    ok: bool,
    #[serde(default)]
    description: Option<String>,
    result: Option<T>,
}

#[derive(Debug, Deserialize)]
pub struct BotProfile {
    #[serde(default)]
    pub username: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Update {
    pub update_id: i64,
    #[serde(default)]
    pub message: Option<Message>,
}

#[derive(Debug, Deserialize)]
pub struct Message {
    pub chat: Chat,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub from: Option<Sender>,
}

#[derive(Debug, Deserialize)]
pub struct Chat {
    pub id: i64,
}

#[derive(Debug, Deserialize)]
pub struct Sender {
    #[serde(default)]
    pub username: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn bot_for(server: &MockServer) -> TelegramBot {
        TelegramBot::new("123:abc").unwrap().with_api_base(&server.uri())
    }

    #[tokio::test]
    async fn send_message_posts_markdown_payload() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/sendMessage"))
            .and(body_partial_json(serde_json::json!({
                "chat_id": 42,
                "text": "hello",
                "parse_mode": "Markdown"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "ok": true,
                "result": { "chat": { "id": 42 }, "text": "hello" }
            })))
            .expect(1)
            .mount(&server)
            .await;

        bot_for(&server).send_message(42, "hello").await.unwrap();
    }

    #[tokio::test]
    async fn api_rejection_surfaces_the_description() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/sendMessage"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "ok": false,
                "description": "Bad Request: chat not found"
            })))
            .mount(&server)
            .await;

        let err = bot_for(&server).send_message(42, "hello").await.unwrap_err();
        match err {
            TelegramError::Api(desc) => assert!(desc.contains("chat not found")),
            other => panic!("expected Api error, got: {other:?}"),
        }
    }

    #[tokio::test]
    async fn get_updates_parses_text_messages() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/getUpdates"))
            .and(body_partial_json(serde_json::json!({ "offset": 5 })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "ok": true,
                "result": [
                    {
                        "update_id": 6,
                        "message": {
                            "chat": { "id": 42 },
                            "text": "/start",
                            "from": { "username": "grace" }
                        }
                    },
                    { "update_id": 7 }
                ]
            })))
            .mount(&server)
            .await;

        let updates = bot_for(&server).get_updates(5, 60).await.unwrap();
        assert_eq!(updates.len(), 2);
        let message = updates[0].message.as_ref().unwrap();
        assert_eq!(message.chat.id, 42);
        assert_eq!(message.text.as_deref(), Some("/start"));
        assert!(updates[1].message.is_none());
    }

    #[tokio::test]
    async fn get_me_returns_the_bot_profile() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/getMe"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "ok": true,
                "result": { "username": "starwatch_bot" }
            })))
            .mount(&server)
            .await;

        let profile = bot_for(&server).get_me().await.unwrap();
        assert_eq!(profile.username.as_deref(), Some("starwatch_bot"));
    }
}
