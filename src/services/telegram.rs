use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::services::notifier::Messenger;

/// Client for the Telegram Bot API `sendMessage` method.
pub struct TelegramClient {
    http: Client,
    api_url: String,
    token: String,
    chat_id: String,
}

#[derive(Serialize)]
struct SendMessage<'a> {
    chat_id: &'a str,
    text: &'a str,
}

#[derive(Deserialize)]
struct BotApiResponse {
    ok: bool,
    #[serde(default)]
    description: Option<String>,
}

impl TelegramClient {
    pub fn new(
        api_url: impl Into<String>,
        token: impl Into<String>,
        chat_id: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let http = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            http,
            api_url: api_url.into().trim_end_matches('/').to_string(),
            token: token.into(),
            chat_id: chat_id.into(),
        })
    }

    pub fn chat_id(&self) -> &str {
        &self.chat_id
    }
}

#[async_trait]
impl Messenger for TelegramClient {
    async fn send(&self, text: &str) -> Result<(), DeliveryError> {
        let url = format!("{}/bot{}/sendMessage", self.api_url, self.token);

        // The request URL embeds the bot token; strip it from transport errors.
        let response = self
            .http
            .post(&url)
            .json(&SendMessage {
                chat_id: &self.chat_id,
                text,
            })
            .send()
            .await
            .map_err(|e| DeliveryError::Http(e.without_url()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| DeliveryError::Http(e.without_url()))?;
        let parsed: Option<BotApiResponse> = serde_json::from_str(&body).ok();

        match parsed {
            Some(api) if status.is_success() && api.ok => Ok(()),
            Some(api) => Err(DeliveryError::Rejected {
                status: status.as_u16(),
                description: api.description.unwrap_or_default(),
            }),
            None => Err(DeliveryError::Rejected {
                status: status.as_u16(),
                description: "response is not a Bot API object".to_string(),
            }),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum DeliveryError {
    #[error("Telegram request failed: {0}")]
    Http(reqwest::Error),

    #[error("Telegram rejected the message (HTTP {status}): {description}")]
    Rejected { status: u16, description: String },
}
