//! Practicum homework-status API client.
//!
//! One `GET` per call, no retries: the poll loop's cadence is the retry policy.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{header::AUTHORIZATION, Client, StatusCode};
use serde_json::Value;
use tracing::{debug, error, info};

/// Anything that can answer "which homeworks changed since `from_date`".
#[async_trait]
pub trait HomeworkSource: Send + Sync {
    async fn fetch(&self, from_date: i64) -> Result<Value, ApiError>;
}

/// Client for the Practicum `homework_statuses` endpoint.
pub struct PracticumClient {
    http: Client,
    endpoint: String,
    token: String,
}

impl PracticumClient {
    pub fn new(
        endpoint: impl Into<String>,
        token: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let http = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            http,
            endpoint: endpoint.into(),
            token: token.into(),
        })
    }
}

#[async_trait]
impl HomeworkSource for PracticumClient {
    async fn fetch(&self, from_date: i64) -> Result<Value, ApiError> {
        debug!(endpoint = %self.endpoint, from_date, "Sending request to Practicum API");

        let response = self
            .http
            .get(&self.endpoint)
            .header(AUTHORIZATION, format!("OAuth {}", self.token))
            .query(&[("from_date", from_date)])
            .send()
            .await
            .map_err(|e| {
                error!(error = %e, "Practicum API is unreachable");
                ApiError::EndpointUnreachable(e.to_string())
            })?;

        let status = response.status();
        info!(status = status.as_u16(), "Practicum API responded");

        if status != StatusCode::OK {
            return Err(ApiError::UnexpectedStatus(status.as_u16()));
        }

        let body = response
            .text()
            .await
            .map_err(|e| ApiError::EndpointUnreachable(e.to_string()))?;

        serde_json::from_str(&body).map_err(|e| ApiError::MalformedResponse(e.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    #[error("Practicum API is unreachable: {0}")]
    EndpointUnreachable(String),

    #[error("Practicum API returned unexpected status {0}")]
    UnexpectedStatus(u16),

    #[error("Practicum API returned a malformed body: {0}")]
    MalformedResponse(String),
}
