//! HTTP client for the infscore server.
//!
//! Wraps `reqwest` with typed access to the relay and rankings routes. Error
//! bodies are decoded into [`ClientError`] so callers can show the server's
//! message.

use std::time::Duration;

use infscore_core::{AnalysisRecord, RecordDraft};
use infscore_relay::CompletionEnvelope;
use reqwest::{Client, Response, Url};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;

use crate::error::ClientError;

pub const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:3000";

/// Server's acknowledgement of a saved analysis.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveReceipt {
    pub id: String,
    pub message: String,
    pub current_count: usize,
}

/// One leaderboard read.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankingsPage {
    pub results: Vec<AnalysisRecord>,
    /// Milliseconds since the server started.
    pub server_uptime: u64,
}

#[derive(Debug, Serialize)]
struct RelayPayload<'a> {
    prompt: &'a str,
    structured: bool,
}

pub struct ServerClient {
    client: Client,
    base_url: Url,
}

impl ServerClient {
    /// # Errors
    ///
    /// Returns [`ClientError::Http`] if the `reqwest::Client` cannot be
    /// constructed, or [`ClientError::InvalidBaseUrl`] if `base_url` does not
    /// parse.
    pub fn new(base_url: &str, timeout_secs: u64) -> Result<Self, ClientError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("infscore/0.1 (cli)")
            .build()?;

        // Trailing slash so `join` appends to the path instead of replacing it.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised).map_err(|e| ClientError::InvalidBaseUrl {
            url: base_url.to_owned(),
            reason: e.to_string(),
        })?;

        Ok(Self { client, base_url })
    }

    fn endpoint(&self, path: &str) -> Result<Url, ClientError> {
        self.base_url
            .join(path)
            .map_err(|e| ClientError::InvalidBaseUrl {
                url: self.base_url.to_string(),
                reason: e.to_string(),
            })
    }

    /// Sends a prompt to `POST /analysis-relay`.
    ///
    /// # Errors
    ///
    /// - [`ClientError::Relay`] when the body carries `error.message`.
    /// - [`ClientError::Server`] on other non-2xx answers.
    /// - [`ClientError::Http`] on network failure.
    /// - [`ClientError::Deserialize`] if the body is not a completion envelope.
    pub async fn relay(
        &self,
        prompt: &str,
        structured: bool,
    ) -> Result<CompletionEnvelope, ClientError> {
        let response = self
            .client
            .post(self.endpoint("analysis-relay")?)
            .json(&RelayPayload { prompt, structured })
            .send()
            .await?;

        let status = response.status();
        let body: Value = read_json(response, "analysis-relay").await?;
        if let Some(message) = body
            .get("error")
            .and_then(|e| e.get("message"))
            .and_then(Value::as_str)
        {
            return Err(ClientError::Relay(message.to_owned()));
        }
        if !status.is_success() {
            return Err(ClientError::Server {
                status: status.as_u16(),
                message: body.to_string(),
            });
        }
        decode(body, "analysis-relay")
    }

    /// Submits a record to `POST /rankings`.
    ///
    /// # Errors
    ///
    /// - [`ClientError::Server`] on a non-2xx answer, with the server's message.
    /// - [`ClientError::Http`] on network failure.
    /// - [`ClientError::Deserialize`] if the receipt does not parse.
    pub async fn save(&self, draft: &RecordDraft) -> Result<SaveReceipt, ClientError> {
        let response = self
            .client
            .post(self.endpoint("rankings")?)
            .json(draft)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<Value>(&text)
                .ok()
                .and_then(|v| v.get("error").and_then(Value::as_str).map(str::to_owned))
                .unwrap_or(text);
            return Err(ClientError::Server {
                status: status.as_u16(),
                message,
            });
        }
        read_json(response, "rankings").await
    }

    /// Reads `GET /rankings`.
    ///
    /// # Errors
    ///
    /// - [`ClientError::Server`] on a non-2xx answer.
    /// - [`ClientError::Http`] on network failure.
    /// - [`ClientError::Deserialize`] if the page does not parse.
    pub async fn rankings(
        &self,
        platform: Option<&str>,
        nocache: bool,
    ) -> Result<RankingsPage, ClientError> {
        let mut url = self.endpoint("rankings")?;
        {
            let mut query = url.query_pairs_mut();
            if nocache {
                query.append_pair("nocache", "true");
            }
            if let Some(platform) = platform {
                query.append_pair("platform", platform);
            }
        }
        if url.query() == Some("") {
            url.set_query(None);
        }

        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::Server {
                status: status.as_u16(),
                message: response.text().await.unwrap_or_default(),
            });
        }
        read_json(response, "rankings").await
    }
}

async fn read_json<T: DeserializeOwned>(
    response: Response,
    context: &str,
) -> Result<T, ClientError> {
    let bytes = response.bytes().await?;
    serde_json::from_slice(&bytes).map_err(|e| ClientError::Deserialize {
        context: context.to_owned(),
        source: e,
    })
}

fn decode<T: DeserializeOwned>(value: Value, context: &str) -> Result<T, ClientError> {
    serde_json::from_value(value).map_err(|e| ClientError::Deserialize {
        context: context.to_owned(),
        source: e,
    })
}
