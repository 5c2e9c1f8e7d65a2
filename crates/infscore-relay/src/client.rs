//! HTTP client for an OpenAI-compatible chat-completions endpoint.
//!
//! One call is one attempt against one model. Fallback across models and the
//! per-attempt deadline live in [`crate::relay`].

use std::time::Duration;

use reqwest::{header::AUTHORIZATION, Client, Url};

use crate::error::{AttemptError, RelayError};
use crate::types::{ChatRequest, ProviderResponse};

const USER_AGENT: &str = "infscore/0.1 (analysis-relay)";

pub(crate) struct ChatClient {
    client: Client,
    endpoint: Url,
    api_key: Option<String>,
}

impl ChatClient {
    /// Builds a client posting to `{base_url}/chat/completions`.
    ///
    /// # Errors
    ///
    /// Returns [`RelayError::InvalidBaseUrl`] if `base_url` does not parse, or
    /// [`RelayError::Http`] if the `reqwest::Client` cannot be constructed.
    pub(crate) fn new(base_url: &str, api_key: Option<&str>) -> Result<Self, RelayError> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .user_agent(USER_AGENT)
            .build()?;

        let raw = format!("{}/chat/completions", base_url.trim_end_matches('/'));
        let endpoint = Url::parse(&raw).map_err(|e| RelayError::InvalidBaseUrl {
            url: base_url.to_owned(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            client,
            endpoint,
            api_key: api_key.map(ToOwned::to_owned),
        })
    }

    /// Sends one completion request and returns the message content.
    ///
    /// # Errors
    ///
    /// - [`AttemptError::Status`] on a non-2xx response (body captured).
    /// - [`AttemptError::Transport`] on network failure.
    /// - [`AttemptError::Deserialize`] if the body is not completion JSON.
    /// - [`AttemptError::MissingContent`] if there is no usable content.
    pub(crate) async fn complete(&self, request: &ChatRequest<'_>) -> Result<String, AttemptError> {
        let mut builder = self.client.post(self.endpoint.clone()).json(request);
        if let Some(key) = &self.api_key {
            builder = builder.header(AUTHORIZATION, format!("Bearer {key}"));
        }

        let response = builder.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AttemptError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let bytes = response.bytes().await?;
        let parsed: ProviderResponse = serde_json::from_slice(&bytes)?;
        parsed.into_content().ok_or(AttemptError::MissingContent)
    }
}
