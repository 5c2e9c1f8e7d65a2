use std::time::Duration;

use infscore_core::analysis::UNAVAILABLE_TEXT_SUMMARY;
use infscore_core::{AppConfig, StructuredAnalysis};

use crate::client::ChatClient;
use crate::error::{AttemptError, RelayError};
use crate::prompt::{system_prompt, user_prompt};
use crate::types::{ChatMessage, ChatRequest, CompletionEnvelope, ResponseFormat};

/// Settings for [`PromptRelay`].
#[derive(Clone)]
pub struct RelayConfig {
    pub base_url: String,
    pub api_key: Option<String>,
    /// Tried in order; the first success wins.
    pub models: Vec<String>,
    /// Deadline for each individual model attempt.
    pub attempt_timeout: Duration,
    pub max_tokens: u32,
    pub temperature: f32,
}

impl std::fmt::Debug for RelayConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RelayConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "[redacted]"))
            .field("models", &self.models)
            .field("attempt_timeout", &self.attempt_timeout)
            .field("max_tokens", &self.max_tokens)
            .field("temperature", &self.temperature)
            .finish()
    }
}

impl RelayConfig {
    #[must_use]
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            base_url: config.llm_base_url.clone(),
            api_key: config.llm_api_key.clone(),
            models: config.relay_models.clone(),
            attempt_timeout: Duration::from_secs(config.relay_timeout_secs),
            max_tokens: config.relay_max_tokens,
            temperature: config.relay_temperature,
        }
    }
}

/// A validated relay request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelayRequest {
    prompt: String,
    structured: bool,
}

impl RelayRequest {
    /// # Errors
    ///
    /// Returns [`RelayError::InvalidPrompt`] when the prompt is missing or blank.
    pub fn new(prompt: Option<String>, structured: bool) -> Result<Self, RelayError> {
        match prompt {
            Some(prompt) if !prompt.trim().is_empty() => Ok(Self { prompt, structured }),
            _ => Err(RelayError::InvalidPrompt),
        }
    }

    #[must_use]
    pub fn structured(&self) -> bool {
        self.structured
    }
}

/// Completion content, either free text or the structured schema.
#[derive(Debug, Clone, PartialEq)]
pub enum CompletionContent {
    Text(String),
    Structured(StructuredAnalysis),
}

impl CompletionContent {
    /// The string placed in `choices[0].message.content`.
    #[must_use]
    pub fn to_wire_string(&self) -> String {
        match self {
            CompletionContent::Text(text) => text.clone(),
            CompletionContent::Structured(analysis) => serde_json::to_string(analysis)
                .unwrap_or_else(|_| analysis.overall_analysis.clone()),
        }
    }

    fn unavailable(structured: bool) -> Self {
        if structured {
            CompletionContent::Structured(StructuredAnalysis::unavailable())
        } else {
            CompletionContent::Text(UNAVAILABLE_TEXT_SUMMARY.to_string())
        }
    }
}

#[derive(Debug)]
pub struct AttemptFailure {
    pub model: String,
    pub error: AttemptError,
}

/// Result of relaying a prompt that passed validation.
#[derive(Debug)]
pub enum RelayOutcome {
    /// A model answered.
    Completed {
        model: String,
        content: CompletionContent,
    },
    /// Every model failed; `content` is the synthesized fallback.
    Degraded {
        failures: Vec<AttemptFailure>,
        content: CompletionContent,
    },
}

impl RelayOutcome {
    #[must_use]
    pub fn content(&self) -> &CompletionContent {
        match self {
            RelayOutcome::Completed { content, .. } | RelayOutcome::Degraded { content, .. } => {
                content
            }
        }
    }

    #[must_use]
    pub fn is_degraded(&self) -> bool {
        matches!(self, RelayOutcome::Degraded { .. })
    }

    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            RelayOutcome::Completed { .. } => "completed",
            RelayOutcome::Degraded { .. } => "degraded",
        }
    }

    /// Translate to the single wire shape used for both outcomes.
    #[must_use]
    pub fn to_envelope(&self) -> CompletionEnvelope {
        let model = match self {
            RelayOutcome::Completed { model, .. } => Some(model.clone()),
            RelayOutcome::Degraded { .. } => None,
        };
        CompletionEnvelope::new(model, self.content().to_wire_string())
    }
}

/// Forwards prompts to the provider, falling over across models.
pub struct PromptRelay {
    client: ChatClient,
    models: Vec<String>,
    attempt_timeout: Duration,
    max_tokens: u32,
    temperature: f32,
}

impl PromptRelay {
    /// # Errors
    ///
    /// Returns [`RelayError::NoModels`] for an empty model list, or a
    /// construction error from the HTTP client.
    pub fn new(config: RelayConfig) -> Result<Self, RelayError> {
        if config.models.is_empty() {
            return Err(RelayError::NoModels);
        }
        let client = ChatClient::new(&config.base_url, config.api_key.as_deref())?;
        Ok(Self {
            client,
            models: config.models,
            attempt_timeout: config.attempt_timeout,
            max_tokens: config.max_tokens,
            temperature: config.temperature,
        })
    }

    #[must_use]
    pub fn models(&self) -> &[String] {
        &self.models
    }

    /// Try each model in order; never fails once the request is valid.
    pub async fn relay(&self, request: &RelayRequest) -> RelayOutcome {
        let user = user_prompt(&request.prompt, request.structured);
        let mut failures = Vec::new();

        for model in &self.models {
            tracing::info!(
                model = %model,
                structured = request.structured,
                "attempting completion request"
            );

            let chat = ChatRequest {
                model,
                messages: [
                    ChatMessage {
                        role: "system",
                        content: system_prompt(request.structured),
                    },
                    ChatMessage {
                        role: "user",
                        content: &user,
                    },
                ],
                temperature: self.temperature,
                max_tokens: self.max_tokens,
                response_format: request.structured.then(ResponseFormat::json_object),
            };

            let attempt = tokio::time::timeout(self.attempt_timeout, self.client.complete(&chat))
                .await
                .unwrap_or_else(|_| {
                    Err(AttemptError::Timeout {
                        millis: self.attempt_timeout.as_millis(),
                    })
                });

            match attempt {
                Ok(text) => {
                    let content = interpret(model, text, request.structured);
                    return RelayOutcome::Completed {
                        model: model.clone(),
                        content,
                    };
                }
                Err(error) => {
                    tracing::warn!(model = %model, error = %error, "completion attempt failed");
                    failures.push(AttemptFailure {
                        model: model.clone(),
                        error,
                    });
                }
            }
        }

        let last = failures.last().map(|f| f.error.to_string()).unwrap_or_default();
        tracing::error!(
            attempts = failures.len(),
            last_error = %last,
            "all completion models failed; returning fallback payload"
        );
        RelayOutcome::Degraded {
            failures,
            content: CompletionContent::unavailable(request.structured),
        }
    }
}

fn interpret(model: &str, text: String, structured: bool) -> CompletionContent {
    if !structured {
        return CompletionContent::Text(text);
    }
    match StructuredAnalysis::parse(&text) {
        Some(analysis) => CompletionContent::Structured(analysis),
        None => {
            tracing::warn!(model = %model, "structured output did not parse; using raw text");
            CompletionContent::Structured(StructuredAnalysis::from_raw_text(text))
        }
    }
}
