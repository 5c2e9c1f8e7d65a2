use serde::{Deserialize, Serialize};
use serde_json::Value;

// ---------------------------------------------------------------------------
// Provider request / response (OpenAI-compatible chat completions)
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
pub(crate) struct ChatRequest<'a> {
    pub model: &'a str,
    pub messages: [ChatMessage<'a>; 2],
    pub temperature: f32,
    pub max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_format: Option<ResponseFormat>,
}

#[derive(Debug, Serialize)]
pub(crate) struct ChatMessage<'a> {
    pub role: &'static str,
    pub content: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct ResponseFormat {
    #[serde(rename = "type")]
    pub kind: &'static str,
}

impl ResponseFormat {
    pub(crate) fn json_object() -> Self {
        Self {
            kind: "json_object",
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct ProviderResponse {
    #[serde(default)]
    pub choices: Vec<ProviderChoice>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ProviderChoice {
    #[serde(default)]
    pub message: Option<ProviderMessage>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ProviderMessage {
    #[serde(default)]
    pub content: Option<Value>,
}

impl ProviderResponse {
    /// `choices[0].message.content` when it is a non-blank string.
    pub(crate) fn into_content(self) -> Option<String> {
        let content = self.choices.into_iter().next()?.message?.content?;
        match content {
            Value::String(s) if !s.trim().is_empty() => Some(s),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Relay response envelope (what `/analysis-relay` returns)
// ---------------------------------------------------------------------------

/// Completion-shaped payload returned for both real and synthesized results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionEnvelope {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    pub choices: Vec<EnvelopeChoice>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnvelopeChoice {
    #[serde(default)]
    pub index: u32,
    pub message: EnvelopeMessage,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnvelopeMessage {
    #[serde(default = "assistant_role")]
    pub role: String,
    pub content: String,
}

fn assistant_role() -> String {
    "assistant".to_string()
}

impl CompletionEnvelope {
    #[must_use]
    pub fn new(model: Option<String>, content: String) -> Self {
        Self {
            model,
            choices: vec![EnvelopeChoice {
                index: 0,
                message: EnvelopeMessage {
                    role: assistant_role(),
                    content,
                },
            }],
        }
    }

    /// `choices[0].message.content`, if any.
    #[must_use]
    pub fn content(&self) -> Option<&str> {
        self.choices.first().map(|c| c.message.content.as_str())
    }
}
