use thiserror::Error;

/// Errors the relay reports to its caller.
///
/// Provider failures never appear here; they are absorbed into
/// [`crate::RelayOutcome::Degraded`].
#[derive(Debug, Error)]
pub enum RelayError {
    /// The prompt was missing or blank. No provider call was made.
    #[error("A valid prompt is required")]
    InvalidPrompt,

    /// The configured provider base URL does not parse.
    #[error("invalid provider base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    /// The relay was configured without any model identifiers.
    #[error("no model identifiers configured")]
    NoModels,

    /// The underlying HTTP client could not be built.
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Why a single model attempt failed.
#[derive(Debug, Error)]
pub enum AttemptError {
    /// The provider answered with a non-success status.
    #[error("provider returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// The attempt exceeded the per-attempt deadline and was cancelled.
    #[error("request timed out after {millis} ms")]
    Timeout { millis: u128 },

    /// Network or TLS failure.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The response body was not the expected completion JSON.
    #[error("malformed completion body: {0}")]
    Deserialize(#[from] serde_json::Error),

    /// The completion carried no usable `choices[0].message.content`.
    #[error("completion had no message content")]
    MissingContent,
}
