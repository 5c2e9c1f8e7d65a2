use thiserror::Error;

/// Errors returned by the analysis server client.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Network or TLS failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("invalid server URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    /// The relay answered with `{"error": {"message": ...}}`.
    #[error("{0}")]
    Relay(String),

    /// Any other non-2xx answer from the server.
    #[error("server returned {status}: {message}")]
    Server { status: u16, message: String },

    /// The response body could not be deserialized into the expected type.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("influencer name is required")]
    EmptyName,

    /// The relay envelope carried no `choices[0].message.content`.
    #[error("No analysis results were returned")]
    NoResults,
}
