//! Prompt relay for influencer analysis.
//!
//! Forwards a prompt to an OpenAI-compatible chat-completions provider, trying
//! an ordered list of models with a per-attempt deadline. When every model
//! fails the caller still gets a completion-shaped fallback payload.

mod client;
pub mod error;
pub mod prompt;
pub mod relay;
pub mod types;

pub use error::{AttemptError, RelayError};
pub use prompt::influencer_prompt;
pub use relay::{
    AttemptFailure, CompletionContent, PromptRelay, RelayConfig, RelayOutcome, RelayRequest,
};
pub use types::CompletionEnvelope;
