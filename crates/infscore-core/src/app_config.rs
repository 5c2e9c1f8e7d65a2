use std::net::SocketAddr;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

pub const DEFAULT_LLM_BASE_URL: &str = "https://api.groq.com/openai/v1";

/// Model identifiers tried in order when `INFSCORE_RELAY_MODELS` is unset.
pub const DEFAULT_RELAY_MODELS: &[&str] =
    &["llama3-70b-8192", "llama2-70b-4096", "mixtral-8x7b-32768"];

#[derive(Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    pub llm_api_key: Option<String>,
    pub llm_base_url: String,
    pub relay_models: Vec<String>,
    pub relay_timeout_secs: u64,
    pub relay_max_tokens: u32,
    pub relay_temperature: f32,
    pub relay_rate_limit_per_minute: usize,
    pub seed_rankings: bool,
    pub seed_path: Option<PathBuf>,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("bind_addr", &self.bind_addr)
            .field("log_level", &self.log_level)
            .field(
                "llm_api_key",
                &self.llm_api_key.as_ref().map(|_| "[redacted]"),
            )
            .field("llm_base_url", &self.llm_base_url)
            .field("relay_models", &self.relay_models)
            .field("relay_timeout_secs", &self.relay_timeout_secs)
            .field("relay_max_tokens", &self.relay_max_tokens)
            .field("relay_temperature", &self.relay_temperature)
            .field(
                "relay_rate_limit_per_minute",
                &self.relay_rate_limit_per_minute,
            )
            .field("seed_rankings", &self.seed_rankings)
            .field("seed_path", &self.seed_path)
            .finish()
    }
}
