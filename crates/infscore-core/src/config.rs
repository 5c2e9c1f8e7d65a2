use crate::app_config::{AppConfig, Environment, DEFAULT_LLM_BASE_URL, DEFAULT_RELAY_MODELS};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the real environment so tests can drive it with a `HashMap`.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;
    use std::path::PathBuf;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_addr = |var: &str, default: &str| -> Result<SocketAddr, ConfigError> {
        or_default(var, default)
            .parse::<SocketAddr>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        or_default(var, default)
            .parse::<u32>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        or_default(var, default)
            .parse::<u64>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        or_default(var, default)
            .parse::<usize>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_bool = |var: &str, default: &str| -> Result<bool, ConfigError> {
        match or_default(var, default).trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" => Ok(false),
            other => Err(invalid(var, format!("expected a boolean, got '{other}'"))),
        }
    };

    let env = parse_environment(&or_default("INFSCORE_ENV", "development"));

    let bind_addr = parse_addr("INFSCORE_BIND_ADDR", "0.0.0.0:3000")?;
    let log_level = or_default("INFSCORE_LOG_LEVEL", "info");

    let llm_api_key = lookup("INFSCORE_LLM_API_KEY")
        .ok()
        .filter(|k| !k.trim().is_empty());
    if llm_api_key.is_none() && env == Environment::Production {
        return Err(ConfigError::MissingEnvVar(
            "INFSCORE_LLM_API_KEY".to_string(),
        ));
    }
    let llm_base_url = or_default("INFSCORE_LLM_BASE_URL", DEFAULT_LLM_BASE_URL)
        .trim_end_matches('/')
        .to_string();

    let relay_models = match lookup("INFSCORE_RELAY_MODELS") {
        Ok(raw) => parse_model_list(&raw)
            .ok_or_else(|| invalid("INFSCORE_RELAY_MODELS", "no model identifiers".into()))?,
        Err(_) => DEFAULT_RELAY_MODELS
            .iter()
            .map(|m| (*m).to_string())
            .collect(),
    };

    let relay_timeout_secs = parse_u64("INFSCORE_RELAY_TIMEOUT_SECS", "30")?;
    if relay_timeout_secs == 0 {
        return Err(invalid(
            "INFSCORE_RELAY_TIMEOUT_SECS",
            "must be greater than zero".into(),
        ));
    }
    let relay_max_tokens = parse_u32("INFSCORE_RELAY_MAX_TOKENS", "1500")?;
    let relay_temperature = or_default("INFSCORE_RELAY_TEMPERATURE", "0.5")
        .parse::<f32>()
        .map_err(|e| invalid("INFSCORE_RELAY_TEMPERATURE", e.to_string()))?;
    if !(0.0..=2.0).contains(&relay_temperature) {
        return Err(invalid(
            "INFSCORE_RELAY_TEMPERATURE",
            format!("must be within 0.0..=2.0, got {relay_temperature}"),
        ));
    }
    let relay_rate_limit_per_minute = parse_usize("INFSCORE_RELAY_RATE_LIMIT_PER_MINUTE", "60")?;
    if relay_rate_limit_per_minute == 0 {
        return Err(invalid(
            "INFSCORE_RELAY_RATE_LIMIT_PER_MINUTE",
            "must be greater than zero".into(),
        ));
    }

    let seed_rankings = parse_bool("INFSCORE_SEED_RANKINGS", "true")?;
    let seed_path = lookup("INFSCORE_SEED_PATH")
        .ok()
        .filter(|p| !p.trim().is_empty())
        .map(PathBuf::from);

    Ok(AppConfig {
        env,
        bind_addr,
        log_level,
        llm_api_key,
        llm_base_url,
        relay_models,
        relay_timeout_secs,
        relay_max_tokens,
        relay_temperature,
        relay_rate_limit_per_minute,
        seed_rankings,
        seed_path,
    })
}

/// Parse a string into an `Environment` variant.
///
/// Unrecognized values default to `Environment::Development`.
fn parse_environment(s: &str) -> Environment {
    match s {
        "production" => Environment::Production,
        "test" => Environment::Test,
        _ => Environment::Development,
    }
}

/// Split a comma-separated model list, dropping blanks. `None` when nothing remains.
fn parse_model_list(raw: &str) -> Option<Vec<String>> {
    let models: Vec<String> = raw
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToOwned::to_owned)
        .collect();
    (!models.is_empty()).then_some(models)
}
