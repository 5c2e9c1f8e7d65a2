pub mod analysis;
pub mod app_config;
pub mod config;
pub mod derive;
pub mod records;
pub mod score;
pub mod seed;

pub use analysis::{ScoredSection, StructuredAnalysis};
pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use records::{record_id, AnalysisRecord, RecordDraft, RecordKey, TrendSeries};
pub use score::validate_score;
pub use seed::{default_seed_records, load_seed_records};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read seed file {path}: {source}")]
    SeedFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse seed file: {0}")]
    SeedFileParse(#[source] serde_yaml::Error),

    #[error("validation error: {0}")]
    Validation(String),
}
