use crate::pipeline::indexing::IndexError;

/// Application-level constants
pub const APP_NAME: &str = "gacetas";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Batch summary written next to the exported records.
pub const SUMMARY_FILE_NAME: &str = "resumen_procesamiento_gacetas.json";

pub const ENV_ELASTIC_URL: &str = "ELASTIC_CLOUD_URL";
pub const ENV_ELASTIC_API_KEY: &str = "ELASTIC_API_KEY";
pub const ENV_ELASTIC_INDEX: &str = "ELASTIC_INDEX_DEFAULT";

pub const DEFAULT_INDEX: &str = "index_gacetas";
pub const DEFAULT_ELASTIC_TIMEOUT_SECS: u64 = 30;

/// Log filter used when `RUST_LOG` is not set.
pub fn default_log_filter() -> &'static str {
    "gacetas=info,gacetas_lib=info,warn"
}

/// Connection settings for the search cluster.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElasticConfig {
    pub url: String,
    pub api_key: String,
    pub default_index: String,
    pub timeout_secs: u64,
}

impl ElasticConfig {
    /// Read `ELASTIC_CLOUD_URL`, `ELASTIC_API_KEY` and `ELASTIC_INDEX_DEFAULT`.
    pub fn from_env() -> Result<Self, IndexError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`Self::from_env`] with an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, IndexError> {
        let required = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .ok_or_else(|| IndexError::Config(format!("{key} is not set")))
        };

        let url = required(ENV_ELASTIC_URL)?;
        let api_key = required(ENV_ELASTIC_API_KEY)?;
        let default_index = lookup(ENV_ELASTIC_INDEX)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_INDEX.to_string());

        Ok(Self {
            url,
            api_key,
            default_index,
            timeout_secs: DEFAULT_ELASTIC_TIMEOUT_SECS,
        })
    }
}
