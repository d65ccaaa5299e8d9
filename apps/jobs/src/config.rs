use anyhow::{Context, Result};

/// Values shipped in `.env.example` that mean "no credential configured".
const CREDENTIAL_PLACEHOLDERS: &[&str] = &["YOUR_RAPIDAPI_KEY", "YOUR_APP_ID", "YOUR_APP_KEY"];

/// Library configuration loaded from environment variables.
/// Every provider credential is optional; the primary provider needs none.
#[derive(Debug, Clone)]
pub struct Config {
    pub rapidapi_key: Option<String>,
    pub adzuna_app_id: Option<String>,
    pub adzuna_app_key: Option<String>,
    pub adzuna_country: String,
    /// Query used when a search is submitted with empty text.
    pub default_query: String,
    pub http_timeout_secs: u64,
    pub rust_log: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            rapidapi_key: None,
            adzuna_app_id: None,
            adzuna_app_key: None,
            adzuna_country: "us".to_string(),
            default_query: "software developer".to_string(),
            http_timeout_secs: 20,
            rust_log: "info".to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let defaults = Config::default();

        Ok(Config {
            rapidapi_key: credential_from_env("RAPIDAPI_KEY"),
            adzuna_app_id: credential_from_env("ADZUNA_APP_ID"),
            adzuna_app_key: credential_from_env("ADZUNA_APP_KEY"),
            adzuna_country: std::env::var("ADZUNA_COUNTRY").unwrap_or(defaults.adzuna_country),
            default_query: std::env::var("JOBS_DEFAULT_QUERY").unwrap_or(defaults.default_query),
            http_timeout_secs: match std::env::var("JOBS_HTTP_TIMEOUT_SECS") {
                Ok(raw) => raw
                    .parse::<u64>()
                    .context("JOBS_HTTP_TIMEOUT_SECS must be a whole number of seconds")?,
                Err(_) => defaults.http_timeout_secs,
            },
            rust_log: std::env::var("RUST_LOG").unwrap_or(defaults.rust_log),
        })
    }
}

fn credential_from_env(key: &str) -> Option<String> {
    std::env::var(key).ok().and_then(usable_credential)
}

/// Returns `None` for empty values and known placeholders.
pub fn usable_credential(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() || CREDENTIAL_PLACEHOLDERS.contains(&trimmed) {
        None
    } else {
        Some(trimmed.to_string())
    }
}
