use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};
use secrecy::SecretString;

#[derive(Debug, Clone)]
pub struct Settings {
    /// Directory for the file-backed store.
    pub data_dir: PathBuf,
    /// Absent means draft generation fails with a configuration error.
    pub gemini_api_key: Option<SecretString>,
    pub gemini_model: String,
    pub ai_request_timeout_secs: u64,
    pub log_level: String,
}

impl Settings {
    pub fn from_env() -> Result<Self> {
        let data_dir = PathBuf::from(
            std::env::var("TECHFLOW_DATA_DIR").unwrap_or_else(|_| ".techflow".to_string()),
        );
        let gemini_api_key = get_optional("GEMINI_API_KEY").map(SecretString::from);
        let gemini_model =
            std::env::var("GEMINI_MODEL").unwrap_or_else(|_| "gemini-2.5-flash".to_string());
        let ai_request_timeout_secs = parse_u64_env("AI_REQUEST_TIMEOUT_SECS", 60)?;
        let log_level = std::env::var("LOG_LEVEL")
            .or_else(|_| std::env::var("RUST_LOG"))
            .unwrap_or_else(|_| "info".to_string());

        Ok(Self {
            data_dir,
            gemini_api_key,
            gemini_model,
            ai_request_timeout_secs,
            log_level,
        })
    }
}

fn get_optional(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn parse_u64_env(key: &str, default: u64) -> Result<u64> {
    let value = std::env::var(key)
        .unwrap_or_else(|_| default.to_string())
        .parse::<u64>()
        .with_context(|| format!("Failed to parse {key}, expecting positive integer"))?;

    if value == 0 {
        return Err(anyhow!("{key} must be > 0"));
    }
    Ok(value)
}
