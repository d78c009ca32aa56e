//! Environment variable loading
//!
//! Every value is optional here; defaults are applied in `merge`.

use std::env;
use std::str::FromStr;

/// Configuration values read from environment variables
#[derive(Debug, Clone, Default)]
pub struct EnvConfig {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub tls_cert_path: Option<String>,
    pub tls_key_path: Option<String>,
    pub cors_allowed_origins: Option<String>,
    pub rate_limit_requests_per_second: Option<u32>,
    pub rate_limit_burst_size: Option<u32>,
    pub avatar_api_key: Option<String>,
    pub avatar_api_url: Option<String>,
    pub avatar_poll_interval_ms: Option<u64>,
    pub avatar_max_poll_attempts: Option<u32>,
    pub avatar_idle_script: Option<String>,
    pub avatar_voice_id: Option<String>,
    pub chunk_bytes_per_second: Option<f64>,
    pub chunk_max_duration_secs: Option<f64>,
    pub chunk_fallback_duration_secs: Option<f64>,
}

impl EnvConfig {
    /// Read all supported variables from the process environment
    ///
    /// # Errors
    /// Returns an error naming the variable when a numeric value cannot be parsed.
    pub fn load() -> Result<Self, Box<dyn std::error::Error>> {
        Ok(Self {
            host: string_var("HOST"),
            port: parsed_var("PORT")?,
            tls_cert_path: string_var("TLS_CERT_PATH"),
            tls_key_path: string_var("TLS_KEY_PATH"),
            cors_allowed_origins: string_var("CORS_ALLOWED_ORIGINS"),
            rate_limit_requests_per_second: parsed_var("RATE_LIMIT_REQUESTS_PER_SECOND")?,
            rate_limit_burst_size: parsed_var("RATE_LIMIT_BURST_SIZE")?,
            avatar_api_key: string_var("AVATAR_API_KEY"),
            avatar_api_url: string_var("AVATAR_API_URL"),
            avatar_poll_interval_ms: parsed_var("AVATAR_POLL_INTERVAL_MS")?,
            avatar_max_poll_attempts: parsed_var("AVATAR_MAX_POLL_ATTEMPTS")?,
            avatar_idle_script: string_var("AVATAR_IDLE_SCRIPT"),
            avatar_voice_id: string_var("AVATAR_VOICE_ID"),
            chunk_bytes_per_second: parsed_var("CHUNK_BYTES_PER_SECOND")?,
            chunk_max_duration_secs: parsed_var("CHUNK_MAX_DURATION_SECS")?,
            chunk_fallback_duration_secs: parsed_var("CHUNK_FALLBACK_DURATION_SECS")?,
        })
    }
}

/// Non-empty string value of `name`
fn string_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|value| !value.trim().is_empty())
}

fn parsed_var<T>(name: &str) -> Result<Option<T>, Box<dyn std::error::Error>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match string_var(name) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|e| format!("Invalid {name} value '{raw}': {e}").into()),
        None => Ok(None),
    }
}
