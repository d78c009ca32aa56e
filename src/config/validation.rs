//! Configuration validation logic

use super::ServerConfig;

/// Validate a merged configuration
///
/// # Errors
/// Returns an error describing the first invalid setting:
/// - TLS files that do not exist
/// - Zero rate limits
/// - A non-http(s) avatar API URL or zero poll attempts
/// - Chunking values that are not finite and positive
pub fn validate_config(config: &ServerConfig) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(tls) = &config.tls {
        if !tls.cert_path.exists() {
            return Err(format!(
                "TLS certificate file not found: {}",
                tls.cert_path.display()
            )
            .into());
        }
        if !tls.key_path.exists() {
            return Err(format!("TLS key file not found: {}", tls.key_path.display()).into());
        }
    }

    if config.rate_limit_requests_per_second == 0 {
        return Err("rate_limit_requests_per_second must be greater than 0".into());
    }
    if config.rate_limit_burst_size == 0 {
        return Err("rate_limit_burst_size must be greater than 0".into());
    }

    let api_url = url::Url::parse(&config.avatar_api_url)
        .map_err(|e| format!("Invalid avatar api_url '{}': {e}", config.avatar_api_url))?;
    if !matches!(api_url.scheme(), "http" | "https") {
        return Err(format!(
            "Invalid avatar api_url '{}': scheme must be http or https",
            config.avatar_api_url
        )
        .into());
    }
    if config.avatar_max_poll_attempts == 0 {
        return Err("avatar max_poll_attempts must be at least 1".into());
    }
    if config.avatar_idle_script.trim().is_empty() {
        return Err("avatar idle_script must not be empty".into());
    }

    config
        .chunker_config()
        .validate()
        .map_err(|e| format!("Invalid chunking configuration: {e}"))?;

    Ok(())
}
