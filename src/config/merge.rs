//! Merging YAML and environment configurations
//!
//! Priority: YAML > environment > defaults.

use std::path::PathBuf;

use super::env::EnvConfig;
use super::yaml::YamlConfig;
use super::{ServerConfig, TlsConfig};
use crate::core::avatar::{
    DEFAULT_IDLE_SCRIPT, DEFAULT_MAX_POLL_ATTEMPTS, DEFAULT_POLL_INTERVAL_MS, DEFAULT_VOICE_ID,
    DID_API_URL,
};
use crate::core::chunker::{
    DEFAULT_BYTES_PER_SECOND, DEFAULT_FALLBACK_DURATION_SECS, DEFAULT_MAX_CHUNK_DURATION_SECS,
};

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 3001;
const DEFAULT_RATE_LIMIT_REQUESTS_PER_SECOND: u32 = 60;
const DEFAULT_RATE_LIMIT_BURST_SIZE: u32 = 10;

/// Build a [`ServerConfig`] from an optional YAML file and the environment
///
/// # Errors
/// Returns an error if an environment variable cannot be parsed or TLS is
/// half configured.
pub fn merge_config(yaml: Option<YamlConfig>) -> Result<ServerConfig, Box<dyn std::error::Error>> {
    let env = EnvConfig::load()?;
    let yaml = yaml.unwrap_or_default();

    let server = yaml.server.unwrap_or_default();
    let security = yaml.security.unwrap_or_default();
    let avatar = yaml.avatar.unwrap_or_default();
    let chunking = yaml.chunking.unwrap_or_default();

    let tls = merge_tls(
        server.tls.as_ref().and_then(|tls| tls.enabled),
        server
            .tls
            .as_ref()
            .and_then(|tls| tls.cert_path.clone())
            .or(env.tls_cert_path),
        server
            .tls
            .as_ref()
            .and_then(|tls| tls.key_path.clone())
            .or(env.tls_key_path),
    )?;

    Ok(ServerConfig {
        host: server
            .host
            .or(env.host)
            .unwrap_or_else(|| DEFAULT_HOST.to_string()),
        port: server.port.or(env.port).unwrap_or(DEFAULT_PORT),
        tls,
        cors_allowed_origins: security.cors_allowed_origins.or(env.cors_allowed_origins),
        rate_limit_requests_per_second: security
            .rate_limit_requests_per_second
            .or(env.rate_limit_requests_per_second)
            .unwrap_or(DEFAULT_RATE_LIMIT_REQUESTS_PER_SECOND),
        rate_limit_burst_size: security
            .rate_limit_burst_size
            .or(env.rate_limit_burst_size)
            .unwrap_or(DEFAULT_RATE_LIMIT_BURST_SIZE),
        avatar_api_key: avatar.api_key.or(env.avatar_api_key),
        avatar_api_url: avatar
            .api_url
            .or(env.avatar_api_url)
            .unwrap_or_else(|| DID_API_URL.to_string()),
        avatar_poll_interval_ms: avatar
            .poll_interval_ms
            .or(env.avatar_poll_interval_ms)
            .unwrap_or(DEFAULT_POLL_INTERVAL_MS),
        avatar_max_poll_attempts: avatar
            .max_poll_attempts
            .or(env.avatar_max_poll_attempts)
            .unwrap_or(DEFAULT_MAX_POLL_ATTEMPTS),
        avatar_idle_script: avatar
            .idle_script
            .or(env.avatar_idle_script)
            .unwrap_or_else(|| DEFAULT_IDLE_SCRIPT.to_string()),
        avatar_voice_id: avatar
            .voice_id
            .or(env.avatar_voice_id)
            .unwrap_or_else(|| DEFAULT_VOICE_ID.to_string()),
        chunk_bytes_per_second: chunking
            .bytes_per_second
            .or(env.chunk_bytes_per_second)
            .unwrap_or(DEFAULT_BYTES_PER_SECOND),
        chunk_max_duration_secs: chunking
            .max_duration_secs
            .or(env.chunk_max_duration_secs)
            .unwrap_or(DEFAULT_MAX_CHUNK_DURATION_SECS),
        chunk_fallback_duration_secs: chunking
            .fallback_duration_secs
            .or(env.chunk_fallback_duration_secs)
            .unwrap_or(DEFAULT_FALLBACK_DURATION_SECS),
    })
}

/// TLS is on when both paths are present, unless YAML sets `enabled: false`.
fn merge_tls(
    enabled: Option<bool>,
    cert_path: Option<String>,
    key_path: Option<String>,
) -> Result<Option<TlsConfig>, Box<dyn std::error::Error>> {
    if enabled == Some(false) {
        return Ok(None);
    }

    match (cert_path, key_path) {
        (Some(cert_path), Some(key_path)) => Ok(Some(TlsConfig {
            cert_path: PathBuf::from(cert_path),
            key_path: PathBuf::from(key_path),
        })),
        (None, None) if enabled != Some(true) => Ok(None),
        _ => Err("TLS requires both a certificate path and a key path".into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_tls_both_paths() {
        let tls = merge_tls(
            None,
            Some("/tmp/cert.pem".to_string()),
            Some("/tmp/key.pem".to_string()),
        )
        .unwrap()
        .unwrap();
        assert_eq!(tls.cert_path, PathBuf::from("/tmp/cert.pem"));
        assert_eq!(tls.key_path, PathBuf::from("/tmp/key.pem"));
    }

    #[test]
    fn test_merge_tls_disabled_explicitly() {
        let tls = merge_tls(
            Some(false),
            Some("/tmp/cert.pem".to_string()),
            Some("/tmp/key.pem".to_string()),
        )
        .unwrap();
        assert!(tls.is_none());
    }

    #[test]
    fn test_merge_tls_missing_key() {
        let result = merge_tls(None, Some("/tmp/cert.pem".to_string()), None);
        assert!(result.is_err());

        let result = merge_tls(Some(true), None, None);
        assert!(result.is_err());

        assert!(merge_tls(None, None, None).unwrap().is_none());
    }
}
