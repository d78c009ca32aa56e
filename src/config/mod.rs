//! Configuration module for the Avatar Gateway server
//!
//! This module handles server configuration from various sources: .env files, YAML files,
//! and environment variables. Priority: YAML > ENV vars > .env values > defaults.
//!
//! # Modules
//! - `yaml`: YAML configuration file loading
//! - `env`: Environment variable loading
//! - `merge`: Merging YAML and environment configurations
//! - `validation`: Configuration validation logic
//!
//! # Example
//! ```rust,no_run
//! use avatar_gateway::config::ServerConfig;
//! use std::path::PathBuf;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! // Load from environment variables only
//! let config = ServerConfig::from_env()?;
//!
//! // Load from YAML file with environment variable overrides
//! let config_path = PathBuf::from("config.yaml");
//! let config = ServerConfig::from_file(&config_path)?;
//!
//! println!("Server listening on {}", config.address());
//! # Ok(())
//! # }
//! ```

use std::path::PathBuf;
use std::time::Duration;

mod env;
mod merge;
mod validation;
mod yaml;

use crate::core::avatar::{AvatarConfig, DEFAULT_REQUEST_TIMEOUT_SECS};
use crate::core::chunker::ChunkerConfig;

/// TLS configuration for HTTPS
#[derive(Debug, Clone)]
pub struct TlsConfig {
    /// Path to the TLS certificate file (PEM format)
    pub cert_path: PathBuf,
    /// Path to the TLS private key file (PEM format)
    pub key_path: PathBuf,
}

/// Server configuration
///
/// Contains all configuration needed to run the Avatar Gateway server, including:
/// - Server settings (host, port, TLS)
/// - Security settings (CORS, rate limiting)
/// - Avatar provider settings (idle video generation)
/// - Audio chunking heuristics
#[derive(Debug, Clone)]
pub struct ServerConfig {
    // Server settings
    pub host: String,
    pub port: u16,

    // TLS configuration (optional)
    pub tls: Option<TlsConfig>,

    // Security configuration
    /// CORS allowed origins (comma-separated list or "*" for all)
    /// Default: None (CORS disabled, same-origin only)
    pub cors_allowed_origins: Option<String>,

    // Rate limiting configuration
    /// Maximum requests per second per IP address
    /// Default: 60
    pub rate_limit_requests_per_second: u32,
    /// Maximum burst size for rate limiting
    /// Default: 10
    pub rate_limit_burst_size: u32,

    // Avatar provider settings
    /// D-ID API key used for idle video generation
    pub avatar_api_key: Option<String>,
    /// Base URL of the talks API (default: https://api.d-id.com)
    pub avatar_api_url: String,
    /// Delay between two render status checks
    pub avatar_poll_interval_ms: u64,
    /// Status checks before an idle render is abandoned
    pub avatar_max_poll_attempts: u32,
    /// SSML the avatar performs in its idle loop
    pub avatar_idle_script: String,
    /// Voice used to render the idle script
    pub avatar_voice_id: String,

    // Audio chunking heuristics
    /// Decoded bytes per second of audio (default: 2000)
    pub chunk_bytes_per_second: f64,
    /// Longest audio segment per avatar video request (default: 30s)
    pub chunk_max_duration_secs: f64,
    /// Duration assumed for unparseable payloads (default: 10s)
    pub chunk_fallback_duration_secs: f64,
}

/// Zeroize secret fields when ServerConfig is dropped.
impl Drop for ServerConfig {
    fn drop(&mut self) {
        use zeroize::Zeroize;

        if let Some(ref mut key) = self.avatar_api_key {
            key.zeroize();
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables
    ///
    /// Unset variables fall back to their defaults.
    ///
    /// # Errors
    /// Returns an error if a variable has an invalid format or validation fails.
    pub fn from_env() -> Result<Self, Box<dyn std::error::Error>> {
        let config = merge::merge_config(None)?;

        validation::validate_config(&config)?;

        Ok(config)
    }

    /// Load configuration from a YAML file with environment variable base
    ///
    /// Environment variables (and any .env values loaded in main.rs) provide the
    /// base configuration; values present in the YAML file override them.
    ///
    /// Priority order (highest to lowest):
    /// 1. YAML file values
    /// 2. Environment variables (actual ENV vars override .env values)
    /// 3. .env file values
    /// 4. Default values
    ///
    /// # Errors
    /// Returns an error if:
    /// - The YAML file cannot be read or is malformed
    /// - Environment variables have invalid formats
    /// - Configuration validation fails
    pub fn from_file(path: &PathBuf) -> Result<Self, Box<dyn std::error::Error>> {
        let yaml_config = yaml::YamlConfig::from_file(path)?;

        let config = merge::merge_config(Some(yaml_config))?;

        validation::validate_config(&config)?;

        Ok(config)
    }

    /// Get the server address as a string
    ///
    /// Returns the address in the format "host:port"
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Check if TLS is enabled
    pub fn is_tls_enabled(&self) -> bool {
        self.tls.is_some()
    }

    /// Check if an avatar provider key is configured
    pub fn has_avatar_provider(&self) -> bool {
        self.avatar_api_key
            .as_deref()
            .is_some_and(|key| !key.is_empty())
    }

    /// Build the avatar provider settings
    ///
    /// # Returns
    /// * `Result<AvatarConfig, String>` - The provider settings, or an error message
    ///   when no API key is configured
    pub fn avatar_config(&self) -> Result<AvatarConfig, String> {
        let api_key = self
            .avatar_api_key
            .clone()
            .filter(|key| !key.is_empty())
            .ok_or_else(|| "Avatar API key not configured in server environment".to_string())?;

        Ok(AvatarConfig {
            api_key,
            api_url: self.avatar_api_url.clone(),
            poll_interval: Duration::from_millis(self.avatar_poll_interval_ms),
            max_poll_attempts: self.avatar_max_poll_attempts,
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            idle_script: self.avatar_idle_script.clone(),
            voice_id: self.avatar_voice_id.clone(),
        })
    }

    /// Build the audio chunker settings
    pub fn chunker_config(&self) -> ChunkerConfig {
        ChunkerConfig {
            bytes_per_second: self.chunk_bytes_per_second,
            max_chunk_duration_secs: self.chunk_max_duration_secs,
            fallback_duration_secs: self.chunk_fallback_duration_secs,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::avatar::{
        DEFAULT_IDLE_SCRIPT, DEFAULT_MAX_POLL_ATTEMPTS, DEFAULT_POLL_INTERVAL_MS,
        DEFAULT_VOICE_ID, DID_API_URL,
    };
    use serial_test::serial;
    use std::env;
    use std::fs;
    use tempfile::TempDir;

    /// Helper function to create a test ServerConfig with defaults
    fn test_config() -> ServerConfig {
        ServerConfig {
            host: "localhost".to_string(),
            port: 3001,
            tls: None,
            cors_allowed_origins: None,
            rate_limit_requests_per_second: 60,
            rate_limit_burst_size: 10,
            avatar_api_key: Some("test-avatar-key".to_string()),
            avatar_api_url: DID_API_URL.to_string(),
            avatar_poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            avatar_max_poll_attempts: DEFAULT_MAX_POLL_ATTEMPTS,
            avatar_idle_script: DEFAULT_IDLE_SCRIPT.to_string(),
            avatar_voice_id: DEFAULT_VOICE_ID.to_string(),
            chunk_bytes_per_second: 2000.0,
            chunk_max_duration_secs: 30.0,
            chunk_fallback_duration_secs: 10.0,
        }
    }

    #[test]
    fn test_address() {
        let config = test_config();
        assert_eq!(config.address(), "localhost:3001");
        assert!(!config.is_tls_enabled());
    }

    #[test]
    fn test_avatar_config_success() {
        let config = test_config();
        let avatar = config.avatar_config().unwrap();

        assert_eq!(avatar.api_key, "test-avatar-key");
        assert_eq!(avatar.api_url, DID_API_URL);
        assert_eq!(avatar.poll_interval, Duration::from_millis(2000));
        assert_eq!(avatar.max_poll_attempts, 60);
        assert!(config.has_avatar_provider());
    }

    #[test]
    fn test_avatar_config_missing_key() {
        let mut config = test_config();
        config.avatar_api_key = None;
        assert!(!config.has_avatar_provider());
        assert!(
            config
                .avatar_config()
                .unwrap_err()
                .contains("Avatar API key not configured")
        );

        config.avatar_api_key = Some(String::new());
        assert!(!config.has_avatar_provider());
        assert!(config.avatar_config().is_err());
    }

    #[test]
    fn test_chunker_config() {
        let mut config = test_config();
        config.chunk_bytes_per_second = 4000.0;

        let chunker = config.chunker_config();
        assert_eq!(chunker.bytes_per_second, 4000.0);
        assert_eq!(chunker.max_chunk_duration_secs, 30.0);
        assert_eq!(chunker.fallback_duration_secs, 10.0);
    }

    // Helper to clean up environment variables
    fn cleanup_env_vars() {
        unsafe {
            env::remove_var("HOST");
            env::remove_var("PORT");
            env::remove_var("TLS_CERT_PATH");
            env::remove_var("TLS_KEY_PATH");
            env::remove_var("CORS_ALLOWED_ORIGINS");
            env::remove_var("RATE_LIMIT_REQUESTS_PER_SECOND");
            env::remove_var("RATE_LIMIT_BURST_SIZE");
            env::remove_var("AVATAR_API_KEY");
            env::remove_var("AVATAR_API_URL");
            env::remove_var("AVATAR_POLL_INTERVAL_MS");
            env::remove_var("AVATAR_MAX_POLL_ATTEMPTS");
            env::remove_var("AVATAR_IDLE_SCRIPT");
            env::remove_var("AVATAR_VOICE_ID");
            env::remove_var("CHUNK_BYTES_PER_SECOND");
            env::remove_var("CHUNK_MAX_DURATION_SECS");
            env::remove_var("CHUNK_FALLBACK_DURATION_SECS");
        }
    }

    #[test]
    #[serial]
    fn test_from_env_defaults() {
        cleanup_env_vars();

        let config = ServerConfig::from_env().unwrap();

        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 3001);
        assert!(config.tls.is_none());
        assert!(config.cors_allowed_origins.is_none());
        assert_eq!(config.rate_limit_requests_per_second, 60);
        assert_eq!(config.rate_limit_burst_size, 10);
        assert!(config.avatar_api_key.is_none());
        assert_eq!(config.avatar_api_url, DID_API_URL);
        assert_eq!(config.avatar_idle_script, DEFAULT_IDLE_SCRIPT);
        assert_eq!(config.chunk_bytes_per_second, 2000.0);
        assert_eq!(config.chunk_max_duration_secs, 30.0);
        assert_eq!(config.chunk_fallback_duration_secs, 10.0);

        cleanup_env_vars();
    }

    #[test]
    #[serial]
    fn test_from_env_values() {
        cleanup_env_vars();

        unsafe {
            env::set_var("HOST", "127.0.0.1");
            env::set_var("PORT", "8080");
            env::set_var("AVATAR_API_KEY", "env-key");
            env::set_var("AVATAR_API_URL", "http://localhost:9000");
            env::set_var("AVATAR_POLL_INTERVAL_MS", "250");
            env::set_var("CHUNK_MAX_DURATION_SECS", "20");
        }

        let config = ServerConfig::from_env().unwrap();

        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 8080);
        assert_eq!(config.avatar_api_key, Some("env-key".to_string()));
        assert_eq!(config.avatar_api_url, "http://localhost:9000");
        assert_eq!(config.avatar_poll_interval_ms, 250);
        assert_eq!(config.chunk_max_duration_secs, 20.0);

        cleanup_env_vars();
    }

    #[test]
    #[serial]
    fn test_from_env_invalid_port() {
        cleanup_env_vars();

        unsafe {
            env::set_var("PORT", "not-a-port");
        }

        let result = ServerConfig::from_env();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("PORT"));

        cleanup_env_vars();
    }

    #[test]
    #[serial]
    fn test_from_env_rejects_non_positive_chunk_settings() {
        cleanup_env_vars();

        unsafe {
            env::set_var("CHUNK_BYTES_PER_SECOND", "0");
        }

        let result = ServerConfig::from_env();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("bytes_per_second"));

        cleanup_env_vars();
    }

    #[test]
    #[serial]
    fn test_from_file_yaml_only() {
        cleanup_env_vars();

        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.yaml");

        let yaml_content = r#"
server:
  host: "127.0.0.1"
  port: 8080

avatar:
  api_key: "yaml-avatar-key"
  api_url: "http://localhost:9000"
  poll_interval_ms: 500
  max_poll_attempts: 10

chunking:
  bytes_per_second: 4000
  max_duration_secs: 20
"#;

        fs::write(&config_path, yaml_content).unwrap();

        let config = ServerConfig::from_file(&config_path).unwrap();

        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 8080);
        assert_eq!(config.avatar_api_key, Some("yaml-avatar-key".to_string()));
        assert_eq!(config.avatar_api_url, "http://localhost:9000");
        assert_eq!(config.avatar_poll_interval_ms, 500);
        assert_eq!(config.avatar_max_poll_attempts, 10);
        assert_eq!(config.chunk_bytes_per_second, 4000.0);
        assert_eq!(config.chunk_max_duration_secs, 20.0);
        // Not in YAML, falls back to default
        assert_eq!(config.chunk_fallback_duration_secs, 10.0);

        cleanup_env_vars();
    }

    #[test]
    #[serial]
    fn test_from_file_yaml_overrides_env() {
        cleanup_env_vars();

        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.yaml");

        let yaml_content = r#"
server:
  host: "127.0.0.1"

avatar:
  api_key: "yaml-key"
"#;

        fs::write(&config_path, yaml_content).unwrap();

        unsafe {
            env::set_var("HOST", "0.0.0.0");
            env::set_var("PORT", "9090");
            env::set_var("AVATAR_API_KEY", "env-key");
        }

        let config = ServerConfig::from_file(&config_path).unwrap();

        // YAML overrides ENV
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.avatar_api_key, Some("yaml-key".to_string()));
        // ENV value kept where YAML is silent
        assert_eq!(config.port, 9090);

        cleanup_env_vars();
    }

    #[test]
    #[serial]
    fn test_from_file_missing_file() {
        cleanup_env_vars();

        let config_path = PathBuf::from("/nonexistent/config.yaml");
        let result = ServerConfig::from_file(&config_path);

        assert!(result.is_err());
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("Failed to read config file")
        );

        cleanup_env_vars();
    }

    #[test]
    #[serial]
    fn test_from_file_invalid_yaml() {
        cleanup_env_vars();

        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("invalid.yaml");

        fs::write(&config_path, "invalid: yaml: [content").unwrap();

        let result = ServerConfig::from_file(&config_path);

        assert!(result.is_err());
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("Failed to parse YAML")
        );

        cleanup_env_vars();
    }

    #[test]
    #[serial]
    fn test_from_file_invalid_avatar_url() {
        cleanup_env_vars();

        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.yaml");

        fs::write(
            &config_path,
            r#"
avatar:
  api_url: "ftp://example.com"
"#,
        )
        .unwrap();

        let result = ServerConfig::from_file(&config_path);
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("api_url"));

        cleanup_env_vars();
    }

    #[test]
    #[serial]
    fn test_from_file_with_tls() {
        cleanup_env_vars();

        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.yaml");
        let cert_path = temp_dir.path().join("cert.pem");
        let key_path = temp_dir.path().join("key.pem");
        fs::write(&cert_path, "fake cert").unwrap();
        fs::write(&key_path, "fake key").unwrap();

        let yaml_content = format!(
            r#"
server:
  tls:
    enabled: true
    cert_path: "{}"
    key_path: "{}"
"#,
            cert_path.display(),
            key_path.display()
        );
        fs::write(&config_path, yaml_content).unwrap();

        let config = ServerConfig::from_file(&config_path).unwrap();
        assert!(config.is_tls_enabled());
        let tls = config.tls.as_ref().unwrap();
        assert_eq!(tls.cert_path, cert_path);
        assert_eq!(tls.key_path, key_path);

        cleanup_env_vars();
    }
}
