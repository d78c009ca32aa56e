use serde::Deserialize;
use std::path::PathBuf;

/// Complete YAML configuration structure
///
/// This structure represents the full configuration that can be loaded from a YAML file.
/// All fields are optional to allow partial configuration. Values present here win over
/// environment variables.
///
/// # Example YAML structure
/// ```yaml
/// server:
///   host: "0.0.0.0"
///   port: 3001
///   tls:
///     enabled: true
///     cert_path: "/etc/avatar-gateway/cert.pem"
///     key_path: "/etc/avatar-gateway/key.pem"
///
/// security:
///   cors_allowed_origins: "https://app.example.com"
///   rate_limit_requests_per_second: 60
///   rate_limit_burst_size: 10
///
/// avatar:
///   api_key: "your-d-id-key"
///   api_url: "https://api.d-id.com"
///   poll_interval_ms: 2000
///   max_poll_attempts: 60
///   idle_script: "<speak><break time=\"5000ms\"/></speak>"
///   voice_id: "en-US-JennyNeural"
///
/// chunking:
///   bytes_per_second: 2000
///   max_duration_secs: 30
///   fallback_duration_secs: 10
/// ```
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct YamlConfig {
    pub server: Option<ServerYaml>,
    pub security: Option<SecurityYaml>,
    pub avatar: Option<AvatarYaml>,
    pub chunking: Option<ChunkingYaml>,
}

/// Server configuration from YAML
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct ServerYaml {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub tls: Option<TlsYaml>,
}

/// TLS configuration from YAML
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct TlsYaml {
    pub enabled: Option<bool>,
    pub cert_path: Option<String>,
    pub key_path: Option<String>,
}

/// Security configuration from YAML
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct SecurityYaml {
    /// CORS allowed origins (comma-separated list or "*" for all)
    pub cors_allowed_origins: Option<String>,
    /// Maximum requests per second per IP address
    pub rate_limit_requests_per_second: Option<u32>,
    /// Maximum burst size for rate limiting
    pub rate_limit_burst_size: Option<u32>,
}

/// Avatar provider configuration from YAML
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct AvatarYaml {
    pub api_key: Option<String>,
    pub api_url: Option<String>,
    pub poll_interval_ms: Option<u64>,
    pub max_poll_attempts: Option<u32>,
    pub idle_script: Option<String>,
    pub voice_id: Option<String>,
}

/// Audio chunking configuration from YAML
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct ChunkingYaml {
    pub bytes_per_second: Option<f64>,
    pub max_duration_secs: Option<f64>,
    pub fallback_duration_secs: Option<f64>,
}

impl YamlConfig {
    /// Load configuration from a YAML file
    ///
    /// # Arguments
    /// * `path` - Path to the YAML configuration file
    ///
    /// # Returns
    /// * `Result<YamlConfig, Box<dyn std::error::Error>>` - The loaded configuration or an error
    ///
    /// # Errors
    /// Returns an error if:
    /// - The file cannot be read
    /// - The YAML is malformed
    /// - Required fields have invalid types
    pub fn from_file(path: &PathBuf) -> Result<Self, Box<dyn std::error::Error>> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config file {}: {e}", path.display()))?;

        let config: YamlConfig = serde_yaml::from_str(&contents)
            .map_err(|e| format!("Failed to parse YAML config: {e}"))?;

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_yaml_config_full() {
        let yaml = r#"
server:
  host: "127.0.0.1"
  port: 8080
  tls:
    enabled: true
    cert_path: "/tmp/cert.pem"
    key_path: "/tmp/key.pem"

security:
  cors_allowed_origins: "*"
  rate_limit_requests_per_second: 120
  rate_limit_burst_size: 20

avatar:
  api_key: "did-key"
  api_url: "http://localhost:9000"
  poll_interval_ms: 100
  max_poll_attempts: 5
  voice_id: "en-GB-SoniaNeural"

chunking:
  bytes_per_second: 4000
  max_duration_secs: 15.5
  fallback_duration_secs: 8
"#;

        let config: YamlConfig = serde_yaml::from_str(yaml).unwrap();

        let server = config.server.as_ref().unwrap();
        assert_eq!(server.host, Some("127.0.0.1".to_string()));
        assert_eq!(server.port, Some(8080));
        assert_eq!(server.tls.as_ref().unwrap().enabled, Some(true));

        let security = config.security.as_ref().unwrap();
        assert_eq!(security.cors_allowed_origins, Some("*".to_string()));
        assert_eq!(security.rate_limit_requests_per_second, Some(120));
        assert_eq!(security.rate_limit_burst_size, Some(20));

        let avatar = config.avatar.as_ref().unwrap();
        assert_eq!(avatar.api_key, Some("did-key".to_string()));
        assert_eq!(avatar.poll_interval_ms, Some(100));
        assert_eq!(avatar.max_poll_attempts, Some(5));
        assert_eq!(avatar.voice_id, Some("en-GB-SoniaNeural".to_string()));
        assert!(avatar.idle_script.is_none());

        let chunking = config.chunking.as_ref().unwrap();
        assert_eq!(chunking.bytes_per_second, Some(4000.0));
        assert_eq!(chunking.max_duration_secs, Some(15.5));
        assert_eq!(chunking.fallback_duration_secs, Some(8.0));
    }

    #[test]
    fn test_yaml_config_partial() {
        let yaml = r#"
avatar:
  api_key: "only-the-key"
"#;

        let config: YamlConfig = serde_yaml::from_str(yaml).unwrap();

        assert!(config.server.is_none());
        assert!(config.security.is_none());
        assert!(config.chunking.is_none());
        assert_eq!(
            config.avatar.unwrap().api_key,
            Some("only-the-key".to_string())
        );
    }

    #[test]
    fn test_yaml_config_empty() {
        let config: YamlConfig = serde_yaml::from_str("{}").unwrap();
        assert!(config.server.is_none());
        assert!(config.avatar.is_none());
    }

    #[test]
    fn test_yaml_from_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.yaml");
        fs::write(&path, "server:\n  port: 4000\n").unwrap();

        let config = YamlConfig::from_file(&path).unwrap();
        assert_eq!(config.server.unwrap().port, Some(4000));
    }

    #[test]
    fn test_yaml_from_file_wrong_type() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.yaml");
        fs::write(&path, "server:\n  port: \"not-a-number\"\n").unwrap();

        let result = YamlConfig::from_file(&path);
        assert!(result.is_err());
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("Failed to parse YAML config")
        );
    }
}
