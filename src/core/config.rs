//! Configuration management for the MCP server.
//!
//! Configuration is layered: defaults, then a `.env` file, then environment
//! variables, then command-line overrides applied by the binary. The
//! `--config` JSON blob only fills credentials the environment left unset.

use super::error::{Error, Result};
use super::transport::TransportConfig;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{info, warn};

/// Default Feishu Open API base URL.
pub const DEFAULT_BASE_URL: &str = "https://open.feishu.cn/open-apis";

/// Main configuration structure for the MCP server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Server identification and metadata.
    pub server: ServerConfig,

    /// Logging configuration.
    pub logging: LoggingConfig,

    /// Transport configuration.
    pub transport: TransportConfig,

    /// Feishu application credentials.
    pub credentials: CredentialsConfig,

    /// Feishu Open API endpoint settings.
    pub feishu: FeishuConfig,

    /// Tool behaviour switches.
    pub tools: ToolsConfig,
}

/// Server identification configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// The name of the server as reported to clients.
    pub name: String,

    /// The version of the server.
    pub version: String,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "trace").
    pub level: String,

    /// Whether to include timestamps in log output.
    pub with_timestamps: bool,
}

/// Credentials for the Feishu application.
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct CredentialsConfig {
    /// Application identifier (`FEISHU_APPID`).
    pub app_id: Option<String>,

    /// Application secret (`FEISHU_APPSECRET`).
    pub app_secret: Option<String>,

    /// Optional pre-issued tenant or user access token. When set it is used
    /// instead of exchanging the app credentials for a tenant token.
    pub access_token: Option<String>,
}

/// Custom Debug implementation to redact secrets from logs.
impl std::fmt::Debug for CredentialsConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialsConfig")
            .field("app_id", &self.app_id)
            .field("app_secret", &self.app_secret.as_ref().map(|_| "[REDACTED]"))
            .field(
                "access_token",
                &self.access_token.as_ref().map(|_| "[REDACTED]"),
            )
            .finish()
    }
}

impl CredentialsConfig {
    /// Return the app id and secret, or a configuration error if either is
    /// missing or blank.
    pub fn require_app_credentials(&self) -> Result<(&str, &str)> {
        let app_id = self.app_id.as_deref().filter(|v| !v.trim().is_empty());
        let app_secret = self.app_secret.as_deref().filter(|v| !v.trim().is_empty());

        match (app_id, app_secret) {
            (Some(id), Some(secret)) => Ok((id, secret)),
            _ => Err(Error::config(
                "appId and appSecret must be set (FEISHU_APPID / FEISHU_APPSECRET or --config)",
            )),
        }
    }

    /// Fill unset fields from a `--config` JSON blob.
    ///
    /// Values already present (from the environment) win over the blob.
    pub fn merge_json(&mut self, raw: &str) -> Result<()> {
        let blob: CredentialsBlob = serde_json::from_str(raw)
            .map_err(|e| Error::config(format!("invalid --config JSON: {}", e)))?;

        if self.app_id.is_none() {
            self.app_id = blob.app_id;
        }
        if self.app_secret.is_none() {
            self.app_secret = blob.app_secret;
        }
        if self.access_token.is_none() {
            self.access_token = blob.access_token;
        }
        Ok(())
    }
}

/// Shape of the `--config` command-line JSON blob.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CredentialsBlob {
    app_id: Option<String>,
    app_secret: Option<String>,
    access_token: Option<String>,
}

/// Feishu Open API endpoint settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeishuConfig {
    /// Base URL of the Open API, without trailing slash.
    pub base_url: String,

    /// Request timeout in seconds. `None` keeps the HTTP client's default.
    pub timeout_secs: Option<u64>,
}

impl FeishuConfig {
    /// The configured request timeout, if any.
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

impl Default for FeishuConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: None,
        }
    }
}

/// Tool behaviour switches.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolsConfig {
    /// Read a record before deleting it and refuse to delete when the read
    /// fails.
    pub verify_before_delete: bool,
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            verify_before_delete: true,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                name: "feishu-mcp-server".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                with_timestamps: true,
            },
            transport: TransportConfig::default(),
            credentials: CredentialsConfig::default(),
            feishu: FeishuConfig::default(),
            tools: ToolsConfig::default(),
        }
    }
}

impl Config {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from environment variables (and `.env`).
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let mut config = Self::default();

        if let Ok(name) = std::env::var("MCP_SERVER_NAME") {
            config.server.name = name;
        }

        if let Ok(level) = std::env::var("MCP_LOG_LEVEL") {
            config.logging.level = level;
        }

        config.transport = TransportConfig::from_env();

        config.credentials.app_id = non_empty_var("FEISHU_APPID");
        config.credentials.app_secret = non_empty_var("FEISHU_APPSECRET");
        config.credentials.access_token = non_empty_var("FEISHU_ACCESS_TOKEN");
        if config.credentials.app_id.is_some() {
            info!("Feishu app credentials loaded from environment");
        }

        if let Some(base_url) = non_empty_var("FEISHU_BASE_URL") {
            config.feishu.base_url = base_url.trim_end_matches('/').to_string();
            info!("Feishu base URL: {}", config.feishu.base_url);
        }

        if let Some(timeout) = non_empty_var("FEISHU_TIMEOUT_SECS") {
            match timeout.parse() {
                Ok(secs) => config.feishu.timeout_secs = Some(secs),
                Err(_) => warn!("Ignoring invalid FEISHU_TIMEOUT_SECS: {}", timeout),
            }
        }

        if let Ok(verify) = std::env::var("FEISHU_VERIFY_BEFORE_DELETE") {
            config.tools.verify_before_delete = parse_flag(&verify).unwrap_or(true);
            info!(
                "Verify-before-delete: {}",
                config.tools.verify_before_delete
            );
        }

        config
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    // Mutex to ensure env var tests run serially
    static ENV_TEST_LOCK: Mutex<()> = Mutex::new(());

    #[test]
    fn test_credentials_from_env() {
        let _lock = ENV_TEST_LOCK.lock().unwrap();
        unsafe {
            std::env::set_var("FEISHU_APPID", "cli_test");
            std::env::set_var("FEISHU_APPSECRET", "secret_12345");
        }
        let config = Config::from_env();
        assert_eq!(config.credentials.app_id.as_deref(), Some("cli_test"));
        assert!(config.credentials.require_app_credentials().is_ok());
        unsafe {
            std::env::remove_var("FEISHU_APPID");
            std::env::remove_var("FEISHU_APPSECRET");
        }
    }

    #[test]
    fn test_verify_before_delete_env() {
        let _lock = ENV_TEST_LOCK.lock().unwrap();
        unsafe {
            std::env::set_var("FEISHU_VERIFY_BEFORE_DELETE", "false");
        }
        let config = Config::from_env();
        assert!(!config.tools.verify_before_delete);
        unsafe {
            std::env::remove_var("FEISHU_VERIFY_BEFORE_DELETE");
        }
    }

    #[test]
    fn test_missing_credentials_is_config_error() {
        let creds = CredentialsConfig {
            app_id: Some("cli_a".to_string()),
            app_secret: Some("   ".to_string()),
            access_token: None,
        };
        let err = creds.require_app_credentials().unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_merge_json_keeps_env_values() {
        let mut creds = CredentialsConfig {
            app_id: Some("from_env".to_string()),
            ..Default::default()
        };
        creds
            .merge_json(r#"{"appId":"from_blob","appSecret":"s","accessToken":"t-1"}"#)
            .unwrap();
        assert_eq!(creds.app_id.as_deref(), Some("from_env"));
        assert_eq!(creds.app_secret.as_deref(), Some("s"));
        assert_eq!(creds.access_token.as_deref(), Some("t-1"));
    }

    #[test]
    fn test_merge_json_rejects_garbage() {
        let mut creds = CredentialsConfig::default();
        assert!(creds.merge_json("{not json").is_err());
    }

    #[test]
    fn test_credentials_redacted_in_debug() {
        let creds = CredentialsConfig {
            app_id: Some("cli_visible".to_string()),
            app_secret: Some("super_secret_key".to_string()),
            access_token: Some("t-secret-token".to_string()),
        };
        let debug_str = format!("{:?}", creds);
        assert!(debug_str.contains("REDACTED"));
        assert!(debug_str.contains("cli_visible"));
        assert!(!debug_str.contains("super_secret_key"));
        assert!(!debug_str.contains("t-secret-token"));
    }

    #[test]
    fn test_parse_flag() {
        assert_eq!(parse_flag("TRUE"), Some(true));
        assert_eq!(parse_flag("0"), Some(false));
        assert_eq!(parse_flag("maybe"), None);
    }
}
