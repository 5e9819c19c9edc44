//! Configuration management for the CLI.

use crate::error::{CliError, Result};
use freshtrack_gateway::http::DEFAULT_ENDPOINT;
use freshtrack_gateway::{ExtractError, ExtractionGateway};
use freshtrack_scan::ScanConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment variable overriding `gateway.api_key`
pub const API_KEY_ENV: &str = "FRESHTRACK_API_KEY";

/// CLI configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Extraction endpoint
    #[serde(default)]
    pub gateway: GatewayConfig,

    /// Product database
    #[serde(default)]
    pub store: StoreConfig,

    /// Signed-in identity
    #[serde(default)]
    pub account: AccountConfig,

    /// Global settings
    #[serde(default)]
    pub settings: Settings,

    /// Camera and draft settings
    #[serde(default)]
    pub scan: ScanConfig,
}

/// Extraction endpoint settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GatewayConfig {
    /// Endpoint URL
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// API key sent as bearer token and `apikey` header
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Request timeout; none when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

/// Product database settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StoreConfig {
    /// SQLite file; defaults to `~/.freshtrack/products.db`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database: Option<PathBuf>,
}

/// Signed-in identity.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AccountConfig {
    /// Current user; absent when signed out
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
}

/// Global CLI settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Enable colored output
    #[serde(default = "default_true")]
    pub color: bool,

    /// Default output format
    #[serde(default = "default_format")]
    pub format: OutputFormat,
}

/// Output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Table format
    Table,
    /// JSON format
    Json,
    /// Quiet (minimal) format
    Quiet,
}

impl Config {
    /// Directory holding config, database and history.
    pub fn home() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| CliError::Config("Could not find home directory".into()))?;
        Ok(home.join(".freshtrack"))
    }

    /// Get the default configuration file path.
    pub fn default_path() -> Result<PathBuf> {
        Ok(Self::home()?.join("config.toml"))
    }

    /// Load configuration from `path`, or defaults if it does not exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config.scan.validate().map_err(CliError::Config)?;
        Ok(config)
    }

    /// Save configuration to `path`.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| CliError::Config(format!("Failed to serialize config: {}", e)))?;
        fs::write(path, contents)?;
        Ok(())
    }

    /// Resolved database path.
    pub fn database_path(&self) -> Result<PathBuf> {
        match &self.store.database {
            Some(path) => Ok(path.clone()),
            None => Ok(Self::home()?.join("products.db")),
        }
    }
}

impl GatewayConfig {
    /// API key, with the environment taking precedence over the file.
    pub fn resolved_api_key(&self) -> Option<String> {
        std::env::var(API_KEY_ENV)
            .ok()
            .filter(|key| !key.is_empty())
            .or_else(|| self.api_key.clone())
    }

    /// Build the HTTP gateway described by this section.
    pub fn build(&self) -> std::result::Result<ExtractionGateway, ExtractError> {
        let mut gateway = ExtractionGateway::new(&self.endpoint)?;
        if let Some(key) = self.resolved_api_key() {
            gateway = gateway.with_api_key(key);
        }
        if let Some(secs) = self.timeout_secs {
            gateway = gateway.with_timeout(Duration::from_secs(secs))?;
        }
        Ok(gateway)
    }
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            api_key: None,
            timeout_secs: None,
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            color: true,
            format: OutputFormat::Table,
        }
    }
}

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}

fn default_true() -> bool {
    true
}

fn default_format() -> OutputFormat {
    OutputFormat::Table
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.gateway.endpoint, DEFAULT_ENDPOINT);
        assert!(config.gateway.timeout_secs.is_none());
        assert!(config.account.user_id.is_none());
        assert!(config.settings.color);
        assert_eq!(config.settings.format, OutputFormat::Table);
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let config = Config::load_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_save_and_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.account.user_id = Some("alice".to_string());
        config.gateway.timeout_secs = Some(30);
        config.store.database = Some(dir.path().join("products.db"));
        config.save_to(&path).unwrap();

        assert_eq!(Config::load_from(&path).unwrap(), config);
    }

    #[test]
    fn test_partial_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            "[settings]\nformat = \"json\"\n\n[scan]\ntarget_width = 640\ntarget_height = 480\n",
        )
        .unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.settings.format, OutputFormat::Json);
        assert!(config.settings.color);
        assert_eq!(config.scan.target_width, 640);
        assert_eq!(config.gateway.endpoint, DEFAULT_ENDPOINT);
    }

    #[test]
    fn test_invalid_scan_section_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[scan]\ndraft_slot = \"\"\n").unwrap();
        assert!(matches!(Config::load_from(&path), Err(CliError::Config(_))));
    }

    #[test]
    fn test_explicit_database_path() {
        let mut config = Config::default();
        config.store.database = Some(PathBuf::from("/tmp/pantry.db"));
        assert_eq!(config.database_path().unwrap(), PathBuf::from("/tmp/pantry.db"));
    }

    #[test]
    fn test_build_gateway() {
        let config = GatewayConfig {
            endpoint: "http://localhost:9999/extract".to_string(),
            api_key: None,
            timeout_secs: Some(5),
        };
        let gateway = config.build().unwrap();
        assert_eq!(gateway.endpoint(), "http://localhost:9999/extract");
    }
}
