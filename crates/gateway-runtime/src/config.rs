//! # Gateway Configuration
//!
//! Read once at startup: a TOML file, then environment overrides.
//!
//! | Variable | Overrides |
//! |----------|-----------|
//! | `GW_CONFIG` | Config file path (default `gateway.toml`, optional) |
//! | `GW_BOT_TOKEN` | `bot.token` |
//! | `GW_BOT_NAME` | `bot.name` |
//! | `GW_DB_PATH` | `storage.db_path` |
//! | `GW_DOCS_DIR` | `documents.dir` |
//! | `GW_DOCS_RECURSIVE` | `documents.recursive` |
//! | `GW_ADMIN_IDS` | `roles.admin_ids` (comma separated) |
//! | `GW_OPERATOR_IDS` | `roles.operator_ids` (comma separated) |

use cg_02_document_sync::ScanOptions;
use cg_03_role_reconciler::ConfiguredRoles;
use cg_04_pipeline::PipelineConfig;
use serde::{Deserialize, Serialize};
use shared_types::UserId;
use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Config file used when `GW_CONFIG` is unset.
pub const DEFAULT_CONFIG_PATH: &str = "gateway.toml";

/// Complete gateway configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GatewayConfig {
    pub bot: BotConfig,
    pub storage: StorageConfig,
    pub documents: DocumentsConfig,
    pub roles: RolesConfig,
    pub pipeline: PipelineConfig,
    pub shutdown: ShutdownConfig,
}

/// Bot identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BotConfig {
    /// Transport credential. Required.
    pub token: String,
    /// Display name used in the startup banner.
    pub name: String,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            token: String::new(),
            name: "Gateway Bot".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub db_path: PathBuf,
    /// fsync after every write.
    pub sync_writes: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from("./data/gateway.db"),
            sync_writes: true,
        }
    }
}

/// Document directory mirrored into the catalog at startup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DocumentsConfig {
    pub dir: PathBuf,
    pub recursive: bool,
    pub include_hidden: bool,
}

impl Default for DocumentsConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("./documents"),
            recursive: false,
            include_hidden: false,
        }
    }
}

impl DocumentsConfig {
    pub fn scan_options(&self) -> ScanOptions {
        ScanOptions {
            recursive: self.recursive,
            include_hidden: self.include_hidden,
        }
    }
}

/// Statically configured privileged users.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RolesConfig {
    pub admin_ids: Vec<UserId>,
    pub operator_ids: Vec<UserId>,
}

impl RolesConfig {
    pub fn configured(&self) -> ConfiguredRoles {
        ConfiguredRoles {
            admins: self.admin_ids.clone(),
            operators: self.operator_ids.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShutdownConfig {
    /// How long in-flight events may run after shutdown is requested.
    #[serde(with = "humantime_serde")]
    pub drain_timeout: Duration,
}

impl Default for ShutdownConfig {
    fn default() -> Self {
        Self {
            drain_timeout: Duration::from_secs(10),
        }
    }
}

/// Configuration errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Cannot read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Invalid value for {var}: '{value}'")]
    InvalidEnv { var: &'static str, value: String },

    #[error("Bot token is not set. Provide bot.token or GW_BOT_TOKEN")]
    MissingToken,

    #[error("pipeline.consent_action must not be empty")]
    EmptyConsentAction,
}

impl GatewayConfig {
    /// Load from the process environment and the config file it names.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_with(|key| env::var(key).ok())
    }

    /// Same as `load`, reading variables through `lookup`.
    pub fn load_with<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = match lookup("GW_CONFIG") {
            Some(path) => Self::from_file(Path::new(&path))?,
            None => {
                let default = Path::new(DEFAULT_CONFIG_PATH);
                if default.exists() {
                    Self::from_file(default)?
                } else {
                    Self::default()
                }
            }
        };
        config.apply_env(lookup)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Apply `GW_*` overrides on top of the file values.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(token) = lookup("GW_BOT_TOKEN") {
            self.bot.token = token;
        }
        if let Some(name) = lookup("GW_BOT_NAME") {
            self.bot.name = name;
        }
        if let Some(path) = lookup("GW_DB_PATH") {
            self.storage.db_path = PathBuf::from(path);
        }
        if let Some(dir) = lookup("GW_DOCS_DIR") {
            self.documents.dir = PathBuf::from(dir);
        }
        if let Some(value) = lookup("GW_DOCS_RECURSIVE") {
            self.documents.recursive = parse_bool("GW_DOCS_RECURSIVE", &value)?;
        }
        if let Some(value) = lookup("GW_ADMIN_IDS") {
            self.roles.admin_ids = parse_ids("GW_ADMIN_IDS", &value)?;
        }
        if let Some(value) = lookup("GW_OPERATOR_IDS") {
            self.roles.operator_ids = parse_ids("GW_OPERATOR_IDS", &value)?;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.bot.token.trim().is_empty() {
            return Err(ConfigError::MissingToken);
        }
        if self.pipeline.consent_action.is_empty() {
            return Err(ConfigError::EmptyConsentAction);
        }
        Ok(())
    }
}

fn parse_bool(var: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidEnv {
            var,
            value: value.to_string(),
        }),
    }
}

/// Comma separated ids; blanks are ignored so `""` clears the list.
fn parse_ids(var: &'static str, value: &str) -> Result<Vec<UserId>, ConfigError> {
    value
        .split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(|part| {
            part.parse::<UserId>().map_err(|_| ConfigError::InvalidEnv {
                var,
                value: value.to_string(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_full_file() {
        let config: GatewayConfig = toml::from_str(
            r#"
            [bot]
            token = "123:abc"
            name = "Helpdesk"

            [storage]
            db_path = "/var/lib/helpdesk/gateway.db"

            [documents]
            dir = "/srv/docs"
            recursive = true

            [roles]
            admin_ids = [1, 2]
            operator_ids = [7]

            [pipeline]
            consent_action = "gdpr:yes"
            store_timeout = "500ms"

            [shutdown]
            drain_timeout = "3s"
            "#,
        )
        .unwrap();

        assert_eq!(config.bot.name, "Helpdesk");
        assert_eq!(config.storage.db_path, PathBuf::from("/var/lib/helpdesk/gateway.db"));
        assert!(config.storage.sync_writes);
        assert!(config.documents.scan_options().recursive);
        assert!(!config.documents.scan_options().include_hidden);
        assert_eq!(config.roles.configured().admins, vec![1, 2]);
        assert_eq!(config.pipeline.consent_action, "gdpr:yes");
        assert_eq!(config.pipeline.store_timeout, Duration::from_millis(500));
        assert_eq!(config.shutdown.drain_timeout, Duration::from_secs(3));
        config.validate().unwrap();
    }

    #[test]
    fn test_empty_file_gives_defaults() {
        let config: GatewayConfig = toml::from_str("").unwrap();
        assert_eq!(config, GatewayConfig::default());
        assert!(matches!(config.validate(), Err(ConfigError::MissingToken)));
    }

    #[test]
    fn test_env_overrides() {
        let mut config = GatewayConfig::default();
        config
            .apply_env(lookup(&[
                ("GW_BOT_TOKEN", "t0ken"),
                ("GW_BOT_NAME", "Docs Bot"),
                ("GW_DB_PATH", "/tmp/gw.db"),
                ("GW_DOCS_DIR", "/tmp/docs"),
                ("GW_DOCS_RECURSIVE", "yes"),
                ("GW_ADMIN_IDS", "3, 1,2"),
                ("GW_OPERATOR_IDS", ""),
            ]))
            .unwrap();

        assert_eq!(config.bot.token, "t0ken");
        assert_eq!(config.bot.name, "Docs Bot");
        assert_eq!(config.storage.db_path, PathBuf::from("/tmp/gw.db"));
        assert_eq!(config.documents.dir, PathBuf::from("/tmp/docs"));
        assert!(config.documents.recursive);
        assert_eq!(config.roles.admin_ids, vec![3, 1, 2]);
        assert!(config.roles.operator_ids.is_empty());
    }

    #[test]
    fn test_bad_env_values_rejected() {
        let mut config = GatewayConfig::default();
        let err = config
            .apply_env(lookup(&[("GW_ADMIN_IDS", "1,two")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnv { var: "GW_ADMIN_IDS", .. }));

        let err = config
            .apply_env(lookup(&[("GW_DOCS_RECURSIVE", "sometimes")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnv { var: "GW_DOCS_RECURSIVE", .. }));
    }

    #[test]
    fn test_empty_consent_action_rejected() {
        let mut config = GatewayConfig::default();
        config.bot.token = "t".to_string();
        config.pipeline.consent_action.clear();
        assert!(matches!(config.validate(), Err(ConfigError::EmptyConsentAction)));
    }

    #[test]
    fn test_load_with_explicit_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gw.toml");
        std::fs::write(&path, "[bot]\ntoken = \"from-file\"\nname = \"Filed\"\n").unwrap();
        let path_str = path.to_string_lossy().to_string();

        let config = GatewayConfig::load_with(lookup(&[
            ("GW_CONFIG", path_str.as_str()),
            ("GW_BOT_NAME", "Overridden"),
        ]))
        .unwrap();

        assert_eq!(config.bot.token, "from-file");
        assert_eq!(config.bot.name, "Overridden");
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.toml");
        let path_str = path.to_string_lossy().to_string();

        let err = GatewayConfig::load_with(lookup(&[("GW_CONFIG", path_str.as_str())]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn test_malformed_file_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        std::fs::write(&path, "[bot\ntoken = 1").unwrap();

        let err = GatewayConfig::from_file(&path).unwrap_err();
        assert!(err.to_string().contains("bad.toml"));
    }
}
