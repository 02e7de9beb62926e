//! Configuration management module.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::{Reference, ReferenceData};

/// Configuration load result.
#[derive(Debug)]
pub enum ConfigLoadResult {
    /// Config loaded successfully.
    Loaded(AppConfig),
    /// Config file missing (first run).
    Missing,
    /// Config file exists but invalid.
    Invalid(ConfigError),
}

/// Configuration errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Read(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Validation failed: {0}")]
    Validation(String),
}

/// Main application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    pub tenant: TenantConfig,
    #[serde(default)]
    pub reference: ReferenceData,
    #[serde(default)]
    pub ui: UiConfig,
}

/// Which persistence backend holds policies.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    /// JSON-file backed local store.
    #[default]
    Local,
    /// PostgreSQL via SeaORM.
    Database,
}

/// Persistence settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoreConfig {
    #[serde(default)]
    pub backend: StoreBackend,
    /// Local store file. Defaults to `policies.json` in the data directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub local_path: Option<PathBuf>,
}

/// PostgreSQL database connection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub host: String,
    pub port: u16,
    pub name: String,
    pub username: String,
    pub password: String,
    /// Pool upper bound (default: 5).
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Pool lower bound (default: 1).
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
}

fn default_max_connections() -> u32 {
    5
}

fn default_min_connections() -> u32 {
    1
}

/// Organization and tenant every new policy is scoped to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TenantConfig {
    pub organization_code: String,
    pub tenant_code: String,
}

/// UI preferences.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    pub window_width: f32,
    pub window_height: f32,
}

impl AppConfig {
    /// Get config file path in the platform config directory.
    ///
    /// Falls back to the executable's directory when no home directory is known.
    pub fn default_path() -> PathBuf {
        match project_dirs() {
            Some(dirs) => dirs.config_dir().join("config.toml"),
            None => exe_dir().join("config.toml"),
        }
    }

    /// Directory for the local store and log files.
    pub fn data_dir() -> PathBuf {
        match project_dirs() {
            Some(dirs) => dirs.data_dir().to_path_buf(),
            None => exe_dir(),
        }
    }

    /// Resolved local store file path.
    pub fn local_store_path(&self) -> PathBuf {
        self.store
            .local_path
            .clone()
            .unwrap_or_else(|| Self::data_dir().join("policies.json"))
    }

    /// Attempt to load config with detailed result.
    pub fn try_load(path: &Path) -> ConfigLoadResult {
        if !path.exists() {
            return ConfigLoadResult::Missing;
        }

        match std::fs::read_to_string(path) {
            Ok(content) => match toml::from_str::<AppConfig>(&content) {
                Ok(config) => match config.validate() {
                    Ok(()) => ConfigLoadResult::Loaded(config),
                    Err(e) => ConfigLoadResult::Invalid(e),
                },
                Err(e) => ConfigLoadResult::Invalid(ConfigError::Parse(e)),
            },
            Err(e) => ConfigLoadResult::Invalid(ConfigError::Read(e)),
        }
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tenant.organization_code.trim().is_empty() {
            return Err(ConfigError::Validation("Organization code cannot be empty".to_string()));
        }
        if self.tenant.tenant_code.trim().is_empty() {
            return Err(ConfigError::Validation("Tenant code cannot be empty".to_string()));
        }

        if self.store.backend == StoreBackend::Database {
            if self.database.host.trim().is_empty() {
                return Err(ConfigError::Validation("Database host cannot be empty".to_string()));
            }
            if self.database.port == 0 {
                return Err(ConfigError::Validation(
                    "Database port must be greater than 0".to_string(),
                ));
            }
            if self.database.name.trim().is_empty() {
                return Err(ConfigError::Validation("Database name cannot be empty".to_string()));
            }
            if self.database.max_connections < 1 {
                return Err(ConfigError::Validation(
                    "Max connections must be at least 1".to_string(),
                ));
            }
            if self.database.min_connections > self.database.max_connections {
                return Err(ConfigError::Validation(
                    "Min connections cannot exceed max connections".to_string(),
                ));
            }
        }

        validate_reference_list("subsidiary", &self.reference.subsidiaries)?;
        validate_reference_list("location", &self.reference.locations)?;
        validate_reference_list("employee category", &self.reference.employee_categories)?;

        if self.ui.window_width < 400.0 || self.ui.window_height < 300.0 {
            return Err(ConfigError::Validation(
                "Window size must be at least 400x300".to_string(),
            ));
        }
        Ok(())
    }

    /// Save configuration to file, creating the parent directory if needed.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self)?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content)?;
        Ok(())
    }
}

/// Codes in a reference list must be present and unique.
fn validate_reference_list(kind: &str, list: &[Reference]) -> Result<(), ConfigError> {
    let mut seen = HashSet::new();
    for item in list {
        if item.code.trim().is_empty() {
            return Err(ConfigError::Validation(format!("Every {kind} needs a code")));
        }
        if !seen.insert(item.code.as_str()) {
            return Err(ConfigError::Validation(format!(
                "Duplicate {kind} code: {}",
                item.code
            )));
        }
    }
    Ok(())
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("com", "Gianged", "OT Policy Manager")
}

fn exe_dir() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(|p| p.to_path_buf()))
        .unwrap_or_else(|| PathBuf::from("."))
}

impl DatabaseConfig {
    /// Build connection string for SeaORM.
    pub fn connection_string(&self) -> String {
        format!(
            "postgres://{}:{}@{}:{}/{}",
            self.username, self.password, self.host, self.port, self.name
        )
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 5432,
            name: "ot_policy".to_string(),
            username: "postgres".to_string(),
            password: String::new(),
            max_connections: default_max_connections(),
            min_connections: default_min_connections(),
        }
    }
}

impl Default for TenantConfig {
    fn default() -> Self {
        Self {
            organization_code: "DEFAULT".to_string(),
            tenant_code: "DEFAULT".to_string(),
        }
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            window_width: 1200.0,
            window_height: 800.0,
        }
    }
}
