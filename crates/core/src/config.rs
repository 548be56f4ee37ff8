//! Application configuration.
//!
//! Precedence: defaults, then an optional `dealiq.toml` patch, then
//! `DEALIQ_*` environment overrides, then programmatic overrides. The
//! merged result is validated last so every layer is subject to the same
//! rules.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub storage: StorageConfig,
    pub logging: LoggingConfig,
}

#[derive(Clone, Debug)]
pub struct StorageConfig {
    /// Directory uploaded CRM exports are read from.
    pub upload_dir: PathBuf,
    /// Directory persisted validation reports are written to.
    pub reports_dir: PathBuf,
    pub max_upload_bytes: u64,
    /// Extensions (with leading dot) accepted for ingestion/validation.
    pub allowed_extensions: Vec<String>,
}

#[derive(Clone, Debug)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    Compact,
    Pretty,
    Json,
}

#[derive(Clone, Debug, Default)]
pub struct ConfigOverrides {
    pub upload_dir: Option<PathBuf>,
    pub reports_dir: Option<PathBuf>,
    pub max_upload_bytes: Option<u64>,
    pub log_level: Option<String>,
    pub log_format: Option<LogFormat>,
}

#[derive(Clone, Debug, Default)]
pub struct LoadOptions {
    pub config_path: Option<PathBuf>,
    pub require_file: bool,
    pub overrides: ConfigOverrides,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file `{path}`: {source}")]
    ReadFile { path: PathBuf, source: std::io::Error },
    #[error("could not parse config file `{path}`: {source}")]
    ParseFile { path: PathBuf, source: toml::de::Error },
    #[error("required config file was not found: `{0}`")]
    MissingConfigFile(PathBuf),
    #[error("invalid environment override for `{key}`: `{value}`")]
    InvalidEnvOverride { key: String, value: String },
    #[error("configuration validation failed: {0}")]
    Validation(String),
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            storage: StorageConfig {
                upload_dir: PathBuf::from("data/uploads"),
                reports_dir: PathBuf::from("data/reports"),
                max_upload_bytes: 50 * 1024 * 1024,
                allowed_extensions: [".csv", ".xlsx", ".xls", ".json", ".pdf"]
                    .iter()
                    .map(|ext| ext.to_string())
                    .collect(),
            },
            logging: LoggingConfig { level: "info".to_string(), format: LogFormat::Compact },
        }
    }
}

impl std::str::FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "compact" => Ok(Self::Compact),
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(ConfigError::Validation(format!(
                "unsupported log format `{other}` (expected compact|pretty|json)"
            ))),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct ConfigPatch {
    storage: Option<StoragePatch>,
    logging: Option<LoggingPatch>,
}

#[derive(Debug, Default, Deserialize)]
struct StoragePatch {
    upload_dir: Option<PathBuf>,
    reports_dir: Option<PathBuf>,
    max_upload_bytes: Option<u64>,
    allowed_extensions: Option<Vec<String>>,
}

#[derive(Debug, Default, Deserialize)]
struct LoggingPatch {
    level: Option<String>,
    format: Option<LogFormat>,
}

impl AppConfig {
    pub fn load(options: LoadOptions) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        let maybe_path = resolve_config_path(options.config_path.as_deref());

        if let Some(path) = maybe_path {
            let patch = read_patch(&path)?;
            config.apply_patch(patch);
        } else if options.require_file {
            let expected = options.config_path.unwrap_or_else(|| PathBuf::from("dealiq.toml"));
            return Err(ConfigError::MissingConfigFile(expected));
        }

        config.apply_env_overrides()?;
        config.apply_overrides(options.overrides);
        config.validate()?;

        Ok(config)
    }

    fn apply_patch(&mut self, patch: ConfigPatch) {
        if let Some(storage) = patch.storage {
            if let Some(upload_dir) = storage.upload_dir {
                self.storage.upload_dir = upload_dir;
            }
            if let Some(reports_dir) = storage.reports_dir {
                self.storage.reports_dir = reports_dir;
            }
            if let Some(max_upload_bytes) = storage.max_upload_bytes {
                self.storage.max_upload_bytes = max_upload_bytes;
            }
            if let Some(allowed_extensions) = storage.allowed_extensions {
                self.storage.allowed_extensions = allowed_extensions;
            }
        }

        if let Some(logging) = patch.logging {
            if let Some(level) = logging.level {
                self.logging.level = level;
            }
            if let Some(format) = logging.format {
                self.logging.format = format;
            }
        }
    }

    fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        if let Some(value) = read_env("DEALIQ_UPLOAD_DIR") {
            self.storage.upload_dir = PathBuf::from(value);
        }
        if let Some(value) = read_env("DEALIQ_REPORTS_DIR") {
            self.storage.reports_dir = PathBuf::from(value);
        }
        if let Some(value) = read_env("DEALIQ_MAX_UPLOAD_BYTES") {
            self.storage.max_upload_bytes = value.parse().map_err(|_| {
                ConfigError::InvalidEnvOverride { key: "DEALIQ_MAX_UPLOAD_BYTES".into(), value }
            })?;
        }
        if let Some(value) = read_env("DEALIQ_LOG_LEVEL") {
            self.logging.level = value;
        }
        if let Some(value) = read_env("DEALIQ_LOG_FORMAT") {
            self.logging.format = value.parse()?;
        }
        Ok(())
    }

    fn apply_overrides(&mut self, overrides: ConfigOverrides) {
        if let Some(upload_dir) = overrides.upload_dir {
            self.storage.upload_dir = upload_dir;
        }
        if let Some(reports_dir) = overrides.reports_dir {
            self.storage.reports_dir = reports_dir;
        }
        if let Some(max_upload_bytes) = overrides.max_upload_bytes {
            self.storage.max_upload_bytes = max_upload_bytes;
        }
        if let Some(level) = overrides.log_level {
            self.logging.level = level;
        }
        if let Some(format) = overrides.log_format {
            self.logging.format = format;
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.storage.max_upload_bytes == 0 {
            return Err(ConfigError::Validation(
                "storage.max_upload_bytes must be greater than zero".into(),
            ));
        }
        if self.storage.allowed_extensions.is_empty() {
            return Err(ConfigError::Validation(
                "storage.allowed_extensions must not be empty".into(),
            ));
        }
        for ext in &self.storage.allowed_extensions {
            if !ext.starts_with('.') || ext.len() < 2 {
                return Err(ConfigError::Validation(format!(
                    "storage.allowed_extensions entries must start with a dot: `{ext}`"
                )));
            }
        }
        let level = self.logging.level.to_ascii_lowercase();
        if !["trace", "debug", "info", "warn", "error"].contains(&level.as_str()) {
            return Err(ConfigError::Validation(format!(
                "unsupported log level `{}` (expected trace|debug|info|warn|error)",
                self.logging.level
            )));
        }
        Ok(())
    }
}

fn resolve_config_path(explicit: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return path.exists().then(|| path.to_path_buf());
    }
    if let Some(value) = read_env("DEALIQ_CONFIG") {
        let path = PathBuf::from(value);
        return path.exists().then_some(path);
    }
    let default = PathBuf::from("dealiq.toml");
    default.exists().then_some(default)
}

fn read_patch(path: &Path) -> Result<ConfigPatch, ConfigError> {
    let raw = fs::read_to_string(path)
        .map_err(|source| ConfigError::ReadFile { path: path.to_path_buf(), source })?;
    toml::from_str(&raw)
        .map_err(|source| ConfigError::ParseFile { path: path.to_path_buf(), source })
}

fn read_env(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}
