use dealiq_core::config::{AppConfig, LogFormat};

use super::CommandResult;

/// Show the effective configuration and the environment variables that can
/// override each value.
pub fn run(config: &AppConfig) -> CommandResult {
    let format = match config.logging.format {
        LogFormat::Compact => "compact",
        LogFormat::Pretty => "pretty",
        LogFormat::Json => "json",
    };
    let data = serde_json::json!({
        "storage": {
            "upload_dir": config.storage.upload_dir,
            "reports_dir": config.storage.reports_dir,
            "max_upload_bytes": config.storage.max_upload_bytes,
            "allowed_extensions": config.storage.allowed_extensions,
        },
        "logging": {
            "level": config.logging.level,
            "format": format,
        },
        "env_overrides": {
            "storage.upload_dir": "DEALIQ_UPLOAD_DIR",
            "storage.reports_dir": "DEALIQ_REPORTS_DIR",
            "storage.max_upload_bytes": "DEALIQ_MAX_UPLOAD_BYTES",
            "logging.level": "DEALIQ_LOG_LEVEL",
            "logging.format": "DEALIQ_LOG_FORMAT",
        },
    });
    CommandResult::success(
        "config",
        "effective config (source precedence: overrides > env > file > default)",
        Some(data),
    )
}
