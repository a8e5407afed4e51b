use std::path::Path;

use crate::config::schema::HistoryConfig;
use crate::error::ConfigError;

pub fn load_config<P: AsRef<Path>>(path: P) -> Result<HistoryConfig, ConfigError> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadFile {
        path: path.to_path_buf(),
        source: e,
    })?;

    load_config_from_str(&content)
}

pub fn load_config_from_str(content: &str) -> Result<HistoryConfig, ConfigError> {
    let config: HistoryConfig = serde_json::from_str(content)?;

    validate_config(&config)?;

    Ok(config)
}

/// Checks values serde cannot reject on its own.
pub fn validate_config(config: &HistoryConfig) -> Result<(), ConfigError> {
    if config.database_file_name.trim().is_empty() {
        return Err(ConfigError::Validation {
            message: "databaseFileName must not be empty".to_string(),
        });
    }

    if Path::new(&config.database_file_name).components().count() != 1 {
        return Err(ConfigError::Validation {
            message: format!(
                "databaseFileName must be a plain file name, got '{}'",
                config.database_file_name
            ),
        });
    }

    // A zero-capacity broadcast channel panics on creation.
    if config.notification_capacity == 0 {
        return Err(ConfigError::Validation {
            message: "notificationCapacity must be greater than 0".to_string(),
        });
    }

    if config.export_file_name.trim().is_empty() {
        return Err(ConfigError::Validation {
            message: "exportFileName must not be empty".to_string(),
        });
    }

    Ok(())
}
