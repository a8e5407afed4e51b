use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::db::default_data_folder;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryConfig {
    #[serde(default = "default_data_folder_or_cwd")]
    pub data_folder: PathBuf,
    #[serde(default = "default_database_file_name")]
    pub database_file_name: String,
    /// Relative paths are resolved against `data_folder`.
    #[serde(default = "default_snapshot_folder")]
    pub snapshot_folder: PathBuf,
    /// Report missing optional providers when a client connects.
    #[serde(default)]
    pub plugin_dependency_check: bool,
    #[serde(default = "default_notification_capacity")]
    pub notification_capacity: usize,
    #[serde(default = "default_export_file_name")]
    pub export_file_name: String,
}

fn default_data_folder_or_cwd() -> PathBuf {
    default_data_folder().unwrap_or_else(|| PathBuf::from("."))
}

fn default_database_file_name() -> String {
    "printJobHistory.db".to_string()
}

fn default_snapshot_folder() -> PathBuf {
    PathBuf::from("snapshots")
}

fn default_notification_capacity() -> usize {
    100
}

fn default_export_file_name() -> String {
    "PrintJobHistory.csv".to_string()
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            data_folder: default_data_folder_or_cwd(),
            database_file_name: default_database_file_name(),
            snapshot_folder: default_snapshot_folder(),
            plugin_dependency_check: false,
            notification_capacity: default_notification_capacity(),
            export_file_name: default_export_file_name(),
        }
    }
}

impl HistoryConfig {
    /// Config rooted at `data_folder` with all other values defaulted.
    pub fn with_data_folder(data_folder: impl Into<PathBuf>) -> Self {
        Self {
            data_folder: data_folder.into(),
            ..Default::default()
        }
    }

    pub fn database_path(&self) -> PathBuf {
        self.data_folder.join(&self.database_file_name)
    }

    pub fn snapshot_folder_path(&self) -> PathBuf {
        if self.snapshot_folder.is_absolute() {
            self.snapshot_folder.clone()
        } else {
            self.data_folder.join(&self.snapshot_folder)
        }
    }
}
