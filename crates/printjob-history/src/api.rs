//! Operations behind the history routes: list, edit, delete and export.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use serde::Serialize;

use crate::broadcast::{HistoryBroadcaster, HistoryEvent};
use crate::error::{HistoryError, Result};
use crate::export::{
    from_client_edit, keep_stored_precision, to_client_view, to_csv, ClientJobEdit, ClientJobView,
};
use crate::model::PrintJob;
use crate::store::PrintJobStore;

/// Response wrapper for API calls.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn err(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

impl<T> From<Result<T>> for ApiResponse<T> {
    fn from(result: Result<T>) -> Self {
        match result {
            Ok(data) => Self::ok(data),
            Err(e) => Self::err(e.to_string()),
        }
    }
}

/// A rendered export, ready to be sent as a download.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportFile {
    pub file_name: String,
    pub content_type: String,
    pub content: String,
}

/// Client-facing access to the committed history.
#[derive(Clone)]
pub struct HistoryApi {
    store: PrintJobStore,
    broadcaster: HistoryBroadcaster,
    dependency_check: Arc<AtomicBool>,
    export_file_name: String,
}

impl HistoryApi {
    pub fn new(store: PrintJobStore, broadcaster: HistoryBroadcaster) -> Self {
        Self {
            store,
            broadcaster,
            dependency_check: Arc::new(AtomicBool::new(false)),
            export_file_name: "PrintJobHistory.csv".to_string(),
        }
    }

    pub fn with_dependency_check(mut self, flag: Arc<AtomicBool>) -> Self {
        self.dependency_check = flag;
        self
    }

    pub fn with_export_file_name(mut self, file_name: impl Into<String>) -> Self {
        self.export_file_name = file_name.into();
        self
    }

    /// All committed jobs, most recent first.
    pub fn load_history(&self) -> Result<Vec<ClientJobView>> {
        let jobs = self.store.load_all()?;
        Ok(to_client_view(&jobs))
    }

    /// Deletes a job and returns the remaining history.
    pub fn remove_print_job(&self, id: i64) -> Result<Vec<ClientJobView>> {
        let remaining = self.store.delete(id)?;
        self.broadcaster.send(HistoryEvent::HistoryChanged);
        Ok(to_client_view(&remaining))
    }

    /// Replaces job `id` with an edited row and returns the refreshed history.
    ///
    /// `id` wins over any `databaseId` in the body. Timestamps and the
    /// calculated length that come back in their display rendering keep the
    /// stored precision. A malformed edit leaves the stored row untouched.
    pub fn update_print_job(&self, id: i64, edit: ClientJobEdit) -> Result<Vec<ClientJobView>> {
        let edit = ClientJobEdit {
            database_id: Some(id),
            ..edit
        };
        let mut job = from_client_edit(&edit)?;
        let stored = self
            .store
            .find_by_id(id)?
            .ok_or(HistoryError::NotFound { id })?;
        keep_stored_precision(&mut job, &stored);
        self.commit_edit(&job)
    }

    /// Stores a manually entered job as a new history row.
    pub fn add_print_job(&self, edit: ClientJobEdit) -> Result<Vec<ClientJobView>> {
        let edit = ClientJobEdit {
            database_id: None,
            ..edit
        };
        let job = from_client_edit(&edit)?;
        self.commit_edit(&job)
    }

    fn commit_edit(&self, job: &PrintJob) -> Result<Vec<ClientJobView>> {
        self.store.upsert(job)?;
        self.broadcaster.send(HistoryEvent::HistoryChanged);
        self.load_history()
    }

    /// Renders the whole history in the requested format. Only `CSV` is supported.
    pub fn export_history(&self, export_type: &str) -> Result<ExportFile> {
        if !export_type.eq_ignore_ascii_case("csv") {
            return Err(HistoryError::UnsupportedExport(export_type.to_string()));
        }

        let rows = self.load_history()?;
        log::debug!("Exporting {} print jobs as CSV", rows.len());
        Ok(ExportFile {
            file_name: self.export_file_name.clone(),
            content_type: "text/csv".to_string(),
            content: to_csv(&rows),
        })
    }

    /// Stops reporting missing optional providers.
    pub fn deactivate_plugin_check(&self) {
        self.dependency_check.store(false, Ordering::Relaxed);
        log::info!("Plugin dependency check deactivated");
    }

    pub fn plugin_check_enabled(&self) -> bool {
        self.dependency_check.load(Ordering::Relaxed)
    }
}
