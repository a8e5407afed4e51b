//! Persistent print job store backed by rusqlite.

use std::path::Path;

use crate::db::{print_job_repo, Database};
use crate::error::{HistoryError, Result};
use crate::model::PrintJob;

/// Durable storage of committed print job aggregates.
///
/// Cloning is cheap and every clone shares the same connection. All writes
/// go through one lock, so writes to the same id are serialized and readers
/// only ever observe whole aggregates.
#[derive(Clone, Debug)]
pub struct PrintJobStore {
    db: Database,
}

impl PrintJobStore {
    /// Opens or creates the store at `path`, creating the schema if needed.
    pub fn initialize(path: &Path) -> Result<Self> {
        let db = Database::open(path).map_err(|source| HistoryError::StorageInit {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self { db })
    }

    /// Opens a throwaway in-memory store.
    pub fn open_in_memory() -> Result<Self> {
        let db = Database::open_in_memory().map_err(|source| HistoryError::StorageInit {
            path: ":memory:".into(),
            source,
        })?;
        Ok(Self { db })
    }

    /// Inserts a new job (no id) or replaces an existing one (id set).
    ///
    /// Returns the assigned or confirmed id. On failure the store is left
    /// exactly as it was before the call.
    pub fn upsert(&self, job: &PrintJob) -> Result<i64> {
        let id = print_job_repo::upsert(&self.db, job).map_err(HistoryError::from_write)?;
        if job.id.is_some() {
            log::info!("Updated print job {}", id);
        } else {
            log::info!(
                "Stored print job {} ({})",
                id,
                job.file_name.as_deref().unwrap_or("unnamed")
            );
        }
        Ok(id)
    }

    /// Returns every committed job, most recent start first.
    pub fn load_all(&self) -> Result<Vec<PrintJob>> {
        print_job_repo::load_all(&self.db).map_err(HistoryError::StorageRead)
    }

    /// Removes a job and its owned records, returning the remaining jobs.
    pub fn delete(&self, id: i64) -> Result<Vec<PrintJob>> {
        print_job_repo::delete(&self.db, id).map_err(HistoryError::from_write)?;
        log::info!("Deleted print job {}", id);
        self.load_all()
    }

    /// Looks up a single committed job.
    pub fn find_by_id(&self, id: i64) -> Result<Option<PrintJob>> {
        print_job_repo::find_by_id(&self.db, id).map_err(HistoryError::StorageRead)
    }

    /// Number of committed jobs.
    pub fn count(&self) -> Result<u64> {
        print_job_repo::count(&self.db).map_err(HistoryError::StorageRead)
    }

    /// Gives direct access to the underlying database handle.
    pub fn database(&self) -> &Database {
        &self.db
    }
}
