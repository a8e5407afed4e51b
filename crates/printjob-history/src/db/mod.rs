//! SQLite storage for the print job history.
//!
//! One connection per history, guarded by a mutex. Aggregate writes go
//! through [`Database::in_transaction`] so a job and its filament and
//! temperature rows land or roll back together.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use rusqlite::{Connection, Transaction};

pub mod error;
pub mod migrations;
pub mod print_job_repo;

pub use error::DatabaseError;

/// Shared handle to the history database.
///
/// Clones share the connection. Holding the lock for a whole transaction
/// means readers see either the old aggregate or the new one.
#[derive(Clone, Debug)]
pub struct Database {
    conn: Arc<Mutex<Connection>>,
}

impl Database {
    /// Opens the history file at `path`, creating its folder and schema when missing.
    pub fn open(path: &Path) -> Result<Self, DatabaseError> {
        ensure_parent_folder(path)?;

        let conn = Connection::open(path)?;
        let db = Self::prepare(conn, "PRAGMA journal_mode=WAL; PRAGMA foreign_keys=ON;")?;
        log::info!("Print job history database at {}", path.display());
        Ok(db)
    }

    /// Opens a private in-memory history with the current schema.
    pub fn open_in_memory() -> Result<Self, DatabaseError> {
        Self::prepare(Connection::open_in_memory()?, "PRAGMA foreign_keys=ON;")
    }

    fn prepare(conn: Connection, pragmas: &str) -> Result<Self, DatabaseError> {
        conn.execute_batch(pragmas)?;
        migrations::run_all(&conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Runs `f` with the connection locked.
    pub fn with_conn<F, T>(&self, f: F) -> Result<T, DatabaseError>
    where
        F: FnOnce(&Connection) -> Result<T, DatabaseError>,
    {
        let guard = self.conn.lock().map_err(|_| DatabaseError::LockPoisoned)?;
        f(&guard)
    }

    /// Runs `f` in one transaction, committed only when `f` returns `Ok`.
    pub fn in_transaction<F, T>(&self, f: F) -> Result<T, DatabaseError>
    where
        F: FnOnce(&Transaction<'_>) -> Result<T, DatabaseError>,
    {
        self.with_conn(|conn| {
            let tx = conn.unchecked_transaction()?;
            let value = f(&tx)?;
            tx.commit()?;
            Ok(value)
        })
    }
}

fn ensure_parent_folder(path: &Path) -> Result<(), DatabaseError> {
    match path.parent().filter(|p| !p.as_os_str().is_empty()) {
        Some(folder) => std::fs::create_dir_all(folder).map_err(|source| DatabaseError::Io {
            path: folder.to_path_buf(),
            source,
        }),
        None => Ok(()),
    }
}

/// `~/.printjob-history/data`, if a home folder is known.
pub fn default_data_folder() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".printjob-history").join("data"))
}
