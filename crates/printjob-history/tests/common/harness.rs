//! Test harness for isolated lifecycle and store tests.

#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use chrono::{Duration, NaiveDate, NaiveDateTime};
use tempfile::TempDir;

use printjob_history::lifecycle::Clock;
use printjob_history::{HistoryApi, HistoryBroadcaster, PrintJobStore, Providers, Reconciler};

/// A clock the test moves by hand.
#[derive(Clone)]
pub struct ManualClock {
    now: Arc<Mutex<NaiveDateTime>>,
}

impl ManualClock {
    pub fn starting_at(now: NaiveDateTime) -> Self {
        Self {
            now: Arc::new(Mutex::new(now)),
        }
    }

    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock().unwrap();
        *now += by;
    }

    pub fn now(&self) -> NaiveDateTime {
        *self.now.lock().unwrap()
    }

    pub fn as_clock(&self) -> Clock {
        let now = self.now.clone();
        Arc::new(move || *now.lock().unwrap())
    }
}

/// Isolated history rooted in a temporary directory.
pub struct TestHarness {
    /// Keeps the directory alive for the lifetime of the harness.
    temp_dir: TempDir,
    pub db_path: PathBuf,
    pub store: PrintJobStore,
    pub broadcaster: HistoryBroadcaster,
    pub clock: ManualClock,
}

impl TestHarness {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let db_path = temp_dir.path().join("data").join("printJobHistory.db");
        let store = PrintJobStore::initialize(&db_path).expect("Failed to open store");

        Self {
            temp_dir,
            db_path,
            store,
            broadcaster: HistoryBroadcaster::default(),
            clock: ManualClock::starting_at(jan_first(10, 0)),
        }
    }

    /// A reconciler bound to this harness' store, broadcaster, and clock.
    pub fn reconciler(&self, providers: Providers) -> Reconciler {
        Reconciler::new(self.store.clone(), providers, self.broadcaster.clone())
            .with_clock(self.clock.as_clock())
    }

    pub fn api(&self) -> HistoryApi {
        HistoryApi::new(self.store.clone(), self.broadcaster.clone())
    }

    /// Reopens the database file with a fresh connection.
    pub fn reopen(&self) -> PrintJobStore {
        PrintJobStore::initialize(&self.db_path).expect("Failed to reopen store")
    }

    /// Counts rows of `table` directly in the database.
    pub fn row_count(&self, table: &str) -> i64 {
        self.store
            .database()
            .with_conn(|conn| {
                Ok(conn.query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |row| {
                    row.get(0)
                })?)
            })
            .expect("Failed to count rows")
    }
}

/// 2024-01-01 at `hour:minute`.
pub fn jan_first(hour: u32, minute: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 1, 1)
        .unwrap()
        .and_hms_opt(hour, minute, 0)
        .unwrap()
}
