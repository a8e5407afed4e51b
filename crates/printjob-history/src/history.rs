//! Top-level handle that wires storage, lifecycle and API together from a config.

use std::path::PathBuf;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use tokio::sync::broadcast;

use crate::api::HistoryApi;
use crate::broadcast::{HistoryBroadcaster, HistoryEvent};
use crate::config::{validate_config, HistoryConfig};
use crate::error::Result;
use crate::export::{snapshot_file_name, snapshot_location};
use crate::lifecycle::{PrintEvent, Reconciler};
use crate::model::PrintJob;
use crate::providers::Providers;
use crate::store::PrintJobStore;

/// A running print job history.
///
/// The reconciler and the API share one store, one broadcaster, and the
/// dependency-check flag.
pub struct PrintJobHistory {
    config: HistoryConfig,
    broadcaster: HistoryBroadcaster,
    reconciler: Reconciler,
    api: HistoryApi,
}

impl PrintJobHistory {
    /// Opens the configured database and binds the given providers.
    pub fn initialize(config: HistoryConfig, providers: Providers) -> Result<Self> {
        let _span = tracing::info_span!("history.initialize").entered();

        validate_config(&config)?;
        let store = PrintJobStore::initialize(&config.database_path())?;
        log::info!(
            "Print job history ready with {} stored jobs ({:?})",
            store.count()?,
            providers
        );
        Ok(Self::assemble(config, store, providers))
    }

    /// Builds the history around an already opened store.
    pub fn with_store(
        config: HistoryConfig,
        store: PrintJobStore,
        providers: Providers,
    ) -> Result<Self> {
        validate_config(&config)?;
        Ok(Self::assemble(config, store, providers))
    }

    fn assemble(config: HistoryConfig, store: PrintJobStore, providers: Providers) -> Self {
        let broadcaster = HistoryBroadcaster::new(config.notification_capacity);
        let dependency_check = Arc::new(AtomicBool::new(config.plugin_dependency_check));

        let reconciler = Reconciler::new(store.clone(), providers, broadcaster.clone())
            .with_dependency_check(dependency_check.clone());
        let api = HistoryApi::new(store, broadcaster.clone())
            .with_dependency_check(dependency_check)
            .with_export_file_name(config.export_file_name.clone());

        Self {
            config,
            broadcaster,
            reconciler,
            api,
        }
    }

    /// Applies one host event to the lifecycle.
    pub fn handle_event(&mut self, event: PrintEvent) -> Result<()> {
        self.reconciler.handle_event(event)
    }

    pub fn reconciler(&self) -> &Reconciler {
        &self.reconciler
    }

    pub fn reconciler_mut(&mut self) -> &mut Reconciler {
        &mut self.reconciler
    }

    pub fn api(&self) -> &HistoryApi {
        &self.api
    }

    pub fn config(&self) -> &HistoryConfig {
        &self.config
    }

    pub fn subscribe(&self) -> broadcast::Receiver<HistoryEvent> {
        self.broadcaster.subscribe()
    }

    /// Where the camera integration should place the snapshot for `job`.
    pub fn snapshot_path(&self, job: &PrintJob) -> Option<PathBuf> {
        snapshot_location(
            &self.config.snapshot_folder_path(),
            &snapshot_file_name(&job.started_at),
        )
    }
}
