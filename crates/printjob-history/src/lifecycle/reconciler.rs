use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use chrono::{Local, NaiveDateTime};
use tracing::info_span;

use crate::broadcast::{HistoryBroadcaster, HistoryEvent};
use crate::error::Result;
use crate::model::{FilamentUsage, PrintJob, PrintOutcome};
use crate::providers::Providers;
use crate::store::PrintJobStore;

use super::events::{FileInfo, LayerProgress, PrintEvent};

/// Source of the current local wall-clock time.
pub type Clock = Arc<dyn Fn() -> NaiveDateTime + Send + Sync>;

fn system_clock() -> Clock {
    Arc::new(|| Local::now().naive_local())
}

/// Whether a job is currently being recorded.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ReconcilerState {
    /// No job in memory.
    #[default]
    Idle,
    /// A started job that has not been committed yet.
    Open(Box<PrintJob>),
}

/// Owns the in-progress print job and commits it on terminal events.
///
/// Events must be applied one at a time in the order they were received.
/// Progress updates only touch memory; the store is written on terminal
/// events alone.
pub struct Reconciler {
    store: PrintJobStore,
    providers: Providers,
    broadcaster: HistoryBroadcaster,
    dependency_check: Arc<AtomicBool>,
    clock: Clock,
    state: ReconcilerState,
    last_committed: Option<PrintJob>,
}

impl Reconciler {
    pub fn new(store: PrintJobStore, providers: Providers, broadcaster: HistoryBroadcaster) -> Self {
        Self {
            store,
            providers,
            broadcaster,
            dependency_check: Arc::new(AtomicBool::new(false)),
            clock: system_clock(),
            state: ReconcilerState::Idle,
            last_committed: None,
        }
    }

    /// Shares the "report missing providers" setting with its owner.
    pub fn with_dependency_check(mut self, flag: Arc<AtomicBool>) -> Self {
        self.dependency_check = flag;
        self
    }

    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    pub fn state(&self) -> &ReconcilerState {
        &self.state
    }

    /// The job currently being recorded, if any.
    pub fn current_job(&self) -> Option<&PrintJob> {
        match &self.state {
            ReconcilerState::Open(job) => Some(job.as_ref()),
            ReconcilerState::Idle => None,
        }
    }

    /// The most recently committed job.
    pub fn last_committed(&self) -> Option<&PrintJob> {
        self.last_committed.as_ref()
    }

    /// Routes a host event to the matching transition.
    pub fn handle_event(&mut self, event: PrintEvent) -> Result<()> {
        match event {
            PrintEvent::ClientOpened => self.on_client_opened(),
            PrintEvent::PrintStarted(file) => self.on_start(&file),
            PrintEvent::LayerChanged(progress) => self.on_progress(&progress),
            PrintEvent::PrintDone(file) => {
                self.on_terminal(PrintOutcome::Success, &file)?;
            }
            PrintEvent::PrintFailed(file) => {
                self.on_terminal(PrintOutcome::Failed, &file)?;
            }
            PrintEvent::PrintCancelled(file) => {
                self.on_terminal(PrintOutcome::Canceled, &file)?;
            }
        }
        Ok(())
    }

    /// Reports unbound optional providers when the dependency check is on.
    pub fn on_client_opened(&self) {
        if !self.dependency_check.load(Ordering::Relaxed) {
            return;
        }
        let missing = self.providers.missing();
        if !missing.is_empty() {
            log::debug!("Missing optional providers: {:?}", missing);
            self.broadcaster.send(HistoryEvent::missing_plugin(missing));
        }
    }

    /// Opens a new job, replacing any job that never received a terminal event.
    pub fn on_start(&mut self, file: &FileInfo) {
        let _span = info_span!("lifecycle.start", file = %file.name).entered();

        if let ReconcilerState::Open(previous) = &self.state {
            log::warn!(
                "Discarding uncommitted print job for '{}' started at {}",
                previous.file_name.as_deref().unwrap_or("unnamed"),
                previous.started_at
            );
        }

        let mut job = PrintJob::new((self.clock)());
        job.file_name = Some(file.name.clone());
        job.file_path_label = Some(file.path.clone());
        job.file_size_bytes = file.size;
        job.owner_user_name = file.owner.clone();

        self.record_preheat_temperatures(&mut job, file);

        log::info!("Recording print job for '{}'", file.name);
        self.broadcaster.send(HistoryEvent::PrintStarted {
            file_name: job.file_name.clone(),
        });
        self.state = ReconcilerState::Open(Box::new(job));
    }

    /// Updates the layer and height labels of the open job. No-op when idle.
    pub fn on_progress(&mut self, progress: &LayerProgress) {
        match &mut self.state {
            ReconcilerState::Open(job) => {
                job.printed_layers_label = Some(progress.layers_label());
                job.printed_height_label = Some(progress.height_label());
            }
            ReconcilerState::Idle => {
                log::debug!("Layer progress without an open print job, ignoring");
            }
        }
    }

    /// Closes and commits the open job.
    ///
    /// Returns the assigned id, or `None` when there was nothing to commit
    /// (no open job, or a duplicate terminal event for an already committed
    /// job). If the store write fails the job stays open and unchanged so the
    /// caller can retry.
    pub fn on_terminal(&mut self, outcome: PrintOutcome, file: &FileInfo) -> Result<Option<i64>> {
        let _span = info_span!("lifecycle.terminal", outcome = %outcome).entered();

        let open = match &self.state {
            ReconcilerState::Open(job) => job,
            ReconcilerState::Idle => {
                log::debug!(
                    "Terminal event '{}' without an open print job, ignoring",
                    outcome
                );
                return Ok(None);
            }
        };

        if open.is_committed() {
            log::debug!("Print job {:?} already committed, ignoring '{}'", open.id, outcome);
            return Ok(None);
        }

        let mut job = PrintJob::clone(open);
        job.ended_at = Some((self.clock)());
        job.outcome = Some(outcome);
        job.filament = Some(self.build_filament_usage(file));

        let id = self.store.upsert(&job).map_err(|e| {
            log::error!("Failed to commit print job for '{}': {}", file.name, e);
            e
        })?;
        job.id = Some(id);

        log::info!("Print job {} finished with outcome '{}'", id, outcome);
        self.state = ReconcilerState::Idle;
        self.last_committed = Some(job);
        self.broadcaster.send(HistoryEvent::PrintFinished {
            database_id: id,
            outcome,
        });
        Ok(Some(id))
    }

    fn record_preheat_temperatures(&self, job: &mut PrintJob, file: &FileInfo) {
        let Some(preheat) = &self.providers.preheat else {
            return;
        };

        let temperatures = match preheat.read_temperatures(&file.origin, &file.path) {
            Ok(t) => t,
            Err(e) => {
                log::warn!("{}", e);
                return;
            }
        };

        let reading = |sensor: &str| {
            temperatures
                .get(sensor)
                .copied()
                .filter(|value| value.is_finite())
        };

        let Some(tool) = reading("tool0") else {
            log::warn!(
                "Pre-heat data for '{}' has no usable tool0 temperature",
                file.path
            );
            return;
        };
        job.record_temperature("tool0", tool);
        match reading("bed") {
            Some(bed) => job.record_temperature("bed", bed),
            None if temperatures.contains_key("bed") => {
                log::warn!("Ignoring unusable bed temperature for '{}'", file.path);
            }
            None => {}
        }
    }

    fn build_filament_usage(&self, file: &FileInfo) -> FilamentUsage {
        let mut usage = FilamentUsage {
            calculated_length_mm: self
                .providers
                .file_metadata
                .as_ref()
                .and_then(|p| p.calculated_filament_length(&file.origin, &file.path)),
            ..Default::default()
        };

        let Some(filament) = &self.providers.filament else {
            return usage;
        };

        let snapshot = match filament.snapshot() {
            Ok(s) => s,
            Err(e) => {
                log::warn!("{}", e);
                return usage;
            }
        };

        usage.used_length_mm = snapshot.used_length_mm;
        if let Some(spool) = snapshot.selected_spool {
            usage.spool_name = spool.name;
            usage.spool_cost = spool.cost;
            usage.spool_cost_unit = snapshot.currency_symbol;
            usage.spool_weight_g = spool.weight_g;
            usage.material_vendor = spool.profile.vendor;
            usage.material_type = spool.profile.material;
            usage.filament_diameter_mm = spool.profile.diameter_mm;
            usage.filament_density = spool.profile.density;
        }
        usage
    }
}
