pub mod api;
pub mod broadcast;
pub mod config;
pub mod db;
pub mod error;
pub mod export;
pub mod history;
pub mod lifecycle;
pub mod logging;
pub mod model;
pub mod providers;
pub mod store;

pub use api::{ApiResponse, ExportFile, HistoryApi};
pub use broadcast::{HistoryBroadcaster, HistoryEvent};
pub use config::{load_config, load_config_from_str, validate_config, HistoryConfig};
pub use error::{ConfigError, HistoryError, LoggingError, Result};
pub use export::{
    from_client_edit, snapshot_file_name, to_client_view, to_csv, ClientJobEdit, ClientJobView,
};
pub use history::PrintJobHistory;
pub use lifecycle::{FileInfo, LayerProgress, PrintEvent, Reconciler, ReconcilerState};
pub use model::{FilamentUsage, PrintJob, PrintOutcome, TemperatureSample};
pub use providers::{ProviderError, ProviderKind, Providers};
pub use store::PrintJobStore;
