//! Client-facing projections of the stored history: list view, CSV export,
//! and the edit path back into the store.

pub mod csv;
pub mod edit;
pub mod format;
pub mod snapshot;
pub mod view;

pub use csv::{to_csv, CSV_HEADERS};
pub use edit::{from_client_edit, keep_stored_precision, ClientJobEdit};
pub use snapshot::{snapshot_file_name, snapshot_location};
pub use view::{to_client_view, ClientFilamentView, ClientJobView, ClientTemperatureView};
