//! Print job lifecycle: opening a job on start, enriching it while it runs,
//! and committing it exactly once when it ends.

pub mod events;
pub mod reconciler;

pub use events::{FileInfo, LayerProgress, PrintEvent};
pub use reconciler::{Clock, Reconciler, ReconcilerState};
