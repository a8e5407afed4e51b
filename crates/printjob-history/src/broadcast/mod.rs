//! Broadcasting of history notifications to downstream consumers (UI refresh etc.).

pub mod history_events;

pub use history_events::{HistoryBroadcaster, HistoryEvent};
