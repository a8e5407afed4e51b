//! Plain records for print jobs and their owned sub-records.

pub mod filament;
pub mod print_job;
pub mod temperature;

pub use filament::FilamentUsage;
pub use print_job::{PrintJob, PrintOutcome};
pub use temperature::TemperatureSample;
