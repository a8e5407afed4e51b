//! Snapshot image naming. Capturing and storing the image belongs to the camera integration.

use std::path::{Component, Path, PathBuf};

use chrono::NaiveDateTime;

/// Image file name for the snapshot of a job that started at `started_at`.
pub fn snapshot_file_name(started_at: &NaiveDateTime) -> String {
    format!("{}.jpg", started_at.format("%Y%m%d-%H%M%S"))
}

/// Resolves a snapshot file name inside `folder`.
///
/// Returns `None` for anything that is not a plain file name.
pub fn snapshot_location(folder: &Path, file_name: &str) -> Option<PathBuf> {
    let mut components = Path::new(file_name).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(name)), None) => Some(folder.join(name)),
        _ => None,
    }
}
