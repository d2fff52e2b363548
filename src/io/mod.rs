//! Loading task lists from disk. Tasks are read-only input; nothing is saved.

pub mod csv_import;
pub mod json;

use std::path::Path;

use crate::error::TimelineResult;
use crate::model::TaskInterval;

/// Load tasks by file extension: `.json` as a task array, anything else as CSV.
///
/// Returns `(tasks, skipped_rows)`.
pub fn load_tasks(path: &Path) -> TimelineResult<(Vec<TaskInterval>, usize)> {
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("json") => Ok((json::load_tasks(path)?, 0)),
        _ => csv_import::import_csv(path),
    }
}
