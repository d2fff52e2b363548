use std::path::Path;

use crate::error::TimelineResult;
use crate::model::TaskInterval;

/// Load a JSON array of tasks.
pub fn load_tasks(path: &Path) -> TimelineResult<Vec<TaskInterval>> {
    let json = std::fs::read_to_string(path)?;
    parse_tasks(&json)
}

pub fn parse_tasks(json: &str) -> TimelineResult<Vec<TaskInterval>> {
    Ok(serde_json::from_str(json)?)
}
