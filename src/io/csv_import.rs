use std::path::Path;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use tracing::warn;

use crate::error::{TimelineError, TimelineResult};
use crate::model::TaskInterval;

const DATE_TIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%d/%m/%Y %H:%M",
    "%d.%m.%Y %H:%M",
];

const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d", "%d/%m/%Y", "%m/%d/%Y", "%d-%m-%Y", "%d.%m.%Y", "%Y/%m/%d", "%m-%d-%Y",
];

/// Which edge of a task a date-only cell describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Edge {
    Start,
    End,
}

/// Try parsing a cell as a date-time, then as a plain date.
///
/// A plain start date means midnight; a plain end date covers that whole day
/// and resolves to the following midnight.
fn parse_date_time(s: &str, edge: Edge) -> Option<NaiveDateTime> {
    let s = s.trim();
    for fmt in DATE_TIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt);
        }
    }
    let date = DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())?;
    match edge {
        Edge::Start => Some(date.and_time(NaiveTime::MIN)),
        Edge::End => date.succ_opt().map(|next| next.and_time(NaiveTime::MIN)),
    }
}

/// Detect delimiter by checking the first line for common separators.
fn detect_delimiter(first_line: &str) -> u8 {
    let semicolons = first_line.matches(';').count();
    let commas = first_line.matches(',').count();
    let tabs = first_line.matches('\t').count();

    if semicolons >= commas && semicolons >= tabs {
        b';'
    } else if tabs >= commas {
        b'\t'
    } else {
        b','
    }
}

fn normalize_header(h: &str) -> String {
    h.trim().to_lowercase().replace([' ', '-', '_'], "")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Column {
    Id,
    Name,
    Start,
    End,
}

fn header_to_col(normalized: &str) -> Option<Column> {
    match normalized {
        "id" | "taskid" | "key" | "uid" => Some(Column::Id),

        "name" | "task" | "tasklabel" | "taskname" | "label" | "title" | "activity" => {
            Some(Column::Name)
        }

        "start" | "startdate" | "from" | "begin" | "begindate" | "starttime" => Some(Column::Start),

        "end" | "enddate" | "to" | "finish" | "finishdate" | "due" | "duedate" | "endtime" => {
            Some(Column::End)
        }

        _ => None,
    }
}

/// Import tasks from a CSV file.
///
/// Auto-detects delimiter (comma, semicolon, tab) and matches column headers
/// flexibly ("Task Label", "Start Date", ...). Rows without a name or with
/// unparsable dates are skipped. Returns `(tasks, skipped_count)`.
pub fn import_csv(path: &Path) -> TimelineResult<(Vec<TaskInterval>, usize)> {
    let content = std::fs::read_to_string(path)?;
    parse_csv(&content)
}

pub fn parse_csv(content: &str) -> TimelineResult<(Vec<TaskInterval>, usize)> {
    let first_line = content.lines().next().unwrap_or("");
    let delimiter = detect_delimiter(first_line);

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(content.as_bytes());

    let headers = reader.headers()?.clone();
    let col_map: Vec<Option<Column>> = headers
        .iter()
        .map(|h| header_to_col(&normalize_header(h)))
        .collect();

    let has = |column| col_map.contains(&Some(column));
    if !has(Column::Name) || !has(Column::Start) || !has(Column::End) {
        let found: Vec<&str> = headers.iter().collect();
        return Err(TimelineError::Import(format!(
            "CSV is missing required columns. Found headers: {found:?}. \
             Need columns for: task name, start, end."
        )));
    }

    let mut tasks = Vec::new();
    let mut skipped = 0usize;

    for (i, result) in reader.records().enumerate() {
        let row = i + 2;
        let record = match result {
            Ok(r) => r,
            Err(e) => {
                warn!(row, error = %e, "skipping unreadable CSV row");
                skipped += 1;
                continue;
            }
        };

        let mut id = None;
        let mut name = None;
        let mut start = None;
        let mut end = None;
        for (field, column) in record.iter().zip(&col_map) {
            match column {
                Some(Column::Id) => id = Some(field),
                Some(Column::Name) => name = Some(field),
                Some(Column::Start) => start = Some(field),
                Some(Column::End) => end = Some(field),
                None => {}
            }
        }

        let Some(name) = name.filter(|n| !n.is_empty()) else {
            skipped += 1;
            continue;
        };

        let Some(start) = start.and_then(|s| parse_date_time(s, Edge::Start)) else {
            warn!(row, value = start.unwrap_or(""), "skipping row with invalid start");
            skipped += 1;
            continue;
        };

        let Some(end) = end.and_then(|s| parse_date_time(s, Edge::End)) else {
            warn!(row, value = end.unwrap_or(""), "skipping row with invalid end");
            skipped += 1;
            continue;
        };

        let mut task = TaskInterval::new(name, start, end);
        if let Some(id) = id.filter(|id| !id.is_empty()) {
            task.id = id.to_owned();
        }
        tasks.push(task);
    }

    if tasks.is_empty() && skipped > 0 {
        return Err(TimelineError::Import(format!(
            "No valid tasks found in CSV ({skipped} rows skipped)"
        )));
    }
    if tasks.is_empty() {
        return Err(TimelineError::Import(
            "CSV file is empty or has no data rows".to_owned(),
        ));
    }

    Ok((tasks, skipped))
}
