pub mod task;

pub use task::TaskInterval;

use chrono::NaiveDateTime;

/// Earliest start and latest end across `tasks`.
pub fn date_span(tasks: &[TaskInterval]) -> Option<(NaiveDateTime, NaiveDateTime)> {
    let start = tasks.iter().map(|t| t.start).min()?;
    let end = tasks.iter().map(|t| t.effective_end()).max()?;
    Some((start, end.max(start)))
}

/// Midpoint of [`date_span`], the default centre for a new window.
pub fn center_of_tasks(tasks: &[TaskInterval]) -> Option<NaiveDateTime> {
    let (start, end) = date_span(tasks)?;
    Some(start + (end - start) / 2)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn day(d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 6, d)
            .and_then(|date| date.and_hms_opt(0, 0, 0))
            .expect("valid test date")
    }

    #[test]
    fn center_is_midpoint_of_all_tasks() {
        let tasks = vec![
            TaskInterval::new("Kickoff", day(2), day(4)),
            TaskInterval::new("Build", day(5), day(12)),
        ];
        assert_eq!(date_span(&tasks), Some((day(2), day(12))));
        assert_eq!(center_of_tasks(&tasks), Some(day(7)));
    }

    #[test]
    fn no_tasks_means_no_center() {
        assert_eq!(center_of_tasks(&[]), None);
    }

    #[test]
    fn inverted_task_collapses_to_its_start() {
        let task = TaskInterval::new("Backwards", day(10), day(3));
        assert!(task.is_inverted());
        assert_eq!(task.effective_end(), day(10));
        assert_eq!(date_span(&[task]), Some((day(10), day(10))));
    }
}
