use chrono::NaiveDateTime;

use super::coords::{self, Placement};
use super::window::TimelineWindow;
use crate::model::TaskInterval;

/// Horizontal extent of a task bar, relative to the window's first period.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TaskGeometry {
    pub left_px: f32,
    pub width_px: f32,
}

impl TaskGeometry {
    pub fn right_px(&self) -> f32 {
        self.left_px + self.width_px
    }
}

/// Place `task` on the window, or `None` if it cannot be seen.
///
/// Start and end are interpolated independently so bars keep their true
/// duration even when they do not line up with period boundaries. An end before
/// the start collapses to a zero-width bar at the start.
pub fn task_geometry(window: &TimelineWindow, task: &TaskInterval) -> Option<TaskGeometry> {
    let (first, last) = (window.first()?, window.last()?);
    let end = task.effective_end();
    if end < first || task.start > last {
        return None;
    }

    let config = window.config();
    let periods = window.periods();
    let total = window.total_width_px();
    let edge = |date: NaiveDateTime| match coords::proportional_pixel_offset(periods, date, config) {
        Placement::BeforeWindow => 0.0,
        Placement::Within(px) => px.clamp(0.0, total),
        Placement::AfterWindow => total,
    };

    let left_px = edge(task.start);
    let right_px = edge(end);
    Some(TaskGeometry {
        left_px,
        width_px: (right_px - left_px).max(0.0),
    })
}

/// Offset of the "today" line, `None` when `now` is outside the window.
pub fn today_marker_px(window: &TimelineWindow, now: NaiveDateTime) -> Option<f32> {
    coords::proportional_pixel_offset(window.periods(), now, window.config()).within()
}
