//! Render-ready projections of a window for the presentation layer.

use std::ops::Range;

use chrono::NaiveDateTime;

use super::coords;
use super::scale::MarkKind;
use super::window::TimelineWindow;

/// One period the shell should draw.
#[derive(Debug, Clone, PartialEq)]
pub struct VisiblePeriod {
    pub index: usize,
    pub date: NaiveDateTime,
    /// Offset from the window's first period.
    pub offset_px: f32,
    pub width_px: f32,
    pub mark: MarkKind,
    pub label: String,
    /// Header text when this period opens a group (or opens the rendered slice).
    pub group_header: Option<String>,
}

/// A run of consecutive rendered periods sharing a group key.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupSpan {
    pub key: String,
    pub title: String,
    pub start_px: f32,
    pub end_px: f32,
}

/// Visible range padded by `buffer` periods on each side.
pub fn rendered_range(window: &TimelineWindow, buffer: usize) -> Range<usize> {
    let visible = window.visible();
    visible.start.saturating_sub(buffer)..(visible.end + buffer).min(window.len())
}

/// Offset of the first rendered period, for absolute positioning.
pub fn periods_offset_px(window: &TimelineWindow, buffer: usize) -> f32 {
    coords::pixel_offset(rendered_range(window, buffer).start, window.config())
}

pub fn visible_periods(window: &TimelineWindow, buffer: usize) -> Vec<VisiblePeriod> {
    let config = window.config();
    let range = rendered_range(window, buffer);
    let first = range.start;

    window.periods()[range]
        .iter()
        .enumerate()
        .map(|(i, &date)| {
            let index = first + i;
            let opens_group = i == 0 || (config.shows_group_header)(date);
            VisiblePeriod {
                index,
                date,
                offset_px: coords::pixel_offset(index, config),
                width_px: config.width,
                mark: (config.classify)(date),
                label: config.label(date),
                group_header: opens_group.then(|| config.header(date)),
            }
        })
        .collect()
}

/// Header spans over the rendered range, split wherever the group key changes.
pub fn group_spans(window: &TimelineWindow, buffer: usize) -> Vec<GroupSpan> {
    let config = window.config();
    let range = rendered_range(window, buffer);
    let mut spans: Vec<GroupSpan> = Vec::new();

    for index in range {
        let date = window.periods()[index];
        let key = (config.group_key)(date);
        let start_px = coords::pixel_offset(index, config);
        let end_px = start_px + config.width;
        match spans.last_mut() {
            Some(span) if span.key == key => span.end_px = end_px,
            _ => spans.push(GroupSpan {
                title: config.header(date),
                key,
                start_px,
                end_px,
            }),
        }
    }

    spans
}
