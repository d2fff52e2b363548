//! The bounded window of periods standing in for an unbounded date axis.
//!
//! [`TimelineWindow`] is an owned value; every transition borrows the current
//! window and returns a fresh one together with the scroll write the host must
//! perform once the new window is on screen.

use chrono::NaiveDateTime;
use tracing::debug;

use super::config::WindowConfig;
use super::coords;
use super::scale::{Scale, ScaleConfig};
use crate::error::{TimelineError, TimelineResult};

/// Identity of a committed window. Bumped by every transition.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct WindowGeneration(u64);

impl WindowGeneration {
    pub fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }

    pub fn value(self) -> u64 {
        self.0
    }
}

/// Half-open `[start, end)` range of period indices covered by the viewport.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VisibleRange {
    pub start: usize,
    pub end: usize,
}

impl VisibleRange {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// `count` periods centred on `center`, kept inside `[0, len]`.
    pub fn centered(center: usize, count: usize, len: usize) -> Self {
        let start = center.saturating_sub(count / 2).min(len);
        Self {
            start,
            end: (start + count).min(len),
        }
    }

    /// Range covered by a viewport at `scroll_left` that is `container_width` wide.
    pub fn from_scroll(scroll_left: f32, container_width: f32, period_width: f32) -> Self {
        let start = (scroll_left.max(0.0) / period_width).floor() as usize;
        let count = (container_width.max(0.0) / period_width).ceil() as usize;
        Self {
            start,
            end: start + count,
        }
    }

    pub fn clamped(self, len: usize) -> Self {
        let start = self.start.min(len);
        Self {
            start,
            end: self.end.clamp(start, len),
        }
    }

    pub fn shifted(self, delta: isize) -> Self {
        Self {
            start: self.start.saturating_add_signed(delta),
            end: self.end.saturating_add_signed(delta),
        }
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn midpoint(&self) -> usize {
        self.start + self.len() / 2
    }
}

/// Scroll write that must follow a committed transition.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScrollRequest {
    /// Move the scroll surface to this offset.
    Absolute(f32),
    /// Add this delta to whatever the scroll offset is when the write lands.
    Compensate(f32),
}

/// A new window plus the scroll write that keeps it visually stable.
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub window: TimelineWindow,
    pub scroll: ScrollRequest,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TimelineWindow {
    scale: Scale,
    periods: Vec<NaiveDateTime>,
    visible: VisibleRange,
    virtual_offset: i64,
    generation: WindowGeneration,
}

impl TimelineWindow {
    /// A window with no periods, used before the first initialisation.
    pub fn empty(scale: Scale) -> Self {
        Self {
            scale,
            periods: Vec::new(),
            visible: VisibleRange::default(),
            virtual_offset: 0,
            generation: WindowGeneration::default(),
        }
    }

    /// Build `config.total_periods` periods symmetric around `center`.
    pub fn initialize_around(
        scale: Scale,
        center: NaiveDateTime,
        config: &WindowConfig,
        container_width: f32,
    ) -> TimelineResult<Transition> {
        Self::build(scale, center, config, container_width, WindowGeneration::default())
    }

    /// Rebuild around `date`, keeping the scale.
    pub fn regenerate_around(
        &self,
        date: NaiveDateTime,
        config: &WindowConfig,
        container_width: f32,
    ) -> TimelineResult<Transition> {
        Self::build(self.scale, date, config, container_width, self.generation.next())
    }

    /// Rebuild around `date` under a different scale.
    pub fn rescale(
        &self,
        scale: Scale,
        date: NaiveDateTime,
        config: &WindowConfig,
        container_width: f32,
    ) -> TimelineResult<Transition> {
        Self::build(scale, date, config, container_width, self.generation.next())
    }

    fn build(
        scale: Scale,
        center: NaiveDateTime,
        config: &WindowConfig,
        container_width: f32,
        generation: WindowGeneration,
    ) -> TimelineResult<Transition> {
        if !container_width.is_finite() || container_width < 0.0 {
            return Err(TimelineError::InvalidContainerWidth(container_width));
        }

        let scale_config = scale.config();
        let aligned = (scale_config.align)(center);
        let center_index = config.total_periods / 2;
        let first = step(scale_config, aligned, -(center_index as i64))?;
        let periods = (0..config.total_periods as i64)
            .map(|offset| step(scale_config, first, offset))
            .collect::<TimelineResult<Vec<_>>>()?;

        let visible_count = (container_width / scale_config.width).ceil() as usize;
        let visible = VisibleRange::centered(center_index, visible_count, periods.len());
        let scroll_left =
            (coords::pixel_offset(center_index, scale_config) - container_width / 2.0).max(0.0);

        debug!(
            scale = %scale,
            center = %aligned,
            periods = periods.len(),
            generation = generation.value(),
            "built timeline window"
        );

        Ok(Transition {
            window: Self {
                scale,
                periods,
                visible,
                virtual_offset: 0,
                generation,
            },
            scroll: ScrollRequest::Absolute(scroll_left),
        })
    }

    /// Drop `amount` periods from the tail and prepend as many earlier ones.
    pub fn shift_left(&self, amount: usize) -> TimelineResult<Transition> {
        let config = self.config();
        let amount = amount.min(self.periods.len());
        let Some(&first) = self.periods.first() else {
            return Ok(self.unchanged());
        };

        let mut periods = Vec::with_capacity(self.periods.len());
        for offset in (1..=amount as i64).rev() {
            periods.push(step(config, first, -offset)?);
        }
        periods.extend_from_slice(&self.periods[..self.periods.len() - amount]);

        let virtual_offset = self.virtual_offset - amount as i64;
        debug!(amount, virtual_offset, "shifted timeline window left");

        Ok(Transition {
            window: Self {
                scale: self.scale,
                visible: self.visible.shifted(amount as isize).clamped(periods.len()),
                periods,
                virtual_offset,
                generation: self.generation.next(),
            },
            scroll: ScrollRequest::Compensate(coords::pixel_offset(amount, config)),
        })
    }

    /// Drop `amount` periods from the head and append as many later ones.
    pub fn shift_right(&self, amount: usize) -> TimelineResult<Transition> {
        let config = self.config();
        let amount = amount.min(self.periods.len());
        let Some(&last) = self.periods.last() else {
            return Ok(self.unchanged());
        };

        let mut periods = Vec::with_capacity(self.periods.len());
        periods.extend_from_slice(&self.periods[amount..]);
        for offset in 1..=amount as i64 {
            periods.push(step(config, last, offset)?);
        }

        let virtual_offset = self.virtual_offset + amount as i64;
        debug!(amount, virtual_offset, "shifted timeline window right");

        Ok(Transition {
            window: Self {
                scale: self.scale,
                visible: self.visible.shifted(-(amount as isize)).clamped(periods.len()),
                periods,
                virtual_offset,
                generation: self.generation.next(),
            },
            scroll: ScrollRequest::Compensate(-coords::pixel_offset(amount, config)),
        })
    }

    fn unchanged(&self) -> Transition {
        Transition {
            window: Self {
                generation: self.generation.next(),
                ..self.clone()
            },
            scroll: ScrollRequest::Compensate(0.0),
        }
    }

    pub(crate) fn set_visible(&mut self, visible: VisibleRange) {
        self.visible = visible;
    }

    // ── Getters ─────────────────────────────────────────────────

    pub fn scale(&self) -> Scale {
        self.scale
    }

    pub fn config(&self) -> &'static ScaleConfig {
        self.scale.config()
    }

    pub fn periods(&self) -> &[NaiveDateTime] {
        &self.periods
    }

    pub fn len(&self) -> usize {
        self.periods.len()
    }

    pub fn is_empty(&self) -> bool {
        self.periods.is_empty()
    }

    pub fn first(&self) -> Option<NaiveDateTime> {
        self.periods.first().copied()
    }

    pub fn last(&self) -> Option<NaiveDateTime> {
        self.periods.last().copied()
    }

    /// Visible range, clamped to the current period count.
    pub fn visible(&self) -> VisibleRange {
        self.visible.clamped(self.periods.len())
    }

    pub fn virtual_offset(&self) -> i64 {
        self.virtual_offset
    }

    pub fn generation(&self) -> WindowGeneration {
        self.generation
    }

    pub fn total_width_px(&self) -> f32 {
        coords::pixel_offset(self.periods.len(), self.config())
    }

    /// Every neighbour pair is exactly one increment apart.
    pub fn is_contiguous(&self) -> bool {
        let config = self.config();
        self.periods
            .windows(2)
            .all(|pair| config.next(pair[0]) == Some(pair[1]))
    }
}

fn step(config: &ScaleConfig, date: NaiveDateTime, steps: i64) -> TimelineResult<NaiveDateTime> {
    config
        .increment
        .advance(date, steps)
        .ok_or(TimelineError::DateOutOfRange { date, steps })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .and_then(|date| date.and_hms_opt(h, min, 0))
            .expect("valid test date")
    }

    fn window(scale: Scale, center: NaiveDateTime) -> TimelineWindow {
        TimelineWindow::initialize_around(scale, center, &WindowConfig::default(), 960.0)
            .expect("build window")
            .window
    }

    #[test]
    fn initialize_centres_the_aligned_date() {
        let center = at(2024, 6, 15, 13, 21);
        let transition = TimelineWindow::initialize_around(
            Scale::Hours,
            center,
            &WindowConfig::default(),
            960.0,
        )
        .expect("build window");
        let window = transition.window;

        assert_eq!(window.len(), 200);
        assert_eq!(window.periods()[100], at(2024, 6, 15, 13, 15));
        assert_eq!(window.virtual_offset(), 0);
        assert!(window.is_contiguous());
        // 960 px / 48 px = 20 visible periods around index 100.
        assert_eq!(window.visible(), VisibleRange::new(90, 110));
        assert_eq!(transition.scroll, ScrollRequest::Absolute(100.0 * 48.0 - 480.0));
    }

    #[test]
    fn shift_left_prepends_earlier_periods_and_compensates() {
        let before = window(Scale::Month, at(2024, 6, 15, 0, 0));
        let transition = before.shift_left(100).expect("shift");
        let after = transition.window;

        assert_eq!(after.len(), 200);
        assert!(after.is_contiguous());
        assert_eq!(after.periods()[100], before.periods()[0]);
        assert_eq!(after.virtual_offset(), -100);
        assert_eq!(after.visible().start, before.visible().start + 100);
        assert_eq!(after.generation(), before.generation().next());
        assert_eq!(transition.scroll, ScrollRequest::Compensate(100.0 * 36.0));
    }

    #[test]
    fn shift_right_appends_later_periods_and_compensates() {
        let before = window(Scale::Day, at(2024, 6, 15, 0, 0));
        let transition = before.shift_right(100).expect("shift");
        let after = transition.window;

        assert!(after.is_contiguous());
        assert_eq!(after.periods()[0], before.periods()[100]);
        assert_eq!(after.virtual_offset(), 100);
        // The old visible range (90..110) now sits partly before the window.
        assert_eq!(before.visible(), VisibleRange::new(90, 110));
        assert_eq!(after.visible(), VisibleRange::new(0, 10));
        assert_eq!(transition.scroll, ScrollRequest::Compensate(-100.0 * 48.0));
    }

    #[test]
    fn shift_left_then_right_restores_the_periods() {
        let original = window(Scale::FiveYears, at(2024, 6, 15, 0, 0));
        let restored = original
            .shift_left(100)
            .and_then(|t| t.window.shift_right(100))
            .expect("shifts")
            .window;

        assert_eq!(restored.periods(), original.periods());
        assert_eq!(restored.virtual_offset(), 0);
    }

    #[test]
    fn rescale_replaces_periods_and_bumps_generation() {
        let day = window(Scale::Day, at(2024, 6, 15, 0, 0));
        let month = day
            .rescale(Scale::Month, at(2024, 6, 15, 0, 0), &WindowConfig::default(), 960.0)
            .expect("rescale")
            .window;

        assert_eq!(month.scale(), Scale::Month);
        assert_eq!(month.periods()[100], at(2024, 6, 15, 0, 0));
        assert_eq!(month.periods()[101], at(2024, 6, 16, 0, 0));
        assert!(month.generation() > day.generation());
    }

    #[test]
    fn empty_window_shifts_to_nothing() {
        let empty = TimelineWindow::empty(Scale::Week);
        let transition = empty.shift_left(100).expect("shift");
        assert!(transition.window.is_empty());
        assert_eq!(transition.scroll, ScrollRequest::Compensate(0.0));
        assert_eq!(empty.total_width_px(), 0.0);
    }

    #[test]
    fn rejects_negative_container_width() {
        let result = TimelineWindow::initialize_around(
            Scale::Day,
            at(2024, 6, 15, 0, 0),
            &WindowConfig::default(),
            -5.0,
        );
        assert!(matches!(result, Err(TimelineError::InvalidContainerWidth(_))));
    }

    #[test]
    fn visible_range_helpers_clamp_and_shift() {
        assert_eq!(VisibleRange::new(250, 300).clamped(200), VisibleRange::new(200, 200));
        assert_eq!(VisibleRange::new(5, 10).shifted(-8), VisibleRange::new(0, 2));
        assert_eq!(
            VisibleRange::from_scroll(100.0, 200.0, 48.0),
            VisibleRange::new(2, 7)
        );
    }
}
