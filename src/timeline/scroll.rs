//! Scroll-driven orchestration of the window.
//!
//! The coordinator owns the one [`TimelineWindow`] of a mounted chart and runs a
//! two-phase protocol with its host:
//!
//! 1. A trigger (`on_scroll`, a jump, a scale change) commits a new window and
//!    records the scroll write that must accompany it.
//! 2. On the next frame, after the host has laid out the new window, it calls
//!    [`ScrollCoordinator::flush`] with its current scroll offset and applies the
//!    returned offset.
//!
//! While a write is pending no further shifts start. Each committed window has
//! a [`WindowGeneration`]; writes carrying an older generation are dropped.

use chrono::NaiveDateTime;
use tracing::{debug, trace};

use super::config::WindowConfig;
use super::coords;
use super::positioner::{self, TaskGeometry};
use super::scale::Scale;
use super::view::{self, GroupSpan, VisiblePeriod};
use super::window::{ScrollRequest, TimelineWindow, Transition, VisibleRange, WindowGeneration};
use crate::error::{TimelineError, TimelineResult};
use crate::model::{self, TaskInterval};

/// What a scroll event did to the window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScrollOutcome {
    /// No shift needed; the visible range now reflects the new offset.
    Recomputed(VisibleRange),
    ShiftedLeft(WindowGeneration),
    ShiftedRight(WindowGeneration),
    /// A previous write is still pending; the event was dropped.
    Deferred,
}

/// Result of a jump request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum JumpOutcome {
    /// Target was already safely inside the window; write this offset now.
    Scroll(f32),
    /// The write is queued for this generation; call `flush` on the next frame.
    Pending(WindowGeneration),
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct PendingScroll {
    generation: WindowGeneration,
    request: ScrollRequest,
}

#[derive(Debug, Clone)]
pub struct ScrollCoordinator {
    window: TimelineWindow,
    config: WindowConfig,
    container_width: f32,
    scroll_left: f32,
    pending: Option<PendingScroll>,
}

impl ScrollCoordinator {
    /// Build the first window around the tasks' midpoint, or `now` without tasks.
    pub fn new(
        scale: Scale,
        tasks: &[TaskInterval],
        config: WindowConfig,
        container_width: f32,
        now: NaiveDateTime,
    ) -> TimelineResult<Self> {
        let config = config.validate()?;
        if !container_width.is_finite() || container_width < 0.0 {
            return Err(TimelineError::InvalidContainerWidth(container_width));
        }
        let center = model::center_of_tasks(tasks).unwrap_or(now);

        let mut coordinator = Self {
            window: TimelineWindow::empty(scale),
            config,
            container_width,
            scroll_left: 0.0,
            pending: None,
        };
        let transition = TimelineWindow::initialize_around(
            scale,
            center,
            &coordinator.sized_config(scale),
            container_width,
        )?;
        coordinator.commit(transition);
        Ok(coordinator)
    }

    /// Phase one: install `transition` and queue its scroll write.
    pub fn commit(&mut self, transition: Transition) -> WindowGeneration {
        debug_assert!(transition.window.is_contiguous());
        let generation = transition.window.generation();
        if let Some(superseded) = self.pending.take() {
            debug!(
                superseded = superseded.generation.value(),
                generation = generation.value(),
                "pending scroll write superseded"
            );
        }
        self.window = transition.window;
        self.pending = Some(PendingScroll {
            generation,
            request: transition.scroll,
        });
        generation
    }

    /// Phase two: apply the queued write against the host's current offset.
    ///
    /// Returns the offset the host must scroll to, if any.
    pub fn flush(&mut self, current_scroll_left: f32) -> Option<f32> {
        let pending = self.pending?;
        self.apply_scroll_compensation(pending.generation, pending.request, current_scroll_left)
    }

    /// Apply a scroll write issued for `generation`.
    ///
    /// Writes for any generation other than the live one are dropped.
    pub fn apply_scroll_compensation(
        &mut self,
        generation: WindowGeneration,
        request: ScrollRequest,
        current_scroll_left: f32,
    ) -> Option<f32> {
        if generation != self.window.generation() {
            debug!(
                stale = generation.value(),
                live = self.window.generation().value(),
                "dropping stale scroll write"
            );
            return None;
        }
        if self.pending.is_some_and(|p| p.generation == generation) {
            self.pending = None;
        }

        let target = match request {
            ScrollRequest::Absolute(px) => px,
            ScrollRequest::Compensate(delta) => current_scroll_left + delta,
        };
        let target = self.clamp_scroll(target);
        self.set_scroll(target);
        Some(target)
    }

    /// React to the host's scroll offset changing.
    pub fn on_scroll(&mut self, scroll_left: f32) -> TimelineResult<ScrollOutcome> {
        if self.pending.is_some() {
            return Ok(ScrollOutcome::Deferred);
        }
        if self.window.is_empty() {
            return Ok(ScrollOutcome::Recomputed(VisibleRange::default()));
        }

        let total = self.window.total_width_px();
        let threshold = self.config.edge_threshold;
        let batch = self.sized_config(self.window.scale()).shift_batch;

        if scroll_left < total * threshold {
            self.scroll_left = scroll_left;
            let transition = self.window.shift_left(batch)?;
            return Ok(ScrollOutcome::ShiftedLeft(self.commit(transition)));
        }

        if scroll_left > total * (1.0 - threshold) - self.container_width {
            self.scroll_left = scroll_left;
            let transition = self.window.shift_right(batch)?;
            return Ok(ScrollOutcome::ShiftedRight(self.commit(transition)));
        }

        self.set_scroll(scroll_left);
        Ok(ScrollOutcome::Recomputed(self.window.visible()))
    }

    /// Centre `date` in the viewport, rebuilding the window if it is missing or
    /// too close to an edge.
    pub fn scroll_to_date(&mut self, date: NaiveDateTime) -> TimelineResult<JumpOutcome> {
        let config = self.window.config();
        let periods = self.window.periods();
        let margin = self.config.jump_margin_periods(periods.len());
        let safe_index = coords::locate(periods, date, config)
            .filter(|&index| index >= margin && index + margin < periods.len());
        let offset = coords::proportional_pixel_offset(periods, date, config).within();

        if let (Some(_), Some(px)) = (safe_index, offset) {
            let target = self.clamp_scroll(px - self.container_width / 2.0);
            if self.pending.is_some() {
                // A shift is still settling; queue behind it on the same window.
                let generation = self.window.generation();
                self.pending = Some(PendingScroll {
                    generation,
                    request: ScrollRequest::Absolute(target),
                });
                return Ok(JumpOutcome::Pending(generation));
            }
            self.set_scroll(target);
            return Ok(JumpOutcome::Scroll(target));
        }

        let sized = self.sized_config(self.window.scale());
        let transition = self
            .window
            .regenerate_around(date, &sized, self.container_width)?;
        let rebuilt = transition.window;
        let centred = coords::proportional_pixel_offset(rebuilt.periods(), date, rebuilt.config())
            .clamped(rebuilt.len(), rebuilt.config())
            - self.container_width / 2.0;
        debug!(target = %date, generation = rebuilt.generation().value(), "jump regenerated window");

        let generation = self.commit(Transition {
            window: rebuilt,
            scroll: ScrollRequest::Absolute(centred.max(0.0)),
        });
        Ok(JumpOutcome::Pending(generation))
    }

    pub fn scroll_to_today(&mut self, now: NaiveDateTime) -> TimelineResult<JumpOutcome> {
        self.scroll_to_date(now)
    }

    pub fn scroll_to_task(&mut self, task: &TaskInterval) -> TimelineResult<JumpOutcome> {
        self.scroll_to_date(task.start)
    }

    /// Switch scale, rebuilding around the date at the centre of the viewport.
    pub fn set_scale(&mut self, scale: Scale) -> TimelineResult<WindowGeneration> {
        if scale == self.window.scale() {
            return Ok(self.window.generation());
        }
        let Some(center) = self.center_date() else {
            self.window = TimelineWindow::empty(scale);
            self.pending = None;
            return Ok(self.window.generation());
        };
        let sized = self.sized_config(scale);
        let transition = self
            .window
            .rescale(scale, center, &sized, self.container_width)?;
        Ok(self.commit(transition))
    }

    /// Rebuild around a new task set (or `now` when it is empty).
    pub fn reset_to_tasks(
        &mut self,
        tasks: &[TaskInterval],
        now: NaiveDateTime,
    ) -> TimelineResult<WindowGeneration> {
        let center = model::center_of_tasks(tasks).unwrap_or(now);
        let scale = self.window.scale();
        let transition =
            self.window
                .rescale(scale, center, &self.sized_config(scale), self.container_width)?;
        Ok(self.commit(transition))
    }

    pub fn set_container_width(&mut self, width: f32) -> TimelineResult<()> {
        if !width.is_finite() || width < 0.0 {
            return Err(TimelineError::InvalidContainerWidth(width));
        }
        if width == self.container_width {
            return Ok(());
        }

        let center = self.center_date();
        self.container_width = width;
        let scale = self.window.scale();
        let sized = self.sized_config(scale);
        match center {
            Some(center) if sized.total_periods != self.window.len() => {
                debug!(
                    width,
                    periods = sized.total_periods,
                    "container resized, rebuilding window"
                );
                let transition =
                    self.window
                        .rescale(scale, center, &sized, self.container_width)?;
                self.commit(transition);
            }
            _ => self.set_scroll(self.scroll_left),
        }
        Ok(())
    }

    /// Tunables grown to fit the current container under `scale`.
    fn sized_config(&self, scale: Scale) -> WindowConfig {
        self.config
            .sized_for(self.container_width / scale.config().width)
    }

    /// Date under the middle of the viewport.
    ///
    /// While a write is pending the scroll offset is not yet meaningful for the
    /// live window, so the visible range's middle period is used instead.
    pub fn center_date(&self) -> Option<NaiveDateTime> {
        let periods = self.window.periods();
        if self.pending.is_none() {
            let middle = self.scroll_left + self.container_width / 2.0;
            if let Some(date) = coords::pixel_to_date(periods, middle, self.window.config()) {
                return Some(date);
            }
        }
        let visible = self.window.visible();
        periods
            .get(visible.midpoint())
            .or_else(|| periods.last())
            .copied()
    }

    fn clamp_scroll(&self, px: f32) -> f32 {
        let max = (self.window.total_width_px() - self.container_width).max(0.0);
        px.clamp(0.0, max)
    }

    fn set_scroll(&mut self, scroll_left: f32) {
        self.scroll_left = scroll_left;
        let visible = VisibleRange::from_scroll(
            scroll_left,
            self.container_width,
            self.window.config().width,
        )
        .clamped(self.window.len());
        trace!(start = visible.start, end = visible.end, "visible range");
        self.window.set_visible(visible);
    }

    // ── Getters ─────────────────────────────────────────────────

    pub fn window(&self) -> &TimelineWindow {
        &self.window
    }

    pub fn config(&self) -> &WindowConfig {
        &self.config
    }

    pub fn scale(&self) -> Scale {
        self.window.scale()
    }

    pub fn container_width(&self) -> f32 {
        self.container_width
    }

    pub fn scroll_left(&self) -> f32 {
        self.scroll_left
    }

    pub fn is_in_flight(&self) -> bool {
        self.pending.is_some()
    }

    pub fn pending_generation(&self) -> Option<WindowGeneration> {
        self.pending.map(|p| p.generation)
    }

    // ── Render outputs ──────────────────────────────────────────

    pub fn visible_periods(&self) -> Vec<VisiblePeriod> {
        view::visible_periods(&self.window, self.config.render_buffer)
    }

    pub fn group_spans(&self) -> Vec<GroupSpan> {
        view::group_spans(&self.window, self.config.render_buffer)
    }

    pub fn periods_offset_px(&self) -> f32 {
        view::periods_offset_px(&self.window, self.config.render_buffer)
    }

    pub fn total_width_px(&self) -> f32 {
        self.window.total_width_px()
    }

    pub fn today_marker_px(&self, now: NaiveDateTime) -> Option<f32> {
        positioner::today_marker_px(&self.window, now)
    }

    pub fn task_geometry(&self, task: &TaskInterval) -> Option<TaskGeometry> {
        positioner::task_geometry(&self.window, task)
    }
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

    fn settled(scale: Scale, now: NaiveDateTime) -> ScrollCoordinator {
        let mut coordinator =
            ScrollCoordinator::new(scale, &[], WindowConfig::default(), 720.0, now)
                .expect("coordinator");
        coordinator.flush(0.0).expect("initial scroll");
        coordinator
    }

    #[test]
    fn initial_commit_requests_centre_scroll() {
        let mut coordinator = ScrollCoordinator::new(
            Scale::Month,
            &[],
            WindowConfig::default(),
            720.0,
            at(2024, 6, 15, 9, 0),
        )
        .expect("coordinator");

        assert!(coordinator.is_in_flight());
        assert_eq!(coordinator.on_scroll(0.0).expect("scroll"), ScrollOutcome::Deferred);
        assert_eq!(coordinator.flush(0.0), Some(100.0 * 36.0 - 360.0));
        assert!(!coordinator.is_in_flight());
        assert_eq!(coordinator.center_date(), Some(at(2024, 6, 15, 0, 0)));
    }

    #[test]
    fn mid_window_scroll_only_recomputes_visible_range() {
        let mut coordinator = settled(Scale::Month, at(2024, 6, 15, 9, 0));
        let outcome = coordinator.on_scroll(50.0 * 36.0).expect("scroll");
        assert_eq!(outcome, ScrollOutcome::Recomputed(VisibleRange::new(50, 70)));
        assert_eq!(coordinator.window().virtual_offset(), 0);
    }

    #[test]
    fn right_edge_scroll_shifts_right_and_compensates() {
        let mut coordinator = settled(Scale::Month, at(2024, 6, 15, 9, 0));
        let total = coordinator.total_width_px();
        let scroll = total * 0.9 - 720.0 + 10.0;

        assert!(matches!(
            coordinator.on_scroll(scroll).expect("scroll"),
            ScrollOutcome::ShiftedRight(_)
        ));
        assert_eq!(coordinator.window().virtual_offset(), 100);
        let written = coordinator.flush(scroll).expect("compensation");
        assert!((written - (scroll - 100.0 * 36.0)).abs() < 1e-3);
    }

    #[test]
    fn jump_inside_safe_zone_scrolls_without_rebuilding() {
        let mut coordinator = settled(Scale::Month, at(2024, 6, 15, 9, 0));
        let generation = coordinator.window().generation();
        let outcome = coordinator.scroll_to_date(at(2024, 6, 25, 0, 0)).expect("jump");

        assert_eq!(outcome, JumpOutcome::Scroll(110.0 * 36.0 - 360.0));
        assert_eq!(coordinator.window().generation(), generation);
    }

    #[test]
    fn jump_near_edge_regenerates_around_target() {
        let mut coordinator = settled(Scale::Month, at(2024, 6, 15, 9, 0));
        let target = at(2024, 3, 10, 12, 0); // index 3, inside the 25% margin
        let outcome = coordinator.scroll_to_date(target).expect("jump");

        let JumpOutcome::Pending(generation) = outcome else {
            panic!("expected a regeneration, got {outcome:?}");
        };
        assert_eq!(coordinator.window().periods()[100], at(2024, 3, 10, 0, 0));
        let written = coordinator.flush(0.0).expect("jump scroll");
        assert!((written - (100.5 * 36.0 - 360.0)).abs() < 1e-3);
        assert_eq!(coordinator.window().generation(), generation);
    }

    #[test]
    fn set_scale_rebuilds_around_viewport_centre() {
        let mut coordinator = settled(Scale::Day, at(2024, 6, 15, 0, 0));
        coordinator.set_scale(Scale::Month).expect("rescale");

        assert_eq!(coordinator.scale(), Scale::Month);
        assert_eq!(coordinator.window().periods()[100], at(2024, 6, 15, 0, 0));
        assert!(coordinator.is_in_flight());
    }

    #[test]
    fn rejects_invalid_config() {
        let config = WindowConfig {
            shift_batch: 0,
            ..Default::default()
        };
        let result = ScrollCoordinator::new(Scale::Day, &[], config, 720.0, at(2024, 6, 15, 0, 0));
        assert!(matches!(result, Err(TimelineError::InvalidConfig(_))));
    }
}
