use serde::{Deserialize, Serialize};

use crate::error::{TimelineError, TimelineResult};

/// Sizing and trigger tunables for the virtual window.
///
/// `shift_batch` periods are recycled whenever the scroll position enters the
/// outer `edge_threshold` fraction of the window. `jump_margin` is the fraction
/// of either edge a jump target must stay clear of to reuse the current window.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub total_periods: usize,
    pub shift_batch: usize,
    pub edge_threshold: f32,
    pub jump_margin: f32,
    /// Extra periods materialised on each side of the visible range.
    pub render_buffer: usize,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            total_periods: 200,
            shift_batch: 100,
            edge_threshold: 0.1,
            jump_margin: 0.25,
            render_buffer: 30,
        }
    }
}

impl WindowConfig {
    pub fn validate(self) -> TimelineResult<Self> {
        if self.shift_batch == 0 || self.shift_batch * 2 > self.total_periods {
            return Err(TimelineError::InvalidConfig(format!(
                "shift batch {} must be in 1..={} for a window of {} periods",
                self.shift_batch,
                self.total_periods / 2,
                self.total_periods
            )));
        }

        if !self.edge_threshold.is_finite()
            || self.edge_threshold <= 0.0
            || self.edge_threshold >= 0.5
        {
            return Err(TimelineError::InvalidConfig(
                "edge threshold must be finite and in (0, 0.5)".to_owned(),
            ));
        }

        // After a shift the viewport must land outside the trigger zone again.
        if self.edge_threshold * self.total_periods as f32 >= self.shift_batch as f32 {
            return Err(TimelineError::InvalidConfig(format!(
                "edge zone of {:.1} periods must be narrower than the shift batch {}",
                self.edge_threshold * self.total_periods as f32,
                self.shift_batch
            )));
        }

        // Between the two edge zones there must be room for one batch of compensation.
        if self.viewport_room() <= 0.0 {
            return Err(TimelineError::InvalidConfig(format!(
                "{} periods leave no room between edge zones for a shift batch of {}",
                self.total_periods, self.shift_batch
            )));
        }

        if !self.jump_margin.is_finite() || self.jump_margin < 0.0 || self.jump_margin >= 0.5 {
            return Err(TimelineError::InvalidConfig(
                "jump margin must be finite and in [0, 0.5)".to_owned(),
            ));
        }

        Ok(self)
    }

    /// Widest viewport, in periods, whose compensated offset after a shift
    /// still lands between both edge zones.
    fn viewport_room(&self) -> f32 {
        self.total_periods as f32 * (1.0 - 2.0 * self.edge_threshold) - self.shift_batch as f32
    }

    /// Grow `total_periods` and `shift_batch` by the same whole factor until a
    /// viewport `visible_periods` wide fits [`Self::viewport_room`].
    ///
    /// Assumes a validated config.
    pub fn sized_for(&self, visible_periods: f32) -> Self {
        let room = self.viewport_room();
        let factor = if room > 0.0 && visible_periods.is_finite() {
            (visible_periods.max(0.0) / room).ceil().max(1.0) as usize
        } else {
            1
        };
        Self {
            total_periods: self.total_periods * factor,
            shift_batch: self.shift_batch * factor,
            ..*self
        }
    }

    /// Number of periods on each edge that counts as "too close" for a jump.
    pub fn jump_margin_periods(&self, len: usize) -> usize {
        (len as f32 * self.jump_margin).floor() as usize
    }
}
