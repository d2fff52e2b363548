//! Date ↔ period index ↔ pixel conversions over an ordered window of periods.
//!
//! All functions are pure and take the window as a slice so they work equally
//! on the live window and on freshly built candidates.

use chrono::{Duration, NaiveDateTime};

use super::scale::ScaleConfig;

/// Where a date falls relative to a window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Placement {
    BeforeWindow,
    /// Pixel offset from the window's first period.
    Within(f32),
    AfterWindow,
}

impl Placement {
    pub fn within(self) -> Option<f32> {
        match self {
            Placement::Within(px) => Some(px),
            _ => None,
        }
    }

    /// Collapse to a pixel value: before → 0, after → offset of the last period.
    pub fn clamped(self, window_len: usize, config: &ScaleConfig) -> f32 {
        match self {
            Placement::BeforeWindow => 0.0,
            Placement::Within(px) => px,
            Placement::AfterWindow => pixel_offset(window_len.saturating_sub(1), config),
        }
    }
}

/// First period for which `is_exact_match` holds.
pub fn index_of_exact(
    window: &[NaiveDateTime],
    date: NaiveDateTime,
    config: &ScaleConfig,
) -> Option<usize> {
    window
        .iter()
        .position(|&period| (config.is_exact_match)(period, date))
}

/// Closest period (by absolute time distance) sharing `date`'s coarse bucket.
///
/// Ties resolve to the earlier period.
pub fn index_of_nearest_same_bucket(
    window: &[NaiveDateTime],
    date: NaiveDateTime,
    config: &ScaleConfig,
) -> Option<usize> {
    window
        .iter()
        .enumerate()
        .filter(|(_, &period)| (config.is_same_bucket)(period, date))
        .min_by_key(|(_, &period)| (period - date).num_seconds().abs())
        .map(|(index, _)| index)
}

/// Exact lookup with the same-bucket fallback.
pub fn locate(window: &[NaiveDateTime], date: NaiveDateTime, config: &ScaleConfig) -> Option<usize> {
    index_of_exact(window, date, config).or_else(|| index_of_nearest_same_bucket(window, date, config))
}

pub fn pixel_offset(index: usize, config: &ScaleConfig) -> f32 {
    index as f32 * config.width
}

/// Sub-period position of `date`, interpolated between its bracketing periods.
pub fn proportional_pixel_offset(
    window: &[NaiveDateTime],
    date: NaiveDateTime,
    config: &ScaleConfig,
) -> Placement {
    let (Some(&first), Some(&last)) = (window.first(), window.last()) else {
        return Placement::BeforeWindow;
    };
    if date < first {
        return Placement::BeforeWindow;
    }
    if date > last {
        return Placement::AfterWindow;
    }
    if date == last {
        return Placement::Within(pixel_offset(window.len() - 1, config));
    }

    // first <= date < last, so both neighbours exist.
    let before = window.partition_point(|&period| period <= date) - 1;
    let span = (window[before + 1] - window[before]).num_milliseconds() as f64;
    let elapsed = (date - window[before]).num_milliseconds() as f64;
    let fraction = if span > 0.0 { elapsed / span } else { 0.0 };

    Placement::Within(((before as f64 + fraction) * f64::from(config.width)) as f32)
}

/// Inverse of [`proportional_pixel_offset`]; `None` outside `[0, len * width)`.
pub fn pixel_to_date(
    window: &[NaiveDateTime],
    px: f32,
    config: &ScaleConfig,
) -> Option<NaiveDateTime> {
    if !px.is_finite() || px < 0.0 {
        return None;
    }
    let position = f64::from(px) / f64::from(config.width);
    let index = position.floor() as usize;
    let period = *window.get(index)?;
    let next = window
        .get(index + 1)
        .copied()
        .or_else(|| config.next(period))?;
    let span = (next - period).num_milliseconds() as f64;
    let offset = ((position - index as f64) * span).round() as i64;

    period.checked_add_signed(Duration::try_milliseconds(offset)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timeline::scale::Scale;
    use approx::assert_relative_eq;
    use chrono::NaiveDate;

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .and_then(|date| date.and_hms_opt(h, min, 0))
            .expect("valid test date")
    }

    fn periods(scale: Scale, start: NaiveDateTime, count: i64) -> Vec<NaiveDateTime> {
        (0..count)
            .map(|step| {
                scale
                    .config()
                    .increment
                    .advance(start, step)
                    .expect("in range")
            })
            .collect()
    }

    #[test]
    fn exact_lookup_finds_every_period_at_its_own_index() {
        let config = Scale::Hours.config();
        let window = periods(Scale::Hours, at(2024, 6, 15, 12, 0), 16);
        for (index, &period) in window.iter().enumerate() {
            assert_eq!(index_of_exact(&window, period, config), Some(index));
        }
    }

    #[test]
    fn off_boundary_date_falls_back_to_nearest_in_bucket() {
        let config = Scale::Hours.config();
        let window = periods(Scale::Hours, at(2024, 6, 15, 12, 0), 16);
        let target = at(2024, 6, 15, 13, 21);

        assert_eq!(index_of_exact(&window, target, config), None);
        // 13:15 is index 5, six minutes away; 13:30 is nine minutes away.
        assert_eq!(index_of_nearest_same_bucket(&window, target, config), Some(5));
        assert_eq!(locate(&window, target, config), Some(5));
    }

    #[test]
    fn nearest_lookup_ignores_other_buckets() {
        let config = Scale::Hours.config();
        let window = periods(Scale::Hours, at(2024, 6, 15, 20, 0), 8);
        assert_eq!(locate(&window, at(2024, 6, 16, 0, 5), config), None);
    }

    #[test]
    fn proportional_offset_interpolates_inside_a_period() {
        let config = Scale::Hours.config();
        let window = periods(Scale::Hours, at(2024, 6, 15, 12, 0), 16);
        let px = proportional_pixel_offset(&window, at(2024, 6, 15, 13, 21), config)
            .within()
            .expect("inside window");
        assert_relative_eq!(px, (5.0 + 6.0 / 15.0) * config.width, epsilon = 1e-3);
    }

    #[test]
    fn proportional_offset_flags_dates_outside_the_window() {
        let config = Scale::Month.config();
        let window = periods(Scale::Month, at(2024, 6, 1, 0, 0), 30);

        let before = proportional_pixel_offset(&window, at(2024, 5, 31, 0, 0), config);
        let after = proportional_pixel_offset(&window, at(2024, 7, 1, 0, 0), config);
        assert_eq!(before, Placement::BeforeWindow);
        assert_eq!(after, Placement::AfterWindow);
        assert_eq!(before.clamped(window.len(), config), 0.0);
        assert_eq!(after.clamped(window.len(), config), 29.0 * config.width);
        assert_eq!(
            proportional_pixel_offset(&window, at(2024, 6, 30, 0, 0), config),
            Placement::Within(29.0 * config.width)
        );
    }

    #[test]
    fn empty_window_places_everything_before() {
        let config = Scale::Day.config();
        assert_eq!(
            proportional_pixel_offset(&[], at(2024, 6, 15, 0, 0), config),
            Placement::BeforeWindow
        );
        assert_eq!(locate(&[], at(2024, 6, 15, 0, 0), config), None);
    }

    #[test]
    fn month_periods_interpolate_by_real_month_length() {
        let config = Scale::FiveYears.config();
        let window = periods(Scale::FiveYears, at(2024, 1, 1, 0, 0), 12);
        // Feb 2024 has 29 days; the 15th at noon is 14.5 days in.
        let px = proportional_pixel_offset(&window, at(2024, 2, 15, 12, 0), config)
            .within()
            .expect("inside window");
        assert_relative_eq!(px, (1.0 + 14.5 / 29.0) * config.width, epsilon = 1e-3);
    }

    #[test]
    fn pixel_to_date_inverts_proportional_offset() {
        let config = Scale::Day.config();
        let window = periods(Scale::Day, at(2024, 6, 15, 0, 0), 48);
        let date = at(2024, 6, 15, 17, 30);
        let px = proportional_pixel_offset(&window, date, config)
            .within()
            .expect("inside window");
        assert_eq!(pixel_to_date(&window, px, config), Some(date));
        assert_eq!(pixel_to_date(&window, -1.0, config), None);
        assert_eq!(pixel_to_date(&window, 48.0 * config.width, config), None);
    }
}
