use chrono::{NaiveDate, NaiveDateTime};
use gantt_timeline::timeline::coords::{self, Placement};
use gantt_timeline::timeline::{positioner, Scale, TimelineWindow, WindowConfig};
use gantt_timeline::TaskInterval;
use proptest::prelude::*;

fn any_scale() -> impl Strategy<Value = Scale> {
    prop::sample::select(Scale::ALL.to_vec())
}

fn any_date() -> impl Strategy<Value = NaiveDateTime> {
    (1950i32..2150, 1u32..=12, 1u32..=28, 0u32..24, 0u32..60).prop_map(|(y, m, d, h, min)| {
        NaiveDate::from_ymd_opt(y, m, d)
            .and_then(|date| date.and_hms_opt(h, min, 0))
            .expect("valid generated date")
    })
}

fn build(scale: Scale, center: NaiveDateTime) -> TimelineWindow {
    TimelineWindow::initialize_around(scale, center, &WindowConfig::default(), 800.0)
        .expect("build window")
        .window
}

proptest! {
    #[test]
    fn built_window_is_contiguous_and_centred(scale in any_scale(), center in any_date()) {
        let window = build(scale, center);
        let config = scale.config();

        prop_assert_eq!(window.len(), 200);
        prop_assert!(window.is_contiguous());
        let middle = window.periods()[100];
        prop_assert!(middle <= center);
        prop_assert!(config.next(middle).expect("next period") > center);
    }

    #[test]
    fn shifting_right_then_left_restores_periods(
        scale in any_scale(),
        center in any_date(),
        amount in 1usize..=100,
    ) {
        let window = build(scale, center);
        let right = window.shift_right(amount).expect("shift right").window;
        prop_assert!(right.is_contiguous());
        prop_assert_eq!(right.len(), window.len());
        prop_assert_eq!(right.virtual_offset(), amount as i64);

        let back = right.shift_left(amount).expect("shift left").window;
        prop_assert!(back.is_contiguous());
        prop_assert_eq!(back.periods(), window.periods());
        prop_assert_eq!(back.virtual_offset(), 0);
        prop_assert!(back.generation() > window.generation());
    }

    #[test]
    fn every_period_locates_to_its_own_index(scale in any_scale(), center in any_date()) {
        let window = build(scale, center);
        let config = window.config();
        for (index, &period) in window.periods().iter().enumerate() {
            prop_assert_eq!(coords::locate(window.periods(), period, config), Some(index));
        }
    }

    #[test]
    fn proportional_offset_is_monotonic_and_bounded(
        scale in any_scale(),
        center in any_date(),
        a in 0.0f64..1.0,
        b in 0.0f64..1.0,
    ) {
        let window = build(scale, center);
        let (first, last) = (window.first().expect("first"), window.last().expect("last"));
        let span = (last - first).num_seconds() as f64;
        let pick = |t: f64| first + chrono::Duration::seconds((span * t) as i64);
        let (early, late) = if a <= b { (pick(a), pick(b)) } else { (pick(b), pick(a)) };

        let config = window.config();
        let max = coords::pixel_offset(window.len() - 1, config);
        let Placement::Within(early_px) = coords::proportional_pixel_offset(window.periods(), early, config) else {
            return Err(TestCaseError::fail("early date outside window"));
        };
        let Placement::Within(late_px) = coords::proportional_pixel_offset(window.periods(), late, config) else {
            return Err(TestCaseError::fail("late date outside window"));
        };

        prop_assert!(early_px <= late_px);
        prop_assert!(early_px >= 0.0);
        prop_assert!(late_px <= max);
    }

    #[test]
    fn tasks_outside_the_window_are_culled(
        scale in any_scale(),
        center in any_date(),
        gap in 1i64..10_000,
        length in 0i64..10_000,
    ) {
        let window = build(scale, center);
        let (first, last) = (window.first().expect("first"), window.last().expect("last"));
        let minutes = chrono::Duration::minutes;

        let before = TaskInterval::new("before", first - minutes(gap + length), first - minutes(gap));
        let after = TaskInterval::new("after", last + minutes(gap), last + minutes(gap + length));
        prop_assert!(positioner::task_geometry(&window, &before).is_none());
        prop_assert!(positioner::task_geometry(&window, &after).is_none());
    }

    #[test]
    fn visible_task_geometry_stays_inside_the_window(
        scale in any_scale(),
        center in any_date(),
        a in -0.5f64..1.5,
        b in -0.5f64..1.5,
    ) {
        let window = build(scale, center);
        let (first, last) = (window.first().expect("first"), window.last().expect("last"));
        let span = (last - first).num_seconds() as f64;
        let pick = |t: f64| first + chrono::Duration::seconds((span * t) as i64);
        let task = TaskInterval::new("task", pick(a.min(b)), pick(a.max(b)));

        if let Some(geometry) = positioner::task_geometry(&window, &task) {
            prop_assert!(geometry.left_px >= 0.0);
            prop_assert!(geometry.width_px >= 0.0);
            prop_assert!(geometry.right_px() <= window.total_width_px() + 1e-3);
        }
    }
}
