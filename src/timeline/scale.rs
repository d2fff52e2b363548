use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Duration, Months, NaiveDate, NaiveDateTime, NaiveTime, Timelike, Weekday};
use serde::{Deserialize, Serialize};

use crate::error::TimelineError;

/// Controls what granularity the timeline displays.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Scale {
    Hours,
    Day,
    Week,
    BiWeek,
    #[default]
    Month,
    Quarter,
    Year,
    #[serde(rename = "5-years")]
    FiveYears,
}

impl Scale {
    pub const ALL: [Scale; 8] = [
        Scale::Hours,
        Scale::Day,
        Scale::Week,
        Scale::BiWeek,
        Scale::Month,
        Scale::Quarter,
        Scale::Year,
        Scale::FiveYears,
    ];

    /// Period semantics for this scale.
    pub fn config(self) -> &'static ScaleConfig {
        match self {
            Scale::Hours => &HOURS,
            Scale::Day => &DAY,
            Scale::Week => &WEEK,
            Scale::BiWeek => &BI_WEEK,
            Scale::Month => &MONTH,
            Scale::Quarter => &QUARTER,
            Scale::Year => &YEAR,
            Scale::FiveYears => &FIVE_YEARS,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Scale::Hours => "hours",
            Scale::Day => "day",
            Scale::Week => "week",
            Scale::BiWeek => "bi-week",
            Scale::Month => "month",
            Scale::Quarter => "quarter",
            Scale::Year => "year",
            Scale::FiveYears => "5-years",
        }
    }

    /// Human label for menus and toolbars.
    pub fn title(self) -> &'static str {
        match self {
            Scale::Hours => "Hours",
            Scale::Day => "Day",
            Scale::Week => "Week",
            Scale::BiWeek => "2 Weeks",
            Scale::Month => "Month",
            Scale::Quarter => "Quarter",
            Scale::Year => "Year",
            Scale::FiveYears => "5 Years",
        }
    }
}

impl fmt::Display for Scale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Scale {
    type Err = TimelineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Scale::ALL
            .into_iter()
            .find(|scale| scale.as_str() == s.trim())
            .ok_or_else(|| TimelineError::InvalidConfig(format!("unknown scale '{s}'")))
    }
}

/// Length of one period.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Increment {
    Minutes(u32),
    Hours(u32),
    Days(u32),
    Months(u32),
}

impl Increment {
    /// Step `date` forward (or backward for negative `steps`) by whole periods.
    ///
    /// Returns `None` when the result falls outside chrono's representable range.
    pub fn advance(self, date: NaiveDateTime, steps: i64) -> Option<NaiveDateTime> {
        match self {
            Increment::Minutes(n) => {
                date.checked_add_signed(Duration::try_minutes(steps.checked_mul(i64::from(n))?)?)
            }
            Increment::Hours(n) => {
                date.checked_add_signed(Duration::try_hours(steps.checked_mul(i64::from(n))?)?)
            }
            Increment::Days(n) => {
                date.checked_add_signed(Duration::try_days(steps.checked_mul(i64::from(n))?)?)
            }
            Increment::Months(n) => {
                let months = steps.checked_mul(i64::from(n))?;
                let span = Months::new(u32::try_from(months.unsigned_abs()).ok()?);
                if months >= 0 {
                    date.checked_add_months(span)
                } else {
                    date.checked_sub_months(span)
                }
            }
        }
    }
}

/// Visual weight of a grid line / period cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MarkKind {
    Major,
    Minor,
    Weekend,
}

/// Everything a scale needs to lay out and label its periods.
///
/// One static value per [`Scale`]; callers pick it once via [`Scale::config`].
#[derive(Debug)]
pub struct ScaleConfig {
    pub scale: Scale,
    /// Pixel width of one period.
    pub width: f32,
    /// chrono format for the per-period label.
    pub label_format: &'static str,
    /// chrono format for group headers (the row above period labels).
    pub header_format: &'static str,
    /// chrono format for a single period's full description (tooltips).
    pub period_header_format: &'static str,
    pub increment: Increment,
    pub classify: fn(NaiveDateTime) -> MarkKind,
    /// `(period, target)`: target lands on this period at the scale's resolution.
    pub is_exact_match: fn(NaiveDateTime, NaiveDateTime) -> bool,
    /// `(period, target)`: coarse equality used by the nearest-period fallback.
    pub is_same_bucket: fn(NaiveDateTime, NaiveDateTime) -> bool,
    pub align: fn(NaiveDateTime) -> NaiveDateTime,
    pub group_key: fn(NaiveDateTime) -> String,
    pub shows_group_header: fn(NaiveDateTime) -> bool,
}

impl ScaleConfig {
    pub fn label(&self, date: NaiveDateTime) -> String {
        date.format(self.label_format).to_string()
    }

    pub fn header(&self, date: NaiveDateTime) -> String {
        date.format(self.header_format).to_string()
    }

    pub fn period_header(&self, date: NaiveDateTime) -> String {
        date.format(self.period_header_format).to_string()
    }

    /// The period immediately after `date`, if representable.
    pub fn next(&self, date: NaiveDateTime) -> Option<NaiveDateTime> {
        self.increment.advance(date, 1)
    }
}

static HOURS: ScaleConfig = ScaleConfig {
    scale: Scale::Hours,
    width: 48.0,
    label_format: "%H:%M",
    header_format: "%a %d %b %Y",
    period_header_format: "%d/%m/%Y %H:%M",
    increment: Increment::Minutes(15),
    classify: quarter_hour_mark,
    is_exact_match: same_minute,
    is_same_bucket: same_day,
    align: align_quarter_hour,
    group_key: day_key,
    shows_group_header: is_midnight,
};

static DAY: ScaleConfig = ScaleConfig {
    scale: Scale::Day,
    width: 48.0,
    label_format: "%H:00",
    header_format: "%A %d %B %Y",
    period_header_format: "%d/%m/%Y %H:00",
    increment: Increment::Hours(1),
    classify: always_major,
    is_exact_match: same_hour,
    is_same_bucket: same_day,
    align: align_hour,
    group_key: day_key,
    shows_group_header: is_midnight,
};

static WEEK: ScaleConfig = ScaleConfig {
    scale: Scale::Week,
    width: 120.0,
    label_format: "%a %d",
    header_format: "%B %Y",
    period_header_format: "%A %d/%m/%Y",
    increment: Increment::Days(1),
    classify: weekend_mark,
    is_exact_match: same_day,
    is_same_bucket: same_month,
    align: align_day,
    group_key: month_key,
    shows_group_header: is_first_of_month,
};

static BI_WEEK: ScaleConfig = ScaleConfig {
    scale: Scale::BiWeek,
    width: 64.0,
    label_format: "%a %d",
    header_format: "%B %Y",
    period_header_format: "%A %d/%m/%Y",
    increment: Increment::Days(1),
    classify: weekend_mark,
    is_exact_match: same_day,
    is_same_bucket: same_month,
    align: align_day,
    group_key: month_key,
    shows_group_header: is_first_of_month,
};

static MONTH: ScaleConfig = ScaleConfig {
    scale: Scale::Month,
    width: 36.0,
    label_format: "%d",
    header_format: "%B %Y",
    period_header_format: "%A %d/%m/%Y",
    increment: Increment::Days(1),
    classify: weekend_mark,
    is_exact_match: same_day,
    is_same_bucket: same_month,
    align: align_day,
    group_key: month_key,
    shows_group_header: is_first_of_month,
};

static QUARTER: ScaleConfig = ScaleConfig {
    scale: Scale::Quarter,
    width: 72.0,
    label_format: "W%V",
    header_format: "%B %Y",
    period_header_format: "Week %V, %G",
    increment: Increment::Days(7),
    classify: always_major,
    is_exact_match: same_iso_week,
    is_same_bucket: same_month,
    align: align_week,
    group_key: month_key,
    shows_group_header: is_first_week_of_month,
};

static YEAR: ScaleConfig = ScaleConfig {
    scale: Scale::Year,
    width: 36.0,
    label_format: "%V",
    header_format: "%Y",
    period_header_format: "Week %V, %G",
    increment: Increment::Days(7),
    classify: always_major,
    is_exact_match: same_iso_week,
    is_same_bucket: same_month,
    align: align_week,
    group_key: year_key,
    shows_group_header: is_first_week_of_year,
};

static FIVE_YEARS: ScaleConfig = ScaleConfig {
    scale: Scale::FiveYears,
    width: 40.0,
    label_format: "%b",
    header_format: "%Y",
    period_header_format: "%B %Y",
    increment: Increment::Months(1),
    classify: january_mark,
    is_exact_match: same_month,
    is_same_bucket: same_year,
    align: align_month,
    group_key: year_key,
    shows_group_header: is_january,
};

// ── Alignment ────────────────────────────────────────────────────────────────

fn at_midnight(date: NaiveDate) -> NaiveDateTime {
    date.and_time(NaiveTime::MIN)
}

fn align_quarter_hour(date: NaiveDateTime) -> NaiveDateTime {
    let minute = date.minute() - date.minute() % 15;
    date.date()
        .and_hms_opt(date.hour(), minute, 0)
        .unwrap_or(date)
}

fn align_hour(date: NaiveDateTime) -> NaiveDateTime {
    date.date().and_hms_opt(date.hour(), 0, 0).unwrap_or(date)
}

fn align_day(date: NaiveDateTime) -> NaiveDateTime {
    at_midnight(date.date())
}

fn align_week(date: NaiveDateTime) -> NaiveDateTime {
    at_midnight(date.date().week(Weekday::Mon).first_day())
}

fn align_month(date: NaiveDateTime) -> NaiveDateTime {
    at_midnight(date.date().with_day(1).unwrap_or(date.date()))
}

// ── Marks ────────────────────────────────────────────────────────────────────

fn always_major(_: NaiveDateTime) -> MarkKind {
    MarkKind::Major
}

fn quarter_hour_mark(date: NaiveDateTime) -> MarkKind {
    if date.minute() == 0 {
        MarkKind::Major
    } else {
        MarkKind::Minor
    }
}

fn weekend_mark(date: NaiveDateTime) -> MarkKind {
    if date.weekday().num_days_from_monday() >= 5 {
        MarkKind::Weekend
    } else {
        MarkKind::Major
    }
}

fn january_mark(date: NaiveDateTime) -> MarkKind {
    if date.month() == 1 {
        MarkKind::Major
    } else {
        MarkKind::Minor
    }
}

// ── Equality predicates ──────────────────────────────────────────────────────

fn same_minute(period: NaiveDateTime, target: NaiveDateTime) -> bool {
    same_hour(period, target) && period.minute() == target.minute()
}

fn same_hour(period: NaiveDateTime, target: NaiveDateTime) -> bool {
    same_day(period, target) && period.hour() == target.hour()
}

fn same_day(period: NaiveDateTime, target: NaiveDateTime) -> bool {
    period.date() == target.date()
}

fn same_iso_week(period: NaiveDateTime, target: NaiveDateTime) -> bool {
    period.iso_week() == target.iso_week()
}

fn same_month(period: NaiveDateTime, target: NaiveDateTime) -> bool {
    same_year(period, target) && period.month() == target.month()
}

fn same_year(period: NaiveDateTime, target: NaiveDateTime) -> bool {
    period.year() == target.year()
}

// ── Grouping ─────────────────────────────────────────────────────────────────

fn day_key(date: NaiveDateTime) -> String {
    date.format("%Y-%m-%d").to_string()
}

fn month_key(date: NaiveDateTime) -> String {
    date.format("%Y-%m").to_string()
}

fn year_key(date: NaiveDateTime) -> String {
    date.format("%Y").to_string()
}

fn is_midnight(date: NaiveDateTime) -> bool {
    date.hour() == 0 && date.minute() == 0
}

fn is_first_of_month(date: NaiveDateTime) -> bool {
    date.day() == 1
}

fn is_first_week_of_month(date: NaiveDateTime) -> bool {
    date.day() <= 7
}

fn is_first_week_of_year(date: NaiveDateTime) -> bool {
    date.ordinal() <= 7
}

fn is_january(date: NaiveDateTime) -> bool {
    date.month() == 1
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .and_then(|date| date.and_hms_opt(h, min, 0))
            .expect("valid test date")
    }

    #[test]
    fn every_scale_has_positive_width_and_matching_tag() {
        for scale in Scale::ALL {
            let config = scale.config();
            assert_eq!(config.scale, scale);
            assert!(config.width > 0.0, "{scale} has no width");
        }
    }

    #[test]
    fn scale_names_round_trip_through_from_str_and_serde() {
        for scale in Scale::ALL {
            assert_eq!(scale.as_str().parse::<Scale>().expect("known scale"), scale);
            let json = serde_json::to_string(&scale).expect("serialize");
            assert_eq!(json, format!("\"{}\"", scale.as_str()));
        }
        assert!("fortnight".parse::<Scale>().is_err());
    }

    #[test]
    fn alignment_snaps_to_period_boundaries() {
        let date = at(2024, 6, 12, 13, 21); // Wednesday
        assert_eq!((Scale::Hours.config().align)(date), at(2024, 6, 12, 13, 15));
        assert_eq!((Scale::Day.config().align)(date), at(2024, 6, 12, 13, 0));
        assert_eq!((Scale::Month.config().align)(date), at(2024, 6, 12, 0, 0));
        assert_eq!((Scale::Quarter.config().align)(date), at(2024, 6, 10, 0, 0));
        assert_eq!((Scale::FiveYears.config().align)(date), at(2024, 6, 1, 0, 0));
    }

    #[test]
    fn marks_follow_the_scale_table() {
        let hours = Scale::Hours.config();
        assert_eq!((hours.classify)(at(2024, 6, 15, 13, 0)), MarkKind::Major);
        assert_eq!((hours.classify)(at(2024, 6, 15, 13, 45)), MarkKind::Minor);

        let month = Scale::Month.config();
        assert_eq!((month.classify)(at(2024, 6, 15, 0, 0)), MarkKind::Weekend);
        assert_eq!((month.classify)(at(2024, 6, 17, 0, 0)), MarkKind::Major);

        let five = Scale::FiveYears.config();
        assert_eq!((five.classify)(at(2025, 1, 1, 0, 0)), MarkKind::Major);
        assert_eq!((five.classify)(at(2025, 2, 1, 0, 0)), MarkKind::Minor);

        assert_eq!((Scale::Day.config().classify)(at(2024, 6, 15, 3, 0)), MarkKind::Major);
        assert_eq!((Scale::Year.config().classify)(at(2024, 6, 15, 0, 0)), MarkKind::Major);
    }

    #[test]
    fn month_increment_handles_negative_steps_and_year_rollover() {
        let start = at(2024, 1, 1, 0, 0);
        let inc = Scale::FiveYears.config().increment;
        assert_eq!(inc.advance(start, -1), Some(at(2023, 12, 1, 0, 0)));
        assert_eq!(inc.advance(start, 13), Some(at(2025, 2, 1, 0, 0)));
    }

    #[test]
    fn labels_shorten_as_granularity_coarsens() {
        let date = at(2024, 6, 15, 13, 30);
        assert_eq!(Scale::Hours.config().label(date), "13:30");
        assert_eq!(Scale::Day.config().label(date), "13:00");
        assert_eq!(Scale::Month.config().label(date), "15");
        assert_eq!(Scale::Quarter.config().label(date), "W24");
        assert_eq!(Scale::FiveYears.config().label(date), "Jun");
    }

    #[test]
    fn exact_match_is_stricter_than_same_bucket() {
        let hours = Scale::Hours.config();
        let period = at(2024, 6, 15, 13, 15);
        let target = at(2024, 6, 15, 13, 21);
        assert!(!(hours.is_exact_match)(period, target));
        assert!((hours.is_same_bucket)(period, target));
        assert!((hours.is_exact_match)(period, period));
    }
}
