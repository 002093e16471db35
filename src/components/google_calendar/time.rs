use chrono::{DateTime, Datelike, Days, Duration, LocalResult, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;
use std::fmt;

/// Monday–Sunday bounds used to scope a single listing call.
///
/// `start` and `end` are wall-clock times in `tz`; the listing bounds are
/// the matching instants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeekWindow {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub tz: Tz,
}

impl WeekWindow {
    /// Instant of Monday 00:00 in the window's timezone
    pub fn start_instant(&self) -> DateTime<Utc> {
        localize(&self.tz, self.start, true)
    }

    /// Instant of Sunday 23:59:59.999999 in the window's timezone
    pub fn end_instant(&self) -> DateTime<Utc> {
        localize(&self.tz, self.end, false)
    }

    /// Lower bound in the `timeMin` format
    pub fn time_min(&self) -> String {
        format_bound(&self.start_instant())
    }

    /// Upper bound in the `timeMax` format
    pub fn time_max(&self) -> String {
        format_bound(&self.end_instant())
    }

    /// Monday of the week
    pub fn monday(&self) -> NaiveDate {
        self.start.date()
    }

    /// Whether a local date falls inside the week
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start.date() <= date && date <= self.end.date()
    }

    /// Whether an instant falls inside the week
    pub fn contains_instant(&self, instant: &DateTime<Utc>) -> bool {
        self.start_instant() <= *instant && *instant <= self.end_instant()
    }
}

impl fmt::Display for WeekWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{} ({})", self.start.date(), self.end.date(), self.tz)
    }
}

fn format_bound(dt: &DateTime<Utc>) -> String {
    dt.format("%Y-%m-%dT%H:%M:%S%.6fZ").to_string()
}

// Resolve a wall-clock time to an instant. Ambiguous times take the earlier
// reading for a lower bound and the later one for an upper bound. Times inside
// a DST gap move past the gap.
fn localize(tz: &Tz, local: NaiveDateTime, lower: bool) -> DateTime<Utc> {
    match tz.from_local_datetime(&local) {
        LocalResult::Single(dt) => dt.with_timezone(&Utc),
        LocalResult::Ambiguous(early, late) => {
            if lower {
                early.with_timezone(&Utc)
            } else {
                late.with_timezone(&Utc)
            }
        }
        LocalResult::None => {
            let shifted = local + Duration::hours(1);
            match tz.from_local_datetime(&shifted).earliest() {
                Some(dt) => dt.with_timezone(&Utc),
                None => Utc.from_utc_datetime(&local),
            }
        }
    }
}

/// Week (Monday 00:00:00 to Sunday 23:59:59.999999 in `tz`) containing `date`
pub fn week_range(date: NaiveDate, tz: Tz) -> WeekWindow {
    let monday = date
        .checked_sub_days(Days::new(date.weekday().num_days_from_monday() as u64))
        .unwrap_or(date);

    let start = monday.and_time(NaiveTime::MIN);
    let end = start
        .checked_add_signed(Duration::days(7) - Duration::microseconds(1))
        .unwrap_or(start);

    WeekWindow { start, end, tz }
}

/// Dates whose weeks cover `start..=end`, stepping seven days from `start`
pub fn range_steps(start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
    let mut steps = Vec::new();
    let mut current = Some(start);

    while let Some(date) = current {
        if date > end {
            break;
        }
        steps.push(date);
        current = date.checked_add_days(Days::new(7));
    }

    steps
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Weekday;
    use chrono_tz::{America, Asia, Europe, UTC};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_week_range_midweek() {
        // Wednesday, 2023-01-04
        let window = week_range(date(2023, 1, 4), UTC);
        assert_eq!(window.monday(), date(2023, 1, 2));
        assert_eq!(window.end.date(), date(2023, 1, 8));
        assert_eq!(window.time_min(), "2023-01-02T00:00:00.000000Z");
        assert_eq!(window.time_max(), "2023-01-08T23:59:59.999999Z");
    }

    #[test]
    fn test_week_range_on_bounds() {
        // Monday and Sunday map to the same week
        assert_eq!(week_range(date(2023, 1, 2), UTC), week_range(date(2023, 1, 8), UTC));
        assert_ne!(week_range(date(2023, 1, 8), UTC), week_range(date(2023, 1, 9), UTC));
    }

    #[test]
    fn test_week_range_across_boundaries() {
        // Year boundary: Sunday 2023-01-01 belongs to the week starting 2022-12-26
        let window = week_range(date(2023, 1, 1), UTC);
        assert_eq!(window.monday(), date(2022, 12, 26));
        assert_eq!(window.end.date(), date(2023, 1, 1));

        // Leap day
        let window = week_range(date(2024, 2, 29), UTC);
        assert_eq!(window.monday(), date(2024, 2, 26));
        assert_eq!(window.end.date(), date(2024, 3, 3));

        // Month boundary
        let window = week_range(date(2024, 5, 1), UTC);
        assert_eq!(window.monday(), date(2024, 4, 29));
    }

    #[test]
    fn test_week_range_properties() {
        let mut day = date(2023, 12, 1);
        while day <= date(2025, 3, 31) {
            let window = week_range(day, Europe::Helsinki);
            assert_eq!(window.start.weekday(), Weekday::Mon);
            assert_eq!(window.end.weekday(), Weekday::Sun);
            assert_eq!((window.end.date() - window.start.date()).num_days(), 6);
            assert!(window.contains(day));
            day = day.succ_opt().unwrap();
        }
    }

    #[test]
    fn test_week_bounds_follow_timezone() {
        // Tokyo is UTC+9, so Monday midnight is Sunday 15:00 UTC
        let window = week_range(date(2024, 3, 6), Asia::Tokyo);
        assert_eq!(window.monday(), date(2024, 3, 4));
        assert_eq!(window.time_min(), "2024-03-03T15:00:00.000000Z");
        assert_eq!(window.time_max(), "2024-03-10T14:59:59.999999Z");

        // New York is UTC-5 before its DST switch on 2024-03-10
        let window = week_range(date(2024, 3, 6), America::New_York);
        assert_eq!(window.time_min(), "2024-03-04T05:00:00.000000Z");
        assert_eq!(window.time_max(), "2024-03-11T03:59:59.999999Z");

        let monday_8am_tokyo = "2024-03-04T08:00:00+09:00".parse::<DateTime<Utc>>().unwrap();
        let next_monday_8am_tokyo = "2024-03-11T08:00:00+09:00".parse::<DateTime<Utc>>().unwrap();
        let tokyo = week_range(date(2024, 3, 6), Asia::Tokyo);
        assert!(tokyo.contains_instant(&monday_8am_tokyo));
        assert!(!tokyo.contains_instant(&next_monday_8am_tokyo));
    }

    #[test]
    fn test_localize_inside_dst_gap() {
        // Santiago springs forward at local midnight on 2024-09-08
        let gap = date(2024, 9, 8).and_time(NaiveTime::MIN);
        let tz = America::Santiago;
        assert_eq!(
            format_bound(&localize(&tz, gap, true)),
            "2024-09-08T04:00:00.000000Z"
        );
    }

    #[test]
    fn test_range_steps() {
        let steps = range_steps(date(2024, 1, 3), date(2024, 1, 20));
        assert_eq!(steps, vec![date(2024, 1, 3), date(2024, 1, 10), date(2024, 1, 17)]);

        // A single day range still covers one week
        assert_eq!(range_steps(date(2024, 1, 3), date(2024, 1, 3)), vec![date(2024, 1, 3)]);

        // Reversed range covers nothing
        assert!(range_steps(date(2024, 1, 10), date(2024, 1, 3)).is_empty());
    }
}
