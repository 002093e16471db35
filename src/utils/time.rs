use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;

/// Current date in the given timezone
pub fn today_in(tz: &Tz) -> NaiveDate {
    Utc::now().with_timezone(tz).date_naive()
}

/// Render an event start/end for display.
///
/// Timed values are converted to `tz` and shown as `YYYY-MM-DD HH:MM`; all-day
/// dates are shown as-is. Anything unparseable is returned unchanged.
pub fn format_event_time(value: &str, tz: &Tz) -> String {
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return dt.with_timezone(tz).format("%Y-%m-%d %H:%M").to_string();
    }

    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return format!("{} (all day)", date.format("%Y-%m-%d"));
    }

    value.to_string()
}
