use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use tracing::warn;

const DAY_MS: i64 = 1000 * 60 * 60 * 24;
const YEAR_MS: i64 = DAY_MS * 365;
const MONTH_MS: i64 = DAY_MS * 30;

pub const UNKNOWN_DURATION: &str = "N/A";

/// Tenure between the joining date and the first day of the payslip month, rendered as
/// `"<Y> Year(s) <M> Month(s)"`.
///
/// Years are 365 days and months 30 days, both floored, over the absolute difference.
/// An unparseable date yields `"N/A"` and is only logged.
pub fn calculate_duration(date_joining: &str, year: &str, month: &str) -> String {
    let Some(joined) = parse_joining_date(date_joining) else {
        warn!(date_joining, "Invalid joining date, duration set to N/A");
        return UNKNOWN_DURATION.to_string();
    };

    let Some(period_start) = first_of_month(year, month) else {
        warn!(year, month, "Invalid payslip period, duration set to N/A");
        return UNKNOWN_DURATION.to_string();
    };

    let diff = (period_start - joined).num_milliseconds().abs();
    let years = diff / YEAR_MS;
    let months = (diff % YEAR_MS) / MONTH_MS;

    format!(
        "{} Year{} {} Month{}",
        years,
        plural(years),
        months,
        plural(months)
    )
}

fn plural(n: i64) -> &'static str {
    if n == 1 { "" } else { "s" }
}

fn parse_joining_date(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(dt.and_utc());
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
}

fn first_of_month(year: &str, month: &str) -> Option<DateTime<Utc>> {
    let year: i32 = year.parse().ok()?;
    let month: u32 = month.parse().ok()?;

    NaiveDate::from_ymd_opt(year, month, 1)?
        .and_hms_opt(0, 0, 0)
        .map(|dt| dt.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_calculate_duration() {
        assert_eq!(calculate_duration("2021-06-15", "2024", "04"), "2 Years 9 Months");
        assert_eq!(calculate_duration("2024-01-01", "2024", "04"), "0 Years 3 Months");
    }

    #[test]
    fn singular_units() {
        // 2023-04-01 -> 2024-04-01 spans 366 days
        assert_eq!(calculate_duration("2023-04-01", "2024", "04"), "1 Year 0 Months");
        assert_eq!(calculate_duration("2024-03-01", "2024", "04"), "0 Years 1 Month");
    }

    #[test]
    fn joining_after_period_uses_absolute_difference() {
        assert_eq!(calculate_duration("2024-05-01", "2024", "04"), "0 Years 1 Month");
    }

    #[test]
    fn accepts_timestamps() {
        assert_eq!(calculate_duration("2023-04-01T00:00:00Z", "2024", "04"), "1 Year 0 Months");
        assert_eq!(calculate_duration("2023-04-01T00:00:00", "2024", "04"), "1 Year 0 Months");
    }

    #[test]
    fn unparseable_dates_are_not_errors() {
        assert_eq!(calculate_duration("not-a-date", "2024", "04"), "N/A");
        assert_eq!(calculate_duration("15/06/2021", "2024", "04"), "N/A");
        assert_eq!(calculate_duration("", "2024", "04"), "N/A");
        assert_eq!(calculate_duration("2021-06-15", "2024", "13"), "N/A");
    }
}
