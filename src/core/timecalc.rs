use chrono::{Datelike, NaiveDate, NaiveTime, Weekday};

/// Expected-hours baseline for a standard business day.
pub const WORKDAY_HOURS: f64 = 8.5;
/// Reduced half-day baseline for Saturday.
pub const SATURDAY_HOURS: f64 = 4.0;

/// Baseline worked-hours target for a weekday. A configuration constant,
/// not a computed value.
pub fn expected_hours(weekday: Weekday) -> f64 {
    match weekday {
        Weekday::Mon | Weekday::Tue | Weekday::Wed | Weekday::Thu | Weekday::Fri => WORKDAY_HOURS,
        Weekday::Sat => SATURDAY_HOURS,
        Weekday::Sun => 0.0,
    }
}

pub fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// Full weekday name ("Monday".."Sunday").
pub fn day_name(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

/// "YYYY-MM" period key for a date.
pub fn month_year(date: NaiveDate) -> String {
    date.format("%Y-%m").to_string()
}

/// "YYYY-MM-DD" display form.
pub fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Duration in hours between two "HH:MM" clock strings, rounded to 2 decimals.
/// Missing or unparsable inputs yield 0; out-before-in clamps to 0.
pub fn worked_hours(in_time: Option<&str>, out_time: Option<&str>) -> f64 {
    let (Some(in_raw), Some(out_raw)) = (in_time, out_time) else {
        return 0.0;
    };

    let (Some(start), Some(end)) = (parse_clock(in_raw), parse_clock(out_raw)) else {
        return 0.0;
    };

    let seconds = end.signed_duration_since(start).num_seconds();
    if seconds <= 0 {
        return 0.0;
    }

    round2(seconds as f64 / 3600.0)
}

/// Round to 2 decimal places for reported figures.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn parse_clock(raw: &str) -> Option<NaiveTime> {
    let raw = raw.trim();
    NaiveTime::parse_from_str(raw, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M:%S"))
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expected_hours_follows_weekday_table() {
        assert_eq!(expected_hours(Weekday::Mon), 8.5);
        assert_eq!(expected_hours(Weekday::Fri), 8.5);
        assert_eq!(expected_hours(Weekday::Sat), 4.0);
        assert_eq!(expected_hours(Weekday::Sun), 0.0);
    }

    #[test]
    fn worked_hours_standard_day() {
        assert_eq!(worked_hours(Some("09:00"), Some("17:30")), 8.5);
    }

    #[test]
    fn worked_hours_rounds_to_two_decimals() {
        // 7h50m = 7.8333.. -> 7.83
        assert_eq!(worked_hours(Some("09:10"), Some("17:00")), 7.83);
    }

    #[test]
    fn worked_hours_clamps_negative_to_zero() {
        assert_eq!(worked_hours(Some("17:30"), Some("09:00")), 0.0);
    }

    #[test]
    fn worked_hours_missing_or_garbage_is_zero() {
        assert_eq!(worked_hours(None, Some("17:30")), 0.0);
        assert_eq!(worked_hours(Some("09:00"), None), 0.0);
        assert_eq!(worked_hours(Some("not a time"), Some("17:30")), 0.0);
    }

    #[test]
    fn worked_hours_accepts_seconds_suffix() {
        assert_eq!(worked_hours(Some("09:00:00"), Some("13:00:00")), 4.0);
    }

    #[test]
    fn weekend_detection_by_calendar_index() {
        // 2024-03-02 is a Saturday, 2024-03-03 a Sunday, 2024-03-04 a Monday.
        assert!(is_weekend(NaiveDate::from_ymd_opt(2024, 3, 2).unwrap()));
        assert!(is_weekend(NaiveDate::from_ymd_opt(2024, 3, 3).unwrap()));
        assert!(!is_weekend(NaiveDate::from_ymd_opt(2024, 3, 4).unwrap()));
    }

    #[test]
    fn calendar_projections() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 4).unwrap();
        assert_eq!(day_name(date.weekday()), "Monday");
        assert_eq!(month_year(date), "2024-03");
        assert_eq!(format_date(date), "2024-03-04");
    }
}
