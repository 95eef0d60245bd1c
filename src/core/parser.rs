use std::io::Cursor;

use calamine::{Data, Reader, Xlsx};
use chrono::{Datelike, NaiveDate, NaiveDateTime, Weekday};
use tracing::debug;

use crate::core::timecalc;
use crate::error::{AppError, Result};
use crate::model::{AttendanceCandidate, AttendanceStatus};

/// One raw spreadsheet row before classification. Columns beyond the first
/// four are ignored.
#[derive(Debug, Default, Clone)]
pub struct RawRow {
    pub employee_name: Option<String>,
    pub date: Option<NaiveDate>,
    pub in_time: Option<String>,
    pub out_time: Option<String>,
}

/// Decodes a whole workbook into attendance candidates. The first row is a
/// header and is skipped; structurally unusable rows (no name, bad date) are
/// dropped without failing the upload.
pub fn parse_workbook(bytes: &[u8]) -> Result<Vec<AttendanceCandidate>> {
    let mut workbook = Xlsx::new(Cursor::new(bytes))
        .map_err(|e| AppError::Workbook(format!("failed to open workbook: {e}")))?;

    let sheet_name = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or_else(|| AppError::Workbook("no sheets found in workbook".into()))?;

    let range = workbook
        .worksheet_range(&sheet_name)
        .map_err(|e| AppError::Workbook(format!("failed to read sheet {sheet_name}: {e}")))?;

    let mut candidates = Vec::new();
    for (row_number, row) in range.rows().enumerate().skip(1) {
        let raw = RawRow {
            employee_name: row.first().and_then(cell_text),
            date: row.get(1).and_then(cell_date),
            in_time: row.get(2).and_then(cell_time),
            out_time: row.get(3).and_then(cell_time),
        };

        match parse_row(raw) {
            Some(candidate) => candidates.push(candidate),
            None => debug!(row = row_number + 1, "skipping unusable row"),
        }
    }

    Ok(candidates)
}

/// Classifies one raw row into an attendance candidate, or nothing if the
/// row has no employee name or no parseable date.
pub fn parse_row(raw: RawRow) -> Option<AttendanceCandidate> {
    let employee_name = raw.employee_name?;
    let date = raw.date?;

    let weekday = date.weekday();
    let day_of_week = timecalc::day_name(weekday).to_string();
    let month_year = timecalc::month_year(date);

    let mut is_leave = false;
    let mut worked_hours = 0.0;
    let status;

    if weekday == Weekday::Sun {
        // Sunday is a holiday regardless of any recorded punches.
        status = AttendanceStatus::Holiday;
    } else if weekday == Weekday::Sat {
        // Saturday stays a weekend day but keeps its half-day baseline.
        status = AttendanceStatus::Weekend;
    } else if raw.in_time.is_none() || raw.out_time.is_none() {
        is_leave = true;
        status = AttendanceStatus::Leave;
    } else {
        worked_hours = timecalc::worked_hours(raw.in_time.as_deref(), raw.out_time.as_deref());
        if worked_hours == 0.0 {
            // A zero-duration punch counts as an implicit leave.
            is_leave = true;
            status = AttendanceStatus::Leave;
        } else {
            status = AttendanceStatus::Present;
        }
    }

    Some(AttendanceCandidate {
        employee_name,
        date,
        in_time: raw.in_time,
        out_time: raw.out_time,
        worked_hours,
        is_leave,
        is_holiday: weekday == Weekday::Sun,
        day_of_week,
        month_year,
        expected_hours: timecalc::expected_hours(weekday),
        status,
    })
}

fn cell_text(cell: &Data) -> Option<String> {
    let text = match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.trim().to_string(),
        Data::Float(f) => f.to_string(),
        Data::Int(i) => i.to_string(),
        Data::Bool(b) => b.to_string(),
        Data::DateTime(dt) => format!("{dt}"),
        Data::DateTimeIso(s) | Data::DurationIso(s) => s.clone(),
        Data::Error(e) => format!("#{e:?}"),
    };
    if text.is_empty() { None } else { Some(text) }
}

fn cell_date(cell: &Data) -> Option<NaiveDate> {
    match cell {
        Data::DateTime(dt) => {
            // calamine renders excel datetimes as "YYYY-MM-DD HH:MM:SS".
            let s = format!("{dt}");
            NaiveDateTime::parse_from_str(&s, "%Y-%m-%d %H:%M:%S%.f")
                .map(|dt| dt.date())
                .ok()
                .or_else(|| NaiveDate::parse_from_str(&s, "%Y-%m-%d").ok())
        }
        Data::DateTimeIso(s) => parse_date_text(s),
        Data::String(s) => parse_date_text(s),
        _ => None,
    }
}

fn parse_date_text(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    const FORMATS: [&str; 4] = ["%Y-%m-%d", "%d/%m/%Y", "%d-%m-%Y", "%m/%d/%Y"];
    FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
        .or_else(|| {
            NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S")
                .map(|dt| dt.date())
                .ok()
        })
}

fn cell_time(cell: &Data) -> Option<String> {
    match cell {
        Data::String(s) => {
            let s = s.trim();
            if s.is_empty() { None } else { Some(s.to_string()) }
        }
        // Excel stores a bare clock time as a fraction of a day.
        Data::Float(f) if *f >= 0.0 && *f < 1.0 => {
            let minutes = (f * 24.0 * 60.0).round() as u32;
            Some(format!("{:02}:{:02}", minutes / 60, minutes % 60))
        }
        Data::DateTime(dt) => {
            let s = format!("{dt}");
            NaiveDateTime::parse_from_str(&s, "%Y-%m-%d %H:%M:%S%.f")
                .map(|dt| dt.time().format("%H:%M").to_string())
                .ok()
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(name: &str, date: &str, in_time: Option<&str>, out_time: Option<&str>) -> RawRow {
        RawRow {
            employee_name: Some(name.to_string()),
            date: NaiveDate::parse_from_str(date, "%Y-%m-%d").ok(),
            in_time: in_time.map(str::to_string),
            out_time: out_time.map(str::to_string),
        }
    }

    #[test]
    fn monday_with_full_punches_is_present() {
        let c = parse_row(raw("Jane Doe", "2024-03-04", Some("09:00"), Some("17:30"))).unwrap();
        assert_eq!(c.status, AttendanceStatus::Present);
        assert_eq!(c.worked_hours, 8.5);
        assert_eq!(c.expected_hours, 8.5);
        assert_eq!(c.day_of_week, "Monday");
        assert_eq!(c.month_year, "2024-03");
        assert!(!c.is_leave);
        assert!(!c.is_holiday);
    }

    #[test]
    fn sunday_is_holiday_not_leave() {
        let c = parse_row(raw("Jane Doe", "2024-03-03", None, None)).unwrap();
        assert_eq!(c.status, AttendanceStatus::Holiday);
        assert!(c.is_holiday);
        assert!(!c.is_leave);
        assert_eq!(c.worked_hours, 0.0);
        assert_eq!(c.expected_hours, 0.0);
    }

    #[test]
    fn saturday_is_weekend_with_half_day_baseline() {
        // Recorded punches do not count on Saturday, but the reduced
        // baseline still applies. Asymmetric with Sunday on purpose.
        let c = parse_row(raw("Jane Doe", "2024-03-02", Some("09:00"), Some("13:00"))).unwrap();
        assert_eq!(c.status, AttendanceStatus::Weekend);
        assert_eq!(c.worked_hours, 0.0);
        assert_eq!(c.expected_hours, 4.0);
        assert!(!c.is_leave);
        assert!(!c.is_holiday);
    }

    #[test]
    fn weekday_missing_punch_is_leave() {
        let c = parse_row(raw("John Smith", "2024-03-06", None, Some("17:30"))).unwrap();
        assert_eq!(c.status, AttendanceStatus::Leave);
        assert!(c.is_leave);
        assert_eq!(c.worked_hours, 0.0);
        assert_eq!(c.expected_hours, 8.5);
    }

    #[test]
    fn weekday_zero_duration_punch_is_leave() {
        let c = parse_row(raw("John Smith", "2024-03-05", Some("09:00"), Some("09:00"))).unwrap();
        assert_eq!(c.status, AttendanceStatus::Leave);
        assert!(c.is_leave);
    }

    #[test]
    fn rows_without_name_or_date_are_skipped() {
        assert!(
            parse_row(RawRow {
                employee_name: None,
                date: NaiveDate::from_ymd_opt(2024, 3, 4),
                ..Default::default()
            })
            .is_none()
        );
        assert!(
            parse_row(RawRow {
                employee_name: Some("Jane Doe".into()),
                date: None,
                ..Default::default()
            })
            .is_none()
        );
    }

    #[test]
    fn period_key_is_derived_from_the_row_date() {
        let c = parse_row(raw("Jane Doe", "2024-12-31", Some("09:00"), Some("17:30"))).unwrap();
        assert_eq!(c.month_year, "2024-12");
    }

    #[test]
    fn excel_fraction_time_cells_become_clock_strings() {
        assert_eq!(cell_time(&Data::Float(0.375)).as_deref(), Some("09:00"));
        assert_eq!(cell_time(&Data::Float(0.729_166_666_7)).as_deref(), Some("17:30"));
    }
}
