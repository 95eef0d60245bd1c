use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};
use utoipa::ToSchema;

/// Day-level classification of one attendance record.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, ToSchema,
)]
pub enum AttendanceStatus {
    Present,
    Leave,
    Holiday,
    Weekend,
    Absent,
}

/// One stored entry per (employee, calendar date).
#[derive(Debug, Clone, Serialize, ToSchema)]
#[schema(
    example = json!({
        "id": 1,
        "employee_id": 7,
        "employee_name": "Jane Doe",
        "date": "2024-03-04",
        "in_time": "09:00",
        "out_time": "17:30",
        "worked_hours": 8.5,
        "is_leave": false,
        "is_holiday": false,
        "day_of_week": "Monday",
        "month_year": "2024-03",
        "expected_hours": 8.5,
        "status": "Present"
    })
)]
pub struct AttendanceRecord {
    pub id: u64,
    pub employee_id: u64,
    pub employee_name: String,

    #[schema(value_type = String, format = "date")]
    pub date: NaiveDate,

    #[schema(example = "09:00", nullable = true)]
    pub in_time: Option<String>,

    #[schema(example = "17:30", nullable = true)]
    pub out_time: Option<String>,

    pub worked_hours: f64,
    pub is_leave: bool,
    pub is_holiday: bool,

    #[schema(example = "Monday")]
    pub day_of_week: String,

    #[schema(example = "2024-03")]
    pub month_year: String,

    pub expected_hours: f64,
    pub status: AttendanceStatus,

    #[schema(value_type = String, format = "date-time")]
    pub created_at: NaiveDateTime,

    #[schema(value_type = String, format = "date-time")]
    pub updated_at: NaiveDateTime,
}

/// A parsed spreadsheet row, before employee identity resolution.
#[derive(Debug, Clone, PartialEq)]
pub struct AttendanceCandidate {
    pub employee_name: String,
    pub date: NaiveDate,
    pub in_time: Option<String>,
    pub out_time: Option<String>,
    pub worked_hours: f64,
    pub is_leave: bool,
    pub is_holiday: bool,
    pub day_of_week: String,
    pub month_year: String,
    pub expected_hours: f64,
    pub status: AttendanceStatus,
}

/// An insert-ready record: a candidate bound to a resolved employee id.
#[derive(Debug, Clone)]
pub struct NewAttendanceRecord {
    pub employee_id: u64,
    pub employee_name: String,
    pub date: NaiveDate,
    pub in_time: Option<String>,
    pub out_time: Option<String>,
    pub worked_hours: f64,
    pub is_leave: bool,
    pub is_holiday: bool,
    pub day_of_week: String,
    pub month_year: String,
    pub expected_hours: f64,
    pub status: AttendanceStatus,
}

impl NewAttendanceRecord {
    pub fn from_candidate(candidate: AttendanceCandidate, employee_id: u64) -> Self {
        Self {
            employee_id,
            employee_name: candidate.employee_name,
            date: candidate.date,
            in_time: candidate.in_time,
            out_time: candidate.out_time,
            worked_hours: candidate.worked_hours,
            is_leave: candidate.is_leave,
            is_holiday: candidate.is_holiday,
            day_of_week: candidate.day_of_week,
            month_year: candidate.month_year,
            expected_hours: candidate.expected_hours,
            status: candidate.status,
        }
    }
}

/// One uploaded period as listed by the months catalog.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PeriodSummary {
    #[schema(example = "2024-03")]
    pub month_year: String,

    pub record_count: u64,
    pub employee_count: u64,

    #[schema(value_type = String, format = "date-time", nullable = true)]
    pub last_updated: Option<NaiveDateTime>,
}
