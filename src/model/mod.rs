pub mod attendance;
pub mod employee;

pub use attendance::{
    AttendanceCandidate, AttendanceRecord, AttendanceStatus, NewAttendanceRecord, PeriodSummary,
};
pub use employee::{DEFAULT_LEAVES_PER_MONTH, Employee};

/// Builds the "YYYY-MM" period key for a month of a year.
pub fn period_key(year: i32, month: u32) -> String {
    format!("{:04}-{:02}", year, month)
}
