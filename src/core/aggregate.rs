//! Read-side statistics over stored attendance records.
//!
//! Every productivity figure everywhere uses the same formula:
//! `worked / expected * 100`, zero when the denominator is zero, never
//! clamped. Chargeable leave is always `is_leave && !is_holiday`; a holiday
//! never counts against the leave allowance.

use serde::Serialize;
use utoipa::ToSchema;

use crate::core::timecalc::{format_date, round2};
use crate::model::{AttendanceRecord, DEFAULT_LEAVES_PER_MONTH};

/// Flat per-day baseline used only for the fleet-wide workforce view. The
/// per-employee statistics use the weekday-specific table instead.
pub const FLEET_DAILY_BASELINE_HOURS: f64 = 8.0;

const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// Shared productivity formula, rounded to 2 decimals, uncapped.
pub fn productivity(worked_hours: f64, expected_hours: f64) -> f64 {
    if expected_hours > 0.0 {
        round2(worked_hours / expected_hours * 100.0)
    } else {
        0.0
    }
}

fn chargeable_leave(record: &AttendanceRecord) -> bool {
    record.is_leave && !record.is_holiday
}

/// Employee names in first-encounter order; keeps result ordering stable.
fn distinct_names(records: &[AttendanceRecord]) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for record in records {
        if !names.iter().any(|n| n == &record.employee_name) {
            names.push(record.employee_name.clone());
        }
    }
    names
}

// ---------------------------------------------------------------------------
// Period (month) statistics
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct DayEntry {
    #[schema(example = "2024-03-04")]
    pub date: String,

    #[schema(example = "Monday")]
    pub day: String,

    pub worked_hours: f64,
    pub is_leave: bool,
    pub is_holiday: bool,
    pub expected_hours: f64,

    #[schema(nullable = true)]
    pub in_time: Option<String>,

    #[schema(nullable = true)]
    pub out_time: Option<String>,

    #[schema(example = "Present")]
    pub status: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct EmployeePeriodStats {
    #[schema(example = "Jane Doe")]
    pub employee_name: String,

    pub total_expected_hours: f64,
    pub total_worked_hours: f64,
    pub leaves_taken: u32,
    pub leaves_allowed: u32,

    #[schema(example = 100.0)]
    pub productivity: f64,

    pub daily_breakdown: Vec<DayEntry>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PeriodStatistics {
    #[schema(example = "2024-03")]
    pub month_year: String,

    pub statistics: Vec<EmployeePeriodStats>,
    pub total_records: u64,
    pub total_employees: u64,
}

/// Per-employee statistics for one period. `None` when the period holds no
/// records; an empty period is an expected dashboard state, not a fault.
pub fn period_statistics(month_year: &str, records: &[AttendanceRecord]) -> Option<PeriodStatistics> {
    if records.is_empty() {
        return None;
    }

    let names = distinct_names(records);
    let statistics = names
        .iter()
        .map(|name| {
            let rows: Vec<&AttendanceRecord> = records
                .iter()
                .filter(|r| &r.employee_name == name)
                .collect();
            employee_period_stats(name, &rows)
        })
        .collect::<Vec<_>>();

    Some(PeriodStatistics {
        month_year: month_year.to_string(),
        total_records: records.len() as u64,
        total_employees: names.len() as u64,
        statistics,
    })
}

fn employee_period_stats(name: &str, rows: &[&AttendanceRecord]) -> EmployeePeriodStats {
    let total_expected: f64 = rows.iter().map(|r| r.expected_hours).sum();
    let total_worked: f64 = rows.iter().map(|r| r.worked_hours).sum();
    let leaves_taken = rows.iter().filter(|r| chargeable_leave(r)).count() as u32;

    EmployeePeriodStats {
        employee_name: name.to_string(),
        total_expected_hours: round2(total_expected),
        total_worked_hours: round2(total_worked),
        leaves_taken,
        leaves_allowed: DEFAULT_LEAVES_PER_MONTH,
        productivity: productivity(total_worked, total_expected),
        daily_breakdown: rows
            .iter()
            .map(|r| DayEntry {
                date: format_date(r.date),
                day: r.day_of_week.clone(),
                worked_hours: r.worked_hours,
                is_leave: r.is_leave,
                is_holiday: r.is_holiday,
                expected_hours: r.expected_hours,
                in_time: r.in_time.clone(),
                out_time: r.out_time.clone(),
                status: r.status.to_string(),
            })
            .collect(),
    }
}

// ---------------------------------------------------------------------------
// Year statistics
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct MonthlyBucket {
    #[schema(example = 3)]
    pub month: u32,

    pub worked_hours: f64,
    pub expected_hours: f64,
    pub leaves_taken: u32,
    pub productivity: f64,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct MonthHighlight {
    #[schema(example = 3)]
    pub month: u32,

    #[schema(example = "March")]
    pub month_name: String,

    pub productivity: f64,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct EmployeeYearStats {
    #[schema(example = "Jane Doe")]
    pub employee_name: String,

    pub total_worked_hours: f64,
    pub total_expected_hours: f64,
    pub total_leaves_taken: u32,
    pub total_leaves_allowed: u32,
    pub avg_productivity: f64,
    pub avg_monthly_hours: f64,

    /// Months where leaves taken exceeded the monthly allowance
    pub exceeded_limit_months: u32,

    #[schema(nullable = true)]
    pub best_month: Option<MonthHighlight>,

    #[schema(nullable = true)]
    pub worst_month: Option<MonthHighlight>,

    pub monthly: Vec<MonthlyBucket>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct YearStatistics {
    #[schema(example = 2024)]
    pub year: i32,

    pub total_employees: u64,
    pub total_hours: f64,
    pub total_leaves: u32,
    pub avg_productivity: f64,
    pub avg_hours: f64,
    pub employees: Vec<EmployeeYearStats>,
}

/// Yearly rollup: per-employee monthly buckets first, then year totals with
/// best/worst month detection. `None` when the year holds no records.
pub fn year_statistics(year: i32, records: &[AttendanceRecord]) -> Option<YearStatistics> {
    if records.is_empty() {
        return None;
    }

    let names = distinct_names(records);
    let employees: Vec<EmployeeYearStats> = names
        .iter()
        .map(|name| {
            let rows: Vec<&AttendanceRecord> = records
                .iter()
                .filter(|r| &r.employee_name == name)
                .collect();
            employee_year_stats(name, &rows)
        })
        .collect();

    let total_hours: f64 = employees.iter().map(|e| e.total_worked_hours).sum();
    let total_expected: f64 = employees.iter().map(|e| e.total_expected_hours).sum();
    let total_leaves: u32 = employees.iter().map(|e| e.total_leaves_taken).sum();
    let count = employees.len() as f64;

    Some(YearStatistics {
        year,
        total_employees: employees.len() as u64,
        total_hours: round2(total_hours),
        total_leaves,
        avg_productivity: productivity(total_hours, total_expected),
        avg_hours: round2(total_hours / count),
        employees,
    })
}

fn employee_year_stats(name: &str, rows: &[&AttendanceRecord]) -> EmployeeYearStats {
    use chrono::Datelike;

    // Ascending month order doubles as the first-encountered tie-break.
    let mut monthly: Vec<MonthlyBucket> = Vec::new();
    for month in 1..=12u32 {
        let in_month: Vec<&&AttendanceRecord> =
            rows.iter().filter(|r| r.date.month() == month).collect();
        if in_month.is_empty() {
            continue;
        }
        let worked: f64 = in_month.iter().map(|r| r.worked_hours).sum();
        let expected: f64 = in_month.iter().map(|r| r.expected_hours).sum();
        let leaves = in_month.iter().filter(|r| chargeable_leave(r)).count() as u32;
        monthly.push(MonthlyBucket {
            month,
            worked_hours: round2(worked),
            expected_hours: round2(expected),
            leaves_taken: leaves,
            productivity: productivity(worked, expected),
        });
    }

    let total_worked: f64 = monthly.iter().map(|b| b.worked_hours).sum();
    let total_expected: f64 = monthly.iter().map(|b| b.expected_hours).sum();
    let total_leaves: u32 = monthly.iter().map(|b| b.leaves_taken).sum();

    // All-leave months report 0 productivity and are excluded from both the
    // average and the best/worst pick, so an empty month never reads "worst".
    let active: Vec<&MonthlyBucket> = monthly.iter().filter(|b| b.productivity > 0.0).collect();
    let avg_productivity = if active.is_empty() {
        0.0
    } else {
        round2(active.iter().map(|b| b.productivity).sum::<f64>() / active.len() as f64)
    };

    let mut best: Option<&MonthlyBucket> = None;
    let mut worst: Option<&MonthlyBucket> = None;
    for bucket in active.iter().copied() {
        if best.is_none_or(|b| bucket.productivity > b.productivity) {
            best = Some(bucket);
        }
        if worst.is_none_or(|w| bucket.productivity < w.productivity) {
            worst = Some(bucket);
        }
    }
    let best_month = best.map(highlight);
    let worst_month = worst.map(highlight);

    let exceeded_limit_months = monthly
        .iter()
        .filter(|b| b.leaves_taken > DEFAULT_LEAVES_PER_MONTH)
        .count() as u32;

    EmployeeYearStats {
        employee_name: name.to_string(),
        total_worked_hours: round2(total_worked),
        total_expected_hours: round2(total_expected),
        total_leaves_taken: total_leaves,
        total_leaves_allowed: monthly.len() as u32 * DEFAULT_LEAVES_PER_MONTH,
        avg_productivity,
        avg_monthly_hours: round2(total_worked / monthly.len() as f64),
        exceeded_limit_months,
        best_month,
        worst_month,
        monthly,
    }
}

fn highlight(bucket: &MonthlyBucket) -> MonthHighlight {
    MonthHighlight {
        month: bucket.month,
        month_name: MONTH_NAMES[bucket.month as usize - 1].to_string(),
        productivity: bucket.productivity,
    }
}

// ---------------------------------------------------------------------------
// Year-over-year comparison
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct YearComparisonRow {
    #[schema(example = 2024)]
    pub year: i32,

    pub total_worked_hours: f64,
    pub total_expected_hours: f64,
    pub total_leaves: u32,
    pub employee_count: u64,
    pub avg_productivity: f64,
    pub avg_hours: f64,
    pub avg_leaves_per_employee: f64,
}

/// Fleet-wide totals and averages per year. Years without records are
/// omitted from the result.
pub fn year_comparison(records_by_year: &[(i32, Vec<AttendanceRecord>)]) -> Vec<YearComparisonRow> {
    records_by_year
        .iter()
        .filter(|(_, records)| !records.is_empty())
        .map(|(year, records)| {
            let worked: f64 = records.iter().map(|r| r.worked_hours).sum();
            let expected: f64 = records.iter().map(|r| r.expected_hours).sum();
            let leaves = records.iter().filter(|r| chargeable_leave(r)).count() as u32;
            let employee_count = distinct_names(records).len() as u64;
            let count = employee_count as f64;

            YearComparisonRow {
                year: *year,
                total_worked_hours: round2(worked),
                total_expected_hours: round2(expected),
                total_leaves: leaves,
                employee_count,
                avg_productivity: productivity(worked, expected),
                avg_hours: round2(worked / count),
                avg_leaves_per_employee: round2(leaves as f64 / count),
            }
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Daily workforce breakdown
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct DailyWorkforce {
    #[schema(example = "2024-03-04")]
    pub date: String,

    pub total_employees: u64,
    pub present_employees: u64,
    pub leave_employees: u64,
    pub avg_hours: f64,

    /// Measured against the flat fleet baseline, not the weekday table
    pub avg_productivity: f64,
}

/// Per-calendar-date headcounts for one period. Present means neither on
/// leave nor a holiday. `None` when the period holds no records.
pub fn daily_workforce(records: &[AttendanceRecord]) -> Option<Vec<DailyWorkforce>> {
    if records.is_empty() {
        return None;
    }

    let mut dates: Vec<chrono::NaiveDate> = records.iter().map(|r| r.date).collect();
    dates.sort_unstable();
    dates.dedup();

    Some(
        dates
            .into_iter()
            .map(|date| {
                let day: Vec<&AttendanceRecord> =
                    records.iter().filter(|r| r.date == date).collect();
                let total = day.len() as u64;
                let present = day
                    .iter()
                    .filter(|r| !r.is_leave && !r.is_holiday)
                    .count() as u64;
                let on_leave = day.iter().filter(|r| chargeable_leave(r)).count() as u64;
                let worked: f64 = day.iter().map(|r| r.worked_hours).sum();
                let avg_hours = round2(worked / total as f64);

                DailyWorkforce {
                    date: format_date(date),
                    total_employees: total,
                    present_employees: present,
                    leave_employees: on_leave,
                    avg_hours,
                    avg_productivity: round2(avg_hours / FLEET_DAILY_BASELINE_HOURS * 100.0),
                }
            })
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::AttendanceStatus;
    use chrono::NaiveDate;

    fn record(
        name: &str,
        date: &str,
        worked: f64,
        expected: f64,
        is_leave: bool,
        is_holiday: bool,
    ) -> AttendanceRecord {
        let date = NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap();
        let status = if is_holiday {
            AttendanceStatus::Holiday
        } else if is_leave {
            AttendanceStatus::Leave
        } else {
            AttendanceStatus::Present
        };
        AttendanceRecord {
            id: 0,
            employee_id: 1,
            employee_name: name.to_string(),
            date,
            in_time: None,
            out_time: None,
            worked_hours: worked,
            is_leave,
            is_holiday,
            day_of_week: crate::core::timecalc::day_name(chrono::Datelike::weekday(&date))
                .to_string(),
            month_year: crate::core::timecalc::month_year(date),
            expected_hours: expected,
            status,
            created_at: date.and_hms_opt(0, 0, 0).unwrap(),
            updated_at: date.and_hms_opt(0, 0, 0).unwrap(),
        }
    }

    #[test]
    fn productivity_with_zero_denominator_is_zero() {
        assert_eq!(productivity(8.5, 0.0), 0.0);
    }

    #[test]
    fn productivity_is_uncapped() {
        assert_eq!(productivity(10.0, 8.0), 125.0);
    }

    #[test]
    fn empty_period_is_a_value_not_an_error() {
        assert!(period_statistics("2024-03", &[]).is_none());
    }

    #[test]
    fn holiday_never_counts_as_chargeable_leave() {
        let records = vec![
            record("Jane Doe", "2024-03-04", 8.5, 8.5, false, false),
            // Sunday flagged both leave and holiday in storage
            record("Jane Doe", "2024-03-03", 0.0, 0.0, true, true),
            record("Jane Doe", "2024-03-05", 0.0, 8.5, true, false),
        ];
        let stats = period_statistics("2024-03", &records).unwrap();
        assert_eq!(stats.statistics[0].leaves_taken, 1);
    }

    #[test]
    fn period_statistics_worked_example() {
        let records = vec![
            record("Jane Doe", "2024-03-04", 8.5, 8.5, false, false),
            record("Jane Doe", "2024-03-05", 0.0, 8.5, true, false),
        ];
        let stats = period_statistics("2024-03", &records).unwrap();
        let jane = &stats.statistics[0];
        assert_eq!(jane.total_worked_hours, 8.5);
        assert_eq!(jane.total_expected_hours, 17.0);
        assert_eq!(jane.productivity, 50.0);
        assert_eq!(jane.leaves_taken, 1);
        assert_eq!(jane.daily_breakdown.len(), 2);
    }

    #[test]
    fn leave_partition_covers_all_records() {
        let records = vec![
            record("Jane Doe", "2024-03-04", 8.5, 8.5, false, false),
            record("Jane Doe", "2024-03-03", 0.0, 0.0, false, true),
            record("Jane Doe", "2024-03-05", 0.0, 8.5, true, false),
        ];
        let leaves = records.iter().filter(|r| chargeable_leave(r)).count();
        let holiday_or_present = records
            .iter()
            .filter(|r| !chargeable_leave(r))
            .count();
        assert_eq!(leaves + holiday_or_present, records.len());
    }

    #[test]
    fn best_and_worst_month_skip_zero_productivity() {
        let records = vec![
            // March: 100%
            record("Jane Doe", "2024-03-04", 8.5, 8.5, false, false),
            // April: 50%
            record("Jane Doe", "2024-04-01", 4.25, 8.5, false, false),
            // May: all leave -> 0%, must not become the worst month
            record("Jane Doe", "2024-05-06", 0.0, 8.5, true, false),
        ];
        let stats = year_statistics(2024, &records).unwrap();
        let jane = &stats.employees[0];
        assert_eq!(jane.best_month.as_ref().unwrap().month, 3);
        assert_eq!(jane.best_month.as_ref().unwrap().month_name, "March");
        assert_eq!(jane.worst_month.as_ref().unwrap().month, 4);
        assert_eq!(jane.monthly.len(), 3);
    }

    #[test]
    fn best_month_tie_breaks_to_first_encountered() {
        let records = vec![
            record("Jane Doe", "2024-02-05", 8.5, 8.5, false, false),
            record("Jane Doe", "2024-06-03", 8.5, 8.5, false, false),
        ];
        let stats = year_statistics(2024, &records).unwrap();
        let jane = &stats.employees[0];
        assert_eq!(jane.best_month.as_ref().unwrap().month, 2);
        assert_eq!(jane.worst_month.as_ref().unwrap().month, 2);
    }

    #[test]
    fn yearly_leave_totals_exclude_holidays() {
        let records = vec![
            record("Jane Doe", "2024-03-03", 0.0, 0.0, true, true),
            record("Jane Doe", "2024-03-04", 8.5, 8.5, false, false),
        ];
        let stats = year_statistics(2024, &records).unwrap();
        assert_eq!(stats.employees[0].total_leaves_taken, 0);
        assert_eq!(stats.total_leaves, 0);
    }

    #[test]
    fn year_comparison_totals_and_averages() {
        let y2023 = vec![
            record("Jane Doe", "2023-03-06", 8.0, 8.5, false, false),
            record("John Smith", "2023-03-06", 0.0, 8.5, true, false),
        ];
        let y2024 = vec![record("Jane Doe", "2024-03-04", 8.5, 8.5, false, false)];
        let rows = year_comparison(&[(2023, y2023), (2024, y2024), (2025, vec![])]);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].year, 2023);
        assert_eq!(rows[0].employee_count, 2);
        assert_eq!(rows[0].total_leaves, 1);
        assert_eq!(rows[0].avg_hours, 4.0);
        assert_eq!(rows[0].avg_leaves_per_employee, 0.5);
        assert_eq!(rows[1].avg_productivity, 100.0);
    }

    #[test]
    fn daily_workforce_uses_flat_baseline() {
        let records = vec![
            record("Jane Doe", "2024-03-04", 8.0, 8.5, false, false),
            record("John Smith", "2024-03-04", 0.0, 8.5, true, false),
        ];
        let days = daily_workforce(&records).unwrap();
        assert_eq!(days.len(), 1);
        let day = &days[0];
        assert_eq!(day.total_employees, 2);
        assert_eq!(day.present_employees, 1);
        assert_eq!(day.leave_employees, 1);
        assert_eq!(day.avg_hours, 4.0);
        // 4h against the flat 8h baseline, not the 8.5h weekday table
        assert_eq!(day.avg_productivity, 50.0);
    }
}
