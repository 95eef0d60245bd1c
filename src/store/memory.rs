use std::collections::HashSet;
use std::sync::Mutex;

use chrono::{Datelike, NaiveDateTime, Utc};

use crate::error::{AppError, Result};
use crate::model::{AttendanceRecord, Employee, NewAttendanceRecord, PeriodSummary};
use crate::store::AttendanceStore;

/// In-memory store with the same batch-atomicity contract as the MySQL
/// store. Used by the test suite; no durability.
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

#[derive(Default)]
struct Inner {
    employees: Vec<Employee>,
    records: Vec<AttendanceRecord>,
    next_employee_id: u64,
    next_record_id: u64,
}

fn now() -> NaiveDateTime {
    Utc::now().naive_utc()
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl AttendanceStore for MemoryStore {
    async fn find_employee_by_name(&self, name: &str) -> Result<Option<Employee>> {
        let inner = self.inner.lock().unwrap();
        Ok(inner.employees.iter().find(|e| e.name == name).cloned())
    }

    async fn create_employee(&self, name: &str, leaves_per_month: u32) -> Result<Employee> {
        let mut inner = self.inner.lock().unwrap();
        if inner.employees.iter().any(|e| e.name == name) {
            return Err(AppError::Duplicate(format!("employee {name}")));
        }
        inner.next_employee_id += 1;
        let employee = Employee {
            id: inner.next_employee_id,
            name: name.to_string(),
            employee_code: None,
            email: None,
            department: None,
            leaves_per_month,
            created_at: now(),
            updated_at: now(),
        };
        inner.employees.push(employee.clone());
        Ok(employee)
    }

    async fn touch_employee(&self, id: u64) -> Result<()> {
        let mut inner = self.inner.lock().unwrap();
        if let Some(employee) = inner.employees.iter_mut().find(|e| e.id == id) {
            employee.updated_at = now();
        }
        Ok(())
    }

    async fn list_employees(&self) -> Result<Vec<Employee>> {
        let inner = self.inner.lock().unwrap();
        let mut employees = inner.employees.clone();
        employees.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(employees)
    }

    async fn period_record_count(&self, month_year: &str) -> Result<u64> {
        let inner = self.inner.lock().unwrap();
        Ok(inner
            .records
            .iter()
            .filter(|r| r.month_year == month_year)
            .count() as u64)
    }

    async fn replace_period(
        &self,
        month_year: &str,
        purge: bool,
        records: &[NewAttendanceRecord],
    ) -> Result<u64> {
        let mut inner = self.inner.lock().unwrap();

        // Stage the post-purge state and validate the whole batch against it
        // before touching anything, so a duplicate leaves the store as-is.
        let retained: Vec<AttendanceRecord> = inner
            .records
            .iter()
            .filter(|r| !(purge && r.month_year == month_year))
            .cloned()
            .collect();

        let mut seen: HashSet<(u64, chrono::NaiveDate)> = retained
            .iter()
            .map(|r| (r.employee_id, r.date))
            .collect();
        for record in records {
            if !seen.insert((record.employee_id, record.date)) {
                return Err(AppError::Duplicate(format!(
                    "{} on {}",
                    record.employee_name, record.date
                )));
            }
        }

        inner.records = retained;
        for record in records {
            inner.next_record_id += 1;
            let id = inner.next_record_id;
            inner.records.push(AttendanceRecord {
                id,
                employee_id: record.employee_id,
                employee_name: record.employee_name.clone(),
                date: record.date,
                in_time: record.in_time.clone(),
                out_time: record.out_time.clone(),
                worked_hours: record.worked_hours,
                is_leave: record.is_leave,
                is_holiday: record.is_holiday,
                day_of_week: record.day_of_week.clone(),
                month_year: record.month_year.clone(),
                expected_hours: record.expected_hours,
                status: record.status,
                created_at: now(),
                updated_at: now(),
            });
        }
        Ok(records.len() as u64)
    }

    async fn records_for_period(&self, month_year: &str) -> Result<Vec<AttendanceRecord>> {
        let inner = self.inner.lock().unwrap();
        let mut records: Vec<AttendanceRecord> = inner
            .records
            .iter()
            .filter(|r| r.month_year == month_year)
            .cloned()
            .collect();
        records.sort_by(|a, b| (&a.employee_name, a.date).cmp(&(&b.employee_name, b.date)));
        Ok(records)
    }

    async fn records_for_year(&self, year: i32) -> Result<Vec<AttendanceRecord>> {
        let inner = self.inner.lock().unwrap();
        let mut records: Vec<AttendanceRecord> = inner
            .records
            .iter()
            .filter(|r| r.date.year() == year)
            .cloned()
            .collect();
        records.sort_by(|a, b| (&a.employee_name, a.date).cmp(&(&b.employee_name, b.date)));
        Ok(records)
    }

    async fn period_catalog(&self) -> Result<Vec<PeriodSummary>> {
        let inner = self.inner.lock().unwrap();
        let mut periods: Vec<String> = inner
            .records
            .iter()
            .map(|r| r.month_year.clone())
            .collect();
        periods.sort();
        periods.dedup();
        periods.reverse();

        Ok(periods
            .into_iter()
            .map(|month_year| {
                let rows: Vec<&AttendanceRecord> = inner
                    .records
                    .iter()
                    .filter(|r| r.month_year == month_year)
                    .collect();
                let mut names: Vec<&str> =
                    rows.iter().map(|r| r.employee_name.as_str()).collect();
                names.sort_unstable();
                names.dedup();
                PeriodSummary {
                    record_count: rows.len() as u64,
                    employee_count: names.len() as u64,
                    last_updated: rows.iter().map(|r| r.updated_at).max(),
                    month_year,
                }
            })
            .collect())
    }
}
