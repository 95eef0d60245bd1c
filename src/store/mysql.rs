use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime};
use sqlx::{FromRow, MySqlPool};
use tracing::info;

use crate::error::{AppError, Result};
use crate::model::{
    AttendanceRecord, AttendanceStatus, Employee, NewAttendanceRecord, PeriodSummary,
};
use crate::store::AttendanceStore;

/// MySQL-backed store. Queries are built at runtime (no compile-time
/// database), following the dynamic-query style of the rest of the codebase.
#[derive(Clone)]
pub struct MySqlStore {
    pool: MySqlPool,
}

/// Raw attendance row; status is stored as VARCHAR and parsed on the way out.
#[derive(FromRow)]
struct AttendanceRow {
    id: u64,
    employee_id: u64,
    employee_name: String,
    date: NaiveDate,
    in_time: Option<String>,
    out_time: Option<String>,
    worked_hours: f64,
    is_leave: bool,
    is_holiday: bool,
    day_of_week: String,
    month_year: String,
    expected_hours: f64,
    status: String,
    created_at: NaiveDateTime,
    updated_at: NaiveDateTime,
}

impl From<AttendanceRow> for AttendanceRecord {
    fn from(row: AttendanceRow) -> Self {
        AttendanceRecord {
            id: row.id,
            employee_id: row.employee_id,
            employee_name: row.employee_name,
            date: row.date,
            in_time: row.in_time,
            out_time: row.out_time,
            worked_hours: row.worked_hours,
            is_leave: row.is_leave,
            is_holiday: row.is_holiday,
            day_of_week: row.day_of_week,
            month_year: row.month_year,
            expected_hours: row.expected_hours,
            status: AttendanceStatus::from_str(&row.status).unwrap_or(AttendanceStatus::Absent),
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(FromRow)]
struct PeriodRow {
    month_year: String,
    record_count: i64,
    employee_count: i64,
    last_updated: Option<NaiveDateTime>,
}

const SELECT_ATTENDANCE: &str = r#"
    SELECT id, employee_id, employee_name, date, in_time, out_time,
           worked_hours, is_leave, is_holiday, day_of_week, month_year,
           expected_hours, status, created_at, updated_at
    FROM attendance
"#;

impl MySqlStore {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// Creates the two collections if missing. The compound unique key on
    /// (employee_id, date) is what makes concurrent uploads fail safely.
    pub async fn migrate(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS employees (
                id BIGINT UNSIGNED AUTO_INCREMENT PRIMARY KEY,
                name VARCHAR(255) NOT NULL UNIQUE,
                employee_code VARCHAR(64) NULL,
                email VARCHAR(255) NULL,
                department VARCHAR(255) NULL,
                leaves_per_month INT UNSIGNED NOT NULL DEFAULT 2,
                created_at DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP,
                updated_at DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP
                    ON UPDATE CURRENT_TIMESTAMP
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS attendance (
                id BIGINT UNSIGNED AUTO_INCREMENT PRIMARY KEY,
                employee_id BIGINT UNSIGNED NOT NULL,
                employee_name VARCHAR(255) NOT NULL,
                date DATE NOT NULL,
                in_time VARCHAR(16) NULL,
                out_time VARCHAR(16) NULL,
                worked_hours DOUBLE NOT NULL DEFAULT 0,
                is_leave BOOLEAN NOT NULL DEFAULT FALSE,
                is_holiday BOOLEAN NOT NULL DEFAULT FALSE,
                day_of_week VARCHAR(16) NOT NULL,
                month_year CHAR(7) NOT NULL,
                expected_hours DOUBLE NOT NULL DEFAULT 0,
                status VARCHAR(16) NOT NULL DEFAULT 'Present',
                created_at DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP,
                updated_at DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP
                    ON UPDATE CURRENT_TIMESTAMP,
                UNIQUE KEY uniq_employee_date (employee_id, date),
                KEY idx_month_year (month_year),
                KEY idx_date (date),
                CONSTRAINT fk_attendance_employee
                    FOREIGN KEY (employee_id) REFERENCES employees (id)
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        info!("Database schema ready");
        Ok(())
    }

    async fn employee_by_id(&self, id: u64) -> Result<Employee> {
        let employee = sqlx::query_as::<_, Employee>(
            r#"
            SELECT id, name, employee_code, email, department, leaves_per_month,
                   created_at, updated_at
            FROM employees
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await?;
        Ok(employee)
    }
}

fn is_duplicate_key(err: &sqlx::Error) -> bool {
    if let sqlx::Error::Database(db_err) = err {
        // MySQL integrity-constraint violation (duplicate key)
        return db_err.code().as_deref() == Some("23000");
    }
    false
}

impl AttendanceStore for MySqlStore {
    async fn find_employee_by_name(&self, name: &str) -> Result<Option<Employee>> {
        let employee = sqlx::query_as::<_, Employee>(
            r#"
            SELECT id, name, employee_code, email, department, leaves_per_month,
                   created_at, updated_at
            FROM employees
            WHERE name = ?
            "#,
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;
        Ok(employee)
    }

    async fn create_employee(&self, name: &str, leaves_per_month: u32) -> Result<Employee> {
        let result = sqlx::query("INSERT INTO employees (name, leaves_per_month) VALUES (?, ?)")
            .bind(name)
            .bind(leaves_per_month)
            .execute(&self.pool)
            .await?;
        self.employee_by_id(result.last_insert_id()).await
    }

    async fn touch_employee(&self, id: u64) -> Result<()> {
        sqlx::query("UPDATE employees SET updated_at = CURRENT_TIMESTAMP WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn list_employees(&self) -> Result<Vec<Employee>> {
        let employees = sqlx::query_as::<_, Employee>(
            r#"
            SELECT id, name, employee_code, email, department, leaves_per_month,
                   created_at, updated_at
            FROM employees
            ORDER BY name
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(employees)
    }

    async fn period_record_count(&self, month_year: &str) -> Result<u64> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM attendance WHERE month_year = ?")
                .bind(month_year)
                .fetch_one(&self.pool)
                .await?;
        Ok(count as u64)
    }

    async fn replace_period(
        &self,
        month_year: &str,
        purge: bool,
        records: &[NewAttendanceRecord],
    ) -> Result<u64> {
        let mut tx = self.pool.begin().await?;

        if purge {
            let deleted = sqlx::query("DELETE FROM attendance WHERE month_year = ?")
                .bind(month_year)
                .execute(&mut *tx)
                .await?
                .rows_affected();
            info!(month_year, deleted, "Purged existing period data");
        }

        for record in records {
            let result = sqlx::query(
                r#"
                INSERT INTO attendance
                    (employee_id, employee_name, date, in_time, out_time,
                     worked_hours, is_leave, is_holiday, day_of_week,
                     month_year, expected_hours, status)
                VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
                "#,
            )
            .bind(record.employee_id)
            .bind(&record.employee_name)
            .bind(record.date)
            .bind(&record.in_time)
            .bind(&record.out_time)
            .bind(record.worked_hours)
            .bind(record.is_leave)
            .bind(record.is_holiday)
            .bind(&record.day_of_week)
            .bind(&record.month_year)
            .bind(record.expected_hours)
            .bind(record.status.to_string())
            .execute(&mut *tx)
            .await;

            if let Err(e) = result {
                // Dropping the transaction rolls back the purge and any
                // partial inserts; the period is left as it was.
                if is_duplicate_key(&e) {
                    return Err(AppError::Duplicate(format!(
                        "{} on {}",
                        record.employee_name, record.date
                    )));
                }
                return Err(e.into());
            }
        }

        tx.commit().await?;
        Ok(records.len() as u64)
    }

    async fn records_for_period(&self, month_year: &str) -> Result<Vec<AttendanceRecord>> {
        let rows = sqlx::query_as::<_, AttendanceRow>(&format!(
            "{SELECT_ATTENDANCE} WHERE month_year = ? ORDER BY employee_name, date"
        ))
        .bind(month_year)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn records_for_year(&self, year: i32) -> Result<Vec<AttendanceRecord>> {
        let start = NaiveDate::from_ymd_opt(year, 1, 1)
            .ok_or_else(|| AppError::validation(format!("invalid year {year}")))?;
        let end = NaiveDate::from_ymd_opt(year + 1, 1, 1)
            .ok_or_else(|| AppError::validation(format!("invalid year {year}")))?;

        let rows = sqlx::query_as::<_, AttendanceRow>(&format!(
            "{SELECT_ATTENDANCE} WHERE date >= ? AND date < ? ORDER BY employee_name, date"
        ))
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn period_catalog(&self) -> Result<Vec<PeriodSummary>> {
        let rows = sqlx::query_as::<_, PeriodRow>(
            r#"
            SELECT month_year,
                   COUNT(*) AS record_count,
                   COUNT(DISTINCT employee_name) AS employee_count,
                   MAX(updated_at) AS last_updated
            FROM attendance
            GROUP BY month_year
            ORDER BY month_year DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| PeriodSummary {
                month_year: row.month_year,
                record_count: row.record_count as u64,
                employee_count: row.employee_count as u64,
                last_updated: row.last_updated,
            })
            .collect())
    }
}
