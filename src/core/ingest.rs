use std::collections::HashMap;

use serde::Serialize;
use tracing::{info, warn};
use utoipa::ToSchema;

use crate::core::aggregate::{self, EmployeePeriodStats};
use crate::core::parser;
use crate::error::{AppError, Result};
use crate::model::{DEFAULT_LEAVES_PER_MONTH, NewAttendanceRecord, period_key};
use crate::store::AttendanceStore;

/// Outcome of one successful upload.
#[derive(Debug, Serialize, ToSchema)]
pub struct IngestReport {
    #[schema(example = "2024-03")]
    pub month_year: String,

    pub inserted_count: u64,
    pub employee_count: u64,
    pub statistics: Vec<EmployeePeriodStats>,
}

/// Runs the whole upload: validate the target period, enforce the
/// override-or-reject conflict policy, parse the workbook, resolve employee
/// identities, bulk-write the batch, and report per-employee statistics.
pub async fn ingest<S: AttendanceStore>(
    store: &S,
    file_bytes: &[u8],
    month: u32,
    year: i32,
    override_existing: bool,
) -> Result<IngestReport> {
    if !(1..=12).contains(&month) {
        return Err(AppError::validation("Month must be between 1 and 12"));
    }
    if year <= 0 {
        return Err(AppError::validation("Year must be a positive number"));
    }
    let month_year = period_key(year, month);

    // Conflict check first, so an operator gets a clear 409 before any
    // parsing work happens.
    let existing = store.period_record_count(&month_year).await?;
    if existing > 0 && !override_existing {
        return Err(AppError::Conflict {
            month_year: month_year.clone(),
        });
    }

    let candidates = parser::parse_workbook(file_bytes)?;
    let total_parsed = candidates.len();

    // Stored period keys are derived from each row's own date; rows dated
    // outside the upload's target period are dropped like other noise rows.
    let candidates: Vec<_> = candidates
        .into_iter()
        .filter(|c| c.month_year == month_year)
        .collect();
    if candidates.len() < total_parsed {
        warn!(
            %month_year,
            dropped = total_parsed - candidates.len(),
            "Dropped rows dated outside the target period"
        );
    }

    if candidates.is_empty() {
        return Err(AppError::validation(
            "Spreadsheet does not contain valid attendance data",
        ));
    }

    // Upsert-by-name identity resolution, preserving first-encounter order.
    let mut employee_ids: HashMap<String, u64> = HashMap::new();
    let mut names: Vec<String> = Vec::new();
    for candidate in &candidates {
        if !names.iter().any(|n| n == &candidate.employee_name) {
            names.push(candidate.employee_name.clone());
        }
    }
    for name in &names {
        let id = match store.find_employee_by_name(name).await? {
            Some(employee) => {
                store.touch_employee(employee.id).await?;
                employee.id
            }
            None => {
                let employee = store
                    .create_employee(name, DEFAULT_LEAVES_PER_MONTH)
                    .await?;
                info!(%name, id = employee.id, "Created employee");
                employee.id
            }
        };
        employee_ids.insert(name.clone(), id);
    }

    let records: Vec<NewAttendanceRecord> = candidates
        .into_iter()
        .map(|c| {
            let id = employee_ids[&c.employee_name];
            NewAttendanceRecord::from_candidate(c, id)
        })
        .collect();

    let purge = existing > 0 && override_existing;
    let inserted = store.replace_period(&month_year, purge, &records).await?;
    info!(%month_year, inserted, purge, "Stored attendance batch");

    // Statistics are computed over the committed state of the period.
    let stored = store.records_for_period(&month_year).await?;
    let statistics = aggregate::period_statistics(&month_year, &stored)
        .map(|stats| stats.statistics)
        .unwrap_or_default();

    Ok(IngestReport {
        month_year,
        inserted_count: inserted,
        employee_count: names.len() as u64,
        statistics,
    })
}
