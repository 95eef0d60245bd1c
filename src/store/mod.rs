pub mod memory;
pub mod mysql;

pub use memory::MemoryStore;
pub use mysql::MySqlStore;

use crate::error::Result;
use crate::model::{AttendanceRecord, Employee, NewAttendanceRecord, PeriodSummary};

/// Persistence seam between the pipeline/aggregation core and the database.
///
/// The at-most-one-writer-per-period guarantee comes from the store's
/// (employee, date) uniqueness constraint, not from application locking:
/// `replace_period` must fail the whole batch on any duplicate.
#[allow(async_fn_in_trait)]
pub trait AttendanceStore {
    async fn find_employee_by_name(&self, name: &str) -> Result<Option<Employee>>;

    /// Creates an employee on first encounter during ingestion.
    async fn create_employee(&self, name: &str, leaves_per_month: u32) -> Result<Employee>;

    /// Refreshes the bookkeeping timestamp of an already-known employee.
    async fn touch_employee(&self, id: u64) -> Result<()>;

    async fn list_employees(&self) -> Result<Vec<Employee>>;

    async fn period_record_count(&self, month_year: &str) -> Result<u64>;

    /// Bulk-writes one period as a single logical unit: optional purge of the
    /// existing period data, then insert of the whole batch. Either all
    /// records land or none do.
    async fn replace_period(
        &self,
        month_year: &str,
        purge: bool,
        records: &[NewAttendanceRecord],
    ) -> Result<u64>;

    async fn records_for_period(&self, month_year: &str) -> Result<Vec<AttendanceRecord>>;

    async fn records_for_year(&self, year: i32) -> Result<Vec<AttendanceRecord>>;

    /// Uploaded periods with record/employee counts, newest first.
    async fn period_catalog(&self) -> Result<Vec<PeriodSummary>>;
}
