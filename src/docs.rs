use crate::core::aggregate::{
    DailyWorkforce, DayEntry, EmployeePeriodStats, EmployeeYearStats, MonthHighlight,
    MonthlyBucket, PeriodStatistics, YearComparisonRow, YearStatistics,
};
use crate::core::ingest::IngestReport;
use crate::model::{AttendanceRecord, AttendanceStatus, Employee, PeriodSummary};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Leave & Productivity Analyzer API",
        version = "1.0.0",
        description = r#"
## Leave & Productivity Analyzer

Ingests spreadsheet-based attendance logs and serves productivity and
leave-utilization statistics.

### 🔹 Key Features
- **Spreadsheet Upload**
  - One row per employee per day; conflicting periods need explicit override
- **Monthly & Yearly Statistics**
  - Worked vs expected hours, chargeable leaves, uncapped productivity
- **Workforce Calendar**
  - Per-day present/leave headcounts for dashboard calendars
- **Year Comparison**
  - Fleet-wide totals and averages across years

### 📦 Response Format
- JSON-based RESTful responses
- Empty query scopes return 404 for month/year views and `has_data:false`
  on the dashboard

---
Built with **Rust**, **Actix Web**, **SQLx**, and **Utoipa**.
"#,
    ),
    paths(
        crate::api::upload::upload_attendance,
        crate::api::reports::health,
        crate::api::reports::dashboard,
        crate::api::reports::monthly_statistics,
        crate::api::reports::list_months,
        crate::api::reports::yearly_statistics,
        crate::api::reports::year_comparison,
        crate::api::reports::daily_workforce,
        crate::api::employee::list_employees,
    ),
    components(
        schemas(
            AttendanceRecord,
            AttendanceStatus,
            Employee,
            PeriodSummary,
            IngestReport,
            DayEntry,
            EmployeePeriodStats,
            PeriodStatistics,
            MonthlyBucket,
            MonthHighlight,
            EmployeeYearStats,
            YearStatistics,
            YearComparisonRow,
            DailyWorkforce
        )
    ),
    tags(
        (name = "Upload", description = "Attendance ingestion APIs"),
        (name = "Statistics", description = "Productivity and leave statistics APIs"),
        (name = "Employee", description = "Employee directory APIs"),
    )
)]
pub struct ApiDoc;
