//! End-to-end ingestion tests: synthesized workbook bytes through the
//! pipeline into the in-memory store, and back out through aggregation.

use attendance_analyzer::core::ingest::ingest;
use attendance_analyzer::error::AppError;
use attendance_analyzer::store::{AttendanceStore, MemoryStore};
use rust_xlsxwriter::Workbook;

type Row<'a> = (&'a str, &'a str, Option<&'a str>, Option<&'a str>);

fn workbook_bytes(rows: &[Row]) -> Vec<u8> {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.write_string(0, 0, "Employee Name").unwrap();
    sheet.write_string(0, 1, "Date").unwrap();
    sheet.write_string(0, 2, "In Time").unwrap();
    sheet.write_string(0, 3, "Out Time").unwrap();

    for (i, (name, date, in_time, out_time)) in rows.iter().enumerate() {
        let r = (i + 1) as u32;
        sheet.write_string(r, 0, *name).unwrap();
        sheet.write_string(r, 1, *date).unwrap();
        if let Some(t) = in_time {
            sheet.write_string(r, 2, *t).unwrap();
        }
        if let Some(t) = out_time {
            sheet.write_string(r, 3, *t).unwrap();
        }
    }

    workbook.save_to_buffer().unwrap()
}

// 2024-03: 03 is a Sunday, 04 a Monday, 05 a Tuesday, 06 a Wednesday.
fn march_file() -> Vec<u8> {
    workbook_bytes(&[
        ("Jane Doe", "2024-03-04", Some("09:00"), Some("17:30")),
        ("Jane Doe", "2024-03-05", None, Some("17:30")),
        ("Jane Doe", "2024-03-03", None, None),
        ("John Smith", "2024-03-06", None, None),
    ])
}

#[actix_web::test]
async fn upload_reports_per_employee_statistics() {
    let store = MemoryStore::new();
    let report = ingest(&store, &march_file(), 3, 2024, false).await.unwrap();

    assert_eq!(report.month_year, "2024-03");
    assert_eq!(report.inserted_count, 4);
    assert_eq!(report.employee_count, 2);

    let jane = report
        .statistics
        .iter()
        .find(|s| s.employee_name == "Jane Doe")
        .unwrap();
    // Monday 8.5 worked of 8.5+8.5+0 expected; Tuesday is a chargeable
    // leave, Sunday a holiday that must not count as leave.
    assert_eq!(jane.total_worked_hours, 8.5);
    assert_eq!(jane.total_expected_hours, 17.0);
    assert_eq!(jane.productivity, 50.0);
    assert_eq!(jane.leaves_taken, 1);
    assert_eq!(jane.leaves_allowed, 2);
    assert_eq!(jane.daily_breakdown.len(), 3);

    let john = report
        .statistics
        .iter()
        .find(|s| s.employee_name == "John Smith")
        .unwrap();
    assert_eq!(john.leaves_taken, 1);
    assert_eq!(john.total_expected_hours, 8.5);
    assert_eq!(john.productivity, 0.0);
}

#[actix_web::test]
async fn second_upload_conflicts_unless_override() {
    let store = MemoryStore::new();
    ingest(&store, &march_file(), 3, 2024, false).await.unwrap();

    let err = ingest(&store, &march_file(), 3, 2024, false)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Conflict { ref month_year } if month_year == "2024-03"));

    // First upload's data is untouched by the rejected attempt.
    assert_eq!(store.period_record_count("2024-03").await.unwrap(), 4);
}

#[actix_web::test]
async fn override_fully_replaces_the_period() {
    let store = MemoryStore::new();
    ingest(&store, &march_file(), 3, 2024, false).await.unwrap();

    let replacement = workbook_bytes(&[
        ("Jane Doe", "2024-03-04", Some("10:00"), Some("16:00")),
        ("Jane Doe", "2024-03-05", Some("09:00"), Some("17:30")),
    ]);
    let report = ingest(&store, &replacement, 3, 2024, true).await.unwrap();

    // Final count equals the second file's count, not the sum.
    assert_eq!(report.inserted_count, 2);
    assert_eq!(store.period_record_count("2024-03").await.unwrap(), 2);
}

#[actix_web::test]
async fn same_batch_duplicate_fails_the_whole_upload() {
    let store = MemoryStore::new();
    let duplicate_day = workbook_bytes(&[
        ("Jane Doe", "2024-03-04", Some("09:00"), Some("12:00")),
        ("Jane Doe", "2024-03-05", Some("09:00"), Some("17:30")),
        ("Jane Doe", "2024-03-04", Some("13:00"), Some("17:00")),
    ]);

    let err = ingest(&store, &duplicate_day, 3, 2024, false)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Duplicate(_)));

    // No partial insert is visible afterwards.
    assert_eq!(store.period_record_count("2024-03").await.unwrap(), 0);
}

#[actix_web::test]
async fn employees_are_reused_across_uploads() {
    let store = MemoryStore::new();
    ingest(&store, &march_file(), 3, 2024, false).await.unwrap();

    let april = workbook_bytes(&[("Jane Doe", "2024-04-01", Some("09:00"), Some("17:30"))]);
    ingest(&store, &april, 4, 2024, false).await.unwrap();

    let employees = store.list_employees().await.unwrap();
    assert_eq!(employees.len(), 2);

    let catalog = store.period_catalog().await.unwrap();
    assert_eq!(catalog.len(), 2);
    assert_eq!(catalog[0].month_year, "2024-04"); // newest first
    assert_eq!(catalog[1].record_count, 4);
}

#[actix_web::test]
async fn rows_outside_the_target_period_are_dropped() {
    let store = MemoryStore::new();
    let mixed = workbook_bytes(&[
        ("Jane Doe", "2024-03-04", Some("09:00"), Some("17:30")),
        ("Jane Doe", "2024-04-01", Some("09:00"), Some("17:30")),
    ]);

    let report = ingest(&store, &mixed, 3, 2024, false).await.unwrap();
    assert_eq!(report.inserted_count, 1);
    assert_eq!(store.period_record_count("2024-04").await.unwrap(), 0);
}

#[actix_web::test]
async fn invalid_month_is_rejected() {
    let store = MemoryStore::new();
    let err = ingest(&store, &march_file(), 13, 2024, false)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));
}

#[actix_web::test]
async fn header_only_file_is_a_validation_error() {
    let store = MemoryStore::new();
    let empty = workbook_bytes(&[]);
    let err = ingest(&store, &empty, 3, 2024, false).await.unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));
}

#[actix_web::test]
async fn garbage_rows_are_skipped_not_fatal() {
    let store = MemoryStore::new();
    let noisy = workbook_bytes(&[
        ("", "2024-03-04", Some("09:00"), Some("17:30")),
        ("Jane Doe", "not a date", Some("09:00"), Some("17:30")),
        ("Jane Doe", "2024-03-04", Some("09:00"), Some("17:30")),
    ]);

    let report = ingest(&store, &noisy, 3, 2024, false).await.unwrap();
    assert_eq!(report.inserted_count, 1);
}
