use actix_web::{HttpResponse, Responder, web};
use chrono::{Datelike, Local};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::api::error_response;
use crate::core::aggregate::{self, DailyWorkforce, PeriodStatistics, YearComparisonRow, YearStatistics};
use crate::error::AppError;
use crate::model::period_key;
use crate::store::{AttendanceStore, MySqlStore};

/// Health check
#[utoipa::path(
    get,
    path = "/api/health",
    responses((status = 200, description = "Service banner")),
    tag = "Statistics"
)]
pub async fn health() -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "OK",
        "service": "Leave & Productivity Analyzer API",
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

/// Dashboard payload: current and previous calendar month in one response.
/// A month without data is reported with `has_data: false`, not an error.
#[utoipa::path(
    get,
    path = "/api/dashboard",
    responses((status = 200, description = "Current and previous month statistics")),
    tag = "Statistics"
)]
pub async fn dashboard(store: web::Data<MySqlStore>) -> actix_web::Result<impl Responder> {
    let today = Local::now().date_naive();
    let current = period_key(today.year(), today.month());
    let previous = if today.month() == 1 {
        period_key(today.year() - 1, 12)
    } else {
        period_key(today.year(), today.month() - 1)
    };

    let current_block = match month_block(store.get_ref(), &current).await {
        Ok(block) => block,
        Err(e) => return Ok(error_response(e)),
    };
    let previous_block = match month_block(store.get_ref(), &previous).await {
        Ok(block) => block,
        Err(e) => return Ok(error_response(e)),
    };

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "current_month": current_block,
        "previous_month": previous_block,
        "timestamp": chrono::Utc::now().to_rfc3339()
    })))
}

async fn month_block(
    store: &MySqlStore,
    month_year: &str,
) -> Result<serde_json::Value, AppError> {
    let records = store.records_for_period(month_year).await?;
    Ok(match aggregate::period_statistics(month_year, &records) {
        Some(stats) => serde_json::json!({
            "month_year": month_year,
            "has_data": true,
            "statistics": stats.statistics,
            "total_records": stats.total_records,
            "total_employees": stats.total_employees
        }),
        None => serde_json::json!({
            "month_year": month_year,
            "has_data": false,
            "statistics": [],
            "total_records": 0,
            "total_employees": 0
        }),
    })
}

/// Per-employee statistics for one month
#[utoipa::path(
    get,
    path = "/api/month/{year}/{month}",
    params(
        ("year", description = "Four-digit year"),
        ("month", description = "Month 1-12")
    ),
    responses(
        (status = 200, body = PeriodStatistics),
        (status = 400, description = "Invalid month"),
        (status = 404, description = "No attendance uploaded for this period")
    ),
    tag = "Statistics"
)]
pub async fn monthly_statistics(
    store: web::Data<MySqlStore>,
    path: web::Path<(i32, u32)>,
) -> actix_web::Result<impl Responder> {
    let (year, month) = path.into_inner();
    if !(1..=12).contains(&month) {
        return Ok(error_response(AppError::validation(
            "Month must be between 1 and 12",
        )));
    }

    let month_year = period_key(year, month);
    let records = match store.records_for_period(&month_year).await {
        Ok(records) => records,
        Err(e) => return Ok(error_response(e)),
    };

    match aggregate::period_statistics(&month_year, &records) {
        Some(stats) => Ok(HttpResponse::Ok().json(serde_json::json!({
            "success": true,
            "month_year": stats.month_year,
            "statistics": stats.statistics,
            "summary": {
                "total_records": stats.total_records,
                "total_employees": stats.total_employees,
                "month": month,
                "year": year
            }
        }))),
        None => Ok(HttpResponse::NotFound().json(serde_json::json!({
            "error": "No data found",
            "message": format!("No attendance data found for {month_year}"),
            "month_year": month_year
        }))),
    }
}

/// Catalog of uploaded periods, newest first
#[utoipa::path(
    get,
    path = "/api/months",
    responses((status = 200, description = "Uploaded periods with counts")),
    tag = "Statistics"
)]
pub async fn list_months(store: web::Data<MySqlStore>) -> actix_web::Result<impl Responder> {
    match store.period_catalog().await {
        Ok(months) => Ok(HttpResponse::Ok().json(serde_json::json!({
            "success": true,
            "total_months": months.len(),
            "months": months
        }))),
        Err(e) => Ok(error_response(e)),
    }
}

/// Yearly rollup with per-employee best/worst months
#[utoipa::path(
    get,
    path = "/api/year/{year}",
    params(("year", description = "Four-digit year")),
    responses(
        (status = 200, body = YearStatistics),
        (status = 404, description = "No attendance uploaded for this year")
    ),
    tag = "Statistics"
)]
pub async fn yearly_statistics(
    store: web::Data<MySqlStore>,
    path: web::Path<i32>,
) -> actix_web::Result<impl Responder> {
    let year = path.into_inner();

    let records = match store.records_for_year(year).await {
        Ok(records) => records,
        Err(e) => return Ok(error_response(e)),
    };

    match aggregate::year_statistics(year, &records) {
        Some(stats) => Ok(HttpResponse::Ok().json(stats)),
        None => Ok(HttpResponse::NotFound().json(serde_json::json!({
            "error": "No data found",
            "message": format!("No attendance data found for {year}"),
            "year": year
        }))),
    }
}

#[derive(Deserialize, IntoParams)]
pub struct ComparisonParams {
    /// Comma-separated years; defaults to the previous and current year
    #[param(example = "2023,2024")]
    pub years: Option<String>,
}

/// Fleet-wide year-over-year comparison
#[utoipa::path(
    get,
    path = "/api/year-comparison",
    params(ComparisonParams),
    responses(
        (status = 200, body = [YearComparisonRow]),
        (status = 400, description = "Unparsable years parameter")
    ),
    tag = "Statistics"
)]
pub async fn year_comparison(
    store: web::Data<MySqlStore>,
    query: web::Query<ComparisonParams>,
) -> actix_web::Result<impl Responder> {
    let years: Vec<i32> = match &query.years {
        Some(raw) => {
            let parsed: Result<Vec<i32>, _> =
                raw.split(',').map(|y| y.trim().parse::<i32>()).collect();
            match parsed {
                Ok(years) if !years.is_empty() => years,
                _ => {
                    return Ok(error_response(AppError::validation(
                        "years must be a comma-separated list of integers",
                    )));
                }
            }
        }
        None => {
            let current = Local::now().year();
            vec![current - 1, current]
        }
    };

    let mut records_by_year = Vec::with_capacity(years.len());
    for year in years {
        match store.records_for_year(year).await {
            Ok(records) => records_by_year.push((year, records)),
            Err(e) => return Ok(error_response(e)),
        }
    }

    Ok(HttpResponse::Ok().json(aggregate::year_comparison(&records_by_year)))
}

/// Per-day workforce headcounts for one month
#[utoipa::path(
    get,
    path = "/api/workforce/{year}/{month}",
    params(
        ("year", description = "Four-digit year"),
        ("month", description = "Month 1-12")
    ),
    responses(
        (status = 200, body = [DailyWorkforce]),
        (status = 400, description = "Invalid month"),
        (status = 404, description = "No attendance uploaded for this period")
    ),
    tag = "Statistics"
)]
pub async fn daily_workforce(
    store: web::Data<MySqlStore>,
    path: web::Path<(i32, u32)>,
) -> actix_web::Result<impl Responder> {
    let (year, month) = path.into_inner();
    if !(1..=12).contains(&month) {
        return Ok(error_response(AppError::validation(
            "Month must be between 1 and 12",
        )));
    }

    let month_year = period_key(year, month);
    let records = match store.records_for_period(&month_year).await {
        Ok(records) => records,
        Err(e) => return Ok(error_response(e)),
    };

    match aggregate::daily_workforce(&records) {
        Some(days) => {
            let total_employees = days.iter().map(|d| d.total_employees).max().unwrap_or(0);
            Ok(HttpResponse::Ok().json(serde_json::json!({
                "year": year,
                "month": month,
                "total_days": days.len(),
                "total_employees": total_employees,
                "daily_breakdown": days
            })))
        }
        None => Ok(HttpResponse::NotFound().json(serde_json::json!({
            "error": "No data found",
            "message": format!("No attendance data found for {month_year}"),
            "month_year": month_year
        }))),
    }
}
