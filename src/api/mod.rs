pub mod employee;
pub mod reports;
pub mod upload;

use actix_web::HttpResponse;

use crate::error::AppError;

/// Maps the core error taxonomy onto transport status codes:
/// validation 400, conflict 409, persistence 500.
pub(crate) fn error_response(err: AppError) -> HttpResponse {
    match err {
        AppError::Validation(message) => HttpResponse::BadRequest().json(serde_json::json!({
            "error": "Invalid request",
            "message": message
        })),
        AppError::Workbook(message) => HttpResponse::BadRequest().json(serde_json::json!({
            "error": "Invalid file",
            "message": message
        })),
        AppError::Conflict { month_year } => HttpResponse::Conflict().json(serde_json::json!({
            "error": "Data already exists",
            "message": format!(
                "Attendance data for {month_year} already exists. Use override=true to replace."
            ),
            "month_year": month_year
        })),
        AppError::Duplicate(detail) => {
            tracing::error!(%detail, "Bulk insert hit a duplicate record");
            HttpResponse::InternalServerError().json(serde_json::json!({
                "error": "Upload failed",
                "message": format!("Duplicate attendance record: {detail}")
            }))
        }
        AppError::Store(e) => {
            tracing::error!(error = %e, "Database failure");
            HttpResponse::InternalServerError().json(serde_json::json!({
                "error": "Internal Server Error",
                "message": "Request failed, please retry"
            }))
        }
    }
}
