use actix_web::{HttpResponse, Responder, web};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::api::error_response;
use crate::core::ingest;
use crate::error::AppError;
use crate::store::MySqlStore;

#[derive(Deserialize, IntoParams)]
pub struct UploadParams {
    #[param(example = 3)]
    pub month: u32,

    #[param(example = 2024)]
    pub year: i32,

    /// Authorizes destructive replacement of an already-uploaded period
    #[serde(default, rename = "override")]
    pub override_existing: bool,
}

/// Spreadsheet upload endpoint. The request body is the raw workbook bytes.
#[utoipa::path(
    post,
    path = "/api/upload",
    params(UploadParams),
    request_body(content = Vec<u8>, content_type = "application/octet-stream"),
    responses(
        (status = 200, description = "File ingested, statistics returned"),
        (status = 400, description = "Missing file, invalid period, or no usable rows"),
        (status = 409, description = "Period already has data and override was not set"),
        (status = 500, description = "Bulk insert failed; no partial data committed")
    ),
    tag = "Upload"
)]
pub async fn upload_attendance(
    store: web::Data<MySqlStore>,
    query: web::Query<UploadParams>,
    body: web::Bytes,
) -> actix_web::Result<impl Responder> {
    if body.is_empty() {
        return Ok(error_response(AppError::validation(
            "No file provided. Please select a spreadsheet to upload.",
        )));
    }

    let result = ingest::ingest(
        store.get_ref(),
        &body,
        query.month,
        query.year,
        query.override_existing,
    )
    .await;

    match result {
        Ok(report) => Ok(HttpResponse::Ok().json(serde_json::json!({
            "success": true,
            "message": format!("File uploaded successfully for {}", report.month_year),
            "summary": {
                "total_records": report.inserted_count,
                "total_employees": report.employee_count,
                "month_year": report.month_year
            },
            "statistics": report.statistics
        }))),
        Err(e) => Ok(error_response(e)),
    }
}
