use actix_web::{HttpResponse, Responder, web};

use crate::api::error_response;
use crate::model::Employee;
use crate::store::{AttendanceStore, MySqlStore};

/// Employee directory, sorted by name
#[utoipa::path(
    get,
    path = "/api/employees",
    responses(
        (status = 200, body = [Employee]),
        (status = 500, description = "Internal server error")
    ),
    tag = "Employee"
)]
pub async fn list_employees(store: web::Data<MySqlStore>) -> actix_web::Result<impl Responder> {
    match store.list_employees().await {
        Ok(employees) => Ok(HttpResponse::Ok().json(serde_json::json!({
            "success": true,
            "total_employees": employees.len(),
            "employees": employees
        }))),
        Err(e) => Ok(error_response(e)),
    }
}
