use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

/// Monthly leave allowance granted when an employee is first seen in an upload.
pub const DEFAULT_LEAVES_PER_MONTH: u32 = 2;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[schema(
    example = json!({
        "id": 7,
        "name": "Jane Doe",
        "employee_code": "EMP-007",
        "email": "jane.doe@company.com",
        "department": "Engineering",
        "leaves_per_month": 2,
        "created_at": "2024-03-01T09:00:00",
        "updated_at": "2024-03-01T09:00:00"
    })
)]
pub struct Employee {
    #[schema(example = 7)]
    pub id: u64,

    /// Unique business key; the display name doubles as identity.
    #[schema(example = "Jane Doe")]
    pub name: String,

    #[schema(example = "EMP-007", nullable = true)]
    pub employee_code: Option<String>,

    #[schema(example = "jane.doe@company.com", nullable = true)]
    pub email: Option<String>,

    #[schema(example = "Engineering", nullable = true)]
    pub department: Option<String>,

    #[schema(example = 2)]
    pub leaves_per_month: u32,

    #[schema(value_type = String, format = "date-time")]
    pub created_at: NaiveDateTime,

    #[schema(value_type = String, format = "date-time")]
    pub updated_at: NaiveDateTime,
}
