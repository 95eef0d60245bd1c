use thiserror::Error;

/// Application-wide error type.
///
/// Conflict and Validation are caller-visible outcomes of ingestion; the HTTP
/// layer maps them to 409 and 400. Store failures (including a duplicate
/// employee+date inside one batch) fail the whole upload.
#[derive(Error, Debug)]
pub enum AppError {
    /// Malformed or missing input (bad month/year, empty file, no usable rows)
    #[error("Validation error: {0}")]
    Validation(String),

    /// Target period already has data and override was not requested
    #[error("Attendance data for {month_year} already exists. Use override=true to replace.")]
    Conflict { month_year: String },

    /// Uniqueness violation during bulk insert (duplicate employee+date)
    #[error("Duplicate attendance record: {0}")]
    Duplicate(String),

    /// Underlying store failure
    #[error("Database error: {0}")]
    Store(#[from] sqlx::Error),

    /// Spreadsheet decode failure
    #[error("Spreadsheet error: {0}")]
    Workbook(String),
}

pub type Result<T> = std::result::Result<T, AppError>;

impl AppError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }
}
