use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use derive_more::Display;
use serde::Serialize;
use tracing::error;
use utoipa::ToSchema;

// postgres SQLSTATE codes
const UNIQUE_VIOLATION: &str = "23505";
const FOREIGN_KEY_VIOLATION: &str = "23503";
const CHECK_VIOLATION: &str = "23514";

/// Body of every failed response.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    #[schema(example = "Invalid PAN format")]
    pub error: String,
    /// Only present on 500 responses.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

#[derive(Debug, Display)]
pub enum PayslipError {
    /// Client input failed a validation rule; the message names the rule.
    #[display(fmt = "{}", _0)]
    Validation(String),

    #[display(fmt = "Payslip not found")]
    NotFound,

    #[display(fmt = "Duplicate payslip for employee, month, and year")]
    DuplicatePayslip,

    #[display(fmt = "Foreign key constraint violation")]
    ForeignKey,

    #[display(fmt = "Check constraint violation (e.g., invalid format or value)")]
    CheckViolation,

    #[display(fmt = "Internal server error")]
    Internal(String),
}

impl PayslipError {
    pub fn validation(message: impl Into<String>) -> Self {
        PayslipError::Validation(message.into())
    }
}

impl std::error::Error for PayslipError {}

impl From<sqlx::Error> for PayslipError {
    fn from(e: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &e {
            match db_err.code().as_deref() {
                Some(UNIQUE_VIOLATION) => return PayslipError::DuplicatePayslip,
                Some(FOREIGN_KEY_VIOLATION) => return PayslipError::ForeignKey,
                Some(CHECK_VIOLATION) => return PayslipError::CheckViolation,
                _ => {}
            }
        }

        PayslipError::Internal(e.to_string())
    }
}

impl ResponseError for PayslipError {
    fn status_code(&self) -> StatusCode {
        match self {
            PayslipError::Validation(_)
            | PayslipError::DuplicatePayslip
            | PayslipError::ForeignKey
            | PayslipError::CheckViolation => StatusCode::BAD_REQUEST,
            PayslipError::NotFound => StatusCode::NOT_FOUND,
            PayslipError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let details = match self {
            PayslipError::Internal(details) => {
                error!(error = %details, "Unexpected failure");
                Some(details.clone())
            }
            _ => None,
        };

        HttpResponse::build(self.status_code()).json(ErrorResponse {
            error: self.to_string(),
            details,
        })
    }
}
