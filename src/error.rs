use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use serde_json::json;
use thiserror::Error;

/// Every failure the directory can report, from the store boundary up to the admin gate.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DirectoryError {
    #[error("Directory store is not configured: set {}", .0.join(" and "))]
    Configuration(Vec<&'static str>),

    #[error("Directory store unreachable: {0}")]
    Connectivity(String),

    #[error("Directory store rejected the write: {0}")]
    Validation(String),

    #[error("No group with id {0}")]
    NotFound(String),

    #[error("Corrupt group record: {0}")]
    DataIntegrity(String),

    #[error("Incorrect admin password")]
    AuthorizationMismatch,

    #[error("Admin mode is locked")]
    Locked,
}

impl DirectoryError {
    /// Short machine-readable tag used in JSON bodies.
    pub fn kind(&self) -> &'static str {
        match self {
            DirectoryError::Configuration(_) => "configuration",
            DirectoryError::Connectivity(_) => "connectivity",
            DirectoryError::Validation(_) => "validation",
            DirectoryError::NotFound(_) => "not_found",
            DirectoryError::DataIntegrity(_) => "data_integrity",
            DirectoryError::AuthorizationMismatch => "authorization_mismatch",
            DirectoryError::Locked => "locked",
        }
    }

    pub fn is_recoverable(&self) -> bool {
        !matches!(self, DirectoryError::Configuration(_))
    }
}

impl From<sqlx::Error> for DirectoryError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::Database(db) => {
                // SQLSTATE class 22 is a data exception, 23 an integrity constraint violation
                let rejected = db
                    .code()
                    .map(|code| code.starts_with("22") || code.starts_with("23"))
                    .unwrap_or(false);
                if rejected {
                    DirectoryError::Validation(db.message().to_string())
                } else {
                    DirectoryError::Connectivity(db.message().to_string())
                }
            }
            sqlx::Error::ColumnNotFound(_)
            | sqlx::Error::ColumnDecode { .. }
            | sqlx::Error::ColumnIndexOutOfBounds { .. }
            | sqlx::Error::Decode(_)
            | sqlx::Error::TypeNotFound { .. } => DirectoryError::DataIntegrity(err.to_string()),
            sqlx::Error::RowNotFound => DirectoryError::NotFound("row".into()),
            _ => DirectoryError::Connectivity(err.to_string()),
        }
    }
}

impl ResponseError for DirectoryError {
    fn status_code(&self) -> StatusCode {
        match self {
            DirectoryError::Configuration(_) => StatusCode::SERVICE_UNAVAILABLE,
            DirectoryError::Connectivity(_) => StatusCode::BAD_GATEWAY,
            DirectoryError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            DirectoryError::NotFound(_) => StatusCode::NOT_FOUND,
            DirectoryError::DataIntegrity(_) => StatusCode::INTERNAL_SERVER_ERROR,
            DirectoryError::AuthorizationMismatch => StatusCode::UNAUTHORIZED,
            DirectoryError::Locked => StatusCode::FORBIDDEN,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(json!({
            "success": false,
            "kind": self.kind(),
            "message": self.to_string(),
        }))
    }
}
