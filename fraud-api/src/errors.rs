use actix_web::{HttpResponse, ResponseError};
use std::fmt;

#[derive(Debug)]
pub enum ApiError {
    DatabaseError(sqlx::Error),
    ValidationError(String),
    Unauthorized(String),
    NotFound(String),
    InternalError(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::DatabaseError(e) => write!(f, "Database error: {}", e),
            ApiError::ValidationError(msg) => write!(f, "Validation error: {}", msg),
            ApiError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            ApiError::NotFound(msg) => write!(f, "Not found: {}", msg),
            ApiError::InternalError(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

impl ResponseError for ApiError {
    fn error_response(&self) -> HttpResponse {
        match self {
            ApiError::DatabaseError(_) => {
                HttpResponse::InternalServerError().json(serde_json::json!({
                    "error": "DATABASE_ERROR",
                    "message": self.to_string()
                }))
            }
            ApiError::ValidationError(_) => {
                HttpResponse::BadRequest().json(serde_json::json!({
                    "error": "VALIDATION_ERROR",
                    "message": self.to_string()
                }))
            }
            ApiError::Unauthorized(_) => {
                HttpResponse::Unauthorized().json(serde_json::json!({
                    "error": "UNAUTHORIZED",
                    "message": self.to_string()
                }))
            }
            ApiError::NotFound(_) => {
                HttpResponse::NotFound().json(serde_json::json!({
                    "error": "NOT_FOUND",
                    "message": self.to_string()
                }))
            }
            ApiError::InternalError(_) => {
                HttpResponse::InternalServerError().json(serde_json::json!({
                    "error": "INTERNAL_ERROR",
                    "message": self.to_string()
                }))
            }
        }
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        ApiError::DatabaseError(err)
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
