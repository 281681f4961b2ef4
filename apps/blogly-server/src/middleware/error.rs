//! Error handling - maps every failure onto an HTML error page.

use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use std::fmt;

use blogly_core::error::{DomainError, RepoError};
use blogly_shared::ValidationErrors;

use crate::templates;

/// Application-level error type rendered as an HTML error page.
#[derive(Debug)]
pub enum AppError {
    NotFound(String),
    Validation(Vec<String>),
    Conflict(String),
    Internal(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::NotFound(msg) => write!(f, "Not found: {}", msg),
            AppError::Validation(errors) => write!(f, "Validation errors: {:?}", errors),
            AppError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            AppError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        let title = status.canonical_reason().unwrap_or("Error");

        let details = match self {
            AppError::NotFound(detail) | AppError::Conflict(detail) => vec![detail.clone()],
            AppError::Validation(errors) => errors.clone(),
            AppError::Internal(detail) => {
                // Log internal errors, never show them
                tracing::error!("Internal error: {}", detail);
                Vec::new()
            }
        };

        HttpResponse::build(status)
            .content_type("text/html; charset=utf-8")
            .body(templates::render_error_page(status.as_u16(), title, &details))
    }
}

// Conversion from domain errors
impl From<DomainError> for AppError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::NotFound { entity_type, id } => {
                AppError::NotFound(format!("{} with id {} not found", entity_type, id))
            }
            DomainError::Validation(msg) => AppError::Validation(vec![msg]),
        }
    }
}

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound => AppError::NotFound("Resource not found".to_string()),
            RepoError::Constraint(msg) => AppError::Conflict(msg),
            RepoError::Connection(msg) => {
                tracing::error!("Database connection error: {}", msg);
                AppError::Internal("Database error".to_string())
            }
            RepoError::Query(msg) => {
                tracing::error!("Database query error: {}", msg);
                AppError::Internal("Database error".to_string())
            }
        }
    }
}

impl From<ValidationErrors> for AppError {
    fn from(err: ValidationErrors) -> Self {
        AppError::Validation(err.0)
    }
}

impl From<minijinja::Error> for AppError {
    fn from(err: minijinja::Error) -> Self {
        AppError::Internal(format!("template rendering failed: {err:#}"))
    }
}

/// Result type alias for handlers.
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::to_bytes;

    #[test]
    fn missing_entities_are_404() {
        let err: AppError = DomainError::not_found("Tag", 9).into();
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(err.to_string(), "Not found: Tag with id 9 not found");
    }

    #[test]
    fn validation_failures_are_400() {
        let err: AppError = ValidationErrors(vec!["Title is required".into()]).into();
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn database_failures_are_500() {
        let err: AppError = RepoError::Query("boom".into()).into();
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[actix_web::test]
    async fn internal_details_are_not_rendered() {
        let err = AppError::Internal("secret connection string".into());
        let body = to_bytes(err.error_response().into_body()).await.unwrap();
        let html = String::from_utf8(body.to_vec()).unwrap();
        assert!(html.contains("Internal Server Error"));
        assert!(!html.contains("secret connection string"));
    }

    #[actix_web::test]
    async fn validation_messages_are_escaped() {
        let err = AppError::Validation(vec!["<b>bad</b>".into()]);
        let body = to_bytes(err.error_response().into_body()).await.unwrap();
        let html = String::from_utf8(body.to_vec()).unwrap();
        assert!(html.contains("&lt;b&gt;bad"));
        assert!(!html.contains("<b>bad"));
    }
}
