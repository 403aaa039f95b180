//! The error vocabulary shared by every handler.
//!
//! Handlers return `Result<_, ApiError>` and propagate failures with `?`.
//! Each variant maps to exactly one status code, so the taxonomy is closed:
//! a handler cannot invent a new failure shape without adding it here.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use utoipa::ToSchema;

use super::ErrorResponse;

/// A single rejected field with a human-readable reason.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

/// Body of a 400 response: the overall error plus per-field detail.
#[derive(Debug, Serialize, ToSchema)]
pub struct ValidationErrorResponse {
    pub error: String,
    pub field_errors: Vec<FieldError>,
}

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Input failed validation; carries the offending fields.
    #[error("validation failed")]
    Validation(Vec<FieldError>),
    /// The actor is authenticated but not allowed to do this. The response
    /// is deliberately generic and names no entity.
    #[error("not permitted")]
    Forbidden,
    /// The named kind of entity does not exist.
    #[error("{0} not found")]
    NotFound(&'static str),
    /// A uniqueness rule rejected the request.
    #[error("{0}")]
    Conflict(String),
    /// The store failed. Details are logged, never echoed to the client.
    #[error("store error: {0}")]
    Store(diesel::result::Error),
    #[error("connection pool error: {0}")]
    Pool(#[from] diesel::r2d2::PoolError),
}

impl ApiError {
    pub fn validation(field: &str, message: &str) -> Self {
        ApiError::Validation(vec![FieldError {
            field: field.to_string(),
            message: message.to_string(),
        }])
    }

    pub fn conflict(message: &str) -> Self {
        ApiError::Conflict(message.to_string())
    }
}

impl From<diesel::result::Error> for ApiError {
    fn from(err: diesel::result::Error) -> Self {
        use diesel::result::{DatabaseErrorKind, Error};
        match err {
            // A handler that expects a row to exist gets the idiomatic 404
            // even if it forgot to call `.optional()`.
            Error::NotFound => ApiError::NotFound("Resource"),
            Error::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                ApiError::Conflict("Resource already exists".to_string())
            }
            Error::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, _) => {
                ApiError::Conflict("Referenced resource does not exist".to_string())
            }
            other => ApiError::Store(other),
        }
    }
}

fn plain(status: StatusCode, message: &str) -> Response {
    (
        status,
        Json(ErrorResponse {
            error: message.to_string(),
        }),
    )
        .into_response()
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Validation(field_errors) => (
                StatusCode::BAD_REQUEST,
                Json(ValidationErrorResponse {
                    error: "Validation failed".to_string(),
                    field_errors,
                }),
            )
                .into_response(),
            ApiError::Forbidden => plain(StatusCode::FORBIDDEN, "Not permitted"),
            ApiError::NotFound(what) => plain(StatusCode::NOT_FOUND, &format!("{what} not found")),
            ApiError::Conflict(message) => plain(StatusCode::CONFLICT, &message),
            ApiError::Store(err) => {
                tracing::error!("Database error: {err}");
                plain(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
            }
            ApiError::Pool(err) => {
                tracing::error!("Connection pool error: {err}");
                plain(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use diesel::result::{DatabaseErrorKind, Error};

    #[test]
    fn each_variant_maps_to_its_status_code() {
        let cases: Vec<(ApiError, StatusCode)> = vec![
            (
                ApiError::validation("title", "must not be empty"),
                StatusCode::BAD_REQUEST,
            ),
            (ApiError::Forbidden, StatusCode::FORBIDDEN),
            (ApiError::NotFound("Recipe"), StatusCode::NOT_FOUND),
            (
                ApiError::conflict("Username already exists"),
                StatusCode::CONFLICT,
            ),
            (
                ApiError::Store(Error::RollbackTransaction),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (err, status) in cases {
            assert_eq!(err.into_response().status(), status);
        }
    }

    #[test]
    fn missing_row_classifies_as_not_found() {
        let err: ApiError = Error::NotFound.into();
        assert!(matches!(err, ApiError::NotFound(_)));
    }

    #[test]
    fn unique_violation_classifies_as_conflict() {
        let err: ApiError = Error::DatabaseError(
            DatabaseErrorKind::UniqueViolation,
            Box::new("duplicate key".to_string()),
        )
        .into();
        assert!(matches!(err, ApiError::Conflict(_)));
    }

    #[test]
    fn foreign_key_violation_classifies_as_conflict() {
        let err: ApiError = Error::DatabaseError(
            DatabaseErrorKind::ForeignKeyViolation,
            Box::new("violates foreign key".to_string()),
        )
        .into();
        assert!(matches!(err, ApiError::Conflict(_)));
    }

    #[test]
    fn other_store_errors_stay_internal() {
        let err: ApiError = Error::BrokenTransactionManager.into();
        assert!(matches!(err, ApiError::Store(_)));
        assert_eq!(
            err.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
