use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use diesel::result::DatabaseErrorKind;
use thiserror::Error;

use crate::api::ErrorResponse;

/// Request-scoped error taxonomy. Every variant aborts exactly one request;
/// nothing here is fatal to the process.
#[derive(Error, Debug)]
pub enum ApiError {
    /// Malformed input: empty or duplicated ingredients, bad amounts,
    /// oversized names, invalid tag selections, self-follow attempts.
    #[error("{0}")]
    Validation(String),

    /// The request was well-formed but the state already satisfies it
    /// (duplicate favorite, cart entry, follow, or catalog row).
    #[error("{0}")]
    Conflict(String),

    /// The referenced recipe, user, or relation does not exist.
    #[error("{0}")]
    NotFound(String),

    /// The caller is authenticated but does not own the resource.
    #[error("{0}")]
    Forbidden(String),

    #[error("database error: {0}")]
    Database(diesel::result::Error),

    #[error("database connection failed: {0}")]
    Pool(#[from] diesel::r2d2::PoolError),
}

impl From<diesel::result::Error> for ApiError {
    fn from(err: diesel::result::Error) -> Self {
        // The unique constraint is the authoritative race guard: a lost race
        // between two identical requests surfaces here and must read the
        // same as a pre-checked duplicate.
        match err {
            diesel::result::Error::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                ApiError::Conflict("Already exists".to_string())
            }
            diesel::result::Error::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, _) => {
                ApiError::NotFound("Referenced row does not exist".to_string())
            }
            other => ApiError::Database(other),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ApiError::Validation(reason) => (StatusCode::BAD_REQUEST, reason.clone()),
            ApiError::Conflict(reason) => (StatusCode::CONFLICT, reason.clone()),
            ApiError::NotFound(reason) => (StatusCode::NOT_FOUND, reason.clone()),
            ApiError::Forbidden(reason) => (StatusCode::FORBIDDEN, reason.clone()),
            ApiError::Database(e) => {
                tracing::error!("database error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
            ApiError::Pool(e) => {
                tracing::error!("connection pool error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Database connection failed".to_string(),
                )
            }
        };

        (status, Json(ErrorResponse { error: message })).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FakeConstraint;

    impl diesel::result::DatabaseErrorInformation for FakeConstraint {
        fn message(&self) -> &str {
            "duplicate key value violates unique constraint"
        }
        fn details(&self) -> Option<&str> {
            None
        }
        fn hint(&self) -> Option<&str> {
            None
        }
        fn table_name(&self) -> Option<&str> {
            Some("favorites")
        }
        fn column_name(&self) -> Option<&str> {
            None
        }
        fn constraint_name(&self) -> Option<&str> {
            Some("favorites_unique")
        }
        fn statement_position(&self) -> Option<i32> {
            None
        }
    }

    #[test]
    fn unique_violation_maps_to_conflict() {
        let err = diesel::result::Error::DatabaseError(
            DatabaseErrorKind::UniqueViolation,
            Box::new(FakeConstraint),
        );
        assert!(matches!(ApiError::from(err), ApiError::Conflict(_)));
    }

    #[test]
    fn other_database_errors_stay_internal() {
        let err = diesel::result::Error::NotFound;
        assert!(matches!(ApiError::from(err), ApiError::Database(_)));
    }
}
