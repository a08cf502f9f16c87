use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

/// Error type shared by the resource services and handlers
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("{0}")]
    Conflict(String),
    #[error("Insufficient permissions")]
    Forbidden,
    #[error("Database error: {0}")]
    Database(sqlx::Error),
    #[error("Internal server error")]
    Internal(#[from] anyhow::Error),
}

/// SQLSTATE 40001 means a concurrent transaction won a race this one lost;
/// surfacing it as a 409 lets the client retry instead of seeing a 500.
/// Postgres can raise it on any statement of a SERIALIZABLE transaction,
/// not just on commit, so the mapping lives in the conversion every `?` hits.
impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(ref db_err) = err {
            if db_err.code().as_deref() == Some("40001") {
                return ApiError::Conflict(
                    "Conflicting concurrent update, please retry".to_string(),
                );
            }
        }
        ApiError::Database(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            ApiError::Validation(_) => (StatusCode::BAD_REQUEST, "Validation failed"),
            ApiError::NotFound(_) => (StatusCode::NOT_FOUND, "Not found"),
            ApiError::Conflict(_) => (StatusCode::CONFLICT, "Conflict"),
            ApiError::Forbidden => (StatusCode::FORBIDDEN, "Insufficient permissions"),
            ApiError::Database(ref err) => {
                error!("database error: {err}");
                (StatusCode::INTERNAL_SERVER_ERROR, "Database error")
            }
            ApiError::Internal(ref err) => {
                error!("internal error: {err}");
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
            }
        };

        let body = Json(json!({
            "error": error_message,
            "message": self.to_string(),
        }));

        (status, body).into_response()
    }
}

/// Map a unique-constraint violation to a 409, everything else through the
/// standard conversion
pub fn conflict_on_unique(err: sqlx::Error, message: &str) -> ApiError {
    if let sqlx::Error::Database(ref db_err) = err {
        if db_err.code().as_deref() == Some("23505") {
            return ApiError::Conflict(message.to_string());
        }
    }
    err.into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::error::{DatabaseError, ErrorKind};
    use std::borrow::Cow;
    use std::error::Error as StdError;
    use std::fmt;

    #[derive(Debug)]
    struct FakePgError(&'static str);

    impl fmt::Display for FakePgError {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "SQLSTATE {}", self.0)
        }
    }

    impl StdError for FakePgError {}

    impl DatabaseError for FakePgError {
        fn message(&self) -> &str {
            "database error"
        }

        fn code(&self) -> Option<Cow<'_, str>> {
            Some(Cow::Borrowed(self.0))
        }

        fn as_error(&self) -> &(dyn StdError + Send + Sync + 'static) {
            self
        }

        fn as_error_mut(&mut self) -> &mut (dyn StdError + Send + Sync + 'static) {
            self
        }

        fn into_error(self: Box<Self>) -> Box<dyn StdError + Send + Sync + 'static> {
            self
        }

        fn kind(&self) -> ErrorKind {
            ErrorKind::Other
        }
    }

    fn db_error(code: &'static str) -> sqlx::Error {
        sqlx::Error::Database(Box::new(FakePgError(code)))
    }

    #[test]
    fn test_serialization_failure_becomes_conflict() {
        assert!(matches!(
            ApiError::from(db_error("40001")),
            ApiError::Conflict(_)
        ));
    }

    #[test]
    fn test_other_database_errors_stay_internal() {
        assert!(matches!(
            ApiError::from(db_error("23503")),
            ApiError::Database(_)
        ));
        assert!(matches!(
            ApiError::from(sqlx::Error::RowNotFound),
            ApiError::Database(_)
        ));
    }

    #[test]
    fn test_unique_violation_becomes_conflict() {
        let err = conflict_on_unique(db_error("23505"), "Already taken");
        assert!(matches!(err, ApiError::Conflict(ref msg) if msg == "Already taken"));

        assert!(matches!(
            conflict_on_unique(db_error("40001"), "Already taken"),
            ApiError::Conflict(ref msg) if msg == "Conflicting concurrent update, please retry"
        ));
    }
}
