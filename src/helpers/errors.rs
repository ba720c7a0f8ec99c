use axum::{http::StatusCode, response::Json};
use market::MarketError;
use tracing::{error, warn};

use crate::schemas::ErrorResponse;

/// Error half of every handler result.
pub type ApiError = (StatusCode, Json<ErrorResponse>);

/// Maps a core error to its HTTP status and response body.
///
/// Server-side failures are logged with their cause but answered with a
/// generic message.
pub fn error_response(err: MarketError) -> ApiError {
    let (status, code) = match &err {
        MarketError::Validation(_) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
        MarketError::Uniqueness(_) => (StatusCode::CONFLICT, "ALREADY_EXISTS"),
        MarketError::Authentication(_) => (StatusCode::BAD_REQUEST, "AUTHENTICATION_FAILED"),
        MarketError::Policy(_) => (StatusCode::BAD_REQUEST, "PASSWORD_POLICY"),
        MarketError::Authorization(_) => (StatusCode::FORBIDDEN, "FORBIDDEN"),
        MarketError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
        MarketError::Database(_) => (StatusCode::INTERNAL_SERVER_ERROR, "DATABASE_ERROR"),
        MarketError::PasswordHash(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
    };

    let message = if status.is_server_error() {
        error!("Request failed: {}", err);
        "Internal server error".to_string()
    } else {
        warn!("Request rejected: {}", err);
        err.to_string()
    };

    (status, Json(ErrorResponse::new(message, code)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::DbErr;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (MarketError::Validation("bad".into()), StatusCode::BAD_REQUEST),
            (MarketError::Uniqueness("dup".into()), StatusCode::CONFLICT),
            (MarketError::Authentication("no".into()), StatusCode::BAD_REQUEST),
            (MarketError::Policy("weak".into()), StatusCode::BAD_REQUEST),
            (MarketError::Authorization("mine".into()), StatusCode::FORBIDDEN),
            (MarketError::NotFound("gone".into()), StatusCode::NOT_FOUND),
        ];
        for (err, expected) in cases {
            let (status, Json(body)) = error_response(err);
            assert_eq!(status, expected);
            assert!(!body.success);
        }
    }

    #[test]
    fn test_database_errors_are_opaque() {
        let (status, Json(body)) =
            error_response(MarketError::Database(DbErr::Custom("secret detail".into())));
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body.code, "DATABASE_ERROR");
        assert!(!body.error.contains("secret detail"));
    }
}
