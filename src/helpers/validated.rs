//! `Json`/`Query` extractors that run `validator` rules through axum-valid and
//! answer every rejection with an [`ErrorResponse`] body.

use axum::{
    extract::{
        FromRequest, FromRequestParts, Query, Request,
        rejection::{JsonRejection, QueryRejection},
    },
    http::{StatusCode, request::Parts},
    response::Json,
};
use axum_valid::{Valid, ValidRejection};
use serde::de::DeserializeOwned;
use tracing::warn;
use validator::Validate;

use crate::helpers::errors::ApiError;
use crate::schemas::ErrorResponse;

/// A JSON body that deserialized and passed its validation rules.
#[derive(Debug)]
pub struct ValidJson<T>(pub T);

/// Query parameters that deserialized and passed their validation rules.
#[derive(Debug)]
pub struct ValidQuery<T>(pub T);

fn rejection_response(status: StatusCode, message: String) -> ApiError {
    let code = if status == StatusCode::BAD_REQUEST || status == StatusCode::UNPROCESSABLE_ENTITY {
        "VALIDATION_ERROR"
    } else {
        "INVALID_REQUEST"
    };
    warn!("Request rejected: {}", message);
    let status = if status == StatusCode::UNPROCESSABLE_ENTITY {
        StatusCode::BAD_REQUEST
    } else {
        status
    };
    (status, Json(ErrorResponse::new(message, code)))
}

fn json_rejection(rejection: ValidRejection<JsonRejection>) -> ApiError {
    match rejection {
        ValidRejection::Valid(errors) => {
            rejection_response(StatusCode::BAD_REQUEST, errors.to_string())
        }
        ValidRejection::Inner(inner) => rejection_response(inner.status(), inner.body_text()),
    }
}

fn query_rejection(rejection: ValidRejection<QueryRejection>) -> ApiError {
    match rejection {
        ValidRejection::Valid(errors) => {
            rejection_response(StatusCode::BAD_REQUEST, errors.to_string())
        }
        ValidRejection::Inner(inner) => rejection_response(inner.status(), inner.body_text()),
    }
}

#[axum::async_trait]
impl<S, T> FromRequest<S> for ValidJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Valid(Json(value)) = Valid::<Json<T>>::from_request(req, state)
            .await
            .map_err(json_rejection)?;
        Ok(Self(value))
    }
}

#[axum::async_trait]
impl<S, T> FromRequestParts<S> for ValidQuery<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Valid(Query(value)) = Valid::<Query<T>>::from_request_parts(parts, state)
            .await
            .map_err(query_rejection)?;
        Ok(Self(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsupported_media_type_keeps_its_status() {
        let (status, Json(body)) = rejection_response(
            StatusCode::UNSUPPORTED_MEDIA_TYPE,
            "Expected request with `Content-Type: application/json`".to_string(),
        );
        assert_eq!(status, StatusCode::UNSUPPORTED_MEDIA_TYPE);
        assert_eq!(body.code, "INVALID_REQUEST");
        assert!(!body.success);
    }

    #[test]
    fn test_unprocessable_body_becomes_bad_request() {
        let (status, Json(body)) =
            rejection_response(StatusCode::UNPROCESSABLE_ENTITY, "missing field `title`".into());
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body.code, "VALIDATION_ERROR");
    }
}
