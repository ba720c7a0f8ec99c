//! Who is calling. The authenticating gateway in front of the API resolves the
//! bearer token and forwards the account id in [`ACCOUNT_HEADER`].

use axum::{
    extract::{FromRef, FromRequestParts},
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Json, Response},
};
use market::MarketError;
use model::entities::account;
use thiserror::Error;
use tracing::{debug, error, warn};

use crate::schemas::{AppState, ErrorResponse};

pub const ACCOUNT_HEADER: &str = "x-account-id";

/// The active account making the request.
#[derive(Debug, Clone)]
pub struct CurrentAccount(pub account::Model);

#[derive(Debug, Error)]
pub enum IdentityError {
    #[error("Missing x-account-id header")]
    Missing,
    #[error("Malformed account id '{0}'")]
    Malformed(String),
    #[error("Unknown or inactive account {0}")]
    Unknown(i32),
    #[error("Account lookup failed: {0}")]
    Lookup(MarketError),
}

impl IntoResponse for IdentityError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            IdentityError::Lookup(err) => {
                error!("Identity lookup failed: {}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "DATABASE_ERROR",
                    "Internal server error".to_string(),
                )
            }
            _ => (StatusCode::UNAUTHORIZED, "UNAUTHENTICATED", self.to_string()),
        };
        (status, Json(ErrorResponse::new(message, code))).into_response()
    }
}

#[axum::async_trait]
impl<S> FromRequestParts<S> for CurrentAccount
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = IdentityError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let state = AppState::from_ref(state);

        let raw = parts
            .headers
            .get(ACCOUNT_HEADER)
            .ok_or(IdentityError::Missing)?
            .to_str()
            .map_err(|_| IdentityError::Malformed("<non-ascii>".to_string()))?;

        let id: i32 = raw
            .trim()
            .parse()
            .map_err(|_| IdentityError::Malformed(raw.to_string()))?;

        match market::accounts::find_account(&state.db, id).await {
            Ok(found) if found.is_active => {
                debug!("Request made by account {}", found.id);
                Ok(CurrentAccount(found))
            }
            Ok(_) | Err(MarketError::NotFound(_)) => {
                warn!("Rejected identity for account {}", id);
                Err(IdentityError::Unknown(id))
            }
            Err(err) => Err(IdentityError::Lookup(err)),
        }
    }
}
