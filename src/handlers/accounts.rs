use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use common::{AccountSummary, FollowDto, ProfileDto};
use market::accounts::{self as account_ops, NewAccount, ProfileChanges};
use market::associations;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, trace};
use utoipa::ToSchema;
use validator::Validate;

use crate::helpers::errors::{ApiError, error_response};
use crate::helpers::validated::{ValidJson};
use crate::identity::CurrentAccount;
use crate::schemas::{ApiResponse, AppState, ErrorResponse};

/// Request body for signing up
#[derive(Debug, Deserialize, Serialize, ToSchema, Validate)]
pub struct SignupRequest {
    /// Login email (must be unique)
    #[validate(email)]
    pub email: String,
    #[validate(must_match(other = "password2", message = "Passwords do not match"))]
    pub password: String,
    /// Repeat of `password`
    pub password2: String,
    /// Public display name (must be unique)
    #[validate(length(min = 1, max = 150))]
    pub username: String,
    pub profile_image: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, ToSchema, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1))]
    pub email: String,
    #[validate(length(min = 1))]
    pub password: String,
}

/// Request body for updating the own profile. Absent fields stay unchanged.
#[derive(Debug, Deserialize, Serialize, ToSchema, Validate)]
pub struct UpdateProfileRequest {
    #[validate(length(min = 1, max = 150))]
    pub username: Option<String>,
    pub profile_image: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, ToSchema, Validate)]
pub struct ChangePasswordRequest {
    #[validate(length(min = 1))]
    pub old_password: String,
    #[validate(length(min = 1))]
    pub new_password: String,
}

#[derive(Debug, Deserialize, Serialize, ToSchema, Validate)]
pub struct ResignRequest {
    #[validate(length(min = 1))]
    pub password: String,
}

/// Register a new member
#[utoipa::path(
    post,
    path = "/api/v1/accounts/signup",
    tag = "accounts",
    request_body = SignupRequest,
    responses(
        (status = 201, description = "Account created", body = ApiResponse<AccountSummary>),
        (status = 400, description = "Invalid input or weak password", body = ErrorResponse),
        (status = 409, description = "Email or username already taken", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state, request), fields(email = %request.email))]
pub async fn signup(
    State(state): State<AppState>,
    ValidJson(request): ValidJson<SignupRequest>,
) -> Result<(StatusCode, Json<ApiResponse<AccountSummary>>), ApiError> {
    trace!("Entering signup function");

    let new = NewAccount {
        email: request.email,
        username: request.username,
        password: request.password,
        profile_image: request.profile_image,
    };

    let created = account_ops::create_account(&state.db, new)
        .await
        .map_err(error_response)?;

    info!("Signed up account {}", created.id);
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(
            account_ops::summary(&created),
            "Signup successful",
        )),
    ))
}

/// Verify credentials
///
/// Token issuance happens in the gateway; this endpoint only confirms the
/// credentials and returns the account the token should be issued for.
#[utoipa::path(
    post,
    path = "/api/v1/accounts/login",
    tag = "accounts",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Credentials verified", body = ApiResponse<AccountSummary>),
        (status = 400, description = "Invalid email or password", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state, request), fields(email = %request.email))]
pub async fn login(
    State(state): State<AppState>,
    ValidJson(request): ValidJson<LoginRequest>,
) -> Result<Json<ApiResponse<AccountSummary>>, ApiError> {
    trace!("Entering login function");

    match account_ops::authenticate(&state.db, &request.email, &request.password).await {
        Ok(found) => {
            info!("Account {} logged in", found.id);
            Ok(Json(ApiResponse::ok(
                account_ops::summary(&found),
                "Login successful",
            )))
        }
        Err(err) => Err(error_response(err)),
    }
}

/// Get the caller's profile with follow lists and counts
#[utoipa::path(
    get,
    path = "/api/v1/accounts/profile",
    tag = "accounts",
    params(("x-account-id" = i32, Header, description = "Authenticated account ID")),
    responses(
        (status = 200, description = "Profile retrieved", body = ApiResponse<ProfileDto>),
        (status = 401, description = "Not authenticated", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip_all, fields(account = me.id))]
pub async fn get_profile(
    State(state): State<AppState>,
    CurrentAccount(me): CurrentAccount,
) -> Result<Json<ApiResponse<ProfileDto>>, ApiError> {
    trace!("Entering get_profile function");

    let profile = account_ops::profile(&state.db, &me)
        .await
        .map_err(error_response)?;

    debug!(
        "Profile {} has {} follower(s), {} following",
        me.id, profile.follower_count, profile.following_count
    );
    Ok(Json(ApiResponse::ok(profile, "Profile retrieved successfully")))
}

/// Update the caller's username or profile image
#[utoipa::path(
    put,
    path = "/api/v1/accounts/profile",
    tag = "accounts",
    request_body = UpdateProfileRequest,
    params(("x-account-id" = i32, Header, description = "Authenticated account ID")),
    responses(
        (status = 200, description = "Profile updated", body = ApiResponse<AccountSummary>),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 401, description = "Not authenticated", body = ErrorResponse),
        (status = 409, description = "Username already taken", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip_all, fields(account = me.id))]
pub async fn update_profile(
    State(state): State<AppState>,
    CurrentAccount(me): CurrentAccount,
    ValidJson(request): ValidJson<UpdateProfileRequest>,
) -> Result<Json<ApiResponse<AccountSummary>>, ApiError> {
    trace!("Entering update_profile function");

    let changes = ProfileChanges {
        username: request.username,
        profile_image: request.profile_image,
    };
    let updated = account_ops::update_profile(&state.db, &me, changes)
        .await
        .map_err(error_response)?;

    Ok(Json(ApiResponse::ok(
        account_ops::summary(&updated),
        "Profile updated successfully",
    )))
}

/// Change the caller's password
#[utoipa::path(
    post,
    path = "/api/v1/accounts/change-password",
    tag = "accounts",
    request_body = ChangePasswordRequest,
    params(("x-account-id" = i32, Header, description = "Authenticated account ID")),
    responses(
        (status = 200, description = "Password changed", body = ApiResponse<AccountSummary>),
        (status = 400, description = "Wrong current password or weak new password", body = ErrorResponse),
        (status = 401, description = "Not authenticated", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip_all, fields(account = me.id))]
pub async fn change_password(
    State(state): State<AppState>,
    CurrentAccount(me): CurrentAccount,
    ValidJson(request): ValidJson<ChangePasswordRequest>,
) -> Result<Json<ApiResponse<AccountSummary>>, ApiError> {
    trace!("Entering change_password function");

    let updated = account_ops::change_password(
        &state.db,
        &me,
        &request.old_password,
        &request.new_password,
    )
    .await
    .map_err(error_response)?;

    Ok(Json(ApiResponse::ok(
        account_ops::summary(&updated),
        "Password changed successfully",
    )))
}

/// Delete the caller's account after confirming the password
#[utoipa::path(
    delete,
    path = "/api/v1/accounts/resign",
    tag = "accounts",
    request_body = ResignRequest,
    params(("x-account-id" = i32, Header, description = "Authenticated account ID")),
    responses(
        (status = 204, description = "Account deleted"),
        (status = 400, description = "Password does not match", body = ErrorResponse),
        (status = 401, description = "Not authenticated", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip_all, fields(account = me.id))]
pub async fn resign(
    State(state): State<AppState>,
    CurrentAccount(me): CurrentAccount,
    ValidJson(request): ValidJson<ResignRequest>,
) -> Result<StatusCode, ApiError> {
    trace!("Entering resign function");

    account_ops::resign(&state.db, &me, &request.password)
        .await
        .map_err(error_response)?;

    info!("Account {} resigned", me.id);
    Ok(StatusCode::NO_CONTENT)
}

/// Follow or unfollow another account
#[utoipa::path(
    post,
    path = "/api/v1/accounts/{account_id}/follow",
    tag = "accounts",
    params(
        ("account_id" = i32, Path, description = "Account to follow or unfollow"),
        ("x-account-id" = i32, Header, description = "Authenticated account ID")
    ),
    responses(
        (status = 200, description = "Follow state toggled", body = ApiResponse<FollowDto>),
        (status = 401, description = "Not authenticated", body = ErrorResponse),
        (status = 403, description = "Cannot follow yourself", body = ErrorResponse),
        (status = 404, description = "Account not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip_all, fields(account = me.id))]
pub async fn follow(
    State(state): State<AppState>,
    CurrentAccount(me): CurrentAccount,
    Path(account_id): Path<i32>,
) -> Result<Json<ApiResponse<FollowDto>>, ApiError> {
    trace!("Entering follow function");

    let target = account_ops::find_account(&state.db, account_id)
        .await
        .map_err(error_response)?;

    let outcome = associations::toggle_follow(&state.db, &me, &target)
        .await
        .map_err(error_response)?;

    let message = if outcome.is_followed() {
        format!("Now following {}", target.email)
    } else {
        format!("Unfollowed {}", target.email)
    };

    Ok(Json(ApiResponse::ok(
        FollowDto {
            is_followed: outcome.is_followed(),
            target: account_ops::summary(&target),
        },
        message,
    )))
}
