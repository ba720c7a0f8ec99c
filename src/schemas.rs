use std::time::Duration;

pub use common::{ApiResponse, ErrorResponse};
use common::{
    AccountSummary, CategoryDto, FollowDto, HashTagDto, ProductDetailDto, ProductDto, ProfileDto,
};
use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};
use utoipa::{OpenApi, ToSchema};

use crate::handlers::accounts::{
    ChangePasswordRequest, LoginRequest, ResignRequest, SignupRequest, UpdateProfileRequest,
};
use crate::handlers::products::{CreateProductRequest, LikeResponse, UpdateProductRequest};

/// Application state shared across handlers
#[derive(Clone, Debug)]
pub struct AppState {
    /// Database connection
    pub db: DatabaseConnection,
    /// Upper bound for a single request
    pub request_timeout: Duration,
}

/// Health check response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    /// Service status
    pub status: String,
    /// Service version
    pub version: String,
    /// Database connection status
    pub database: String,
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::health::health_check,
        crate::handlers::accounts::signup,
        crate::handlers::accounts::login,
        crate::handlers::accounts::get_profile,
        crate::handlers::accounts::update_profile,
        crate::handlers::accounts::change_password,
        crate::handlers::accounts::resign,
        crate::handlers::accounts::follow,
        crate::handlers::products::list_products,
        crate::handlers::products::create_product,
        crate::handlers::products::get_product,
        crate::handlers::products::update_product,
        crate::handlers::products::delete_product,
        crate::handlers::products::like_product,
        crate::handlers::products::unlike_product,
        crate::handlers::categories::list_categories,
    ),
    components(
        schemas(
            ApiResponse<AccountSummary>,
            ApiResponse<ProfileDto>,
            ApiResponse<FollowDto>,
            ApiResponse<ProductDto>,
            ApiResponse<Vec<ProductDto>>,
            ApiResponse<ProductDetailDto>,
            ApiResponse<Vec<CategoryDto>>,
            ApiResponse<LikeResponse>,
            ErrorResponse,
            HealthResponse,
            AccountSummary,
            ProfileDto,
            FollowDto,
            ProductDto,
            ProductDetailDto,
            CategoryDto,
            HashTagDto,
            LikeResponse,
            SignupRequest,
            LoginRequest,
            UpdateProfileRequest,
            ChangePasswordRequest,
            ResignRequest,
            CreateProductRequest,
            UpdateProductRequest,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "accounts", description = "Signup, login, profiles and follows"),
        (name = "products", description = "Product listings and likes"),
        (name = "categories", description = "Product categories"),
    ),
    info(
        title = "SpartaMarket API",
        description = "Second-hand marketplace API - member accounts, follows, product listings, likes and hashtags",
        version = "0.1.0",
        license(
            name = "MIT",
            url = "https://opensource.org/licenses/MIT"
        )
    )
)]
pub struct ApiDoc;
