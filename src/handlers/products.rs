use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use common::{ProductDetailDto, ProductDto};
use market::products::{self as product_ops, NewProduct, ProductChanges};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, trace};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::helpers::errors::{ApiError, error_response};
use crate::helpers::validated::{ValidJson, ValidQuery};
use crate::identity::CurrentAccount;
use crate::schemas::{ApiResponse, AppState, ErrorResponse};

const DEFAULT_PAGE_SIZE: u64 = 5;

/// Query parameters for listing products
#[derive(Debug, Deserialize, ToSchema, IntoParams, Validate)]
#[into_params(parameter_in = Query)]
pub struct ProductListQuery {
    /// Page number (default: 1)
    #[validate(range(min = 1, max = 10000))]
    pub page: Option<u64>,
    /// Page size (default: 5)
    #[validate(range(min = 1, max = 100))]
    pub limit: Option<u64>,
}

/// Request body for listing a product. Hashtags are taken from `content`.
#[derive(Debug, Deserialize, Serialize, ToSchema, Validate)]
pub struct CreateProductRequest {
    #[validate(length(min = 1, max = 50))]
    pub title: String,
    /// Free text; every `#tag` in it becomes a hashtag of the product
    pub content: String,
    #[validate(length(min = 1, max = 100))]
    pub product_name: String,
    pub price: u32,
    pub quantity: u32,
    pub image: Option<String>,
    /// Category ID
    pub category: i32,
}

/// Request body for editing a product. Absent fields stay unchanged.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema, Validate)]
pub struct UpdateProductRequest {
    #[validate(length(min = 1, max = 50))]
    pub title: Option<String>,
    pub content: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub product_name: Option<String>,
    pub price: Option<u32>,
    pub quantity: Option<u32>,
    pub image: Option<String>,
    pub category: Option<i32>,
}

/// Like state of a product after a like or unlike
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct LikeResponse {
    pub product_id: i32,
    pub like_user_counter: u64,
}

/// List products, newest first
#[utoipa::path(
    get,
    path = "/api/v1/products",
    tag = "products",
    params(ProductListQuery),
    responses(
        (status = 200, description = "Products retrieved successfully", body = ApiResponse<Vec<ProductDto>>),
        (status = 400, description = "Invalid paging parameters", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn list_products(
    ValidQuery(query): ValidQuery<ProductListQuery>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<ProductDto>>>, ApiError> {
    trace!("Entering list_products function");

    let page = query.page.unwrap_or(1);
    let limit = query.limit.unwrap_or(DEFAULT_PAGE_SIZE);
    debug!("Fetching products - page: {}, limit: {}", page, limit);

    let products = product_ops::list_products(&state.db, page, limit)
        .await
        .map_err(error_response)?;

    let mut data = Vec::with_capacity(products.len());
    for product in &products {
        data.push(
            product_ops::product_dto(&state.db, product)
                .await
                .map_err(error_response)?,
        );
    }

    debug!("Returning {} product(s)", data.len());
    Ok(Json(ApiResponse::ok(data, "Products retrieved successfully")))
}

/// List a new product as the caller
#[utoipa::path(
    post,
    path = "/api/v1/products",
    tag = "products",
    request_body = CreateProductRequest,
    params(("x-account-id" = i32, Header, description = "Authenticated account ID")),
    responses(
        (status = 201, description = "Product created", body = ApiResponse<ProductDto>),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 401, description = "Not authenticated", body = ErrorResponse),
        (status = 404, description = "Category not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip_all, fields(account = me.id))]
pub async fn create_product(
    State(state): State<AppState>,
    CurrentAccount(me): CurrentAccount,
    ValidJson(request): ValidJson<CreateProductRequest>,
) -> Result<(StatusCode, Json<ApiResponse<ProductDto>>), ApiError> {
    trace!("Entering create_product function");

    let new = NewProduct {
        title: request.title,
        content: request.content,
        product_name: request.product_name,
        price: request.price,
        quantity: request.quantity,
        image: request.image,
        category_id: request.category,
    };

    let created = product_ops::create_product(&state.db, &me, new)
        .await
        .map_err(error_response)?;
    let dto = product_ops::product_dto(&state.db, &created)
        .await
        .map_err(error_response)?;

    info!("Product {} created by account {}", created.id, me.id);
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(dto, "Product created successfully")),
    ))
}

/// Get a product and count the view
#[utoipa::path(
    get,
    path = "/api/v1/products/{product_id}",
    tag = "products",
    params(("product_id" = i32, Path, description = "Product ID")),
    responses(
        (status = 200, description = "Product retrieved; views include this request", body = ApiResponse<ProductDetailDto>),
        (status = 404, description = "Product not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_product(
    Path(product_id): Path<i32>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<ProductDetailDto>>, ApiError> {
    trace!("Entering get_product function");

    let views = product_ops::record_view(&state.db, product_id)
        .await
        .map_err(error_response)?;
    let product = product_ops::get_product(&state.db, product_id)
        .await
        .map_err(error_response)?;
    let dto = product_ops::product_dto(&state.db, &product)
        .await
        .map_err(error_response)?;

    Ok(Json(ApiResponse::ok(
        ProductDetailDto { product: dto, views },
        "Product retrieved successfully",
    )))
}

/// Edit a product. Only its author may do this.
#[utoipa::path(
    put,
    path = "/api/v1/products/{product_id}",
    tag = "products",
    request_body = UpdateProductRequest,
    params(
        ("product_id" = i32, Path, description = "Product ID"),
        ("x-account-id" = i32, Header, description = "Authenticated account ID")
    ),
    responses(
        (status = 200, description = "Product updated", body = ApiResponse<ProductDto>),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 401, description = "Not authenticated", body = ErrorResponse),
        (status = 403, description = "Caller is not the author", body = ErrorResponse),
        (status = 404, description = "Product or category not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip_all, fields(account = me.id, product = product_id))]
pub async fn update_product(
    State(state): State<AppState>,
    CurrentAccount(me): CurrentAccount,
    Path(product_id): Path<i32>,
    ValidJson(request): ValidJson<UpdateProductRequest>,
) -> Result<Json<ApiResponse<ProductDto>>, ApiError> {
    trace!("Entering update_product function");

    let changes = ProductChanges {
        title: request.title,
        content: request.content,
        product_name: request.product_name,
        price: request.price,
        quantity: request.quantity,
        image: request.image,
        category_id: request.category,
    };

    let updated = product_ops::update_product(&state.db, &me, product_id, changes)
        .await
        .map_err(error_response)?;
    let dto = product_ops::product_dto(&state.db, &updated)
        .await
        .map_err(error_response)?;

    Ok(Json(ApiResponse::ok(dto, "Product updated successfully")))
}

/// Delete a product. Only its author may do this.
#[utoipa::path(
    delete,
    path = "/api/v1/products/{product_id}",
    tag = "products",
    params(
        ("product_id" = i32, Path, description = "Product ID"),
        ("x-account-id" = i32, Header, description = "Authenticated account ID")
    ),
    responses(
        (status = 204, description = "Product deleted"),
        (status = 401, description = "Not authenticated", body = ErrorResponse),
        (status = 403, description = "Caller is not the author", body = ErrorResponse),
        (status = 404, description = "Product not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip_all, fields(account = me.id, product = product_id))]
pub async fn delete_product(
    State(state): State<AppState>,
    CurrentAccount(me): CurrentAccount,
    Path(product_id): Path<i32>,
) -> Result<StatusCode, ApiError> {
    trace!("Entering delete_product function");

    product_ops::delete_product(&state.db, &me, product_id)
        .await
        .map_err(error_response)?;

    Ok(StatusCode::NO_CONTENT)
}

/// Like a product
#[utoipa::path(
    post,
    path = "/api/v1/products/{product_id}/like",
    tag = "products",
    params(
        ("product_id" = i32, Path, description = "Product ID"),
        ("x-account-id" = i32, Header, description = "Authenticated account ID")
    ),
    responses(
        (status = 200, description = "Product liked", body = ApiResponse<LikeResponse>),
        (status = 401, description = "Not authenticated", body = ErrorResponse),
        (status = 403, description = "Cannot like your own product", body = ErrorResponse),
        (status = 404, description = "Product not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip_all, fields(account = me.id, product = product_id))]
pub async fn like_product(
    State(state): State<AppState>,
    CurrentAccount(me): CurrentAccount,
    Path(product_id): Path<i32>,
) -> Result<Json<ApiResponse<LikeResponse>>, ApiError> {
    trace!("Entering like_product function");

    let like_user_counter = product_ops::like_product(&state.db, &me, product_id)
        .await
        .map_err(error_response)?;

    Ok(Json(ApiResponse::ok(
        LikeResponse {
            product_id,
            like_user_counter,
        },
        "Liked successfully",
    )))
}

/// Remove the caller's like from a product
#[utoipa::path(
    delete,
    path = "/api/v1/products/{product_id}/like",
    tag = "products",
    params(
        ("product_id" = i32, Path, description = "Product ID"),
        ("x-account-id" = i32, Header, description = "Authenticated account ID")
    ),
    responses(
        (status = 200, description = "Like removed", body = ApiResponse<LikeResponse>),
        (status = 401, description = "Not authenticated", body = ErrorResponse),
        (status = 403, description = "Cannot unlike your own product", body = ErrorResponse),
        (status = 404, description = "Product not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip_all, fields(account = me.id, product = product_id))]
pub async fn unlike_product(
    State(state): State<AppState>,
    CurrentAccount(me): CurrentAccount,
    Path(product_id): Path<i32>,
) -> Result<Json<ApiResponse<LikeResponse>>, ApiError> {
    trace!("Entering unlike_product function");

    let like_user_counter = product_ops::unlike_product(&state.db, &me, product_id)
        .await
        .map_err(error_response)?;

    Ok(Json(ApiResponse::ok(
        LikeResponse {
            product_id,
            like_user_counter,
        },
        "Unliked successfully",
    )))
}
