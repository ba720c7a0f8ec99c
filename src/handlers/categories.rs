use axum::{extract::State, response::Json};
use common::CategoryDto;
use market::categories;
use tracing::{debug, instrument};

use crate::helpers::errors::{ApiError, error_response};
use crate::schemas::{ApiResponse, AppState, ErrorResponse};

/// List all product categories
#[utoipa::path(
    get,
    path = "/api/v1/products/categories",
    tag = "categories",
    responses(
        (status = 200, description = "Categories retrieved successfully", body = ApiResponse<Vec<CategoryDto>>),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn list_categories(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<CategoryDto>>>, ApiError> {
    let found = categories::list_categories(&state.db)
        .await
        .map_err(error_response)?;
    debug!("Retrieved {} categories", found.len());

    let data = found.iter().map(categories::category_dto).collect();
    Ok(Json(ApiResponse::ok(data, "Categories retrieved successfully")))
}
