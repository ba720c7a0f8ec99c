use crate::handlers::{
    accounts::{change_password, follow, get_profile, login, resign, signup, update_profile},
    categories::list_categories,
    health::health_check,
    products::{
        create_product, delete_product, get_product, like_product, list_products, unlike_product,
        update_product,
    },
};
use crate::schemas::{ApiDoc, AppState};
use axum::{
    Router,
    routing::{delete, get, post, put},
};
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer, cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Create application router with all routes and middleware
pub fn create_router(state: AppState) -> Router {
    let timeout = state.request_timeout;

    Router::new()
        // Health check
        .route("/health", get(health_check))
        // Accounts
        .route("/api/v1/accounts/signup", post(signup))
        .route("/api/v1/accounts/login", post(login))
        .route("/api/v1/accounts/profile", get(get_profile).put(update_profile))
        .route("/api/v1/accounts/change-password", post(change_password))
        .route("/api/v1/accounts/resign", delete(resign))
        .route("/api/v1/accounts/:account_id/follow", post(follow))
        // Products
        .route("/api/v1/products", get(list_products).post(create_product))
        .route("/api/v1/products/categories", get(list_categories))
        .route("/api/v1/products/:product_id", get(get_product))
        .route("/api/v1/products/:product_id", put(update_product))
        .route("/api/v1/products/:product_id", delete(delete_product))
        .route(
            "/api/v1/products/:product_id/like",
            post(like_product).delete(unlike_product),
        )
        // Swagger UI
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        // Add middleware
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CompressionLayer::new())
                .layer(TimeoutLayer::new(timeout))
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}
