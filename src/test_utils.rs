use crate::identity::ACCOUNT_HEADER;
use crate::router::create_router;
use crate::schemas::{ApiResponse, AppState};
use axum::Router;
use axum::http::StatusCode;
use axum_test::TestServer;
use common::AccountSummary;
use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection};
use serde_json::json;
use std::time::Duration;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

/// Password that passes the policy for every fixture username.
pub const TEST_PASSWORD: &str = "Str0ng-enough-pass";

/// Create an in-memory SQLite database for testing
pub async fn setup_test_db() -> DatabaseConnection {
    let mut options = ConnectOptions::new("sqlite::memory:");
    // A second pooled connection would open a different, empty database
    options.max_connections(1).sqlx_logging(false);

    let db = Database::connect(options)
        .await
        .expect("Failed to connect to in-memory database");
    db.execute_unprepared("PRAGMA foreign_keys = ON")
        .await
        .expect("Failed to enable foreign keys");

    Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");

    db
}

/// Create AppState for testing, with the categories `Electronics` and `Clothing`
pub async fn setup_test_app_state() -> AppState {
    let db = setup_test_db().await;

    for name in ["Electronics", "Clothing"] {
        market::categories::create_category(&db, name)
            .await
            .expect("Failed to create test category");
    }

    AppState {
        db,
        request_timeout: Duration::from_secs(30),
    }
}

/// Initialize tracing for tests with output to STDERR.
///
/// The log level is taken from `RUST_LOG`, defaulting to WARN.
fn init_test_tracing() -> tracing::subscriber::DefaultGuard {
    let log_level = std::env::var("RUST_LOG")
        .ok()
        .and_then(|level| level.parse::<Level>().ok())
        .unwrap_or(Level::WARN);

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_default(subscriber)
}

/// Create axum app for testing
pub async fn setup_test_app() -> Router {
    let _guard = init_test_tracing();

    let state = setup_test_app_state().await;
    create_router(state)
}

pub async fn setup_test_server() -> TestServer {
    TestServer::new(setup_test_app().await).expect("Failed to start test server")
}

/// Signs up `username` with `TEST_PASSWORD` and returns the new account id.
pub async fn signup_member(server: &TestServer, username: &str) -> i32 {
    let response = server
        .post("/api/v1/accounts/signup")
        .json(&json!({
            "email": format!("{username}@example.com"),
            "password": TEST_PASSWORD,
            "password2": TEST_PASSWORD,
            "username": username,
        }))
        .await;
    response.assert_status(StatusCode::CREATED);

    let body: ApiResponse<AccountSummary> = response.json();
    body.data.id
}

/// Value for the identity header of `account_id`.
pub fn as_account(account_id: i32) -> (axum::http::HeaderName, axum::http::HeaderValue) {
    (
        axum::http::HeaderName::from_static(ACCOUNT_HEADER),
        axum::http::HeaderValue::from(account_id),
    )
}
