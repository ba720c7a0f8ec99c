//! Shared fixtures for the market unit tests.

use chrono::Utc;
use migration::{Migrator, MigratorTrait};
use model::entities::{account, category, product};
use sea_orm::{ActiveModelTrait, ConnectOptions, ConnectionTrait, Database, DatabaseConnection, Set};
use tempfile::TempDir;

/// Passes the password policy for every username the fixtures use.
pub const TEST_PASSWORD: &str = "Str0ng-enough-pass";

/// Fresh in-memory SQLite with all migrations applied and foreign keys enforced.
pub async fn setup_db() -> DatabaseConnection {
    let mut options = ConnectOptions::new("sqlite::memory:");
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

/// File-backed SQLite behind a pool of several connections, so concurrent
/// tasks really run against separate connections. Keep the returned
/// directory alive for as long as the database is used.
pub async fn setup_pooled_db() -> (TempDir, DatabaseConnection) {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let url = format!("sqlite://{}?mode=rwc", dir.path().join("market.db").display());

    let mut options = ConnectOptions::new(url);
    options
        .min_connections(4)
        .max_connections(4)
        .sqlx_logging(false);

    let db = Database::connect(options)
        .await
        .expect("Failed to connect to file database");
    Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");
    (dir, db)
}

/// Inserts an active member directly, skipping hashing.
pub async fn create_member(db: &DatabaseConnection, username: &str) -> account::Model {
    account::ActiveModel {
        email: Set(format!("{username}@example.com")),
        username: Set(username.to_string()),
        password: Set("not-a-real-hash".to_string()),
        profile_image: Set(None),
        is_staff: Set(false),
        is_superuser: Set(false),
        is_active: Set(true),
        date_joined: Set(Utc::now()),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("Failed to create member")
}

pub async fn create_category(db: &DatabaseConnection, name: &str) -> category::Model {
    category::ActiveModel {
        name: Set(name.to_string()),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("Failed to create category")
}

/// Inserts a product row without going through hashtag extraction.
pub async fn insert_product(
    db: &DatabaseConnection,
    author: &account::Model,
    category: &category::Model,
    title: &str,
) -> product::Model {
    product::ActiveModel {
        title: Set(title.to_string()),
        content: Set(format!("{title} description")),
        product_name: Set(title.to_string()),
        price: Set(1000),
        quantity: Set(1),
        image: Set(None),
        views: Set(0),
        author_id: Set(author.id),
        category_id: Set(category.id),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("Failed to create product")
}
