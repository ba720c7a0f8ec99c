use std::time::Duration;

use anyhow::{Context, Result};
use config::{Config, Environment, File};
use sea_orm::{ConnectOptions, Database};
use serde::Deserialize;
use tracing::{debug, info};

use crate::schemas::AppState;

pub const DEFAULT_DATABASE_URL: &str = "sqlite://spartamarket.db?mode=rwc";
pub const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:3000";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Runtime settings.
///
/// Sources, lowest precedence first: built-in defaults, an optional
/// `spartamarket.toml` in the working directory, `SPARTAMARKET_*` environment
/// variables, then the plain `DATABASE_URL` / `BIND_ADDRESS` variables.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct Settings {
    pub database_url: String,
    pub bind_address: String,
    pub request_timeout_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            database_url: DEFAULT_DATABASE_URL.to_string(),
            bind_address: DEFAULT_BIND_ADDRESS.to_string(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }
}

impl Settings {
    /// Loads settings after reading a `.env` file if one exists.
    pub fn load() -> Result<Self> {
        dotenvy::dotenv().ok();

        let settings = Config::builder()
            .set_default("database_url", DEFAULT_DATABASE_URL)?
            .set_default("bind_address", DEFAULT_BIND_ADDRESS)?
            .set_default("request_timeout_secs", DEFAULT_REQUEST_TIMEOUT_SECS)?
            .add_source(File::with_name("spartamarket").required(false))
            .add_source(Environment::with_prefix("SPARTAMARKET"))
            .set_override_option("database_url", std::env::var("DATABASE_URL").ok())?
            .set_override_option("bind_address", std::env::var("BIND_ADDRESS").ok())?
            .build()
            .context("Failed to read configuration")?
            .try_deserialize::<Settings>()
            .context("Invalid configuration")?;

        debug!(?settings, "Configuration loaded");
        Ok(settings)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// Connects to the configured database and builds the shared state.
pub async fn initialize_app_state(settings: &Settings) -> Result<AppState> {
    info!("Connecting to database: {}", settings.database_url);

    let mut options = ConnectOptions::new(settings.database_url.clone());
    options.sqlx_logging(false);
    let db = Database::connect(options)
        .await
        .with_context(|| format!("Failed to connect to '{}'", settings.database_url))?;

    Ok(AppState {
        db,
        request_timeout: settings.request_timeout(),
    })
}
