use anyhow::Result;
use tracing::{error, info};

use super::initdb::connect;

pub async fn create_category(database_url: &str, name: &str) -> Result<()> {
    let db = connect(database_url).await?;

    match market::categories::create_category(&db, name).await {
        Ok(category) => {
            info!("Category {} '{}' created", category.id, category.name);
            Ok(())
        }
        Err(e) => {
            error!("Failed to create category '{}': {}", name, e);
            Err(e.into())
        }
    }
}
