use anyhow::Result;
use market::accounts::{NewAccount, create_superuser as create_privileged};
use tracing::{error, info};

use super::initdb::connect;

pub async fn create_superuser(
    database_url: &str,
    email: &str,
    username: &str,
    password: &str,
) -> Result<()> {
    let db = connect(database_url).await?;

    let new = NewAccount {
        email: email.to_string(),
        username: username.to_string(),
        password: password.to_string(),
        profile_image: None,
    };

    match create_privileged(&db, new).await {
        Ok(account) => {
            info!("Superuser {} ({}) created", account.id, account.email);
            Ok(())
        }
        Err(e) => {
            error!("Failed to create superuser '{}': {}", email, e);
            Err(e.into())
        }
    }
}
