use std::sync::Arc;

use crate::config::Config;
use crate::db::Store;
use crate::services::{DefaultUserService, UserService};

pub async fn cmd_create_admin(config: &Config, username: &str, password: &str) -> anyhow::Result<()> {
    if password.chars().count() < 8 {
        println!("Password must be at least 8 characters.");
        return Ok(());
    }

    let store = Store::new(&config.general.database_url).await?;
    let users = DefaultUserService::new(Arc::new(store.user_repo()), config.security.clone());

    let user = users
        .bootstrap_admin(username, password)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to create admin: {e}"))?;

    println!("✓ {} (ID: {}) is now an admin", user.username, user.id);
    Ok(())
}
