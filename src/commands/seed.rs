//! Seed command - Inserts the role rows and the bootstrap master account.

use crate::config::Config;
use crate::errors::AppResult;
use crate::infra::db::{self, Database};

/// Execute the seed command
pub async fn execute(config: Config) -> AppResult<()> {
    let database = Database::connect(&config).await?;
    let outcome = db::seed(database.connection(), &config).await?;

    if outcome.master_created {
        println!("Created master admin {}", config.seed_master_email);
    } else {
        println!("Master admin already present; nothing to do");
    }
    Ok(())
}
