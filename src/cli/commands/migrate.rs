//! Migrate command handler

use sea_orm_migration::MigratorTrait;

use crate::config::Config;
use crate::db::{Store, migrator::Migrator};

pub async fn cmd_migrate(config: &Config, reset: bool) -> anyhow::Result<()> {
    // Opening the store applies anything pending.
    let store = Store::from_config(&config.database).await?;

    if reset {
        println!("Rolling back and re-applying all migrations...");
        Migrator::refresh(&store.conn).await?;
    }

    let applied = Migrator::get_applied_migrations(&store.conn).await?;
    println!("✓ {} migrations applied", applied.len());
    for migration in applied {
        println!("  {}", migration.name());
    }

    store.close().await
}
