use std::sync::Arc;

use anyhow::Result;
use diesel_migrations::{EmbeddedMigrations, embed_migrations};
use storeservice::{
    app_state::AppState,
    bootstrap::{self, bootstrap},
    config, db,
    repositories::PgRepository,
    routes,
};

/// Migrations embedded into the binary which helps with streamlining image building process
const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

#[tokio::main]
async fn main() -> Result<()> {
    bootstrap::init_env();
    bootstrap::init_tracing();

    let config = config::load()?;

    tracing::info!("Running migrations...");
    let migrations_count = db::run_migrations_blocking(MIGRATIONS, &config.database.url).await?;
    tracing::info!("Run {} new migrations successfully", migrations_count);

    let pool = db::create_pool(&config.database).await?;
    tracing::info!(
        "Connected to the database (max {} connections)",
        config.database.max_connections
    );

    let state = AppState::new(Arc::new(PgRepository::new(pool)));
    let app = routes::app(state);

    tracing::info!("Bootstrapping...");
    bootstrap("StoreService", app, &config.server).await?;
    Ok(())
}
