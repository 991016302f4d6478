//! Migration CLI tool.

use sea_orm_migration::prelude::*;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt().with_env_filter("info").init();

    let pending = migration::Migrator::migrations().len();
    tracing::info!(migrations = pending, "Starting migration CLI");

    cli::run_cli(migration::Migrator).await;

    tracing::info!("Migration CLI finished");
}
