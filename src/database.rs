use sqlx::{postgres::{PgConnectOptions, PgPoolOptions}, PgPool};
use std::str::FromStr;

pub async fn create_pool(database_url: &str) -> Result<PgPool, sqlx::Error> {
    let options = PgConnectOptions::from_str(database_url)?
        .application_name("pokedex-backend");

    PgPoolOptions::new()
        .max_connections(10)
        .acquire_timeout(std::time::Duration::from_secs(5))
        .idle_timeout(std::time::Duration::from_secs(30))
        .connect_with(options)
        .await
}

/// Run the embedded migrations unless `skip` is set.
///
/// A failed or mismatched migration is logged and startup continues, the
/// same way the service has always treated a hand-migrated database.
pub async fn run_migrations(pool: &PgPool, skip: bool) {
    if skip {
        tracing::warn!("⚠️ Skipping migrations due to SKIP_MIGRATIONS=true");
        return;
    }

    match sqlx::migrate!("./migrations").run(pool).await {
        Ok(_) => tracing::info!("✅ Migrations completed successfully"),
        Err(sqlx::migrate::MigrateError::VersionMismatch(version)) => {
            tracing::warn!("⚠️  Migration version mismatch: {}", version);
            tracing::warn!("Database has different migration state than expected");
        }
        Err(e) => {
            tracing::warn!("❌ Failed to run migrations: {}", e);
            tracing::warn!("Continuing without migrations (set SKIP_MIGRATIONS=true to suppress this warning)");
        }
    }
}
