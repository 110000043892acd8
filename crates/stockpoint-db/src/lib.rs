//! # Stockpoint DB
//!
//! Database pool, migrations and queries for the Stockpoint access service.
//!
//! - [`directory`]: [`PgRoleDirectory`], the Postgres role directory
//! - [`provisioning`]: Company and user writes shared by the API and the CLI
//!
//! # Example
//!
//! ```ignore
//! use stockpoint_db::{PgRoleDirectory, init_db_pool, run_migrations};
//!
//! let pool = init_db_pool(&std::env::var("DATABASE_URL")?).await?;
//! run_migrations(&pool).await?;
//! let directory = PgRoleDirectory::new(pool.clone());
//! ```

pub mod directory;
pub mod provisioning;

pub use directory::PgRoleDirectory;
pub use provisioning::ProvisioningError;

// Re-export PgPool for convenience
pub use sqlx::PgPool;

/// Connects a PostgreSQL pool.
///
/// Called once at startup; the pool is cloned into application state.
pub async fn init_db_pool(database_url: &str) -> Result<PgPool, sqlx::Error> {
    sqlx::postgres::PgPoolOptions::new()
        .max_connections(10)
        .connect(database_url)
        .await
}

/// Applies the migrations in the workspace `migrations/` directory.
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("../../migrations").run(pool).await
}
