use std::sync::Arc;

use anyhow::Context;
use sqlx::PgPool;
use stockpoint_auth::JwtVerifier;
use stockpoint_config::{AccessConfig, CorsConfig, JwtConfig, RateLimitConfig};
use stockpoint_db::{PgRoleDirectory, init_db_pool, run_migrations};
use stockpoint_rbac::{RoleAuthorizer, RolePolicy};

#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub jwt_config: JwtConfig,
    pub cors_config: CorsConfig,
    pub rate_limit_config: RateLimitConfig,
    pub access_config: AccessConfig,
    pub authorizer: Arc<RoleAuthorizer>,
}

pub async fn init_app_state() -> anyhow::Result<AppState> {
    let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;
    let db = init_db_pool(&database_url)
        .await
        .context("Failed to connect to database")?;
    run_migrations(&db)
        .await
        .context("Failed to run database migrations")?;

    let jwt_config = JwtConfig::from_env();
    let access_config = AccessConfig::from_env();
    let policy = RolePolicy::from_path_or_canonical(access_config.policy_path.as_deref())?;

    let authorizer = RoleAuthorizer::new(
        Arc::new(policy),
        Arc::new(JwtVerifier::new(jwt_config.clone())),
        Arc::new(PgRoleDirectory::new(db.clone())),
    );

    Ok(AppState {
        db,
        jwt_config,
        cors_config: CorsConfig::from_env(),
        rate_limit_config: RateLimitConfig::from_env(),
        access_config,
        authorizer: Arc::new(authorizer),
    })
}
