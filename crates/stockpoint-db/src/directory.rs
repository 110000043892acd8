//! Postgres role directory.

use async_trait::async_trait;
use sqlx::PgPool;
use stockpoint_rbac::{DirectoryError, Identity, RoleDirectory};
use tracing::instrument;
use uuid::Uuid;

/// Resolves subjects against `platform_users` and, through the
/// `subject_companies` index, `company_users`. Each lookup is a single
/// primary-key read.
#[derive(Clone, Debug)]
pub struct PgRoleDirectory {
    db: PgPool,
}

impl PgRoleDirectory {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

fn unavailable(e: sqlx::Error) -> DirectoryError {
    DirectoryError::Unavailable(e.to_string())
}

#[async_trait]
impl RoleDirectory for PgRoleDirectory {
    #[instrument(skip(self), fields(db.operation = "SELECT", db.table = "platform_users"))]
    async fn platform_identity(&self, subject: &str) -> Result<Option<Identity>, DirectoryError> {
        let role = sqlx::query_scalar::<_, String>(
            "SELECT role FROM platform_users WHERE subject_id = $1",
        )
        .bind(subject)
        .fetch_optional(&self.db)
        .await
        .map_err(unavailable)?;

        Ok(role.map(|role| Identity::platform(subject, role)))
    }

    #[instrument(skip(self), fields(db.operation = "SELECT", db.table = "subject_companies"))]
    async fn tenant_identity(&self, subject: &str) -> Result<Option<Identity>, DirectoryError> {
        let row = sqlx::query_as::<_, (Uuid, String)>(
            "SELECT cu.company_id, cu.role
             FROM subject_companies sc
             JOIN company_users cu
               ON cu.company_id = sc.company_id AND cu.subject_id = sc.subject_id
             WHERE sc.subject_id = $1",
        )
        .bind(subject)
        .fetch_optional(&self.db)
        .await
        .map_err(unavailable)?;

        Ok(row.map(|(company_id, role)| Identity::tenant(subject, role, company_id)))
    }
}
