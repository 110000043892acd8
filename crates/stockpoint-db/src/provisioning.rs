//! Company and user writes.
//!
//! Subject ids are unique across the whole platform: a subject is either a
//! platform user or a member of exactly one company. Tenant membership and
//! its `subject_companies` index entry are written in one transaction.
//!
//! Every insert takes a transaction-scoped advisory lock on the subject id
//! before its existence check, so concurrent provisioning of one subject
//! cannot land in both tables.

use sqlx::{PgPool, Postgres, Transaction};
use stockpoint_models::{Company, Role, UserRecord};
use tracing::instrument;
use uuid::Uuid;

#[derive(Debug, thiserror::Error)]
pub enum ProvisioningError {
    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    NotFound(String),

    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

const COMPANY_COLUMNS: &str = "id, name, created_at, updated_at";

fn is_unique_violation(e: &sqlx::Error) -> bool {
    matches!(e, sqlx::Error::Database(db_err) if db_err.is_unique_violation())
}

#[instrument(skip(db), fields(db.operation = "INSERT", db.table = "companies"))]
pub async fn insert_company(db: &PgPool, name: &str) -> Result<Company, ProvisioningError> {
    sqlx::query_as::<_, Company>(&format!(
        "INSERT INTO companies (name) VALUES ($1) RETURNING {COMPANY_COLUMNS}"
    ))
    .bind(name)
    .fetch_one(db)
    .await
    .map_err(|e| {
        if is_unique_violation(&e) {
            ProvisioningError::Conflict("Company name already exists".to_string())
        } else {
            e.into()
        }
    })
}

#[instrument(skip(db), fields(db.operation = "SELECT", db.table = "companies"))]
pub async fn list_companies(db: &PgPool) -> Result<Vec<Company>, ProvisioningError> {
    Ok(sqlx::query_as::<_, Company>(&format!(
        "SELECT {COMPANY_COLUMNS} FROM companies ORDER BY name"
    ))
    .fetch_all(db)
    .await?)
}

#[instrument(skip(db), fields(db.operation = "SELECT", db.table = "companies"))]
pub async fn find_company(db: &PgPool, id: Uuid) -> Result<Option<Company>, ProvisioningError> {
    Ok(sqlx::query_as::<_, Company>(&format!(
        "SELECT {COMPANY_COLUMNS} FROM companies WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(db)
    .await?)
}

/// Serializes writers of `subject_id` until the transaction ends.
async fn lock_subject(
    tx: &mut Transaction<'_, Postgres>,
    subject_id: &str,
) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT pg_advisory_xact_lock(hashtext($1))")
        .bind(subject_id)
        .execute(&mut **tx)
        .await?;
    Ok(())
}

async fn subject_exists(
    tx: &mut Transaction<'_, Postgres>,
    subject_id: &str,
) -> Result<bool, sqlx::Error> {
    sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS (SELECT 1 FROM platform_users WHERE subject_id = $1)
             OR EXISTS (SELECT 1 FROM subject_companies WHERE subject_id = $1)",
    )
    .bind(subject_id)
    .fetch_one(&mut **tx)
    .await
}

fn subject_taken() -> ProvisioningError {
    ProvisioningError::Conflict("User already exists".to_string())
}

/// Provisions a platform user.
#[instrument(skip(db, display_name), fields(db.operation = "INSERT", db.table = "platform_users"))]
pub async fn insert_platform_user(
    db: &PgPool,
    subject_id: &str,
    display_name: Option<&str>,
    role: Role,
) -> Result<UserRecord, ProvisioningError> {
    let mut tx = db.begin().await?;

    lock_subject(&mut tx, subject_id).await?;
    if subject_exists(&mut tx, subject_id).await? {
        return Err(subject_taken());
    }

    let user = sqlx::query_as::<_, UserRecord>(
        "INSERT INTO platform_users (subject_id, display_name, role)
         VALUES ($1, $2, $3)
         RETURNING subject_id, display_name, role, NULL::uuid AS company_id, created_at, updated_at",
    )
    .bind(subject_id)
    .bind(display_name)
    .bind(role.as_str())
    .fetch_one(&mut *tx)
    .await
    .map_err(|e| if is_unique_violation(&e) { subject_taken() } else { e.into() })?;

    tx.commit().await?;
    Ok(user)
}

/// Provisions a member of `company_id` and indexes the subject.
#[instrument(skip(db, display_name), fields(db.operation = "INSERT", db.table = "company_users"))]
pub async fn insert_company_user(
    db: &PgPool,
    company_id: Uuid,
    subject_id: &str,
    display_name: Option<&str>,
    role: Role,
) -> Result<UserRecord, ProvisioningError> {
    let mut tx = db.begin().await?;

    lock_subject(&mut tx, subject_id).await?;
    if subject_exists(&mut tx, subject_id).await? {
        return Err(subject_taken());
    }

    let company_exists =
        sqlx::query_scalar::<_, bool>("SELECT EXISTS (SELECT 1 FROM companies WHERE id = $1)")
            .bind(company_id)
            .fetch_one(&mut *tx)
            .await?;
    if !company_exists {
        return Err(ProvisioningError::NotFound("Company not found".to_string()));
    }

    let user = sqlx::query_as::<_, UserRecord>(
        "INSERT INTO company_users (company_id, subject_id, display_name, role)
         VALUES ($1, $2, $3, $4)
         RETURNING subject_id, display_name, role, company_id, created_at, updated_at",
    )
    .bind(company_id)
    .bind(subject_id)
    .bind(display_name)
    .bind(role.as_str())
    .fetch_one(&mut *tx)
    .await
    .map_err(|e| if is_unique_violation(&e) { subject_taken() } else { e.into() })?;

    sqlx::query("INSERT INTO subject_companies (subject_id, company_id) VALUES ($1, $2)")
        .bind(subject_id)
        .bind(company_id)
        .execute(&mut *tx)
        .await
        .map_err(|e| if is_unique_violation(&e) { subject_taken() } else { e.into() })?;

    tx.commit().await?;
    Ok(user)
}

/// Finds a user wherever they are provisioned.
#[instrument(skip(db), fields(db.operation = "SELECT"))]
pub async fn find_user(db: &PgPool, subject_id: &str) -> Result<Option<UserRecord>, ProvisioningError> {
    let platform = sqlx::query_as::<_, UserRecord>(
        "SELECT subject_id, display_name, role, NULL::uuid AS company_id, created_at, updated_at
         FROM platform_users WHERE subject_id = $1",
    )
    .bind(subject_id)
    .fetch_optional(db)
    .await?;

    if platform.is_some() {
        return Ok(platform);
    }

    Ok(sqlx::query_as::<_, UserRecord>(
        "SELECT cu.subject_id, cu.display_name, cu.role, cu.company_id, cu.created_at, cu.updated_at
         FROM subject_companies sc
         JOIN company_users cu
           ON cu.company_id = sc.company_id AND cu.subject_id = sc.subject_id
         WHERE sc.subject_id = $1",
    )
    .bind(subject_id)
    .fetch_optional(db)
    .await?)
}

#[instrument(skip(db), fields(db.operation = "SELECT", db.table = "company_users"))]
pub async fn list_company_users(
    db: &PgPool,
    company_id: Uuid,
) -> Result<Vec<UserRecord>, ProvisioningError> {
    Ok(sqlx::query_as::<_, UserRecord>(
        "SELECT subject_id, display_name, role, company_id, created_at, updated_at
         FROM company_users WHERE company_id = $1
         ORDER BY created_at, subject_id",
    )
    .bind(company_id)
    .fetch_all(db)
    .await?)
}

/// Changes a user's role within their current scope.
///
/// `company_id` is `None` for platform users.
#[instrument(skip(db), fields(db.operation = "UPDATE"))]
pub async fn update_role(
    db: &PgPool,
    subject_id: &str,
    company_id: Option<Uuid>,
    role: Role,
) -> Result<UserRecord, ProvisioningError> {
    let updated = match company_id {
        None => {
            sqlx::query_as::<_, UserRecord>(
                "UPDATE platform_users SET role = $2, updated_at = NOW()
                 WHERE subject_id = $1
                 RETURNING subject_id, display_name, role, NULL::uuid AS company_id, created_at, updated_at",
            )
            .bind(subject_id)
            .bind(role.as_str())
            .fetch_optional(db)
            .await?
        }
        Some(company_id) => {
            sqlx::query_as::<_, UserRecord>(
                "UPDATE company_users SET role = $3, updated_at = NOW()
                 WHERE company_id = $1 AND subject_id = $2
                 RETURNING subject_id, display_name, role, company_id, created_at, updated_at",
            )
            .bind(company_id)
            .bind(subject_id)
            .bind(role.as_str())
            .fetch_optional(db)
            .await?
        }
    };

    updated.ok_or_else(|| ProvisioningError::NotFound("User not found".to_string()))
}

/// Deprovisions a user. Tenant index entries go with the membership row.
#[instrument(skip(db), fields(db.operation = "DELETE"))]
pub async fn delete_user(
    db: &PgPool,
    subject_id: &str,
    company_id: Option<Uuid>,
) -> Result<(), ProvisioningError> {
    let result = match company_id {
        None => {
            sqlx::query("DELETE FROM platform_users WHERE subject_id = $1")
                .bind(subject_id)
                .execute(db)
                .await?
        }
        Some(company_id) => {
            sqlx::query("DELETE FROM company_users WHERE company_id = $1 AND subject_id = $2")
                .bind(company_id)
                .bind(subject_id)
                .execute(db)
                .await?
        }
    };

    if result.rows_affected() == 0 {
        return Err(ProvisioningError::NotFound("User not found".to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[sqlx::test(migrations = "../../migrations")]
    #[ignore = "requires a database"]
    async fn test_duplicate_company_name_conflicts(pool: PgPool) {
        insert_company(&pool, "Acme").await.unwrap();
        let err = insert_company(&pool, "Acme").await.unwrap_err();
        assert!(matches!(err, ProvisioningError::Conflict(_)));
    }

    #[sqlx::test(migrations = "../../migrations")]
    #[ignore = "requires a database"]
    async fn test_subject_is_unique_across_scopes(pool: PgPool) {
        let a = insert_company(&pool, "A").await.unwrap();
        let b = insert_company(&pool, "B").await.unwrap();

        insert_company_user(&pool, a.id, "s-1", None, Role::Customer)
            .await
            .unwrap();

        let err = insert_company_user(&pool, b.id, "s-1", None, Role::Customer)
            .await
            .unwrap_err();
        assert!(matches!(err, ProvisioningError::Conflict(_)));

        let err = insert_platform_user(&pool, "s-1", None, Role::Developer)
            .await
            .unwrap_err();
        assert!(matches!(err, ProvisioningError::Conflict(_)));
    }

    #[sqlx::test(migrations = "../../migrations")]
    #[ignore = "requires a database"]
    async fn test_unknown_company_is_not_found(pool: PgPool) {
        let err = insert_company_user(&pool, Uuid::new_v4(), "s-1", None, Role::Skater)
            .await
            .unwrap_err();
        assert!(matches!(err, ProvisioningError::NotFound(_)));
    }

    #[sqlx::test(migrations = "../../migrations")]
    #[ignore = "requires a database"]
    async fn test_update_and_delete_maintain_index(pool: PgPool) {
        let company = insert_company(&pool, "Acme").await.unwrap();
        insert_company_user(&pool, company.id, "s-1", Some("Sam"), Role::PosSalesperson)
            .await
            .unwrap();

        let updated = update_role(&pool, "s-1", Some(company.id), Role::GeneralManager)
            .await
            .unwrap();
        assert_eq!(updated.role, "general_manager");
        assert_eq!(updated.display_name.as_deref(), Some("Sam"));

        delete_user(&pool, "s-1", Some(company.id)).await.unwrap();
        assert!(find_user(&pool, "s-1").await.unwrap().is_none());

        let indexed: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM subject_companies")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(indexed, 0);

        let err = delete_user(&pool, "s-1", Some(company.id)).await.unwrap_err();
        assert!(matches!(err, ProvisioningError::NotFound(_)));
    }

    #[sqlx::test(migrations = "../../migrations")]
    #[ignore = "requires a database"]
    async fn test_concurrent_provisioning_admits_one_subject(pool: PgPool) {
        let a = insert_company(&pool, "A").await.unwrap();
        let b = insert_company(&pool, "B").await.unwrap();

        let (tenant_a, tenant_b, platform) = tokio::join!(
            insert_company_user(&pool, a.id, "s-race", None, Role::Customer),
            insert_company_user(&pool, b.id, "s-race", None, Role::Customer),
            insert_platform_user(&pool, "s-race", None, Role::Developer),
        );

        let outcomes = [tenant_a.err(), tenant_b.err(), platform.err()];
        let created = outcomes.iter().filter(|e| e.is_none()).count();
        assert_eq!(created, 1);
        assert!(
            outcomes
                .iter()
                .flatten()
                .all(|e| matches!(e, ProvisioningError::Conflict(_)))
        );

        let rows: i64 = sqlx::query_scalar(
            "SELECT (SELECT COUNT(*) FROM platform_users WHERE subject_id = 's-race')
                  + (SELECT COUNT(*) FROM company_users WHERE subject_id = 's-race')",
        )
        .fetch_one(&pool)
        .await
        .unwrap();
        assert_eq!(rows, 1);
    }

    #[sqlx::test(migrations = "../../migrations")]
    #[ignore = "requires a database"]
    async fn test_repeat_in_same_company_conflicts(pool: PgPool) {
        let company = insert_company(&pool, "Acme").await.unwrap();

        let (first, second) = tokio::join!(
            insert_company_user(&pool, company.id, "s-twice", None, Role::Skater),
            insert_company_user(&pool, company.id, "s-twice", None, Role::Skater),
        );

        let errors: Vec<_> = [first.err(), second.err()].into_iter().flatten().collect();
        assert_eq!(errors.len(), 1);
        assert!(matches!(errors[0], ProvisioningError::Conflict(_)));
    }
}
