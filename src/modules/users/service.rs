use sqlx::PgPool;
use stockpoint_core::AppError;
use stockpoint_db::provisioning;
use tracing::{info, instrument, warn};

use crate::metrics;
use crate::middleware::auth::AuthUser;
use crate::utils::errors::provisioning_error;
use crate::utils::tenancy::{company_for_provisioning, verify_role_grant, verify_user_access};

use super::model::{ProvisionUserDto, UpdateRoleDto, UserRecord};

pub struct UserService;

impl UserService {
    #[instrument(
        skip(db, auth_user, dto),
        fields(caller = %auth_user.subject(), caller_role = %auth_user.role(), subject = %dto.subject_id, role = %dto.role)
    )]
    pub async fn provision_user(
        db: &PgPool,
        auth_user: &AuthUser,
        dto: ProvisionUserDto,
    ) -> Result<UserRecord, AppError> {
        let company_id = company_for_provisioning(auth_user, dto.role, dto.company_id)?;
        let subject_id = dto.subject_id.trim();
        let display_name = dto.display_name.as_deref();

        let user = match company_id {
            None => provisioning::insert_platform_user(db, subject_id, display_name, dto.role).await,
            Some(company_id) => {
                provisioning::insert_company_user(db, company_id, subject_id, display_name, dto.role)
                    .await
            }
        }
        .map_err(provisioning_error)?;

        metrics::track_user_provisioned(dto.role.as_str());
        info!(company.id = ?user.company_id, "User provisioned");

        Ok(user)
    }

    #[instrument(skip(db, auth_user), fields(caller = %auth_user.subject()))]
    pub async fn get_user(
        db: &PgPool,
        auth_user: &AuthUser,
        subject_id: &str,
    ) -> Result<UserRecord, AppError> {
        let user = provisioning::find_user(db, subject_id)
            .await
            .map_err(provisioning_error)?
            .ok_or_else(|| AppError::not_found(anyhow::anyhow!("User not found")))?;

        verify_user_access(auth_user, &user)?;
        Ok(user)
    }

    /// Changes a user's role. Users stay in their scope: a platform user
    /// cannot take a company role and a company user cannot become a
    /// platform user.
    #[instrument(skip(db, auth_user, dto), fields(caller = %auth_user.subject(), role = %dto.role))]
    pub async fn update_role(
        db: &PgPool,
        auth_user: &AuthUser,
        subject_id: &str,
        dto: UpdateRoleDto,
    ) -> Result<UserRecord, AppError> {
        verify_role_grant(auth_user, dto.role)?;
        let user = Self::get_user(db, auth_user, subject_id).await?;

        if user.company_id.is_none() != dto.role.is_platform_role() {
            warn!(subject = %subject_id, "Role change would move user between scopes");
            return Err(AppError::bad_request(anyhow::anyhow!(
                "Cannot move a user between platform and company scope"
            )));
        }

        let previous = user.role.clone();
        let updated = provisioning::update_role(db, subject_id, user.company_id, dto.role)
            .await
            .map_err(provisioning_error)?;

        info!(subject = %subject_id, from = %previous, to = %dto.role, "Role updated");
        Ok(updated)
    }

    #[instrument(skip(db, auth_user), fields(caller = %auth_user.subject()))]
    pub async fn delete_user(
        db: &PgPool,
        auth_user: &AuthUser,
        subject_id: &str,
    ) -> Result<(), AppError> {
        let user = Self::get_user(db, auth_user, subject_id).await?;

        provisioning::delete_user(db, subject_id, user.company_id)
            .await
            .map_err(provisioning_error)?;

        info!(subject = %subject_id, "User deprovisioned");
        Ok(())
    }
}
