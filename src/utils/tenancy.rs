//! Company scoping.
//!
//! Platform users act on any company. Tenant users act only inside their own
//! company and can never create or promote to a platform role.

use anyhow::anyhow;
use stockpoint_core::AppError;
use stockpoint_models::{Role, UserRecord};
use uuid::Uuid;

use crate::middleware::auth::AuthUser;

/// Rejects tenant callers asking about another company.
pub fn verify_company_access(auth_user: &AuthUser, company_id: Uuid) -> Result<(), AppError> {
    if auth_user.is_platform() || auth_user.company_id() == Some(company_id) {
        return Ok(());
    }
    Err(AppError::forbidden(
        "Access denied. Company belongs to another tenant".to_string(),
    ))
}

/// Hides users outside the caller's company.
pub fn verify_user_access(auth_user: &AuthUser, user: &UserRecord) -> Result<(), AppError> {
    if auth_user.is_platform()
        || (user.company_id.is_some() && user.company_id == auth_user.company_id())
    {
        return Ok(());
    }
    Err(AppError::not_found(anyhow!("User not found")))
}

/// Rejects assigning `role` when the caller may not grant it.
pub fn verify_role_grant(auth_user: &AuthUser, role: Role) -> Result<(), AppError> {
    if role.is_platform_role() && !auth_user.is_platform() {
        return Err(AppError::forbidden(format!(
            "Access denied. Only platform users can assign the {} role",
            role
        )));
    }
    Ok(())
}

/// Works out which company a new user with `role` lands in.
///
/// Platform roles get no company. Platform callers must name one for tenant
/// roles; tenant callers always provision into their own.
pub fn company_for_provisioning(
    auth_user: &AuthUser,
    role: Role,
    requested: Option<Uuid>,
) -> Result<Option<Uuid>, AppError> {
    verify_role_grant(auth_user, role)?;

    if role.is_platform_role() {
        if requested.is_some() {
            return Err(AppError::bad_request(anyhow!(
                "{} accounts cannot belong to a company",
                role
            )));
        }
        return Ok(None);
    }

    match auth_user.company_id() {
        Some(own) => match requested {
            Some(other) if other != own => Err(AppError::forbidden(
                "Access denied. Cannot provision users into another company".to_string(),
            )),
            _ => Ok(Some(own)),
        },
        None => requested.map(Some).ok_or_else(|| {
            AppError::bad_request(anyhow!("company_id is required for role {}", role))
        }),
    }
}
