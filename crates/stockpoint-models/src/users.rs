//! Provisioned users.
//!
//! A user is a subject from the identity provider plus a role. Developers are
//! platform users; every other role belongs to exactly one company.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use stockpoint_core::serde::deserialize_optional_uuid;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::roles::Role;

/// A provisioned user as stored.
///
/// `role` is kept as the stored string so that rows written by an older
/// policy still load; they simply carry no permissions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct UserRecord {
    pub subject_id: String,
    pub display_name: Option<String>,
    pub role: String,
    pub company_id: Option<Uuid>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

/// DTO for provisioning a user.
///
/// `company_id` must be absent for `developer` and present for every other
/// role. Tenant callers may omit it to provision into their own company.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct ProvisionUserDto {
    #[validate(length(min = 1, max = 255))]
    pub subject_id: String,
    #[validate(length(max = 120))]
    pub display_name: Option<String>,
    pub role: Role,
    #[serde(default, deserialize_with = "deserialize_optional_uuid")]
    pub company_id: Option<Uuid>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct UpdateRoleDto {
    pub role: Role,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provision_dto_empty_company_is_none() {
        let dto: ProvisionUserDto = serde_json::from_str(
            r#"{"subject_id":"dev-1","role":"developer","company_id":""}"#,
        )
        .unwrap();
        assert_eq!(dto.role, Role::Developer);
        assert!(dto.company_id.is_none());
        assert!(dto.display_name.is_none());
    }

    #[test]
    fn test_provision_dto_rejects_unknown_role() {
        let result = serde_json::from_str::<ProvisionUserDto>(
            r#"{"subject_id":"x","role":"cashier"}"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_provision_dto_requires_subject() {
        let dto: ProvisionUserDto =
            serde_json::from_str(r#"{"subject_id":"","role":"customer"}"#).unwrap();
        assert!(dto.validate().is_err());
    }
}
