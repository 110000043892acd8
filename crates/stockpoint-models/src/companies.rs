//! Tenant models.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// A tenant. Owns its warehouses, stores and users.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Company {
    pub id: Uuid,
    pub name: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateCompanyDto {
    #[validate(length(min = 1, max = 120))]
    pub name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_company_name_bounds() {
        assert!(CreateCompanyDto { name: String::new() }.validate().is_err());
        assert!(CreateCompanyDto { name: "x".repeat(121) }.validate().is_err());
        assert!(CreateCompanyDto { name: "Acme Retail".to_string() }.validate().is_ok());
    }
}
