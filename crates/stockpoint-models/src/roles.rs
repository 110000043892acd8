//! Roles.
//!
//! A role is a string tag stored alongside each provisioned user. The set is
//! closed; a stored string outside it resolves to no permissions at all.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Developer,
    GeneralManager,
    WarehouseManager,
    WarehouseSalesperson,
    PosSalesperson,
    Skater,
    Customer,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownRole(pub String);

impl fmt::Display for UnknownRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Unknown role: {}", self.0)
    }
}

impl std::error::Error for UnknownRole {}

impl Role {
    pub const ALL: [Role; 7] = [
        Role::Developer,
        Role::GeneralManager,
        Role::WarehouseManager,
        Role::WarehouseSalesperson,
        Role::PosSalesperson,
        Role::Skater,
        Role::Customer,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Developer => "developer",
            Role::GeneralManager => "general_manager",
            Role::WarehouseManager => "warehouse_manager",
            Role::WarehouseSalesperson => "warehouse_salesperson",
            Role::PosSalesperson => "pos_salesperson",
            Role::Skater => "skater",
            Role::Customer => "customer",
        }
    }

    /// Platform roles live outside any company.
    pub fn is_platform_role(&self) -> bool {
        matches!(self, Role::Developer)
    }
}

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::ALL
            .into_iter()
            .find(|role| role.as_str() == s)
            .ok_or_else(|| UnknownRole(s.to_string()))
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_every_role() {
        for role in Role::ALL {
            assert_eq!(role.as_str().parse::<Role>().unwrap(), role);
        }
    }

    #[test]
    fn test_parse_is_case_sensitive() {
        assert!("Developer".parse::<Role>().is_err());
        assert!("DEVELOPER".parse::<Role>().is_err());
    }

    #[test]
    fn test_unknown_role() {
        let err = "cashier".parse::<Role>().unwrap_err();
        assert_eq!(err, UnknownRole("cashier".to_string()));
        assert_eq!(err.to_string(), "Unknown role: cashier");
    }

    #[test]
    fn test_serde_matches_as_str() {
        for role in Role::ALL {
            let json = serde_json::to_string(&role).unwrap();
            assert_eq!(json, format!("\"{}\"", role.as_str()));
        }
    }

    #[test]
    fn test_only_developer_is_platform_role() {
        let platform: Vec<Role> = Role::ALL
            .into_iter()
            .filter(Role::is_platform_role)
            .collect();
        assert_eq!(platform, vec![Role::Developer]);
    }
}
