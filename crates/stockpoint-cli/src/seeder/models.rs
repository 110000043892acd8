//! Data models for database seeding configuration.

use stockpoint_models::Role;
use uuid::Uuid;

/// Subject prefix shared by every seeded user, so they can be cleared later.
pub const SEED_SUBJECT_PREFIX: &str = "seed|";

/// Name suffix shared by every seeded company.
pub const SEED_COMPANY_SUFFIX: &str = " [seed]";

/// Seed data for creating a company.
pub struct CompanySeed {
    pub name: String,
}

/// Seed data for creating a company user.
pub struct UserSeed {
    pub subject_id: String,
    pub display_name: String,
    pub role: Role,
    pub company_id: Uuid,
}

/// Number of users of each company role to create per company.
#[derive(Clone)]
pub struct UsersPerCompany {
    pub general_managers: usize,
    pub warehouse_managers: usize,
    pub warehouse_salespeople: usize,
    pub pos_salespeople: usize,
    pub skaters: usize,
    pub customers: usize,
}

impl Default for UsersPerCompany {
    fn default() -> Self {
        Self {
            general_managers: 1,
            warehouse_managers: 2,
            warehouse_salespeople: 4,
            pos_salespeople: 4,
            skaters: 3,
            customers: 20,
        }
    }
}

impl UsersPerCompany {
    /// (role, count) pairs in provisioning order.
    pub fn counts(&self) -> [(Role, usize); 6] {
        [
            (Role::GeneralManager, self.general_managers),
            (Role::WarehouseManager, self.warehouse_managers),
            (Role::WarehouseSalesperson, self.warehouse_salespeople),
            (Role::PosSalesperson, self.pos_salespeople),
            (Role::Skater, self.skaters),
            (Role::Customer, self.customers),
        ]
    }

    pub fn total(&self) -> usize {
        self.counts().iter().map(|(_, count)| count).sum()
    }
}

/// Complete configuration for database seeding.
#[derive(Clone, Default)]
pub struct SeedConfig {
    pub num_companies: usize,
    pub users_per_company: UsersPerCompany,
}

impl SeedConfig {
    /// Creates a new seed configuration with the specified number of companies.
    pub fn new(num_companies: usize) -> Self {
        Self {
            num_companies,
            ..Default::default()
        }
    }

    pub fn with_users(mut self, users: UsersPerCompany) -> Self {
        self.users_per_company = users;
        self
    }

    pub fn total_users(&self) -> usize {
        self.num_companies * self.users_per_company.total()
    }
}
