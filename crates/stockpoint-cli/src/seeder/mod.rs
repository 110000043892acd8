//! Database seeding for development and load testing.
//!
//! Seeded rows are marked (subject prefix `seed|`, company suffix `[seed]`)
//! so [`clear_all`] removes them and nothing else.

pub mod companies;
pub mod models;
pub mod users;

use sqlx::PgPool;
use std::time::Instant;

pub use models::{SeedConfig, UsersPerCompany};

/// Seeds companies and their users.
pub async fn seed_all(db: &PgPool, config: SeedConfig) -> Result<(), Box<dyn std::error::Error>> {
    let start_time = Instant::now();

    println!("🌱 Starting database seeding...");
    println!("   - Companies: {}", config.num_companies);
    println!(
        "   - Users per company: {}",
        config.users_per_company.total()
    );

    let company_ids = companies::seed_companies(db, config.num_companies).await?;
    let users = users::seed_users(db, &company_ids, &config.users_per_company).await?;

    println!(
        "\n✅ Seeding complete! Created {} companies and {} users in {:?}",
        company_ids.len(),
        users,
        start_time.elapsed()
    );
    println!("\n📝 Issue a token for any seeded subject with `stockpoint-cli issue-token`");

    Ok(())
}

/// Removes everything [`seed_all`] created.
pub async fn clear_all(db: &PgPool) -> Result<(), Box<dyn std::error::Error>> {
    let start_time = Instant::now();
    println!("🧹 Clearing seeded data...");

    users::clear_users(db).await?;
    companies::clear_companies(db).await?;

    println!("\n✅ Cleared seeded data in {:?}", start_time.elapsed());
    Ok(())
}
