//! Company user seeding functionality.
//!
//! Every seeded user is written to `company_users` and indexed in
//! `subject_companies` within the same transaction, the way the API
//! provisions them.

use fake::Fake;
use fake::faker::name::en::*;
use rayon::prelude::*;
use sqlx::{PgPool, Postgres, Transaction};
use std::time::Instant;
use uuid::Uuid;

use super::models::{SEED_SUBJECT_PREFIX, UserSeed, UsersPerCompany};

/// Generates users for every company in parallel
pub fn generate_users(company_ids: &[Uuid], per_company: &UsersPerCompany) -> Vec<UserSeed> {
    company_ids
        .par_iter()
        .flat_map(|&company_id| {
            let mut users = Vec::with_capacity(per_company.total());
            for (role, count) in per_company.counts() {
                for _ in 0..count {
                    let first_name: String = FirstName().fake();
                    let last_name: String = LastName().fake();
                    users.push(UserSeed {
                        subject_id: format!("{}{}", SEED_SUBJECT_PREFIX, Uuid::new_v4()),
                        display_name: format!("{} {}", first_name, last_name),
                        role,
                        company_id,
                    });
                }
            }
            users
        })
        .collect()
}

/// Seeds users for the given companies
pub async fn seed_users(
    db: &PgPool,
    company_ids: &[Uuid],
    per_company: &UsersPerCompany,
) -> Result<usize, Box<dyn std::error::Error>> {
    let start_time = Instant::now();
    println!(
        "👥 Seeding {} users ({} per company)...",
        company_ids.len() * per_company.total(),
        per_company.total()
    );

    let users = generate_users(company_ids, per_company);
    insert_users_batch(db, &users).await?;

    println!(
        "   ✓ Inserted {} users in {:?}",
        users.len(),
        start_time.elapsed()
    );

    Ok(users.len())
}

/// Inserts users and their index rows in batches
pub async fn insert_users_batch(
    db: &PgPool,
    users: &[UserSeed],
) -> Result<(), Box<dyn std::error::Error>> {
    let mut tx = db.begin().await?;

    // 4 params per user
    const BATCH_SIZE: usize = 1000;

    for chunk in users.chunks(BATCH_SIZE) {
        insert_users_chunk(&mut tx, chunk).await?;
        index_subjects_chunk(&mut tx, chunk).await?;
    }

    tx.commit().await?;
    Ok(())
}

async fn insert_users_chunk(
    tx: &mut Transaction<'_, Postgres>,
    users: &[UserSeed],
) -> Result<(), Box<dyn std::error::Error>> {
    if users.is_empty() {
        return Ok(());
    }

    let mut query =
        String::from("INSERT INTO company_users (company_id, subject_id, display_name, role) VALUES ");

    for i in 0..users.len() {
        if i > 0 {
            query.push_str(", ");
        }
        let param_idx = i * 4;
        query.push_str(&format!(
            "(${}, ${}, ${}, ${})",
            param_idx + 1,
            param_idx + 2,
            param_idx + 3,
            param_idx + 4
        ));
    }

    let mut q = sqlx::query(&query);
    for user in users {
        q = q
            .bind(user.company_id)
            .bind(&user.subject_id)
            .bind(&user.display_name)
            .bind(user.role.as_str());
    }

    q.execute(&mut **tx).await?;
    Ok(())
}

async fn index_subjects_chunk(
    tx: &mut Transaction<'_, Postgres>,
    users: &[UserSeed],
) -> Result<(), Box<dyn std::error::Error>> {
    if users.is_empty() {
        return Ok(());
    }

    let mut query = String::from("INSERT INTO subject_companies (subject_id, company_id) VALUES ");

    for i in 0..users.len() {
        if i > 0 {
            query.push_str(", ");
        }
        let param_idx = i * 2;
        query.push_str(&format!("(${}, ${})", param_idx + 1, param_idx + 2));
    }

    let mut q = sqlx::query(&query);
    for user in users {
        q = q.bind(&user.subject_id).bind(user.company_id);
    }

    q.execute(&mut **tx).await?;
    Ok(())
}

/// Clears seeded users from every company. The subject index rows cascade.
pub async fn clear_users(db: &PgPool) -> Result<u64, Box<dyn std::error::Error>> {
    let start_time = Instant::now();
    println!("🗑️  Clearing seeded users...");

    let result = sqlx::query("DELETE FROM company_users WHERE subject_id LIKE $1 || '%'")
        .bind(SEED_SUBJECT_PREFIX)
        .execute(db)
        .await?
        .rows_affected();

    println!(
        "   ✓ Deleted {} users in {:?}",
        result,
        start_time.elapsed()
    );

    Ok(result)
}
