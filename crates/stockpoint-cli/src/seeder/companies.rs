//! Company seeding functionality.

use fake::Fake;
use fake::faker::company::en::CompanyName;
use rayon::prelude::*;
use sqlx::{PgPool, Postgres, Transaction};
use std::time::Instant;
use uuid::Uuid;

use super::models::{CompanySeed, SEED_COMPANY_SUFFIX};

/// Generates company data in parallel using Rayon.
///
/// Names carry the index so they stay unique under the `companies.name`
/// constraint.
pub fn generate_companies(count: usize) -> Vec<CompanySeed> {
    (0..count)
        .into_par_iter()
        .map(|idx| {
            let name: String = CompanyName().fake();
            CompanySeed {
                name: format!("{} {}{}", name, idx + 1, SEED_COMPANY_SUFFIX),
            }
        })
        .collect()
}

/// Seeds companies into the database
pub async fn seed_companies(
    db: &PgPool,
    count: usize,
) -> Result<Vec<Uuid>, Box<dyn std::error::Error>> {
    let start_time = Instant::now();
    println!("🏢 Seeding {} companies...", count);

    let companies = generate_companies(count);
    let company_ids = insert_companies_batch(db, &companies).await?;

    println!(
        "   ✓ Inserted {} companies in {:?}",
        company_ids.len(),
        start_time.elapsed()
    );

    Ok(company_ids)
}

/// Inserts companies in batches using multi-value INSERT statements
pub async fn insert_companies_batch(
    db: &PgPool,
    companies: &[CompanySeed],
) -> Result<Vec<Uuid>, Box<dyn std::error::Error>> {
    let mut tx = db.begin().await?;

    const BATCH_SIZE: usize = 1000;
    let mut all_ids = Vec::with_capacity(companies.len());

    for chunk in companies.chunks(BATCH_SIZE) {
        let ids = insert_companies_chunk(&mut tx, chunk).await?;
        all_ids.extend(ids);
    }

    tx.commit().await?;
    Ok(all_ids)
}

async fn insert_companies_chunk(
    tx: &mut Transaction<'_, Postgres>,
    companies: &[CompanySeed],
) -> Result<Vec<Uuid>, Box<dyn std::error::Error>> {
    if companies.is_empty() {
        return Ok(Vec::new());
    }

    let mut query = String::from("INSERT INTO companies (name) VALUES ");
    for i in 0..companies.len() {
        if i > 0 {
            query.push_str(", ");
        }
        query.push_str(&format!("(${})", i + 1));
    }
    query.push_str(" RETURNING id");

    let mut q = sqlx::query_scalar(&query);
    for company in companies {
        q = q.bind(&company.name);
    }

    let ids = q.fetch_all(&mut **tx).await?;
    Ok(ids)
}

/// Clears seeded companies. Their users go with them.
pub async fn clear_companies(db: &PgPool) -> Result<u64, Box<dyn std::error::Error>> {
    let start_time = Instant::now();
    println!("🗑️  Clearing seeded companies...");

    let result = sqlx::query("DELETE FROM companies WHERE name LIKE '%' || $1")
        .bind(SEED_COMPANY_SUFFIX)
        .execute(db)
        .await?
        .rows_affected();

    println!(
        "   ✓ Deleted {} companies in {:?}",
        result,
        start_time.elapsed()
    );

    Ok(result)
}
