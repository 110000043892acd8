//! # Stockpoint CLI
//!
//! Administrative helpers and database seeding for the Stockpoint access
//! service.
//!
//! ## Usage
//!
//! ```ignore
//! use stockpoint_cli::seeder::{seed_all, SeedConfig};
//!
//! let config = SeedConfig::new(10); // 10 companies with default staffing
//! seed_all(&pool, config).await?;
//! ```

pub mod policy;
pub mod seeder;
