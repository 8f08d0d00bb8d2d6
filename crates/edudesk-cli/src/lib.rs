//! # EduDesk CLI
//!
//! Database seeding utilities for local development and demos.
//!
//! ```ignore
//! use edudesk_cli::seeder::{seed_all, SeedConfig};
//!
//! let config = SeedConfig::default().with_students_per_section(20);
//! seed_all(&pool, &config).await?;
//! ```

pub mod seeder;
