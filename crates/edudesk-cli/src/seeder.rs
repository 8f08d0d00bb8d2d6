//! Fake school data: teachers, subjects, students with login accounts, and a
//! few weeks of attendance.
//!
//! Everything the seeder writes is recognisable by [`SEED_PREFIX`] (admission
//! numbers, employee ids, subject codes) or [`SEED_EMAIL_DOMAIN`] (user
//! emails), which is what [`clear_all`] deletes.

pub mod academics;
pub mod models;
pub mod people;

use std::time::Instant;

use anyhow::Context;
use edudesk_core::hash_password;
use sqlx::PgPool;

pub use models::SeedConfig;

pub const SEED_PREFIX: &str = "SEED-";
pub const SEED_EMAIL_DOMAIN: &str = "seed.edudesk.test";
pub const DEFAULT_SEED_PASSWORD: &str = "password123";

#[derive(Debug, Default)]
pub struct SeedReport {
    pub teachers: usize,
    pub subjects: usize,
    pub students: usize,
    pub attendance: usize,
}

pub async fn seed_all(db: &PgPool, config: &SeedConfig) -> anyhow::Result<SeedReport> {
    let start_time = Instant::now();
    println!("🌱 Seeding EduDesk data...");

    let password_hash = hash_password(&config.password)
        .map_err(|e| anyhow::anyhow!("Failed to hash seed password: {}", e.error))?;

    let teachers = people::seed_teachers(db, config, &password_hash).await?;
    let subjects = academics::seed_subjects(db, config, &teachers).await?;
    let students = people::seed_students(db, config, &password_hash).await?;
    let attendance = academics::seed_attendance(db, &students, config.attendance_days).await?;

    let report = SeedReport {
        teachers: teachers.len(),
        subjects,
        students: students.len(),
        attendance,
    };

    println!("\n✅ Seeding complete in {:?}", start_time.elapsed());
    println!(
        "   {} teachers, {} subjects, {} students, {} attendance records",
        report.teachers, report.subjects, report.students, report.attendance
    );
    println!(
        "   Seeded accounts use the password '{}'",
        config.password
    );

    Ok(report)
}

/// Removes seeded rows. Student deletes cascade to attendance, fees, results
/// and submissions.
pub async fn clear_all(db: &PgPool) -> anyhow::Result<u64> {
    let start_time = Instant::now();
    println!("🗑️  Clearing seeded data...");

    let pattern = format!("{}%", SEED_PREFIX);
    let email_pattern = format!("%@{}", SEED_EMAIL_DOMAIN);
    let mut tx = db.begin().await?;
    let mut removed = 0;

    for (table, column, pattern) in [
        ("students", "admission_number", &pattern),
        ("subjects", "code", &pattern),
        ("teachers", "employee_id", &pattern),
        ("users", "email", &email_pattern),
    ] {
        let deleted = sqlx::query(&format!("DELETE FROM {} WHERE {} LIKE $1", table, column))
            .bind(pattern)
            .execute(&mut *tx)
            .await
            .with_context(|| format!("Failed to clear seeded {}", table))?
            .rows_affected();
        println!("   ✓ {} {}", deleted, table);
        removed += deleted;
    }

    tx.commit().await?;
    println!("   Done in {:?}", start_time.elapsed());
    Ok(removed)
}
