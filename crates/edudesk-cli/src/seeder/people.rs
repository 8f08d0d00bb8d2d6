//! Teachers and students, each with a login account.

use std::time::Instant;

use chrono::{Datelike, NaiveDate, Utc};
use edudesk_core::Role;
use fake::Fake;
use fake::faker::name::en::{FirstName, LastName};
use fake::faker::phone_number::en::PhoneNumber;
use rand::Rng;
use rayon::prelude::*;
use sqlx::{PgPool, Postgres, QueryBuilder, Transaction};
use uuid::Uuid;

use super::academics::CURRICULUM;
use super::models::{SeedConfig, StudentSeed, TeacherSeed, UserSeed};
use super::{SEED_EMAIL_DOMAIN, SEED_PREFIX};

// Keeps each statement well below the 65535 bind parameter limit.
const BATCH_SIZE: usize = 1000;


fn generate_user(role: Role, tag: &str, idx: usize, password_hash: &str) -> UserSeed {
    let first_name: String = FirstName().fake();
    let last_name: String = LastName().fake();
    let email = format!(
        "{}.{}+{}{}@{}",
        first_name.to_lowercase().replace(' ', ""),
        last_name.to_lowercase().replace(' ', ""),
        tag,
        idx,
        SEED_EMAIL_DOMAIN
    );

    UserSeed {
        id: Uuid::new_v4(),
        first_name,
        last_name,
        email,
        password_hash: password_hash.to_string(),
        role,
    }
}

/// The first teachers become class teachers, one per class and section.
pub fn generate_teachers(config: &SeedConfig, password_hash: &str) -> Vec<TeacherSeed> {
    let homerooms: Vec<(String, String)> = config
        .classes
        .iter()
        .flat_map(|class| {
            config
                .sections
                .iter()
                .map(move |section| (class.clone(), section.clone()))
        })
        .collect();

    (0..config.teachers)
        .into_par_iter()
        .map(|idx| {
            let homeroom = homerooms.get(idx).cloned();
            let role = if homeroom.is_some() {
                Role::ClassTeacher
            } else {
                Role::SubjectTeacher
            };
            let (class_name, section) = homeroom.unzip();

            TeacherSeed {
                id: Uuid::new_v4(),
                user: generate_user(role, "teacher", idx, password_hash),
                employee_id: format!("{}EMP-{:04}", SEED_PREFIX, idx + 1),
                specialization: CURRICULUM[idx % CURRICULUM.len()].0.to_string(),
                class_name,
                section,
            }
        })
        .collect()
}

pub fn generate_students(config: &SeedConfig, password_hash: &str) -> Vec<StudentSeed> {
    let year = Utc::now().year();
    let per_class = config.sections.len() * config.students_per_section;

    (0..config.total_students())
        .into_par_iter()
        .map(|idx| {
            let class_idx = idx / per_class;
            let within_class = idx % per_class;
            let section = &config.sections[within_class / config.students_per_section];
            let roll = within_class % config.students_per_section + 1;

            let mut rng = rand::thread_rng();
            let birth_year = year - 11 - class_idx as i32;
            let date_of_birth =
                NaiveDate::from_ymd_opt(birth_year, rng.gen_range(1..=12), rng.gen_range(1..=28))
                    .unwrap_or_default();
            let gender = if rng.gen_bool(0.5) { "male" } else { "female" };

            let user = generate_user(Role::Student, "student", idx, password_hash);
            let guardian_first: String = FirstName().fake();

            StudentSeed {
                id: Uuid::new_v4(),
                admission_number: format!("{}{}-{:05}", SEED_PREFIX, year, idx + 1),
                date_of_birth,
                gender: gender.to_string(),
                class_name: config.classes[class_idx].clone(),
                section: section.clone(),
                roll_number: roll.to_string(),
                guardian_name: format!("{} {}", guardian_first, user.last_name),
                guardian_phone: PhoneNumber().fake(),
                user,
            }
        })
        .collect()
}

pub async fn seed_teachers(
    db: &PgPool,
    config: &SeedConfig,
    password_hash: &str,
) -> anyhow::Result<Vec<TeacherSeed>> {
    let start_time = Instant::now();
    println!("👩‍🏫 Seeding {} teachers...", config.teachers);

    let teachers = generate_teachers(config, password_hash);
    let mut tx = db.begin().await?;

    for chunk in teachers.chunks(BATCH_SIZE) {
        let users: Vec<&UserSeed> = chunk.iter().map(|t| &t.user).collect();
        insert_users(&mut tx, &users).await?;

        let mut query = QueryBuilder::<Postgres>::new(
            "INSERT INTO teachers (id, user_id, employee_id, first_name, last_name, email, \
             specialization, joining_date, is_class_teacher, class_name, section) ",
        );
        let joined = Utc::now().date_naive();
        query.push_values(chunk, |mut row, teacher| {
            row.push_bind(teacher.id)
                .push_bind(teacher.user.id)
                .push_bind(&teacher.employee_id)
                .push_bind(&teacher.user.first_name)
                .push_bind(&teacher.user.last_name)
                .push_bind(&teacher.user.email)
                .push_bind(&teacher.specialization)
                .push_bind(joined)
                .push_bind(teacher.class_name.is_some())
                .push_bind(&teacher.class_name)
                .push_bind(&teacher.section);
        });
        query.build().execute(&mut *tx).await?;
    }

    tx.commit().await?;
    println!(
        "   ✓ Inserted {} teachers in {:?}",
        teachers.len(),
        start_time.elapsed()
    );

    Ok(teachers)
}

pub async fn seed_students(
    db: &PgPool,
    config: &SeedConfig,
    password_hash: &str,
) -> anyhow::Result<Vec<StudentSeed>> {
    let start_time = Instant::now();
    println!(
        "🎓 Seeding {} students ({} per section)...",
        config.total_students(),
        config.students_per_section
    );

    let students = generate_students(config, password_hash);
    let mut tx = db.begin().await?;

    for chunk in students.chunks(BATCH_SIZE) {
        let users: Vec<&UserSeed> = chunk.iter().map(|s| &s.user).collect();
        insert_users(&mut tx, &users).await?;

        let mut query = QueryBuilder::<Postgres>::new(
            "INSERT INTO students (id, user_id, admission_number, first_name, last_name, \
             date_of_birth, gender, class_name, section, roll_number, guardian_name, \
             guardian_phone) ",
        );
        query.push_values(chunk, |mut row, student| {
            row.push_bind(student.id)
                .push_bind(student.user.id)
                .push_bind(&student.admission_number)
                .push_bind(&student.user.first_name)
                .push_bind(&student.user.last_name)
                .push_bind(student.date_of_birth)
                .push_bind(&student.gender)
                .push_bind(&student.class_name)
                .push_bind(&student.section)
                .push_bind(&student.roll_number)
                .push_bind(&student.guardian_name)
                .push_bind(&student.guardian_phone);
        });
        query.build().execute(&mut *tx).await?;
    }

    tx.commit().await?;
    println!(
        "   ✓ Inserted {} students in {:?}",
        students.len(),
        start_time.elapsed()
    );

    Ok(students)
}

async fn insert_users(
    tx: &mut Transaction<'_, Postgres>,
    users: &[&UserSeed],
) -> anyhow::Result<()> {
    if users.is_empty() {
        return Ok(());
    }

    let mut query = QueryBuilder::<Postgres>::new(
        "INSERT INTO users (id, first_name, last_name, email, password, role) ",
    );
    query.push_values(users, |mut row, user| {
        row.push_bind(user.id)
            .push_bind(&user.first_name)
            .push_bind(&user.last_name)
            .push_bind(&user.email)
            .push_bind(&user.password_hash)
            .push_bind(user.role);
    });
    query.build().execute(&mut **tx).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_generate_students_fills_every_section() {
        let config = SeedConfig::default().with_students_per_section(3);
        let students = generate_students(&config, "hash");
        assert_eq!(students.len(), config.total_students());

        let sections: HashSet<(String, String)> = students
            .iter()
            .map(|s| (s.class_name.clone(), s.section.clone()))
            .collect();
        assert_eq!(sections.len(), config.classes.len() * config.sections.len());

        let admission_numbers: HashSet<&str> =
            students.iter().map(|s| s.admission_number.as_str()).collect();
        assert_eq!(admission_numbers.len(), students.len());
        assert!(students.iter().all(|s| s.admission_number.starts_with(SEED_PREFIX)));
    }

    #[test]
    fn test_generated_emails_are_unique_and_marked() {
        let config = SeedConfig::default().with_students_per_section(10);
        let students = generate_students(&config, "hash");
        let emails: HashSet<&str> = students.iter().map(|s| s.user.email.as_str()).collect();
        assert_eq!(emails.len(), students.len());
        assert!(emails.iter().all(|e| e.ends_with(SEED_EMAIL_DOMAIN)));
    }

    #[test]
    fn test_first_teachers_are_class_teachers() {
        let config = SeedConfig::default().with_teachers(14);
        let teachers = generate_teachers(&config, "hash");
        let class_teachers = teachers
            .iter()
            .filter(|t| t.user.role == Role::ClassTeacher)
            .count();
        assert_eq!(class_teachers, config.classes.len() * config.sections.len());
        assert!(teachers[13].class_name.is_none());
    }
}
