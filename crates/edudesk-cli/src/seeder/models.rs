//! Seed configuration and the rows generated from it.

use chrono::NaiveDate;
use edudesk_core::Role;
use uuid::Uuid;

use super::DEFAULT_SEED_PASSWORD;

#[derive(Clone, Debug)]
pub struct SeedConfig {
    pub classes: Vec<String>,
    pub sections: Vec<String>,
    pub students_per_section: usize,
    pub teachers: usize,
    /// Weekdays of attendance to generate, counting back from today
    pub attendance_days: usize,
    pub password: String,
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            classes: ["JSS1", "JSS2", "JSS3", "SS1", "SS2", "SS3"]
                .into_iter()
                .map(String::from)
                .collect(),
            sections: vec!["A".to_string(), "B".to_string()],
            students_per_section: 20,
            teachers: 12,
            attendance_days: 10,
            password: DEFAULT_SEED_PASSWORD.to_string(),
        }
    }
}

impl SeedConfig {
    pub fn with_students_per_section(mut self, count: usize) -> Self {
        self.students_per_section = count;
        self
    }

    pub fn with_teachers(mut self, count: usize) -> Self {
        self.teachers = count;
        self
    }

    pub fn with_attendance_days(mut self, days: usize) -> Self {
        self.attendance_days = days;
        self
    }

    pub fn total_students(&self) -> usize {
        self.classes.len() * self.sections.len() * self.students_per_section
    }
}

/// Login account created alongside a teacher or student.
pub struct UserSeed {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
}

pub struct TeacherSeed {
    pub id: Uuid,
    pub user: UserSeed,
    pub employee_id: String,
    pub specialization: String,
    pub class_name: Option<String>,
    pub section: Option<String>,
}

pub struct StudentSeed {
    pub id: Uuid,
    pub user: UserSeed,
    pub admission_number: String,
    pub date_of_birth: NaiveDate,
    pub gender: String,
    pub class_name: String,
    pub section: String,
    pub roll_number: String,
    pub guardian_name: String,
    pub guardian_phone: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_students() {
        let config = SeedConfig::default().with_students_per_section(5);
        assert_eq!(config.total_students(), 6 * 2 * 5);
    }
}
