pub mod admissions;
pub mod assignments;
pub mod attendance;
pub mod auth;
pub mod calendar;
pub mod dashboard;
pub mod documents;
pub mod fees;
pub mod notices;
pub mod permissions;
pub mod results;
pub mod students;
pub mod subjects;
pub mod submissions;
pub mod teachers;
pub mod timetable;
pub mod users;
