pub mod core;
pub mod grading;
pub mod reports;
pub mod stations;
pub mod students;
pub mod tasks;
