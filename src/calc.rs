//! Proposed-grade derivation and the grade domain.

use std::collections::BTreeSet;

use crate::model::Task;

/// Grade a student starts at and falls back to with no passed tasks.
pub const GRADE_FLOOR: f64 = 2.0;

/// Upper bound for any grade, derived or manually set.
pub const GRADE_CEILING: f64 = 5.0;

/// Grades a task may carry. Not enforced on the persisted documents; the
/// IPC layer rejects task writes outside this set, as the entry form did.
pub const ALLOWED_TASK_GRADES: [f64; 5] = [3.0, 3.5, 4.0, 4.5, 5.0];

/// Max grade over the still-existing tasks in `passed`, floor 2.0.
///
/// Ledger entries for deleted tasks contribute nothing; an empty (or fully
/// stale) passed set yields the floor.
pub fn proposed_grade(passed: &BTreeSet<String>, tasks: &[Task]) -> f64 {
    tasks
        .iter()
        .filter(|t| passed.contains(&t.description))
        .map(|t| t.grade)
        .fold(GRADE_FLOOR, f64::max)
}

pub fn is_allowed_task_grade(grade: f64) -> bool {
    ALLOWED_TASK_GRADES.iter().any(|g| *g == grade)
}

pub fn is_valid_proposed_grade(grade: f64) -> bool {
    (GRADE_FLOOR..=GRADE_CEILING).contains(&grade)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task(desc: &str, grade: f64) -> Task {
        Task {
            description: desc.to_string(),
            grade,
        }
    }

    #[test]
    fn empty_passed_set_yields_floor() {
        let tasks = vec![task("Ex1", 3.0)];
        assert_eq!(proposed_grade(&BTreeSet::new(), &tasks), 2.0);
    }

    #[test]
    fn takes_max_of_passed_tasks() {
        let tasks = vec![task("Ex1", 3.0), task("Ex2", 4.5), task("Ex3", 5.0)];
        let passed: BTreeSet<String> = ["Ex1", "Ex2"].iter().map(|s| s.to_string()).collect();
        assert_eq!(proposed_grade(&passed, &tasks), 4.5);
    }

    #[test]
    fn deleted_tasks_in_ledger_are_ignored() {
        let tasks = vec![task("Ex1", 3.0)];
        let passed: BTreeSet<String> = ["Ex1", "GoneTask"].iter().map(|s| s.to_string()).collect();
        assert_eq!(proposed_grade(&passed, &tasks), 3.0);
    }

    #[test]
    fn fully_stale_ledger_yields_floor() {
        let passed: BTreeSet<String> = ["GoneTask"].iter().map(|s| s.to_string()).collect();
        assert_eq!(proposed_grade(&passed, &[]), 2.0);
    }

    #[test]
    fn grade_domain_checks() {
        assert!(is_allowed_task_grade(3.5));
        assert!(!is_allowed_task_grade(2.0));
        assert!(!is_allowed_task_grade(4.2));
        assert!(is_valid_proposed_grade(2.0));
        assert!(is_valid_proposed_grade(5.0));
        assert!(!is_valid_proposed_grade(1.9));
        assert!(!is_valid_proposed_grade(5.5));
    }
}
