use std::path::PathBuf;
use std::sync::Arc;
use std::thread;
use std::time::{SystemTime, UNIX_EPOCH};

use labstationd::model::Student;
use labstationd::{SessionStore, StoreError};

fn temp_dir(prefix: &str) -> PathBuf {
    let p = std::env::temp_dir().join(format!(
        "{}-{}",
        prefix,
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("clock")
            .as_nanos()
    ));
    std::fs::create_dir_all(&p).expect("create temp dir");
    p
}

#[test]
fn concurrent_reassignment_leaves_exactly_one_membership() {
    let workspace = temp_dir("labstationd-concurrent-assign");
    let store = Arc::new(SessionStore::open(&workspace).expect("open store"));
    store
        .add_student(Student::new("100", "Jan", "Nowak"))
        .expect("add student");

    let mut handles = Vec::new();
    for station in 1..=10u32 {
        let store = store.clone();
        handles.push(thread::spawn(move || {
            for _ in 0..20 {
                store
                    .assign_student_to_station("100", station)
                    .expect("assign");
            }
        }));
    }
    for handle in handles {
        handle.join().expect("assignment thread");
    }

    let assignments = store.list_station_assignments().expect("list assignments");
    let memberships: usize = assignments
        .values()
        .map(|albums| albums.iter().filter(|a| *a == "100").count())
        .sum();
    assert_eq!(memberships, 1, "student must sit at exactly one station");
}

#[test]
fn concurrent_duplicate_add_admits_exactly_one_winner() {
    let workspace = temp_dir("labstationd-concurrent-add");
    let store = Arc::new(SessionStore::open(&workspace).expect("open store"));

    let mut handles = Vec::new();
    for i in 0..8 {
        let store = store.clone();
        handles.push(thread::spawn(move || {
            store.add_student(Student::new("100", format!("Writer{i}"), "Nowak"))
        }));
    }

    let mut wins = 0;
    let mut duplicates = 0;
    for handle in handles {
        match handle.join().expect("add thread") {
            Ok(()) => wins += 1,
            Err(StoreError::DuplicateIdentity(album)) => {
                assert_eq!(album, "100");
                duplicates += 1;
            }
            Err(e) => panic!("unexpected error: {e}"),
        }
    }

    assert_eq!(wins, 1);
    assert_eq!(duplicates, 7);
    assert_eq!(store.list_students().expect("list").len(), 1);
}

#[test]
fn ledger_and_grade_writes_stay_ordered_per_student() {
    let workspace = temp_dir("labstationd-concurrent-grades");
    let store = Arc::new(SessionStore::open(&workspace).expect("open store"));
    store
        .add_student(Student::new("100", "Jan", "Nowak"))
        .expect("add student");
    store
        .add_task(labstationd::model::Task {
            description: "Ex1".into(),
            grade: 3.0,
        })
        .expect("add task");

    let mut handles = Vec::new();
    for _ in 0..4 {
        let store = store.clone();
        handles.push(thread::spawn(move || {
            for _ in 0..10 {
                store.mark_task_passed("100", "Ex1").expect("pass");
            }
        }));
    }
    for handle in handles {
        handle.join().expect("grading thread");
    }

    // Idempotent ledger, derived grade settled at the task grade.
    let passed = store.list_passed_tasks().expect("ledger");
    assert_eq!(passed.get("100").map(|s| s.len()), Some(1));
    let students = store.list_students().expect("students");
    assert_eq!(students[0].proposed_grade, 3.0);
}
