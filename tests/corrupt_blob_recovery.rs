use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use labstationd::kv;
use labstationd::model::Student;
use labstationd::SessionStore;

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

fn corrupt(workspace: &std::path::Path, key: &str) {
    let blobs = kv::open_store(workspace).expect("open blob store");
    blobs
        .update(key, |_| Ok(("{definitely not json".to_string(), ())))
        .expect("write corrupt blob");
}

#[test]
fn corrupt_students_document_reads_as_empty_and_store_stays_writable() {
    let workspace = temp_dir("labstationd-corrupt-students");
    {
        let store = SessionStore::open(&workspace).expect("open store");
        store
            .add_student(Student::new("100", "Jan", "Nowak"))
            .expect("add student");
    }

    corrupt(&workspace, kv::STUDENTS_KEY);

    let store = SessionStore::open(&workspace).expect("reopen store");
    assert!(store.list_students().expect("list").is_empty());

    // Lenient recovery keeps the session usable: new writes start from the
    // recovered empty collection.
    store
        .add_student(Student::new("200", "Anna", "Adamska"))
        .expect("add after corruption");
    let students = store.list_students().expect("list again");
    assert_eq!(students.len(), 1);
    assert_eq!(students[0].album_number, "200");
}

#[test]
fn corrupt_ledger_does_not_poison_other_collections() {
    let workspace = temp_dir("labstationd-corrupt-ledger");
    {
        let store = SessionStore::open(&workspace).expect("open store");
        store
            .add_student(Student::new("100", "Jan", "Nowak"))
            .expect("add student");
        store.mark_task_passed("100", "Ex1").expect("pass");
    }

    corrupt(&workspace, kv::PASSED_TASKS_KEY);

    let store = SessionStore::open(&workspace).expect("reopen store");
    assert!(store.list_passed_tasks().expect("ledger").is_empty());
    assert_eq!(store.list_students().expect("students").len(), 1);

    let snapshot = store.snapshot().expect("snapshot");
    assert!(snapshot.passed.is_empty());
    assert_eq!(snapshot.students.len(), 1);
}
