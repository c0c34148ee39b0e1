//! The session store: composes the four repositories behind atomic,
//! invariant-preserving operations. The only place multi-collection
//! updates happen.
//!
//! Multi-key operations write in a fixed order (ledger first, students
//! second) so the two writes of one logical operation stay causally
//! ordered. They are not atomic across keys with respect to a crash.

use std::path::Path;
use std::sync::Arc;

use crate::calc;
use crate::codec;
use crate::error::{Result, StoreError};
use crate::events::{StoreEvent, StoreEventBus};
use crate::kv::{self, BlobStore};
use crate::model::{PassedTasks, StationAssignments, Student, Task};
use crate::repo::DocRepo;

/// Consistent point-in-time read of all four collections.
#[derive(Debug, Clone)]
pub struct SessionSnapshot {
    pub students: Vec<Student>,
    pub tasks: Vec<Task>,
    pub assignments: StationAssignments,
    pub passed: PassedTasks,
}

pub struct SessionStore {
    blobs: Arc<BlobStore>,
    pub students: DocRepo<Vec<Student>>,
    pub tasks: DocRepo<Vec<Task>>,
    pub assignments: DocRepo<StationAssignments>,
    pub ledger: DocRepo<PassedTasks>,
    pub events: StoreEventBus,
}

impl SessionStore {
    /// Open (or create) the session workspace. The blob store handle is
    /// constructed here and passed to every repository; there is no
    /// process-wide storage singleton.
    pub fn open(workspace: &Path) -> anyhow::Result<SessionStore> {
        let blobs = Arc::new(kv::open_store(workspace)?);
        Ok(SessionStore {
            students: DocRepo::open(blobs.clone(), kv::STUDENTS_KEY)?,
            tasks: DocRepo::open(blobs.clone(), kv::TASKS_KEY)?,
            assignments: DocRepo::open(blobs.clone(), kv::ASSIGNMENTS_KEY)?,
            ledger: DocRepo::open(blobs.clone(), kv::PASSED_TASKS_KEY)?,
            events: StoreEventBus::new(),
            blobs,
        })
    }

    // ----- students -----

    /// Append a student; rejects an existing album number with
    /// `DuplicateIdentity` and writes nothing in that case.
    pub fn add_student(&self, student: Student) -> Result<()> {
        self.students.update(|students| {
            if students
                .iter()
                .any(|s| s.album_number == student.album_number)
            {
                return Err(StoreError::DuplicateIdentity(student.album_number.clone()));
            }
            students.push(student);
            Ok(())
        })?;
        self.events.emit(StoreEvent::StudentsChanged);
        Ok(())
    }

    /// Remove the student matching `original_album`, insert `updated`.
    /// Deliberately asymmetric with `add_student`: no collision re-check
    /// against other students after a rename — last write wins.
    pub fn update_student(&self, original_album: &str, updated: Student) -> Result<()> {
        self.students.update(|students| {
            students.retain(|s| s.album_number != original_album);
            students.push(updated);
            Ok(())
        })?;
        self.events.emit(StoreEvent::StudentsChanged);
        Ok(())
    }

    /// No-op if absent.
    pub fn delete_student(&self, album_number: &str) -> Result<()> {
        self.students.update(|students| {
            students.retain(|s| s.album_number != album_number);
            Ok(())
        })?;
        self.events.emit(StoreEvent::StudentsChanged);
        Ok(())
    }

    /// Storage order; consumers sort as their view needs.
    pub fn list_students(&self) -> Result<Vec<Student>> {
        self.students.load()
    }

    // ----- station assignments -----

    /// Atomically strip the album number from every station's list, then
    /// append it to the target station if not already present. Holds the
    /// at-most-one-station invariant under concurrent calls: last writer
    /// determines the final station, never two memberships.
    pub fn assign_student_to_station(&self, album_number: &str, station: u32) -> Result<()> {
        self.assignments.update(|assignments| {
            for albums in assignments.values_mut() {
                albums.retain(|a| a != album_number);
            }
            let albums = assignments.entry(station).or_default();
            if !albums.iter().any(|a| a == album_number) {
                albums.push(album_number.to_string());
            }
            Ok(())
        })?;
        self.events.emit(StoreEvent::AssignmentsChanged);
        Ok(())
    }

    pub fn list_station_assignments(&self) -> Result<StationAssignments> {
        self.assignments.load()
    }

    /// Join of the station's assignment list against the student
    /// collection, in student storage order. Unknown stations and stations
    /// with no entries yield an empty list.
    pub fn students_for_station(&self, station: u32) -> Result<Vec<Student>> {
        let assignments = self.assignments.load()?;
        let students = self.students.load()?;
        Ok(join_station(&assignments, &students, station))
    }

    /// Same join over the last published values, no I/O. Recomputes
    /// whenever either input stream has emitted; the event bus tells
    /// subscribers when that happened.
    pub fn students_for_station_now(&self, station: u32) -> Vec<Student> {
        join_station(&self.assignments.current(), &self.students.current(), station)
    }

    // ----- tasks -----

    pub fn add_task(&self, task: Task) -> Result<()> {
        self.tasks.update(|tasks| {
            tasks.push(task);
            Ok(())
        })?;
        self.events.emit(StoreEvent::TasksChanged);
        Ok(())
    }

    /// Remove-then-insert, matched on the full (description, grade) pair.
    /// Same last-write-wins semantics as `update_student`.
    pub fn update_task(&self, original: &Task, updated: Task) -> Result<()> {
        self.tasks.update(|tasks| {
            tasks.retain(|t| !t.same_identity(original));
            tasks.push(updated);
            Ok(())
        })?;
        self.events.emit(StoreEvent::TasksChanged);
        Ok(())
    }

    pub fn delete_task(&self, task: &Task) -> Result<()> {
        self.tasks.update(|tasks| {
            tasks.retain(|t| !t.same_identity(task));
            Ok(())
        })?;
        self.events.emit(StoreEvent::TasksChanged);
        Ok(())
    }

    pub fn list_tasks(&self) -> Result<Vec<Task>> {
        self.tasks.load()
    }

    // ----- passed-tasks ledger & grade derivation -----

    /// Record the task as passed (idempotent), then raise the student's
    /// proposed grade to the task's grade when it exceeds the current one.
    /// This path never lowers a grade.
    pub fn mark_task_passed(&self, album_number: &str, task_description: &str) -> Result<()> {
        self.ledger.update(|passed| {
            passed
                .entry(album_number.to_string())
                .or_default()
                .insert(task_description.to_string());
            Ok(())
        })?;
        self.events.emit(StoreEvent::LedgerChanged);

        let tasks = self.tasks.load()?;
        let task_grade = tasks
            .iter()
            .find(|t| t.description == task_description)
            .map(|t| t.grade);

        let mut changed = false;
        self.students.update(|students| {
            if let (Some(grade), Some(student)) = (
                task_grade,
                students
                    .iter_mut()
                    .find(|s| s.album_number == album_number),
            ) {
                if grade > student.proposed_grade {
                    student.proposed_grade = grade;
                    changed = true;
                }
            }
            Ok(())
        })?;
        if changed {
            self.events.emit(StoreEvent::StudentsChanged);
        }
        Ok(())
    }

    /// Remove the task from the ledger, then fully recompute the proposed
    /// grade from the remaining passed, still-existing tasks (floor 2.0).
    /// The recompute replaces a differing grade unconditionally — including
    /// a manual override that exceeded every task-derived value.
    pub fn mark_task_not_passed(&self, album_number: &str, task_description: &str) -> Result<()> {
        let remaining = self.ledger.update(|passed| {
            if let Some(set) = passed.get_mut(album_number) {
                set.remove(task_description);
            }
            Ok(passed.get(album_number).cloned().unwrap_or_default())
        })?;
        self.events.emit(StoreEvent::LedgerChanged);

        let tasks = self.tasks.load()?;
        let recomputed = calc::proposed_grade(&remaining, &tasks);

        let mut changed = false;
        self.students.update(|students| {
            if let Some(student) = students
                .iter_mut()
                .find(|s| s.album_number == album_number)
            {
                if student.proposed_grade != recomputed {
                    student.proposed_grade = recomputed;
                    changed = true;
                }
            }
            Ok(())
        })?;
        if changed {
            self.events.emit(StoreEvent::StudentsChanged);
        }
        Ok(())
    }

    pub fn list_passed_tasks(&self) -> Result<PassedTasks> {
        self.ledger.load()
    }

    /// Manual grade override. Takes precedence until the next passed-set
    /// change for the student recomputes the grade. No-op if the student
    /// is absent. Range validation belongs to the caller.
    pub fn set_proposed_grade(&self, album_number: &str, grade: f64) -> Result<()> {
        self.students.update(|students| {
            if let Some(student) = students
                .iter_mut()
                .find(|s| s.album_number == album_number)
            {
                student.proposed_grade = grade;
            }
            Ok(())
        })?;
        self.events.emit(StoreEvent::StudentsChanged);
        Ok(())
    }

    // ----- session-wide -----

    /// Drop every collection in one transaction; no partial-clear state is
    /// ever observable.
    pub fn clear_all(&self) -> Result<()> {
        self.blobs.clear()?;
        self.students.publish(Vec::new());
        self.tasks.publish(Vec::new());
        self.assignments.publish(StationAssignments::new());
        self.ledger.publish(PassedTasks::new());
        self.events.emit(StoreEvent::SessionCleared);
        Ok(())
    }

    /// All four collections read in a single transaction.
    pub fn snapshot(&self) -> Result<SessionSnapshot> {
        let blobs = self.blobs.snapshot(&[
            kv::STUDENTS_KEY,
            kv::TASKS_KEY,
            kv::ASSIGNMENTS_KEY,
            kv::PASSED_TASKS_KEY,
        ])?;
        Ok(SessionSnapshot {
            students: codec::decode_or_default(kv::STUDENTS_KEY, blobs[0].as_deref()),
            tasks: codec::decode_or_default(kv::TASKS_KEY, blobs[1].as_deref()),
            assignments: codec::decode_or_default(kv::ASSIGNMENTS_KEY, blobs[2].as_deref()),
            passed: codec::decode_or_default(kv::PASSED_TASKS_KEY, blobs[3].as_deref()),
        })
    }

    pub fn build_report(&self) -> Result<crate::report::ReportModel> {
        Ok(crate::report::build(&self.snapshot()?))
    }
}

fn join_station(
    assignments: &StationAssignments,
    students: &[Student],
    station: u32,
) -> Vec<Student> {
    let Some(albums) = assignments.get(&station) else {
        return Vec::new();
    };
    students
        .iter()
        .filter(|s| albums.iter().any(|a| *a == s.album_number))
        .cloned()
        .collect()
}
