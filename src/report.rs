//! Report projection: a pure function from a session snapshot to the
//! structured model the exporter renders. The binary spreadsheet format is
//! the exporter's concern, not ours.

use serde::Serialize;
use std::cmp::Ordering;

use crate::store::SessionSnapshot;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportModel {
    pub generated_at: String,
    pub stations: Vec<StationBlock>,
}

/// One station that has an assignments entry. An empty `students` list is
/// the explicit "no students at this station" marker; stations never
/// touched do not appear at all.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StationBlock {
    pub station: u32,
    pub students: Vec<StudentBlock>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentBlock {
    pub album_number: String,
    pub name: String,
    pub surname: String,
    pub proposed_grade: f64,
    pub passed_tasks: Vec<PassedTaskRow>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PassedTaskRow {
    pub description: String,
    pub grade: f64,
}

/// Stations ascending, students within a station by surname, each
/// student's passed tasks (still-existing only) ascending by grade.
pub fn build(snapshot: &SessionSnapshot) -> ReportModel {
    let mut stations = Vec::with_capacity(snapshot.assignments.len());

    // BTreeMap iteration gives ascending station order.
    for (&station, albums) in &snapshot.assignments {
        let mut students: Vec<StudentBlock> = snapshot
            .students
            .iter()
            .filter(|s| albums.iter().any(|a| *a == s.album_number))
            .map(|s| student_block(s, snapshot))
            .collect();
        students.sort_by(|a, b| a.surname.cmp(&b.surname));

        stations.push(StationBlock { station, students });
    }

    ReportModel {
        generated_at: chrono::Utc::now().to_rfc3339(),
        stations,
    }
}

fn student_block(student: &crate::model::Student, snapshot: &SessionSnapshot) -> StudentBlock {
    let passed = snapshot
        .passed
        .get(&student.album_number)
        .cloned()
        .unwrap_or_default();

    let mut rows: Vec<PassedTaskRow> = snapshot
        .tasks
        .iter()
        .filter(|t| passed.contains(&t.description))
        .map(|t| PassedTaskRow {
            description: t.description.clone(),
            grade: t.grade,
        })
        .collect();
    rows.sort_by(|a, b| a.grade.partial_cmp(&b.grade).unwrap_or(Ordering::Equal));

    StudentBlock {
        album_number: student.album_number.clone(),
        name: student.name.clone(),
        surname: student.surname.clone(),
        proposed_grade: student.proposed_grade,
        passed_tasks: rows,
    }
}
